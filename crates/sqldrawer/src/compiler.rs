//! Walks a dialect's clause order and renders the final statement.

use crate::condition::{ConditionAnalyzer, ConditionEntry};
use crate::dialect::Dialect;
use crate::error::{DrawerError, DrawerResult};
use crate::ident::decode_field;
use crate::join::JoinBuilder;
use crate::operation::Operation;
use crate::scope::{Clause, Scope};
use crate::value::Value;

/// A compiled statement: template text with `?` markers and the bindings for
/// them, in marker order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub bindings: Vec<Value>,
}

/// Renders a [`Scope`] for one operation.
///
/// Compilation does not mutate the scope: pending bindings are copied, not
/// drained, so compiling the same chain twice gives identical output.
pub struct ExpressionCompiler<'a, D> {
    dialect: &'a D,
    table: &'a str,
    scope: &'a Scope,
}

impl<'a, D: Dialect> ExpressionCompiler<'a, D> {
    pub fn new(dialect: &'a D, table: &'a str, scope: &'a Scope) -> Self {
        Self {
            dialect,
            table,
            scope,
        }
    }

    pub fn compile(&self, op: Operation) -> DrawerResult<Compiled> {
        self.compile_with_columns(op, None)
    }

    /// Compile with the columns clause replaced by `columns`.
    pub fn compile_with_columns(
        &self,
        op: Operation,
        columns: Option<&str>,
    ) -> DrawerResult<Compiled> {
        let clauses = self.dialect.clauses(op).ok_or_else(|| {
            DrawerError::configuration(format!(
                "The {} dialect declares no clauses for {op}",
                self.dialect.name()
            ))
        })?;

        let table = decode_field(self.dialect, self.table, None);
        let mut sql = self.dialect.head(op, &table, self.scope);
        let mut bindings = self.scope.pending_bindings().to_vec();

        for clause in clauses {
            let rendered = match clause {
                Clause::Top => self.dialect.render_top(self.scope),
                Clause::Limit => self.dialect.render_limit(self.scope),
                Clause::Offset => self.dialect.render_offset(self.scope),
                Clause::Columns => {
                    let columns = columns
                        .or_else(|| self.scope.text(Clause::Columns))
                        .unwrap_or("*");
                    Some(format!("{columns} from {table}"))
                }
                Clause::Join => {
                    let left = self.scope.text(Clause::Alias).unwrap_or(table.as_str());
                    Some(JoinBuilder::new(self.dialect).render(self.scope.joins(), left))
                }
                Clause::Where => self.render_conditions("where", self.scope.wheres(), &mut bindings)?,
                Clause::Having => {
                    self.render_conditions("having", self.scope.havings(), &mut bindings)?
                }
                _ => self.render_text(*clause),
            };

            if let Some(rendered) = rendered {
                sql.push_str(&rendered);
            }
        }

        Ok(Compiled { sql, bindings })
    }

    fn render_conditions(
        &self,
        keyword: &str,
        entries: &[ConditionEntry],
        bindings: &mut Vec<Value>,
    ) -> DrawerResult<Option<String>> {
        if entries.is_empty() {
            return Ok(None);
        }
        let fragment = ConditionAnalyzer::new(self.dialect).analyze_entries(entries)?;
        bindings.extend(fragment.bindings);
        Ok(Some(format!(" {keyword} {}", fragment.sql)))
    }

    fn render_text(&self, clause: Clause) -> Option<String> {
        let text = self.scope.text(clause)?;
        Some(match clause.keyword() {
            Some(keyword) => format!(" {keyword} {text}"),
            None => format!(" {text}"),
        })
    }
}
