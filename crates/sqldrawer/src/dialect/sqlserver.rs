//! SQL-Server-style dialect.

use super::Dialect;
use crate::ident::FieldQuoter;
use crate::operation::Operation;
use crate::scope::{Clause, Scope};

const SELECT: &[Clause] = &[
    Clause::Top,
    Clause::Columns,
    Clause::Alias,
    Clause::Join,
    Clause::Where,
    Clause::GroupBy,
    Clause::Having,
    Clause::OrderBy,
    Clause::Offset,
];

const AGGREGATE: &[Clause] = &[
    Clause::Columns,
    Clause::Alias,
    Clause::Join,
    Clause::Where,
    Clause::GroupBy,
    Clause::Having,
];

const INSERT: &[Clause] = &[Clause::Insert, Clause::Values];

const UPDATE: &[Clause] = &[Clause::Alias, Clause::Set, Clause::Where, Clause::OrderBy];

const DELETE: &[Clause] = &[Clause::Alias, Clause::Where, Clause::OrderBy];

/// Bracket quoting, `top n` / `offset m rows fetch next n rows only`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServer;

impl FieldQuoter for SqlServer {
    fn quote(&self, name: &str) -> String {
        format!("[{name}]")
    }
}

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn clauses(&self, op: Operation) -> Option<&'static [Clause]> {
        match op {
            Operation::Fetch
            | Operation::FetchAll
            | Operation::Distinct
            | Operation::JsonArrayAgg
            | Operation::JsonObjectAgg => Some(SELECT),
            Operation::Aggregate(_) => Some(AGGREGATE),
            Operation::Insert | Operation::InsertGetId => Some(INSERT),
            Operation::Replace | Operation::ReplaceGetId => None,
            Operation::Update => Some(UPDATE),
            Operation::Delete => Some(DELETE),
            Operation::Truncate => Some(&[]),
        }
    }

    fn truncate_head(&self, table: &str) -> String {
        format!("truncate table {table}")
    }

    fn head(&self, op: Operation, table: &str, scope: &Scope) -> String {
        match (op, scope.row_count()) {
            (Operation::Update, Some(n)) => format!("update top ({n}) {table}"),
            (Operation::Delete, Some(n)) => format!("delete top ({n}) from {table}"),
            (Operation::Update, None) => format!("update {table}"),
            (Operation::Delete, None) => format!("delete from {table}"),
            (Operation::Truncate, _) => self.truncate_head(table),
            (Operation::Insert | Operation::InsertGetId, _) => format!("insert into {table}"),
            (Operation::Replace | Operation::ReplaceGetId, _) => format!("replace into {table}"),
            _ => String::from("select "),
        }
    }

    /// `top n ` only while no offset is set.
    fn render_top(&self, scope: &Scope) -> Option<String> {
        match (scope.row_count(), scope.offset()) {
            (Some(n), None) => Some(format!("top {n} ")),
            _ => None,
        }
    }

    fn render_limit(&self, _scope: &Scope) -> Option<String> {
        None
    }

    /// The row count falls back to 0 when only an offset was set.
    fn render_offset(&self, scope: &Scope) -> Option<String> {
        scope.offset().map(|m| {
            format!(
                " offset {m} rows fetch next {} rows only",
                scope.row_count().unwrap_or(0)
            )
        })
    }

    fn page(&self, scope: &mut Scope, page: u64, per: u64) {
        scope.set_row_count(per);
        scope.set_offset(page.saturating_sub(1) * per);
    }
}
