//! SQL dialect support.
//!
//! A dialect decides identifier quoting, the ordered clause list for every
//! [`Operation`], statement heads and pagination syntax. Two dialects ship:
//! [`MySql`] and [`SqlServer`].

mod mysql;
mod sqlserver;

pub use mysql::MySql;
pub use sqlserver::SqlServer;

use crate::ident::FieldQuoter;
use crate::operation::Operation;
use crate::scope::{Clause, Scope};
use std::fmt;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: FieldQuoter + fmt::Debug + Clone + Default + Send + Sync + 'static {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Clauses rendered for `op`, in order. `None` when the dialect does not
    /// support the operation at all.
    fn clauses(&self, op: Operation) -> Option<&'static [Clause]>;

    /// `truncate` statement for an already quoted table.
    fn truncate_head(&self, table: &str) -> String;

    /// Statement head for an already quoted table.
    fn head(&self, op: Operation, table: &str, _scope: &Scope) -> String {
        match op {
            Operation::Fetch
            | Operation::FetchAll
            | Operation::Distinct
            | Operation::JsonArrayAgg
            | Operation::JsonObjectAgg
            | Operation::Aggregate(_) => String::from("select "),
            Operation::Insert | Operation::InsertGetId => format!("insert into {table}"),
            Operation::Replace | Operation::ReplaceGetId => format!("replace into {table}"),
            Operation::Update => format!("update {table}"),
            Operation::Delete => format!("delete from {table}"),
            Operation::Truncate => self.truncate_head(table),
        }
    }

    /// The `top` clause, rendered directly after `select `.
    fn render_top(&self, _scope: &Scope) -> Option<String> {
        None
    }

    /// The row-count clause.
    fn render_limit(&self, scope: &Scope) -> Option<String> {
        scope.row_count().map(|n| format!(" limit {n}"))
    }

    /// The offset clause.
    fn render_offset(&self, scope: &Scope) -> Option<String> {
        scope.offset().map(|m| format!(" offset {m}"))
    }

    /// Apply a page/per-page pair to the scope.
    fn page(&self, scope: &mut Scope, page: u64, per: u64);
}
