//! MySQL-style dialect.

use super::Dialect;
use crate::ident::FieldQuoter;
use crate::operation::Operation;
use crate::scope::{Clause, Scope};

const SELECT: &[Clause] = &[
    Clause::Columns,
    Clause::Alias,
    Clause::Join,
    Clause::Where,
    Clause::GroupBy,
    Clause::Having,
    Clause::OrderBy,
    Clause::Limit,
    Clause::Offset,
    Clause::Lock,
];

const AGGREGATE: &[Clause] = &[
    Clause::Columns,
    Clause::Alias,
    Clause::Join,
    Clause::Where,
    Clause::GroupBy,
    Clause::Having,
    Clause::Lock,
];

const INSERT: &[Clause] = &[Clause::Insert, Clause::Values];

const UPDATE: &[Clause] = &[
    Clause::Alias,
    Clause::Set,
    Clause::Where,
    Clause::OrderBy,
    Clause::Limit,
];

const DELETE: &[Clause] = &[Clause::Alias, Clause::Where, Clause::OrderBy, Clause::Limit];

/// Backtick quoting, `limit n offset m`, `replace into`, JSON aggregates.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySql;

impl FieldQuoter for MySql {
    fn quote(&self, name: &str) -> String {
        format!("`{name}`")
    }
}

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn clauses(&self, op: Operation) -> Option<&'static [Clause]> {
        let clauses = match op {
            Operation::Fetch
            | Operation::FetchAll
            | Operation::Distinct
            | Operation::JsonArrayAgg
            | Operation::JsonObjectAgg => SELECT,
            Operation::Aggregate(_) => AGGREGATE,
            Operation::Insert
            | Operation::InsertGetId
            | Operation::Replace
            | Operation::ReplaceGetId => INSERT,
            Operation::Update => UPDATE,
            Operation::Delete => DELETE,
            Operation::Truncate => &[],
        };
        Some(clauses)
    }

    fn truncate_head(&self, table: &str) -> String {
        format!("truncate {table}")
    }

    /// Sets the row count to `page`, not `per`. Callers wanting `per` rows
    /// should chain `limit(per)` after `page`.
    fn page(&self, scope: &mut Scope, page: u64, per: u64) {
        scope.set_row_count(page);
        scope.set_offset(page.saturating_sub(1) * per);
    }
}
