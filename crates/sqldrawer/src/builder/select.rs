//! Columns, joins, grouping, ordering, pagination and locks.

use super::Builder;
use crate::dialect::Dialect;
use crate::ident::{Columns, decode_field};
use crate::join::{JoinEntry, JoinOn, JoinType};
use crate::scope::Clause;

impl<D: Dialect> Builder<D> {
    /// Add columns. Accepts `"id, title as t"` or a list of names.
    pub fn select(&mut self, columns: impl Into<Columns>) -> &mut Self {
        let expr = columns.into().to_expr(&self.dialect);
        self.scope.append_text(Clause::Columns, expr);
        self
    }

    /// Add a column expression verbatim.
    pub fn select_raw(&mut self, expr: &str) -> &mut Self {
        self.scope.append_text(Clause::Columns, expr);
        self
    }

    /// `distinct(column)`.
    pub fn distinct(&mut self, column: &str) -> &mut Self {
        let expr = format!("distinct({})", self.field(column));
        self.scope.append_text(Clause::Columns, expr);
        self
    }

    /// `min(column) as column`.
    pub fn min(&mut self, column: &str) -> &mut Self {
        self.aggregate_column("min", column, "")
    }

    pub fn min_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.aggregate_column("min", column, alias)
    }

    pub fn max(&mut self, column: &str) -> &mut Self {
        self.aggregate_column("max", column, "")
    }

    pub fn max_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.aggregate_column("max", column, alias)
    }

    pub fn sum(&mut self, column: &str) -> &mut Self {
        self.aggregate_column("sum", column, "")
    }

    pub fn sum_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.aggregate_column("sum", column, alias)
    }

    pub fn avg(&mut self, column: &str) -> &mut Self {
        self.aggregate_column("avg", column, "")
    }

    pub fn avg_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.aggregate_column("avg", column, alias)
    }

    /// `count(*) as aggregate`.
    pub fn count(&mut self) -> &mut Self {
        self.aggregate_column("count", "*", "aggregate")
    }

    pub fn count_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.aggregate_column("count", column, alias)
    }

    /// Alias the main table: `from <table> as <alias>`.
    pub fn alias(&mut self, alias: &str) -> &mut Self {
        let quoted = self.quote(alias);
        self.scope.set_text(Clause::Alias, quoted);
        self
    }

    /// The column this builder yields when used as a subquery.
    pub fn sub_column(&mut self, column: &str) -> &mut Self {
        self.scope.set_sub_column(column);
        self
    }

    /// `join <table> as <alias> on (...)`.
    pub fn join(&mut self, table: &str, on: impl Into<JoinOn>, alias: Option<&str>) -> &mut Self {
        self.push_join(JoinType::Join, table, on.into(), alias)
    }

    pub fn inner_join(
        &mut self,
        table: &str,
        on: impl Into<JoinOn>,
        alias: Option<&str>,
    ) -> &mut Self {
        self.push_join(JoinType::Inner, table, on.into(), alias)
    }

    pub fn left_join(
        &mut self,
        table: &str,
        on: impl Into<JoinOn>,
        alias: Option<&str>,
    ) -> &mut Self {
        self.push_join(JoinType::Left, table, on.into(), alias)
    }

    pub fn right_join(
        &mut self,
        table: &str,
        on: impl Into<JoinOn>,
        alias: Option<&str>,
    ) -> &mut Self {
        self.push_join(JoinType::Right, table, on.into(), alias)
    }

    /// Join with a raw ON expression and any of the supported join types.
    ///
    /// An unknown `join_type` is reported by the next terminal call.
    pub fn join_raw(
        &mut self,
        table: &str,
        on: &str,
        alias: Option<&str>,
        join_type: &str,
    ) -> &mut Self {
        match join_type.parse::<JoinType>() {
            Ok(join_type) => self.push_join(join_type, table, JoinOn::from(on), alias),
            Err(err) => {
                self.defer(err);
                self
            }
        }
    }

    pub fn group_by(&mut self, column: &str) -> &mut Self {
        let field = self.field(column);
        self.scope.append_text(Clause::GroupBy, field);
        self
    }

    pub fn group_by_raw(&mut self, expr: &str) -> &mut Self {
        self.scope.append_text(Clause::GroupBy, expr);
        self
    }

    pub fn order_by(&mut self, column: &str) -> &mut Self {
        let field = self.field(column);
        self.scope.append_text(Clause::OrderBy, field);
        self
    }

    pub fn order_by_desc(&mut self, column: &str) -> &mut Self {
        let field = format!("{} desc", self.field(column));
        self.scope.append_text(Clause::OrderBy, field);
        self
    }

    pub fn order_by_raw(&mut self, expr: &str) -> &mut Self {
        self.scope.append_text(Clause::OrderBy, expr);
        self
    }

    /// Row count. Rendered as `limit n` or `top n` by the dialect.
    pub fn limit(&mut self, n: u64) -> &mut Self {
        self.scope.set_row_count(n);
        self
    }

    pub fn offset(&mut self, m: u64) -> &mut Self {
        self.scope.set_offset(m);
        self
    }

    /// Page `page` (1-based) of `per` rows, as the dialect defines it.
    pub fn page(&mut self, page: u64, per: u64) -> &mut Self {
        self.dialect.page(&mut self.scope, page, per);
        self
    }

    /// `for update`. Only dialects with a lock clause render it.
    pub fn lock_for_update(&mut self) -> &mut Self {
        self.scope.set_text(Clause::Lock, "for update");
        self
    }

    /// `lock in share mode`. Only dialects with a lock clause render it.
    pub fn lock_in_share_mode(&mut self) -> &mut Self {
        self.scope.set_text(Clause::Lock, "lock in share mode");
        self
    }

    pub(crate) fn field(&self, column: &str) -> String {
        decode_field(&self.dialect, column, None)
    }

    /// `function(column) as alias`; the alias defaults to the column and `*`
    /// is never quoted.
    pub(crate) fn aggregate_expr(&self, function: &str, column: &str) -> String {
        let column = column.trim();
        if column == "*" {
            format!("{function}(*)")
        } else {
            format!("{function}({})", self.field(column))
        }
    }

    fn aggregate_column(&mut self, function: &str, column: &str, alias: &str) -> &mut Self {
        let alias = if alias.is_empty() { column } else { alias };
        let expr = format!(
            "{} as {}",
            self.aggregate_expr(function, column),
            self.quote(alias.trim())
        );
        self.scope.append_text(Clause::Columns, expr);
        self
    }

    fn push_join(
        &mut self,
        join_type: JoinType,
        table: &str,
        on: JoinOn,
        alias: Option<&str>,
    ) -> &mut Self {
        if !table.trim().is_empty() {
            self.scope.push_join(JoinEntry {
                join_type,
                table: table.trim().to_string(),
                on,
                alias: alias.filter(|a| !a.is_empty()).map(str::to_string),
            });
        }
        self
    }
}
