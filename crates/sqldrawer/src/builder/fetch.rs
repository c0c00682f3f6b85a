//! Reading terminals and the paginator.

use super::Builder;
use crate::dialect::Dialect;
use crate::error::{DrawerError, DrawerResult};
use crate::executor::QueryOutput;
use crate::operation::{Aggregate, AggregateCall, Operation};
use crate::pagination::{Paginated, has_next_page};

impl<D: Dialect> Builder<D> {
    /// The first matching row; an empty record when nothing matches.
    ///
    /// The statement runs with a row count of 1. Any row count set earlier
    /// is restored afterwards.
    pub fn fetch(&mut self) -> DrawerResult<QueryOutput> {
        let previous = self.scope.replace_row_count(Some(1));
        let out = self.run(Operation::Fetch);
        self.scope.replace_row_count(previous);
        out
    }

    /// Every matching row.
    pub fn fetch_all(&mut self) -> DrawerResult<QueryOutput> {
        self.run(Operation::FetchAll)
    }

    pub fn fetch_min(&mut self, column: &str) -> DrawerResult<QueryOutput> {
        self.fetch_aggregate(AggregateCall::Min, column)
    }

    pub fn fetch_max(&mut self, column: &str) -> DrawerResult<QueryOutput> {
        self.fetch_aggregate(AggregateCall::Max, column)
    }

    pub fn fetch_sum(&mut self, column: &str) -> DrawerResult<QueryOutput> {
        self.fetch_aggregate(AggregateCall::Sum, column)
    }

    pub fn fetch_avg(&mut self, column: &str) -> DrawerResult<QueryOutput> {
        self.fetch_aggregate(AggregateCall::Avg, column)
    }

    /// `count(*)` over the current filters.
    pub fn fetch_count(&mut self) -> DrawerResult<QueryOutput> {
        self.fetch_aggregate(AggregateCall::Count, "*")
    }

    /// Distinct values of `column`, as rows.
    pub fn fetch_distinct(&mut self, column: &str) -> DrawerResult<QueryOutput> {
        self.fetch_aggregate(AggregateCall::Distinct, column)
    }

    /// Dispatch by name: `fetchMin`, `fetchCount`, ... or `min`, `count`, ...
    ///
    /// Unknown names are a usage error.
    pub fn fetch_named(&mut self, name: &str, column: &str) -> DrawerResult<QueryOutput> {
        let call = name.parse::<AggregateCall>()?;
        self.fetch_aggregate(call, column)
    }

    /// Run one aggregate with the columns clause replaced by the aggregate
    /// expression. Single-value aggregates come back as [`QueryOutput::Scalar`].
    pub fn fetch_aggregate(&mut self, call: AggregateCall, column: &str) -> DrawerResult<QueryOutput> {
        let op = call.operation();
        let function = match op {
            Operation::Aggregate(agg) => agg.name(),
            _ => "distinct",
        };
        let columns = self.aggregate_expr(function, column);
        let output = self.run_with_columns(op, Some(&columns))?;
        Ok(output.first_value())
    }

    /// Count the matches, then fetch page `page` of `per` rows.
    ///
    /// The count replaces the selected columns for that one statement only;
    /// the page itself uses whatever was selected before.
    ///
    /// The list is fetched only when [`has_next_page`] holds; otherwise it is
    /// empty. Not available with `to_sql` / `to_complete_sql`.
    pub fn paginator(&mut self, page: u64, per: u64) -> DrawerResult<Paginated> {
        if self.mode.short_circuits() {
            return Err(DrawerError::usage(
                "paginator() cannot run in to_sql or to_complete_sql mode",
            ));
        }

        let total = self
            .run_with_columns(Operation::Aggregate(Aggregate::Count), Some("count(*)"))?
            .first_value()
            .into_scalar()
            .and_then(|v| v.as_i64())
            .map_or(0, |n| u64::try_from(n).unwrap_or(0));

        if !has_next_page(total, page, per) {
            return Ok(Paginated::empty(total));
        }

        self.page(page, per);
        let list = self.fetch_all()?.into_rows().unwrap_or_default();
        Ok(Paginated { total, list })
    }
}
