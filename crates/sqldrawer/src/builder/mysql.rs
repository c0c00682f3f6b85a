//! MySQL-only builder methods.

use super::Builder;
use super::write::collect_row;
use crate::dialect::MySql;
use crate::error::DrawerResult;
use crate::executor::QueryOutput;
use crate::operation::Operation;
use crate::scope::Clause;
use crate::value::Value;

impl Builder<MySql> {
    /// `replace into <table> (...) values (...)`. Returns the affected row count.
    pub fn replace<K, V>(&mut self, row: impl IntoIterator<Item = (K, V)>) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.write_rows(Operation::Replace, vec![collect_row(row)])
    }

    /// Replace several rows in one statement.
    pub fn replace_many<K, V, R>(&mut self, rows: impl IntoIterator<Item = R>) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
        R: IntoIterator<Item = (K, V)>,
    {
        let rows = rows.into_iter().map(collect_row).collect();
        self.write_rows(Operation::Replace, rows)
    }

    /// Replace one row and return the driver's last insert id.
    pub fn replace_get_id<K, V>(
        &mut self,
        row: impl IntoIterator<Item = (K, V)>,
    ) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.write_rows(Operation::ReplaceGetId, vec![collect_row(row)])
    }

    /// `json_arrayagg(column) as column`, usually with `group_by`.
    ///
    /// ```ignore
    /// article.group_by("type").select("type").json_array_agg("id")?;
    /// // select `type`,json_arrayagg(`id`) as `id` from `article` group by `type`
    /// ```
    pub fn json_array_agg(&mut self, column: &str) -> DrawerResult<QueryOutput> {
        let expr = format!("json_arrayagg({}) as {}", self.field(column), self.quote(column));
        self.scope.append_text(Clause::Columns, expr);
        self.run(Operation::JsonArrayAgg)
    }

    /// `json_objectagg(key, value) as key`.
    pub fn json_object_agg(&mut self, key: &str, value: &str) -> DrawerResult<QueryOutput> {
        let expr = format!(
            "json_objectagg({},{}) as {}",
            self.field(key),
            self.field(value),
            self.quote(key)
        );
        self.scope.append_text(Clause::Columns, expr);
        self.run(Operation::JsonObjectAgg)
    }
}
