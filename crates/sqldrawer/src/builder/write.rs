//! INSERT, UPDATE, DELETE and TRUNCATE.

use super::Builder;
use crate::dialect::Dialect;
use crate::error::{DrawerError, DrawerResult};
use crate::executor::QueryOutput;
use crate::operation::Operation;
use crate::scope::Clause;
use crate::value::Value;

type Row = Vec<(String, Value)>;

pub(crate) fn collect_row<K, V>(row: impl IntoIterator<Item = (K, V)>) -> Row
where
    K: Into<String>,
    V: Into<Value>,
{
    row.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

impl<D: Dialect> Builder<D> {
    /// Insert one row. Returns the affected row count.
    pub fn insert<K, V>(&mut self, row: impl IntoIterator<Item = (K, V)>) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.write_rows(Operation::Insert, vec![collect_row(row)])
    }

    /// Insert several rows in one statement.
    ///
    /// Every row must name the same columns; values are matched by name.
    pub fn insert_many<K, V, R>(&mut self, rows: impl IntoIterator<Item = R>) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
        R: IntoIterator<Item = (K, V)>,
    {
        let rows = rows.into_iter().map(collect_row).collect();
        self.write_rows(Operation::Insert, rows)
    }

    /// Insert one row and return the driver's last insert id.
    pub fn insert_get_id<K, V>(
        &mut self,
        row: impl IntoIterator<Item = (K, V)>,
    ) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.write_rows(Operation::InsertGetId, vec![collect_row(row)])
    }

    pub fn insert_many_get_id<K, V, R>(
        &mut self,
        rows: impl IntoIterator<Item = R>,
    ) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
        R: IntoIterator<Item = (K, V)>,
    {
        let rows = rows.into_iter().map(collect_row).collect();
        self.write_rows(Operation::InsertGetId, rows)
    }

    /// `update <table> set col = ?, ... where ...`.
    ///
    /// The SET bindings go ahead of any WHERE bindings chained earlier.
    pub fn update<K, V>(&mut self, columns: impl IntoIterator<Item = (K, V)>) -> DrawerResult<QueryOutput>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let columns = collect_row(columns);
        if columns.is_empty() {
            self.defer(DrawerError::usage("update() needs at least one column"));
        } else {
            self.set_columns(columns);
        }
        self.run(Operation::Update)
    }

    /// `update` from `"a = 1, b = text"`. Right-hand sides are bound as text.
    pub fn update_raw(&mut self, assignments: &str) -> DrawerResult<QueryOutput> {
        let mut columns = Row::new();
        for item in assignments.split(',').filter(|s| !s.trim().is_empty()) {
            match item.split_once('=') {
                Some((column, value)) => {
                    columns.push((column.trim().to_string(), Value::from(value.trim())))
                }
                None => {
                    self.defer(DrawerError::usage(format!(
                        "Malformed assignment in update_raw: {}",
                        item.trim()
                    )));
                }
            }
        }
        if columns.is_empty() {
            self.defer(DrawerError::usage("update_raw() needs at least one assignment"));
        } else {
            self.set_columns(columns);
        }
        self.run(Operation::Update)
    }

    pub fn delete(&mut self) -> DrawerResult<QueryOutput> {
        self.run(Operation::Delete)
    }

    pub fn truncate(&mut self) -> DrawerResult<QueryOutput> {
        self.run(Operation::Truncate)
    }

    fn set_columns(&mut self, columns: Row) {
        let set = columns
            .iter()
            .map(|(column, _)| format!("{} = ?", self.field(column.trim())))
            .collect::<Vec<_>>()
            .join(", ");
        self.scope.set_text(Clause::Set, set);
        self.scope
            .prepend_bindings(columns.into_iter().map(|(_, v)| v));
    }

    /// Render the insert head and one `(?,...)` group per row, then run.
    pub(crate) fn write_rows(&mut self, op: Operation, rows: Vec<Row>) -> DrawerResult<QueryOutput> {
        if let Err(err) = self.stage_rows(rows) {
            self.defer(err);
        }
        self.run(op)
    }

    fn stage_rows(&mut self, rows: Vec<Row>) -> DrawerResult<()> {
        let Some(head) = rows.first() else {
            return Err(DrawerError::usage("Nothing to insert"));
        };
        let names: Vec<String> = head.iter().map(|(name, _)| name.clone()).collect();
        if names.is_empty() {
            return Err(DrawerError::usage("Nothing to insert"));
        }

        let mut bindings = Vec::with_capacity(names.len() * rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(inconsistent_row(index));
            }
            let mut row = row;
            for name in &names {
                let position = row
                    .iter()
                    .position(|(column, _)| column == name)
                    .ok_or_else(|| inconsistent_row(index))?;
                bindings.push(row.swap_remove(position).1);
            }
        }

        let row_count = bindings.len() / names.len();
        let columns = names
            .iter()
            .map(|name| self.quote(name.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let group = format!("({})", vec!["?"; names.len()].join(","));

        self.scope.set_text(Clause::Insert, format!("({columns})"));
        self.scope
            .set_text(Clause::Values, vec![group; row_count].join(","));
        self.scope.push_bindings(bindings);
        Ok(())
    }
}

fn inconsistent_row(index: usize) -> DrawerError {
    DrawerError::usage(format!(
        "Insert row {index} does not name the same columns as row 0"
    ))
}
