//! Statement execution.
//!
//! The executor takes a compiled statement through observers, printing and
//! the sql-only short circuits, then runs it on a pooled connection and shapes
//! the result according to the operation kind.

use crate::compiler::Compiled;
use crate::context::ExecContext;
use crate::error::{DrawerError, DrawerResult};
use crate::monitor::QueryObserver;
use crate::operation::{Operation, ResultShape};
use crate::pool::{ConnectionConfig, ConnectionPool};
use crate::row::Record;
use crate::value::Value;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// What a terminal call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Template or interpolated SQL from the sql-only modes.
    Sql(String),
    /// Affected row count.
    Affected(u64),
    /// Driver's last insert id.
    LastInsertId(Value),
    /// Full result set.
    Rows(Vec<Record>),
    /// First row; empty when nothing matched.
    Record(Record),
    /// First column of the first row; `Null` when nothing matched.
    Scalar(Value),
}

impl QueryOutput {
    pub fn is_sql(&self) -> bool {
        matches!(self, Self::Sql(_))
    }

    pub fn as_sql(&self) -> Option<&str> {
        match self {
            Self::Sql(sql) => Some(sql),
            _ => None,
        }
    }

    pub fn into_sql(self) -> Option<String> {
        match self {
            Self::Sql(sql) => Some(sql),
            _ => None,
        }
    }

    pub fn affected(&self) -> Option<u64> {
        match self {
            Self::Affected(n) => Some(*n),
            _ => None,
        }
    }

    pub fn into_last_insert_id(self) -> Option<Value> {
        match self {
            Self::LastInsertId(id) => Some(id),
            _ => None,
        }
    }

    pub fn into_rows(self) -> Option<Vec<Record>> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_scalar(self) -> Option<Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Reduce a single-record output to its first value.
    pub(crate) fn first_value(self) -> Self {
        match self {
            Self::Record(record) => Self::Scalar(record.into_first().unwrap_or(Value::Null)),
            other => other,
        }
    }
}

/// Replace each `?` with the inline literal of the matching binding.
///
/// Surplus markers are left as they are.
pub fn interpolate(template: &str, bindings: &[Value]) -> String {
    let mut out = String::with_capacity(template.len() + bindings.len() * 8);
    let mut values = bindings.iter();
    for ch in template.chars() {
        match ch {
            '?' => match values.next() {
                Some(value) => out.push_str(&value.to_sql_inline()),
                None => out.push('?'),
            },
            _ => out.push(ch),
        }
    }
    out
}

/// Per-builder execution switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecMode {
    /// Return the template without touching a connection.
    pub sql_only: bool,
    /// Return the interpolated SQL without touching a connection.
    pub complete_sql: bool,
    /// Print the interpolated SQL.
    pub print: bool,
}

impl ExecMode {
    pub fn short_circuits(&self) -> bool {
        self.sql_only || self.complete_sql
    }
}

/// One statement handed to the [`Executor`].
pub struct ExecRequest<'a> {
    pub operation: Operation,
    pub compiled: &'a Compiled,
    pub config: &'a ConnectionConfig,
    pub mode: ExecMode,
    pub observer: Option<&'a dyn QueryObserver>,
}

/// Runs compiled statements.
#[derive(Clone)]
pub struct Executor {
    context: Arc<ExecContext>,
    pool: Arc<dyn ConnectionPool>,
}

impl Executor {
    pub fn new(context: Arc<ExecContext>, pool: Arc<dyn ConnectionPool>) -> Self {
        Self { context, pool }
    }

    pub fn context(&self) -> &Arc<ExecContext> {
        &self.context
    }

    pub fn pool(&self) -> &Arc<dyn ConnectionPool> {
        &self.pool
    }

    pub fn execute(&self, request: ExecRequest<'_>) -> DrawerResult<QueryOutput> {
        let ExecRequest {
            operation,
            compiled,
            config,
            mode,
            observer,
        } = request;
        let sql = interpolate(&compiled.sql, &compiled.bindings);

        if let Some(global) = self.context.observer() {
            notify(global.as_ref(), &sql, compiled);
        }
        if let Some(local) = observer {
            notify(local, &sql, compiled);
        }

        if mode.print || self.context.is_print() {
            println!("{sql}");
        }

        if mode.sql_only {
            return Ok(QueryOutput::Sql(compiled.sql.clone()));
        }
        if mode.complete_sql {
            return Ok(QueryOutput::Sql(sql));
        }

        self.run(operation, compiled, config)
    }

    fn run(
        &self,
        operation: Operation,
        compiled: &Compiled,
        config: &ConnectionConfig,
    ) -> DrawerResult<QueryOutput> {
        let conn = self.pool.acquire(config)?;

        if self.context.is_transaction_requested() && !conn.in_transaction() {
            conn.begin_transaction().map_err(DrawerError::Transaction)?;
            self.context.set_active_transaction(Arc::clone(&conn));
            tracing::debug!(target: "sqldrawer.sql", "transaction begin");
        }

        tracing::debug!(
            target: "sqldrawer.sql",
            operation = %operation,
            param_count = compiled.bindings.len(),
            sql = %compiled.sql,
            "executing statement"
        );

        let mut stmt = conn
            .prepare(&compiled.sql)
            .map_err(DrawerError::Preparation)?;
        for (index, value) in compiled.bindings.iter().enumerate() {
            stmt.bind(index + 1, value).map_err(DrawerError::Binding)?;
        }
        stmt.execute().map_err(DrawerError::Execution)?;

        let output = match operation.shape() {
            ResultShape::RowCount => {
                QueryOutput::Affected(stmt.row_count().map_err(DrawerError::Fetch)?)
            }
            ResultShape::LastId => {
                QueryOutput::LastInsertId(conn.last_insert_id().map_err(DrawerError::Fetch)?)
            }
            ResultShape::Rows => QueryOutput::Rows(stmt.fetch_all().map_err(DrawerError::Fetch)?),
            ResultShape::Single => QueryOutput::Record(
                stmt.fetch()
                    .map_err(DrawerError::Fetch)?
                    .unwrap_or_default(),
            ),
        };
        Ok(output)
    }
}

/// Call an observer; a panic inside it is logged and swallowed.
fn notify(observer: &dyn QueryObserver, sql: &str, compiled: &Compiled) {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        observer.on_query(sql, &compiled.sql, &compiled.bindings)
    }));
    if outcome.is_err() {
        tracing::warn!(target: "sqldrawer.sql", sql = %compiled.sql, "query observer panicked");
    }
}
