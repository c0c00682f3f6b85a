//! Driver interface.
//!
//! The crate does not talk to a database itself. Integrators implement
//! [`Connection`] and [`Statement`] over their driver of choice and hand
//! connections out through a [`ConnectionFactory`](crate::pool::ConnectionFactory).
//! All calls block the caller.

use crate::error::DriverError;
use crate::row::Record;
use crate::value::Value;

/// A live database connection.
pub trait Connection: Send + Sync {
    /// Prepare a `?`-parameterized statement.
    fn prepare(&self, sql: &str) -> Result<Box<dyn Statement + '_>, DriverError>;

    /// Whether a transaction is currently open on this connection.
    fn in_transaction(&self) -> bool;

    fn begin_transaction(&self) -> Result<(), DriverError>;

    fn commit(&self) -> Result<(), DriverError>;

    fn roll_back(&self) -> Result<(), DriverError>;

    /// Id generated by the most recent insert on this connection.
    fn last_insert_id(&self) -> Result<Value, DriverError>;
}

/// A prepared statement.
pub trait Statement {
    /// Bind `value` at a 1-based `position`.
    fn bind(&mut self, position: usize, value: &Value) -> Result<(), DriverError>;

    fn execute(&mut self) -> Result<(), DriverError>;

    /// Rows affected by the last execution.
    fn row_count(&self) -> Result<u64, DriverError>;

    /// Next row, or `None` when the result set is exhausted.
    fn fetch(&mut self) -> Result<Option<Record>, DriverError>;

    /// All remaining rows.
    fn fetch_all(&mut self) -> Result<Vec<Record>, DriverError> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch()? {
            rows.push(row);
        }
        Ok(rows)
    }
}
