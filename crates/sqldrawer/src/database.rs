//! Entry point tying a context and a connection pool together.

use crate::builder::Builder;
use crate::context::ExecContext;
use crate::dialect::{Dialect, MySql, SqlServer};
use crate::error::DrawerResult;
use crate::executor::Executor;
use crate::monitor::QueryObserver;
use crate::pool::{ConnectionConfig, ConnectionPool};
use std::sync::Arc;

/// Creates builders that share one [`ExecContext`] and one pool.
///
/// # Example
///
/// ```ignore
/// use sqldrawer::prelude::*;
///
/// let db = Database::new(Connector::new(MyDriverFactory::default()));
/// let config = ConnectionConfig::new("mysql").host("127.0.0.1").database("blog");
///
/// db.listen(TracingObserver::new());
/// let id = db.mysql("article", config.clone()).insert_get_id([("title", "hello")])?;
/// ```
#[derive(Clone)]
pub struct Database {
    context: Arc<ExecContext>,
    pool: Arc<dyn ConnectionPool>,
}

impl Database {
    /// A database with a fresh context.
    pub fn new<P: ConnectionPool + 'static>(pool: P) -> Self {
        Self::with_context(Arc::new(ExecContext::new()), Arc::new(pool))
    }

    pub fn with_context(context: Arc<ExecContext>, pool: Arc<dyn ConnectionPool>) -> Self {
        Self { context, pool }
    }

    pub fn context(&self) -> &Arc<ExecContext> {
        &self.context
    }

    /// A builder for `table` in any dialect.
    pub fn builder<D: Dialect>(&self, table: &str, config: ConnectionConfig) -> Builder<D> {
        Builder::new(table, config, self.executor())
    }

    pub fn mysql(&self, table: &str, config: ConnectionConfig) -> Builder<MySql> {
        self.builder(table, config)
    }

    pub fn sqlserver(&self, table: &str, config: ConnectionConfig) -> Builder<SqlServer> {
        self.builder(table, config)
    }

    /// See [`ExecContext::begin_transaction`].
    pub fn begin_transaction(&self) {
        self.context.begin_transaction();
    }

    pub fn commit(&self) -> DrawerResult<bool> {
        self.context.commit()
    }

    pub fn roll_back(&self) -> DrawerResult<bool> {
        self.context.roll_back()
    }

    pub fn with_transaction<T>(&self, f: impl FnOnce() -> DrawerResult<T>) -> DrawerResult<T> {
        self.context.with_transaction(f)
    }

    /// Print every statement run through this database.
    pub fn print(&self) {
        self.context.print();
    }

    /// Observe every statement run through this database.
    pub fn listen<O: QueryObserver + 'static>(&self, observer: O) {
        self.context.listen(observer);
    }

    fn executor(&self) -> Executor {
        Executor::new(Arc::clone(&self.context), Arc::clone(&self.pool))
    }
}
