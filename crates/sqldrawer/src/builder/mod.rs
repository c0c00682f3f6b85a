//! Fluent statement builder.
//!
//! A [`Builder`] accumulates clauses for one table through chained `&mut self`
//! calls and compiles them when a terminal method (`fetch_all`, `update`,
//! `insert`, ...) runs. The same surface serves every dialect; dialect-only
//! methods live in `impl Builder<MySql>` / `impl Builder<SqlServer>` blocks.
//!
//! ## Design
//!
//! - Chaining never fails. Usage mistakes found while chaining (bad join
//!   type, inconsistent insert rows) are recorded and returned by the next
//!   terminal call before anything reaches the driver.
//! - Terminal calls drain the pending bindings; clause text stays, so a
//!   builder can be reused or [`reset`](Builder::reset).
//!
//! # Example
//!
//! ```ignore
//! use sqldrawer::prelude::*;
//!
//! let mut article = db.mysql("article");
//! let rows = article
//!     .select(["id", "title"])
//!     .where_(Filter::map([("state", 1)]))
//!     .where_in("type", [1, 2, 3])
//!     .order_by_desc("id")
//!     .limit(10)
//!     .fetch_all()?;
//! ```

mod fetch;
mod filter;
mod mysql;
mod select;
mod sqlserver;
mod write;

#[cfg(test)]
mod tests;

use crate::compiler::{Compiled, ExpressionCompiler};
use crate::condition::{Fragment, Operand, Subquery, Subselect};
use crate::dialect::Dialect;
use crate::error::{DrawerError, DrawerResult};
use crate::executor::{ExecMode, ExecRequest, Executor, QueryOutput};
use crate::ident::Columns;
use crate::monitor::QueryObserver;
use crate::operation::Operation;
use crate::pool::ConnectionConfig;
use crate::scope::Scope;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A statement builder for one table in dialect `D`.
pub struct Builder<D: Dialect> {
    dialect: D,
    table: String,
    config: ConnectionConfig,
    scope: Scope,
    mode: ExecMode,
    observer: Option<Arc<dyn QueryObserver>>,
    build_error: Option<DrawerError>,
    last_bindings: Vec<Value>,
    executor: Executor,
}

impl<D: Dialect> Builder<D> {
    pub fn new(table: impl Into<String>, config: ConnectionConfig, executor: Executor) -> Self {
        Self {
            dialect: D::default(),
            table: table.into(),
            config,
            scope: Scope::new(),
            mode: ExecMode::default(),
            observer: None,
            build_error: None,
            last_bindings: Vec::new(),
            executor,
        }
    }

    /// The unquoted table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Switch the table. Accumulated clauses are kept.
    pub fn set_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    /// The connection configuration statements run against.
    pub fn connection(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Bindings of the most recent terminal call.
    pub fn prepared_bindings(&self) -> &[Value] {
        &self.last_bindings
    }

    /// Terminal calls return the `?` template instead of running.
    pub fn to_sql(&mut self) -> &mut Self {
        self.mode.sql_only = true;
        self
    }

    /// Terminal calls return the SQL with bindings inlined instead of running.
    pub fn to_complete_sql(&mut self) -> &mut Self {
        self.mode.complete_sql = true;
        self
    }

    /// Print each statement's interpolated SQL to stdout.
    pub fn print(&mut self) -> &mut Self {
        self.mode.print = true;
        self
    }

    /// Observe statements run by this builder only.
    pub fn listen<O: QueryObserver + 'static>(&mut self, observer: O) -> &mut Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Back to an empty scope. Modes and the observer are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.scope.reset();
        self.build_error = None;
        self.last_bindings.clear();
        self
    }

    /// Compile `op` without running it or draining anything.
    pub fn compile(&self, op: Operation) -> DrawerResult<Compiled> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        ExpressionCompiler::new(&self.dialect, &self.table, &self.scope).compile(op)
    }

    /// Record the first usage error found while chaining.
    pub(crate) fn defer(&mut self, err: DrawerError) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    pub(crate) fn quote(&self, name: &str) -> String {
        self.dialect.quote(name)
    }

    pub(crate) fn run(&mut self, op: Operation) -> DrawerResult<QueryOutput> {
        self.run_with_columns(op, None)
    }

    /// Compile, drain the pending bindings and execute.
    pub(crate) fn run_with_columns(
        &mut self,
        op: Operation,
        columns: Option<&str>,
    ) -> DrawerResult<QueryOutput> {
        if let Some(err) = self.build_error.take() {
            self.scope.take_bindings();
            return Err(err);
        }

        let compiled = ExpressionCompiler::new(&self.dialect, &self.table, &self.scope)
            .compile_with_columns(op, columns);
        self.scope.take_bindings();
        let compiled = compiled?;
        self.last_bindings.clone_from(&compiled.bindings);

        self.executor.execute(ExecRequest {
            operation: op,
            compiled: &compiled,
            config: &self.config,
            mode: self.mode,
            observer: self.observer.as_deref(),
        })
    }
}

impl<D: Dialect> Clone for Builder<D> {
    fn clone(&self) -> Self {
        Self {
            dialect: self.dialect.clone(),
            table: self.table.clone(),
            config: self.config.clone(),
            scope: self.scope.clone(),
            mode: self.mode,
            observer: self.observer.clone(),
            build_error: self.build_error.clone(),
            last_bindings: self.last_bindings.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl<D: Dialect> fmt::Debug for Builder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("dialect", &self.dialect.name())
            .field("table", &self.table)
            .field("scope", &self.scope)
            .field("mode", &self.mode)
            .field("build_error", &self.build_error)
            .finish_non_exhaustive()
    }
}

impl<D: Dialect> Subselect for Builder<D> {
    fn compile_subselect(&self) -> DrawerResult<Fragment> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let sub_column = self.scope.sub_column().ok_or_else(|| {
            DrawerError::usage(format!(
                "Subquery on {} has no sub-column; call sub_column() first",
                self.table
            ))
        })?;
        let columns = Columns::from(sub_column).to_expr(&self.dialect);
        let compiled = ExpressionCompiler::new(&self.dialect, &self.table, &self.scope)
            .compile_with_columns(Operation::FetchAll, Some(&columns))?;
        Ok(Fragment::new(compiled.sql, compiled.bindings))
    }
}

impl<D: Dialect> From<Builder<D>> for Operand {
    fn from(builder: Builder<D>) -> Self {
        Operand::Subquery(Subquery::new(builder))
    }
}

impl<D: Dialect> From<Builder<D>> for Subquery {
    fn from(builder: Builder<D>) -> Self {
        Subquery::new(builder)
    }
}
