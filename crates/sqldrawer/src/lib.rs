//! # sqldrawer
//!
//! A fluent SQL statement compiler and executor for MySQL-style and
//! SQL-Server-style databases.
//!
//! ## Features
//!
//! - **Fluent builders**: chain clauses on a [`Builder`], finish with a terminal call
//! - **Two dialects**: [`MySql`] (backticks, `limit`/`offset`) and [`SqlServer`]
//!   (brackets, `top`, `offset .. rows fetch next .. rows only`)
//! - **Positional bindings**: every value is sent as a `?` parameter, in marker order
//! - **Driver agnostic**: plug any blocking driver in through [`Connection`] and
//!   [`ConnectionFactory`]
//! - **Query observing**: statement hooks, stats counters and `tracing` output
//! - **Explicit context**: observers, print and transaction flags live in an
//!   [`ExecContext`] rather than global state
//!
//! ## Example
//!
//! ```ignore
//! use sqldrawer::prelude::*;
//!
//! let db = Database::new(Connector::new(my_driver_factory));
//! let config = ConnectionConfig::new("mysql").host("127.0.0.1").database("blog");
//!
//! // SELECT
//! let rows = db
//!     .mysql("article", config.clone())
//!     .select(["id", "title"])
//!     .where_(Filter::map([("state", 1)]))
//!     .order_by_desc("id")
//!     .limit(10)
//!     .fetch_all()?;
//!
//! // UPDATE
//! db.mysql("article", config.clone())
//!     .where_(Filter::map([("id", 1)]))
//!     .update([("title", "ABC")])?;
//!
//! // Just the SQL
//! let sql = db
//!     .sqlserver("article", config)
//!     .to_sql()
//!     .top(5)
//!     .fetch_all()?
//!     .into_sql();
//! ```

pub mod builder;
pub mod client;
pub mod compiler;
pub mod condition;
pub mod context;
pub mod database;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod ident;
pub mod join;
pub mod monitor;
pub mod operation;
pub mod pagination;
pub mod pool;
pub mod prelude;
pub mod row;
pub mod scope;
pub mod value;

pub use builder::Builder;
pub use client::{Connection, Statement};
pub use compiler::{Compiled, ExpressionCompiler};
pub use condition::{Connective, Filter, Operand, Operator, Subquery};
pub use context::ExecContext;
pub use database::Database;
pub use dialect::{Dialect, MySql, SqlServer};
pub use error::{DrawerError, DrawerResult, DriverError};
pub use executor::{QueryOutput, interpolate};
pub use ident::{Columns, FieldQuoter};
pub use join::{JoinOn, JoinType};
pub use monitor::{
    CompositeObserver, NoopObserver, QueryObserver, QueryStats, QueryType, StatsObserver,
    TracingObserver,
};
pub use operation::{Aggregate, AggregateCall, Operation};
pub use pagination::{Paginated, has_next_page};
pub use pool::{ConnectionConfig, ConnectionFactory, ConnectionPool, Connector};
pub use row::Record;
pub use value::Value;
