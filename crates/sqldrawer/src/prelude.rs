//! Common imports for building and running statements.
//!
//! ```ignore
//! use sqldrawer::prelude::*;
//! ```

pub use crate::builder::Builder;
pub use crate::condition::{Filter, Operand};
pub use crate::context::ExecContext;
pub use crate::database::Database;
pub use crate::dialect::{Dialect, MySql, SqlServer};
pub use crate::error::{DrawerError, DrawerResult};
pub use crate::executor::QueryOutput;
pub use crate::join::JoinOn;
pub use crate::monitor::{QueryObserver, StatsObserver, TracingObserver};
pub use crate::pagination::Paginated;
pub use crate::pool::{ConnectionConfig, Connector};
pub use crate::row::Record;
pub use crate::value::Value;
