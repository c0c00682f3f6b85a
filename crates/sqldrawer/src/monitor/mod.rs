//! Statement observers.
//!
//! Observers see every statement before it runs: the interpolated SQL, the
//! `?` template and the bindings. They are registered on an
//! [`ExecContext`](crate::context::ExecContext) or on a single builder.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqldrawer::monitor::{CompositeObserver, StatsObserver, TracingObserver};
//! use std::sync::Arc;
//!
//! let stats = Arc::new(StatsObserver::new());
//! let observer = CompositeObserver::new()
//!     .add(TracingObserver::new().level(tracing::Level::INFO))
//!     .add_arc(stats.clone());
//! db.listen(observer);
//!
//! db.mysql("article").fetch_all()?;
//! assert_eq!(stats.stats().select_count, 1);
//! ```

mod monitors;
mod tracing_hook;
mod types;

#[cfg(test)]
mod tests;

pub use monitors::{CompositeObserver, NoopObserver, QueryStats, StatsObserver};
pub use tracing_hook::TracingObserver;
pub use types::{QueryObserver, QueryType};
