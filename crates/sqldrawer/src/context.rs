//! Shared execution context.
//!
//! An [`ExecContext`] carries what every builder created from it shares: the
//! statement observer, the print flag, the transaction request flag and the
//! active transaction handle. Use one per process or one per thread.
//!
//! # Example
//!
//! ```ignore
//! use sqldrawer::ExecContext;
//!
//! let ctx = ExecContext::new();
//! let moved = ctx.with_transaction(|| {
//!     db.mysql("account").where_(Filter::map([("id", 1)])).update([("balance", 0)])?;
//!     db.mysql("ledger").insert([("account", 1), ("amount", 100)])
//! })?;
//! ```

use crate::client::Connection;
use crate::error::{DrawerError, DrawerResult};
use crate::monitor::QueryObserver;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

#[derive(Default)]
pub struct ExecContext {
    observer: RwLock<Option<Arc<dyn QueryObserver>>>,
    print: AtomicBool,
    transaction: AtomicBool,
    active: Mutex<Option<Arc<dyn Connection>>>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe every statement run through this context.
    pub fn listen<O: QueryObserver + 'static>(&self, observer: O) {
        self.listen_arc(Arc::new(observer));
    }

    pub fn listen_arc(&self, observer: Arc<dyn QueryObserver>) {
        *self
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    /// Remove the observer.
    pub fn unlisten(&self) {
        *self
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn observer(&self) -> Option<Arc<dyn QueryObserver>> {
        self.observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write every statement's interpolated SQL to stdout.
    pub fn print(&self) {
        self.set_print(true);
    }

    pub fn set_print(&self, enabled: bool) {
        self.print.store(enabled, Ordering::Relaxed);
    }

    pub fn is_print(&self) -> bool {
        self.print.load(Ordering::Relaxed)
    }

    /// Request a transaction. The next statement that reaches a connection
    /// not already in a transaction begins one there.
    pub fn begin_transaction(&self) {
        self.transaction.store(true, Ordering::SeqCst);
    }

    pub fn is_transaction_requested(&self) -> bool {
        self.transaction.load(Ordering::SeqCst)
    }

    /// The connection holding the active transaction, if one was begun.
    pub fn active_transaction(&self) -> Option<Arc<dyn Connection>> {
        self.active_slot().clone()
    }

    pub(crate) fn set_active_transaction(&self, connection: Arc<dyn Connection>) {
        *self.active_slot() = Some(connection);
    }

    /// Commit the active transaction.
    ///
    /// Returns `false` when there is none or it is no longer open.
    pub fn commit(&self) -> DrawerResult<bool> {
        self.finish(|conn| conn.commit(), "commit")
    }

    /// Roll back the active transaction.
    ///
    /// Returns `false` when there is none or it is no longer open.
    pub fn roll_back(&self) -> DrawerResult<bool> {
        self.finish(|conn| conn.roll_back(), "rollback")
    }

    /// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
    pub fn with_transaction<T>(&self, f: impl FnOnce() -> DrawerResult<T>) -> DrawerResult<T> {
        self.begin_transaction();
        match f() {
            Ok(value) => {
                let committed = self.commit();
                if committed.is_err() {
                    if let Err(rollback) = self.roll_back() {
                        tracing::warn!(
                            target: "sqldrawer.sql",
                            error = %rollback,
                            "rollback after failed commit failed"
                        );
                    }
                }
                self.transaction.store(false, Ordering::SeqCst);
                committed?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.roll_back() {
                    tracing::warn!(
                        target: "sqldrawer.sql",
                        error = %rollback,
                        "rollback after failed transaction body failed"
                    );
                }
                self.transaction.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    fn finish(
        &self,
        action: impl FnOnce(&dyn Connection) -> Result<(), crate::error::DriverError>,
        name: &str,
    ) -> DrawerResult<bool> {
        let mut slot = self.active_slot();
        let Some(conn) = slot.as_ref().filter(|c| c.in_transaction()).cloned() else {
            return Ok(false);
        };

        // The slot is held across the driver call so a failed commit keeps
        // the handle for a later rollback.
        match action(conn.as_ref()) {
            Ok(()) => {
                *slot = None;
                self.transaction.store(false, Ordering::SeqCst);
                tracing::debug!(target: "sqldrawer.sql", "transaction {name}");
                Ok(true)
            }
            Err(err) => {
                if !conn.in_transaction() {
                    *slot = None;
                }
                Err(DrawerError::Transaction(err))
            }
        }
    }

    fn active_slot(&self) -> MutexGuard<'_, Option<Arc<dyn Connection>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecContext")
            .field("observer", &self.observer().is_some())
            .field("print", &self.is_print())
            .field("transaction", &self.is_transaction_requested())
            .field("active", &self.active_transaction().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::NoopObserver;

    #[test]
    fn observer_can_be_replaced_and_removed() {
        let ctx = ExecContext::new();
        assert!(ctx.observer().is_none());
        ctx.listen(NoopObserver);
        assert!(ctx.observer().is_some());
        ctx.unlisten();
        assert!(ctx.observer().is_none());
    }

    #[test]
    fn flags_start_cleared() {
        let ctx = ExecContext::new();
        assert!(!ctx.is_print());
        assert!(!ctx.is_transaction_requested());
        ctx.print();
        ctx.begin_transaction();
        assert!(ctx.is_print());
        assert!(ctx.is_transaction_requested());
    }

    #[test]
    fn with_transaction_clears_an_unused_request() {
        let ctx = ExecContext::new();
        assert_eq!(ctx.with_transaction(|| Ok(3)).unwrap(), 3);
        assert!(!ctx.is_transaction_requested());

        let err = ctx
            .with_transaction(|| -> DrawerResult<()> { Err(DrawerError::usage("boom")) })
            .unwrap_err();
        assert!(err.is_usage());
        assert!(!ctx.is_transaction_requested());
    }
}
