//! In-memory driver used by the integration tests.

#![allow(dead_code)]

use sqldrawer::{
    Connection, ConnectionConfig, Connector, Database, DriverError, Record, Statement, Value,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Which driver call should fail next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Prepare,
    Bind,
    Execute,
    Begin,
    Commit,
}

/// Everything the mock connections record, shared by every connection the
/// factory opens.
#[derive(Default)]
pub struct DriverState {
    pub connects: AtomicUsize,
    pub prepared: Mutex<Vec<String>>,
    pub bound: Mutex<Vec<Vec<(usize, Value)>>>,
    pub results: Mutex<VecDeque<Vec<Record>>>,
    pub affected: AtomicU64,
    pub last_id: Mutex<Option<Value>>,
    pub in_transaction: AtomicBool,
    pub begins: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
    pub failure: Mutex<Option<Failure>>,
}

impl DriverState {
    /// Queue the rows returned by the next executed statement.
    pub fn push_result(&self, rows: Vec<Record>) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub fn fail_next(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn prepared(&self) -> Vec<String> {
        self.prepared.lock().unwrap().clone()
    }

    pub fn bound(&self) -> Vec<Vec<(usize, Value)>> {
        self.bound.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    fn take_failure(&self, at: Failure) -> Option<DriverError> {
        let mut failure = self.failure.lock().unwrap();
        if *failure == Some(at) {
            *failure = None;
            Some(DriverError::with_code("HY000", format!("mock {at:?} failure")))
        } else {
            None
        }
    }
}

pub struct MockConnection {
    state: Arc<DriverState>,
}

impl Connection for MockConnection {
    fn prepare(&self, sql: &str) -> Result<Box<dyn Statement + '_>, DriverError> {
        if let Some(err) = self.state.take_failure(Failure::Prepare) {
            return Err(err);
        }
        self.state.prepared.lock().unwrap().push(sql.to_string());
        self.state.bound.lock().unwrap().push(Vec::new());
        Ok(Box::new(MockStatement {
            state: &self.state,
            rows: VecDeque::new(),
        }))
    }

    fn in_transaction(&self) -> bool {
        self.state.in_transaction.load(Ordering::SeqCst)
    }

    fn begin_transaction(&self) -> Result<(), DriverError> {
        if let Some(err) = self.state.take_failure(Failure::Begin) {
            return Err(err);
        }
        self.state.begins.fetch_add(1, Ordering::SeqCst);
        self.state.in_transaction.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn commit(&self) -> Result<(), DriverError> {
        if let Some(err) = self.state.take_failure(Failure::Commit) {
            return Err(err);
        }
        self.state.commits.fetch_add(1, Ordering::SeqCst);
        self.state.in_transaction.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn roll_back(&self) -> Result<(), DriverError> {
        self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.state.in_transaction.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn last_insert_id(&self) -> Result<Value, DriverError> {
        Ok(self.state.last_id.lock().unwrap().clone().unwrap_or(Value::Null))
    }
}

struct MockStatement<'a> {
    state: &'a DriverState,
    rows: VecDeque<Record>,
}

impl Statement for MockStatement<'_> {
    fn bind(&mut self, position: usize, value: &Value) -> Result<(), DriverError> {
        if let Some(err) = self.state.take_failure(Failure::Bind) {
            return Err(err);
        }
        if let Some(last) = self.state.bound.lock().unwrap().last_mut() {
            last.push((position, value.clone()));
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<(), DriverError> {
        if let Some(err) = self.state.take_failure(Failure::Execute) {
            return Err(err);
        }
        self.rows = self
            .state
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default()
            .into();
        Ok(())
    }

    fn row_count(&self) -> Result<u64, DriverError> {
        Ok(self.state.affected.load(Ordering::SeqCst))
    }

    fn fetch(&mut self) -> Result<Option<Record>, DriverError> {
        Ok(self.rows.pop_front())
    }
}

/// A database over a fresh mock driver.
pub fn database() -> (Database, Arc<DriverState>) {
    let state = Arc::new(DriverState::default());
    let shared = Arc::clone(&state);
    let connector = Connector::new(
        move |_config: &ConnectionConfig| -> Result<Arc<dyn Connection>, DriverError> {
            shared.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockConnection {
                state: Arc::clone(&shared),
            }))
        },
    );
    (Database::new(connector), state)
}

pub fn mysql_config() -> ConnectionConfig {
    ConnectionConfig::new("mysql")
        .host("127.0.0.1")
        .port(3306)
        .database("blog")
}

pub fn sqlserver_config() -> ConnectionConfig {
    ConnectionConfig::new("sqlsrv")
        .host("127.0.0.1")
        .port(1433)
        .database("blog")
}
