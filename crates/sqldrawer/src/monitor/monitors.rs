use super::types::{QueryObserver, QueryType};
use crate::value::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// An observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn on_query(&self, _sql: &str, _template: &str, _bindings: &[Value]) {}
}

/// An observer that counts statements.
#[derive(Debug, Default)]
pub struct StatsObserver {
    total_queries: AtomicU64,
    total_bindings: AtomicU64,
    select_count: AtomicU64,
    insert_count: AtomicU64,
    replace_count: AtomicU64,
    update_count: AtomicU64,
    delete_count: AtomicU64,
    truncate_count: AtomicU64,
    other_count: AtomicU64,
    last_query: Mutex<Option<String>>,
}

/// Collected statement statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Total number of statements seen.
    pub total_queries: u64,
    /// Total number of bound values.
    pub total_bindings: u64,
    pub select_count: u64,
    pub insert_count: u64,
    pub replace_count: u64,
    pub update_count: u64,
    pub delete_count: u64,
    pub truncate_count: u64,
    pub other_count: u64,
    /// Template of the most recent statement.
    pub last_query: Option<String>,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current counters.
    pub fn stats(&self) -> QueryStats {
        QueryStats {
            total_queries: self.total_queries.load(Ordering::Relaxed),
            total_bindings: self.total_bindings.load(Ordering::Relaxed),
            select_count: self.select_count.load(Ordering::Relaxed),
            insert_count: self.insert_count.load(Ordering::Relaxed),
            replace_count: self.replace_count.load(Ordering::Relaxed),
            update_count: self.update_count.load(Ordering::Relaxed),
            delete_count: self.delete_count.load(Ordering::Relaxed),
            truncate_count: self.truncate_count.load(Ordering::Relaxed),
            other_count: self.other_count.load(Ordering::Relaxed),
            last_query: self
                .last_query
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        for counter in [
            &self.total_queries,
            &self.total_bindings,
            &self.select_count,
            &self.insert_count,
            &self.replace_count,
            &self.update_count,
            &self.delete_count,
            &self.truncate_count,
            &self.other_count,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        *self
            .last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn counter(&self, query_type: QueryType) -> &AtomicU64 {
        match query_type {
            QueryType::Select => &self.select_count,
            QueryType::Insert => &self.insert_count,
            QueryType::Replace => &self.replace_count,
            QueryType::Update => &self.update_count,
            QueryType::Delete => &self.delete_count,
            QueryType::Truncate => &self.truncate_count,
            QueryType::Other => &self.other_count,
        }
    }
}

impl QueryObserver for StatsObserver {
    fn on_query(&self, _sql: &str, template: &str, bindings: &[Value]) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        self.total_bindings
            .fetch_add(bindings.len() as u64, Ordering::Relaxed);
        self.counter(QueryType::from_sql(template))
            .fetch_add(1, Ordering::Relaxed);
        *self
            .last_query
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(template.to_string());
    }
}

/// Fans one statement out to several observers, in insertion order.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn QueryObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer.
    pub fn add<O: QueryObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Add a shared observer.
    pub fn add_arc(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl QueryObserver for CompositeObserver {
    fn on_query(&self, sql: &str, template: &str, bindings: &[Value]) {
        for observer in &self.observers {
            observer.on_query(sql, template, bindings);
        }
    }
}
