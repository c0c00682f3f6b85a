use super::*;
use crate::value::{Value, values};
use std::sync::{Arc, Mutex};

#[test]
fn test_query_type_detection() {
    assert_eq!(QueryType::from_sql("select * from `t`"), QueryType::Select);
    assert_eq!(QueryType::from_sql("  SELECT top 5 * from [t]"), QueryType::Select);
    assert_eq!(QueryType::from_sql("insert into `t` (`a`) values (?)"), QueryType::Insert);
    assert_eq!(QueryType::from_sql("replace into `t` (`a`) values (?)"), QueryType::Replace);
    assert_eq!(QueryType::from_sql("update top (2) [t] set [a] = ?"), QueryType::Update);
    assert_eq!(QueryType::from_sql("delete from `t`"), QueryType::Delete);
    assert_eq!(QueryType::from_sql("truncate table [t]"), QueryType::Truncate);
    assert_eq!(QueryType::from_sql("create table t (id int)"), QueryType::Other);
    assert_eq!(QueryType::from_sql(""), QueryType::Other);
}

#[test]
fn test_tracing_observer_clips_long_sql() {
    let observer = TracingObserver::new().max_sql_length(10);
    assert_eq!(observer.shown_sql("select * from `t`"), "select * f...");
    assert_eq!(observer.shown_sql("select 1"), "select 1");
    assert_eq!(
        TracingObserver::new().max_sql_length(3).no_truncate().shown_sql("select 1"),
        "select 1"
    );
}

#[test]
fn test_clipping_respects_char_boundaries() {
    let observer = TracingObserver::new().max_sql_length(2);
    assert_eq!(observer.shown_sql("héllo"), "h...");
    assert_eq!(observer.shown_sql("ab"), "ab");
    assert_eq!(TracingObserver::new().max_sql_length(0).shown_sql("abc"), "...");
}

#[test]
fn test_stats_observer() {
    let observer = StatsObserver::new();
    observer.on_query("select * from `t` where `a` = 1", "select * from `t` where `a` = ?", &values([1]));
    observer.on_query("update `t` set `a` = 'x'", "update `t` set `a` = ?", &values(["x"]));
    observer.on_query("select 1", "select 1", &[]);

    let stats = observer.stats();
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.total_bindings, 2);
    assert_eq!(stats.select_count, 2);
    assert_eq!(stats.update_count, 1);
    assert_eq!(stats.last_query.as_deref(), Some("select 1"));

    observer.reset();
    assert_eq!(observer.stats(), QueryStats::default());
}

#[test]
fn test_composite_observer_calls_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let first = {
        let seen = Arc::clone(&seen);
        move |sql: &str, _: &str, _: &[Value]| seen.lock().unwrap().push(format!("first {sql}"))
    };
    let second = {
        let seen = Arc::clone(&seen);
        move |sql: &str, _: &str, _: &[Value]| seen.lock().unwrap().push(format!("second {sql}"))
    };

    let composite = CompositeObserver::new().add(first).add(second).add(NoopObserver);
    assert_eq!(composite.len(), 3);
    composite.on_query("select 1", "select 1", &[]);

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["first select 1".to_string(), "second select 1".to_string()]
    );
}

#[test]
fn test_tracing_observer_does_not_panic_without_subscriber() {
    TracingObserver::new()
        .interpolated()
        .level(tracing::Level::INFO)
        .on_query("select 1", "select ?", &values([1]));
}
