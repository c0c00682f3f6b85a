use super::*;
use crate::client::Connection;
use crate::condition::Filter;
use crate::context::ExecContext;
use crate::dialect::{MySql, SqlServer};
use crate::join::JoinOn;
use crate::pool::ConnectionPool;
use crate::value::values;

/// Fails the test if a statement gets as far as acquiring a connection.
struct UnreachablePool;

impl ConnectionPool for UnreachablePool {
    fn acquire(&self, _config: &ConnectionConfig) -> DrawerResult<Arc<dyn Connection>> {
        panic!("statement reached the connection pool");
    }
}

fn builder<D: Dialect>(table: &str) -> Builder<D> {
    let executor = Executor::new(Arc::new(ExecContext::new()), Arc::new(UnreachablePool));
    Builder::new(table, ConnectionConfig::new(D::default().name()), executor)
}

fn mysql(table: &str) -> Builder<MySql> {
    builder(table)
}

fn sqlserver(table: &str) -> Builder<SqlServer> {
    builder(table)
}

fn sql(output: DrawerResult<QueryOutput>) -> String {
    output.unwrap().into_sql().unwrap()
}

#[test]
fn set_bindings_precede_where_bindings() {
    let mut article = mysql("article");
    let out = article
        .to_sql()
        .where_(Filter::map([("id", 1)]))
        .update([("a", "ABC")]);
    assert_eq!(sql(out), "update `article` set `a` = ? where `id` = ?");
    assert_eq!(
        article.prepared_bindings(),
        &[Value::from("ABC"), Value::from(1)]
    );
}

#[test]
fn insert_many_is_one_statement() {
    let mut article = mysql("article");
    let out = article
        .to_sql()
        .insert_many([[("title", "t1")], [("title", "t2")]]);
    assert_eq!(sql(out), "insert into `article` (`title`) values (?),(?)");
    assert_eq!(article.prepared_bindings(), values(["t1", "t2"]).as_slice());
}

#[test]
fn insert_rows_are_matched_by_column_name() {
    let mut t = mysql("t");
    let out = t
        .to_sql()
        .insert_many(vec![vec![("a", 1), ("b", 2)], vec![("b", 4), ("a", 3)]]);
    assert_eq!(sql(out), "insert into `t` (`a`, `b`) values (?,?),(?,?)");
    assert_eq!(t.prepared_bindings(), values([1, 2, 3, 4]).as_slice());
}

#[test]
fn inconsistent_insert_rows_fail_before_the_driver() {
    let mut t = mysql("t");
    let err = t
        .insert_many(vec![vec![("a", 1), ("b", 2)], vec![("a", 3), ("c", 4)]])
        .unwrap_err();
    assert!(err.is_usage());
    assert!(t.scope().pending_bindings().is_empty());

    let err = t.insert(Vec::<(&str, i32)>::new()).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn where_or_adds_no_parentheses() {
    let mut article = mysql("article");
    let out = article
        .to_sql()
        .where_(Filter::map([("type", 2)]))
        .where_or(Filter::map([("state", 1)]))
        .fetch_all();
    assert_eq!(
        sql(out),
        "select * from `article` where `type` = ? or `state` = ?"
    );
    assert_eq!(article.prepared_bindings(), values([2, 1]).as_slice());
}

#[test]
fn map_bindings_follow_map_order() {
    let mut t = mysql("t");
    t.where_(Filter::map([("c", 3), ("a", 1), ("b", 2)]));
    let compiled = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(compiled.sql, "select * from `t` where `c` = ? and `a` = ? and `b` = ?");
    assert_eq!(compiled.bindings, values([3, 1, 2]));
}

#[test]
fn in_between_and_null_sugar() {
    let mut t = mysql("t");
    t.where_in("t", [1, 2, 3]);
    let c = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(c.sql, "select * from `t` where `t` in (?,?,?)");
    assert_eq!(c.bindings, values([1, 2, 3]));

    t.reset().where_between("t", [1, 5]);
    let c = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(c.sql, "select * from `t` where `t` between ? and ?");
    assert_eq!(c.bindings, values([1, 5]));

    t.reset().where_null("t").where_not_null("u");
    let c = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(c.sql, "select * from `t` where `t` is null and `u` is not null");
    assert!(c.bindings.is_empty());

    t.reset()
        .where_not_in("t", ["x"])
        .where_like("name", "a%")
        .where_not_between("n", [0, 9]);
    let c = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(
        c.sql,
        "select * from `t` where `t` not in (?) and `name` like ? and `n` not between ? and ?"
    );
    assert_eq!(c.bindings.len(), 4);
}

#[test]
fn raw_filters_keep_their_bindings() {
    let mut t = mysql("t");
    t.where_raw("`a` > ?", values([1]))
        .where_or_raw("`b` < ?", values([9]))
        .where_raw("  ", Vec::new());
    let c = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(c.sql, "select * from `t` where `a` > ? or `b` < ?");
    assert_eq!(c.bindings, values([1, 9]));
}

#[test]
fn unsupported_operator_fails_before_the_driver() {
    let mut t = mysql("t");
    let err = t.where_case("a", "~=", 1).fetch_all().unwrap_err();
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "Usage error: Unsupported operator: ~=");
}

#[test]
fn to_complete_sql_inlines_bindings() {
    let mut article = mysql("article");
    let out = article
        .to_complete_sql()
        .where_(Filter::map([("title", "O'Neil")]))
        .fetch();
    assert_eq!(
        sql(out),
        "select * from `article` where `title` = 'O''Neil' limit 1"
    );
}

#[test]
fn compiling_twice_is_identical() {
    let mut article = mysql("article");
    article
        .select("id, title as t")
        .where_(Filter::map([("state", 1)]))
        .where_in("type", [1, 2])
        .order_by_desc("id")
        .limit(10);
    let first = article.compile(Operation::FetchAll).unwrap();
    let second = article.compile(Operation::FetchAll).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.sql,
        "select `id`,`title` as `t` from `article` where `state` = ? and `type` in (?,?) \
         order by `id` desc limit 10"
    );
}

#[test]
fn joins_and_aliases() {
    let mut article = mysql("article");
    let out = article
        .to_sql()
        .alias("a")
        .select(["a.id", "u.name"])
        .left_join("user", [("uid", "id")], Some("u"))
        .join_raw("tag", "tag.aid = a.id", None, "cross join")
        .fetch_all();
    assert_eq!(
        sql(out),
        "select `a`.`id`,`u`.`name` from `article` as `a` \
         left join `user` as `u` on (`a`.`uid` = `u`.`id`) \
         cross join `tag` as `tag` on (tag.aid = a.id)"
    );

    let mut t = mysql("t");
    let out = t.to_sql().inner_join("x", JoinOn::None, None).fetch_all();
    assert_eq!(sql(out), "select * from `t` inner join `x` as `x`");
}

#[test]
fn bad_join_type_is_deferred_to_the_terminal_call() {
    let mut t = mysql("t");
    t.to_sql().join_raw("user", "a = b", None, "sideways join");
    let err = t.fetch_all().unwrap_err();
    assert!(err.is_usage());

    // The deferred error is reported once.
    assert!(t.fetch_all().is_ok());
}

#[test]
fn aggregate_columns() {
    let mut t = mysql("goods");
    let out = t
        .to_sql()
        .count()
        .min_as("price", "low")
        .max("price")
        .distinct("brand")
        .fetch_all();
    assert_eq!(
        sql(out),
        "select count(*) as `aggregate`,min(`price`) as `low`,max(`price`) as `price`,\
         distinct(`brand`) from `goods`"
    );
}

#[test]
fn fetch_aggregates_replace_the_columns() {
    let mut t = mysql("goods");
    t.to_sql()
        .select("id")
        .where_(Filter::map([("state", 1)]))
        .order_by("id")
        .limit(5);

    assert_eq!(
        sql(t.fetch_count()),
        "select count(*) from `goods` where `state` = ?"
    );
    assert_eq!(
        sql(t.fetch_named("fetchSum", "price")),
        "select sum(`price`) from `goods` where `state` = ?"
    );
    assert_eq!(
        sql(t.fetch_distinct("brand")),
        "select distinct(`brand`) from `goods` where `state` = ? order by `id` limit 5"
    );
    assert_eq!(
        sql(t.fetch_all()),
        "select `id` from `goods` where `state` = ? order by `id` limit 5"
    );
}

#[test]
fn unknown_aggregate_name_is_a_usage_error() {
    let mut t = mysql("t");
    let err = t.fetch_named("fetchMedian", "x").unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn subquery_filters() {
    let mut vip = mysql("user");
    vip.where_(Filter::map([("vip", 1)]));

    let mut article = mysql("article");
    article
        .where_(Filter::map([("state", 2)]))
        .where_sub("uid", "in", vip, "id");
    let c = article.compile(Operation::FetchAll).unwrap();
    assert_eq!(
        c.sql,
        "select * from `article` where `state` = ? and `uid` in (select `id` from `user` where `vip` = ?)"
    );
    assert_eq!(c.bindings, values([2, 1]));
}

#[test]
fn subquery_without_sub_column_is_a_usage_error() {
    let mut article = mysql("article");
    article.where_case("uid", "in", mysql("user"));
    let err = article.compile(Operation::FetchAll).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn having_clauses() {
    let mut t = mysql("orders");
    let out = t
        .to_sql()
        .select("uid")
        .sum("amount")
        .group_by("uid")
        .having_between("amount", [10, 100])
        .having_not_null("uid")
        .fetch_all();
    assert_eq!(
        sql(out),
        "select `uid`,sum(`amount`) as `amount` from `orders` group by `uid` \
         having `amount` between ? and ? and `uid` is not null"
    );
    assert_eq!(t.prepared_bindings(), values([10, 100]).as_slice());
}

#[test]
fn update_raw_binds_text() {
    let mut t = mysql("t");
    let out = t
        .to_sql()
        .where_(Filter::map([("id", 7)]))
        .update_raw("a = 1, b = hello");
    assert_eq!(sql(out), "update `t` set `a` = ?, `b` = ? where `id` = ?");
    assert_eq!(
        t.prepared_bindings(),
        &[Value::from("1"), Value::from("hello"), Value::from(7)]
    );

    assert!(t.update_raw("a").unwrap_err().is_usage());
    assert!(t.update(Vec::<(&str, i32)>::new()).unwrap_err().is_usage());
}

#[test]
fn delete_and_truncate() {
    let mut t = mysql("t");
    t.to_sql();
    assert_eq!(sql(t.truncate()), "truncate `t`");

    let out = t.where_(Filter::map([("id", 1)])).order_by("id").limit(1).delete();
    assert_eq!(
        sql(out),
        "delete from `t` where `id` = ? order by `id` limit 1"
    );
}

#[test]
fn mysql_locks_and_page() {
    let mut t = mysql("t");
    let out = t.to_sql().page(3, 10).lock_for_update().fetch_all();
    assert_eq!(sql(out), "select * from `t` limit 3 offset 20 for update");

    t.lock_in_share_mode();
    assert_eq!(
        sql(t.fetch_all()),
        "select * from `t` limit 3 offset 20 lock in share mode"
    );
}

#[test]
fn mysql_replace_and_json_aggregates() {
    let mut t = mysql("article");
    t.to_sql();
    assert_eq!(
        sql(t.replace([("id", 1)])),
        "replace into `article` (`id`) values (?)"
    );

    t.reset();
    assert_eq!(
        sql(t.group_by("type").select("type").json_array_agg("id")),
        "select `type`,json_arrayagg(`id`) as `id` from `article` group by `type`"
    );

    t.reset();
    assert_eq!(
        sql(t.json_object_agg("type", "title")),
        "select json_objectagg(`type`,`title`) as `type` from `article`"
    );
}

#[test]
fn sqlserver_top_offset_and_page() {
    let mut t = sqlserver("article");
    t.to_sql().top(5).order_by("id");
    assert_eq!(sql(t.fetch_all()), "select top 5 * from [article] order by [id]");

    t.offset(10).next(5);
    assert_eq!(
        sql(t.fetch_all()),
        "select * from [article] order by [id] offset 10 rows fetch next 5 rows only"
    );

    t.reset().to_sql().order_by("id").page(3, 10);
    assert_eq!(
        sql(t.fetch_all()),
        "select * from [article] order by [id] offset 20 rows fetch next 10 rows only"
    );
}

#[test]
fn sqlserver_offset_without_row_count_fetches_zero() {
    let mut t = sqlserver("t");
    let out = t.to_sql().order_by("id").offset(5).fetch_all();
    assert_eq!(
        sql(out),
        "select * from [t] order by [id] offset 5 rows fetch next 0 rows only"
    );
}

#[test]
fn sqlserver_row_count_on_writes() {
    let mut t = sqlserver("t");
    t.to_sql().where_(Filter::map([("state", 0)])).limit(100);
    assert_eq!(
        sql(t.update([("state", 1)])),
        "update top (100) [t] set [state] = ? where [state] = ?"
    );
    assert_eq!(sql(t.delete()), "delete top (100) from [t] where [state] = ?");
    assert_eq!(sql(t.truncate()), "truncate table [t]");
}

#[test]
fn sqlserver_has_no_replace() {
    let mut t = sqlserver("t");
    t.to_sql();
    let err = t.write_rows(Operation::Replace, vec![vec![("a".into(), Value::from(1))]]);
    assert!(matches!(err, Err(DrawerError::Configuration(_))));
}

#[test]
fn reset_keeps_modes() {
    let mut t = mysql("t");
    t.to_sql().where_(Filter::map([("a", 1)])).limit(3);
    t.join_raw("x", "", None, "nope");
    t.reset();

    assert!(t.scope().wheres().is_empty());
    assert_eq!(sql(t.fetch_all()), "select * from `t`");
}

#[test]
fn paginator_refuses_sql_only_modes() {
    let mut t = mysql("t");
    let err = t.to_sql().paginator(1, 10).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn set_table_keeps_clauses() {
    let mut t = mysql("a");
    t.where_(Filter::map([("id", 1)])).set_table("b");
    assert_eq!(t.table(), "b");
    assert_eq!(
        t.compile(Operation::Delete).unwrap().sql,
        "delete from `b` where `id` = ?"
    );
    assert_eq!(t.connection().driver, "mysql");
}

#[test]
fn raw_grouping_ordering_and_having() {
    let mut t = mysql("orders");
    let out = t
        .to_sql()
        .select("uid")
        .count_as("id", "id")
        .group_by_raw("uid, date(created_at)")
        .having_raw("count(`id`) > ?", values([2]))
        .having_not_between("uid", [100, 200])
        .order_by_raw("field(`uid`, 3, 1)")
        .fetch_all();
    assert_eq!(
        sql(out),
        "select `uid`,count(`id`) as `id` from `orders` group by uid, date(created_at) \
         having count(`id`) > ? and `uid` not between ? and ? order by field(`uid`, 3, 1)"
    );
    assert_eq!(t.prepared_bindings(), values([2, 100, 200]).as_slice());
}

#[test]
fn where_not_like_binds_the_pattern() {
    let mut t = sqlserver("article");
    t.where_not_like("title", "%draft%");
    let c = t.compile(Operation::FetchAll).unwrap();
    assert_eq!(c.sql, "select * from [article] where [title] not like ?");
    assert_eq!(c.bindings, values(["%draft%"]));
}

#[test]
fn replace_many_is_one_statement() {
    let mut t = mysql("article");
    let out = t
        .to_sql()
        .replace_many([[("id", 1), ("state", 0)], [("id", 2), ("state", 1)]]);
    assert_eq!(
        sql(out),
        "replace into `article` (`id`, `state`) values (?,?),(?,?)"
    );
    assert_eq!(t.prepared_bindings(), values([1, 0, 2, 1]).as_slice());
}

#[test]
fn sqlserver_select_ignores_lock() {
    let mut t = sqlserver("t");
    t.to_sql().where_(Filter::map([("id", 1)])).lock_for_update();
    let out = sql(t.fetch_all());
    assert_eq!(out, "select * from [t] where [id] = ?");
    assert!(!out.contains("for update"));

    t.lock_in_share_mode();
    assert_eq!(sql(t.fetch_all()), "select * from [t] where [id] = ?");
}

#[test]
fn fetch_does_not_leak_its_row_count() {
    let mut t = mysql("t");
    t.to_sql();
    assert_eq!(sql(t.fetch()), "select * from `t` limit 1");
    assert_eq!(sql(t.fetch_all()), "select * from `t`");
    assert_eq!(t.scope().row_count(), None);

    let mut s = sqlserver("t");
    s.to_sql().limit(20);
    assert_eq!(sql(s.fetch()), "select top 1 * from [t]");
    assert_eq!(sql(s.delete()), "delete top (20) from [t]");
}
