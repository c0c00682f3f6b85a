use crate::value::Value;

/// The type of SQL statement being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// REPLACE statement
    Replace,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// TRUNCATE statement
    Truncate,
    /// Anything else
    Other,
}

impl QueryType {
    /// Detect the statement type from its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default();

        if keyword.eq_ignore_ascii_case("select") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("insert") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("replace") {
            QueryType::Replace
        } else if keyword.eq_ignore_ascii_case("update") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("delete") {
            QueryType::Delete
        } else if keyword.eq_ignore_ascii_case("truncate") {
            QueryType::Truncate
        } else {
            QueryType::Other
        }
    }
}

/// Receives every statement before it runs.
///
/// `sql` is the template with bindings inlined, `template` the `?`
/// parameterized text and `bindings` the values in marker order. Observers
/// cannot change or abort the statement.
pub trait QueryObserver: Send + Sync {
    fn on_query(&self, sql: &str, template: &str, bindings: &[Value]);
}

impl<F> QueryObserver for F
where
    F: Fn(&str, &str, &[Value]) + Send + Sync,
{
    fn on_query(&self, sql: &str, template: &str, bindings: &[Value]) {
        self(sql, template, bindings)
    }
}
