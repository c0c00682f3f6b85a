use super::types::{QueryObserver, QueryType};
use crate::value::Value;
use tracing::{Level, event};

const TARGET: &str = "sqldrawer.sql";

/// A `tracing`-based observer that emits every statement before it runs.
///
/// Events go to the `sqldrawer.sql` target.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Emit the interpolated SQL instead of the template.
    pub interpolated: bool,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            interpolated: false,
        }
    }
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log SQL with bindings inlined.
    pub fn interpolated(mut self) -> Self {
        self.interpolated = true;
        self
    }

    /// The SQL as it will be logged: clipped to `max_sql_length` bytes on a
    /// char boundary, with `...` marking the cut.
    pub(crate) fn shown_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let cut = sql
                    .char_indices()
                    .map(|(at, _)| at)
                    .take_while(|&at| at <= max)
                    .last()
                    .unwrap_or(0);
                format!("{}...", &sql[..cut])
            }
            _ => sql.to_string(),
        }
    }
}

impl QueryObserver for TracingObserver {
    fn on_query(&self, sql: &str, template: &str, bindings: &[Value]) {
        let shown = self.shown_sql(if self.interpolated { sql } else { template });
        let query_type = QueryType::from_sql(template);
        let param_count = bindings.len();

        // `event!` needs a constant level.
        match self.level {
            Level::ERROR => event!(target: TARGET, Level::ERROR, ?query_type, param_count, sql = %shown),
            Level::WARN => event!(target: TARGET, Level::WARN, ?query_type, param_count, sql = %shown),
            Level::INFO => event!(target: TARGET, Level::INFO, ?query_type, param_count, sql = %shown),
            Level::DEBUG => event!(target: TARGET, Level::DEBUG, ?query_type, param_count, sql = %shown),
            Level::TRACE => event!(target: TARGET, Level::TRACE, ?query_type, param_count, sql = %shown),
        }
    }
}
