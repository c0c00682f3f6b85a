//! SQL-Server-only builder methods.

use super::Builder;
use crate::dialect::SqlServer;

impl Builder<SqlServer> {
    /// Row count, rendered as `top n` (or `fetch next n rows` with an offset).
    pub fn top(&mut self, n: u64) -> &mut Self {
        self.limit(n)
    }

    /// Same as [`top`](Self::top); reads better after `offset`.
    pub fn next(&mut self, n: u64) -> &mut Self {
        self.limit(n)
    }
}
