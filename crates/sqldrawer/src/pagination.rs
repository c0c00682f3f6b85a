//! Pagination helper output.

use crate::row::Record;
use serde::Serialize;

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paginated {
    pub total: u64,
    pub list: Vec<Record>,
}

impl Paginated {
    pub fn empty(total: u64) -> Self {
        Self {
            total,
            list: Vec::new(),
        }
    }
}

/// Whether page `page` of `per` rows holds anything out of `total`.
///
/// False when `total` or `per` is zero, or when `page > ceil(total / per)`.
pub fn has_next_page(total: u64, page: u64, per: u64) -> bool {
    if total == 0 || per == 0 {
        return false;
    }
    page <= total.div_ceil(per)
}
