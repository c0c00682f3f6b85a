//! Operation kinds and how their results are shaped.

use crate::error::DrawerError;
use std::fmt;
use std::str::FromStr;

/// Aggregate functions that reduce to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

impl Aggregate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Count => "count",
        }
    }
}

/// Every statement kind a builder can compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    FetchAll,
    Distinct,
    JsonArrayAgg,
    JsonObjectAgg,
    Aggregate(Aggregate),
    Insert,
    InsertGetId,
    Replace,
    ReplaceGetId,
    Update,
    Delete,
    Truncate,
}

/// How the executor turns a statement into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// Affected row count.
    RowCount,
    /// Driver's last insert id.
    LastId,
    /// Every row.
    Rows,
    /// The first row, or an empty record.
    Single,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Self::Fetch,
        Self::FetchAll,
        Self::Distinct,
        Self::JsonArrayAgg,
        Self::JsonObjectAgg,
        Self::Aggregate(Aggregate::Min),
        Self::Aggregate(Aggregate::Max),
        Self::Aggregate(Aggregate::Sum),
        Self::Aggregate(Aggregate::Avg),
        Self::Aggregate(Aggregate::Count),
        Self::Insert,
        Self::InsertGetId,
        Self::Replace,
        Self::ReplaceGetId,
        Self::Update,
        Self::Delete,
        Self::Truncate,
    ];

    pub fn shape(&self) -> ResultShape {
        match self {
            Self::Insert | Self::Delete | Self::Update | Self::Replace | Self::Truncate => {
                ResultShape::RowCount
            }
            Self::InsertGetId | Self::ReplaceGetId => ResultShape::LastId,
            Self::FetchAll | Self::Distinct | Self::JsonArrayAgg | Self::JsonObjectAgg => {
                ResultShape::Rows
            }
            Self::Fetch | Self::Aggregate(_) => ResultShape::Single,
        }
    }

    /// Whether the statement reads rows through a `select` head.
    pub fn is_select(&self) -> bool {
        matches!(
            self,
            Self::Fetch
                | Self::FetchAll
                | Self::Distinct
                | Self::JsonArrayAgg
                | Self::JsonObjectAgg
                | Self::Aggregate(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::FetchAll => "fetchAll",
            Self::Distinct => "distinct",
            Self::JsonArrayAgg => "jsonArrayAgg",
            Self::JsonObjectAgg => "jsonObjectAgg",
            Self::Aggregate(agg) => agg.name(),
            Self::Insert => "insert",
            Self::InsertGetId => "insertGetId",
            Self::Replace => "replace",
            Self::ReplaceGetId => "replaceGetId",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Truncate => "truncate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named aggregate fetches (`fetchMin`, `fetchCount`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateCall {
    Min,
    Max,
    Sum,
    Avg,
    Count,
    Distinct,
}

impl AggregateCall {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Min => Operation::Aggregate(Aggregate::Min),
            Self::Max => Operation::Aggregate(Aggregate::Max),
            Self::Sum => Operation::Aggregate(Aggregate::Sum),
            Self::Avg => Operation::Aggregate(Aggregate::Avg),
            Self::Count => Operation::Aggregate(Aggregate::Count),
            Self::Distinct => Operation::Distinct,
        }
    }
}

impl FromStr for AggregateCall {
    type Err = DrawerError;

    /// Accepts `fetchMin` as well as `min`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("fetch").unwrap_or(&lower);
        let call = match name {
            "min" => Self::Min,
            "max" => Self::Max,
            "sum" => Self::Sum,
            "avg" => Self::Avg,
            "count" => Self::Count,
            "distinct" => Self::Distinct,
            _ => return Err(DrawerError::usage(format!("Unsupported aggregate: {}", s.trim()))),
        };
        Ok(call)
    }
}
