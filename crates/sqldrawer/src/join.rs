//! Join entries and their rendering.

use crate::error::DrawerError;
use crate::ident::{FieldQuoter, decode_field};
use std::fmt;
use std::str::FromStr;

/// The closed set of join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Join,
    Cross,
    Inner,
    Left,
    Right,
    LeftOuter,
    RightOuter,
    FullOuter,
    Straight,
    Natural,
    NaturalLeft,
    NaturalRight,
    NaturalInner,
}

impl JoinType {
    pub const ALL: [JoinType; 13] = [
        Self::Join,
        Self::Cross,
        Self::Inner,
        Self::Left,
        Self::Right,
        Self::LeftOuter,
        Self::RightOuter,
        Self::FullOuter,
        Self::Straight,
        Self::Natural,
        Self::NaturalLeft,
        Self::NaturalRight,
        Self::NaturalInner,
    ];

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Cross => "cross join",
            Self::Inner => "inner join",
            Self::Left => "left join",
            Self::Right => "right join",
            Self::LeftOuter => "left outer join",
            Self::RightOuter => "right outer join",
            Self::FullOuter => "full outer join",
            Self::Straight => "straight_join",
            Self::Natural => "natural join",
            Self::NaturalLeft => "natural left join",
            Self::NaturalRight => "natural right join",
            Self::NaturalInner => "natural inner join",
        }
    }
}

impl FromStr for JoinType {
    type Err = DrawerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_sql() == wanted)
            .ok_or_else(|| DrawerError::usage(format!("Unsupported join type: {}", s.trim())))
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// The ON part of a join.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JoinOn {
    #[default]
    None,
    /// Emitted verbatim inside `on (...)`; `?` markers are not bound.
    Raw(String),
    /// `(left column, right column)` equality pairs.
    Columns(Vec<(String, String)>),
}

impl JoinOn {
    pub fn columns<L, R, I>(pairs: I) -> Self
    where
        L: Into<String>,
        R: Into<String>,
        I: IntoIterator<Item = (L, R)>,
    {
        Self::Columns(
            pairs
                .into_iter()
                .map(|(l, r)| (l.into(), r.into()))
                .collect(),
        )
    }
}

impl From<&str> for JoinOn {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            Self::None
        } else {
            Self::Raw(s.to_string())
        }
    }
}

impl From<String> for JoinOn {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl<L: Into<String>, R: Into<String>, const N: usize> From<[(L, R); N]> for JoinOn {
    fn from(pairs: [(L, R); N]) -> Self {
        Self::columns(pairs)
    }
}

impl<L: Into<String>, R: Into<String>> From<Vec<(L, R)>> for JoinOn {
    fn from(pairs: Vec<(L, R)>) -> Self {
        Self::columns(pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinEntry {
    pub join_type: JoinType,
    pub table: String,
    pub on: JoinOn,
    /// Defaults to the table name.
    pub alias: Option<String>,
}

/// Renders join entries against a left-hand table reference.
pub struct JoinBuilder<'q, Q: ?Sized> {
    quoter: &'q Q,
}

impl<'q, Q: FieldQuoter + ?Sized> JoinBuilder<'q, Q> {
    pub fn new(quoter: &'q Q) -> Self {
        Self { quoter }
    }

    /// Render every entry in chain order.
    ///
    /// `left` is the already quoted alias (or table) of the main table.
    pub fn render(&self, entries: &[JoinEntry], left: &str) -> String {
        entries
            .iter()
            .map(|entry| self.render_entry(entry, left))
            .collect()
    }

    fn render_entry(&self, entry: &JoinEntry, left: &str) -> String {
        let alias = self
            .quoter
            .quote(entry.alias.as_deref().unwrap_or(&entry.table));
        let mut out = format!(
            " {} {} as {}",
            entry.join_type,
            self.quoter.quote(&entry.table),
            alias
        );

        match &entry.on {
            JoinOn::None => {}
            JoinOn::Raw(raw) => {
                out.push_str(" on (");
                out.push_str(raw);
                out.push(')');
            }
            JoinOn::Columns(pairs) if pairs.is_empty() => {}
            JoinOn::Columns(pairs) => {
                let on = pairs
                    .iter()
                    .map(|(l, r)| {
                        format!(
                            "{} = {}",
                            decode_field(self.quoter, l, Some(left)),
                            decode_field(self.quoter, r, Some(&alias))
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" and ");
                out.push_str(" on (");
                out.push_str(&on);
                out.push(')');
            }
        }
        out
    }
}
