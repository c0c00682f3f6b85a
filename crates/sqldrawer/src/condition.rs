//! Filter specifications and the condition analyzer.
//!
//! A [`Filter`] describes one WHERE/HAVING entry. The [`ConditionAnalyzer`]
//! compiles chains of [`ConditionEntry`] into a SQL fragment plus the bindings
//! for its `?` markers, in left-to-right order.
//!
//! # Example
//! ```ignore
//! use sqldrawer::{Filter, MySql};
//! use sqldrawer::condition::{ConditionAnalyzer, ConditionEntry, Connective};
//!
//! let entries = vec![
//!     ConditionEntry::filter(Filter::map([("type", 2)]), Connective::And),
//!     ConditionEntry::filter(Filter::map([("state", 1)]), Connective::Or),
//! ];
//! let fragment = ConditionAnalyzer::new(&MySql).analyze_entries(&entries)?;
//! assert_eq!(fragment.sql, "`type` = ? or `state` = ?");
//! # Ok::<(), sqldrawer::DrawerError>(())
//! ```

use crate::error::{DrawerError, DrawerResult};
use crate::ident::{FieldQuoter, decode_field};
use crate::value::Value;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// A compiled SQL fragment and the bindings for its `?` markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Comparison operators accepted by positional filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    NotIn,
    Between,
    NotBetween,
    Is,
    Like,
    NotLike,
}

impl Operator {
    /// The SQL spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Between => "between",
            Self::NotBetween => "not between",
            Self::Is => "is",
            Self::Like => "like",
            Self::NotLike => "not like",
        }
    }
}

impl FromStr for Operator {
    type Err = DrawerError;

    /// Parse an operator, trimmed and case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "=" => Self::Eq,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Gte,
            "<=" => Self::Lte,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "between" => Self::Between,
            "not between" => Self::NotBetween,
            "is" => Self::Is,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            other => return Err(DrawerError::usage(format!("Unsupported operator: {other}"))),
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an entry attaches to the entries before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Something that compiles to a single-column SELECT usable as a scalar
/// subquery. Implemented by every dialect builder.
pub trait Subselect: Send + Sync + fmt::Debug {
    /// Compile as a full-set SELECT restricted to the designated sub-column.
    fn compile_subselect(&self) -> DrawerResult<Fragment>;
}

/// A nested builder used as the right-hand side of a comparison.
#[derive(Clone)]
pub struct Subquery(Arc<dyn Subselect>);

impl Subquery {
    pub fn new<S: Subselect + 'static>(inner: S) -> Self {
        Self(Arc::new(inner))
    }

    pub fn compile(&self) -> DrawerResult<Fragment> {
        self.0.compile_subselect()
    }
}

impl fmt::Debug for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subquery").field(&self.0).finish()
    }
}

/// The right-hand side of a positional filter.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A single bound value.
    Value(Value),
    /// A list of bound values (`in`, `between`).
    List(Vec<Value>),
    /// A scalar subquery.
    Subquery(Subquery),
}

impl Operand {
    /// Build a list operand.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_operand_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Self::Value(Value::from(v))
            }
        })*
    };
}

impl_operand_from_scalar!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, &str, String, &String,
    NaiveDateTime, Uuid, serde_json::Value
);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Self::list(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Self::list(v)
    }
}

impl From<Subquery> for Operand {
    fn from(v: Subquery) -> Self {
        Self::Subquery(v)
    }
}

/// One filter specification.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `col = ? and col = ? ...`, one binding per pair, in insertion order.
    Map(Vec<(String, Value)>),
    /// `[column, value]`: equality, or `in` when the value is a list.
    Pair { column: String, operand: Operand },
    /// `[column, operator, value]`.
    Compare {
        column: String,
        operator: String,
        operand: Operand,
    },
    /// Items AND-joined and wrapped in parentheses.
    Group(Vec<Filter>),
}

impl Filter {
    /// Equality tests from column/value pairs.
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// `[column, value]`.
    pub fn pair(column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Self::Pair {
            column: column.into(),
            operand: operand.into(),
        }
    }

    /// `[column, operator, value]`. The operator is validated at compile time.
    pub fn compare(
        column: impl Into<String>,
        operator: impl Into<String>,
        operand: impl Into<Operand>,
    ) -> Self {
        Self::Compare {
            column: column.into(),
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    /// A parenthesized AND group.
    pub fn group(items: impl IntoIterator<Item = Filter>) -> Self {
        Self::Group(items.into_iter().collect())
    }

    /// Empty maps and groups contribute nothing and are not recorded.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Map(pairs) => pairs.is_empty(),
            Self::Group(items) => items.is_empty(),
            Self::Pair { .. } | Self::Compare { .. } => false,
        }
    }
}

/// What an entry renders from.
#[derive(Debug, Clone)]
pub enum ConditionSpec {
    Structured(Filter),
    Raw(String),
}

/// One chained WHERE/HAVING call.
#[derive(Debug, Clone)]
pub struct ConditionEntry {
    pub spec: ConditionSpec,
    /// Bindings supplied with a raw expression.
    pub bindings: Vec<Value>,
    pub connective: Connective,
}

impl ConditionEntry {
    pub fn filter(filter: Filter, connective: Connective) -> Self {
        Self {
            spec: ConditionSpec::Structured(filter),
            bindings: Vec::new(),
            connective,
        }
    }

    pub fn raw(expr: impl Into<String>, bindings: Vec<Value>, connective: Connective) -> Self {
        Self {
            spec: ConditionSpec::Raw(expr.into()),
            bindings,
            connective,
        }
    }
}

/// Compiles filters into `(fragment, bindings)` pairs.
pub struct ConditionAnalyzer<'q, Q: ?Sized> {
    quoter: &'q Q,
}

impl<'q, Q: FieldQuoter + ?Sized> ConditionAnalyzer<'q, Q> {
    pub fn new(quoter: &'q Q) -> Self {
        Self { quoter }
    }

    /// Compile a chain of entries.
    ///
    /// The first entry's connective is ignored; later entries are prefixed
    /// with theirs. No parentheses are added between top-level entries.
    pub fn analyze_entries(&self, entries: &[ConditionEntry]) -> DrawerResult<Fragment> {
        let mut parts = Vec::with_capacity(entries.len());
        let mut bindings = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let fragment = match &entry.spec {
                ConditionSpec::Raw(expr) => Fragment::new(expr.clone(), entry.bindings.clone()),
                ConditionSpec::Structured(filter) => {
                    let mut fragment = self.analyze(filter)?;
                    fragment.bindings.extend(entry.bindings.iter().cloned());
                    fragment
                }
            };

            if index == 0 {
                parts.push(fragment.sql);
            } else {
                parts.push(format!("{} {}", entry.connective.as_str(), fragment.sql));
            }
            bindings.extend(fragment.bindings);
        }

        Ok(Fragment::new(parts.join(" "), bindings))
    }

    /// Compile a single filter.
    pub fn analyze(&self, filter: &Filter) -> DrawerResult<Fragment> {
        match filter {
            Filter::Map(pairs) => Ok(self.analyze_map(pairs)),
            Filter::Pair { column, operand } => {
                let operator = match operand {
                    Operand::List(_) => Operator::In,
                    _ => Operator::Eq,
                };
                self.compare(column, operator, operand)
            }
            Filter::Compare {
                column,
                operator,
                operand,
            } => self.compare(column, operator.parse()?, operand),
            Filter::Group(items) => self.analyze_group(items),
        }
    }

    fn analyze_map(&self, pairs: &[(String, Value)]) -> Fragment {
        let sql = pairs
            .iter()
            .map(|(column, _)| format!("{} = ?", self.field(column)))
            .collect::<Vec<_>>()
            .join(" and ");
        let bindings = pairs.iter().map(|(_, v)| v.clone()).collect();
        Fragment::new(sql, bindings)
    }

    fn analyze_group(&self, items: &[Filter]) -> DrawerResult<Fragment> {
        if items.is_empty() {
            return Err(DrawerError::usage("Empty filter group"));
        }

        let mut parts = Vec::with_capacity(items.len());
        let mut bindings = Vec::new();
        for item in items {
            let fragment = self.analyze(item)?;
            parts.push(fragment.sql);
            bindings.extend(fragment.bindings);
        }
        Ok(Fragment::new(format!("({})", parts.join(" and ")), bindings))
    }

    fn compare(&self, column: &str, operator: Operator, operand: &Operand) -> DrawerResult<Fragment> {
        let field = self.field(column);

        if let Operand::Subquery(subquery) = operand {
            let inner = subquery.compile()?;
            return Ok(Fragment::new(
                format!("{field} {operator} ({})", inner.sql),
                inner.bindings,
            ));
        }

        match operator {
            Operator::Is => {
                let value = is_value(operand)?;
                Ok(Fragment::new(format!("{field} is {value}"), Vec::new()))
            }
            Operator::Between | Operator::NotBetween => match operand {
                Operand::List(range) if range.len() == 2 => Ok(Fragment::new(
                    format!("{field} {operator} ? and ?"),
                    range.clone(),
                )),
                _ => Err(DrawerError::usage(format!(
                    "Operator '{operator}' on {column} expects a [low, high] list"
                ))),
            },
            Operator::In | Operator::NotIn => match operand {
                Operand::List(items) if !items.is_empty() => {
                    let markers = vec!["?"; items.len()].join(",");
                    Ok(Fragment::new(
                        format!("{field} {operator} ({markers})"),
                        items.clone(),
                    ))
                }
                Operand::List(_) => Err(DrawerError::usage(format!(
                    "Operator '{operator}' on {column} expects a non-empty list"
                ))),
                _ => Err(DrawerError::usage(format!(
                    "Operator '{operator}' on {column} expects a list"
                ))),
            },
            _ => match operand {
                Operand::Value(value) => Ok(Fragment::new(
                    format!("{field} {operator} ?"),
                    vec![value.clone()],
                )),
                _ => Err(DrawerError::usage(format!(
                    "Operator '{operator}' on {column} expects a single value"
                ))),
            },
        }
    }

    fn field(&self, column: &str) -> String {
        decode_field(self.quoter, column, None)
    }
}

/// Resolve the right-hand side of `is`.
fn is_value(operand: &Operand) -> DrawerResult<&'static str> {
    let value = match operand {
        Operand::Value(Value::Null) => return Ok("null"),
        Operand::Value(Value::Bool(true)) => return Ok("true"),
        Operand::Value(Value::Bool(false)) => return Ok("false"),
        Operand::Value(Value::Text(s)) => s.trim().to_ascii_lowercase(),
        _ => return Err(DrawerError::usage("Unsupported is value")),
    };
    match value.as_str() {
        "null" => Ok("null"),
        "not null" => Ok("not null"),
        "true" => Ok("true"),
        "false" => Ok("false"),
        other => Err(DrawerError::usage(format!("Unsupported is value: {other}"))),
    }
}
