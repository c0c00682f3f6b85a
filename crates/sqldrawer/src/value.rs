//! Binding values.
//!
//! [`Value`] is what gets bound positionally to `?` markers and what result
//! records hold. Every variant has an inline literal form used when rendering
//! "complete" SQL for observers, printing and `to_complete_sql()`.

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// A SQL value used as a binding or a result column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value (e.g. `bigint unsigned` ids).
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Bytes(Vec<u8>),
    /// JSON document (MySQL `json`, SQL Server `nvarchar` JSON).
    Json(serde_json::Value),
    /// Date and time without a zone.
    DateTime(NaiveDateTime),
    /// UUID / `uniqueidentifier`.
    Uuid(Uuid),
}

impl Value {
    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: only meant for display; statements are always executed with
    /// positional bindings.
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => quote_literal(s),
            Self::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Json(v) => quote_literal(&v.to_string()),
            Self::DateTime(dt) => quote_literal(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Self::Uuid(u) => quote_literal(&u.hyphenated().to_string()),
        }
    }

    /// Whether this is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Interpret the value as a signed integer.
    ///
    /// Text is parsed, since drivers commonly hand back `count(*)` and
    /// `decimal` columns as strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::UInt(n) => i64::try_from(*n).ok(),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            Self::UInt(n) => Some(*n as f64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Borrow the value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn quote_literal(s: &str) -> String {
    let escaped = s.replace('\'', "''");
    format!("'{escaped}'")
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::UInt(u64::from(v))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Collect anything iterable into a binding list.
pub fn values<T, I>(items: I) -> Vec<Value>
where
    T: Into<Value>,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_text_is_quoted_and_escaped() {
        assert_eq!(Value::from("O'Neil").to_sql_inline(), "'O''Neil'");
    }

    #[test]
    fn inline_scalars() {
        assert_eq!(Value::Null.to_sql_inline(), "NULL");
        assert_eq!(Value::from(true).to_sql_inline(), "1");
        assert_eq!(Value::from(-3_i32).to_sql_inline(), "-3");
        assert_eq!(Value::from(7_u64).to_sql_inline(), "7");
        assert_eq!(Value::from(vec![0xde_u8, 0xad]).to_sql_inline(), "X'DEAD'");
    }

    #[test]
    fn inline_datetime_drops_zero_fraction() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(Value::from(dt).to_sql_inline(), "'2024-05-01 08:30:00'");
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn as_i64_parses_driver_text() {
        assert_eq!(Value::from("42").as_i64(), Some(42));
        assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Value::Null.as_i64(), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::from(1), Value::Null, Value::from("a")])
            .unwrap();
        assert_eq!(json, r#"[1,null,"a"]"#);
    }
}
