//! Identifier quoting and column expressions.
//!
//! Each dialect quotes identifiers its own way (`` `a` `` vs `[a]`). Column
//! names handed to the builder may be dotted (`alias.column`); every segment is
//! quoted independently.
//!
//! # Example
//! ```ignore
//! use sqldrawer::{MySql, ident::decode_field};
//!
//! assert_eq!(decode_field(&MySql, "a.id", None), "`a`.`id`");
//! assert_eq!(decode_field(&MySql, "id", Some("`t`")), "`t`.`id`");
//! ```

/// Per-dialect identifier quoting. A pure function of the name.
pub trait FieldQuoter {
    /// Quote a single identifier segment.
    fn quote(&self, name: &str) -> String;
}

impl<Q: FieldQuoter + ?Sized> FieldQuoter for &Q {
    fn quote(&self, name: &str) -> String {
        (**self).quote(name)
    }
}

/// Quote a column reference.
///
/// - A dotted name has every segment quoted and is rejoined with `.`; the
///   qualifier is ignored.
/// - Otherwise, when `qualifier` is given (already quoted), it is prefixed.
/// - Otherwise the name is quoted as-is.
pub fn decode_field<Q: FieldQuoter + ?Sized>(
    quoter: &Q,
    field: &str,
    qualifier: Option<&str>,
) -> String {
    if field.contains('.') {
        return field
            .split('.')
            .map(|segment| quoter.quote(segment))
            .collect::<Vec<_>>()
            .join(".");
    }

    match qualifier {
        Some(table) if !table.is_empty() => format!("{table}.{}", quoter.quote(field)),
        _ => quoter.quote(field),
    }
}

/// A list of select columns.
///
/// Built from a comma separated string (`"id, title"`) or from a list of
/// names. Each entry may carry an alias, either `col as alias` or `col alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns(pub Vec<String>);

impl Columns {
    /// Whether this is the `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.0.len() == 1 && self.0[0].trim() == "*"
    }

    /// Render the column list with every name and alias quoted.
    pub fn to_expr<Q: FieldQuoter + ?Sized>(&self, quoter: &Q) -> String {
        if self.is_wildcard() {
            return String::from("*");
        }

        self.0
            .iter()
            .map(|column| column_expr(quoter, column.trim()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn column_expr<Q: FieldQuoter + ?Sized>(quoter: &Q, column: &str) -> String {
    let (base, separator, alias) = if let Some((base, alias)) = column.split_once(" as ") {
        (base, " as ", Some(alias))
    } else if let Some((base, alias)) = column.split_once(' ') {
        (base, " ", Some(alias))
    } else {
        (column, "", None)
    };

    let mut out = decode_field(quoter, base.trim(), None);
    if let Some(alias) = alias {
        out.push_str(separator);
        out.push_str(&quoter.quote(alias.trim()));
    }
    out
}

impl From<&str> for Columns {
    fn from(s: &str) -> Self {
        Self(s.split(',').map(|c| c.trim().to_string()).collect())
    }
}

impl From<String> for Columns {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Vec<String>> for Columns {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

impl From<Vec<&str>> for Columns {
    fn from(v: Vec<&str>) -> Self {
        Self(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Columns {
    fn from(v: &[&str]) -> Self {
        Self(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(v: [&str; N]) -> Self {
        Self(v.iter().map(|s| s.to_string()).collect())
    }
}
