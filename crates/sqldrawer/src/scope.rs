//! Per-statement clause accumulator.

use crate::condition::ConditionEntry;
use crate::join::JoinEntry;
use crate::value::Value;
use std::collections::HashMap;

/// A named SQL fragment rendered independently and concatenated in dialect
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Top,
    Columns,
    Alias,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    Lock,
    Set,
    Insert,
    Values,
}

impl Clause {
    /// Keyword prefixed to a text clause. `None` renders the value bare.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Alias => Some("as"),
            Self::Where => Some("where"),
            Self::GroupBy => Some("group by"),
            Self::Having => Some("having"),
            Self::OrderBy => Some("order by"),
            Self::Limit => Some("limit"),
            Self::Offset => Some("offset"),
            Self::Set => Some("set"),
            Self::Values => Some("values"),
            Self::Top => Some("top"),
            Self::Columns | Self::Join | Self::Lock | Self::Insert => None,
        }
    }
}

/// Accumulated clause state plus the pending binding list.
///
/// Text clauses either replace or append with `,`, depending on the fluent
/// method. Bindings are appended in call order, except SET bindings which
/// are prepended.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    texts: HashMap<Clause, String>,
    row_count: Option<u64>,
    offset: Option<u64>,
    wheres: Vec<ConditionEntry>,
    havings: Vec<ConditionEntry>,
    joins: Vec<JoinEntry>,
    sub_column: Option<String>,
    bindings: Vec<Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated text of a clause, if any.
    pub fn text(&self, clause: Clause) -> Option<&str> {
        self.texts
            .get(&clause)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Replace a text clause.
    pub fn set_text(&mut self, clause: Clause, text: impl Into<String>) {
        self.texts.insert(clause, text.into());
    }

    /// Append to a text clause, separated by `,`.
    pub fn append_text(&mut self, clause: Clause, text: impl AsRef<str>) {
        let text = text.as_ref();
        self.texts
            .entry(clause)
            .and_modify(|current| {
                if !current.is_empty() {
                    current.push(',');
                }
                current.push_str(text);
            })
            .or_insert_with(|| text.to_string());
    }

    pub fn clear_text(&mut self, clause: Clause) -> Option<String> {
        self.texts.remove(&clause)
    }

    pub fn row_count(&self) -> Option<u64> {
        self.row_count
    }

    pub fn set_row_count(&mut self, n: u64) {
        self.row_count = Some(n);
    }

    /// Swap the row count, returning the previous one.
    pub fn replace_row_count(&mut self, n: Option<u64>) -> Option<u64> {
        std::mem::replace(&mut self.row_count, n)
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn set_offset(&mut self, m: u64) {
        self.offset = Some(m);
    }

    pub fn wheres(&self) -> &[ConditionEntry] {
        &self.wheres
    }

    pub fn push_where(&mut self, entry: ConditionEntry) {
        self.wheres.push(entry);
    }

    pub fn havings(&self) -> &[ConditionEntry] {
        &self.havings
    }

    pub fn push_having(&mut self, entry: ConditionEntry) {
        self.havings.push(entry);
    }

    pub fn joins(&self) -> &[JoinEntry] {
        &self.joins
    }

    pub fn push_join(&mut self, entry: JoinEntry) {
        self.joins.push(entry);
    }

    pub fn sub_column(&self) -> Option<&str> {
        self.sub_column.as_deref()
    }

    pub fn set_sub_column(&mut self, column: impl Into<String>) {
        self.sub_column = Some(column.into());
    }

    /// Bindings collected so far that are not produced at render time
    /// (SET and VALUES).
    pub fn pending_bindings(&self) -> &[Value] {
        &self.bindings
    }

    pub fn push_bindings(&mut self, values: impl IntoIterator<Item = Value>) {
        self.bindings.extend(values);
    }

    /// Put `values` ahead of everything already pending.
    pub fn prepend_bindings(&mut self, values: impl IntoIterator<Item = Value>) {
        let mut head: Vec<Value> = values.into_iter().collect();
        head.append(&mut self.bindings);
        self.bindings = head;
    }

    /// Drain the pending bindings. Clause text and entries stay intact.
    pub fn take_bindings(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.bindings)
    }

    /// Back to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::values;

    #[test]
    fn append_joins_with_comma() {
        let mut s = Scope::new();
        s.append_text(Clause::OrderBy, "`a` desc");
        s.append_text(Clause::OrderBy, "`b` asc");
        assert_eq!(s.text(Clause::OrderBy), Some("`a` desc,`b` asc"));
    }

    #[test]
    fn set_replaces() {
        let mut s = Scope::new();
        s.set_text(Clause::Lock, "for update");
        s.set_text(Clause::Lock, "lock in share mode");
        assert_eq!(s.text(Clause::Lock), Some("lock in share mode"));
        assert_eq!(s.text(Clause::Alias), None);
    }

    #[test]
    fn prepended_bindings_come_first() {
        let mut s = Scope::new();
        s.push_bindings(values([1, 2]));
        s.prepend_bindings(values(["a"]));
        assert_eq!(s.take_bindings(), vec![Value::from("a"), Value::from(1), Value::from(2)]);
        assert!(s.pending_bindings().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = Scope::new();
        s.set_text(Clause::Columns, "*");
        s.set_row_count(3);
        s.push_bindings(values([1]));
        s.reset();
        assert_eq!(s.text(Clause::Columns), None);
        assert_eq!(s.row_count(), None);
        assert!(s.pending_bindings().is_empty());
    }
}
