//! WHERE and HAVING methods.

use super::Builder;
use crate::condition::{ConditionEntry, Connective, Filter, Operand, Subquery};
use crate::dialect::Dialect;
use crate::value::Value;

impl<D: Dialect> Builder<D> {
    fn push_where(&mut self, filter: Filter, connective: Connective) -> &mut Self {
        if !filter.is_empty() {
            self.scope.push_where(ConditionEntry::filter(filter, connective));
        }
        self
    }

    fn push_where_raw(&mut self, expr: &str, bindings: Vec<Value>, connective: Connective) -> &mut Self {
        if !expr.trim().is_empty() {
            self.scope
                .push_where(ConditionEntry::raw(expr, bindings, connective));
        }
        self
    }

    fn push_having(&mut self, filter: Filter) -> &mut Self {
        if !filter.is_empty() {
            self.scope
                .push_having(ConditionEntry::filter(filter, Connective::And));
        }
        self
    }

    /// AND a filter onto the WHERE clause.
    ///
    /// ```ignore
    /// builder.where_(Filter::map([("type", 2)])).where_or(Filter::map([("state", 1)]));
    /// // where `type` = ? or `state` = ?
    /// ```
    pub fn where_(&mut self, filter: Filter) -> &mut Self {
        self.push_where(filter, Connective::And)
    }

    /// OR a filter onto the WHERE clause. No parentheses are added.
    pub fn where_or(&mut self, filter: Filter) -> &mut Self {
        self.push_where(filter, Connective::Or)
    }

    /// AND a raw expression with its own `?` bindings.
    pub fn where_raw(&mut self, expr: &str, bindings: Vec<Value>) -> &mut Self {
        self.push_where_raw(expr, bindings, Connective::And)
    }

    pub fn where_or_raw(&mut self, expr: &str, bindings: Vec<Value>) -> &mut Self {
        self.push_where_raw(expr, bindings, Connective::Or)
    }

    /// `column operator value`.
    pub fn where_case(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.where_(Filter::compare(column, operator, value))
    }

    /// `column operator (select sub_column from ...)`.
    pub fn where_sub<S: Dialect>(
        &mut self,
        column: &str,
        operator: &str,
        mut inner: Builder<S>,
        sub_column: &str,
    ) -> &mut Self {
        inner.sub_column(sub_column);
        self.where_(Filter::compare(column, operator, Subquery::from(inner)))
    }

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.where_(Filter::compare(column, "is", "null"))
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.where_(Filter::compare(column, "is", "not null"))
    }

    pub fn where_in<T: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_(Filter::compare(column, "in", Operand::list(values)))
    }

    pub fn where_not_in<T: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_(Filter::compare(column, "not in", Operand::list(values)))
    }

    pub fn where_like(&mut self, column: &str, pattern: impl Into<Value>) -> &mut Self {
        self.where_(Filter::compare(column, "like", Operand::Value(pattern.into())))
    }

    pub fn where_not_like(&mut self, column: &str, pattern: impl Into<Value>) -> &mut Self {
        self.where_(Filter::compare(column, "not like", Operand::Value(pattern.into())))
    }

    /// `column between ? and ?`. `range` must hold exactly two values.
    pub fn where_between<T: Into<Value>>(
        &mut self,
        column: &str,
        range: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_(Filter::compare(column, "between", Operand::list(range)))
    }

    pub fn where_not_between<T: Into<Value>>(
        &mut self,
        column: &str,
        range: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.where_(Filter::compare(column, "not between", Operand::list(range)))
    }

    /// AND a filter onto the HAVING clause.
    pub fn having(&mut self, filter: Filter) -> &mut Self {
        self.push_having(filter)
    }

    pub fn having_raw(&mut self, expr: &str, bindings: Vec<Value>) -> &mut Self {
        if !expr.trim().is_empty() {
            self.scope
                .push_having(ConditionEntry::raw(expr, bindings, Connective::And));
        }
        self
    }

    pub fn having_between<T: Into<Value>>(
        &mut self,
        column: &str,
        range: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.push_having(Filter::compare(column, "between", Operand::list(range)))
    }

    pub fn having_not_between<T: Into<Value>>(
        &mut self,
        column: &str,
        range: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        self.push_having(Filter::compare(column, "not between", Operand::list(range)))
    }

    pub fn having_null(&mut self, column: &str) -> &mut Self {
        self.push_having(Filter::compare(column, "is", "null"))
    }

    pub fn having_not_null(&mut self, column: &str) -> &mut Self {
        self.push_having(Filter::compare(column, "is", "not null"))
    }
}
