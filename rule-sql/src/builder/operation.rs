//! Compiled fragments.
//!
//! An [`Operation`] can only be assembled through [`OperationBuilder`], which accepts
//! caller text solely as a [`Field`] and static keywords as `&'static str`. Values go
//! through [`OperationBuilder::bind`], which writes a `?` and pushes the value onto the
//! parameter list, so placeholders and parameters cannot drift apart.

use super::types::{Combinator, Field, Value};

/// A compiled condition: SQL text, its bound values, and the identifiers written into it.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "an Operation carries the compiled fragment"]
pub struct Operation {
    sql: String,
    params: Vec<Value>,
    identifiers: Vec<Field>,
}

impl Operation {
    /// Start a new fragment.
    pub fn builder() -> OperationBuilder {
        OperationBuilder::default()
    }

    /// The fragment text with `?` placeholders.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound values in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Identifiers concatenated into the fragment, in order of appearance.
    #[must_use]
    pub fn identifiers(&self) -> &[Field] {
        &self.identifiers
    }

    /// Split into fragment text and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Join sibling operations with a combinator, keeping params in child order.
    pub(crate) fn join(parts: Vec<Self>, combinator: Combinator) -> Self {
        let mut joined = Self {
            sql: String::new(),
            params: Vec::new(),
            identifiers: Vec::new(),
        };
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                joined.sql.push_str(combinator.separator());
            }
            joined.sql.push_str(&part.sql);
            joined.params.extend(part.params);
            joined.identifiers.extend(part.identifiers);
        }
        joined
    }

    /// Wrap the fragment as `(...)`.
    pub(crate) fn parenthesize(mut self) -> Self {
        self.sql = format!("({})", self.sql);
        self
    }

    /// Wrap the fragment as `NOT (...)`.
    pub(crate) fn negate(mut self) -> Self {
        self.sql = format!("NOT ({})", self.sql);
        self
    }
}

/// Writer for [`Operation`] fragments.
///
/// ```
/// use rule_sql::{Field, Operation, Value};
///
/// let op = Operation::builder()
///     .field(&Field::new("age"))
///     .keyword(" > ")
///     .bind(Value::Int(18))
///     .finish();
///
/// assert_eq!(op.sql(), "age > ?");
/// assert_eq!(op.params(), &[Value::Int(18)]);
/// ```
#[derive(Debug, Default)]
#[must_use = "call finish() to produce the Operation"]
pub struct OperationBuilder {
    sql: String,
    params: Vec<Value>,
    identifiers: Vec<Field>,
}

impl OperationBuilder {
    /// Write an identifier verbatim and record it for filtering.
    pub fn field(mut self, field: &Field) -> Self {
        self.sql.push_str(field.as_str());
        self.identifiers.push(field.clone());
        self
    }

    /// Write fixed SQL text.
    pub fn keyword(mut self, text: &'static str) -> Self {
        self.sql.push_str(text);
        self
    }

    /// Write a `?` placeholder and bind `value` to it.
    pub fn bind(mut self, value: Value) -> Self {
        self.sql.push('?');
        self.params.push(value);
        self
    }

    /// Write `?, ?, ...` for each value and bind them in order.
    pub fn bind_list(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self = self.bind(value);
        }
        self
    }

    /// Finish the fragment.
    pub fn finish(self) -> Operation {
        Operation {
            sql: self.sql,
            params: self.params,
            identifiers: self.identifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(field: &str, value: i64) -> Operation {
        Operation::builder()
            .field(&Field::new(field))
            .keyword(" = ")
            .bind(Value::Int(value))
            .finish()
    }

    #[test]
    fn test_bind_list_placeholders() {
        let op = Operation::builder()
            .field(&Field::new("id"))
            .keyword(" IN (")
            .bind_list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            .keyword(")")
            .finish();

        assert_eq!(op.sql(), "id IN (?, ?, ?)");
        assert_eq!(op.params().len(), 3);
        assert_eq!(op.identifiers(), &[Field::new("id")]);
    }

    #[test]
    fn test_join_keeps_order() {
        let op = Operation::join(vec![eq("a", 1), eq("b", 2), eq("c", 3)], Combinator::Or);

        assert_eq!(op.sql(), "a = ? OR b = ? OR c = ?");
        assert_eq!(op.params(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(op.identifiers().len(), 3);
    }

    #[test]
    fn test_parenthesize_and_negate() {
        let op = Operation::join(vec![eq("a", 1), eq("b", 2)], Combinator::And);
        assert_eq!(op.clone().parenthesize().sql(), "(a = ? AND b = ?)");
        assert_eq!(op.negate().sql(), "NOT (a = ? AND b = ?)");
    }

    #[test]
    fn test_into_parts() {
        let (sql, params) = eq("x", 7).into_parts();
        assert_eq!(sql, "x = ?");
        assert_eq!(params, vec![Value::Int(7)]);
    }
}
