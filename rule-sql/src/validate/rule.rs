//! Operator/operand shape validation for a single rule.

use super::policy::ValidationError;
use crate::builder::Rule;

/// Check that a rule is well formed.
///
/// A rule is well formed when its field is non-empty and its operand has the shape the
/// operator requires (see [`Operator::arity`](crate::Operator::arity)).
///
/// # Example
///
/// ```
/// use rule_sql::{Operator, Rule, validate};
///
/// assert!(validate(&Rule::list("id", Operator::In, [1, 2, 3])).is_ok());
/// assert!(validate(&Rule::list("id", Operator::Between, [1])).is_err());
/// assert!(validate(&Rule::value("deleted_at", Operator::IsNull, 1)).is_err());
/// ```
pub fn validate(rule: &Rule) -> Result<(), ValidationError> {
    if rule.field.as_str().is_empty() {
        return Err(ValidationError::EmptyField {
            operator: rule.operator,
        });
    }

    let expected = rule.operator.arity();
    if !expected.accepts(&rule.operand) {
        return Err(ValidationError::ValueShape {
            field: rule.field.to_string(),
            operator: rule.operator,
            expected,
            found: rule.operand.shape(),
        });
    }

    Ok(())
}
