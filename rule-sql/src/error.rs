//! Error types returned by [`QueryBuilder::build`](crate::QueryBuilder::build).

use thiserror::Error;

use crate::builder::{Arity, Operator, ParseError};
use crate::validate::{InjectionDetected, ValidationError};

/// Why a rule tree could not be compiled.
///
/// Every variant is terminal for the call; no fragment is returned alongside it.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The rule tree failed validation.
    #[error("invalid rule: {0}")]
    Validation(#[from] ValidationError),

    /// A group had no children.
    #[error("group has no rules")]
    EmptyGroup,

    /// No registered translator handles the operator.
    #[error("no translator for operator `{operator}` on field `{field}`")]
    UnsupportedOperator {
        /// The field of the failing rule.
        field: String,
        /// The operator nothing handled.
        operator: Operator,
    },

    /// The translator matched but the operand has the wrong shape.
    #[error("operator `{operator}` on field `{field}` expects {expected}, got {found}")]
    UnsupportedValueShape {
        /// The field of the failing rule.
        field: String,
        /// The operator of the failing rule.
        operator: Operator,
        /// What the operator requires.
        expected: Arity,
        /// What the rule carried.
        found: String,
    },

    /// A fragment filter rejected the compiled fragment.
    #[error(transparent)]
    InjectionDetected(#[from] InjectionDetected),

    /// JSON input could not be turned into a rule tree.
    #[error("invalid rule JSON: {0}")]
    Parse(#[from] ParseError),
}
