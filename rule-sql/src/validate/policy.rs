//! Caller-configurable limits for user-provided rule trees.

use thiserror::Error;

use super::rule::validate;
use crate::builder::{Arity, Group, Node, Operator, Rule};

/// Default maximum group nesting depth.
const DEFAULT_MAX_DEPTH: usize = 16;

/// Default maximum number of leaf rules in one tree.
const DEFAULT_MAX_RULES: usize = 1000;

/// Validation configuration for user-provided rule trees.
///
/// Provides four layers on top of per-rule shape checks:
/// 1. Field whitelist - only specific fields can be queried
/// 2. Operator blacklist - expensive or unwanted operators can be denied
/// 3. Nesting depth limit - prevent deeply nested groups
/// 4. Rule count limit - prevent oversized trees
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RulePolicy {
    /// Allowed field names (whitelist). Empty = allow all fields.
    pub allowed_fields: Vec<String>,
    /// Denied operators (blacklist).
    pub denied_operators: Vec<Operator>,
    /// Maximum group nesting depth. The root group is depth 0.
    pub max_depth: usize,
    /// Maximum number of leaf rules.
    pub max_rules: usize,
}

impl RulePolicy {
    /// Create a policy with defaults: any field, any operator, depth 16, 1000 rules.
    ///
    /// # Example
    ///
    /// ```
    /// use rule_sql::{Operator, RulePolicy};
    ///
    /// let policy = RulePolicy::new()
    ///     .allow_fields(&["name", "email", "status"])
    ///     .deny_operators(&[Operator::Contains])
    ///     .max_depth(3);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allowed_fields: Vec::new(),
            denied_operators: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_rules: DEFAULT_MAX_RULES,
        }
    }

    /// Create a policy with no depth or size limits.
    ///
    /// This is what [`BuilderConfig::new`](crate::BuilderConfig::new) uses.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            allowed_fields: Vec::new(),
            denied_operators: Vec::new(),
            max_depth: usize::MAX,
            max_rules: usize::MAX,
        }
    }

    /// Set allowed fields (whitelist). If empty, all fields are allowed.
    #[must_use]
    pub fn allow_fields(mut self, fields: &[&str]) -> Self {
        self.allowed_fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set denied operators (blacklist).
    #[must_use]
    pub fn deny_operators(mut self, ops: &[Operator]) -> Self {
        self.denied_operators = ops.to_vec();
        self
    }

    /// Set maximum nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum number of leaf rules.
    #[must_use]
    pub const fn max_rules(mut self, count: usize) -> Self {
        self.max_rules = count;
        self
    }

    /// Validate a single rule: shape, field whitelist and operator blacklist.
    pub fn validate_rule(&self, rule: &Rule) -> Result<(), ValidationError> {
        validate(rule)?;

        let field = rule.field.as_str();
        if !self.allowed_fields.is_empty() && !self.allowed_fields.iter().any(|f| f == field) {
            return Err(ValidationError::FieldNotAllowed {
                field: field.to_string(),
                allowed: self.allowed_fields.clone(),
            });
        }

        if self.denied_operators.contains(&rule.operator) {
            return Err(ValidationError::OperatorDenied {
                operator: rule.operator,
                field: field.to_string(),
            });
        }

        Ok(())
    }

    /// Validate a whole tree, depth-first and left to right, returning the first violation.
    ///
    /// Empty groups are not reported here; the compiler rejects them.
    pub fn validate_tree(&self, root: &Node) -> Result<(), ValidationError> {
        let mut rules = 0;
        self.validate_node(root, 0, &mut rules)
    }

    fn validate_node(
        &self,
        node: &Node,
        depth: usize,
        rules: &mut usize,
    ) -> Result<(), ValidationError> {
        match node {
            Node::Rule(rule) => {
                *rules += 1;
                if *rules > self.max_rules {
                    return Err(ValidationError::TooManyRules {
                        max: self.max_rules,
                    });
                }
                self.validate_rule(rule)
            },
            Node::Group(group) => self.validate_group(group, depth, rules),
        }
    }

    fn validate_group(
        &self,
        group: &Group,
        depth: usize,
        rules: &mut usize,
    ) -> Result<(), ValidationError> {
        if depth > self.max_depth {
            return Err(ValidationError::NestingTooDeep {
                max: self.max_depth,
                actual: depth,
            });
        }
        for child in &group.children {
            self.validate_node(child, depth + 1, rules)?;
        }
        Ok(())
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The rule has an empty field name.
    #[error("rule with operator `{operator}` has an empty field")]
    EmptyField {
        /// The operator of the offending rule.
        operator: Operator,
    },
    /// The operand does not have the shape the operator requires.
    #[error("operator `{operator}` on field `{field}` expects {expected}, got {found}")]
    ValueShape {
        /// The field of the offending rule.
        field: String,
        /// The operator of the offending rule.
        operator: Operator,
        /// What the operator requires.
        expected: Arity,
        /// What the rule carried.
        found: String,
    },
    /// Field is not in the allowed list.
    #[error("field `{field}` is not allowed, allowed fields: {}", .allowed.join(", "))]
    FieldNotAllowed {
        /// The field that was not allowed.
        field: String,
        /// The list of allowed fields.
        allowed: Vec<String>,
    },
    /// Operator is denied.
    #[error("operator `{operator}` is denied for field `{field}`")]
    OperatorDenied {
        /// The operator that was denied.
        operator: Operator,
        /// The field the operator was used on.
        field: String,
    },
    /// Group nesting exceeds the maximum.
    #[error("rule nesting depth {actual} exceeds maximum {max}")]
    NestingTooDeep {
        /// The maximum allowed nesting depth.
        max: usize,
        /// The depth encountered.
        actual: usize,
    },
    /// Too many leaf rules.
    #[error("rule tree contains too many rules (max {max})")]
    TooManyRules {
        /// The maximum allowed rule count.
        max: usize,
    },
}
