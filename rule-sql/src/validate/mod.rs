//! Security validation layer for rule trees and compiled fragments.
//!
//! This module provides:
//! - Per-rule operator/operand shape checks ([`validate`])
//! - Tree-wide limits for user-provided rules ([`RulePolicy`])
//! - Post-compile injection filters over the identifiers written into a fragment
//!   ([`InjectionFilter`], [`IdentifierFilter`])
//!
//! # Example
//!
//! ```
//! use rule_sql::{Group, Node, Operator, Rule, RulePolicy};
//!
//! let policy = RulePolicy::new()
//!     .allow_fields(&["name", "status"])
//!     .deny_operators(&[Operator::Contains])
//!     .max_depth(3);
//!
//! let tree: Node = Group::and([
//!     Rule::value("status", Operator::Equal, "active"),
//!     Rule::value("name", Operator::BeginsWith, "Al"),
//! ])
//! .into();
//!
//! assert!(policy.validate_tree(&tree).is_ok());
//! ```

mod identifier;
mod injection;
mod policy;
mod rule;

// Re-export all public items
pub use identifier::{IdentifierFilter, is_valid_sql_identifier};
pub use injection::{FragmentFilter, InjectionDetected, InjectionFilter};
pub use policy::{RulePolicy, ValidationError};
pub use rule::validate;
