// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Operator wire names in docs
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::must_use_candidate)] // Fluent API doesn't need must_use everywhere
#![allow(clippy::match_same_arms)] // Operator tables read better one arm per operator
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # rule-sql - Rule Trees to Parameterized SQL
//!
//! Compiles nested AND/OR rule trees, as produced by jQuery QueryBuilder style UIs, into a
//! `WHERE` fragment with `?` placeholders plus the ordered values to bind.
//!
//! Column names are the only caller text written into the fragment. Values are always bound.
//! Every fragment is checked by an injection filter before it is returned.
//!
//! ## Quick Start
//!
//! ```
//! # use rule_sql::prelude::*;
//! let tree: Node = Group::or([
//!     Node::from(Group::and([
//!         Rule::value("a", Operator::Equal, 1),
//!         Rule::value("b", Operator::Equal, 2),
//!     ])),
//!     Node::from(Rule::value("c", Operator::Equal, 3)),
//! ])
//! .into();
//!
//! let result = postgres().build(&tree).unwrap();
//! assert_eq!(result.sql, "(a = ? AND b = ?) OR c = ?");
//! assert_eq!(result.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
//! ```
//!
//! ## JSON Rules
//!
//! ```
//! # use rule_sql::prelude::*;
//! let result = sqlite()
//!     .build_json(r#"{"condition": "AND", "rules": [
//!         {"field": "name", "operator": "contains", "value": "smith"}
//!     ]}"#)
//!     .unwrap();
//!
//! assert_eq!(result.sql, "name LIKE ?");
//! assert_eq!(result.params, vec![Value::String("%smith%".into())]);
//! ```
//!
//! ## Supported Operators
//!
//! | Operator | SQL | Value |
//! |----------|-----|-------|
//! | `equal` / `not_equal` | `f = ?` / `f != ?` | single |
//! | `less` / `less_or_equal` | `f < ?` / `f <= ?` | single |
//! | `greater` / `greater_or_equal` | `f > ?` / `f >= ?` | single |
//! | `in` / `not_in` | `f IN (?, ...)` / `f NOT IN (?, ...)` | non-empty list |
//! | `between` / `not_between` | `f BETWEEN ? AND ?` / `f NOT BETWEEN ? AND ?` | two values |
//! | `begins_with` / `not_begins_with` | `f LIKE ?` / `f NOT LIKE ?` | single, bound as `v%` |
//! | `contains` / `not_contains` | `f LIKE ?` / `f NOT LIKE ?` | single, bound as `%v%` |
//! | `ends_with` / `not_ends_with` | `f LIKE ?` / `f NOT LIKE ?` | single, bound as `%v` |
//! | `is_empty` / `is_not_empty` | `f = ''` / `f != ''` | none |
//! | `is_null` / `is_not_null` | `f IS NULL` / `f IS NOT NULL` | none |
//!
//! ## Injection Defense
//!
//! ```
//! # use rule_sql::prelude::*;
//! let tree: Node = Rule::value("id; DROP TABLE users", Operator::Equal, 1).into();
//!
//! let err = mysql().build(&tree).unwrap_err();
//! assert!(matches!(err, CompileError::InjectionDetected(_)));
//! ```

mod builder;
mod dialect;
mod error;
mod validate;

pub use builder::{
    Arity, BuilderConfig, Combinator, Field, Group, GroupCompiler, Node, Operand, Operation,
    OperationBuilder, Operator, ParseError, QueryBuilder, QueryResult, Registry, Rule,
    StandardTranslator, Translator, Value, parse_rules, parse_rules_bytes,
};
pub use dialect::{Dialect, MySql, Postgres, Sqlite};
pub use error::CompileError;
pub use validate::{
    FragmentFilter, IdentifierFilter, InjectionDetected, InjectionFilter, RulePolicy,
    ValidationError, is_valid_sql_identifier, validate,
};

/// Re-export miniserde's json module for runtime rule parsing.
///
/// Use this to parse JSON strings into values for `Node::from_json()`.
///
/// # Example
///
/// ```
/// use rule_sql::{json, Node};
///
/// let json_str = r#"{"field": "name", "operator": "equal", "value": "Alice"}"#;
/// let value: miniserde::json::Value = json::from_str(json_str).unwrap();
/// let node = Node::from_json(&value).unwrap();
/// assert_eq!(node.rule_count(), 1);
/// ```
pub use miniserde::json;

/// Build fragments for MySQL.
///
/// Convenience function that creates a `QueryBuilder` with the default configuration.
#[must_use]
pub fn mysql() -> QueryBuilder<MySql> {
    QueryBuilder::standard(MySql)
}

/// Build fragments for Postgres.
///
/// Convenience function that creates a `QueryBuilder` with the default configuration.
#[must_use]
pub fn postgres() -> QueryBuilder<Postgres> {
    QueryBuilder::standard(Postgres)
}

/// Build fragments for `SQLite`.
///
/// Convenience function that creates a `QueryBuilder` with the default configuration.
#[must_use]
pub fn sqlite() -> QueryBuilder<Sqlite> {
    QueryBuilder::standard(Sqlite)
}

/// Prelude module for convenient imports.
///
/// ```
/// use rule_sql::prelude::*;
/// let result = sqlite().build(&Rule::unary("deleted_at", Operator::IsNull).into()).unwrap();
/// assert_eq!(result.sql, "deleted_at IS NULL");
/// ```
pub mod prelude {
    pub use crate::{
        BuilderConfig, Combinator, CompileError, Dialect, Field, Group, MySql, Node, Operand,
        Operator, ParseError, Postgres, QueryBuilder, QueryResult, Registry, Rule, RulePolicy,
        Sqlite, ValidationError, Value, json, mysql, parse_rules, parse_rules_bytes, postgres,
        sqlite,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
