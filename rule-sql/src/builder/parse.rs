//! Runtime JSON parsing for jQuery QueryBuilder rule trees.
//!
//! Parse the JSON a QueryBuilder client posts into a [`Node`] tree.
//!
//! # Quick Start
//!
//! ```
//! use rule_sql::prelude::*;
//!
//! let tree = parse_rules(r#"{
//!     "condition": "AND",
//!     "rules": [
//!         {"field": "age", "type": "integer", "operator": "greater", "value": "18"},
//!         {"field": "status", "operator": "equal", "value": "active"}
//!     ]
//! }"#).unwrap();
//!
//! let result = sqlite().build(&tree).unwrap();
//! assert_eq!(result.sql, "age > ? AND status = ?");
//! assert_eq!(result.params, vec![Value::Int(18), Value::String("active".into())]);
//! ```
//!
//! # Supported Syntax
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `condition` | `"AND"` or `"OR"` (case-insensitive, default `AND`) |
//! | `rules` | children of a group: rules or nested groups |
//! | `not` | `true` negates the group (boolean or `null`) |
//! | `field` / `id` | column name of a rule (`field` wins) |
//! | `operator` | operator wire name, e.g. `"not_between"` |
//! | `value` | scalar, array, or `null` |
//! | `type` | `integer`, `double`, `boolean`, `string`, `date`, `time`, `datetime` |

use thiserror::Error;

use super::types::{Combinator, Group, Node, Operand, Operator, Rule, Value};
use miniserde::json::{Number, Object, Value as JsonValue};

/// Hard recursion limit while parsing nested groups.
const MAX_PARSE_DEPTH: usize = 64;

/// Error type for JSON rule parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Invalid JSON syntax or encoding.
    #[error("invalid JSON syntax or encoding")]
    InvalidJson,
    /// Expected an object but got something else.
    #[error("expected JSON object")]
    ExpectedObject,
    /// Expected an array but got something else.
    #[error("expected JSON array")]
    ExpectedArray,
    /// Unknown operator name.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    /// Unknown group condition.
    #[error("unknown condition '{0}'")]
    UnknownCondition(String),
    /// A rule object has neither `field` nor `id`.
    #[error("rule has no field")]
    MissingField,
    /// A value could not be converted.
    #[error("value of field '{field}' is not a valid {expected}")]
    InvalidValue {
        /// The field whose value was rejected.
        field: String,
        /// The type the value should have had.
        expected: &'static str,
    },
    /// A group's `not` flag is not a boolean.
    #[error("expected boolean for 'not'")]
    InvalidNegation,
    /// Groups nest deeper than the parser allows.
    #[error("rule groups nested deeper than {} levels", MAX_PARSE_DEPTH)]
    NestingTooDeep,
}

/// Declared value type of a rule, from its `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    Integer,
    Double,
    Boolean,
    Text,
    /// No declared type; keep the JSON type.
    Inferred,
}

impl ValueType {
    fn from_name(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("integer") => Self::Integer,
            Some("double") => Self::Double,
            Some("boolean") => Self::Boolean,
            Some("string" | "date" | "time" | "datetime") => Self::Text,
            _ => Self::Inferred,
        }
    }

    const fn expected(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Text => "string",
            Self::Inferred => "scalar",
        }
    }
}

/// Parse a rule tree from a JSON string.
///
/// # Example
///
/// ```
/// use rule_sql::prelude::*;
///
/// let tree = parse_rules(r#"{
///     "condition": "OR",
///     "rules": [
///         {"field": "role", "operator": "equal", "value": "admin"},
///         {"field": "role", "operator": "equal", "value": "moderator"}
///     ]
/// }"#).unwrap();
/// assert_eq!(tree.rule_count(), 2);
/// ```
pub fn parse_rules(json_str: &str) -> Result<Node, ParseError> {
    let json: JsonValue =
        miniserde::json::from_str(json_str).map_err(|_| ParseError::InvalidJson)?;
    Node::from_json(&json)
}

/// Parse a rule tree from JSON bytes, e.g. a raw request body.
///
/// # Example
///
/// ```
/// use rule_sql::prelude::*;
///
/// let body = br#"{"field": "name", "operator": "begins_with", "value": "John"}"#;
/// let tree = parse_rules_bytes(body).unwrap();
/// assert!(matches!(tree, Node::Rule(_)));
/// ```
pub fn parse_rules_bytes(bytes: &[u8]) -> Result<Node, ParseError> {
    let s = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidJson)?;
    parse_rules(s)
}

impl Node {
    /// Build a tree from an already parsed `miniserde` JSON value.
    ///
    /// An object with a `rules` key is a group; anything else must be a rule.
    pub fn from_json(json: &JsonValue) -> Result<Self, ParseError> {
        node_from_json(json, 0)
    }
}

fn node_from_json(json: &JsonValue, depth: usize) -> Result<Node, ParseError> {
    let JsonValue::Object(obj) = json else {
        return Err(ParseError::ExpectedObject);
    };

    if obj.contains_key("rules") {
        group_from_json(obj, depth).map(Node::Group)
    } else {
        rule_from_json(obj).map(Node::Rule)
    }
}

fn group_from_json(obj: &Object, depth: usize) -> Result<Group, ParseError> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(ParseError::NestingTooDeep);
    }

    let combinator = match obj.get("condition") {
        None | Some(JsonValue::Null) => Combinator::And,
        Some(JsonValue::String(s)) if s.eq_ignore_ascii_case("and") => Combinator::And,
        Some(JsonValue::String(s)) if s.eq_ignore_ascii_case("or") => Combinator::Or,
        Some(JsonValue::String(s)) => return Err(ParseError::UnknownCondition(s.clone())),
        Some(_) => return Err(ParseError::UnknownCondition(String::new())),
    };

    let negated = match obj.get("not") {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(_) => return Err(ParseError::InvalidNegation),
    };

    let Some(JsonValue::Array(rules)) = obj.get("rules") else {
        return Err(ParseError::ExpectedArray);
    };

    let children = rules
        .iter()
        .map(|child| node_from_json(child, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let group = Group::new(combinator, children);
    Ok(if negated { group.negate() } else { group })
}

fn rule_from_json(obj: &Object) -> Result<Rule, ParseError> {
    let field = match (obj.get("field"), obj.get("id")) {
        (Some(JsonValue::String(f)), _) | (None, Some(JsonValue::String(f))) => f.clone(),
        _ => return Err(ParseError::MissingField),
    };

    let operator = match obj.get("operator") {
        Some(JsonValue::String(name)) => {
            Operator::from_name(name).ok_or_else(|| ParseError::UnknownOperator(name.clone()))?
        },
        _ => return Err(ParseError::UnknownOperator(String::new())),
    };

    let value_type = ValueType::from_name(match obj.get("type") {
        Some(JsonValue::String(t)) => Some(t.as_str()),
        _ => None,
    });

    let convert = |v: &JsonValue| {
        convert_value(v, value_type).ok_or_else(|| ParseError::InvalidValue {
            field: field.clone(),
            expected: value_type.expected(),
        })
    };

    let operand = match obj.get("value") {
        None | Some(JsonValue::Null) => Operand::None,
        Some(JsonValue::Array(items)) => {
            Operand::List(items.iter().map(convert).collect::<Result<Vec<_>, _>>()?)
        },
        // QueryBuilder sends a single selection for `in` as a bare scalar
        Some(v) if matches!(operator, Operator::In | Operator::NotIn) => {
            Operand::List(vec![convert(v)?])
        },
        Some(v) => Operand::Single(convert(v)?),
    };

    Ok(Rule::new(field, operator, operand))
}

/// Convert a JSON scalar to a bound value of the declared type.
fn convert_value(json: &JsonValue, value_type: ValueType) -> Option<Value> {
    match value_type {
        ValueType::Inferred => match json {
            JsonValue::Bool(b) => Some(Value::Bool(*b)),
            JsonValue::Number(n) => Some(number_value(n)),
            JsonValue::String(s) => Some(Value::String(s.clone())),
            _ => None,
        },
        ValueType::Integer => match json {
            JsonValue::Number(Number::I64(i)) => Some(Value::Int(*i)),
            JsonValue::Number(Number::U64(u)) => i64::try_from(*u).ok().map(Value::Int),
            JsonValue::String(s) => s.trim().parse().ok().map(Value::Int),
            _ => None,
        },
        ValueType::Double => match json {
            JsonValue::Number(Number::F64(f)) => {
                Some(*f).filter(|f| f.is_finite()).map(Value::Float)
            },
            #[allow(clippy::cast_precision_loss)]
            JsonValue::Number(Number::I64(i)) => Some(Value::Float(*i as f64)),
            #[allow(clippy::cast_precision_loss)]
            JsonValue::Number(Number::U64(u)) => Some(Value::Float(*u as f64)),
            JsonValue::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            _ => None,
        },
        ValueType::Boolean => match json {
            JsonValue::Bool(b) => Some(Value::Bool(*b)),
            JsonValue::Number(Number::I64(0) | Number::U64(0)) => Some(Value::Bool(false)),
            JsonValue::Number(Number::I64(1) | Number::U64(1)) => Some(Value::Bool(true)),
            JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        ValueType::Text => match json {
            JsonValue::String(s) => Some(Value::String(s.clone())),
            JsonValue::Number(n) => Some(Value::String(number_value(n).to_text())),
            JsonValue::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
    }
}

#[allow(clippy::cast_precision_loss)]
fn number_value(n: &Number) -> Value {
    match n {
        Number::I64(i) => Value::Int(*i),
        Number::U64(u) => i64::try_from(*u).map_or_else(|_| Value::Float(*u as f64), Value::Int),
        Number::F64(f) => Value::Float(*f),
    }
}
