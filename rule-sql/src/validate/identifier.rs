//! Strict identifier allowlist filter.

use super::injection::{FragmentFilter, InjectionDetected};
use crate::builder::Operation;
use crate::dialect::Dialect;

/// Maximum length for a (possibly dotted) identifier.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate that a string is a safe, optionally qualified SQL identifier.
///
/// A valid identifier is one or more dot-separated segments, where each segment:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
///
/// The whole identifier must be non-empty and at most 128 bytes.
///
/// # Examples
///
/// ```
/// use rule_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("users"));
/// assert!(is_valid_sql_identifier("user_id"));
/// assert!(is_valid_sql_identifier("users.email"));
/// assert!(is_valid_sql_identifier("_private"));
///
/// assert!(!is_valid_sql_identifier(""));
/// assert!(!is_valid_sql_identifier("123abc"));
/// assert!(!is_valid_sql_identifier("user-name"));
/// assert!(!is_valid_sql_identifier("users..email"));
/// assert!(!is_valid_sql_identifier("user; DROP"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    first_violation(s).is_none()
}

/// Describe the first reason `s` is not a valid identifier.
fn first_violation(s: &str) -> Option<String> {
    if s.is_empty() {
        return Some("<empty>".to_string());
    }
    if s.len() > MAX_IDENTIFIER_LENGTH {
        return Some("<too long>".to_string());
    }

    for segment in s.split('.') {
        let mut chars = segment.chars();

        // First character must be letter or underscore
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
            Some(c) => return Some(c.to_string()),
            None => return Some("<empty segment>".to_string()),
        }

        // Rest must be letters, digits, or underscores
        if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Some(c.to_string());
        }
    }

    None
}

/// Rejects identifiers that are not plain (optionally dotted) SQL identifiers.
///
/// Stricter than [`InjectionFilter`](crate::InjectionFilter): an allowlist rather than a
/// denylist, and the same for every dialect. The reported token is the first offending
/// character.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct IdentifierFilter;

impl FragmentFilter for IdentifierFilter {
    fn apply(
        &self,
        operation: &Operation,
        _dialect: &dyn Dialect,
    ) -> Result<(), InjectionDetected> {
        for field in operation.identifiers() {
            if let Some(token) = first_violation(field.as_str()) {
                return Err(InjectionDetected::new(token));
            }
        }
        Ok(())
    }
}
