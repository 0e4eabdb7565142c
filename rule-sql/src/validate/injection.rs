//! Post-compile injection defense.
//!
//! Values are always bound, so the only caller-influenced text in a fragment is the set of
//! identifiers written by [`OperationBuilder::field`](crate::OperationBuilder::field). The
//! filters here inspect exactly those and reject the whole compile on any match. Nothing
//! is escaped or rewritten.

use std::fmt;

use thiserror::Error;

use crate::builder::Operation;
use crate::dialect::Dialect;

/// A fragment filter rejected the compile.
///
/// Only the matched denylist entry is carried, never the identifier it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("injection detected: `{token}`")]
#[non_exhaustive]
pub struct InjectionDetected {
    /// The denylist entry that matched.
    pub token: String,
}

impl InjectionDetected {
    /// Create an error for the given denylist entry.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// A guard that runs once on the assembled fragment.
///
/// Filters are chained by [`BuilderConfig`](crate::BuilderConfig); all must pass.
pub trait FragmentFilter: fmt::Debug + Send + Sync {
    /// Inspect a compiled operation for the given dialect.
    fn apply(&self, operation: &Operation, dialect: &dyn Dialect)
    -> Result<(), InjectionDetected>;
}

/// Rejects identifiers containing a dialect's structural tokens or keywords.
///
/// Tokens (`;`, `--`, `/*`, quotes, ...) match anywhere, case-insensitively. Keywords
/// (`union`, `select`, `or`, ...) match as whole words only, so `order_id` and
/// `last_updated` pass.
///
/// # Example
///
/// ```
/// use rule_sql::{Field, FragmentFilter, InjectionFilter, Operation, Sqlite, Value};
///
/// let op = Operation::builder()
///     .field(&Field::new("id; DROP TABLE users"))
///     .keyword(" = ")
///     .bind(Value::Int(1))
///     .finish();
///
/// let err = InjectionFilter::default().apply(&op, &Sqlite::default()).unwrap_err();
/// assert_eq!(err.token, ";");
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct InjectionFilter;

impl FragmentFilter for InjectionFilter {
    fn apply(
        &self,
        operation: &Operation,
        dialect: &dyn Dialect,
    ) -> Result<(), InjectionDetected> {
        for field in operation.identifiers() {
            if let Some(token) = find_denied(field.as_str(), dialect) {
                return Err(InjectionDetected::new(token));
            }
        }
        Ok(())
    }
}

/// First denylist entry found in `identifier`, tokens before keywords.
fn find_denied(identifier: &str, dialect: &dyn Dialect) -> Option<&'static str> {
    let lower = identifier.to_ascii_lowercase();

    let token = dialect
        .denied_tokens()
        .iter()
        .chain(dialect.extra_tokens())
        .find(|token| lower.contains(**token));
    if let Some(token) = token {
        return Some(token);
    }

    dialect
        .denied_keywords()
        .iter()
        .chain(dialect.extra_keywords())
        .find(|kw| contains_sql_keyword(&lower, kw))
        .copied()
}

/// Check if a string contains a SQL keyword as a whole word.
///
/// This prevents false positives like "update" in "`last_updated`". A keyword glued to a
/// numeric literal (`1e0or`, `.1or`) still counts: SQL lexers end the number where the
/// keyword begins.
#[inline]
fn contains_sql_keyword(haystack: &str, keyword: &str) -> bool {
    let bytes = haystack.as_bytes();
    let kw_bytes = keyword.as_bytes();
    let kw_len = kw_bytes.len();

    if kw_len == 0 || bytes.len() < kw_len {
        return false;
    }

    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

    for i in 0..=(bytes.len() - kw_len) {
        if bytes.get(i..i + kw_len) != Some(kw_bytes) {
            continue;
        }
        let before_ok = i == 0
            || bytes.get(i - 1).is_none_or(|b| !is_word(*b))
            || follows_number(bytes, i);
        let after_ok = bytes.get(i + kw_len).is_none_or(|b| !is_word(*b));
        if before_ok && after_ok {
            return true;
        }
    }

    false
}

/// Whether the word run ending just before `end` starts with a digit.
fn follows_number(bytes: &[u8], end: usize) -> bool {
    let Some(head) = bytes.get(..end) else {
        return false;
    };
    let start = head
        .iter()
        .rposition(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .map_or(0, |p| p + 1);
    head.get(start).is_some_and(u8::is_ascii_digit)
}
