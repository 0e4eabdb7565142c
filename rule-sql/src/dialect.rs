//! SQL dialects for MySQL, Postgres and `SQLite`.
//!
//! Every dialect emits positional `?` placeholders; what differs is the set of structural
//! tokens that must never appear inside a caller-supplied identifier. Each dialect gets the
//! common denylists below plus its own extras.

use std::fmt;

/// Structural substrings rejected in identifiers for every dialect.
const COMMON_TOKENS: &[&str] = &[
    ";", "--", "/*", "*/", "'", "\"", "\\", "=", "<", ">", "(", ")", ",", "|", "&", "+", "0x",
];

/// Keywords rejected as whole words in identifiers for every dialect.
const COMMON_KEYWORDS: &[&str] = &[
    // boolean structure
    "or",
    "and",
    "not",
    "is",
    "null",
    "like",
    "between",
    "in",
    // stacked statements and sub-selects
    "select",
    "insert",
    "update",
    "delete",
    "drop",
    "truncate",
    "alter",
    "create",
    "grant",
    "revoke",
    "exec",
    "execute",
    "union",
    "into",
    "from",
    "where",
    "having",
    "limit",
    "offset",
    "returning",
    // timing functions
    "sleep",
    "benchmark",
    "waitfor",
];

/// SQL dialect trait for database-specific injection denylists.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Human-readable dialect name.
    fn name(&self) -> &'static str;

    /// Substrings that may not appear anywhere in an identifier (matched case-insensitively).
    fn denied_tokens(&self) -> &'static [&'static str] {
        COMMON_TOKENS
    }

    /// Keywords that may not appear as whole words in an identifier.
    fn denied_keywords(&self) -> &'static [&'static str] {
        COMMON_KEYWORDS
    }

    /// Dialect-specific substrings checked in addition to [`denied_tokens`](Self::denied_tokens).
    fn extra_tokens(&self) -> &'static [&'static str] {
        &[]
    }

    /// Dialect-specific keywords checked in addition to [`denied_keywords`](Self::denied_keywords).
    fn extra_keywords(&self) -> &'static [&'static str] {
        &[]
    }
}

/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct MySql;

impl Dialect for MySql {
    #[inline]
    fn name(&self) -> &'static str {
        "mysql"
    }

    #[inline]
    fn extra_tokens(&self) -> &'static [&'static str] {
        // `#` opens a comment, backticks quote identifiers
        &["#", "`"]
    }

    #[inline]
    fn extra_keywords(&self) -> &'static [&'static str] {
        &[
            "xor", "rlike", "regexp", "load_file", "outfile", "dumpfile",
        ]
    }
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn name(&self) -> &'static str {
        "postgres"
    }

    #[inline]
    fn extra_tokens(&self) -> &'static [&'static str] {
        // `$$` opens a dollar-quoted string, `::` casts
        &["$$", "::"]
    }

    #[inline]
    fn extra_keywords(&self) -> &'static [&'static str] {
        &["ilike", "similar", "pg_sleep", "copy"]
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[inline]
    fn extra_keywords(&self) -> &'static [&'static str] {
        &["attach", "detach", "pragma", "glob", "sqlite_master"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(MySql.name(), "mysql");
        assert_eq!(Postgres.name(), "postgres");
        assert_eq!(Sqlite.name(), "sqlite");
    }

    #[test]
    fn test_common_lists_shared() {
        for dialect in [&MySql as &dyn Dialect, &Postgres, &Sqlite] {
            assert_eq!(dialect.denied_tokens(), COMMON_TOKENS);
            assert_eq!(dialect.denied_keywords(), COMMON_KEYWORDS);
        }
    }

    #[test]
    fn test_mysql_extras() {
        assert!(MySql.extra_tokens().contains(&"#"));
        assert!(MySql.extra_tokens().contains(&"`"));
        assert!(!Sqlite.extra_tokens().contains(&"#"));
    }

    #[test]
    fn test_postgres_extras() {
        assert!(Postgres.extra_tokens().contains(&"$$"));
        assert!(Postgres.extra_keywords().contains(&"pg_sleep"));
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for dialect in [&MySql as &dyn Dialect, &Postgres, &Sqlite] {
            for kw in dialect.denied_keywords().iter().chain(dialect.extra_keywords()) {
                assert_eq!(*kw, kw.to_ascii_lowercase());
            }
        }
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{MySql:?}"), "MySql");
        assert_eq!(format!("{Postgres:?}"), "Postgres");
        assert_eq!(format!("{Sqlite:?}"), "Sqlite");
    }

    #[test]
    #[allow(clippy::default_trait_access)]
    fn test_default_trait() {
        let pg: Postgres = Default::default();
        assert_eq!(pg.name(), "postgres");
    }
}
