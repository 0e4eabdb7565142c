//! Query builder: validate, compile, filter.

use crate::dialect::Dialect;
use crate::error::CompileError;
use crate::validate::{FragmentFilter, InjectionFilter, RulePolicy};

use super::compile::GroupCompiler;
use super::parse::parse_rules;
use super::translate::Registry;
use super::types::{Node, Value};

/// Build result containing a `WHERE` fragment and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "query result must be used"]
#[non_exhaustive]
pub struct QueryResult {
    /// The fragment, with `?` placeholders.
    pub sql: String,
    /// Parameter values, in placeholder order.
    pub params: Vec<Value>,
}

impl QueryResult {
    /// Split into fragment and parameters.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Everything a [`QueryBuilder`] needs besides its dialect.
///
/// Assembled once and moved into the builder; there is no way to change it afterwards.
///
/// # Example
///
/// ```
/// use rule_sql::{BuilderConfig, IdentifierFilter, Operator, QueryBuilder, RulePolicy, Sqlite};
///
/// let config = BuilderConfig::new()
///     .policy(
///         RulePolicy::new()
///             .allow_fields(&["name", "age"])
///             .deny_operators(&[Operator::Contains]),
///     )
///     .filter(IdentifierFilter::default());
///
/// let builder = QueryBuilder::new(Sqlite::default(), config);
/// # let _ = builder;
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub struct BuilderConfig {
    /// Tree limits checked before compiling.
    pub policy: RulePolicy,
    /// The compiler, owning its translator registry.
    pub compiler: GroupCompiler,
    /// Filters run on the compiled fragment, in order.
    pub filters: Vec<Box<dyn FragmentFilter>>,
}

impl BuilderConfig {
    /// No tree limits, the standard registry and a single [`InjectionFilter`].
    ///
    /// Depth and rule-count caps are opt-in through [`policy`](Self::policy), for
    /// example with [`RulePolicy::new`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: RulePolicy::permissive(),
            compiler: GroupCompiler::default(),
            filters: vec![Box::new(InjectionFilter)],
        }
    }

    /// Replace the tree policy.
    #[must_use]
    pub fn policy(mut self, policy: RulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the translator registry.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.compiler = GroupCompiler::new(registry);
        self
    }

    /// Append a filter after the existing ones.
    #[must_use]
    pub fn filter(mut self, filter: impl FragmentFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Replace the whole filter chain. An empty chain disables filtering.
    #[must_use]
    pub fn filters(mut self, filters: Vec<Box<dyn FragmentFilter>>) -> Self {
        self.filters = filters;
        self
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns rule trees into parameterized `WHERE` fragments for one dialect.
///
/// `build` takes `&self`; a single builder can be shared across threads.
#[derive(Debug)]
pub struct QueryBuilder<D: Dialect> {
    dialect: D,
    config: BuilderConfig,
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a builder from a dialect and a finished configuration.
    pub const fn new(dialect: D, config: BuilderConfig) -> Self {
        Self { dialect, config }
    }

    /// Create a builder with [`BuilderConfig::new`].
    pub fn standard(dialect: D) -> Self {
        Self::new(dialect, BuilderConfig::new())
    }

    /// The target dialect.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// The configuration this builder was assembled with.
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Validate, compile and filter a tree.
    ///
    /// The first error is returned as is. No fragment is produced unless every step passed.
    ///
    /// # Example
    ///
    /// ```
    /// use rule_sql::prelude::*;
    ///
    /// let tree: Node = Group::and([
    ///     Rule::value("age", Operator::Greater, 18),
    ///     Rule::value("status", Operator::Equal, "active"),
    /// ])
    /// .into();
    ///
    /// let result = mysql().build(&tree).unwrap();
    /// assert_eq!(result.sql, "age > ? AND status = ?");
    /// assert_eq!(result.params, vec![Value::Int(18), Value::String("active".into())]);
    /// ```
    pub fn build(&self, root: &Node) -> Result<QueryResult, CompileError> {
        self.config.policy.validate_tree(root)?;

        let operation = self.config.compiler.compile(root)?;

        for filter in &self.config.filters {
            if let Err(err) = filter.apply(&operation, &self.dialect) {
                tracing::warn!(
                    dialect = self.dialect.name(),
                    token = %err.token,
                    "fragment rejected by injection filter"
                );
                return Err(err.into());
            }
        }

        let (sql, params) = operation.into_parts();
        tracing::debug!(
            dialect = self.dialect.name(),
            rules = root.rule_count(),
            params = params.len(),
            "built rule fragment"
        );
        Ok(QueryResult { sql, params })
    }

    /// Parse jQuery QueryBuilder JSON and [`build`](Self::build) it.
    pub fn build_json(&self, json: &str) -> Result<QueryResult, CompileError> {
        let root = parse_rules(json)?;
        self.build(&root)
    }
}
