//! Operator translators and the registry that dispatches rules to them.

use std::fmt;

use super::operation::Operation;
use super::types::{Operand, Operator, Rule, Value};
use crate::error::CompileError;

/// Compiles rules of the operators it claims.
///
/// Implement this to override or extend how operators render; register it on a
/// [`Registry`] ahead of the standard translators.
pub trait Translator: fmt::Debug + Send + Sync {
    /// Whether this translator compiles `operator`.
    fn handles(&self, operator: Operator) -> bool;

    /// Compile a rule whose operator this translator handles.
    fn translate(&self, rule: &Rule) -> Result<Operation, CompileError>;
}

/// Ordered set of translators; the first one that handles an operator wins.
///
/// Assembled once at construction. There is no way to add translators to a registry
/// after it has been handed to a [`GroupCompiler`](crate::GroupCompiler).
#[derive(Debug)]
pub struct Registry {
    translators: Vec<Box<dyn Translator>>,
}

impl Registry {
    /// A registry with no translators. Every rule fails with `UnsupportedOperator`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            translators: Vec::new(),
        }
    }

    /// One [`StandardTranslator`] per operator.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty().with_standard()
    }

    /// Append one [`StandardTranslator`] per operator.
    ///
    /// Call this after registering overrides so they take precedence.
    #[must_use]
    pub fn with_standard(self) -> Self {
        Operator::ALL
            .into_iter()
            .fold(self, |registry, op| registry.with(StandardTranslator::new(op)))
    }

    /// Append a translator.
    #[must_use]
    pub fn with(mut self, translator: impl Translator + 'static) -> Self {
        self.translators.push(Box::new(translator));
        self
    }

    /// Number of registered translators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.translators.len()
    }

    /// Whether no translators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Compile a rule with the first translator that handles its operator.
    pub fn resolve(&self, rule: &Rule) -> Result<Operation, CompileError> {
        let translator = self
            .translators
            .iter()
            .find(|t| t.handles(rule.operator))
            .ok_or_else(|| CompileError::UnsupportedOperator {
                field: rule.field.to_string(),
                operator: rule.operator,
            })?;
        translator.translate(rule)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Translator for one built-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardTranslator {
    operator: Operator,
}

impl StandardTranslator {
    /// Create a translator for `operator`.
    #[must_use]
    pub const fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Translator for StandardTranslator {
    fn handles(&self, operator: Operator) -> bool {
        self.operator == operator
    }

    fn translate(&self, rule: &Rule) -> Result<Operation, CompileError> {
        translate_rule(rule)
    }
}

/// Compile any built-in operator.
fn translate_rule(rule: &Rule) -> Result<Operation, CompileError> {
    let out = Operation::builder().field(&rule.field);

    let op = match (rule.operator, &rule.operand) {
        // Single-value comparisons
        (Operator::Equal, Operand::Single(v)) => out.keyword(" = ").bind(v.clone()),
        (Operator::NotEqual, Operand::Single(v)) => out.keyword(" != ").bind(v.clone()),
        (Operator::Less, Operand::Single(v)) => out.keyword(" < ").bind(v.clone()),
        (Operator::LessOrEqual, Operand::Single(v)) => out.keyword(" <= ").bind(v.clone()),
        (Operator::Greater, Operand::Single(v)) => out.keyword(" > ").bind(v.clone()),
        (Operator::GreaterOrEqual, Operand::Single(v)) => out.keyword(" >= ").bind(v.clone()),

        // IN/NOT IN expand one placeholder per value
        (Operator::In, Operand::List(values)) if !values.is_empty() => out
            .keyword(" IN (")
            .bind_list(values.iter().cloned())
            .keyword(")"),
        (Operator::NotIn, Operand::List(values)) if !values.is_empty() => out
            .keyword(" NOT IN (")
            .bind_list(values.iter().cloned())
            .keyword(")"),

        // BETWEEN takes exactly two bounds
        (Operator::Between, Operand::List(values)) => match values.as_slice() {
            [lo, hi] => out
                .keyword(" BETWEEN ")
                .bind(lo.clone())
                .keyword(" AND ")
                .bind(hi.clone()),
            _ => return Err(shape_error(rule)),
        },
        (Operator::NotBetween, Operand::List(values)) => match values.as_slice() {
            [lo, hi] => out
                .keyword(" NOT BETWEEN ")
                .bind(lo.clone())
                .keyword(" AND ")
                .bind(hi.clone()),
            _ => return Err(shape_error(rule)),
        },

        // Pattern operators bind the wildcard-decorated text
        (Operator::BeginsWith, Operand::Single(v)) => {
            out.keyword(" LIKE ").bind(pattern("", v, "%"))
        },
        (Operator::NotBeginsWith, Operand::Single(v)) => {
            out.keyword(" NOT LIKE ").bind(pattern("", v, "%"))
        },
        (Operator::Contains, Operand::Single(v)) => {
            out.keyword(" LIKE ").bind(pattern("%", v, "%"))
        },
        (Operator::NotContains, Operand::Single(v)) => {
            out.keyword(" NOT LIKE ").bind(pattern("%", v, "%"))
        },
        (Operator::EndsWith, Operand::Single(v)) => {
            out.keyword(" LIKE ").bind(pattern("%", v, ""))
        },
        (Operator::NotEndsWith, Operand::Single(v)) => {
            out.keyword(" NOT LIKE ").bind(pattern("%", v, ""))
        },

        // Value-free checks
        (Operator::IsEmpty, Operand::None) => out.keyword(" = ''"),
        (Operator::IsNotEmpty, Operand::None) => out.keyword(" != ''"),
        (Operator::IsNull, Operand::None) => out.keyword(" IS NULL"),
        (Operator::IsNotNull, Operand::None) => out.keyword(" IS NOT NULL"),

        _ => return Err(shape_error(rule)),
    };

    Ok(op.finish())
}

fn shape_error(rule: &Rule) -> CompileError {
    CompileError::UnsupportedValueShape {
        field: rule.field.to_string(),
        operator: rule.operator,
        expected: rule.operator.arity(),
        found: rule.operand.shape(),
    }
}

/// Build a LIKE pattern from a scalar's text form.
fn pattern(prefix: &str, value: &Value, suffix: &str) -> Value {
    Value::String(format!("{prefix}{}{suffix}", value.to_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::types::Arity;

    fn compile(rule: &Rule) -> (String, Vec<Value>) {
        Registry::standard()
            .resolve(rule)
            .expect("rule should compile")
            .into_parts()
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_equal() {
        let (sql, params) = compile(&Rule::value("status", Operator::Equal, "active"));
        assert_eq!(sql, "status = ?");
        assert_eq!(params, vec![s("active")]);
    }

    #[test]
    fn test_not_equal() {
        let (sql, params) = compile(&Rule::value("status", Operator::NotEqual, "deleted"));
        assert_eq!(sql, "status != ?");
        assert_eq!(params, vec![s("deleted")]);
    }

    #[test]
    fn test_comparisons() {
        let cases = [
            (Operator::Less, "age < ?"),
            (Operator::LessOrEqual, "age <= ?"),
            (Operator::Greater, "age > ?"),
            (Operator::GreaterOrEqual, "age >= ?"),
        ];
        for (op, expected) in cases {
            let (sql, params) = compile(&Rule::value("age", op, 18));
            assert_eq!(sql, expected);
            assert_eq!(params, vec![Value::Int(18)]);
        }
    }

    #[test]
    fn test_in() {
        let (sql, params) = compile(&Rule::list("status", Operator::In, ["a", "b", "c"]));
        assert_eq!(sql, "status IN (?, ?, ?)");
        assert_eq!(params, vec![s("a"), s("b"), s("c")]);
    }

    #[test]
    fn test_in_single_value() {
        let (sql, params) = compile(&Rule::list("id", Operator::In, [42]));
        assert_eq!(sql, "id IN (?)");
        assert_eq!(params, vec![Value::Int(42)]);
    }

    #[test]
    fn test_not_in() {
        let (sql, params) = compile(&Rule::list("id", Operator::NotIn, [1, 2]));
        assert_eq!(sql, "id NOT IN (?, ?)");
        assert_eq!(params, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_between() {
        let (sql, params) = compile(&Rule::list("price", Operator::Between, [10.0, 99.5]));
        assert_eq!(sql, "price BETWEEN ? AND ?");
        assert_eq!(params, vec![Value::Float(10.0), Value::Float(99.5)]);
    }

    #[test]
    fn test_not_between() {
        let (sql, params) = compile(&Rule::list(
            "created_at",
            Operator::NotBetween,
            ["2024-01-01", "2024-12-31"],
        ));
        assert_eq!(sql, "created_at NOT BETWEEN ? AND ?");
        assert_eq!(params, vec![s("2024-01-01"), s("2024-12-31")]);
    }

    #[test]
    fn test_pattern_operators() {
        let cases = [
            (Operator::BeginsWith, "name LIKE ?", "smith%"),
            (Operator::NotBeginsWith, "name NOT LIKE ?", "smith%"),
            (Operator::Contains, "name LIKE ?", "%smith%"),
            (Operator::NotContains, "name NOT LIKE ?", "%smith%"),
            (Operator::EndsWith, "name LIKE ?", "%smith"),
            (Operator::NotEndsWith, "name NOT LIKE ?", "%smith"),
        ];
        for (op, expected_sql, expected_param) in cases {
            let (sql, params) = compile(&Rule::value("name", op, "smith"));
            assert_eq!(sql, expected_sql, "{op}");
            assert_eq!(params, vec![s(expected_param)], "{op}");
        }
    }

    #[test]
    fn test_pattern_from_number() {
        let (_, params) = compile(&Rule::value("zip", Operator::BeginsWith, 94));
        assert_eq!(params, vec![s("94%")]);
    }

    #[test]
    fn test_value_free_operators() {
        let cases = [
            (Operator::IsEmpty, "name = ''"),
            (Operator::IsNotEmpty, "name != ''"),
            (Operator::IsNull, "name IS NULL"),
            (Operator::IsNotNull, "name IS NOT NULL"),
        ];
        for (op, expected) in cases {
            let (sql, params) = compile(&Rule::unary("name", op));
            assert_eq!(sql, expected);
            assert!(params.is_empty());
        }
    }

    #[test]
    fn test_every_operator_placeholder_count_matches_params() {
        for op in Operator::ALL {
            let rule = match op.arity() {
                Arity::None => Rule::unary("f", op),
                Arity::One => Rule::value("f", op, "v"),
                Arity::Two => Rule::list("f", op, [1, 2]),
                Arity::AtLeastOne => Rule::list("f", op, [1, 2, 3]),
            };
            let (sql, params) = compile(&rule);
            assert_eq!(sql.matches('?').count(), params.len(), "{op}");
        }
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let translator = StandardTranslator::new(Operator::Between);
        let rule = Rule::list("age", Operator::Between, [1, 2, 3]);
        assert_eq!(
            translator.translate(&rule),
            Err(CompileError::UnsupportedValueShape {
                field: "age".to_string(),
                operator: Operator::Between,
                expected: Arity::Two,
                found: "a list of 3 values".to_string(),
            })
        );
    }

    #[test]
    fn test_between_needs_exactly_two_bounds() {
        for operator in [Operator::Between, Operator::NotBetween] {
            for rule in [
                Rule::list("age", operator, [1]),
                Rule::list("age", operator, Vec::<i64>::new()),
                Rule::value("age", operator, 1),
            ] {
                assert!(matches!(
                    Registry::standard().resolve(&rule),
                    Err(CompileError::UnsupportedValueShape { expected: Arity::Two, .. })
                ));
            }
        }
    }

    #[test]
    fn test_scalar_for_in_is_rejected() {
        let rule = Rule::value("id", Operator::In, 1);
        assert!(matches!(
            Registry::standard().resolve(&rule),
            Err(CompileError::UnsupportedValueShape { .. })
        ));
    }

    #[test]
    fn test_value_for_is_null_is_rejected() {
        let rule = Rule::value("id", Operator::IsNull, 1);
        assert!(matches!(
            Registry::standard().resolve(&rule),
            Err(CompileError::UnsupportedValueShape { .. })
        ));
    }

    #[test]
    fn test_standard_registry_covers_all_operators() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), Operator::ALL.len());
        for op in Operator::ALL {
            assert!(registry.translators.iter().any(|t| t.handles(op)), "{op}");
        }
    }

    #[test]
    fn test_empty_registry_rejects() {
        let rule = Rule::value("age", Operator::Greater, 1);
        assert_eq!(
            Registry::empty().resolve(&rule),
            Err(CompileError::UnsupportedOperator {
                field: "age".to_string(),
                operator: Operator::Greater,
            })
        );
    }

    #[derive(Debug)]
    struct CaseInsensitiveEqual;

    impl Translator for CaseInsensitiveEqual {
        fn handles(&self, operator: Operator) -> bool {
            operator == Operator::Equal
        }

        fn translate(&self, rule: &Rule) -> Result<Operation, CompileError> {
            let Operand::Single(v) = &rule.operand else {
                return Err(CompileError::UnsupportedValueShape {
                    field: rule.field.to_string(),
                    operator: rule.operator,
                    expected: Arity::One,
                    found: rule.operand.shape(),
                });
            };
            Ok(Operation::builder()
                .keyword("LOWER(")
                .field(&rule.field)
                .keyword(") = LOWER(")
                .bind(v.clone())
                .keyword(")")
                .finish())
        }
    }

    #[test]
    fn test_first_registered_translator_wins() {
        let registry = Registry::empty()
            .with(CaseInsensitiveEqual)
            .with(StandardTranslator::new(Operator::Equal));
        let (sql, params) = registry
            .resolve(&Rule::value("email", Operator::Equal, "A@B.C"))
            .expect("should compile")
            .into_parts();
        assert_eq!(sql, "LOWER(email) = LOWER(?)");
        assert_eq!(params, vec![s("A@B.C")]);
    }

    #[test]
    fn test_custom_registry_leaves_others_unsupported() {
        let registry = Registry::empty().with(CaseInsensitiveEqual);
        let rule = Rule::value("age", Operator::Less, 3);
        assert!(matches!(
            registry.resolve(&rule),
            Err(CompileError::UnsupportedOperator { .. })
        ));
    }
}
