//! Core types for the rule tree.

use std::fmt;

/// Rule operators understood by the standard translator.
///
/// The wire names (see [`Operator::name`]) are the ones jQuery QueryBuilder clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `f = ?`
    Equal,
    /// `f != ?`
    NotEqual,
    /// `f IN (?, ?, ...)`
    In,
    /// `f NOT IN (?, ?, ...)`
    NotIn,
    /// `f < ?`
    Less,
    /// `f <= ?`
    LessOrEqual,
    /// `f > ?`
    Greater,
    /// `f >= ?`
    GreaterOrEqual,
    /// `f BETWEEN ? AND ?`
    Between,
    /// `f NOT BETWEEN ? AND ?`
    NotBetween,
    /// `f LIKE ?` with `value%`
    BeginsWith,
    /// `f NOT LIKE ?` with `value%`
    NotBeginsWith,
    /// `f LIKE ?` with `%value%`
    Contains,
    /// `f NOT LIKE ?` with `%value%`
    NotContains,
    /// `f LIKE ?` with `%value`
    EndsWith,
    /// `f NOT LIKE ?` with `%value`
    NotEndsWith,
    /// `f = ''`
    IsEmpty,
    /// `f != ''`
    IsNotEmpty,
    /// `f IS NULL`
    IsNull,
    /// `f IS NOT NULL`
    IsNotNull,
}

impl Operator {
    /// Every operator, in registration order.
    pub const ALL: [Self; 20] = [
        Self::Equal,
        Self::NotEqual,
        Self::In,
        Self::NotIn,
        Self::Less,
        Self::LessOrEqual,
        Self::Greater,
        Self::GreaterOrEqual,
        Self::Between,
        Self::NotBetween,
        Self::BeginsWith,
        Self::NotBeginsWith,
        Self::Contains,
        Self::NotContains,
        Self::EndsWith,
        Self::NotEndsWith,
        Self::IsEmpty,
        Self::IsNotEmpty,
        Self::IsNull,
        Self::IsNotNull,
    ];

    /// How many values the operator binds.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::IsEmpty | Self::IsNotEmpty | Self::IsNull | Self::IsNotNull => Arity::None,
            Self::In | Self::NotIn => Arity::AtLeastOne,
            Self::Between | Self::NotBetween => Arity::Two,
            Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::LessOrEqual
            | Self::Greater
            | Self::GreaterOrEqual
            | Self::BeginsWith
            | Self::NotBeginsWith
            | Self::Contains
            | Self::NotContains
            | Self::EndsWith
            | Self::NotEndsWith => Arity::One,
        }
    }

    /// Wire name of the operator (e.g. `"not_equal"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Less => "less",
            Self::LessOrEqual => "less_or_equal",
            Self::Greater => "greater",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::Between => "between",
            Self::NotBetween => "not_between",
            Self::BeginsWith => "begins_with",
            Self::NotBeginsWith => "not_begins_with",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::EndsWith => "ends_with",
            Self::NotEndsWith => "not_ends_with",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
        }
    }

    /// Parse from a wire name. Matching is case-insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// use rule_sql::Operator;
    ///
    /// assert_eq!(Operator::from_name("greater_or_equal"), Some(Operator::GreaterOrEqual));
    /// assert_eq!(Operator::from_name("IS_NULL"), Some(Operator::IsNull));
    /// assert_eq!(Operator::from_name("regex"), None);
    /// ```
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of values an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Arity {
    /// No value at all.
    None,
    /// Exactly one scalar.
    One,
    /// A list of exactly two scalars.
    Two,
    /// A non-empty list of scalars.
    AtLeastOne,
}

impl Arity {
    /// Whether `operand` has the shape this arity requires.
    #[must_use]
    pub fn accepts(self, operand: &Operand) -> bool {
        match (self, operand) {
            (Self::None, Operand::None) | (Self::One, Operand::Single(_)) => true,
            (Self::Two, Operand::List(values)) => values.len() == 2,
            (Self::AtLeastOne, Operand::List(values)) => !values.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "no value",
            Self::One => "a single value",
            Self::Two => "a list of two values",
            Self::AtLeastOne => "a non-empty list",
        })
    }
}

/// Logical combinator for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// All children must match: `AND`
    #[default]
    And,
    /// At least one child must match: `OR`
    Or,
}

impl Combinator {
    /// Separator placed between compiled children.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// A column identifier supplied by the caller.
///
/// Identifiers cannot be bound as parameters, so this is the only runtime text that ever
/// lands in a fragment. Filters in [`crate::FragmentFilter`] inspect exactly these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field(String);

impl Field {
    /// Wrap an identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Field {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Field {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
}

impl Value {
    /// Text form of the value, used to build LIKE patterns.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// The payload of a rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operand {
    /// No value (`IS NULL`, `IS EMPTY`, ...).
    #[default]
    None,
    /// One scalar.
    Single(Value),
    /// A list of scalars (`IN`, `BETWEEN`, ...).
    List(Vec<Value>),
}

impl Operand {
    /// Short description of the operand's shape, for error messages.
    #[must_use]
    pub fn shape(&self) -> String {
        match self {
            Self::None => "no value".to_string(),
            Self::Single(_) => "a single value".to_string(),
            Self::List(values) => format!("a list of {} values", values.len()),
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Single(v)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

/// A leaf condition: field, operator and operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Column the rule tests.
    pub field: Field,
    /// Comparison to apply.
    pub operator: Operator,
    /// Value(s) to bind.
    pub operand: Operand,
}

impl Rule {
    /// Create a rule from any operand shape.
    pub fn new(field: impl Into<Field>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            operator,
            operand: operand.into(),
        }
    }

    /// Create a rule binding one scalar.
    pub fn value(field: impl Into<Field>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::new(field, operator, Operand::Single(value.into()))
    }

    /// Create a rule binding a list of scalars.
    pub fn list<V: Into<Value>>(
        field: impl Into<Field>,
        operator: Operator,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field, operator, Operand::List(values))
    }

    /// Create a rule that binds nothing (`IS NULL`, `IS EMPTY`, ...).
    pub fn unary(field: impl Into<Field>, operator: Operator) -> Self {
        Self::new(field, operator, Operand::None)
    }
}

/// A combinator over an ordered list of rules and nested groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// How children are joined.
    pub combinator: Combinator,
    /// Wraps the group in `NOT (...)`.
    pub negated: bool,
    /// Rules and nested groups, in output order.
    pub children: Vec<Node>,
}

impl Group {
    /// Create a group. An empty `children` list is rejected at compile time.
    pub fn new(combinator: Combinator, children: Vec<Node>) -> Self {
        Self {
            combinator,
            negated: false,
            children,
        }
    }

    /// Create an AND group.
    pub fn and(children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        Self::new(
            Combinator::And,
            children.into_iter().map(Into::into).collect(),
        )
    }

    /// Create an OR group.
    pub fn or(children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        Self::new(Combinator::Or, children.into_iter().map(Into::into).collect())
    }

    /// Negate the whole group.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

/// A node of the rule tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A leaf condition.
    Rule(Rule),
    /// A nested group.
    Group(Group),
}

impl Node {
    /// Number of leaf rules in the tree.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        match self {
            Self::Rule(_) => 1,
            Self::Group(group) => group.children.iter().map(Self::rule_count).sum(),
        }
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}
