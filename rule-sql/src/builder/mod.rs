//! Rule tree model, translation to SQL, and the query builder.

mod compile;
mod operation;
mod parse;
mod query;
mod translate;
mod types;

// Re-export all public items
pub use compile::GroupCompiler;
pub use operation::{Operation, OperationBuilder};
pub use parse::{ParseError, parse_rules, parse_rules_bytes};
pub use query::{BuilderConfig, QueryBuilder, QueryResult};
pub use translate::{Registry, StandardTranslator, Translator};
pub use types::{Arity, Combinator, Field, Group, Node, Operand, Operator, Rule, Value};
