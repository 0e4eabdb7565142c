//! Recursive compilation of rule trees.

use super::operation::Operation;
use super::translate::Registry;
use super::types::{Group, Node};
use crate::error::CompileError;

/// Compiles a [`Node`] tree into one [`Operation`] using a [`Registry`].
///
/// * Rules are handed to the registry.
/// * Group children are compiled left to right and joined with ` AND ` / ` OR `;
///   parameters follow the same order.
/// * A nested group with two or more children is wrapped in parentheses. The root is not.
/// * A group with one child compiles exactly like that child would in its place.
/// * A negated group compiles to `NOT (...)`.
/// * An empty group is an error.
#[derive(Debug, Default)]
pub struct GroupCompiler {
    registry: Registry,
}

impl GroupCompiler {
    /// Create a compiler over a fully assembled registry.
    #[must_use]
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// The registry rules are resolved against.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Compile a tree. The node passed here is the root.
    pub fn compile(&self, root: &Node) -> Result<Operation, CompileError> {
        self.compile_node(root, 0, false)
    }

    fn compile_node(
        &self,
        node: &Node,
        depth: usize,
        nested: bool,
    ) -> Result<Operation, CompileError> {
        match node {
            Node::Rule(rule) => self.registry.resolve(rule),
            Node::Group(group) => self.compile_group(group, depth, nested),
        }
    }

    fn compile_group(
        &self,
        group: &Group,
        depth: usize,
        nested: bool,
    ) -> Result<Operation, CompileError> {
        tracing::trace!(
            depth,
            children = group.children.len(),
            combinator = ?group.combinator,
            negated = group.negated,
            "compiling group"
        );

        // `NOT (...)` already delimits its body
        let wrap = nested && !group.negated;

        let op = match group.children.as_slice() {
            [] => return Err(CompileError::EmptyGroup),
            // A lone child takes the group's place
            [only] => self.compile_node(only, depth + 1, wrap)?,
            children => {
                let parts = children
                    .iter()
                    .map(|child| self.compile_node(child, depth + 1, true))
                    .collect::<Result<Vec<_>, _>>()?;
                let joined = Operation::join(parts, group.combinator);
                if wrap { joined.parenthesize() } else { joined }
            },
        };

        Ok(if group.negated { op.negate() } else { op })
    }
}
