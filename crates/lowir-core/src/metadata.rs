/*! Metadata nodes and metadata kinds.
 *
 * Nodes live in a module-wide arena and are referred to by [`MdNode`] handles, so identity is
 * handle equality. A node may be created with a [`Metadata::Temporary`] placeholder operand and
 * later have that operand replaced by a reference to itself, which is how loop identifiers are
 * built.
 */

use crate::entities::{MdKind, MdNode};
use crate::values::Constant;
use crate::{IrError, Result};
use cranelift_entity::PrimaryMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metadata {
    String(String),
    Constant(Constant),
    Node(MdNode),
    /// Placeholder operand awaiting replacement.
    Temporary,
}

impl Metadata {
    pub fn string(s: impl Into<String>) -> Self {
        Metadata::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Metadata::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<MdNode> {
        match self {
            Metadata::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Metadata::Constant(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdNodeData {
    pub operands: Vec<Metadata>,
    pub distinct: bool,
}

impl MdNodeData {
    pub fn has_temporary(&self) -> bool {
        self.operands.iter().any(|op| matches!(op, Metadata::Temporary))
    }

    /// The string tag in operand 0, if any.
    pub fn tag(&self) -> Option<&str> {
        self.operands.first().and_then(Metadata::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataArena {
    nodes: PrimaryMap<MdNode, MdNodeData>,
}

impl MetadataArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, operands: Vec<Metadata>) -> MdNode {
        self.nodes.push(MdNodeData {
            operands,
            distinct: false,
        })
    }

    pub fn create_distinct(&mut self, operands: Vec<Metadata>) -> MdNode {
        self.nodes.push(MdNodeData {
            operands,
            distinct: true,
        })
    }

    pub fn get(&self, node: MdNode) -> Option<&MdNodeData> {
        self.nodes.get(node)
    }

    pub fn operands(&self, node: MdNode) -> &[Metadata] {
        self.nodes
            .get(node)
            .map(|data| data.operands.as_slice())
            .unwrap_or(&[])
    }

    pub fn replace_operand(&mut self, node: MdNode, index: usize, md: Metadata) -> Result<()> {
        let data = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| IrError::MetadataError(format!("unknown metadata node {}", node)))?;
        let slot = data.operands.get_mut(index).ok_or_else(|| {
            IrError::MetadataError(format!("operand {} out of range for {}", index, node))
        })?;
        *slot = md;
        Ok(())
    }

    /// Builds a `branch_weights` profile node with one operand per successor.
    pub fn create_branch_weights(&mut self, weights: &[u32]) -> MdNode {
        let mut operands = Vec::with_capacity(weights.len() + 1);
        operands.push(Metadata::string("branch_weights"));
        operands.extend(
            weights
                .iter()
                .map(|w| Metadata::Constant(Constant::int(32, *w as i64))),
        );
        self.create(operands)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MdNode, &MdNodeData)> {
        self.nodes.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdKindRegistry {
    names: PrimaryMap<MdKind, String>,
    by_name: HashMap<String, MdKind>,
}

impl MdKindRegistry {
    pub const DBG: &'static str = "dbg";
    pub const TBAA: &'static str = "tbaa";
    pub const PROF: &'static str = "prof";
    pub const LOOP: &'static str = "llvm.loop";

    pub fn new() -> Self {
        let mut registry = Self {
            names: PrimaryMap::new(),
            by_name: HashMap::new(),
        };
        for fixed in [Self::DBG, Self::TBAA, Self::PROF, Self::LOOP] {
            registry.get_or_insert(fixed);
        }
        registry
    }

    pub fn get_or_insert(&mut self, name: &str) -> MdKind {
        if let Some(kind) = self.by_name.get(name) {
            return *kind;
        }
        let kind = self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), kind);
        kind
    }

    pub fn lookup(&self, name: &str) -> Option<MdKind> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, kind: MdKind) -> Option<&str> {
        self.names.get(kind).map(String::as_str)
    }
}

impl Default for MdKindRegistry {
    fn default() -> Self {
        Self::new()
    }
}
