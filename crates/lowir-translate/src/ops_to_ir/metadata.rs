/*! Loop and profile metadata for branch terminators.
 *
 * A branch carries loop information either in the `llvm.loop` dictionary or in one of the flat
 * `llvm.loop.*` extension attributes. The resulting node is self-referential (operand 0 points back
 * at the node) and is cached by attribute identity, so branches sharing one attribute object share
 * one loop identifier while equal-looking attributes created separately get their own.
 *
 * Branch weights are never cached; every weighted branch gets a fresh `branch_weights` node.
 */

use super::errors::{Result, TranslateError};
use lowir_core::{
    Constant, Inst, IrBuilder, MdKindRegistry, MdNode, Metadata, MetadataArena, Module,
};
use lowir_ops::{AttrId, Attribute, LoopOptionCase, Operation, SourceModule};
use std::collections::HashMap;
use tracing::debug;

pub const LOOP_ATTR: &str = "llvm.loop";
const PARALLEL_ACCESS: &str = "parallel_access";
const OPTIONS: &str = "options";

/// Extension keys that also mark a branch as a loop latch, in lookup order.
pub const LOOP_ALIAS_ATTRS: [&str; 12] = [
    "llvm.loop.name",
    "llvm.loop.vectorize.width",
    "llvm.loop.interleave.count",
    "llvm.loop.unroll.count",
    "llvm.loop.unroll.withoutcheck",
    "llvm.loop.vectorize.enable",
    "llvm.loop.distribute.enable",
    "llvm.loop.flatten.enable",
    "llvm.loop.dataflow.enable",
    "llvm.loop.pipeline.enable",
    "llvm.loop.latency",
    "llvm.loop.tripcount",
];

const I32_FIELDS: [&str; 4] = [
    "llvm.loop.vectorize.width",
    "llvm.loop.interleave.count",
    "llvm.loop.unroll.count",
    "llvm.loop.unroll.withoutcheck",
];

const I1_FIELDS: [&str; 4] = [
    "llvm.loop.vectorize.enable",
    "llvm.loop.distribute.enable",
    "llvm.loop.flatten.enable",
    "llvm.loop.dataflow.enable",
];

const UNIT_FIELDS: [&str; 3] = [
    "llvm.loop.unroll.enable",
    "llvm.loop.unroll.full",
    "llvm.loop.unroll.disable",
];

#[derive(Debug, Default)]
pub struct LoopMetadataCache {
    nodes: HashMap<AttrId, MdNode>,
    access_groups: HashMap<String, MdNode>,
}

impl LoopMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, attr: AttrId) -> Option<MdNode> {
        self.nodes.get(&attr).copied()
    }

    pub fn insert(&mut self, attr: AttrId, node: MdNode) {
        self.nodes.insert(attr, node);
    }

    /// The distinct node standing for the declared access group `name`, created on first use.
    pub fn access_group(&mut self, arena: &mut MetadataArena, name: &str) -> MdNode {
        *self
            .access_groups
            .entry(name.to_string())
            .or_insert_with(|| arena.create_distinct(Vec::new()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Attaches loop metadata to `inst` if `op` carries any loop attribute.
pub fn set_loop_metadata(
    op: &Operation,
    inst: Inst,
    source: &SourceModule,
    builder: &mut IrBuilder,
    cache: &mut LoopMetadataCache,
) -> Result<()> {
    let attr = op.attr(LOOP_ATTR);
    let alias = LOOP_ALIAS_ATTRS.iter().find_map(|key| op.attr(key));
    if attr.is_none() && alias.is_none() {
        return Ok(());
    }

    let mut node = attr.and_then(|a| cache.lookup(a));
    if let Some(alias) = alias {
        node = cache.lookup(alias);
    }

    let node = match node {
        Some(node) => {
            debug!(%node, "reusing cached loop metadata");
            node
        }
        None => {
            let node = build_loop_node(op, attr, source, builder.module_mut(), cache)?;
            if let Some(attr) = attr {
                cache.insert(attr, node);
            }
            if let Some(alias) = alias {
                cache.insert(alias, node);
            }
            node
        }
    };

    let kind = builder.module_mut().md_kind_id(MdKindRegistry::LOOP);
    builder.set_metadata(inst, kind, node)?;
    Ok(())
}

fn build_loop_node(
    op: &Operation,
    attr: Option<AttrId>,
    source: &SourceModule,
    module: &mut Module,
    cache: &mut LoopMetadataCache,
) -> Result<MdNode> {
    let arena = &mut module.metadata;
    let mut operands = vec![Metadata::Temporary];

    if let Some(attr) = attr {
        let dict = source
            .attr(attr)
            .as_dict()
            .ok_or_else(|| malformed(LOOP_ATTR, "expected a dictionary"))?;

        if let Some(groups) = dict.get(PARALLEL_ACCESS) {
            let refs = source.attr(*groups).as_array().ok_or_else(|| {
                malformed(PARALLEL_ACCESS, "expected an array of symbol references")
            })?;
            let mut parallel = vec![Metadata::string("llvm.loop.parallel_accesses")];
            for group in refs {
                let name = source.attr(*group).as_symbol().ok_or_else(|| {
                    malformed(PARALLEL_ACCESS, "expected an array of symbol references")
                })?;
                if !source.has_access_group(name) {
                    return Err(TranslateError::UnknownSymbol(format!(
                        "access group {}",
                        name
                    )));
                }
                parallel.push(Metadata::Node(cache.access_group(arena, name)));
            }
            operands.push(Metadata::Node(arena.create(parallel)));
        }

        if let Some(options) = dict.get(OPTIONS) {
            let options = source
                .attr(*options)
                .as_loop_options()
                .ok_or_else(|| malformed(OPTIONS, "expected loop options"))?;
            for (case, value) in options {
                operands.push(Metadata::Node(arena.create(loop_option(*case, *value))));
            }
        }
    }

    if let Some(name) = op.attr("llvm.loop.name") {
        let name = source
            .attr(name)
            .as_str()
            .ok_or_else(|| malformed("llvm.loop.name", "expected a string"))?;
        operands.push(Metadata::Node(arena.create(vec![
            Metadata::string("llvm.loop.name"),
            Metadata::string(name),
        ])));
    }

    for key in I32_FIELDS {
        if let Some(value) = int_field(op, source, key)? {
            operands.push(Metadata::Node(
                arena.create(tagged(key, &[Constant::int(32, value)])),
            ));
        }
    }
    for key in I1_FIELDS {
        if let Some(value) = int_field(op, source, key)? {
            operands.push(Metadata::Node(
                arena.create(tagged(key, &[Constant::int(1, value)])),
            ));
        }
    }
    for key in UNIT_FIELDS {
        if op.attr(key).is_some() {
            operands.push(Metadata::Node(arena.create(vec![Metadata::string(key)])));
        }
    }

    let tuples: [(&str, &[u32]); 3] = [
        ("llvm.loop.pipeline.enable", &[32, 1, 8]),
        ("llvm.loop.latency", &[32, 32]),
        ("llvm.loop.tripcount", &[32, 32, 32]),
    ];
    for (key, widths) in tuples {
        if let Some(values) = int_tuple(op, source, key, widths.len())? {
            let constants = widths
                .iter()
                .zip(values)
                .map(|(width, value)| Constant::int(*width, value))
                .collect::<Vec<_>>();
            operands.push(Metadata::Node(arena.create(tagged(key, &constants))));
        }
    }

    let node = arena.create(operands);
    arena.replace_operand(node, 0, Metadata::Node(node))?;
    debug!(%node, "created loop metadata");
    Ok(node)
}

/// Builds a `branch_weights` node. Weights are reinterpreted as unsigned 32-bit values.
pub fn branch_weights(builder: &mut IrBuilder, weights: &[i32]) -> MdNode {
    let weights = weights.iter().map(|w| *w as u32).collect::<Vec<_>>();
    builder.module_mut().metadata.create_branch_weights(&weights)
}

fn loop_option(case: LoopOptionCase, value: i64) -> Vec<Metadata> {
    let (name, constant) = match case {
        LoopOptionCase::DisableLicm => ("llvm.licm.disable", Constant::bool(value != 0)),
        LoopOptionCase::DisableUnroll => ("llvm.loop.unroll.disable", Constant::bool(value != 0)),
        LoopOptionCase::InterleaveCount => {
            ("llvm.loop.interleave.count", Constant::int(32, value))
        }
        LoopOptionCase::DisablePipeline => {
            ("llvm.loop.pipeline.disable", Constant::bool(value != 0))
        }
        LoopOptionCase::PipelineInitiationInterval => (
            "llvm.loop.pipeline.initiationinterval",
            Constant::int(32, value),
        ),
    };
    tagged(name, &[constant])
}

fn tagged(name: &str, constants: &[Constant]) -> Vec<Metadata> {
    let mut operands = Vec::with_capacity(constants.len() + 1);
    operands.push(Metadata::string(name));
    operands.extend(constants.iter().cloned().map(Metadata::Constant));
    operands
}

fn int_field(op: &Operation, source: &SourceModule, key: &str) -> Result<Option<i64>> {
    match op.attr(key) {
        None => Ok(None),
        Some(attr) => match source.attr(attr) {
            Attribute::Integer { value, .. } => Ok(Some(*value)),
            Attribute::Bool(b) => Ok(Some(*b as i64)),
            other => Err(malformed(
                key,
                &format!("expected an integer, found {}", other.kind_name()),
            )),
        },
    }
}

fn int_tuple(
    op: &Operation,
    source: &SourceModule,
    key: &str,
    len: usize,
) -> Result<Option<Vec<i64>>> {
    let Some(attr) = op.attr(key) else {
        return Ok(None);
    };
    let expected = || malformed(key, &format!("expected an array of {} integers", len));
    let values = match source.attr(attr) {
        Attribute::Array(elems) => elems
            .iter()
            .map(|e| source.attr(*e).as_int())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(expected)?,
        Attribute::DenseInts(values) => values.clone(),
        _ => return Err(expected()),
    };
    if values.len() < len {
        return Err(expected());
    }
    Ok(Some(values.into_iter().take(len).collect()))
}

fn malformed(key: &str, reason: &str) -> TranslateError {
    TranslateError::MalformedAttribute {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
