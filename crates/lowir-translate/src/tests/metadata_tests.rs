use super::{define, target_blocks, target_function, terminator, translate};
use crate::ops_to_ir::{translate_module, TranslateConfig, TranslateError};
use lowir_core::{Constant, MdKindRegistry, MdNode, Metadata, Module};
use lowir_ops::{
    AttrId, Attribute, LoopOptionCase, OpBuilder, OpKind, OpState, OpType, SourceModule,
};
use pretty_assertions::assert_eq;

/// `f` is a chain of blocks; block `i` branches to `i + 1` carrying `latches[i]`, and the last
/// block returns.
fn chain(source: &mut SourceModule, latches: Vec<Vec<(&str, AttrId)>>) {
    let (func, entry) = define(source, "f", OpType::Void, vec![]);
    let mut blocks = vec![entry];
    for _ in 0..latches.len() {
        blocks.push(source.add_block(func, vec![]));
    }
    for (i, attrs) in latches.into_iter().enumerate() {
        let mut state = OpState::new(OpKind::Br).successor(blocks[i + 1], vec![]);
        for (key, attr) in attrs {
            state = state.attr(key, attr);
        }
        OpBuilder::at_end(source, blocks[i]).insert(state);
    }
    OpBuilder::at_end(source, blocks[blocks.len() - 1]).ret(None);
}

fn loop_node(module: &Module, block: usize) -> Option<MdNode> {
    let kind = module.md_kinds.lookup(MdKindRegistry::LOOP)?;
    let func = target_function(module, "f");
    terminator(func, target_blocks(func)[block]).metadata(kind)
}

fn loop_dict(source: &mut SourceModule, entries: Vec<(&str, Attribute)>) -> AttrId {
    let entries = entries
        .into_iter()
        .map(|(key, attr)| (key, source.add_attr(attr)))
        .collect::<Vec<_>>();
    source.add_dictionary(entries)
}

fn tag_of(module: &Module, md: &Metadata) -> Option<String> {
    let node = md.as_node()?;
    module.metadata.get(node)?.tag().map(str::to_string)
}

#[test]
fn test_nodes_are_shared_by_attribute_identity() {
    let mut source = SourceModule::new();
    let options = || Attribute::LoopOptions(vec![(LoopOptionCase::DisableUnroll, 1)]);
    let shared = loop_dict(&mut source, vec![("options", options())]);
    let lookalike = loop_dict(&mut source, vec![("options", options())]);
    chain(
        &mut source,
        vec![
            vec![("llvm.loop", shared)],
            vec![("llvm.loop", shared)],
            vec![("llvm.loop", lookalike)],
            vec![],
        ],
    );

    let module = translate(&source).unwrap();
    let first = loop_node(&module, 0).unwrap();
    assert_eq!(loop_node(&module, 1), Some(first));
    let third = loop_node(&module, 2).unwrap();
    assert_ne!(third, first);
    assert_eq!(loop_node(&module, 3), None);
}

#[test]
fn test_loop_node_refers_to_itself() {
    let mut source = SourceModule::new();
    let attr = loop_dict(
        &mut source,
        vec![(
            "options",
            Attribute::LoopOptions(vec![
                (LoopOptionCase::DisableLicm, 1),
                (LoopOptionCase::InterleaveCount, 4),
            ]),
        )],
    );
    chain(&mut source, vec![vec![("llvm.loop", attr)]]);

    let module = translate(&source).unwrap();
    let node = loop_node(&module, 0).unwrap();
    let data = module.metadata.get(node).unwrap();
    assert!(!data.has_temporary());
    assert_eq!(data.operands[0], Metadata::Node(node));
    assert_eq!(data.operands.len(), 3);

    let licm = module.metadata.operands(data.operands[1].as_node().unwrap());
    assert_eq!(
        licm,
        &[
            Metadata::string("llvm.licm.disable"),
            Metadata::Constant(Constant::bool(true))
        ][..]
    );
    let interleave = module.metadata.operands(data.operands[2].as_node().unwrap());
    assert_eq!(
        interleave,
        &[
            Metadata::string("llvm.loop.interleave.count"),
            Metadata::Constant(Constant::int(32, 4))
        ][..]
    );
}

#[test]
fn test_parallel_accesses_share_access_groups() {
    let mut source = SourceModule::new();
    source.declare_access_group("group0");
    let group = source.add_attr(Attribute::SymbolRef("group0".to_string()));
    let groups = source.add_attr(Attribute::Array(vec![group]));
    let first = source.add_dictionary([("parallel_access", groups)]);
    let second = source.add_dictionary([("parallel_access", groups)]);
    chain(
        &mut source,
        vec![vec![("llvm.loop", first)], vec![("llvm.loop", second)]],
    );

    let module = translate(&source).unwrap();
    let access_group = |block: usize| {
        let node = loop_node(&module, block).unwrap();
        let parallel = module.metadata.operands(node)[1].as_node().unwrap();
        assert_eq!(
            module.metadata.get(parallel).unwrap().tag(),
            Some("llvm.loop.parallel_accesses")
        );
        module.metadata.operands(parallel)[1].as_node().unwrap()
    };
    let group_node = access_group(0);
    assert_eq!(access_group(1), group_node);
    assert!(module.metadata.get(group_node).unwrap().distinct);
}

#[test]
fn test_undeclared_access_group() {
    let mut source = SourceModule::new();
    source.declare_access_group("group0");
    let group = source.add_attr(Attribute::SymbolRef("gruop0".to_string()));
    let groups = source.add_attr(Attribute::Array(vec![group]));
    let attr = source.add_dictionary([("parallel_access", groups)]);
    chain(&mut source, vec![vec![("llvm.loop", attr)]]);

    let err = translate(&source).unwrap_err();
    assert_eq!(
        err.root(),
        &TranslateError::UnknownSymbol("access group gruop0".to_string())
    );
    assert_eq!(
        err.to_string(),
        "Failed to lower llvm.br: Symbol not found: access group gruop0"
    );
}

#[test]
fn test_extension_keys() {
    let mut source = SourceModule::new();
    let name = source.add_attr(Attribute::String("outer".to_string()));
    let unroll = source.add_attr(Attribute::int(8, 32));
    let vectorize = source.add_attr(Attribute::Bool(true));
    let full = source.add_attr(Attribute::Unit);
    let pipeline = source.add_attr(Attribute::DenseInts(vec![2, 1, 0]));
    chain(
        &mut source,
        vec![vec![
            ("llvm.loop.name", name),
            ("llvm.loop.unroll.count", unroll),
            ("llvm.loop.vectorize.enable", vectorize),
            ("llvm.loop.unroll.full", full),
            ("llvm.loop.pipeline.enable", pipeline),
            ("llvm.loop.not.a.key", full),
        ]],
    );

    let module = translate(&source).unwrap();
    let node = loop_node(&module, 0).unwrap();
    let operands = module.metadata.operands(node);
    let tags = operands[1..]
        .iter()
        .map(|md| tag_of(&module, md).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        tags,
        vec![
            "llvm.loop.name",
            "llvm.loop.unroll.count",
            "llvm.loop.vectorize.enable",
            "llvm.loop.unroll.full",
            "llvm.loop.pipeline.enable",
        ]
    );

    let name_node = module.metadata.operands(operands[1].as_node().unwrap());
    assert_eq!(name_node[1].as_str(), Some("outer"));
    let pipeline_node = module.metadata.operands(operands[5].as_node().unwrap());
    assert_eq!(
        pipeline_node[1..]
            .iter()
            .map(|md| md.as_constant().unwrap().clone())
            .collect::<Vec<_>>(),
        vec![Constant::int(32, 2), Constant::int(1, 1), Constant::int(8, 0)]
    );
}

#[test]
fn test_alias_attribute_is_a_cache_key() {
    let mut source = SourceModule::new();
    let count = source.add_attr(Attribute::int(4, 32));
    chain(
        &mut source,
        vec![
            vec![("llvm.loop.unroll.count", count)],
            vec![("llvm.loop.unroll.count", count)],
        ],
    );

    let module = translate(&source).unwrap();
    assert_eq!(loop_node(&module, 0), loop_node(&module, 1));
    assert!(loop_node(&module, 0).is_some());
}

#[test]
fn test_malformed_loop_attribute() {
    let mut source = SourceModule::new();
    let count = source.add_attr(Attribute::String("four".to_string()));
    chain(&mut source, vec![vec![("llvm.loop.unroll.count", count)]]);

    let err = translate(&source).unwrap_err();
    assert!(matches!(
        err.root(),
        TranslateError::MalformedAttribute { key, .. } if key == "llvm.loop.unroll.count"
    ));

    let mut source = SourceModule::new();
    let latency = source.add_attr(Attribute::DenseInts(vec![3]));
    chain(&mut source, vec![vec![("llvm.loop.latency", latency)]]);
    assert!(matches!(
        translate(&source).unwrap_err().root(),
        TranslateError::MalformedAttribute { .. }
    ));
}

#[test]
fn test_loop_metadata_can_be_disabled() {
    let mut source = SourceModule::new();
    let count = source.add_attr(Attribute::int(4, 32));
    chain(&mut source, vec![vec![("llvm.loop.unroll.count", count)]]);

    let config = TranslateConfig::new().with_loop_metadata(false);
    let module = translate_module(&source, config).unwrap();
    assert_eq!(loop_node(&module, 0), None);
    assert!(module.metadata.is_empty());
}
