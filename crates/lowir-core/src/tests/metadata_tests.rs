use crate::metadata::{MdKindRegistry, Metadata, MetadataArena};
use crate::values::Constant;
use crate::IrError;
use pretty_assertions::assert_eq;

#[test]
fn test_self_reference() {
    let mut arena = MetadataArena::new();
    let node = arena.create(vec![Metadata::Temporary, Metadata::string("x")]);
    assert!(arena.get(node).unwrap().has_temporary());

    arena
        .replace_operand(node, 0, Metadata::Node(node))
        .unwrap();
    let data = arena.get(node).unwrap();
    assert!(!data.has_temporary());
    assert_eq!(data.operands[0].as_node(), Some(node));
}

#[test]
fn test_replace_out_of_range() {
    let mut arena = MetadataArena::new();
    let node = arena.create(vec![]);
    let err = arena
        .replace_operand(node, 3, Metadata::Temporary)
        .unwrap_err();
    assert!(matches!(err, IrError::MetadataError(_)));
}

#[test]
fn test_branch_weights_node() {
    let mut arena = MetadataArena::new();
    let node = arena.create_branch_weights(&[10, 20]);
    let operands = arena.operands(node);
    assert_eq!(operands.len(), 3);
    assert_eq!(arena.get(node).unwrap().tag(), Some("branch_weights"));
    assert_eq!(operands[1].as_constant(), Some(&Constant::int(32, 10)));
    assert_eq!(operands[2].as_constant(), Some(&Constant::int(32, 20)));
}

#[test]
fn test_distinct_nodes_are_separate() {
    let mut arena = MetadataArena::new();
    let a = arena.create_distinct(vec![]);
    let b = arena.create_distinct(vec![]);
    assert_ne!(a, b);
    assert!(arena.get(a).unwrap().distinct);
}

#[test]
fn test_md_kinds() {
    let mut kinds = MdKindRegistry::new();
    let prof = kinds.lookup(MdKindRegistry::PROF).unwrap();
    assert_eq!(kinds.get_or_insert("prof"), prof);
    assert_eq!(kinds.name(prof), Some("prof"));

    let custom = kinds.get_or_insert("my.kind");
    assert_ne!(custom, prof);
    assert_eq!(kinds.get_or_insert("my.kind"), custom);
}
