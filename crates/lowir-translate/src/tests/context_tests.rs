use super::define;
use crate::ops_to_ir::{MappingContext, SymbolRef, TranslateError};
use lowir_core::{
    Constant, Function, FunctionType, GlobalVariable, IrBuilder, Module, Type, Value,
};
use lowir_ops::{OpBuilder, OpType, SourceModule};
use pretty_assertions::assert_eq;

#[test]
fn test_define_and_lookup_values() {
    let mut source = SourceModule::new();
    let (_, entry) = define(&mut source, "f", OpType::Void, vec![OpType::i32(), OpType::i32()]);
    let args = source.block_args(entry).to_vec();

    let mut mapping = MappingContext::new();
    mapping.define_value(args[0], Constant::int(32, 1).into()).unwrap();
    mapping.define_value(args[1], Constant::int(32, 2).into()).unwrap();
    assert_eq!(mapping.value_count(), 2);

    assert_eq!(
        mapping.lookup_values(&[args[1], args[0]]).unwrap(),
        vec![
            Value::Constant(Constant::int(32, 2)),
            Value::Constant(Constant::int(32, 1))
        ]
    );
}

#[test]
fn test_redefinition_is_an_invariant_violation() {
    let mut source = SourceModule::new();
    let (_, entry) = define(&mut source, "f", OpType::Void, vec![OpType::i32()]);
    let arg = source.block_args(entry)[0];

    let mut mapping = MappingContext::new();
    mapping.define_value(arg, Constant::int(32, 1).into()).unwrap();
    let err = mapping
        .define_value(arg, Constant::int(32, 2).into())
        .unwrap_err();
    assert!(matches!(err, TranslateError::InvariantViolation(_)));
    assert_eq!(
        mapping.lookup_value(arg).unwrap(),
        Value::Constant(Constant::int(32, 1))
    );
}

#[test]
fn test_missing_entries() {
    let mut source = SourceModule::new();
    let (func, entry) = define(&mut source, "f", OpType::Void, vec![OpType::i32()]);
    let arg = source.block_args(entry)[0];
    let other = source.add_block(func, vec![]);

    let mapping = MappingContext::new();
    assert!(matches!(
        mapping.lookup_value(arg),
        Err(TranslateError::UnmappedValue(_))
    ));
    assert!(matches!(
        mapping.lookup_block(other),
        Err(TranslateError::UnmappedBlock(_))
    ));
    assert!(matches!(
        mapping.lookup_values(&[arg]),
        Err(TranslateError::UnmappedValue(_))
    ));
}

#[test]
fn test_branch_registration_overwrites() {
    let mut source = SourceModule::new();
    let (_, entry) = define(&mut source, "f", OpType::Void, vec![]);
    let op = OpBuilder::at_end(&mut source, entry).ret(None);

    let mut target = Module::new("m");
    let func = target
        .add_function(Function::new("f", FunctionType::new(Type::Void, vec![])))
        .unwrap();
    let block = target.function_mut(func).create_block();
    let mut builder = IrBuilder::new(&mut target);
    builder.position_at_end(func, block);
    let first = builder.create_unreachable().unwrap();
    let second = builder.create_ret(None).unwrap();

    let mut mapping = MappingContext::new();
    mapping.map_block(entry, block);
    mapping.map_branch(op, first);
    mapping.map_branch(op, second);
    assert_eq!(mapping.lookup_branch(op), Some(second));
    assert_eq!(mapping.branches().collect::<Vec<_>>(), vec![(op, second)]);
    assert_eq!(mapping.lookup_block(entry).unwrap(), block);

    mapping.clear_function_state();
    assert_eq!(mapping.lookup_branch(op), None);
    assert!(mapping.lookup_block(entry).is_err());
}

#[test]
fn test_symbol_resolution() {
    let mut target = Module::new("m");
    let global = target
        .add_global(GlobalVariable::new("counter", Type::i64()))
        .unwrap();
    let func = target
        .add_function(Function::new("main", FunctionType::new(Type::Void, vec![])))
        .unwrap();

    let mapping = MappingContext::new();
    assert_eq!(
        mapping.resolve_symbol(&target, "counter"),
        Some(SymbolRef::Global(global))
    );
    assert_eq!(
        mapping.resolve_symbol(&target, "main"),
        Some(SymbolRef::Function(func))
    );
    assert_eq!(mapping.resolve_symbol(&target, "nope"), None);

    assert_eq!(mapping.lookup_function(&target, "main").unwrap(), func);
    assert_eq!(
        mapping.lookup_function(&target, "counter").unwrap_err(),
        TranslateError::UnknownSymbol("counter".to_string())
    );
    assert_eq!(SymbolRef::Global(global).address(), Value::Global(global));
}
