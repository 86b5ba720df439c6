use crate::builder::{OpBuilder, OpState};
use crate::enums::{BinaryOpKind, FastmathFlags};
use crate::module::{SourceModule, ValueDef};
use crate::ops::OpKind;
use crate::types::OpType;
use crate::OpsError;
use pretty_assertions::assert_eq;

fn function(module: &mut SourceModule, params: Vec<OpType>) -> crate::FuncOpId {
    module.add_function("f", OpType::func(OpType::Void, params))
}

#[test]
fn test_entry_block_arguments() {
    let mut module = SourceModule::new();
    let func = function(&mut module, vec![OpType::i32(), OpType::F64]);
    let entry = module.add_entry_block(func).unwrap();

    let args = module.block_args(entry).to_vec();
    assert_eq!(args.len(), 2);
    assert_eq!(module.value_type(args[1]), &OpType::F64);
    assert_eq!(
        module.values[args[0]].def,
        ValueDef::BlockArgument {
            block: entry,
            index: 0
        }
    );
    assert!(matches!(
        module.add_entry_block(func),
        Err(OpsError::BuilderError(_))
    ));
}

#[test]
fn test_results_and_program_order() {
    let mut module = SourceModule::new();
    let func = function(&mut module, vec![OpType::F64]);
    let entry = module.add_entry_block(func).unwrap();
    let x = module.block_args(entry)[0];

    let mut b = OpBuilder::at_end(&mut module, entry);
    let sum = b.binary_with(BinaryOpKind::FAdd, x, x, FastmathFlags::NNAN);
    let ret = b.ret(None);

    let ops = module.function_ops(func).collect::<Vec<_>>();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[1], ret);
    assert_eq!(module.op(ops[0]).results, vec![sum]);
    assert_eq!(module.op(ops[0]).name(), "llvm.fadd");
    assert_eq!(
        module.op(ops[0]).kind.fastmath(),
        Some(FastmathFlags::NNAN)
    );
    assert_eq!(module.value_type(sum), &OpType::F64);
    module.validate().unwrap();
}

#[test]
fn test_validate_successor_arity() {
    let mut module = SourceModule::new();
    let func = function(&mut module, vec![]);
    let entry = module.add_entry_block(func).unwrap();
    let next = module.add_block(func, vec![OpType::i32()]);

    let mut b = OpBuilder::at_end(&mut module, entry);
    b.br(next, vec![]);
    b.set_block(next);
    b.ret(None);

    assert!(matches!(
        module.validate(),
        Err(OpsError::VerificationError(_))
    ));
}

#[test]
fn test_validate_terminator_position() {
    let mut module = SourceModule::new();
    let func = function(&mut module, vec![]);
    let entry = module.add_entry_block(func).unwrap();
    let mut b = OpBuilder::at_end(&mut module, entry);
    b.unreachable();
    b.insert(OpState::new(OpKind::Unregistered {
        name: "test.op".to_string(),
    }));
    assert!(module.validate().is_err());
}

#[test]
fn test_duplicate_symbols_rejected() {
    let mut module = SourceModule::new();
    module.add_function("x", OpType::func(OpType::Void, vec![]));
    module.add_global("x", OpType::i32(), false, None);
    assert!(matches!(
        module.validate(),
        Err(OpsError::VerificationError(_))
    ));
}
