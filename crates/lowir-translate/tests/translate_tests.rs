use lowir_core::{format::format_module, Constant, InstructionData, Module, Type, Value};
use lowir_ops::{
    Attribute, BinaryOpKind, ICmpPredicate, LoopOptionCase, OpBuilder, OpKind, OpState, OpType,
    SourceModule,
};
use lowir_translate::{translate_module, TranslateConfig};
use pretty_assertions::assert_eq;

/// Counts `n` down to zero and returns how many iterations ran.
///
/// ```text
/// entry(n):        br header(n, 0)
/// header(i, acc):  cond_br (i > 0), body, exit   {llvm.loop}
/// body:            br header(i - 1, acc + 1)
/// exit:            ret acc
/// ```
fn countdown() -> SourceModule {
    let mut source = SourceModule::new();
    let func = source.add_function("countdown", OpType::func(OpType::i32(), vec![OpType::i32()]));
    let entry = source.add_entry_block(func).unwrap();
    let header = source.add_block(func, vec![OpType::i32(), OpType::i32()]);
    let body = source.add_block(func, vec![]);
    let exit = source.add_block(func, vec![]);

    let n = source.block_args(entry)[0];
    let [i, acc] = [source.block_args(header)[0], source.block_args(header)[1]];

    let options = source.add_attr(Attribute::LoopOptions(vec![(
        LoopOptionCase::DisableUnroll,
        1,
    )]));
    let loop_attr = source.add_dictionary([("options", options)]);

    let mut b = OpBuilder::at_end(&mut source, entry);
    let zero = b.const_int(32, 0);
    b.br(header, vec![n, zero]);

    b.set_block(header);
    let one = b.const_int(32, 1);
    let more = b.icmp(ICmpPredicate::Sgt, i, zero);
    b.insert(
        OpState::new(OpKind::CondBr {
            branch_weights: Some(vec![99, 1]),
        })
        .operands([more])
        .successor(body, vec![])
        .successor(exit, vec![])
        .attr("llvm.loop", loop_attr),
    );

    b.set_block(body);
    let next = b.binary(BinaryOpKind::Sub, i, one);
    let count = b.binary(BinaryOpKind::Add, acc, one);
    b.br(header, vec![next, count]);

    b.set_block(exit);
    b.ret(Some(acc));
    source
}

fn translate(source: &SourceModule) -> Module {
    translate_module(source, TranslateConfig::new().with_module_name("countdown")).unwrap()
}

#[test]
fn test_translation_is_deterministic() {
    let source = countdown();
    let first = format_module(&translate(&source));
    let second = format_module(&translate(&source));
    assert_eq!(first, second);
    assert!(first.starts_with("; ModuleID = 'countdown'"));
}

#[test]
fn test_block_arguments_become_phis() {
    let module = translate(&countdown());
    let func = module.function(module.get_function("countdown").unwrap());
    let blocks = func.blocks.keys().collect::<Vec<_>>();
    let header = func.block_insts(blocks[1]);

    let incoming = header[..2]
        .iter()
        .map(|inst| match &func.insts[*inst].kind {
            InstructionData::Phi { incoming } => incoming.clone(),
            other => panic!("expected a phi, found {:?}", other),
        })
        .collect::<Vec<_>>();

    let func_id = module.get_function("countdown").unwrap();
    assert_eq!(incoming[0].len(), 2);
    assert_eq!(
        incoming[0][0],
        (Value::Argument { func: func_id, index: 0 }, blocks[0])
    );
    assert_eq!(incoming[0][1].1, blocks[2]);
    assert!(matches!(incoming[0][1].0, Value::Inst(_)));
    assert_eq!(
        incoming[1][0],
        (Value::Constant(Constant::int(32, 0)), blocks[0])
    );
    assert_eq!(incoming[1][1].1, blocks[2]);
    assert_eq!(func.insts[header[0]].ty, Type::i32());
}

#[test]
fn test_formatted_loop() {
    let text = format_module(&translate(&countdown()));
    assert!(text.contains("define i32 @countdown(i32 %arg0) {"));
    assert!(text.contains("phi i32 [ %arg0, %bb0 ], [ %inst"));
    assert!(text.contains("icmp sgt %inst0, 0"));
    assert!(text.contains(", !prof !"));
    assert!(text.contains(", !llvm.loop !"));
    assert!(text.contains("!{!\"branch_weights\", i32 99, i32 1}"));
    assert!(text.contains("!{!\"llvm.loop.unroll.disable\", i1 true}"));
}

/// `f(x)` invokes `may_throw` and forwards `x` to both destinations, each of which returns it.
fn invoke_forwarding() -> SourceModule {
    let mut source = SourceModule::new();
    source.add_function("may_throw", OpType::func(OpType::Void, vec![]));
    let func = source.add_function("f", OpType::func(OpType::i32(), vec![OpType::i32()]));
    let entry = source.add_entry_block(func).unwrap();
    let normal = source.add_block(func, vec![OpType::i32()]);
    let unwind = source.add_block(func, vec![OpType::i32()]);
    let x = source.block_args(entry)[0];
    let [from_normal, from_unwind] = [source.block_args(normal)[0], source.block_args(unwind)[0]];

    let mut b = OpBuilder::at_end(&mut source, entry);
    b.insert(
        OpState::new(OpKind::Invoke {
            callee: Some("may_throw".to_string()),
        })
        .successor(normal, vec![x])
        .successor(unwind, vec![x]),
    );
    b.set_block(normal);
    b.ret(Some(from_normal));
    b.set_block(unwind);
    b.insert(
        OpState::new(OpKind::LandingPad { cleanup: true }).result(OpType::Struct {
            fields: vec![OpType::opaque_ptr(), OpType::i32()],
            packed: false,
        }),
    );
    b.ret(Some(from_unwind));
    source
}

#[test]
fn test_invoke_feeds_both_destinations() {
    let module = translate_module(&invoke_forwarding(), TranslateConfig::new()).unwrap();
    let func_id = module.get_function("f").unwrap();
    let func = module.function(func_id);
    let blocks = func.blocks.keys().collect::<Vec<_>>();

    for block in [blocks[1], blocks[2]] {
        let first = func.block_insts(block)[0];
        match &func.insts[first].kind {
            InstructionData::Phi { incoming } => assert_eq!(
                *incoming,
                vec![(Value::Argument { func: func_id, index: 0 }, blocks[0])]
            ),
            other => panic!("expected a phi, found {:?}", other),
        }
    }
}
