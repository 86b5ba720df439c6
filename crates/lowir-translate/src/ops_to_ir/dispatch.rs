/*! Per-operation lowering.
 *
 * [`convert_operation`] is the only entry point. It installs the operation's fast-math flags on
 * the builder for the duration of the conversion, tries the generic one-to-one rules and then
 * falls through to the rules for calls, exception handling, control flow, symbol addresses and
 * intrinsics. Any error is reported with the name of the operation that raised it.
 */

use super::enums::{convert_asm_dialect, convert_fastmath_flags};
use super::errors::{Result, TranslateError};
use super::generic::{convert_generic, single_result};
use super::intrinsics::resolve_intrinsic;
use super::metadata::{branch_weights, set_loop_metadata};
use super::translation::ModuleTranslation;
use lowir_core::{
    Attribute as IrAttribute, AttributeList, Block, Callee, Constant, FunctionType, InlineAsm,
    Inst, IrBuilder, Type, Value,
};
use lowir_ops::{InlineAsmOp, OpId, OpKind, Operation, Successor, ValueId};
use tracing::trace;

/// Lowers one source operation at the builder's insertion point.
pub fn convert_operation(
    op_id: OpId,
    builder: &mut IrBuilder,
    translation: &mut ModuleTranslation,
) -> Result<()> {
    let op = translation.source().op(op_id);
    trace!(op = %op_id, name = op.name(), "lowering operation");

    let mut guard = builder.fast_math_guard();
    if let Some(flags) = op.kind.fastmath() {
        guard.set_fast_math_flags(convert_fastmath_flags(flags));
    }
    convert_inner(op_id, op, &mut guard, translation).map_err(|err| err.in_operation(op.name()))
}

fn convert_inner(
    op_id: OpId,
    op: &Operation,
    builder: &mut IrBuilder,
    translation: &mut ModuleTranslation,
) -> Result<()> {
    if convert_generic(op, builder, translation)? {
        return Ok(());
    }

    match &op.kind {
        OpKind::Call { callee, .. } => {
            let (callee, fn_ty, args) =
                resolve_callee(callee.as_deref(), &op.operands, builder, translation)?;
            check_result_arity(op, &fn_ty, &callee, builder)?;
            let inst = builder.create_call_to(callee, fn_ty, args)?;
            map_optional_result(op, translation, inst)
        }
        OpKind::InlineAsm(asm) => convert_inline_asm(op, asm, builder, translation),
        OpKind::Invoke { callee } => {
            let [normal, unwind] = successor_blocks(op, translation)?;
            let (callee, fn_ty, args) =
                resolve_callee(callee.as_deref(), &op.operands, builder, translation)?;
            check_result_arity(op, &fn_ty, &callee, builder)?;
            let inst = builder.create_invoke(callee, fn_ty, args, normal, unwind)?;
            translation.mapping_mut().map_branch(op_id, inst);
            map_optional_result(op, translation, inst)
        }
        OpKind::LandingPad { cleanup } => {
            let result = single_result(op)?;
            let ty = translation.value_type(result)?;
            let inst = builder.create_landing_pad(ty, op.operands.len())?;
            builder.set_cleanup(inst, *cleanup)?;
            for operand in &op.operands {
                let value = translation.mapping().lookup_value(*operand)?;
                if value.is_constant() {
                    builder.add_clause(inst, value)?;
                } else if translation.config().strict_landing_pad_clauses {
                    return Err(TranslateError::MalformedOperation(format!(
                        "landing pad clause {} is not a constant",
                        operand
                    )));
                } else {
                    trace!(clause = %operand, "skipping non-constant landing pad clause");
                }
            }
            translation
                .mapping_mut()
                .define_value(result, Value::Inst(inst))
        }
        OpKind::Br => {
            let [dest] = successor_blocks(op, translation)?;
            let inst = builder.create_br(dest)?;
            finish_branch(op_id, op, inst, builder, translation)
        }
        OpKind::CondBr { branch_weights: weights } => {
            let [then_dest, else_dest] = successor_blocks(op, translation)?;
            let cond = match op.operands.as_slice() {
                [cond] => translation.mapping().lookup_value(*cond)?,
                operands => {
                    return Err(TranslateError::MalformedOperation(format!(
                        "conditional branch expects one condition operand, found {}",
                        operands.len()
                    )))
                }
            };
            let weights = match weights {
                Some(weights) if weights.len() != 2 => {
                    return Err(TranslateError::MalformedOperation(format!(
                        "conditional branch expects 2 branch weights, found {}",
                        weights.len()
                    )))
                }
                Some(weights) if translation.config().attach_branch_weights => {
                    Some(branch_weights(builder, weights))
                }
                _ => None,
            };
            let inst = builder.create_cond_br(cond, then_dest, else_dest, weights)?;
            finish_branch(op_id, op, inst, builder, translation)
        }
        OpKind::Switch {
            case_values,
            branch_weights: weights,
        } => convert_switch(op_id, op, case_values, weights.as_deref(), builder, translation),
        OpKind::AddressOf { global_name } => {
            let symbol = translation
                .mapping()
                .resolve_symbol(builder.module(), global_name)
                .ok_or_else(|| {
                    TranslateError::InvariantViolation(format!(
                        "{} names neither a global nor a function",
                        global_name
                    ))
                })?;
            let result = single_result(op)?;
            translation
                .mapping_mut()
                .define_value(result, symbol.address())
        }
        OpKind::CallIntrinsic { intrinsic, .. } => {
            let result_type = match op.results.as_slice() {
                [] => Type::Void,
                [result] => translation.value_type(*result)?,
                results => {
                    return Err(TranslateError::MalformedOperation(format!(
                        "intrinsic call with {} results",
                        results.len()
                    )))
                }
            };
            let operand_types = translation.value_types(&op.operands)?;
            let decl = resolve_intrinsic(
                builder.module_mut(),
                intrinsic,
                result_type,
                operand_types,
            )?;
            let args = translation.mapping().lookup_values(&op.operands)?;
            let inst = builder.create_call(decl, args)?;
            map_optional_result(op, translation, inst)
        }
        _ => Err(TranslateError::UnsupportedOperation(op.name().to_string())),
    }
}

/// Direct calls name their callee; indirect calls take the callee pointer as first operand.
fn resolve_callee(
    callee: Option<&str>,
    operands: &[ValueId],
    builder: &IrBuilder,
    translation: &ModuleTranslation,
) -> Result<(Callee, FunctionType, Vec<Value>)> {
    match callee {
        Some(name) => {
            let func = translation
                .mapping()
                .lookup_function(builder.module(), name)?;
            let fn_ty = builder.module().function(func).ty.clone();
            let args = translation.mapping().lookup_values(operands)?;
            Ok((Callee::Direct(func), fn_ty, args))
        }
        None => {
            let (target, rest) = operands.split_first().ok_or_else(|| {
                TranslateError::MalformedOperation(
                    "indirect call without a callee operand".to_string(),
                )
            })?;
            let ty = translation.value_type(*target)?;
            let fn_ty = ty
                .pointee()
                .and_then(Type::as_function)
                .cloned()
                .ok_or_else(|| {
                    TranslateError::MalformedOperation(format!(
                        "indirect callee has type {}, expected a pointer to a function",
                        ty
                    ))
                })?;
            let callee = translation.mapping().lookup_value(*target)?;
            let args = translation.mapping().lookup_values(rest)?;
            Ok((Callee::Indirect(callee), fn_ty, args))
        }
    }
}

fn check_result_arity(
    op: &Operation,
    fn_ty: &FunctionType,
    callee: &Callee,
    builder: &IrBuilder,
) -> Result<()> {
    match op.results.len() {
        0 if !fn_ty.ret.is_void() => Err(TranslateError::NonVoidResult {
            callee: callee_name(callee, builder),
            ty: fn_ty.ret.to_string(),
        }),
        1 if fn_ty.ret.is_void() => Err(TranslateError::MalformedOperation(format!(
            "call to {} has a result but returns void",
            callee_name(callee, builder)
        ))),
        0 | 1 => Ok(()),
        n => Err(TranslateError::MalformedOperation(format!(
            "call with {} results",
            n
        ))),
    }
}

fn callee_name(callee: &Callee, builder: &IrBuilder) -> String {
    match callee {
        Callee::Direct(func) => builder.module().function(*func).name.clone(),
        Callee::Indirect(_) => "indirect callee".to_string(),
        Callee::InlineAsm(_) => "inline asm".to_string(),
    }
}

fn convert_inline_asm(
    op: &Operation,
    asm: &InlineAsmOp,
    builder: &mut IrBuilder,
    translation: &mut ModuleTranslation,
) -> Result<()> {
    let ret = match op.results.as_slice() {
        [] => Type::Void,
        [result] => translation.value_type(*result)?,
        results => {
            return Err(TranslateError::MalformedOperation(format!(
                "inline asm with {} results",
                results.len()
            )))
        }
    };
    let fn_ty = FunctionType::new(ret, translation.value_types(&op.operands)?);
    let mut callee = InlineAsm::new(fn_ty, asm.asm_string.clone(), asm.constraints.clone())
        .with_side_effects(asm.has_side_effects)
        .with_align_stack(asm.is_align_stack);
    if let Some(dialect) = asm.asm_dialect {
        callee = callee.with_dialect(convert_asm_dialect(dialect));
    }

    let args = translation.mapping().lookup_values(&op.operands)?;
    let inst = builder.create_inline_asm_call(callee, args)?;

    if let Some(operand_attrs) = &asm.operand_attrs {
        let shift = if op.results.is_empty() { 0 } else { 1 };
        let mut attributes = AttributeList::new();
        for (i, attrs) in operand_attrs.iter().enumerate() {
            let Some(attrs) = attrs else { continue };
            let source = translation.source();
            let dict = source.attr(*attrs).as_dict().ok_or_else(|| {
                TranslateError::MalformedAttribute {
                    key: "operand_attrs".to_string(),
                    reason: format!("entry {} is not a dictionary", i),
                }
            })?;
            let Some(elem) = dict.get("elementtype") else {
                continue;
            };
            let elem = source.attr(*elem).as_type().ok_or_else(|| {
                TranslateError::MalformedAttribute {
                    key: "elementtype".to_string(),
                    reason: format!("entry {} is not a type attribute", i),
                }
            })?;
            let ty = translation.convert_type(elem)?;
            attributes.add_at_index(i as u32 + shift, IrAttribute::ElementType(ty));
        }
        if !attributes.is_empty() {
            builder.set_call_attributes(inst, attributes)?;
        }
    }

    map_optional_result(op, translation, inst)
}

fn convert_switch(
    op_id: OpId,
    op: &Operation,
    case_values: &[i64],
    weights: Option<&[i32]>,
    builder: &mut IrBuilder,
    translation: &mut ModuleTranslation,
) -> Result<()> {
    let (default, cases) = op.successors.split_first().ok_or_else(|| {
        TranslateError::MalformedOperation("switch without a default destination".to_string())
    })?;
    if case_values.len() != cases.len() {
        return Err(TranslateError::MalformedOperation(format!(
            "switch has {} case values but {} case destinations",
            case_values.len(),
            cases.len()
        )));
    }
    let scrutinee = match op.operands.as_slice() {
        [value] => *value,
        operands => {
            return Err(TranslateError::MalformedOperation(format!(
                "switch expects one scrutinee operand, found {}",
                operands.len()
            )))
        }
    };
    let value = translation.mapping().lookup_value(scrutinee)?;
    let ty = translation.value_type(scrutinee)?;
    let width = ty.int_width().ok_or_else(|| {
        TranslateError::MalformedOperation(format!("switch on non-integer type {}", ty))
    })?;

    let weights = match weights {
        Some(weights) if weights.len() != op.successors.len() => {
            return Err(TranslateError::MalformedOperation(format!(
                "switch has {} destinations but {} branch weights",
                op.successors.len(),
                weights.len()
            )))
        }
        Some(weights) if translation.config().attach_branch_weights => {
            Some(branch_weights(builder, weights))
        }
        _ => None,
    };

    let default = translation.mapping().lookup_block(default.block)?;
    let inst = builder.create_switch(value, default, cases.len(), weights)?;
    for (case, dest) in case_values.iter().zip(cases) {
        let dest = translation.mapping().lookup_block(dest.block)?;
        builder.add_case(inst, Constant::int(width, *case), dest)?;
    }
    translation.mapping_mut().map_branch(op_id, inst);
    Ok(())
}

fn finish_branch(
    op_id: OpId,
    op: &Operation,
    inst: Inst,
    builder: &mut IrBuilder,
    translation: &mut ModuleTranslation,
) -> Result<()> {
    translation.mapping_mut().map_branch(op_id, inst);
    if translation.config().attach_loop_metadata {
        let source = translation.source();
        set_loop_metadata(op, inst, source, builder, translation.loop_metadata_mut())?;
    }
    Ok(())
}

fn successor_blocks<const N: usize>(
    op: &Operation,
    translation: &ModuleTranslation,
) -> Result<[Block; N]> {
    let blocks = op
        .successors
        .iter()
        .map(|Successor { block, .. }| translation.mapping().lookup_block(*block))
        .collect::<Result<Vec<_>>>()?;
    blocks.try_into().map_err(|blocks: Vec<Block>| {
        TranslateError::MalformedOperation(format!(
            "{} expects {} successors, found {}",
            op.name(),
            N,
            blocks.len()
        ))
    })
}

fn map_optional_result(
    op: &Operation,
    translation: &mut ModuleTranslation,
    inst: Inst,
) -> Result<()> {
    match op.results.as_slice() {
        [] => Ok(()),
        [result] => translation
            .mapping_mut()
            .define_value(*result, Value::Inst(inst)),
        results => Err(TranslateError::MalformedOperation(format!(
            "{} produces {} results",
            op.name(),
            results.len()
        ))),
    }
}
