/*! Lowering rules for operations that map onto exactly one target construct.
 *
 * Each rule resolves its operands, emits at most one instruction and maps the single result, if
 * any. Constants emit nothing: their result is mapped straight to a target constant.
 */

use super::enums::{
    convert_atomic_bin_op, convert_atomic_ordering, convert_binary_op, convert_fcmp_predicate,
    convert_icmp_predicate,
};
use super::errors::{Result, TranslateError};
use super::translation::ModuleTranslation;
use lowir_core::{Constant, IrBuilder, Type, Value};
use lowir_ops::{Attribute, OpKind, Operation, ValueId};

/// Returns `Ok(false)` when no generic rule applies to `op`.
pub fn convert_generic(
    op: &Operation,
    builder: &mut IrBuilder,
    translation: &mut ModuleTranslation,
) -> Result<bool> {
    match &op.kind {
        OpKind::Constant { value } => {
            let result = single_result(op)?;
            let ty = translation.value_type(result)?;
            let constant = constant_from_attr(translation.source().attr(*value), &ty)?;
            translation
                .mapping_mut()
                .define_value(result, constant.into())?;
        }
        OpKind::Undef => {
            let result = single_result(op)?;
            let ty = translation.value_type(result)?;
            translation
                .mapping_mut()
                .define_value(result, Constant::Undef(ty).into())?;
        }
        OpKind::Null => {
            let result = single_result(op)?;
            let ty = translation.value_type(result)?;
            if !ty.is_pointer() {
                return Err(TranslateError::MalformedOperation(format!(
                    "null of non-pointer type {}",
                    ty
                )));
            }
            translation
                .mapping_mut()
                .define_value(result, Constant::Null(ty).into())?;
        }
        OpKind::Binary { op: kind, .. } => {
            let [lhs, rhs] = fixed_operands(op, translation)?;
            let inst = builder.create_binary(convert_binary_op(*kind), lhs, rhs)?;
            map_result(op, translation, inst)?;
        }
        OpKind::ICmp { predicate } => {
            let [lhs, rhs] = fixed_operands(op, translation)?;
            let inst = builder.create_icmp(convert_icmp_predicate(*predicate), lhs, rhs)?;
            map_result(op, translation, inst)?;
        }
        OpKind::FCmp { predicate, .. } => {
            let [lhs, rhs] = fixed_operands(op, translation)?;
            let inst = builder.create_fcmp(convert_fcmp_predicate(*predicate), lhs, rhs)?;
            map_result(op, translation, inst)?;
        }
        OpKind::AtomicRmw { bin_op, ordering } => {
            let [ptr, value] = fixed_operands(op, translation)?;
            let inst = builder.create_atomic_rmw(
                convert_atomic_bin_op(*bin_op),
                ptr,
                value,
                convert_atomic_ordering(*ordering),
            )?;
            map_result(op, translation, inst)?;
        }
        OpKind::Load => {
            let [ptr] = fixed_operands(op, translation)?;
            let ty = translation.value_type(single_result(op)?)?;
            let inst = builder.create_load(ty, ptr)?;
            map_result(op, translation, inst)?;
        }
        OpKind::Store => {
            let [value, ptr] = fixed_operands(op, translation)?;
            builder.create_store(value, ptr)?;
        }
        OpKind::Return => {
            let mut values = translation.mapping().lookup_values(&op.operands)?;
            if values.len() > 1 {
                return Err(TranslateError::MalformedOperation(format!(
                    "return with {} operands",
                    values.len()
                )));
            }
            builder.create_ret(values.pop())?;
        }
        OpKind::Unreachable => {
            builder.create_unreachable()?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Converts a constant attribute to a target constant of type `ty`.
pub fn constant_from_attr(attr: &Attribute, ty: &Type) -> Result<Constant> {
    let mismatch = || TranslateError::MalformedAttribute {
        key: "value".to_string(),
        reason: format!("{} attribute cannot produce a {} constant", attr.kind_name(), ty),
    };
    match (attr, ty) {
        (Attribute::Integer { value, .. }, Type::Int(bits)) => Ok(Constant::int(*bits, *value)),
        (Attribute::Bool(b), Type::Int(bits)) => Ok(Constant::int(*bits, *b as i64)),
        (Attribute::Float(value), ty) if ty.is_floating_point() => {
            Ok(Constant::float(ty.clone(), *value))
        }
        (Attribute::Integer { value, .. }, ty) if ty.is_floating_point() => {
            Ok(Constant::float(ty.clone(), *value as f64))
        }
        _ => Err(mismatch()),
    }
}

pub(super) fn single_result(op: &Operation) -> Result<ValueId> {
    match op.results.as_slice() {
        [result] => Ok(*result),
        results => Err(TranslateError::MalformedOperation(format!(
            "{} expects one result, found {}",
            op.name(),
            results.len()
        ))),
    }
}

pub(super) fn fixed_operands<const N: usize>(
    op: &Operation,
    translation: &ModuleTranslation,
) -> Result<[Value; N]> {
    let values = translation.mapping().lookup_values(&op.operands)?;
    values.try_into().map_err(|values: Vec<Value>| {
        TranslateError::MalformedOperation(format!(
            "{} expects {} operands, found {}",
            op.name(),
            N,
            values.len()
        ))
    })
}

fn map_result(
    op: &Operation,
    translation: &mut ModuleTranslation,
    inst: lowir_core::Inst,
) -> Result<()> {
    let result = single_result(op)?;
    translation
        .mapping_mut()
        .define_value(result, Value::Inst(inst))
}
