/*! Conversions between source and target enumerations.
 *
 * Every conversion is an exhaustive match, so adding a variant on either side without updating
 * the table is a compile error rather than a silent miss.
 */

use lowir_core::{
    AsmDialect, AtomicOrdering, AtomicRmwBinOp, BinaryOp, FastMathFlags, FloatPredicate,
    IntPredicate,
};
use lowir_ops as ops;

pub fn convert_icmp_predicate(pred: ops::ICmpPredicate) -> IntPredicate {
    match pred {
        ops::ICmpPredicate::Eq => IntPredicate::Eq,
        ops::ICmpPredicate::Ne => IntPredicate::Ne,
        ops::ICmpPredicate::Slt => IntPredicate::Slt,
        ops::ICmpPredicate::Sle => IntPredicate::Sle,
        ops::ICmpPredicate::Sgt => IntPredicate::Sgt,
        ops::ICmpPredicate::Sge => IntPredicate::Sge,
        ops::ICmpPredicate::Ult => IntPredicate::Ult,
        ops::ICmpPredicate::Ule => IntPredicate::Ule,
        ops::ICmpPredicate::Ugt => IntPredicate::Ugt,
        ops::ICmpPredicate::Uge => IntPredicate::Uge,
    }
}

pub fn convert_fcmp_predicate(pred: ops::FCmpPredicate) -> FloatPredicate {
    match pred {
        ops::FCmpPredicate::False => FloatPredicate::False,
        ops::FCmpPredicate::Oeq => FloatPredicate::Oeq,
        ops::FCmpPredicate::Ogt => FloatPredicate::Ogt,
        ops::FCmpPredicate::Oge => FloatPredicate::Oge,
        ops::FCmpPredicate::Olt => FloatPredicate::Olt,
        ops::FCmpPredicate::Ole => FloatPredicate::Ole,
        ops::FCmpPredicate::One => FloatPredicate::One,
        ops::FCmpPredicate::Ord => FloatPredicate::Ord,
        ops::FCmpPredicate::Ueq => FloatPredicate::Ueq,
        ops::FCmpPredicate::Ugt => FloatPredicate::Ugt,
        ops::FCmpPredicate::Uge => FloatPredicate::Uge,
        ops::FCmpPredicate::Ult => FloatPredicate::Ult,
        ops::FCmpPredicate::Ule => FloatPredicate::Ule,
        ops::FCmpPredicate::Une => FloatPredicate::Une,
        ops::FCmpPredicate::Uno => FloatPredicate::Uno,
        ops::FCmpPredicate::True => FloatPredicate::True,
    }
}

pub fn convert_atomic_bin_op(op: ops::AtomicBinOp) -> AtomicRmwBinOp {
    match op {
        ops::AtomicBinOp::Xchg => AtomicRmwBinOp::Xchg,
        ops::AtomicBinOp::Add => AtomicRmwBinOp::Add,
        ops::AtomicBinOp::Sub => AtomicRmwBinOp::Sub,
        ops::AtomicBinOp::And => AtomicRmwBinOp::And,
        ops::AtomicBinOp::Nand => AtomicRmwBinOp::Nand,
        ops::AtomicBinOp::Or => AtomicRmwBinOp::Or,
        ops::AtomicBinOp::Xor => AtomicRmwBinOp::Xor,
        ops::AtomicBinOp::Max => AtomicRmwBinOp::Max,
        ops::AtomicBinOp::Min => AtomicRmwBinOp::Min,
        ops::AtomicBinOp::Umax => AtomicRmwBinOp::UMax,
        ops::AtomicBinOp::Umin => AtomicRmwBinOp::UMin,
        ops::AtomicBinOp::Fadd => AtomicRmwBinOp::FAdd,
        ops::AtomicBinOp::Fsub => AtomicRmwBinOp::FSub,
    }
}

pub fn convert_atomic_ordering(ordering: ops::AtomicOrdering) -> AtomicOrdering {
    match ordering {
        ops::AtomicOrdering::NotAtomic => AtomicOrdering::NotAtomic,
        ops::AtomicOrdering::Unordered => AtomicOrdering::Unordered,
        ops::AtomicOrdering::Monotonic => AtomicOrdering::Monotonic,
        ops::AtomicOrdering::Acquire => AtomicOrdering::Acquire,
        ops::AtomicOrdering::Release => AtomicOrdering::Release,
        ops::AtomicOrdering::AcqRel => AtomicOrdering::AcquireRelease,
        ops::AtomicOrdering::SeqCst => AtomicOrdering::SequentiallyConsistent,
    }
}

pub fn convert_asm_dialect(dialect: ops::AsmDialect) -> AsmDialect {
    match dialect {
        ops::AsmDialect::Att => AsmDialect::Att,
        ops::AsmDialect::Intel => AsmDialect::Intel,
    }
}

pub fn convert_binary_op(op: ops::BinaryOpKind) -> BinaryOp {
    match op {
        ops::BinaryOpKind::Add => BinaryOp::Add,
        ops::BinaryOpKind::Sub => BinaryOp::Sub,
        ops::BinaryOpKind::Mul => BinaryOp::Mul,
        ops::BinaryOpKind::SDiv => BinaryOp::SDiv,
        ops::BinaryOpKind::UDiv => BinaryOp::UDiv,
        ops::BinaryOpKind::SRem => BinaryOp::SRem,
        ops::BinaryOpKind::URem => BinaryOp::URem,
        ops::BinaryOpKind::And => BinaryOp::And,
        ops::BinaryOpKind::Or => BinaryOp::Or,
        ops::BinaryOpKind::Xor => BinaryOp::Xor,
        ops::BinaryOpKind::Shl => BinaryOp::Shl,
        ops::BinaryOpKind::LShr => BinaryOp::LShr,
        ops::BinaryOpKind::AShr => BinaryOp::AShr,
        ops::BinaryOpKind::FAdd => BinaryOp::FAdd,
        ops::BinaryOpKind::FSub => BinaryOp::FSub,
        ops::BinaryOpKind::FMul => BinaryOp::FMul,
        ops::BinaryOpKind::FDiv => BinaryOp::FDiv,
        ops::BinaryOpKind::FRem => BinaryOp::FRem,
    }
}

type FlagSetter = fn(&mut FastMathFlags, bool);

const FASTMATH_HANDLERS: [(ops::FastmathFlags, FlagSetter); 7] = [
    (ops::FastmathFlags::NNAN, FastMathFlags::set_no_nans),
    (ops::FastmathFlags::NINF, FastMathFlags::set_no_infs),
    (ops::FastmathFlags::NSZ, FastMathFlags::set_no_signed_zeros),
    (ops::FastmathFlags::ARCP, FastMathFlags::set_allow_reciprocal),
    (ops::FastmathFlags::CONTRACT, FastMathFlags::set_allow_contract),
    (ops::FastmathFlags::AFN, FastMathFlags::set_approx_func),
    (ops::FastmathFlags::REASSOC, FastMathFlags::set_allow_reassoc),
];

/// Sets exactly the target flags whose source bits are present.
pub fn convert_fastmath_flags(flags: ops::FastmathFlags) -> FastMathFlags {
    let mut converted = FastMathFlags::default();
    for (bit, set) in FASTMATH_HANDLERS {
        if flags.contains(bit) {
            set(&mut converted, true);
        }
    }
    converted
}
