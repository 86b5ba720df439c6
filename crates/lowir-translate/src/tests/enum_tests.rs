use crate::ops_to_ir::enums::{
    convert_asm_dialect, convert_atomic_bin_op, convert_atomic_ordering, convert_binary_op,
    convert_fastmath_flags, convert_fcmp_predicate, convert_icmp_predicate,
};
use lowir_core::{AtomicOrdering, FastMathFlags, FloatPredicate, IntPredicate};
use lowir_ops as ops;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::hash::Hash;
use strum::IntoEnumIterator;

/// Every source variant maps somewhere and no two map to the same target.
fn assert_injective<S, T>(convert: fn(S) -> T) -> HashSet<T>
where
    S: IntoEnumIterator,
    T: Eq + Hash,
{
    let count = S::iter().count();
    let targets = S::iter().map(convert).collect::<HashSet<_>>();
    assert_eq!(targets.len(), count);
    targets
}

#[test]
fn test_tables_are_injective() {
    assert_injective(convert_icmp_predicate);
    assert_injective(convert_fcmp_predicate);
    assert_injective(convert_atomic_bin_op);
    assert_injective(convert_atomic_ordering);
    assert_injective(convert_asm_dialect);
    assert_injective(convert_binary_op);
}

#[test]
fn test_predicates() {
    assert_eq!(
        convert_icmp_predicate(ops::ICmpPredicate::Ult),
        IntPredicate::Ult
    );
    assert_eq!(
        convert_fcmp_predicate(ops::FCmpPredicate::Uno),
        FloatPredicate::Uno
    );
    assert_eq!(
        convert_fcmp_predicate(ops::FCmpPredicate::True),
        FloatPredicate::True
    );
}

#[test]
fn test_atomic_orderings() {
    assert_eq!(
        convert_atomic_ordering(ops::AtomicOrdering::AcqRel),
        AtomicOrdering::AcquireRelease
    );
    assert_eq!(
        convert_atomic_ordering(ops::AtomicOrdering::SeqCst),
        AtomicOrdering::SequentiallyConsistent
    );
}

#[test]
fn test_binary_ops_keep_float_class() {
    for op in ops::BinaryOpKind::iter() {
        assert_eq!(
            op.is_floating_point(),
            convert_binary_op(op).is_floating_point(),
            "{:?}",
            op
        );
    }
}

#[test]
fn test_fastmath_all_subsets() {
    for bits in 0..128u32 {
        let flags = ops::FastmathFlags::from_bits_truncate(bits);
        let converted = convert_fastmath_flags(flags);
        let expected = FastMathFlags {
            no_nans: flags.contains(ops::FastmathFlags::NNAN),
            no_infs: flags.contains(ops::FastmathFlags::NINF),
            no_signed_zeros: flags.contains(ops::FastmathFlags::NSZ),
            allow_reciprocal: flags.contains(ops::FastmathFlags::ARCP),
            allow_contract: flags.contains(ops::FastmathFlags::CONTRACT),
            approx_func: flags.contains(ops::FastmathFlags::AFN),
            allow_reassoc: flags.contains(ops::FastmathFlags::REASSOC),
        };
        assert_eq!(converted, expected, "bits {:#09b}", bits);
        assert_eq!(converted.count(), bits.count_ones() as usize);
    }
    assert_eq!(
        convert_fastmath_flags(ops::FastmathFlags::FAST),
        FastMathFlags::fast()
    );
    assert!(convert_fastmath_flags(ops::FastmathFlags::empty()).is_empty());
}
