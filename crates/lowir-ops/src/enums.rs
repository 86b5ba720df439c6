//! Closed enumerations carried by source operations.

use bitflags::bitflags;
use strum_macros::{AsRefStr, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ICmpPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FCmpPredicate {
    False,
    Oeq,
    Ogt,
    Oge,
    Olt,
    Ole,
    One,
    Ord,
    Ueq,
    Ugt,
    Uge,
    Ult,
    Ule,
    Une,
    Uno,
    True,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AtomicBinOp {
    Xchg,
    Add,
    Sub,
    And,
    Nand,
    Or,
    Xor,
    Max,
    Min,
    Umax,
    Umin,
    Fadd,
    Fsub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AtomicOrdering {
    NotAtomic,
    Unordered,
    Monotonic,
    Acquire,
    Release,
    AcqRel,
    SeqCst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AsmDialect {
    #[default]
    Att,
    Intel,
}

/// Keys of a loop-options attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LoopOptionCase {
    DisableLicm,
    DisableUnroll,
    InterleaveCount,
    DisablePipeline,
    PipelineInitiationInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
pub enum BinaryOpKind {
    #[strum(serialize = "llvm.add")]
    Add,
    #[strum(serialize = "llvm.sub")]
    Sub,
    #[strum(serialize = "llvm.mul")]
    Mul,
    #[strum(serialize = "llvm.sdiv")]
    SDiv,
    #[strum(serialize = "llvm.udiv")]
    UDiv,
    #[strum(serialize = "llvm.srem")]
    SRem,
    #[strum(serialize = "llvm.urem")]
    URem,
    #[strum(serialize = "llvm.and")]
    And,
    #[strum(serialize = "llvm.or")]
    Or,
    #[strum(serialize = "llvm.xor")]
    Xor,
    #[strum(serialize = "llvm.shl")]
    Shl,
    #[strum(serialize = "llvm.lshr")]
    LShr,
    #[strum(serialize = "llvm.ashr")]
    AShr,
    #[strum(serialize = "llvm.fadd")]
    FAdd,
    #[strum(serialize = "llvm.fsub")]
    FSub,
    #[strum(serialize = "llvm.fmul")]
    FMul,
    #[strum(serialize = "llvm.fdiv")]
    FDiv,
    #[strum(serialize = "llvm.frem")]
    FRem,
}

impl BinaryOpKind {
    pub fn is_floating_point(&self) -> bool {
        matches!(
            self,
            BinaryOpKind::FAdd
                | BinaryOpKind::FSub
                | BinaryOpKind::FMul
                | BinaryOpKind::FDiv
                | BinaryOpKind::FRem
        )
    }
}

bitflags! {
    /// Fast-math flags as carried by source operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FastmathFlags: u32 {
        const NNAN = 1;
        const NINF = 1 << 1;
        const NSZ = 1 << 2;
        const ARCP = 1 << 3;
        const CONTRACT = 1 << 4;
        const AFN = 1 << 5;
        const REASSOC = 1 << 6;
        const FAST = Self::NNAN.bits()
            | Self::NINF.bits()
            | Self::NSZ.bits()
            | Self::ARCP.bits()
            | Self::CONTRACT.bits()
            | Self::AFN.bits()
            | Self::REASSOC.bits();
    }
}
