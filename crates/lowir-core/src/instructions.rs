use crate::attributes::AttributeList;
use crate::entities::{Block, FuncId, MdKind, MdNode};
use crate::fast_math::FastMathFlags;
use crate::inline_asm::InlineAsm;
use crate::types::{FunctionType, Type};
use crate::values::{Constant, Value};
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum IntPredicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FloatPredicate {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AtomicRmwBinOp {
    Xchg,
    Add,
    Sub,
    And,
    Nand,
    Or,
    Xor,
    Max,
    Min,
    UMax,
    UMin,
    FAdd,
    FSub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
pub enum AtomicOrdering {
    #[strum(serialize = "notatomic")]
    NotAtomic,
    #[strum(serialize = "unordered")]
    Unordered,
    #[strum(serialize = "monotonic")]
    Monotonic,
    #[strum(serialize = "acquire")]
    Acquire,
    #[strum(serialize = "release")]
    Release,
    #[strum(serialize = "acq_rel")]
    AcquireRelease,
    #[strum(serialize = "seq_cst")]
    SequentiallyConsistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl BinaryOp {
    pub fn is_floating_point(&self) -> bool {
        matches!(
            self,
            BinaryOp::FAdd | BinaryOp::FSub | BinaryOp::FMul | BinaryOp::FDiv | BinaryOp::FRem
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Callee {
    Direct(FuncId),
    Indirect(Value),
    InlineAsm(InlineAsm),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionData {
    Call {
        callee: Callee,
        fn_ty: FunctionType,
        args: Vec<Value>,
    },
    Invoke {
        callee: Callee,
        fn_ty: FunctionType,
        args: Vec<Value>,
        normal: Block,
        unwind: Block,
    },
    LandingPad {
        cleanup: bool,
        clauses: Vec<Value>,
    },
    Br {
        dest: Block,
    },
    CondBr {
        cond: Value,
        then_dest: Block,
        else_dest: Block,
    },
    Switch {
        value: Value,
        default: Block,
        cases: Vec<(Constant, Block)>,
    },
    Phi {
        incoming: Vec<(Value, Block)>,
    },
    Ret {
        value: Option<Value>,
    },
    Unreachable,
    Binary {
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
    },
    ICmp {
        pred: IntPredicate,
        lhs: Value,
        rhs: Value,
    },
    FCmp {
        pred: FloatPredicate,
        lhs: Value,
        rhs: Value,
    },
    AtomicRmw {
        op: AtomicRmwBinOp,
        ptr: Value,
        value: Value,
        ordering: AtomicOrdering,
    },
    Load {
        ptr: Value,
    },
    Store {
        value: Value,
        ptr: Value,
    },
}

impl InstructionData {
    pub fn opcode(&self) -> &'static str {
        match self {
            InstructionData::Call { .. } => "call",
            InstructionData::Invoke { .. } => "invoke",
            InstructionData::LandingPad { .. } => "landingpad",
            InstructionData::Br { .. } | InstructionData::CondBr { .. } => "br",
            InstructionData::Switch { .. } => "switch",
            InstructionData::Phi { .. } => "phi",
            InstructionData::Ret { .. } => "ret",
            InstructionData::Unreachable => "unreachable",
            InstructionData::Binary { .. } => "binary",
            InstructionData::ICmp { .. } => "icmp",
            InstructionData::FCmp { .. } => "fcmp",
            InstructionData::AtomicRmw { .. } => "atomicrmw",
            InstructionData::Load { .. } => "load",
            InstructionData::Store { .. } => "store",
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            InstructionData::Invoke { .. }
                | InstructionData::Br { .. }
                | InstructionData::CondBr { .. }
                | InstructionData::Switch { .. }
                | InstructionData::Ret { .. }
                | InstructionData::Unreachable
        )
    }

    /// Instructions that honour fast-math flags, given their result type.
    pub fn is_fp_math(&self, ty: &Type) -> bool {
        match self {
            InstructionData::Binary { op, .. } => op.is_floating_point(),
            InstructionData::FCmp { .. } => true,
            InstructionData::Call { .. } | InstructionData::Phi { .. } => ty.is_fp_or_fp_vector(),
            _ => false,
        }
    }

    pub fn successors(&self) -> Vec<Block> {
        match self {
            InstructionData::Br { dest } => vec![*dest],
            InstructionData::CondBr {
                then_dest,
                else_dest,
                ..
            } => vec![*then_dest, *else_dest],
            InstructionData::Switch { default, cases, .. } => {
                let mut blocks = vec![*default];
                blocks.extend(cases.iter().map(|(_, block)| *block));
                blocks
            }
            InstructionData::Invoke { normal, unwind, .. } => vec![*normal, *unwind],
            _ => Vec::new(),
        }
    }
}

/// An instruction together with its result type and side tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstData {
    pub kind: InstructionData,
    pub ty: Type,
    pub fast_math: FastMathFlags,
    pub attributes: AttributeList,
    pub metadata: Vec<(MdKind, MdNode)>,
}

impl InstData {
    pub fn new(kind: InstructionData, ty: Type) -> Self {
        Self {
            kind,
            ty,
            fast_math: FastMathFlags::default(),
            attributes: AttributeList::default(),
            metadata: Vec::new(),
        }
    }

    pub fn metadata(&self, kind: MdKind) -> Option<MdNode> {
        self.metadata
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, node)| *node)
    }

    /// Attach `node` under `kind`, replacing any previous attachment of that kind.
    pub fn set_metadata(&mut self, kind: MdKind, node: MdNode) {
        if let Some(slot) = self.metadata.iter_mut().find(|(k, _)| *k == kind) {
            slot.1 = node;
        } else {
            self.metadata.push((kind, node));
        }
    }
}
