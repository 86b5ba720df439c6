use crate::entities::{AttrId, BlockId, ValueId};
use crate::enums::{
    AsmDialect, AtomicBinOp, AtomicOrdering, BinaryOpKind, FCmpPredicate, FastmathFlags,
    ICmpPredicate,
};
use indexmap::IndexMap;

/// A successor block together with the values forwarded to its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor {
    pub block: BlockId,
    pub arguments: Vec<ValueId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineAsmOp {
    pub asm_string: String,
    pub constraints: String,
    pub has_side_effects: bool,
    pub is_align_stack: bool,
    pub asm_dialect: Option<AsmDialect>,
    /// One optional dictionary per operand.
    pub operand_attrs: Option<Vec<Option<AttrId>>>,
}

impl InlineAsmOp {
    pub fn new(asm_string: impl Into<String>, constraints: impl Into<String>) -> Self {
        Self {
            asm_string: asm_string.into(),
            constraints: constraints.into(),
            has_side_effects: false,
            is_align_stack: false,
            asm_dialect: None,
            operand_attrs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    /// Direct call when `callee` is set, otherwise the first operand is the callee pointer.
    Call {
        callee: Option<String>,
        fastmath: FastmathFlags,
    },
    InlineAsm(InlineAsmOp),
    /// Successors are the normal destination followed by the unwind destination.
    Invoke {
        callee: Option<String>,
    },
    LandingPad {
        cleanup: bool,
    },
    Br,
    CondBr {
        branch_weights: Option<Vec<i32>>,
    },
    /// Successors are the default destination followed by one destination per case value.
    Switch {
        case_values: Vec<i64>,
        branch_weights: Option<Vec<i32>>,
    },
    AddressOf {
        global_name: String,
    },
    CallIntrinsic {
        intrinsic: String,
        fastmath: FastmathFlags,
    },
    Constant {
        value: AttrId,
    },
    Undef,
    Null,
    Binary {
        op: BinaryOpKind,
        fastmath: FastmathFlags,
    },
    ICmp {
        predicate: ICmpPredicate,
    },
    FCmp {
        predicate: FCmpPredicate,
        fastmath: FastmathFlags,
    },
    AtomicRmw {
        bin_op: AtomicBinOp,
        ordering: AtomicOrdering,
    },
    Load,
    Store,
    Return,
    Unreachable,
    /// An operation no lowering rule knows about.
    Unregistered {
        name: String,
    },
}

impl OpKind {
    pub fn name(&self) -> &str {
        match self {
            OpKind::Call { .. } => "llvm.call",
            OpKind::InlineAsm(_) => "llvm.inline_asm",
            OpKind::Invoke { .. } => "llvm.invoke",
            OpKind::LandingPad { .. } => "llvm.landingpad",
            OpKind::Br => "llvm.br",
            OpKind::CondBr { .. } => "llvm.cond_br",
            OpKind::Switch { .. } => "llvm.switch",
            OpKind::AddressOf { .. } => "llvm.mlir.addressof",
            OpKind::CallIntrinsic { .. } => "llvm.call_intrinsic",
            OpKind::Constant { .. } => "llvm.mlir.constant",
            OpKind::Undef => "llvm.mlir.undef",
            OpKind::Null => "llvm.mlir.null",
            OpKind::Binary { op, .. } => op.as_ref(),
            OpKind::ICmp { .. } => "llvm.icmp",
            OpKind::FCmp { .. } => "llvm.fcmp",
            OpKind::AtomicRmw { .. } => "llvm.atomicrmw",
            OpKind::Load => "llvm.load",
            OpKind::Store => "llvm.store",
            OpKind::Return => "llvm.return",
            OpKind::Unreachable => "llvm.unreachable",
            OpKind::Unregistered { name } => name,
        }
    }

    /// Fast-math flags, for operations that carry them.
    pub fn fastmath(&self) -> Option<FastmathFlags> {
        match self {
            OpKind::Call { fastmath, .. }
            | OpKind::CallIntrinsic { fastmath, .. }
            | OpKind::Binary { fastmath, .. }
            | OpKind::FCmp { fastmath, .. } => Some(*fastmath),
            _ => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            OpKind::Br | OpKind::CondBr { .. } | OpKind::Switch { .. } | OpKind::Invoke { .. }
        )
    }

    pub fn is_terminator(&self) -> bool {
        self.is_branch() || matches!(self, OpKind::Return | OpKind::Unreachable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub operands: Vec<ValueId>,
    pub results: Vec<ValueId>,
    pub attributes: IndexMap<String, AttrId>,
    pub successors: Vec<Successor>,
    pub block: BlockId,
}

impl Operation {
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn attr(&self, key: &str) -> Option<AttrId> {
        self.attributes.get(key).copied()
    }

    pub fn result(&self) -> Option<ValueId> {
        self.results.first().copied()
    }
}
