/*! Instruction-level target IR for the lowir lowering engine.
 *
 * Code generators want flat, typed instructions grouped into basic blocks, with side tables for
 * metadata and call-site attributes. This crate provides that representation together with the
 * pieces a lowering pass leans on: an insertion-point builder carrying fast-math state, a
 * metadata arena that allows self-referential nodes, and an intrinsic registry that can match
 * overloaded signatures and materialize concrete declarations.
 */

pub mod attributes;
pub mod builder;
pub mod entities;
pub mod fast_math;
pub mod format;
pub mod function;
pub mod inline_asm;
pub mod instructions;
pub mod intrinsics;
pub mod metadata;
pub mod module;
pub mod types;
pub mod values;

pub use attributes::{Attribute, AttributeList};
pub use builder::{CursorPosition, FastMathFlagGuard, IrBuilder};
pub use entities::{Block, FuncId, GlobalId, Inst, IntrinsicId, MdKind, MdNode};
pub use fast_math::FastMathFlags;
pub use function::{BlockData, Function, Linkage};
pub use inline_asm::{AsmDialect, InlineAsm};
pub use instructions::{
    AtomicOrdering, AtomicRmwBinOp, BinaryOp, Callee, FloatPredicate, InstData, InstructionData,
    IntPredicate,
};
pub use intrinsics::{IntrinsicInfo, IntrinsicRegistry, OverloadKind, TypeDescriptor};
pub use metadata::{MdKindRegistry, Metadata, MdNodeData, MetadataArena};
pub use module::{GlobalValue, GlobalVariable, Module};
pub use types::{FunctionType, Type};
pub use values::{Constant, Value};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),
    #[error("Metadata error: {0}")]
    MetadataError(String),
    #[error("Intrinsic error: {0}")]
    IntrinsicError(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
