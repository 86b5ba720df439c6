/*! Operation-based source IR for the lowir lowering engine.
 *
 * Front ends describe programs here as generic operations: a closed kind with its own payload,
 * ordered operands, typed results, a named attribute dictionary and successor blocks that forward
 * arguments. Attributes live in an arena and are referred to by [`AttrId`], so two attributes with
 * equal contents created separately remain distinct objects. Consumers that cache derived data per
 * attribute key on that identity.
 */

pub mod attributes;
pub mod builder;
pub mod entities;
pub mod enums;
pub mod module;
pub mod ops;
pub mod types;

pub use attributes::Attribute;
pub use builder::{OpBuilder, OpState};
pub use entities::{AttrId, BlockId, FuncOpId, GlobalOpId, OpId, ValueId};
pub use enums::{
    AsmDialect, AtomicBinOp, AtomicOrdering, BinaryOpKind, FCmpPredicate, FastmathFlags,
    ICmpPredicate, LoopOptionCase,
};
pub use module::{BlockData, FuncOp, GlobalOp, SourceModule, ValueData, ValueDef};
pub use ops::{InlineAsmOp, OpKind, Operation, Successor};
pub use types::OpType;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Verification error: {0}")]
    VerificationError(String),
}

pub type Result<T> = std::result::Result<T, OpsError>;

#[cfg(test)]
mod tests;
