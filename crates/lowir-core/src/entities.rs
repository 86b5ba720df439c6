//! Arena handles for target IR entities.

use cranelift_entity::entity_impl;
use serde::{Deserialize, Serialize};

/// A function (definition or declaration) in a [`crate::Module`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FuncId(u32);
entity_impl!(FuncId, "fn");

/// A global variable in a [`crate::Module`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalId(u32);
entity_impl!(GlobalId, "global");

/// A basic block, local to its function.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Block(u32);
entity_impl!(Block, "bb");

/// An instruction, local to its function.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Inst(u32);
entity_impl!(Inst, "inst");

/// A metadata node in the module's metadata arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MdNode(u32);
entity_impl!(MdNode, "!");

/// A registered metadata kind such as `prof` or `llvm.loop`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MdKind(u32);
entity_impl!(MdKind, "kind");

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntrinsicId(u32);
entity_impl!(IntrinsicId, "intrinsic");
