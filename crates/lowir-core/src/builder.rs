/*! Insertion-point builder for target IR.
 *
 * The builder appends instructions at the end of the block it is positioned in and stamps every
 * floating-point instruction with the fast-math flags currently in effect. Callers that change
 * those flags for a single operation do so through [`FastMathFlagGuard`], which puts the previous
 * flags back when it goes out of scope, including on early error returns.
 */

use crate::attributes::AttributeList;
use crate::entities::{Block, FuncId, Inst, MdKind, MdNode};
use crate::fast_math::FastMathFlags;
use crate::inline_asm::InlineAsm;
use crate::instructions::{
    AtomicOrdering, AtomicRmwBinOp, BinaryOp, Callee, FloatPredicate, InstData, InstructionData,
    IntPredicate,
};
use crate::metadata::MdKindRegistry;
use crate::module::Module;
use crate::types::{FunctionType, Type};
use crate::values::{Constant, Value};
use crate::{IrError, Result};
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorPosition {
    #[default]
    Nowhere,
    End(FuncId, Block),
}

pub struct IrBuilder<'m> {
    module: &'m mut Module,
    position: CursorPosition,
    fast_math: FastMathFlags,
}

impl<'m> IrBuilder<'m> {
    pub fn new(module: &'m mut Module) -> Self {
        Self {
            module,
            position: CursorPosition::Nowhere,
            fast_math: FastMathFlags::default(),
        }
    }

    pub fn module(&self) -> &Module {
        &*self.module
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut *self.module
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    pub fn set_position(&mut self, position: CursorPosition) {
        self.position = position;
    }

    pub fn position_at_end(&mut self, func: FuncId, block: Block) {
        self.position = CursorPosition::End(func, block);
    }

    pub fn current_function(&self) -> Result<FuncId> {
        match self.position {
            CursorPosition::End(func, _) => Ok(func),
            CursorPosition::Nowhere => Err(IrError::BuilderError(
                "Builder is not positioned".to_string(),
            )),
        }
    }

    pub fn current_block(&self) -> Option<Block> {
        match self.position {
            CursorPosition::End(_, block) => Some(block),
            CursorPosition::Nowhere => None,
        }
    }

    pub fn fast_math_flags(&self) -> FastMathFlags {
        self.fast_math
    }

    pub fn set_fast_math_flags(&mut self, flags: FastMathFlags) {
        self.fast_math = flags;
    }

    /// Saves the current fast-math flags; they are restored when the guard is dropped.
    pub fn fast_math_guard(&mut self) -> FastMathFlagGuard<'_, 'm> {
        let saved = self.fast_math;
        FastMathFlagGuard {
            builder: self,
            saved,
        }
    }

    pub fn value_type(&self, value: &Value) -> Result<Type> {
        let func = self.current_function()?;
        self.module.value_type(func, value)
    }

    pub fn inst(&self, inst: Inst) -> Result<&InstData> {
        let func = self.current_function()?;
        self.module
            .function(func)
            .inst(inst)
            .ok_or_else(|| IrError::InvalidInstruction(format!("{} does not exist", inst)))
    }

    fn inst_mut(&mut self, inst: Inst) -> Result<&mut InstData> {
        let func = self.current_function()?;
        self.module
            .function_mut(func)
            .inst_mut(inst)
            .ok_or_else(|| IrError::InvalidInstruction(format!("{} does not exist", inst)))
    }

    fn insert(&mut self, kind: InstructionData, ty: Type) -> Result<Inst> {
        let (func, block) = match self.position {
            CursorPosition::End(func, block) => (func, block),
            CursorPosition::Nowhere => {
                return Err(IrError::BuilderError(format!(
                    "Cannot insert {} without an insertion point",
                    kind.opcode()
                )))
            }
        };
        let mut data = InstData::new(kind, ty);
        if data.kind.is_fp_math(&data.ty) {
            data.fast_math = self.fast_math;
        }
        self.module.function_mut(func).append_inst(block, data)
    }

    fn check_args(&self, fn_ty: &FunctionType, args: &[Value]) -> Result<()> {
        if !fn_ty.accepts_arg_count(args.len()) {
            return Err(IrError::InvalidInstruction(format!(
                "call to {} passes {} arguments",
                fn_ty,
                args.len()
            )));
        }
        Ok(())
    }

    pub fn create_call_to(
        &mut self,
        callee: Callee,
        fn_ty: FunctionType,
        args: Vec<Value>,
    ) -> Result<Inst> {
        self.check_args(&fn_ty, &args)?;
        let ty = fn_ty.ret.clone();
        self.insert(InstructionData::Call { callee, fn_ty, args }, ty)
    }

    pub fn create_call(&mut self, callee: FuncId, args: Vec<Value>) -> Result<Inst> {
        let fn_ty = self.module.function(callee).ty.clone();
        self.create_call_to(Callee::Direct(callee), fn_ty, args)
    }

    pub fn create_indirect_call(
        &mut self,
        fn_ty: FunctionType,
        callee: Value,
        args: Vec<Value>,
    ) -> Result<Inst> {
        self.create_call_to(Callee::Indirect(callee), fn_ty, args)
    }

    pub fn create_inline_asm_call(&mut self, asm: InlineAsm, args: Vec<Value>) -> Result<Inst> {
        let fn_ty = asm.fn_ty.clone();
        self.create_call_to(Callee::InlineAsm(asm), fn_ty, args)
    }

    pub fn create_invoke(
        &mut self,
        callee: Callee,
        fn_ty: FunctionType,
        args: Vec<Value>,
        normal: Block,
        unwind: Block,
    ) -> Result<Inst> {
        self.check_args(&fn_ty, &args)?;
        let ty = fn_ty.ret.clone();
        self.insert(
            InstructionData::Invoke {
                callee,
                fn_ty,
                args,
                normal,
                unwind,
            },
            ty,
        )
    }

    pub fn create_landing_pad(&mut self, ty: Type, num_clauses: usize) -> Result<Inst> {
        self.insert(
            InstructionData::LandingPad {
                cleanup: false,
                clauses: Vec::with_capacity(num_clauses),
            },
            ty,
        )
    }

    /// Clauses must be link-time constants.
    pub fn add_clause(&mut self, landing_pad: Inst, clause: Value) -> Result<()> {
        if !clause.is_constant() {
            return Err(IrError::InvalidInstruction(
                "landingpad clause is not a constant".to_string(),
            ));
        }
        match &mut self.inst_mut(landing_pad)?.kind {
            InstructionData::LandingPad { clauses, .. } => {
                clauses.push(clause);
                Ok(())
            }
            other => Err(IrError::InvalidInstruction(format!(
                "{} is not a landingpad",
                other.opcode()
            ))),
        }
    }

    pub fn set_cleanup(&mut self, landing_pad: Inst, value: bool) -> Result<()> {
        match &mut self.inst_mut(landing_pad)?.kind {
            InstructionData::LandingPad { cleanup, .. } => {
                *cleanup = value;
                Ok(())
            }
            other => Err(IrError::InvalidInstruction(format!(
                "{} is not a landingpad",
                other.opcode()
            ))),
        }
    }

    pub fn create_br(&mut self, dest: Block) -> Result<Inst> {
        self.insert(InstructionData::Br { dest }, Type::Void)
    }

    pub fn create_cond_br(
        &mut self,
        cond: Value,
        then_dest: Block,
        else_dest: Block,
        weights: Option<MdNode>,
    ) -> Result<Inst> {
        let inst = self.insert(
            InstructionData::CondBr {
                cond,
                then_dest,
                else_dest,
            },
            Type::Void,
        )?;
        if let Some(node) = weights {
            let kind = self.module.md_kind_id(MdKindRegistry::PROF);
            self.set_metadata(inst, kind, node)?;
        }
        Ok(inst)
    }

    pub fn create_switch(
        &mut self,
        value: Value,
        default: Block,
        num_cases: usize,
        weights: Option<MdNode>,
    ) -> Result<Inst> {
        let inst = self.insert(
            InstructionData::Switch {
                value,
                default,
                cases: Vec::with_capacity(num_cases),
            },
            Type::Void,
        )?;
        if let Some(node) = weights {
            let kind = self.module.md_kind_id(MdKindRegistry::PROF);
            self.set_metadata(inst, kind, node)?;
        }
        Ok(inst)
    }

    pub fn add_case(&mut self, switch: Inst, value: Constant, dest: Block) -> Result<()> {
        match &mut self.inst_mut(switch)?.kind {
            InstructionData::Switch { cases, .. } => {
                cases.push((value, dest));
                Ok(())
            }
            other => Err(IrError::InvalidInstruction(format!(
                "{} is not a switch",
                other.opcode()
            ))),
        }
    }

    pub fn create_phi(&mut self, ty: Type) -> Result<Inst> {
        self.insert(
            InstructionData::Phi {
                incoming: Vec::new(),
            },
            ty,
        )
    }

    pub fn add_incoming(&mut self, phi: Inst, value: Value, pred: Block) -> Result<()> {
        match &mut self.inst_mut(phi)?.kind {
            InstructionData::Phi { incoming } => {
                incoming.push((value, pred));
                Ok(())
            }
            other => Err(IrError::InvalidInstruction(format!(
                "{} is not a phi",
                other.opcode()
            ))),
        }
    }

    pub fn create_ret(&mut self, value: Option<Value>) -> Result<Inst> {
        self.insert(InstructionData::Ret { value }, Type::Void)
    }

    pub fn create_unreachable(&mut self) -> Result<Inst> {
        self.insert(InstructionData::Unreachable, Type::Void)
    }

    pub fn create_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Inst> {
        let ty = self.value_type(&lhs)?;
        let rhs_ty = self.value_type(&rhs)?;
        if ty != rhs_ty {
            return Err(IrError::TypeError(format!(
                "{} operands differ: {} and {}",
                op.as_ref(),
                ty,
                rhs_ty
            )));
        }
        self.insert(InstructionData::Binary { op, lhs, rhs }, ty)
    }

    fn compare_result_type(&self, lhs: &Value) -> Result<Type> {
        Ok(match self.value_type(lhs)? {
            Type::Vector(_, len) => Type::Vector(Box::new(Type::i1()), len),
            _ => Type::i1(),
        })
    }

    pub fn create_icmp(&mut self, pred: IntPredicate, lhs: Value, rhs: Value) -> Result<Inst> {
        let ty = self.compare_result_type(&lhs)?;
        self.insert(InstructionData::ICmp { pred, lhs, rhs }, ty)
    }

    pub fn create_fcmp(&mut self, pred: FloatPredicate, lhs: Value, rhs: Value) -> Result<Inst> {
        let ty = self.compare_result_type(&lhs)?;
        self.insert(InstructionData::FCmp { pred, lhs, rhs }, ty)
    }

    pub fn create_atomic_rmw(
        &mut self,
        op: AtomicRmwBinOp,
        ptr: Value,
        value: Value,
        ordering: AtomicOrdering,
    ) -> Result<Inst> {
        let ty = self.value_type(&value)?;
        self.insert(
            InstructionData::AtomicRmw {
                op,
                ptr,
                value,
                ordering,
            },
            ty,
        )
    }

    pub fn create_load(&mut self, ty: Type, ptr: Value) -> Result<Inst> {
        self.insert(InstructionData::Load { ptr }, ty)
    }

    pub fn create_store(&mut self, value: Value, ptr: Value) -> Result<Inst> {
        self.insert(InstructionData::Store { value, ptr }, Type::Void)
    }

    pub fn set_metadata(&mut self, inst: Inst, kind: MdKind, node: MdNode) -> Result<()> {
        self.inst_mut(inst)?.set_metadata(kind, node);
        Ok(())
    }

    pub fn set_call_attributes(&mut self, inst: Inst, attributes: AttributeList) -> Result<()> {
        let data = self.inst_mut(inst)?;
        match data.kind {
            InstructionData::Call { .. } | InstructionData::Invoke { .. } => {
                data.attributes = attributes;
                Ok(())
            }
            _ => Err(IrError::InvalidInstruction(format!(
                "{} does not take call attributes",
                data.kind.opcode()
            ))),
        }
    }
}

/// Scoped override of the builder's fast-math flags.
pub struct FastMathFlagGuard<'b, 'm> {
    builder: &'b mut IrBuilder<'m>,
    saved: FastMathFlags,
}

impl<'b, 'm> Deref for FastMathFlagGuard<'b, 'm> {
    type Target = IrBuilder<'m>;

    fn deref(&self) -> &Self::Target {
        &*self.builder
    }
}

impl<'b, 'm> DerefMut for FastMathFlagGuard<'b, 'm> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.builder
    }
}

impl Drop for FastMathFlagGuard<'_, '_> {
    fn drop(&mut self) {
        self.builder.fast_math = self.saved;
    }
}
