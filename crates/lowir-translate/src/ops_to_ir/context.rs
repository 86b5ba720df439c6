/*! Source-to-target mapping state for one module translation.
 *
 * Values are registered when their defining operation or block is lowered and must be found on
 * every later use. Blocks are registered up front by the driver. Branch-like operations are
 * recorded with the instruction they became so PHI nodes can be wired once every block exists.
 */

use super::errors::{Result, TranslateError};
use indexmap::IndexMap;
use lowir_core::{Block, FuncId, GlobalId, GlobalValue, Inst, Module, Value};
use lowir_ops::{BlockId, OpId, ValueId};
use std::collections::HashMap;

/// What a symbol name resolved to in the target module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRef {
    Global(GlobalId),
    Function(FuncId),
}

impl SymbolRef {
    pub fn address(&self) -> Value {
        match self {
            SymbolRef::Global(global) => Value::Global(*global),
            SymbolRef::Function(func) => Value::Function(*func),
        }
    }
}

#[derive(Debug, Default)]
pub struct MappingContext {
    values: HashMap<ValueId, Value>,
    blocks: HashMap<BlockId, Block>,
    branches: IndexMap<OpId, Inst>,
}

impl MappingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_value(&mut self, src: ValueId, tgt: Value) -> Result<()> {
        if self.values.contains_key(&src) {
            return Err(TranslateError::InvariantViolation(format!(
                "{} is already mapped",
                src
            )));
        }
        self.values.insert(src, tgt);
        Ok(())
    }

    pub fn lookup_value(&self, src: ValueId) -> Result<Value> {
        self.values
            .get(&src)
            .cloned()
            .ok_or_else(|| TranslateError::UnmappedValue(src.to_string()))
    }

    pub fn lookup_values(&self, srcs: &[ValueId]) -> Result<Vec<Value>> {
        srcs.iter().map(|src| self.lookup_value(*src)).collect()
    }

    pub fn map_block(&mut self, src: BlockId, tgt: Block) {
        self.blocks.insert(src, tgt);
    }

    pub fn lookup_block(&self, src: BlockId) -> Result<Block> {
        self.blocks
            .get(&src)
            .copied()
            .ok_or_else(|| TranslateError::UnmappedBlock(src.to_string()))
    }

    /// Later registrations for the same operation replace earlier ones.
    pub fn map_branch(&mut self, src: OpId, inst: Inst) {
        self.branches.insert(src, inst);
    }

    pub fn lookup_branch(&self, src: OpId) -> Option<Inst> {
        self.branches.get(&src).copied()
    }

    /// Recorded branches in the order they were lowered.
    pub fn branches(&self) -> impl Iterator<Item = (OpId, Inst)> + '_ {
        self.branches.iter().map(|(op, inst)| (*op, *inst))
    }

    pub fn resolve_symbol(&self, module: &Module, name: &str) -> Option<SymbolRef> {
        module.lookup_symbol(name).map(|gv| match gv {
            GlobalValue::Function(func) => SymbolRef::Function(func),
            GlobalValue::Variable(global) => SymbolRef::Global(global),
        })
    }

    pub fn lookup_function(&self, module: &Module, name: &str) -> Result<FuncId> {
        match self.resolve_symbol(module, name) {
            Some(SymbolRef::Function(func)) => Ok(func),
            _ => Err(TranslateError::UnknownSymbol(name.to_string())),
        }
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Drops per-function state; value and block handles are function local in the target.
    pub fn clear_function_state(&mut self) {
        self.values.clear();
        self.blocks.clear();
        self.branches.clear();
    }
}
