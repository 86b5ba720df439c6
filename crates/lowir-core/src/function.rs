use crate::entities::{Block, Inst};
use crate::instructions::InstData;
use crate::types::{FunctionType, Type};
use crate::{IrError, Result};
use cranelift_entity::PrimaryMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Linkage {
    #[default]
    External,
    Internal,
    Private,
    LinkOnce,
    Weak,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub insts: Vec<Inst>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub ty: FunctionType,
    pub linkage: Linkage,
    pub blocks: PrimaryMap<Block, BlockData>,
    pub insts: PrimaryMap<Inst, InstData>,
}

impl Function {
    pub fn new(name: impl Into<String>, ty: FunctionType) -> Self {
        Self {
            name: name.into(),
            ty,
            linkage: Linkage::default(),
            blocks: PrimaryMap::new(),
            insts: PrimaryMap::new(),
        }
    }

    /// A function without blocks is a declaration.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn create_block(&mut self) -> Block {
        self.blocks.push(BlockData::default())
    }

    pub fn param_type(&self, index: u32) -> Option<&Type> {
        self.ty.params.get(index as usize)
    }

    pub fn block_insts(&self, block: Block) -> &[Inst] {
        self.blocks
            .get(block)
            .map(|data| data.insts.as_slice())
            .unwrap_or(&[])
    }

    pub fn inst(&self, inst: Inst) -> Option<&InstData> {
        self.insts.get(inst)
    }

    pub fn inst_mut(&mut self, inst: Inst) -> Option<&mut InstData> {
        self.insts.get_mut(inst)
    }

    pub fn append_inst(&mut self, block: Block, data: InstData) -> Result<Inst> {
        if self.blocks.get(block).is_none() {
            return Err(IrError::BuilderError(format!(
                "Block {} does not exist in {}",
                block, self.name
            )));
        }
        let inst = self.insts.push(data);
        self.blocks[block].insts.push(inst);
        Ok(inst)
    }

    /// The block an instruction was placed in.
    pub fn inst_block(&self, inst: Inst) -> Option<Block> {
        self.blocks
            .iter()
            .find(|(_, data)| data.insts.contains(&inst))
            .map(|(block, _)| block)
    }

    pub fn terminator(&self, block: Block) -> Option<Inst> {
        let last = *self.block_insts(block).last()?;
        self.insts[last].kind.is_terminator().then_some(last)
    }

    pub fn inst_count(&self) -> usize {
        self.blocks.values().map(|data| data.insts.len()).sum()
    }
}
