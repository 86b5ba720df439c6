use crate::attributes::Attribute;
use crate::entities::{AttrId, BlockId, FuncOpId, GlobalOpId, OpId, ValueId};
use crate::ops::Operation;
use crate::types::OpType;
use crate::{OpsError, Result};
use cranelift_entity::PrimaryMap;
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDef {
    OpResult { op: OpId, index: u32 },
    BlockArgument { block: BlockId, index: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueData {
    pub ty: OpType,
    pub def: ValueDef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockData {
    pub func: FuncOpId,
    pub arguments: Vec<ValueId>,
    pub ops: Vec<OpId>,
}

/// A function symbol. An empty body makes it a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncOp {
    pub name: String,
    pub ty: OpType,
    pub blocks: Vec<BlockId>,
}

impl FuncOp {
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn entry_block(&self) -> Option<BlockId> {
        self.blocks.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalOp {
    pub name: String,
    pub ty: OpType,
    pub constant: bool,
    pub value: Option<AttrId>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceModule {
    pub attrs: PrimaryMap<AttrId, Attribute>,
    pub values: PrimaryMap<ValueId, ValueData>,
    pub ops: PrimaryMap<OpId, Operation>,
    pub blocks: PrimaryMap<BlockId, BlockData>,
    pub functions: PrimaryMap<FuncOpId, FuncOp>,
    pub globals: PrimaryMap<GlobalOpId, GlobalOp>,
    /// Access groups that loop metadata may reference by name.
    pub access_groups: IndexSet<String>,
}

impl SourceModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call creates a new attribute object, even for equal contents.
    pub fn add_attr(&mut self, attr: Attribute) -> AttrId {
        self.attrs.push(attr)
    }

    pub fn attr(&self, id: AttrId) -> &Attribute {
        &self.attrs[id]
    }

    pub fn add_dictionary<K: Into<String>>(
        &mut self,
        entries: impl IntoIterator<Item = (K, AttrId)>,
    ) -> AttrId {
        let dict = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<IndexMap<_, _>>();
        self.add_attr(Attribute::Dictionary(dict))
    }

    pub fn add_function(&mut self, name: impl Into<String>, ty: OpType) -> FuncOpId {
        self.functions.push(FuncOp {
            name: name.into(),
            ty,
            blocks: Vec::new(),
        })
    }

    pub fn add_global(
        &mut self,
        name: impl Into<String>,
        ty: OpType,
        constant: bool,
        value: Option<AttrId>,
    ) -> GlobalOpId {
        self.globals.push(GlobalOp {
            name: name.into(),
            ty,
            constant,
            value,
        })
    }

    /// Declares an access group. Returns false if it was already declared.
    pub fn declare_access_group(&mut self, name: impl Into<String>) -> bool {
        self.access_groups.insert(name.into())
    }

    pub fn has_access_group(&self, name: &str) -> bool {
        self.access_groups.contains(name)
    }

    /// Appends a block with arguments of the given types to `func`.
    pub fn add_block(&mut self, func: FuncOpId, arg_types: Vec<OpType>) -> BlockId {
        let block = self.blocks.push(BlockData {
            func,
            arguments: Vec::new(),
            ops: Vec::new(),
        });
        let arguments = arg_types
            .into_iter()
            .enumerate()
            .map(|(index, ty)| {
                self.values.push(ValueData {
                    ty,
                    def: ValueDef::BlockArgument {
                        block,
                        index: index as u32,
                    },
                })
            })
            .collect();
        self.blocks[block].arguments = arguments;
        self.functions[func].blocks.push(block);
        block
    }

    /// Adds the entry block of `func`, with one argument per parameter.
    pub fn add_entry_block(&mut self, func: FuncOpId) -> Result<BlockId> {
        let params = match self.functions[func].ty.as_func() {
            Some((_, params, _)) => params.to_vec(),
            None => {
                return Err(OpsError::BuilderError(format!(
                    "{} does not have a function type",
                    self.functions[func].name
                )))
            }
        };
        if !self.functions[func].blocks.is_empty() {
            return Err(OpsError::BuilderError(format!(
                "{} already has an entry block",
                self.functions[func].name
            )));
        }
        Ok(self.add_block(func, params))
    }

    pub fn block_args(&self, block: BlockId) -> &[ValueId] {
        &self.blocks[block].arguments
    }

    pub fn value_type(&self, value: ValueId) -> &OpType {
        &self.values[value].ty
    }

    pub fn op(&self, op: OpId) -> &Operation {
        &self.ops[op]
    }

    pub fn lookup_function(&self, name: &str) -> Option<FuncOpId> {
        self.functions
            .iter()
            .find(|(_, func)| func.name == name)
            .map(|(id, _)| id)
    }

    /// Operations of `func` in program order.
    pub fn function_ops(&self, func: FuncOpId) -> impl Iterator<Item = OpId> + '_ {
        self.functions[func]
            .blocks
            .iter()
            .flat_map(move |block| self.blocks[*block].ops.iter().copied())
    }

    pub fn validate(&self) -> Result<()> {
        let mut names = std::collections::HashSet::new();
        for name in self
            .functions
            .values()
            .map(|f| &f.name)
            .chain(self.globals.values().map(|g| &g.name))
        {
            if !names.insert(name.as_str()) {
                return Err(OpsError::VerificationError(format!(
                    "Symbol {} is defined more than once",
                    name
                )));
            }
        }

        for (block, data) in self.blocks.iter() {
            for (position, op) in data.ops.iter().enumerate() {
                let operation = &self.ops[*op];
                let is_last = position + 1 == data.ops.len();
                if operation.kind.is_terminator() != is_last {
                    return Err(OpsError::VerificationError(format!(
                        "{} in {} must {}be the block terminator",
                        operation.name(),
                        block,
                        if is_last { "" } else { "not " }
                    )));
                }
                for successor in &operation.successors {
                    let expected = self.blocks[successor.block].arguments.len();
                    if successor.arguments.len() != expected {
                        return Err(OpsError::VerificationError(format!(
                            "{} forwards {} arguments to {} which takes {}",
                            operation.name(),
                            successor.arguments.len(),
                            successor.block,
                            expected
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
