/*! Fluent construction of source operations.
 *
 * [`OpState`] collects everything an operation needs before it is placed; [`OpBuilder`] appends
 * operations at the end of one block and creates their result values. The typed helpers cover
 * the operations front ends emit most often; anything else goes through [`OpBuilder::insert`].
 */

use crate::attributes::Attribute;
use crate::entities::{AttrId, BlockId, OpId, ValueId};
use crate::enums::{BinaryOpKind, FastmathFlags, ICmpPredicate};
use crate::module::{SourceModule, ValueData, ValueDef};
use crate::ops::{OpKind, Operation, Successor};
use crate::types::OpType;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct OpState {
    pub kind: OpKind,
    pub operands: Vec<ValueId>,
    pub result_types: Vec<OpType>,
    pub attributes: IndexMap<String, AttrId>,
    pub successors: Vec<Successor>,
}

impl OpState {
    pub fn new(kind: OpKind) -> Self {
        Self {
            kind,
            operands: Vec::new(),
            result_types: Vec::new(),
            attributes: IndexMap::new(),
            successors: Vec::new(),
        }
    }

    pub fn operands(mut self, operands: impl IntoIterator<Item = ValueId>) -> Self {
        self.operands.extend(operands);
        self
    }

    pub fn result(mut self, ty: OpType) -> Self {
        self.result_types.push(ty);
        self
    }

    pub fn attr(mut self, key: impl Into<String>, attr: AttrId) -> Self {
        self.attributes.insert(key.into(), attr);
        self
    }

    pub fn successor(mut self, block: BlockId, arguments: Vec<ValueId>) -> Self {
        self.successors.push(Successor { block, arguments });
        self
    }
}

pub struct OpBuilder<'a> {
    module: &'a mut SourceModule,
    block: BlockId,
}

impl<'a> OpBuilder<'a> {
    pub fn at_end(module: &'a mut SourceModule, block: BlockId) -> Self {
        Self { module, block }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn set_block(&mut self, block: BlockId) {
        self.block = block;
    }

    pub fn module(&mut self) -> &mut SourceModule {
        &mut *self.module
    }

    pub fn attr(&mut self, attr: Attribute) -> AttrId {
        self.module.add_attr(attr)
    }

    pub fn insert(&mut self, state: OpState) -> OpId {
        let op = self.module.ops.push(Operation {
            kind: state.kind,
            operands: state.operands,
            results: Vec::new(),
            attributes: state.attributes,
            successors: state.successors,
            block: self.block,
        });
        let results = state
            .result_types
            .into_iter()
            .enumerate()
            .map(|(index, ty)| {
                self.module.values.push(ValueData {
                    ty,
                    def: ValueDef::OpResult {
                        op,
                        index: index as u32,
                    },
                })
            })
            .collect();
        self.module.ops[op].results = results;
        self.module.blocks[self.block].ops.push(op);
        op
    }

    /// Inserts an operation and returns its first result.
    pub fn insert_value(&mut self, state: OpState) -> Option<ValueId> {
        let op = self.insert(state);
        self.module.ops[op].result()
    }

    pub fn constant(&mut self, ty: OpType, value: Attribute) -> ValueId {
        let value = self.module.add_attr(value);
        let op = self.insert(OpState::new(OpKind::Constant { value }).result(ty));
        self.module.ops[op].results[0]
    }

    pub fn const_int(&mut self, width: u32, value: i64) -> ValueId {
        self.constant(OpType::Integer(width), Attribute::int(value, width))
    }

    pub fn binary(&mut self, op: BinaryOpKind, lhs: ValueId, rhs: ValueId) -> ValueId {
        self.binary_with(op, lhs, rhs, FastmathFlags::empty())
    }

    pub fn binary_with(
        &mut self,
        op: BinaryOpKind,
        lhs: ValueId,
        rhs: ValueId,
        fastmath: FastmathFlags,
    ) -> ValueId {
        let ty = self.module.value_type(lhs).clone();
        let op = self.insert(
            OpState::new(OpKind::Binary { op, fastmath })
                .operands([lhs, rhs])
                .result(ty),
        );
        self.module.ops[op].results[0]
    }

    pub fn icmp(&mut self, predicate: ICmpPredicate, lhs: ValueId, rhs: ValueId) -> ValueId {
        let op = self.insert(
            OpState::new(OpKind::ICmp { predicate })
                .operands([lhs, rhs])
                .result(OpType::i1()),
        );
        self.module.ops[op].results[0]
    }

    /// Direct call; `ret` is `None` for calls without a result.
    pub fn call(&mut self, callee: &str, args: Vec<ValueId>, ret: Option<OpType>) -> OpId {
        let mut state = OpState::new(OpKind::Call {
            callee: Some(callee.to_string()),
            fastmath: FastmathFlags::empty(),
        })
        .operands(args);
        if let Some(ty) = ret {
            state = state.result(ty);
        }
        self.insert(state)
    }

    pub fn address_of(&mut self, name: &str, ty: OpType) -> ValueId {
        let op = self.insert(
            OpState::new(OpKind::AddressOf {
                global_name: name.to_string(),
            })
            .result(ty),
        );
        self.module.ops[op].results[0]
    }

    pub fn load(&mut self, ty: OpType, ptr: ValueId) -> ValueId {
        let op = self.insert(OpState::new(OpKind::Load).operands([ptr]).result(ty));
        self.module.ops[op].results[0]
    }

    pub fn store(&mut self, value: ValueId, ptr: ValueId) -> OpId {
        self.insert(OpState::new(OpKind::Store).operands([value, ptr]))
    }

    pub fn br(&mut self, dest: BlockId, args: Vec<ValueId>) -> OpId {
        self.insert(OpState::new(OpKind::Br).successor(dest, args))
    }

    pub fn cond_br(
        &mut self,
        cond: ValueId,
        then_dest: (BlockId, Vec<ValueId>),
        else_dest: (BlockId, Vec<ValueId>),
    ) -> OpId {
        self.insert(
            OpState::new(OpKind::CondBr {
                branch_weights: None,
            })
            .operands([cond])
            .successor(then_dest.0, then_dest.1)
            .successor(else_dest.0, else_dest.1),
        )
    }

    pub fn ret(&mut self, value: Option<ValueId>) -> OpId {
        self.insert(OpState::new(OpKind::Return).operands(value))
    }

    pub fn unreachable(&mut self) -> OpId {
        self.insert(OpState::new(OpKind::Unreachable))
    }
}
