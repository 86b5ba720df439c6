mod context_tests;
mod enum_tests;
mod metadata_tests;

use crate::ops_to_ir::{translate_module, Result, TranslateConfig};
use lowir_core::{Block, Function, InstData, Module};
use lowir_ops::{BlockId, FuncOpId, OpType, SourceModule};

/// Adds a defined function with an entry block.
pub(crate) fn define(
    source: &mut SourceModule,
    name: &str,
    ret: OpType,
    params: Vec<OpType>,
) -> (FuncOpId, BlockId) {
    let func = source.add_function(name, OpType::func(ret, params));
    let entry = source.add_entry_block(func).unwrap();
    (func, entry)
}

pub(crate) fn translate(source: &SourceModule) -> Result<Module> {
    translate_module(source, TranslateConfig::default())
}

pub(crate) fn target_function<'m>(module: &'m Module, name: &str) -> &'m Function {
    module.function(module.get_function(name).unwrap())
}

pub(crate) fn target_blocks(function: &Function) -> Vec<Block> {
    function.blocks.keys().collect()
}

/// Instructions of `block` in order.
pub(crate) fn block_insts(function: &Function, block: Block) -> Vec<&InstData> {
    function
        .block_insts(block)
        .iter()
        .map(|inst| &function.insts[*inst])
        .collect()
}

pub(crate) fn terminator(function: &Function, block: Block) -> &InstData {
    &function.insts[function.terminator(block).unwrap()]
}
