/*! Whole-module driver.
 *
 * Declares every source symbol in the target module, then lowers each defined function: blocks
 * are created up front, entry-block arguments become function arguments, every other block
 * argument becomes a PHI node, operations are lowered in program order and finally each PHI
 * receives one incoming value per forwarding branch.
 */

use super::config::TranslateConfig;
use super::dispatch::convert_operation;
use super::errors::{Result, TranslateError};
use super::generic::constant_from_attr;
use super::translation::ModuleTranslation;
use lowir_core::{Function, GlobalVariable, IrBuilder, Module, Value};
use lowir_ops::{FuncOp, FuncOpId, SourceModule};
use tracing::debug;

impl<'s> ModuleTranslation<'s> {
    /// Lowers the whole source module into `module`. The first failure aborts the translation.
    pub fn translate(&mut self, module: &mut Module) -> Result<()> {
        let source = self.source();
        source.validate()?;
        debug!(
            module = %module.name,
            functions = source.functions.len(),
            globals = source.globals.len(),
            "translating module"
        );

        self.declare_symbols(module)?;

        let mut builder = IrBuilder::new(module);
        for (func_id, func) in source.functions.iter() {
            if func.is_declaration() {
                continue;
            }
            self.translate_function(func_id, func, &mut builder)?;
        }
        Ok(())
    }

    fn declare_symbols(&mut self, module: &mut Module) -> Result<()> {
        let source = self.source();
        for (_, global) in source.globals.iter() {
            let ty = self.convert_type(&global.ty)?;
            let mut variable = GlobalVariable::new(global.name.clone(), ty);
            variable.constant = global.constant;
            if let Some(value) = global.value {
                variable.initializer = Some(constant_from_attr(source.attr(value), &variable.ty)?);
            }
            module.add_global(variable)?;
        }
        for (_, func) in source.functions.iter() {
            let ty = self.type_converter().convert_function_type(&func.ty)?;
            module.add_function(Function::new(func.name.clone(), ty))?;
        }
        Ok(())
    }

    fn translate_function(
        &mut self,
        func_id: FuncOpId,
        func: &'s FuncOp,
        builder: &mut IrBuilder,
    ) -> Result<()> {
        debug!(function = %func.name, blocks = func.blocks.len(), "translating function");
        let source = self.source();
        self.mapping_mut().clear_function_state();

        let target = builder
            .module()
            .get_function(&func.name)
            .ok_or_else(|| TranslateError::UnknownSymbol(func.name.clone()))?;

        for block in &func.blocks {
            let tgt = builder.module_mut().function_mut(target).create_block();
            self.mapping_mut().map_block(*block, tgt);
        }

        let (entry, rest) = func.blocks.split_first().ok_or_else(|| {
            TranslateError::InvariantViolation(format!("{} has no entry block", func_id))
        })?;
        let entry_args = source.block_args(*entry);
        let param_count = builder.module().function(target).ty.params.len();
        if entry_args.len() != param_count {
            return Err(TranslateError::InvalidSource(format!(
                "entry block of {} takes {} arguments but the function has {} parameters",
                func.name,
                entry_args.len(),
                param_count
            )));
        }
        for (index, arg) in entry_args.iter().enumerate() {
            let value = Value::Argument {
                func: target,
                index: index as u32,
            };
            self.mapping_mut().define_value(*arg, value)?;
        }

        for block in rest {
            let tgt = self.mapping().lookup_block(*block)?;
            builder.position_at_end(target, tgt);
            for arg in source.block_args(*block) {
                let ty = self.value_type(*arg)?;
                let phi = builder.create_phi(ty)?;
                self.mapping_mut().define_value(*arg, Value::Inst(phi))?;
            }
        }

        for block in &func.blocks {
            let tgt = self.mapping().lookup_block(*block)?;
            builder.position_at_end(target, tgt);
            for op in &source.blocks[*block].ops {
                convert_operation(*op, builder, self)?;
            }
        }

        self.patch_phis(builder)
    }

    /// Adds one incoming value per forwarded successor argument. An invoke feeds both its normal
    /// and its unwind destination.
    fn patch_phis(&mut self, builder: &mut IrBuilder) -> Result<()> {
        let source = self.source();
        let branches = self.mapping().branches().collect::<Vec<_>>();
        for (op_id, _) in branches {
            let op = source.op(op_id);
            let pred = self.mapping().lookup_block(op.block)?;
            for successor in &op.successors {
                let params = source.block_args(successor.block);
                for (param, forwarded) in params.iter().zip(&successor.arguments) {
                    let phi = self
                        .mapping()
                        .lookup_value(*param)?
                        .as_inst()
                        .ok_or_else(|| {
                            TranslateError::InvariantViolation(format!(
                                "block argument {} is not a phi",
                                param
                            ))
                        })?;
                    let value = self.mapping().lookup_value(*forwarded)?;
                    builder.add_incoming(phi, value, pred)?;
                }
            }
        }
        Ok(())
    }
}

/// Translates `source` into a fresh target module.
pub fn translate_module(source: &SourceModule, config: TranslateConfig) -> Result<Module> {
    let mut module = Module::new(config.module_name.clone());
    ModuleTranslation::new(source, config).translate(&mut module)?;
    Ok(module)
}
