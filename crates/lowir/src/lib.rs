/*! Unified interface for lowering operation-based IR.
 *
 * Single import for everything you need: building source modules, translating them into target
 * IR and dumping the result as text. The helpers here wrap the translation errors with context for
 * callers that just want an `anyhow::Result`.
 */

pub use lowir_core as core;
pub use lowir_ops as ops;
pub use lowir_translate as translate;

pub use lowir_core::{
    format::format_module, Function, FunctionType, Inst, InstructionData, Module, Type, Value,
};

pub use lowir_ops::{
    Attribute, BinaryOpKind, OpBuilder, OpKind, OpState, OpType, Operation, SourceModule,
};

pub use lowir_translate::{
    convert_operation, ModuleTranslation, TranslateConfig, TranslateError, TypeConverter,
};

use anyhow::{Context, Result};

/// Translates `source` with the default configuration.
pub fn translate_module(source: &SourceModule) -> Result<Module> {
    translate_module_with_config(source, TranslateConfig::default())
}

pub fn translate_module_with_config(
    source: &SourceModule,
    config: TranslateConfig,
) -> Result<Module> {
    let name = config.module_name.clone();
    lowir_translate::translate_module(source, config)
        .with_context(|| format!("Failed to translate module '{}'", name))
}

/// Translates `source` and renders the target module as text.
pub fn translate_to_text(source: &SourceModule, config: TranslateConfig) -> Result<String> {
    let module = translate_module_with_config(source, config)?;
    Ok(format_module(&module))
}
