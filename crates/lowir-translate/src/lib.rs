/*! Translate operation-based IR into instruction-based target IR.
 *
 * Front ends and optimizers are happiest with generic operations that carry attribute dictionaries
 * and forward values along successor edges. Code generators want typed instructions, PHI nodes and
 * side tables of metadata. This crate performs that lowering one operation at a time, keeping the
 * per-module state explicit in a [`ModuleTranslation`].
 */

pub mod ops_to_ir;

pub use ops_to_ir::{
    convert_operation, translate_module, DefaultTypeConverter, LoopMetadataCache, MappingContext,
    ModuleTranslation, Result, SymbolRef, TranslateConfig, TranslateError, TypeConverter,
};

#[cfg(test)]
mod tests;
