/*! Lower generic operations into target instructions.
 *
 * The source IR says what a program does through a small closed set of operations. The target IR
 * wants flat instructions, explicit PHI nodes, metadata nodes and concrete intrinsic declarations.
 * This module carries the state that connects the two: which target value each source value became,
 * which loop metadata was already built for which attribute, and which branches still need their
 * forwarded arguments wired into PHI nodes.
 */

mod config;
mod context;
mod dispatch;
mod driver;
pub mod enums;
mod errors;
mod generic;
pub mod intrinsics;
pub mod metadata;
mod translation;
mod type_converter;

pub use config::TranslateConfig;
pub use context::{MappingContext, SymbolRef};
pub use dispatch::convert_operation;
pub use driver::translate_module;
pub use errors::{Result, TranslateError};
pub use generic::constant_from_attr;
pub use intrinsics::resolve_intrinsic;
pub use metadata::{branch_weights, set_loop_metadata, LoopMetadataCache};
pub use translation::ModuleTranslation;
pub use type_converter::{DefaultTypeConverter, TypeConverter};
