use super::errors::{Result, TranslateError};
use lowir_core::{FuncId, FunctionType, Module, Type};
use tracing::debug;

/// Finds or creates the declaration a call to intrinsic `name` should target, given the call's
/// result type (`Void` when it has none) and operand types.
pub fn resolve_intrinsic(
    module: &mut Module,
    name: &str,
    result_type: Type,
    operand_types: Vec<Type>,
) -> Result<FuncId> {
    let id = module
        .intrinsics
        .lookup(name)
        .ok_or_else(|| TranslateError::UnknownIntrinsic(name.to_string()))?;
    let info = module.intrinsics.info(id);

    let overloads = if info.is_overloaded() {
        if info.is_variadic() {
            return Err(TranslateError::VariadicIntrinsic(name.to_string()));
        }
        let candidate = FunctionType::new(result_type, operand_types);
        info.match_signature(&candidate)
            .ok_or_else(|| TranslateError::IntrinsicTypeMismatch(name.to_string()))?
    } else {
        Vec::new()
    };

    let decl_name = info.declaration_name(&overloads);
    let existed = module.get_function(&decl_name).is_some();
    let decl = module.intrinsic_declaration(id, &overloads)?;
    if !existed {
        debug!(intrinsic = name, declaration = %decl_name, "declared intrinsic");
    }
    Ok(decl)
}
