use crate::entities::{FuncId, GlobalId, IntrinsicId, MdKind};
use crate::function::{Function, Linkage};
use crate::intrinsics::IntrinsicRegistry;
use crate::metadata::{MdKindRegistry, MetadataArena};
use crate::types::{FunctionType, Type};
use crate::values::{Constant, Value};
use crate::{IrError, Result};
use cranelift_entity::PrimaryMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a module-level symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalValue {
    Function(FuncId),
    Variable(GlobalId),
}

impl GlobalValue {
    /// The address of the symbol as an operand.
    pub fn as_value(&self) -> Value {
        match self {
            GlobalValue::Function(func) => Value::Function(*func),
            GlobalValue::Variable(global) => Value::Global(*global),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub ty: Type,
    pub constant: bool,
    pub initializer: Option<Constant>,
    pub linkage: Linkage,
}

impl GlobalVariable {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            constant: false,
            initializer: None,
            linkage: Linkage::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub functions: PrimaryMap<FuncId, Function>,
    pub globals: PrimaryMap<GlobalId, GlobalVariable>,
    symbols: IndexMap<String, GlobalValue>,
    pub metadata: MetadataArena,
    pub md_kinds: MdKindRegistry,
    pub intrinsics: IntrinsicRegistry,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: PrimaryMap::new(),
            globals: PrimaryMap::new(),
            symbols: IndexMap::new(),
            metadata: MetadataArena::new(),
            md_kinds: MdKindRegistry::new(),
            intrinsics: IntrinsicRegistry::with_builtins(),
        }
    }

    pub fn add_function(&mut self, function: Function) -> Result<FuncId> {
        if self.symbols.contains_key(&function.name) {
            return Err(IrError::DuplicateSymbol(function.name));
        }
        let name = function.name.clone();
        let id = self.functions.push(function);
        self.symbols.insert(name, GlobalValue::Function(id));
        Ok(id)
    }

    /// Returns the function named `name`, declaring it with `ty` if absent.
    pub fn get_or_insert_function(&mut self, name: &str, ty: FunctionType) -> Result<FuncId> {
        match self.symbols.get(name) {
            Some(GlobalValue::Function(id)) => {
                let existing = &self.functions[*id].ty;
                if *existing != ty {
                    return Err(IrError::TypeError(format!(
                        "{} is declared as {} but requested as {}",
                        name, existing, ty
                    )));
                }
                Ok(*id)
            }
            Some(GlobalValue::Variable(_)) => Err(IrError::DuplicateSymbol(name.to_string())),
            None => self.add_function(Function::new(name, ty)),
        }
    }

    pub fn add_global(&mut self, global: GlobalVariable) -> Result<GlobalId> {
        if self.symbols.contains_key(&global.name) {
            return Err(IrError::DuplicateSymbol(global.name));
        }
        let name = global.name.clone();
        let id = self.globals.push(global);
        self.symbols.insert(name, GlobalValue::Variable(id));
        Ok(id)
    }

    pub fn lookup_symbol(&self, name: &str) -> Option<GlobalValue> {
        self.symbols.get(name).copied()
    }

    pub fn get_function(&self, name: &str) -> Option<FuncId> {
        match self.symbols.get(name) {
            Some(GlobalValue::Function(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id]
    }

    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id]
    }

    pub fn global(&self, id: GlobalId) -> &GlobalVariable {
        &self.globals[id]
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, GlobalValue)> {
        self.symbols.iter().map(|(name, gv)| (name.as_str(), *gv))
    }

    pub fn md_kind_id(&mut self, name: &str) -> MdKind {
        self.md_kinds.get_or_insert(name)
    }

    /// Returns the declaration of intrinsic `id` specialized to `overloads`, creating it on
    /// first use. Each distinct overload binding gets its own declaration.
    pub fn intrinsic_declaration(&mut self, id: IntrinsicId, overloads: &[Type]) -> Result<FuncId> {
        let info = self.intrinsics.info(id);
        if info.is_overloaded() && overloads.is_empty() {
            return Err(IrError::IntrinsicError(format!(
                "{} is overloaded but no overload types were given",
                info.name
            )));
        }
        let name = info.declaration_name(overloads);
        let ty = info.instantiate(overloads)?;
        self.get_or_insert_function(&name, ty)
    }

    /// The type of `value` as seen from inside `func`.
    pub fn value_type(&self, func: FuncId, value: &Value) -> Result<Type> {
        match value {
            Value::Inst(inst) => self.functions[func]
                .inst(*inst)
                .map(|data| data.ty.clone())
                .ok_or_else(|| {
                    IrError::InvalidInstruction(format!(
                        "{} does not exist in {}",
                        inst, self.functions[func].name
                    ))
                }),
            Value::Argument { func: owner, index } => self.functions[*owner]
                .param_type(*index)
                .cloned()
                .ok_or_else(|| {
                    IrError::TypeError(format!(
                        "{} has no parameter {}",
                        self.functions[*owner].name, index
                    ))
                }),
            Value::Constant(c) => Ok(c.ty()),
            Value::Global(global) => Ok(Type::ptr(self.globals[*global].ty.clone())),
            Value::Function(callee) => Ok(Type::ptr(Type::function(
                self.functions[*callee].ty.clone(),
            ))),
        }
    }
}
