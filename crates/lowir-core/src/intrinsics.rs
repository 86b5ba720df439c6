/*! Intrinsic registry and signature matching.
 *
 * Every intrinsic is described by a descriptor sequence: the return slot first, then one slot per
 * parameter. Slots are either fixed types or overload slots that bind a concrete type the first
 * time they are seen and must agree on every later reference. Overloaded intrinsics get one
 * declaration per distinct binding, named with the mangled overload types appended.
 */

use crate::entities::IntrinsicId;
use crate::types::{FunctionType, Type};
use crate::{IrError, Result};
use cranelift_entity::PrimaryMap;
use std::collections::HashMap;

/// Constraint on the type an overload slot may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverloadKind {
    Any,
    AnyInteger,
    AnyFloat,
    AnyVector,
    AnyPointer,
}

impl OverloadKind {
    pub fn accepts(&self, ty: &Type) -> bool {
        match self {
            OverloadKind::Any => !ty.is_void(),
            OverloadKind::AnyInteger => ty.is_int_or_int_vector(),
            OverloadKind::AnyFloat => ty.is_fp_or_fp_vector(),
            OverloadKind::AnyVector => ty.is_vector(),
            OverloadKind::AnyPointer => ty.is_pointer(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Fixed(Type),
    /// Binds overload slot `index`.
    Overload { index: u8, kind: OverloadKind },
    /// Must equal the type bound to overload slot `index`.
    SameAs(u8),
    /// Trailing variadic arguments.
    VarArg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrinsicInfo {
    pub name: String,
    /// Return slot followed by parameter slots.
    pub signature: Vec<TypeDescriptor>,
}

impl IntrinsicInfo {
    pub fn new(name: impl Into<String>, signature: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }

    pub fn is_overloaded(&self) -> bool {
        self.signature
            .iter()
            .any(|d| matches!(d, TypeDescriptor::Overload { .. }))
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self.signature.last(), Some(TypeDescriptor::VarArg))
    }

    fn overload_count(&self) -> usize {
        self.signature
            .iter()
            .filter(|d| matches!(d, TypeDescriptor::Overload { .. }))
            .count()
    }

    /// Matches a concrete signature against the descriptor table, returning the types bound to
    /// each overload slot in slot order.
    pub fn match_signature(&self, ty: &FunctionType) -> Option<Vec<Type>> {
        if ty.variadic || self.is_variadic() {
            return None;
        }
        let (ret, params) = self.signature.split_first()?;
        if params.len() != ty.params.len() {
            return None;
        }
        let mut bound = Vec::new();
        if !match_descriptor(ret, &ty.ret, &mut bound) {
            return None;
        }
        for (desc, param) in params.iter().zip(&ty.params) {
            if !match_descriptor(desc, param, &mut bound) {
                return None;
            }
        }
        (bound.len() == self.overload_count()).then_some(bound)
    }

    /// The declaration type for a given set of overload bindings.
    pub fn instantiate(&self, overloads: &[Type]) -> Result<FunctionType> {
        let resolve = |desc: &TypeDescriptor| -> Result<Option<Type>> {
            match desc {
                TypeDescriptor::Fixed(ty) => Ok(Some(ty.clone())),
                TypeDescriptor::Overload { index, .. } | TypeDescriptor::SameAs(index) => overloads
                    .get(*index as usize)
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| {
                        IrError::IntrinsicError(format!(
                            "{} requires overload type {}",
                            self.name, index
                        ))
                    }),
                TypeDescriptor::VarArg => Ok(None),
            }
        };

        let (ret, params) = self
            .signature
            .split_first()
            .ok_or_else(|| IrError::IntrinsicError(format!("{} has no signature", self.name)))?;
        let ret = resolve(ret)?.unwrap_or(Type::Void);
        let mut param_types = Vec::with_capacity(params.len());
        for desc in params {
            if let Some(ty) = resolve(desc)? {
                param_types.push(ty);
            }
        }
        Ok(FunctionType {
            ret,
            params: param_types,
            variadic: self.is_variadic(),
        })
    }

    pub fn declaration_name(&self, overloads: &[Type]) -> String {
        let mut name = self.name.clone();
        for ty in overloads {
            name.push('.');
            name.push_str(&ty.mangled());
        }
        name
    }
}

fn match_descriptor(desc: &TypeDescriptor, ty: &Type, bound: &mut Vec<Type>) -> bool {
    match desc {
        TypeDescriptor::Fixed(expected) => expected == ty,
        TypeDescriptor::Overload { index, kind } => {
            let index = *index as usize;
            if index < bound.len() {
                bound[index] == *ty
            } else if index == bound.len() && kind.accepts(ty) {
                bound.push(ty.clone());
                true
            } else {
                false
            }
        }
        TypeDescriptor::SameAs(index) => bound.get(*index as usize) == Some(ty),
        TypeDescriptor::VarArg => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntrinsicRegistry {
    infos: PrimaryMap<IntrinsicId, IntrinsicInfo>,
    by_name: HashMap<String, IntrinsicId>,
}

impl IntrinsicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for info in builtin_catalog() {
            registry.register(info);
        }
        registry
    }

    /// Registers an intrinsic, replacing the descriptor of one with the same name.
    pub fn register(&mut self, info: IntrinsicInfo) -> IntrinsicId {
        if let Some(id) = self.by_name.get(&info.name) {
            self.infos[*id] = info;
            return *id;
        }
        let name = info.name.clone();
        let id = self.infos.push(info);
        self.by_name.insert(name, id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<IntrinsicId> {
        self.by_name.get(name).copied()
    }

    pub fn info(&self, id: IntrinsicId) -> &IntrinsicInfo {
        &self.infos[id]
    }

    pub fn is_overloaded(&self, id: IntrinsicId) -> bool {
        self.infos[id].is_overloaded()
    }

    pub fn descriptors(&self, id: IntrinsicId) -> &[TypeDescriptor] {
        &self.infos[id].signature
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

fn builtin_catalog() -> Vec<IntrinsicInfo> {
    use OverloadKind::*;
    use TypeDescriptor::{Fixed, Overload, SameAs, VarArg};

    let void = || Fixed(Type::Void);
    let i1 = || Fixed(Type::i1());
    let i8_ptr = || Fixed(Type::ptr(Type::i8()));
    let ov = |index: u8, kind: OverloadKind| Overload { index, kind };

    let mut catalog = vec![
        IntrinsicInfo::new("llvm.trap", vec![void()]),
        IntrinsicInfo::new("llvm.debugtrap", vec![void()]),
        IntrinsicInfo::new("llvm.donothing", vec![void()]),
        IntrinsicInfo::new("llvm.assume", vec![void(), i1()]),
        IntrinsicInfo::new("llvm.stacksave", vec![i8_ptr()]),
        IntrinsicInfo::new("llvm.stackrestore", vec![void(), i8_ptr()]),
        IntrinsicInfo::new(
            "llvm.memcpy",
            vec![
                void(),
                ov(0, AnyPointer),
                ov(1, AnyPointer),
                ov(2, AnyInteger),
                i1(),
            ],
        ),
        IntrinsicInfo::new(
            "llvm.memmove",
            vec![
                void(),
                ov(0, AnyPointer),
                ov(1, AnyPointer),
                ov(2, AnyInteger),
                i1(),
            ],
        ),
        IntrinsicInfo::new(
            "llvm.memset",
            vec![
                void(),
                ov(0, AnyPointer),
                Fixed(Type::i8()),
                ov(1, AnyInteger),
                i1(),
            ],
        ),
        IntrinsicInfo::new("llvm.is.constant", vec![i1(), ov(0, Any)]),
        IntrinsicInfo::new("llvm.ssa.copy", vec![ov(0, Any), SameAs(0)]),
        IntrinsicInfo::new(
            "llvm.expect",
            vec![ov(0, AnyInteger), SameAs(0), SameAs(0)],
        ),
        IntrinsicInfo::new(
            "llvm.experimental.gc.statepoint",
            vec![
                Fixed(Type::Token),
                Fixed(Type::i64()),
                Fixed(Type::i32()),
                ov(0, AnyPointer),
                Fixed(Type::i32()),
                Fixed(Type::i32()),
                VarArg,
            ],
        ),
    ];

    for name in ["llvm.smax", "llvm.smin", "llvm.umax", "llvm.umin"] {
        catalog.push(IntrinsicInfo::new(
            name,
            vec![ov(0, AnyInteger), SameAs(0), SameAs(0)],
        ));
    }
    for name in ["llvm.ctpop", "llvm.bswap"] {
        catalog.push(IntrinsicInfo::new(name, vec![ov(0, AnyInteger), SameAs(0)]));
    }
    for name in ["llvm.abs", "llvm.ctlz", "llvm.cttz"] {
        catalog.push(IntrinsicInfo::new(
            name,
            vec![ov(0, AnyInteger), SameAs(0), i1()],
        ));
    }
    for name in ["llvm.fabs", "llvm.sqrt"] {
        catalog.push(IntrinsicInfo::new(name, vec![ov(0, AnyFloat), SameAs(0)]));
    }
    for name in ["llvm.maxnum", "llvm.minnum", "llvm.copysign"] {
        catalog.push(IntrinsicInfo::new(
            name,
            vec![ov(0, AnyFloat), SameAs(0), SameAs(0)],
        ));
    }
    catalog.push(IntrinsicInfo::new(
        "llvm.fma",
        vec![ov(0, AnyFloat), SameAs(0), SameAs(0), SameAs(0)],
    ));

    catalog
}
