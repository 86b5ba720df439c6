use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Int(u32),
    Half,
    Float,
    Double,
    Pointer { pointee: Box<Type>, addr_space: u32 },
    Function(Box<FunctionType>),
    Struct { fields: Vec<Type>, packed: bool },
    Array(Box<Type>, u64),
    Vector(Box<Type>, u32),
    Label,
    Token,
    Metadata,
}

impl Type {
    pub fn i1() -> Self {
        Type::Int(1)
    }

    pub fn i8() -> Self {
        Type::Int(8)
    }

    pub fn i32() -> Self {
        Type::Int(32)
    }

    pub fn i64() -> Self {
        Type::Int(64)
    }

    pub fn ptr(pointee: Type) -> Self {
        Type::Pointer {
            pointee: Box::new(pointee),
            addr_space: 0,
        }
    }

    pub fn function(ty: FunctionType) -> Self {
        Type::Function(Box::new(ty))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, Type::Half | Type::Float | Type::Double)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer { .. })
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector(..))
    }

    /// Element type for vectors, the type itself otherwise.
    pub fn scalar_type(&self) -> &Type {
        match self {
            Type::Vector(elem, _) => elem,
            other => other,
        }
    }

    pub fn is_int_or_int_vector(&self) -> bool {
        self.scalar_type().is_integer()
    }

    pub fn is_fp_or_fp_vector(&self) -> bool {
        self.scalar_type().is_floating_point()
    }

    pub fn int_width(&self) -> Option<u32> {
        match self {
            Type::Int(bits) => Some(*bits),
            _ => None,
        }
    }

    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer { pointee, .. } => Some(pointee),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(ft) => Some(ft),
            _ => None,
        }
    }

    /// Suffix used when naming overloaded intrinsic declarations, e.g. `i32`, `f64`, `p0i8`.
    pub fn mangled(&self) -> String {
        match self {
            Type::Void => "isVoid".to_string(),
            Type::Int(bits) => format!("i{}", bits),
            Type::Half => "f16".to_string(),
            Type::Float => "f32".to_string(),
            Type::Double => "f64".to_string(),
            Type::Pointer {
                pointee,
                addr_space,
            } => format!("p{}{}", addr_space, pointee.mangled()),
            Type::Function(ft) => {
                let mut out = format!("f_{}", ft.ret.mangled());
                for param in &ft.params {
                    out.push_str(&param.mangled());
                }
                if ft.variadic {
                    out.push_str("vararg");
                }
                out.push('f');
                out
            }
            Type::Struct { fields, .. } => {
                let mut out = "sl_".to_string();
                for field in fields {
                    out.push_str(&field.mangled());
                }
                out.push('s');
                out
            }
            Type::Array(elem, len) => format!("a{}{}", len, elem.mangled()),
            Type::Vector(elem, len) => format!("v{}{}", len, elem.mangled()),
            Type::Label => "label".to_string(),
            Type::Token => "token".to_string(),
            Type::Metadata => "Metadata".to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int(bits) => write!(f, "i{}", bits),
            Type::Half => write!(f, "half"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Pointer {
                pointee,
                addr_space: 0,
            } => write!(f, "{}*", pointee),
            Type::Pointer {
                pointee,
                addr_space,
            } => write!(f, "{} addrspace({})*", pointee, addr_space),
            Type::Function(ft) => write!(f, "{}", ft),
            Type::Struct { fields, packed } => {
                let body = fields
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                if *packed {
                    write!(f, "<{{ {} }}>", body)
                } else {
                    write!(f, "{{ {} }}", body)
                }
            }
            Type::Array(elem, len) => write!(f, "[{} x {}]", len, elem),
            Type::Vector(elem, len) => write!(f, "<{} x {}>", len, elem),
            Type::Label => write!(f, "label"),
            Type::Token => write!(f, "token"),
            Type::Metadata => write!(f, "metadata"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub ret: Type,
    pub params: Vec<Type>,
    pub variadic: bool,
}

impl FunctionType {
    pub fn new(ret: Type, params: Vec<Type>) -> Self {
        Self {
            ret,
            params,
            variadic: false,
        }
    }

    pub fn variadic(ret: Type, params: Vec<Type>) -> Self {
        Self {
            ret,
            params,
            variadic: true,
        }
    }

    /// Whether a call passing `count` arguments is well formed.
    pub fn accepts_arg_count(&self, count: usize) -> bool {
        if self.variadic {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = self
            .params
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>();
        if self.variadic {
            params.push("...".to_string());
        }
        write!(f, "{} ({})", self.ret, params.join(", "))
    }
}
