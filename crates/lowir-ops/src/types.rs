use std::fmt;

/// Types as they appear on source operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpType {
    Void,
    Integer(u32),
    F16,
    F32,
    F64,
    /// `elem` is `None` for opaque pointers.
    Ptr {
        elem: Option<Box<OpType>>,
        addr_space: u32,
    },
    Func {
        ret: Box<OpType>,
        params: Vec<OpType>,
        variadic: bool,
    },
    Struct {
        fields: Vec<OpType>,
        packed: bool,
    },
    Array(Box<OpType>, u64),
    Vector(Box<OpType>, u32),
    Token,
    Label,
    Metadata,
}

impl OpType {
    pub fn i1() -> Self {
        OpType::Integer(1)
    }

    pub fn i8() -> Self {
        OpType::Integer(8)
    }

    pub fn i32() -> Self {
        OpType::Integer(32)
    }

    pub fn i64() -> Self {
        OpType::Integer(64)
    }

    pub fn ptr_to(elem: OpType) -> Self {
        OpType::Ptr {
            elem: Some(Box::new(elem)),
            addr_space: 0,
        }
    }

    pub fn opaque_ptr() -> Self {
        OpType::Ptr {
            elem: None,
            addr_space: 0,
        }
    }

    pub fn func(ret: OpType, params: Vec<OpType>) -> Self {
        OpType::Func {
            ret: Box::new(ret),
            params,
            variadic: false,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, OpType::Void)
    }

    pub fn pointee(&self) -> Option<&OpType> {
        match self {
            OpType::Ptr { elem, .. } => elem.as_deref(),
            _ => None,
        }
    }

    /// Return and parameter types if this is a function type.
    pub fn as_func(&self) -> Option<(&OpType, &[OpType], bool)> {
        match self {
            OpType::Func {
                ret,
                params,
                variadic,
            } => Some((ret, params, *variadic)),
            _ => None,
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpType::Void => write!(f, "!llvm.void"),
            OpType::Integer(bits) => write!(f, "i{}", bits),
            OpType::F16 => write!(f, "f16"),
            OpType::F32 => write!(f, "f32"),
            OpType::F64 => write!(f, "f64"),
            OpType::Ptr { elem: None, .. } => write!(f, "!llvm.ptr"),
            OpType::Ptr {
                elem: Some(elem), ..
            } => write!(f, "!llvm.ptr<{}>", elem),
            OpType::Func {
                ret,
                params,
                variadic,
            } => {
                let mut parts = params.iter().map(|p| p.to_string()).collect::<Vec<_>>();
                if *variadic {
                    parts.push("...".to_string());
                }
                write!(f, "!llvm.func<{} ({})>", ret, parts.join(", "))
            }
            OpType::Struct { fields, packed } => {
                let body = fields
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                if *packed {
                    write!(f, "!llvm.struct<packed ({})>", body)
                } else {
                    write!(f, "!llvm.struct<({})>", body)
                }
            }
            OpType::Array(elem, len) => write!(f, "!llvm.array<{} x {}>", len, elem),
            OpType::Vector(elem, len) => write!(f, "vector<{}x{}>", len, elem),
            OpType::Token => write!(f, "!llvm.token"),
            OpType::Label => write!(f, "!llvm.label"),
            OpType::Metadata => write!(f, "!llvm.metadata"),
        }
    }
}
