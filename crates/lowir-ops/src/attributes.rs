use crate::entities::AttrId;
use crate::enums::{FastmathFlags, LoopOptionCase};
use crate::types::OpType;
use indexmap::IndexMap;

/// Attribute payloads. Composite attributes refer to their elements by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Unit,
    Bool(bool),
    Integer { value: i64, width: u32 },
    Float(f64),
    String(String),
    /// Reference to a symbol by flat name.
    SymbolRef(String),
    Type(OpType),
    Array(Vec<AttrId>),
    Dictionary(IndexMap<String, AttrId>),
    DenseInts(Vec<i64>),
    Fastmath(FastmathFlags),
    LoopOptions(Vec<(LoopOptionCase, i64)>),
}

impl Attribute {
    pub fn int(value: i64, width: u32) -> Self {
        Attribute::Integer { value, width }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Attribute::Unit => "unit",
            Attribute::Bool(_) => "bool",
            Attribute::Integer { .. } => "integer",
            Attribute::Float(_) => "float",
            Attribute::String(_) => "string",
            Attribute::SymbolRef(_) => "symbol reference",
            Attribute::Type(_) => "type",
            Attribute::Array(_) => "array",
            Attribute::Dictionary(_) => "dictionary",
            Attribute::DenseInts(_) => "dense integer array",
            Attribute::Fastmath(_) => "fastmath",
            Attribute::LoopOptions(_) => "loop options",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Attribute::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Bools and `i1` integers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Attribute::Bool(b) => Some(*b),
            Attribute::Integer { value, width: 1 } => Some(*value != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attribute::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Attribute::SymbolRef(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&OpType> {
        match self {
            Attribute::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AttrId]> {
        match self {
            Attribute::Array(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, AttrId>> {
        match self {
            Attribute::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_dense_ints(&self) -> Option<&[i64]> {
        match self {
            Attribute::DenseInts(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_loop_options(&self) -> Option<&[(LoopOptionCase, i64)]> {
        match self {
            Attribute::LoopOptions(options) => Some(options),
            _ => None,
        }
    }
}
