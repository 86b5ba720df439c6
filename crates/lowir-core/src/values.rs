use crate::entities::{FuncId, GlobalId, Inst};
use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operand of a target instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Inst(Inst),
    Argument { func: FuncId, index: u32 },
    Constant(Constant),
    /// Address of a global variable.
    Global(GlobalId),
    /// Address of a function.
    Function(FuncId),
}

impl Value {
    /// Constants and the addresses of globals and functions are link-time constants.
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Value::Constant(_) | Value::Global(_) | Value::Function(_)
        )
    }

    pub fn as_inst(&self) -> Option<Inst> {
        match self {
            Value::Inst(inst) => Some(*inst),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Constant> for Value {
    fn from(c: Constant) -> Self {
        Value::Constant(c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    /// Integer of `bits` width; `value` holds the low `bits` bits.
    Int { bits: u32, value: u64 },
    /// Floating-point constant stored as the bit pattern of an `f64`.
    Float { ty: Type, bits: u64 },
    Null(Type),
    Undef(Type),
    ZeroInitializer(Type),
}

impl Constant {
    pub fn int(bits: u32, value: i64) -> Self {
        let value = value as u64;
        let value = if bits >= 64 {
            value
        } else {
            value & ((1u64 << bits) - 1)
        };
        Constant::Int { bits, value }
    }

    pub fn bool(value: bool) -> Self {
        Constant::int(1, value as i64)
    }

    pub fn float(ty: Type, value: f64) -> Self {
        Constant::Float {
            ty,
            bits: value.to_bits(),
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Constant::Int { bits, .. } => Type::Int(*bits),
            Constant::Float { ty, .. }
            | Constant::Null(ty)
            | Constant::Undef(ty)
            | Constant::ZeroInitializer(ty) => ty.clone(),
        }
    }

    /// Sign-extended integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Constant::Int { bits, value } if *bits == 0 || *bits >= 64 => Some(*value as i64),
            Constant::Int { bits, value } => {
                let shift = 64 - bits;
                Some(((*value << shift) as i64) >> shift)
            }
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Constant::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::Float { bits, .. } => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int { bits: 1, value } => {
                write!(f, "{}", if *value != 0 { "true" } else { "false" })
            }
            Constant::Int { .. } => write!(f, "{}", self.as_i64().unwrap_or_default()),
            Constant::Float { bits, .. } => write!(f, "{:?}", f64::from_bits(*bits)),
            Constant::Null(_) => write!(f, "null"),
            Constant::Undef(_) => write!(f, "undef"),
            Constant::ZeroInitializer(_) => write!(f, "zeroinitializer"),
        }
    }
}
