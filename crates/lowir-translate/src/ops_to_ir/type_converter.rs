use super::errors::{Result, TranslateError};
use lowir_core::{FunctionType, Type};
use lowir_ops::OpType;

/// Converts source types into target types.
pub trait TypeConverter {
    fn convert_type(&self, ty: &OpType) -> Result<Type>;

    fn convert_function_type(&self, ty: &OpType) -> Result<FunctionType> {
        match self.convert_type(ty)? {
            Type::Function(ft) => Ok(*ft),
            other => Err(TranslateError::TypeConversion(format!(
                "{} is not a function type",
                other
            ))),
        }
    }
}

/// Structural conversion. Opaque pointers become `i8*` in the same address space.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeConverter;

impl TypeConverter for DefaultTypeConverter {
    fn convert_type(&self, ty: &OpType) -> Result<Type> {
        Ok(match ty {
            OpType::Void => Type::Void,
            OpType::Integer(0) => {
                return Err(TranslateError::TypeConversion(
                    "zero-width integer".to_string(),
                ))
            }
            OpType::Integer(bits) => Type::Int(*bits),
            OpType::F16 => Type::Half,
            OpType::F32 => Type::Float,
            OpType::F64 => Type::Double,
            OpType::Ptr { elem, addr_space } => Type::Pointer {
                pointee: Box::new(match elem {
                    Some(elem) => self.convert_type(elem)?,
                    None => Type::i8(),
                }),
                addr_space: *addr_space,
            },
            OpType::Func {
                ret,
                params,
                variadic,
            } => Type::function(FunctionType {
                ret: self.convert_type(ret)?,
                params: params
                    .iter()
                    .map(|p| self.convert_type(p))
                    .collect::<Result<Vec<_>>>()?,
                variadic: *variadic,
            }),
            OpType::Struct { fields, packed } => Type::Struct {
                fields: fields
                    .iter()
                    .map(|f| self.convert_type(f))
                    .collect::<Result<Vec<_>>>()?,
                packed: *packed,
            },
            OpType::Array(elem, len) => Type::Array(Box::new(self.convert_type(elem)?), *len),
            OpType::Vector(elem, len) => Type::Vector(Box::new(self.convert_type(elem)?), *len),
            OpType::Token => Type::Token,
            OpType::Label => Type::Label,
            OpType::Metadata => Type::Metadata,
        })
    }
}
