use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Unmapped value: {0}")]
    UnmappedValue(String),

    #[error("Unmapped block: {0}")]
    UnmappedBlock(String),

    #[error("Symbol not found: {0}")]
    UnknownSymbol(String),

    #[error("couldn't find intrinsic: {0}")]
    UnknownIntrinsic(String),

    #[error("intrinsic type is not a match: {0}")]
    IntrinsicTypeMismatch(String),

    #[error("Variadic intrinsics are not supported: {0}")]
    VariadicIntrinsic(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Call to {callee} has no result but returns {ty}")]
    NonVoidResult { callee: String, ty: String },

    #[error("Malformed operation: {0}")]
    MalformedOperation(String),

    #[error("Malformed attribute {key}: {reason}")]
    MalformedAttribute { key: String, reason: String },

    #[error("Type conversion failed: {0}")]
    TypeConversion(String),

    #[error("Invalid source module: {0}")]
    InvalidSource(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("IR builder error: {0}")]
    BuilderError(String),

    #[error("Failed to lower {op}: {source}")]
    Operation {
        op: String,
        #[source]
        source: Box<TranslateError>,
    },
}

impl TranslateError {
    /// Wraps the error with the name of the operation being lowered.
    pub fn in_operation(self, op: impl Into<String>) -> Self {
        TranslateError::Operation {
            op: op.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping operation context.
    pub fn root(&self) -> &TranslateError {
        match self {
            TranslateError::Operation { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<lowir_core::IrError> for TranslateError {
    fn from(err: lowir_core::IrError) -> Self {
        TranslateError::BuilderError(err.to_string())
    }
}

impl From<lowir_ops::OpsError> for TranslateError {
    fn from(err: lowir_ops::OpsError) -> Self {
        TranslateError::InvalidSource(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
