use crate::types::FunctionType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsmDialect {
    #[default]
    Att,
    Intel,
}

/// An inline assembly callee. It has no symbol; it is only ever called.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineAsm {
    pub fn_ty: FunctionType,
    pub asm: String,
    pub constraints: String,
    pub side_effects: bool,
    pub align_stack: bool,
    pub dialect: AsmDialect,
}

impl InlineAsm {
    pub fn new(
        fn_ty: FunctionType,
        asm: impl Into<String>,
        constraints: impl Into<String>,
    ) -> Self {
        Self {
            fn_ty,
            asm: asm.into(),
            constraints: constraints.into(),
            side_effects: false,
            align_stack: false,
            dialect: AsmDialect::default(),
        }
    }

    pub fn with_side_effects(mut self, side_effects: bool) -> Self {
        self.side_effects = side_effects;
        self
    }

    pub fn with_align_stack(mut self, align_stack: bool) -> Self {
        self.align_stack = align_stack;
        self
    }

    pub fn with_dialect(mut self, dialect: AsmDialect) -> Self {
        self.dialect = dialect;
        self
    }
}
