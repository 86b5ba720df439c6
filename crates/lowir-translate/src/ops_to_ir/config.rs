use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Reject landing-pad operands that are not compile-time constants instead of skipping them.
    pub strict_landing_pad_clauses: bool,
    pub module_name: String,
    pub attach_loop_metadata: bool,
    pub attach_branch_weights: bool,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            strict_landing_pad_clauses: false,
            module_name: "lowir".to_string(),
            attach_loop_metadata: true,
            attach_branch_weights: true,
        }
    }
}

impl TranslateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_landing_pad_clauses(mut self, strict: bool) -> Self {
        self.strict_landing_pad_clauses = strict;
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_loop_metadata(mut self, attach: bool) -> Self {
        self.attach_loop_metadata = attach;
        self
    }

    pub fn with_branch_weights(mut self, attach: bool) -> Self {
        self.attach_branch_weights = attach;
        self
    }
}
