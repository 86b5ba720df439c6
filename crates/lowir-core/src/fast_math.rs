use serde::{Deserialize, Serialize};
use std::fmt;

/// Fast-math flags attached to floating-point instructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FastMathFlags {
    pub no_nans: bool,
    pub no_infs: bool,
    pub no_signed_zeros: bool,
    pub allow_reciprocal: bool,
    pub allow_contract: bool,
    pub approx_func: bool,
    pub allow_reassoc: bool,
}

impl FastMathFlags {
    pub fn fast() -> Self {
        Self {
            no_nans: true,
            no_infs: true,
            no_signed_zeros: true,
            allow_reciprocal: true,
            allow_contract: true,
            approx_func: true,
            allow_reassoc: true,
        }
    }

    pub fn set_no_nans(&mut self, value: bool) {
        self.no_nans = value;
    }

    pub fn set_no_infs(&mut self, value: bool) {
        self.no_infs = value;
    }

    pub fn set_no_signed_zeros(&mut self, value: bool) {
        self.no_signed_zeros = value;
    }

    pub fn set_allow_reciprocal(&mut self, value: bool) {
        self.allow_reciprocal = value;
    }

    pub fn set_allow_contract(&mut self, value: bool) {
        self.allow_contract = value;
    }

    pub fn set_approx_func(&mut self, value: bool) {
        self.approx_func = value;
    }

    pub fn set_allow_reassoc(&mut self, value: bool) {
        self.allow_reassoc = value;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn is_fast(&self) -> bool {
        *self == Self::fast()
    }

    /// Number of flags set.
    pub fn count(&self) -> usize {
        [
            self.no_nans,
            self.no_infs,
            self.no_signed_zeros,
            self.allow_reciprocal,
            self.allow_contract,
            self.approx_func,
            self.allow_reassoc,
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

impl fmt::Display for FastMathFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fast() {
            return write!(f, "fast");
        }
        let names = [
            (self.allow_reassoc, "reassoc"),
            (self.no_nans, "nnan"),
            (self.no_infs, "ninf"),
            (self.no_signed_zeros, "nsz"),
            (self.allow_reciprocal, "arcp"),
            (self.allow_contract, "contract"),
            (self.approx_func, "afn"),
        ];
        let set = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();
        write!(f, "{}", set.join(" "))
    }
}
