//! Resource limits.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Limits --------------------------------------------------------

/// Limits applied while encoding and decoding.
///
/// Data to be decoded is typically untrusted. Without limits, a crafted
/// chain of nested constructed values would recurse without bound and a
/// never-ending indefinite length value would be read until the source runs
/// dry. The limits turn both into errors.
///
/// The encoder applies the depth and tag number limits, too, so that
/// whatever it produces can be read back with the same limits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// The maximum number of constructed values enclosing each other.
    pub max_depth: usize,

    /// The maximum number of octets within a single indefinite value.
    pub max_scan: usize,

    /// The largest tag number accepted.
    pub max_tag_number: u32,
}

impl Limits {
    /// The default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// The default maximum size of an indefinite length value.
    pub const DEFAULT_MAX_SCAN: usize = 16 * 1024 * 1024;

    /// Returns the limits with a different maximum depth.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Limits { max_depth, ..self }
    }

    /// Returns the limits with a different indefinite length scan budget.
    pub fn with_max_scan(self, max_scan: usize) -> Self {
        Limits { max_scan, ..self }
    }

    /// Returns the limits with a different largest tag number.
    pub fn with_max_tag_number(self, max_tag_number: u32) -> Self {
        Limits { max_tag_number, ..self }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_scan: Self::DEFAULT_MAX_SCAN,
            max_tag_number: u32::MAX,
        }
    }
}


//============ Tests =========================================================
