//! Identifier types carried by legacy envelopes.

use serde::{Deserialize, Serialize};

/// A 128-bit identifier split into two 64-bit halves, as the v1 schema
/// transports application and request ids.
///
/// The all-zero pair is the "absent" sentinel: v1 producers leave the field
/// unset rather than sending a real nil UUID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct UuidPair {
    pub low: u64,
    pub high: u64,
}

impl UuidPair {
    pub fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    /// The unset sentinel (`low == 0 && high == 0`).
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.low == 0 && self.high == 0
    }
}
