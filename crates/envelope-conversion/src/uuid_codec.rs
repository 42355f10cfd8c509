//! UUID pair codec.
//!
//! v1 carries 128-bit ids as two little-endian `u64` halves. Laid end to end
//! (`low` bytes then `high` bytes) they form the 16 bytes whose standard
//! 8-4-4-4-12 hex grouping is the display form downstream consumers expect:
//! `low[0..4]-low[4..6]-low[6..8]-high[0..2]-high[2..8]`.

use envelope_protocol::UuidPair;
use uuid::Uuid;

/// Render a `(low, high)` pair as a lowercase hyphenated hex string.
///
/// Does not special-case the absent sentinel: `encode(0, 0)` is the nil
/// string. Callers that treat zero as "unset" use [`encode_present`].
pub fn encode(low: u64, high: u64) -> String {
    let mut bytes = [0_u8; 16];
    bytes[..8].copy_from_slice(&low.to_le_bytes());
    bytes[8..].copy_from_slice(&high.to_le_bytes());
    Uuid::from_bytes(bytes).hyphenated().to_string()
}

pub fn encode_pair(pair: &UuidPair) -> String {
    encode(pair.low, pair.high)
}

/// The encoded id, or `None` for the absent sentinel.
pub fn encode_present(pair: &UuidPair) -> Option<String> {
    (!pair.is_absent()).then(|| encode_pair(pair))
}
