//! # envelope-conversion — v1 to v2 envelope conversion
//!
//! A pure, total conversion from legacy telemetry envelopes into the v2
//! schema consumed by routing and storage. Every input yields exactly one
//! output; nothing is validated or rejected, and no state is shared between
//! calls.
//!
//! ## Module Overview
//!
//! - [`uuid_codec`] — `(low, high)` pair → hyphenated hex string
//! - [`tags`] — `TagSet`, the by-value tag builder
//! - [`identity`] — `source_id`/`instance_id` fallback chains
//! - [`variants`] — one converter per legacy event kind
//! - [`converter`] — `Converter`, which sequences the above
//! - [`config`] — `ConverterConfig`, `TagRendering`
//! - [`keys`] — reserved tag keys
//! - [`error`] — `ConvertError`, `ConvertResult`

pub mod config;
pub mod converter;
pub mod error;
pub mod identity;
pub mod keys;
pub mod tags;
pub mod uuid_codec;
pub mod variants;

pub use config::{ConverterConfig, TagRendering};
pub use converter::Converter;
pub use error::{ConvertError, ConvertResult};
pub use identity::{Identity, IdentityOverride};
pub use tags::TagSet;

use envelope_protocol::{v1, v2};

/// Convert with the default configuration.
pub fn to_v2(envelope: &v1::Envelope) -> v2::Envelope {
    Converter::default().convert(envelope)
}
