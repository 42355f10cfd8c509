//! # envelope-protocol — telemetry envelope contracts
//!
//! This crate models the two envelope schemas that meet at the conversion
//! boundary of the observability pipeline:
//!
//! - the legacy **v1** schema: header strings, free-form string tags and a
//!   discriminated event payload,
//! - the **v2** schema: promoted `source_id`/`instance_id`, typed tags and a
//!   four-way message union.
//!
//! It is a pure contract crate with no runtime dependencies, so transports,
//! agents and the conversion engine can all share it.
//!
//! ## Module Overview
//!
//! - [`ids`] — `UuidPair`, the two-integer UUID form used by v1
//! - [`v1`] — legacy `Envelope`, `Event` (six kinds + `Unrecognized`) and wire enums
//! - [`v2`] — `Envelope`, `Message`, `TagValue` and the message payloads

pub mod ids;
pub mod v1;
pub mod v2;

pub use ids::UuidPair;
