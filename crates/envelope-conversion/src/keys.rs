//! Reserved tag keys written or consumed by the converter.

/// Input tag promoted to `Envelope::source_id`. Never kept as a tag.
pub const SOURCE_ID: &str = "source_id";
/// Input tag promoted to `Envelope::instance_id`. Never kept as a tag.
pub const INSTANCE_ID: &str = "instance_id";

// Header fields, set for every event kind.
pub const ORIGIN: &str = "origin";
pub const DEPLOYMENT: &str = "deployment";
pub const JOB: &str = "job";
pub const INDEX: &str = "index";
pub const IP: &str = "ip";
/// Name of the legacy discriminator the envelope was converted from.
pub const V1_TYPE: &str = "__v1_type";

// LogMessage
pub const SOURCE_TYPE: &str = "source_type";

// HttpStartStop
pub const REQUEST_ID: &str = "request_id";
pub const PEER_TYPE: &str = "peer_type";
pub const METHOD: &str = "method";
pub const URI: &str = "uri";
pub const REMOTE_ADDRESS: &str = "remote_address";
pub const USER_AGENT: &str = "user_agent";
pub const STATUS_CODE: &str = "status_code";
pub const CONTENT_LENGTH: &str = "content_length";
pub const INSTANCE_INDEX: &str = "instance_index";
pub const ROUTING_INSTANCE_ID: &str = "routing_instance_id";
pub const FORWARDED: &str = "forwarded";

// Error
pub const SOURCE: &str = "source";
pub const CODE: &str = "code";
