//! Source identity resolution.
//!
//! The envelope-level default comes from the legacy tags (falling back to
//! `deployment/job` for the source). Event converters may then override
//! either id; the last write wins.

use envelope_protocol::v1;

use crate::keys;
use crate::tags::TagSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub source_id: String,
    pub instance_id: String,
}

/// Replacement ids produced by an event converter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOverride {
    pub source_id: Option<String>,
    pub instance_id: Option<String>,
}

impl IdentityOverride {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn source(source_id: Option<String>) -> Self {
        Self {
            source_id,
            instance_id: None,
        }
    }
}

impl Identity {
    /// Envelope-level defaults, before any event-specific override.
    ///
    /// A present `source_id` tag wins even when empty.
    pub fn resolve(envelope: &v1::Envelope) -> Self {
        let source_id = envelope
            .tags
            .get(keys::SOURCE_ID)
            .cloned()
            .unwrap_or_else(|| format!("{}/{}", envelope.deployment, envelope.job));
        let instance_id = envelope
            .tags
            .get(keys::INSTANCE_ID)
            .cloned()
            .unwrap_or_default();
        Self {
            source_id,
            instance_id,
        }
    }

    pub fn apply(self, overrides: IdentityOverride) -> Self {
        Self {
            source_id: overrides.source_id.unwrap_or(self.source_id),
            instance_id: overrides.instance_id.unwrap_or(self.instance_id),
        }
    }
}

/// Drop the promoted identity keys from the generic tags, whether or not
/// they fed the resolved identity.
pub fn strip_identity_tags(tags: TagSet) -> TagSet {
    tags.unset(keys::SOURCE_ID).unset(keys::INSTANCE_ID)
}

/// `candidate` when non-empty.
pub fn non_empty(candidate: &str) -> Option<String> {
    (!candidate.is_empty()).then(|| candidate.to_owned())
}
