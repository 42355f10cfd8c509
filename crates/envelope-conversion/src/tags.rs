//! Tag normalization.
//!
//! `TagSet` is a by-value builder: every setter consumes the set and returns
//! the updated one, so each conversion step hands its result to the next and
//! nothing else can observe a half-built map. Insertion order is preserved,
//! which keeps the construction order visible in the output.

use std::collections::BTreeMap;

use envelope_protocol::v2::{TagValue, Tags};

use crate::config::TagRendering;

#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct TagSet {
    rendering: TagRendering,
    tags: Tags,
}

impl TagSet {
    /// An empty, freshly allocated set.
    pub fn new(rendering: TagRendering) -> Self {
        Self {
            rendering,
            tags: Tags::new(),
        }
    }

    /// Copy every legacy tag in as text.
    pub fn from_legacy(input: &BTreeMap<String, String>, rendering: TagRendering) -> Self {
        input
            .iter()
            .fold(Self::new(rendering), |tags, (key, value)| {
                tags.text(key, value)
            })
    }

    /// Store `value` under `key`, replacing any previous value in place.
    pub fn set(mut self, key: impl Into<String>, value: TagValue) -> Self {
        self.tags.insert(key.into(), value);
        self
    }

    pub fn text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, TagValue::Text(value.into()))
    }

    pub fn integer(self, key: impl Into<String>, value: i64) -> Self {
        let value = match self.rendering {
            TagRendering::Text => TagValue::Text(value.to_string()),
            TagRendering::Typed => TagValue::Integer(value),
        };
        self.set(key, value)
    }

    pub fn decimal(self, key: impl Into<String>, value: f64) -> Self {
        let value = match self.rendering {
            TagRendering::Text => TagValue::Text(value.to_string()),
            TagRendering::Typed => TagValue::Decimal(value),
        };
        self.set(key, value)
    }

    /// Remove `key`; no-op if it is not set.
    pub fn unset(mut self, key: &str) -> Self {
        self.tags.shift_remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn into_tags(self) -> Tags {
        self.tags
    }
}
