//! Converter configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};

/// How integer-valued derived tags are represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagRendering {
    /// Every tag is stored as its text rendering (`status_code` → `"200"`),
    /// which is what existing v2 consumers of converted envelopes read.
    #[default]
    Text,
    /// Integer fields keep an `Integer` tag value.
    Typed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub tag_rendering: TagRendering,
    /// Emit a warning when a log message type has no v2 counterpart.
    pub report_unmapped_log_types: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            tag_rendering: TagRendering::Text,
            report_unmapped_log_types: true,
        }
    }
}

impl ConverterConfig {
    pub fn from_json_str(raw: &str) -> ConvertResult<Self> {
        serde_json::from_str(raw).map_err(|error| ConvertError::Config(error.to_string()))
    }

    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), rendering = ?config.tag_rendering, "converter config loaded");
        Ok(config)
    }

    pub fn with_tag_rendering(mut self, rendering: TagRendering) -> Self {
        self.tag_rendering = rendering;
        self
    }
}
