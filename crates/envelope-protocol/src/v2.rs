//! v2 envelope schema.
//!
//! Identity is promoted out of the tag bag into `source_id`/`instance_id`,
//! tags carry typed values, and the payload is one of four message kinds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Generic envelope tags. Insertion order is kept; equality ignores it.
pub type Tags = IndexMap<String, TagValue>;

/// One normalized telemetry record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Nanoseconds since UNIX epoch.
    pub timestamp: i64,
    pub source_id: String,
    pub instance_id: String,
    #[serde(default)]
    pub tags: Tags,
    /// `None` only when the source event kind had no v2 counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl Envelope {
    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// The tag's value if it is stored as text.
    pub fn text_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).and_then(TagValue::as_text)
    }
}

/// A typed tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

// ─── Messages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    Log(Log),
    Counter(Counter),
    Gauge(Gauge),
    Timer(Timer),
}

impl Message {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Log(_) => "log",
            Self::Counter(_) => "counter",
            Self::Gauge(_) => "gauge",
            Self::Timer(_) => "timer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub payload: Vec<u8>,
    #[serde(rename = "type", default)]
    pub log_type: LogType,
}

/// Log stream. `Out` is the zero value of the wire enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    #[default]
    Out,
    Err,
}

impl LogType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Out => "OUT",
            Self::Err => "ERR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub name: String,
    pub value: CounterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterValue {
    Delta(u64),
    Total(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub metrics: IndexMap<String, GaugeValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaugeValue {
    pub unit: String,
    pub value: f64,
}

impl GaugeValue {
    pub fn new(unit: impl Into<String>, value: f64) -> Self {
        Self {
            unit: unit.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub name: String,
    pub start: i64,
    pub stop: i64,
}
