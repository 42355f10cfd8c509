//! Legacy (v1) envelope schema.
//!
//! Mirrors the fixed wire contract emitted by v1 agents: a header of plain
//! strings, a free-form `tags` map and exactly one event payload selected by
//! the `eventType` discriminator.
//!
//! Forward-compatible: a discriminator outside the six known kinds
//! deserializes into `Event::Unrecognized { code }` instead of failing. An
//! absent discriminator is `HttpStartStop`, the first wire value.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::UuidPair;

/// Declares a closed wire enumeration that keeps out-of-range codes.
///
/// Values serialize as their integer wire code. `name()` yields the schema's
/// symbolic name, or the decimal code for `Unknown`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "i32", into = "i32")]
        pub enum $name {
            $($variant,)+
            /// A wire code outside the known set, preserved as received.
            Unknown(i32),
        }

        impl $name {
            /// Every known value, in wire-code order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown(code) => code,
                }
            }

            pub fn name(self) -> Cow<'static, str> {
                match self {
                    $(Self::$variant => Cow::Borrowed($label),)+
                    Self::Unknown(code) => Cow::Owned(code.to_string()),
                }
            }

            /// Look up a known value by its symbolic name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<i32> for $name {
            fn from(code: i32) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Unknown(other),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.name())
            }
        }
    };
}

wire_enum!(
    /// The envelope discriminator.
    EventType {
        HttpStartStop = 4 => "HttpStartStop",
        LogMessage = 5 => "LogMessage",
        ValueMetric = 6 => "ValueMetric",
        CounterEvent = 7 => "CounterEvent",
        Error = 8 => "Error",
        ContainerMetric = 9 => "ContainerMetric",
    }
);

wire_enum!(
    /// Which stream a log line was written to.
    MessageType {
        Out = 1 => "OUT",
        Err = 2 => "ERR",
    }
);

wire_enum!(
    /// Which side of an HTTP exchange emitted the event.
    PeerType {
        Client = 1 => "Client",
        Server = 2 => "Server",
    }
);

wire_enum!(
    /// HTTP request method.
    Method {
        Get = 1 => "GET",
        Post = 2 => "POST",
        Put = 3 => "PUT",
        Delete = 4 => "DELETE",
        Head = 5 => "HEAD",
        Acl = 6 => "ACL",
        BaselineControl = 7 => "BASELINE_CONTROL",
        Bind = 8 => "BIND",
        Checkin = 9 => "CHECKIN",
        Checkout = 10 => "CHECKOUT",
        Connect = 11 => "CONNECT",
        Copy = 12 => "COPY",
        Debug = 13 => "DEBUG",
        Label = 14 => "LABEL",
        Link = 15 => "LINK",
        Lock = 16 => "LOCK",
        Merge = 17 => "MERGE",
        MkActivity = 18 => "MKACTIVITY",
        MkCalendar = 19 => "MKCALENDAR",
        MkCol = 20 => "MKCOL",
        MkRedirectRef = 21 => "MKREDIRECTREF",
        MkWorkspace = 22 => "MKWORKSPACE",
        Move = 23 => "MOVE",
        Options = 24 => "OPTIONS",
        OrderPatch = 25 => "ORDERPATCH",
        Patch = 26 => "PATCH",
        Pri = 27 => "PRI",
        PropFind = 28 => "PROPFIND",
        PropPatch = 29 => "PROPPATCH",
        Rebind = 30 => "REBIND",
        Report = 31 => "REPORT",
        Search = 32 => "SEARCH",
        ShowMethod = 33 => "SHOWMETHOD",
        SpaceJump = 34 => "SPACEJUMP",
        TextSearch = 35 => "TEXTSEARCH",
        Trace = 36 => "TRACE",
        Track = 37 => "TRACK",
        Unbind = 38 => "UNBIND",
        Uncheckout = 39 => "UNCHECKOUT",
        Unlink = 40 => "UNLINK",
        Unlock = 41 => "UNLOCK",
        Update = 42 => "UPDATE",
        UpdateRedirectRef = 43 => "UPDATEREDIRECTREF",
        VersionControl = 44 => "VERSION_CONTROL",
    }
);

// Unset enum fields read back as the first declared value.
impl Default for MessageType {
    fn default() -> Self {
        Self::Out
    }
}

impl Default for PeerType {
    fn default() -> Self {
        Self::Client
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::Get
    }
}

/// One legacy telemetry record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Envelope {
    pub origin: String,
    /// Nanoseconds since UNIX epoch.
    pub timestamp: i64,
    pub deployment: String,
    pub job: String,
    pub index: String,
    pub ip: String,
    pub tags: BTreeMap<String, String>,
    pub event: Event,
}

impl Envelope {
    pub fn event_type(&self) -> EventType {
        self.event.event_type()
    }
}

// ─── Event payloads ────────────────────────────────────────────────

/// Discriminated union of the legacy event kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "eventType", content = "payload")]
pub enum Event {
    HttpStartStop(HttpStartStop),
    LogMessage(LogMessage),
    ValueMetric(ValueMetric),
    CounterEvent(CounterEvent),
    Error(Error),
    ContainerMetric(ContainerMetric),
    /// A discriminator this schema version does not know. Decoding never
    /// produces one with a known code.
    Unrecognized { code: i32 },
}

// An unset discriminator reads as the schema's first value.
impl Default for Event {
    fn default() -> Self {
        Self::empty(EventType::HttpStartStop)
    }
}

impl Event {
    /// An event of the given kind with an all-default payload.
    pub fn empty(event_type: EventType) -> Self {
        match event_type {
            EventType::HttpStartStop => Self::HttpStartStop(HttpStartStop::default()),
            EventType::LogMessage => Self::LogMessage(LogMessage::default()),
            EventType::ValueMetric => Self::ValueMetric(ValueMetric::default()),
            EventType::CounterEvent => Self::CounterEvent(CounterEvent::default()),
            EventType::Error => Self::Error(Error::default()),
            EventType::ContainerMetric => Self::ContainerMetric(ContainerMetric::default()),
            EventType::Unknown(code) => Self::Unrecognized { code },
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Self::HttpStartStop(_) => EventType::HttpStartStop,
            Self::LogMessage(_) => EventType::LogMessage,
            Self::ValueMetric(_) => EventType::ValueMetric,
            Self::CounterEvent(_) => EventType::CounterEvent,
            Self::Error(_) => EventType::Error,
            Self::ContainerMetric(_) => EventType::ContainerMetric,
            Self::Unrecognized { code } => EventType::Unknown(*code),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogMessage {
    pub message: Vec<u8>,
    pub message_type: MessageType,
    pub timestamp: i64,
    pub app_id: String,
    pub source_type: String,
    pub source_instance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpStartStop {
    pub start_timestamp: i64,
    pub stop_timestamp: i64,
    pub request_id: UuidPair,
    pub peer_type: PeerType,
    pub method: Method,
    pub uri: String,
    pub remote_address: String,
    pub user_agent: String,
    pub status_code: i32,
    pub content_length: i64,
    pub application_id: UuidPair,
    pub instance_index: i32,
    pub instance_id: String,
    pub forwarded: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValueMetric {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterEvent {
    pub name: String,
    pub delta: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Error {
    pub source: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerMetric {
    pub application_id: String,
    pub instance_index: i32,
    pub cpu_percentage: f64,
    pub memory_bytes: u64,
    pub disk_bytes: u64,
    pub memory_bytes_quota: u64,
    pub disk_bytes_quota: u64,
}

// ─── Forward-compatible deserializer ───────────────────────────────

/// Internal helper enum for the forward-compatible deserializer.
/// Mirrors `Event` exactly but derives Deserialize.
#[derive(Deserialize)]
#[serde(tag = "eventType", content = "payload")]
enum EventKnown {
    HttpStartStop(HttpStartStop),
    LogMessage(LogMessage),
    ValueMetric(ValueMetric),
    CounterEvent(CounterEvent),
    Error(Error),
    ContainerMetric(ContainerMetric),
    Unrecognized {
        #[serde(default)]
        code: i32,
    },
}

impl From<EventKnown> for Event {
    fn from(known: EventKnown) -> Self {
        match known {
            EventKnown::HttpStartStop(e) => Self::HttpStartStop(e),
            EventKnown::LogMessage(e) => Self::LogMessage(e),
            EventKnown::ValueMetric(e) => Self::ValueMetric(e),
            EventKnown::CounterEvent(e) => Self::CounterEvent(e),
            EventKnown::Error(e) => Self::Error(e),
            EventKnown::ContainerMetric(e) => Self::ContainerMetric(e),
            EventKnown::Unrecognized { code } => Self::Unrecognized { code },
        }
    }
}

const UNRECOGNIZED: &str = "Unrecognized";

/// Accepts the discriminator as a symbolic name or an integer wire code.
/// Codes outside the known set become `Unrecognized`; a missing
/// discriminator reads as `HttpStartStop`. A missing or null payload reads
/// as an all-default one, and an `Unrecognized` carrying a known code
/// decodes as that kind.
impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = Value::deserialize(deserializer)?;
        let Some(object) = raw.as_object_mut() else {
            return Err(de::Error::custom("event must be a JSON object"));
        };

        let event_type = match object.get("eventType") {
            Some(Value::String(name)) if name == UNRECOGNIZED => None,
            Some(Value::String(name)) => Some(
                EventType::from_name(name)
                    .unwrap_or_else(|| EventType::from(name.parse::<i32>().unwrap_or_default())),
            ),
            Some(Value::Number(code)) => Some(EventType::from(
                code.as_i64()
                    .and_then(|c| i32::try_from(c).ok())
                    .unwrap_or_default(),
            )),
            None | Some(Value::Null) => Some(EventType::HttpStartStop),
            Some(_) => Some(EventType::Unknown(0)),
        };

        match event_type {
            Some(EventType::Unknown(code)) => return Ok(Self::Unrecognized { code }),
            Some(known) => {
                object.insert(
                    "eventType".to_owned(),
                    Value::String(known.name().into_owned()),
                );
            }
            None => {}
        }
        if matches!(object.get("payload"), None | Some(Value::Null)) {
            object.insert("payload".to_owned(), Value::Object(Default::default()));
        }

        let event: Self = serde_json::from_value::<EventKnown>(raw)
            .map(Into::into)
            .map_err(de::Error::custom)?;
        Ok(match event {
            Self::Unrecognized { code } => Self::empty(EventType::from(code)),
            known => known,
        })
    }
}
