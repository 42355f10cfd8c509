//! Per-event converters.
//!
//! Each converter receives the tags built so far and returns them, together
//! with the v2 message and any identity override, as a [`Converted`] value.
//! Converters only add tags; input tags were already copied by the caller.

use envelope_protocol::v1::{self, Event, MessageType};
use envelope_protocol::v2::{
    Counter, CounterValue, Gauge, GaugeValue, Log, LogType, Message, Timer,
};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::ConverterConfig;
use crate::identity::{IdentityOverride, non_empty};
use crate::keys;
use crate::tags::TagSet;
use crate::uuid_codec;

/// Timer name given to every converted HTTP start/stop event.
pub const HTTP_TIMER_NAME: &str = "http";

/// Legacy log message type → v2 log type, matched by symbolic name.
pub const LOG_TYPE_TABLE: &[(MessageType, LogType)] = &[
    (MessageType::Out, LogType::Out),
    (MessageType::Err, LogType::Err),
];

/// Output of one event converter.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub message: Option<Message>,
    pub tags: TagSet,
    pub identity: IdentityOverride,
}

impl Converted {
    fn new(message: Message, tags: TagSet) -> Self {
        Self {
            message: Some(message),
            tags,
            identity: IdentityOverride::none(),
        }
    }

    fn with_identity(mut self, identity: IdentityOverride) -> Self {
        self.identity = identity;
        self
    }
}

/// Dispatch to the converter for the event's kind.
pub fn convert_event(event: &Event, tags: TagSet, config: &ConverterConfig) -> Converted {
    match event {
        Event::LogMessage(log) => log_message(log, tags, config),
        Event::HttpStartStop(http) => http_start_stop(http, tags),
        Event::ValueMetric(metric) => value_metric(metric, tags),
        Event::CounterEvent(counter) => counter_event(counter, tags),
        Event::Error(error) => error_event(error, tags),
        Event::ContainerMetric(metric) => container_metric(metric, tags),
        Event::Unrecognized { code } => {
            debug!(code, "unrecognized event type, emitting header-only envelope");
            Converted {
                message: None,
                tags,
                identity: IdentityOverride::none(),
            }
        }
    }
}

pub fn map_log_type(message_type: MessageType) -> Option<LogType> {
    LOG_TYPE_TABLE
        .iter()
        .find(|(legacy, _)| *legacy == message_type)
        .map(|(_, mapped)| *mapped)
}

fn log_message(log: &v1::LogMessage, tags: TagSet, config: &ConverterConfig) -> Converted {
    let log_type = map_log_type(log.message_type).unwrap_or_else(|| {
        if config.report_unmapped_log_types {
            warn!(
                message_type = %log.message_type,
                "log message type has no v2 counterpart, falling back to OUT"
            );
        }
        LogType::default()
    });

    let tags = tags.text(keys::SOURCE_TYPE, &log.source_type);
    let message = Message::Log(Log {
        payload: log.message.clone(),
        log_type,
    });

    // The instance id is replaced even when the source instance is empty.
    Converted::new(message, tags).with_identity(IdentityOverride {
        source_id: non_empty(&log.app_id),
        instance_id: Some(log.source_instance.clone()),
    })
}

fn http_start_stop(http: &v1::HttpStartStop, tags: TagSet) -> Converted {
    let tags = tags
        .text(keys::REQUEST_ID, uuid_codec::encode_pair(&http.request_id))
        .text(keys::PEER_TYPE, http.peer_type.name())
        .text(keys::METHOD, http.method.name())
        .text(keys::URI, &http.uri)
        .text(keys::REMOTE_ADDRESS, &http.remote_address)
        .text(keys::USER_AGENT, &http.user_agent)
        .integer(keys::STATUS_CODE, i64::from(http.status_code))
        .integer(keys::CONTENT_LENGTH, http.content_length)
        .integer(keys::INSTANCE_INDEX, i64::from(http.instance_index))
        .text(keys::ROUTING_INSTANCE_ID, &http.instance_id)
        .text(keys::FORWARDED, http.forwarded.join("\n"));

    let message = Message::Timer(Timer {
        name: HTTP_TIMER_NAME.to_owned(),
        start: http.start_timestamp,
        stop: http.stop_timestamp,
    });

    Converted::new(message, tags).with_identity(IdentityOverride::source(
        uuid_codec::encode_present(&http.application_id),
    ))
}

fn value_metric(metric: &v1::ValueMetric, tags: TagSet) -> Converted {
    let mut metrics = IndexMap::with_capacity(1);
    metrics.insert(
        metric.name.clone(),
        GaugeValue::new(&metric.unit, metric.value),
    );
    Converted::new(Message::Gauge(Gauge { metrics }), tags)
}

fn counter_event(counter: &v1::CounterEvent, tags: TagSet) -> Converted {
    let message = Message::Counter(Counter {
        name: counter.name.clone(),
        value: CounterValue::Total(counter.total),
    });
    Converted::new(message, tags)
}

fn error_event(error: &v1::Error, tags: TagSet) -> Converted {
    let tags = tags
        .text(keys::SOURCE, &error.source)
        .text(keys::CODE, &error.code);
    let message = Message::Log(Log {
        payload: error.message.clone().into_bytes(),
        log_type: LogType::Out,
    });
    Converted::new(message, tags)
}

// u64 → f64 widening rounds above 2^53, as the v2 gauge schema allows.
#[allow(clippy::cast_precision_loss)]
fn container_metric(metric: &v1::ContainerMetric, tags: TagSet) -> Converted {
    let metrics: IndexMap<String, GaugeValue> = [
        (
            "instance_index",
            GaugeValue::new("index", f64::from(metric.instance_index)),
        ),
        ("cpu", GaugeValue::new("percentage", metric.cpu_percentage)),
        ("memory", GaugeValue::new("bytes", metric.memory_bytes as f64)),
        ("disk", GaugeValue::new("bytes", metric.disk_bytes as f64)),
        (
            "memory_quota",
            GaugeValue::new("bytes", metric.memory_bytes_quota as f64),
        ),
        (
            "disk_quota",
            GaugeValue::new("bytes", metric.disk_bytes_quota as f64),
        ),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value))
    .collect();

    Converted::new(Message::Gauge(Gauge { metrics }), tags).with_identity(
        IdentityOverride::source(non_empty(&metric.application_id)),
    )
}
