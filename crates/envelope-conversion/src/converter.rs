//! Conversion orchestration.

use envelope_protocol::{v1, v2};
use tracing::trace;

use crate::config::ConverterConfig;
use crate::identity::{self, Identity};
use crate::keys;
use crate::tags::TagSet;
use crate::variants;

/// Converts v1 envelopes to v2.
///
/// Holds only immutable configuration, so one instance can be shared across
/// threads and tasks. Every call builds a self-contained output.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert one envelope. Total: every input yields an envelope.
    ///
    /// Steps, in order:
    /// 1. copy the legacy tags as text,
    /// 2. set the header tags (`origin`, `deployment`, `job`, `index`, `ip`,
    ///    `__v1_type`), overwriting same-named input tags,
    /// 3. resolve the default identity and drop `source_id`/`instance_id`
    ///    from the tags,
    /// 4. run the event converter, which adds tags, builds the message and
    ///    may override the identity.
    pub fn convert(&self, envelope: &v1::Envelope) -> v2::Envelope {
        let event_type = envelope.event_type();

        let tags = TagSet::from_legacy(&envelope.tags, self.config.tag_rendering)
            .text(keys::ORIGIN, &envelope.origin)
            .text(keys::DEPLOYMENT, &envelope.deployment)
            .text(keys::JOB, &envelope.job)
            .text(keys::INDEX, &envelope.index)
            .text(keys::IP, &envelope.ip)
            .text(keys::V1_TYPE, event_type.name());

        let defaults = Identity::resolve(envelope);
        let tags = identity::strip_identity_tags(tags);

        let converted = variants::convert_event(&envelope.event, tags, &self.config);
        let resolved = defaults.apply(converted.identity);

        trace!(
            event_type = %event_type,
            source_id = %resolved.source_id,
            message = converted.message.as_ref().map(v2::Message::kind),
            tags = converted.tags.len(),
            "envelope converted"
        );

        v2::Envelope {
            timestamp: envelope.timestamp,
            source_id: resolved.source_id,
            instance_id: resolved.instance_id,
            tags: converted.tags.into_tags(),
            message: converted.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TagRendering;
    use envelope_protocol::UuidPair;
    use envelope_protocol::v1::{Event, LogMessage, MessageType};
    use envelope_protocol::v2::{Log, LogType, Message, TagValue};
    use std::collections::BTreeMap;

    fn header(event: Event) -> v1::Envelope {
        v1::Envelope {
            origin: "o".into(),
            timestamp: 1_700_000_000_000_000_000,
            deployment: "d".into(),
            job: "j".into(),
            index: "0".into(),
            ip: "10.0.0.1".into(),
            tags: BTreeMap::new(),
            event,
        }
    }

    fn with_tags(mut envelope: v1::Envelope, tags: &[(&str, &str)]) -> v1::Envelope {
        envelope.tags = tags
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        envelope
    }

    fn counter() -> Event {
        Event::CounterEvent(v1::CounterEvent {
            name: "requests".into(),
            delta: 1,
            total: 10,
        })
    }

    #[test]
    fn log_message_end_to_end() {
        let envelope = header(Event::LogMessage(LogMessage {
            message: b"hello".to_vec(),
            message_type: MessageType::Out,
            app_id: "app-id".into(),
            source_type: "APP".into(),
            source_instance: "0".into(),
            ..Default::default()
        }));
        let out = Converter::default().convert(&envelope);

        assert_eq!(out.timestamp, envelope.timestamp);
        assert_eq!(out.source_id, "app-id");
        assert_eq!(out.instance_id, "0");
        assert_eq!(
            out.message,
            Some(Message::Log(Log {
                payload: b"hello".to_vec(),
                log_type: LogType::Out,
            }))
        );
        assert_eq!(out.text_tag("source_type"), Some("APP"));
        assert_eq!(out.text_tag("origin"), Some("o"));
        assert_eq!(out.text_tag("deployment"), Some("d"));
        assert_eq!(out.text_tag("job"), Some("j"));
        assert_eq!(out.text_tag("index"), Some("0"));
        assert_eq!(out.text_tag("ip"), Some("10.0.0.1"));
        assert_eq!(out.text_tag("__v1_type"), Some("LogMessage"));
    }

    #[test]
    fn source_defaults_to_deployment_slash_job() {
        let out = Converter::default().convert(&header(counter()));
        assert_eq!(out.source_id, "d/j");
        assert_eq!(out.instance_id, "");
    }

    #[test]
    fn source_id_tag_is_promoted_and_removed() {
        let envelope = with_tags(header(counter()), &[("source_id", "abc"), ("instance_id", "4")]);
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.source_id, "abc");
        assert_eq!(out.instance_id, "4");
        assert!(out.tag("source_id").is_none());
        assert!(out.tag("instance_id").is_none());
    }

    #[test]
    fn app_id_beats_source_id_tag() {
        let envelope = with_tags(
            header(Event::LogMessage(LogMessage {
                app_id: "app1".into(),
                ..Default::default()
            })),
            &[("source_id", "abc")],
        );
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.source_id, "app1");
    }

    #[test]
    fn empty_app_id_keeps_source_id_tag() {
        let envelope = with_tags(
            header(Event::LogMessage(LogMessage::default())),
            &[("source_id", "abc")],
        );
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.source_id, "abc");
    }

    #[test]
    fn log_message_clears_instance_id_tag_when_source_instance_empty() {
        let envelope = with_tags(
            header(Event::LogMessage(LogMessage::default())),
            &[("instance_id", "7")],
        );
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.instance_id, "");
    }

    #[test]
    fn every_other_input_tag_is_copied_as_text() {
        let input = [
            ("source_id", "abc"),
            ("instance_id", "1"),
            ("team", "core"),
            ("region", ""),
            ("zone", "z1"),
        ];
        let envelope = with_tags(header(counter()), &input);
        let out = Converter::default().convert(&envelope);
        for (key, value) in input {
            if key == "source_id" || key == "instance_id" {
                continue;
            }
            assert_eq!(out.tag(key), Some(&TagValue::Text(value.to_owned())), "{key}");
        }
    }

    #[test]
    fn header_tags_override_input_tags() {
        let envelope = with_tags(header(counter()), &[("origin", "spoofed")]);
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.text_tag("origin"), Some("o"));
    }

    #[test]
    fn http_absent_application_id_falls_back_to_resolved_source() {
        let envelope = with_tags(
            header(Event::HttpStartStop(v1::HttpStartStop::default())),
            &[("source_id", "abc")],
        );
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.source_id, "abc");
        assert_eq!(out.text_tag("__v1_type"), Some("HttpStartStop"));
    }

    #[test]
    fn http_application_id_is_decoded_into_source() {
        let envelope = header(Event::HttpStartStop(v1::HttpStartStop {
            application_id: UuidPair::new(
                u64::from_le_bytes([0x6b, 0xa7, 0xb8, 0x10, 0x9d, 0xad, 0x11, 0xd1]),
                u64::from_le_bytes([0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30, 0xc8]),
            ),
            ..Default::default()
        }));
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.source_id, "6ba7b810-9dad-11d1-80b4-00c04fd430c8");
    }

    #[test]
    fn container_metric_application_overrides_source() {
        let envelope = header(Event::ContainerMetric(v1::ContainerMetric {
            application_id: "guid".into(),
            ..Default::default()
        }));
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.source_id, "guid");
        assert_eq!(out.text_tag("__v1_type"), Some("ContainerMetric"));
    }

    #[test]
    fn unrecognized_event_yields_header_only_envelope() {
        let envelope = with_tags(header(Event::Unrecognized { code: 42 }), &[("team", "core")]);
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.message, None);
        assert_eq!(out.source_id, "d/j");
        assert_eq!(out.text_tag("__v1_type"), Some("42"));
        assert_eq!(out.text_tag("team"), Some("core"));
        assert_eq!(out.tags.len(), 7);
    }

    #[test]
    fn unrecognized_wire_form_with_known_code_converts_as_that_kind() {
        let raw = r#"{"deployment":"d","job":"j","event":{"eventType":"Unrecognized","payload":{"code":5}}}"#;
        let envelope: v1::Envelope = serde_json::from_str(raw).unwrap();
        let out = Converter::default().convert(&envelope);
        assert_eq!(out.text_tag("__v1_type"), Some("LogMessage"));
        assert!(matches!(out.message, Some(Message::Log(_))));
    }

    #[test]
    fn conversion_is_repeatable() {
        let envelope = with_tags(
            header(Event::HttpStartStop(v1::HttpStartStop {
                uri: "/v2/info".into(),
                status_code: 200,
                ..Default::default()
            })),
            &[("a", "1"), ("b", "2")],
        );
        let converter = Converter::default();
        let first = converter.convert(&envelope);
        let second = converter.convert(&envelope);
        assert_eq!(first.tags, second.tags);
        assert_eq!(first, second);
    }

    #[test]
    fn typed_rendering_applies_to_derived_tags_only() {
        let envelope = with_tags(
            header(Event::HttpStartStop(v1::HttpStartStop {
                status_code: 404,
                ..Default::default()
            })),
            &[("retries", "3")],
        );
        let converter =
            Converter::new(ConverterConfig::default().with_tag_rendering(TagRendering::Typed));
        let out = converter.convert(&envelope);
        assert_eq!(out.tag("status_code"), Some(&TagValue::Integer(404)));
        assert_eq!(out.text_tag("retries"), Some("3"));
        assert_eq!(out.text_tag("index"), Some("0"));
    }

    #[test]
    fn converter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();

        let converter = std::sync::Arc::new(Converter::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let converter = converter.clone();
                std::thread::spawn(move || {
                    let mut envelope = header(counter());
                    envelope.job = format!("job-{i}");
                    converter.convert(&envelope).source_id
                })
            })
            .collect();
        let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        assert_eq!(ids, ["d/job-0", "d/job-1", "d/job-2", "d/job-3"]);
    }
}
