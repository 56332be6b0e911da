//! JSONL event layer.
//!
//! Each event becomes one line:
//!
//! ```text
//! {"timestamp":"..","level":"INFO","service":"chat-relay","pid":7,"target":"room_ledger::ledger",
//!  "message":"Pulled page","room":"alice:bob","cursor":0,"limit":10,"count":9,"fields":{"has_more":true}}
//! ```
//!
//! The relay's correlation fields ([`CONTEXT_FIELDS`]) are written at the top
//! level of the line so one room's traffic can be filtered straight out of the
//! file. Every other field is nested under `fields`, which is omitted when
//! empty.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Event fields promoted to the top level of a log line.
pub const CONTEXT_FIELDS: [&str; 6] = ["room", "chat", "cursor", "limit", "count", "error"];

/// One line of the relay log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub service: String,
    pub pid: u32,
    pub target: String,
    pub message: String,
    /// Values for any of [`CONTEXT_FIELDS`] the event carried.
    #[serde(flatten)]
    pub context: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

#[derive(Default)]
struct EventFields {
    message: Option<String>,
    context: Map<String, Value>,
    extra: Map<String, Value>,
}

impl EventFields {
    fn put(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                });
            }
            name if CONTEXT_FIELDS.contains(&name) => {
                self.context.insert(name.to_string(), value);
            }
            name => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities have no JSON number form
        let value = Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.put(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }
}

/// Layer that appends every event to `W` as a [`LogEntry`] line.
pub struct JsonLayer<W> {
    service: String,
    pid: u32,
    writer: W,
}

impl<W> JsonLayer<W> {
    pub fn new(service: impl Into<String>, writer: W) -> Self {
        Self {
            service: service.into(),
            pid: std::process::id(),
            writer,
        }
    }

    fn entry(&self, event: &Event<'_>) -> LogEntry {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        let metadata = event.metadata();

        LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: metadata.level().to_string(),
            service: self.service.clone(),
            pid: self.pid,
            target: metadata.target().to_string(),
            message: fields.message.unwrap_or_default(),
            context: fields.context,
            fields: fields.extra,
        }
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Ok(mut line) = serde_json::to_vec(&self.entry(event)) else {
            return;
        };
        line.push(b'\n');
        // One write per line keeps concurrent appenders from interleaving
        let _ = self.writer.make_writer().write_all(&line);
    }
}
