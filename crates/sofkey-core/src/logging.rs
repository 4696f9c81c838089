//! Diagnostic side channel for editor hosts.
//!
//! The service never reports problems through return values. A host that
//! wants to show them (a notification, an output panel) installs a
//! [`DiagnosticCollector`] layer and polls the paired [`DiagnosticReader`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    /// Module path of the emitting code, e.g. `sofkey_core::loader`.
    pub target: String,
    pub message: String,
    /// Structured fields other than the message, in emission order.
    pub fields: Vec<(String, String)>,
}

impl Diagnostic {
    /// Value of the structured field `name`, if recorded.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct Buffer {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

/// A `tracing` layer keeping the most recent events at or above a level.
#[derive(Debug, Clone)]
pub struct DiagnosticCollector {
    buffer: Arc<Mutex<Buffer>>,
    min_level: Level,
}

impl DiagnosticCollector {
    /// Keep up to `capacity` events at `min_level` or more severe.
    pub fn new(capacity: usize, min_level: Level) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Buffer {
                entries: VecDeque::with_capacity(capacity),
                capacity,
            })),
            min_level,
        }
    }

    /// A read handle sharing this collector's buffer.
    pub fn reader(&self) -> DiagnosticReader {
        DiagnosticReader {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // More severe levels compare as smaller.
        if *metadata.level() > self.min_level {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        if let Ok(mut buf) = self.buffer.lock() {
            if buf.capacity == 0 {
                return;
            }
            if buf.entries.len() >= buf.capacity {
                buf.entries.pop_front();
            }
            buf.entries.push_back(Diagnostic {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message: visitor.message,
                fields: visitor.fields,
            });
        }
    }
}

/// Read handle for a [`DiagnosticCollector`].
#[derive(Debug, Clone)]
pub struct DiagnosticReader {
    buffer: Arc<Mutex<Buffer>>,
}

impl DiagnosticReader {
    /// Snapshot of captured events, oldest first.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.buffer
            .lock()
            .map(|buf| buf.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove and return everything captured so far.
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.buffer
            .lock()
            .map(|mut buf| buf.entries.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of captured events.
    pub fn len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.entries.len()).unwrap_or(0)
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }
}
