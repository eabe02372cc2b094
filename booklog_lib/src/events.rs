//! Structured scrape events.
//!
//! Operations log through a [`ScrapeCtx`] instead of calling `tracing`
//! macros directly. Every event goes to `tracing` with the operation name
//! attached; if a sink is installed the same event is handed to it as well,
//! which is how tests observe what an operation did.

use std::sync::{Arc, Mutex};

/// Severity of an emitted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// One structured event: operation, event kind, and key/value details.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub op: &'static str,
    pub kind: &'static str,
    pub details: Vec<(&'static str, String)>,
}

impl Event {
    /// Returns the value recorded under `key`, if any.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &Event);
}

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Events of the given kind, in emission order.
    pub fn of_kind(&self, kind: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

/// Logging context for one operation.
#[derive(Clone)]
pub struct ScrapeCtx {
    op: &'static str,
    sink: Option<Arc<dyn EventSink>>,
}

impl ScrapeCtx {
    pub fn new(op: &'static str) -> Self {
        Self { op, sink: None }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub(crate) fn with_optional_sink(mut self, sink: Option<Arc<dyn EventSink>>) -> Self {
        self.sink = sink;
        self
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn debug_kv<D>(&self, kind: &'static str, kv: D)
    where
        D: IntoIterator<Item = (&'static str, String)>,
    {
        self.emit(Level::Debug, kind, kv);
    }

    pub fn info_kv<D>(&self, kind: &'static str, kv: D)
    where
        D: IntoIterator<Item = (&'static str, String)>,
    {
        self.emit(Level::Info, kind, kv);
    }

    pub fn warn_kv<D>(&self, kind: &'static str, kv: D)
    where
        D: IntoIterator<Item = (&'static str, String)>,
    {
        self.emit(Level::Warn, kind, kv);
    }

    fn emit<D>(&self, level: Level, kind: &'static str, kv: D)
    where
        D: IntoIterator<Item = (&'static str, String)>,
    {
        let event = Event {
            level,
            op: self.op,
            kind,
            details: kv.into_iter().collect(),
        };
        let details = kv_to_string(&event.details);
        match level {
            Level::Debug => tracing::debug!(op = %self.op, details = %details, "{}", kind),
            Level::Info => tracing::info!(op = %self.op, details = %details, "{}", kind),
            Level::Warn => tracing::warn!(op = %self.op, details = %details, "{}", kind),
        }
        if let Some(sink) = &self.sink {
            sink.on_event(&event);
        }
    }
}

impl std::fmt::Debug for ScrapeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeCtx")
            .field("op", &self.op)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

fn kv_to_string(kv: &[(&'static str, String)]) -> String {
    kv.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_captures_events_in_order() {
        let sink = RecordingSink::new();
        let ctx = ScrapeCtx::new("search").with_sink(sink.clone());
        ctx.info_kv("start", [("query", "dune".to_string())]);
        ctx.warn_kv("degraded_selection", [("wanted", "bookshop".to_string())]);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].op, "search");
        assert_eq!(events[0].kind, "start");
        assert_eq!(events[0].detail("query"), Some("dune"));
        assert_eq!(events[1].level, Level::Warn);
    }

    #[test]
    fn ctx_without_sink_is_silent() {
        let ctx = ScrapeCtx::new("scrape_product");
        ctx.debug_kv("noop", Vec::<(&'static str, String)>::new());
        assert_eq!(ctx.op(), "scrape_product");
    }

    #[test]
    fn kv_formatting() {
        let s = kv_to_string(&[("a", "1".to_string()), ("b", "two".to_string())]);
        assert_eq!(s, "a=1 b=two");
    }
}
