//! Search lifecycle events and the sinks that receive them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, Level};

/// An event emitted by the search session.
///
/// Events are used for observability and can be consumed by event sinks
/// for logging, monitoring, or analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvent {
    /// The event type (e.g., "search.started", "search.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl SearchEvent {
    /// Creates a new event with no data.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Creates a "search.started" event.
    #[must_use]
    pub fn started(term: &str) -> Self {
        Self::new("search.started").add_data("term", serde_json::json!(term))
    }

    /// Creates a "search.completed" event.
    #[must_use]
    pub fn completed(term: &str, markers: usize) -> Self {
        Self::new("search.completed")
            .add_data("term", serde_json::json!(term))
            .add_data("markers", serde_json::json!(markers))
    }

    /// Creates a "search.advanced" event.
    #[must_use]
    pub fn advanced(term: &str) -> Self {
        Self::new("search.advanced").add_data("term", serde_json::json!(term))
    }

    /// Creates a "search.reset" event.
    #[must_use]
    pub fn reset(restored: usize) -> Self {
        Self::new("search.reset").add_data("restored", serde_json::json!(restored))
    }

    /// Creates a "route.changed" event.
    #[must_use]
    pub fn route_changed() -> Self {
        Self::new("route.changed")
    }
}

/// Trait for event sinks that can receive search lifecycle events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: SearchEvent);

    /// Emits an event without blocking. Must never fail; errors are logged
    /// and suppressed by implementations.
    fn try_emit(&self, event: SearchEvent);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: SearchEvent) {}

    fn try_emit(&self, _event: SearchEvent) {}
}

/// An event sink that logs events through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging sink at the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &SearchEvent) {
        if self.level == Level::DEBUG {
            debug!(event_type = %event.event_type, event_data = ?event.data, "Event: {}", event.event_type);
        } else {
            info!(event_type = %event.event_type, event_data = ?event.data, "Event: {}", event.event_type);
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: SearchEvent) {
        self.log_event(&event);
    }

    fn try_emit(&self, event: SearchEvent) {
        self.log_event(&event);
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<SearchEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.read().clone()
    }

    /// Returns the collected event types, in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .map(|event| event.event_type.clone())
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: SearchEvent) {
        self.events.write().push(event);
    }

    fn try_emit(&self, event: SearchEvent) {
        self.events.write().push(event);
    }
}
