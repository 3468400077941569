//! Sinks that waits and resumes log events to.

use super::{ErrorEvent, Event};
use parking_lot::RwLock;
use std::sync::Arc;

/// Receives events as they are emitted.
pub trait EventSink {
    /// Record one event.
    fn log(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn log(&mut self, event: Event) {
        self.push(event);
    }
}

/// A sink that hands every event to a closure. See [`from_fn`].
pub struct FnSink<F>(F);

/// Make a sink out of a closure.
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(Event),
{
    FnSink(f)
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(Event),
{
    fn log(&mut self, event: Event) {
        (self.0)(event)
    }
}

type EventSubscribers = RwLock<Vec<Arc<dyn Fn(&Event) + Send + Sync>>>;

/// Thread-safe, append-only event history with simple queries.
///
/// Any number of threads may log to a shared `&EventLog`; subscribers are
/// notified of each event as it is recorded.
#[derive(Default)]
pub struct EventLog {
    events: RwLock<Vec<Event>>,
    subscribers: EventSubscribers,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Be notified of every event logged from now on.
    pub fn subscribe(&self, callback: Arc<dyn Fn(&Event) + Send + Sync>) {
        self.subscribers.write().push(callback);
    }

    /// Record an event.
    pub fn push(&self, event: Event) {
        tracing::trace!(event_type = event.type_name(), "Event logged");
        self.events.write().push(event.clone());

        // no lock is held while callbacks run
        let subscribers = self.subscribers.read().clone();
        for subscriber in &subscribers {
            subscriber(&event);
        }
    }

    /// All events in the order they were logged.
    pub fn all(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// The type tags of all events, in order.
    pub fn types(&self) -> Vec<&'static str> {
        self.events.read().iter().map(Event::type_name).collect()
    }

    /// Events with the given type tag.
    pub fn by_type(&self, type_name: &str) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|e| e.type_name() == type_name)
            .cloned()
            .collect()
    }

    /// All error events.
    pub fn errors(&self) -> Vec<ErrorEvent> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                Event::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<Event> {
        self.events.read().last().cloned()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether no events have been logged.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Remove all events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventSink for EventLog {
    fn log(&mut self, event: Event) {
        self.push(event);
    }
}

impl EventSink for &EventLog {
    fn log(&mut self, event: Event) {
        self.push(event);
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.types())
            .finish()
    }
}
