//! Typed publish/subscribe event bus.
//!
//! Subscriptions are keyed by [`EventKind`] and fan out in registration
//! order. Publishing is synchronous: every handler registered for the
//! event's kind runs before `publish` returns. A panicking handler is
//! caught and logged so the remaining handlers still run.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::types::{ClinicalEntity, IntegrationResult, StructuredNote, Suggestion, Utterance};

/// Events published by the simulator.
///
/// Serialized with the historical kebab-case event names as the tag, so a
/// JSON consumer sees `{"type":"transcription","data":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Event {
    /// A session began listening.
    ListeningStarted { session_id: String },
    /// A session stopped listening.
    ListeningStopped { session_id: String },
    /// One recognized utterance.
    Transcription(Utterance),
    /// Entities extracted from one utterance. Never published empty.
    ClinicalEntities(Vec<ClinicalEntity>),
    /// The note synthesized after a session stopped.
    NoteGenerated(StructuredNote),
    /// Review findings for the generated note.
    ReviewSuggestions(Vec<Suggestion>),
    /// Per-target outcomes of a note submission.
    IntegrationResults(Vec<IntegrationResult>),
}

impl Event {
    /// The subscription key this event is delivered under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ListeningStarted { .. } => EventKind::ListeningStarted,
            Event::ListeningStopped { .. } => EventKind::ListeningStopped,
            Event::Transcription(_) => EventKind::Transcription,
            Event::ClinicalEntities(_) => EventKind::ClinicalEntities,
            Event::NoteGenerated(_) => EventKind::NoteGenerated,
            Event::ReviewSuggestions(_) => EventKind::ReviewSuggestions,
            Event::IntegrationResults(_) => EventKind::IntegrationResults,
        }
    }

    /// Serialize event to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize event from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Fieldless discriminant of [`Event`], used to key subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ListeningStarted,
    ListeningStopped,
    Transcription,
    ClinicalEntities,
    NoteGenerated,
    ReviewSuggestions,
    IntegrationResults,
}

impl EventKind {
    /// Every subscribable kind.
    pub const ALL: [EventKind; 7] = [
        EventKind::ListeningStarted,
        EventKind::ListeningStopped,
        EventKind::Transcription,
        EventKind::ClinicalEntities,
        EventKind::NoteGenerated,
        EventKind::ReviewSuggestions,
        EventKind::IntegrationResults,
    ];
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<(SubscriberId, Handler)>>,
}

/// Named-event subscribe/unsubscribe/publish with fan-out to all
/// subscribers. No queuing, no persistence, no cross-event ordering.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind. Handlers for the same kind
    /// are invoked in registration order.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriberId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner
            .handlers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a previously registered handler. No-op if the id is unknown
    /// or already removed.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for handlers in inner.handlers.values_mut() {
            handlers.retain(|(registered, _)| *registered != id);
        }
    }

    /// Deliver an event to every handler registered for its kind.
    ///
    /// The handler list is snapshotted before invocation: handlers added
    /// while a publish is in flight do not see that event, and handlers
    /// may themselves subscribe or publish without deadlocking. A panic in
    /// one handler is logged and does not stop delivery to the rest.
    pub fn publish(&self, event: &Event) {
        let snapshot: Vec<Handler> = {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            match inner.handlers.get(&event.kind()) {
                Some(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return,
            }
        };

        for handler in snapshot {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                error!(kind = ?event.kind(), "event handler panicked");
            }
        }
    }
}
