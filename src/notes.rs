//! Structured note store and the post-session note pipeline.
//!
//! The store starts seeded with a fixed set of historical notes. When a
//! session ends the finalizer synthesizes a fresh draft note after a short
//! delay, publishes it, then publishes review suggestions after a second
//! delay. The synthesized note is handed to subscribers only; it is not
//! retained in the store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::bus::{Event, EventBus};
use crate::catalog;
use crate::config::Config;
use crate::defaults::{
    ANALYZE_LATENCY_MS, APPROVE_LATENCY_MS, FINALIZE_LATENCY_MS, READ_LATENCY_MS, UPDATE_LATENCY_MS,
};
use crate::error::{Result, SimError};
use crate::integration::IntegrationSim;
use crate::types::{IntegrationResult, NoteStatus, NoteUpdate, StructuredNote, Suggestion};

/// Owns the note store and everything downstream of a stopped session.
pub struct NoteFinalizer {
    bus: Arc<EventBus>,
    integration: Arc<IntegrationSim>,
    note_delay: Duration,
    suggestions_delay: Duration,
    store: Mutex<Vec<StructuredNote>>,
}

impl NoteFinalizer {
    pub fn new(bus: Arc<EventBus>, integration: Arc<IntegrationSim>, config: &Config) -> Self {
        Self {
            bus,
            integration,
            note_delay: config.session.note_delay(),
            suggestions_delay: config.session.suggestions_delay(),
            store: Mutex::new(catalog::seed_notes(Utc::now())),
        }
    }

    /// Kick off note generation for a just-stopped session. Publishes
    /// `note-generated` after the note delay and `review-suggestions`
    /// after the suggestions delay on top of that.
    pub fn spawn_generation(&self, session_id: String) {
        let bus = Arc::clone(&self.bus);
        let note_delay = self.note_delay;
        let suggestions_delay = self.suggestions_delay;
        tokio::spawn(async move {
            sleep(note_delay).await;
            let note = build_generated_note(&session_id);
            info!(note_id = %note.id, session_id, "note generated");
            bus.publish(&Event::NoteGenerated(note));

            sleep(suggestions_delay).await;
            bus.publish(&Event::ReviewSuggestions(catalog::review_suggestions()));
        });
    }

    /// Run the review analysis for a note. The analysis itself is canned,
    /// so any note id is accepted.
    pub async fn analyze_note(&self, note_id: &str) -> Vec<Suggestion> {
        sleep(Duration::from_millis(ANALYZE_LATENCY_MS)).await;
        debug!(note_id, "analysis complete");
        catalog::review_suggestions()
    }

    /// Merge the given section updates into a stored note and return the
    /// updated copy.
    pub async fn update_note(&self, note_id: &str, update: &NoteUpdate) -> Result<StructuredNote> {
        sleep(Duration::from_millis(UPDATE_LATENCY_MS)).await;
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let note = store
            .iter_mut()
            .find(|note| note.id == note_id)
            .ok_or_else(|| SimError::NoteNotFound {
                note_id: note_id.to_string(),
            })?;
        note.apply_update(update, Utc::now());
        info!(note_id, "note updated");
        Ok(note.clone())
    }

    /// Mark a stored note as finalized.
    pub async fn approve_note(&self, note_id: &str) -> Result<StructuredNote> {
        sleep(Duration::from_millis(APPROVE_LATENCY_MS)).await;
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let note = store
            .iter_mut()
            .find(|note| note.id == note_id)
            .ok_or_else(|| SimError::NoteNotFound {
                note_id: note_id.to_string(),
            })?;
        note.status = NoteStatus::Finalized;
        note.updated_at = Utc::now();
        info!(note_id, "note approved");
        Ok(note.clone())
    }

    pub async fn get_notes(&self) -> Vec<StructuredNote> {
        sleep(Duration::from_millis(READ_LATENCY_MS)).await;
        self.store.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub async fn get_note(&self, note_id: &str) -> Result<StructuredNote> {
        sleep(Duration::from_millis(READ_LATENCY_MS)).await;
        self.store
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|note| note.id == note_id)
            .cloned()
            .ok_or_else(|| SimError::NoteNotFound {
                note_id: note_id.to_string(),
            })
    }

    /// Submit a note to the named downstream systems. Publishes the
    /// per-target outcome batch and returns it.
    pub async fn finalize_note(&self, note_id: &str, targets: &[String]) -> Vec<IntegrationResult> {
        sleep(Duration::from_millis(FINALIZE_LATENCY_MS)).await;
        let results = self.integration.submit(targets);
        info!(note_id, targets = targets.len(), "note finalized");
        self.bus.publish(&Event::IntegrationResults(results.clone()));
        results
    }
}

/// Assemble the draft note for a finished session from the canned
/// transcript, narrative, and entity set.
fn build_generated_note(session_id: &str) -> StructuredNote {
    let now = Utc::now();
    StructuredNote {
        id: format!("note_{}", now.timestamp_millis()),
        patient_id: catalog::patient().id,
        provider_id: catalog::clinician().id,
        session_id: Some(session_id.to_string()),
        created_at: now,
        updated_at: now,
        status: NoteStatus::Draft,
        transcript: Some(catalog::generated_transcript()),
        narrative: catalog::generated_narrative(),
        entities: catalog::generated_entities(),
    }
}
