//! Top-level simulator facade.
//!
//! Owns the event bus and wires the session driver, entity tagger, note
//! finalizer, and integration layer together around one shared RNG. Every
//! instance is independent; nothing here is global.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bus::{Event, EventBus, EventKind, SubscriberId};
use crate::config::Config;
use crate::error::Result;
use crate::integration::IntegrationSim;
use crate::notes::NoteFinalizer;
use crate::session::SessionDriver;
use crate::tagger::EntityTagger;
use crate::types::{
    ClinicalEntity, IntegrationResult, NoteUpdate, StructuredNote, Suggestion, SystemStatus,
};

/// Single RNG shared by every randomized decision in a simulator
/// instance. Locked per draw, never across an await point.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Build the shared RNG, seeded for reproducible runs or from OS entropy.
pub fn make_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Arc::new(Mutex::new(rng))
}

pub struct Simulator {
    bus: Arc<EventBus>,
    tagger: Arc<EntityTagger>,
    driver: SessionDriver,
    finalizer: Arc<NoteFinalizer>,
    integration: Arc<IntegrationSim>,
}

impl Simulator {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let bus = Arc::new(EventBus::new());
        let rng = make_rng(config.simulator.rng_seed);
        let tagger = Arc::new(EntityTagger::new(rng.clone())?);
        let integration = Arc::new(IntegrationSim::new(rng.clone(), &config.simulator));
        let finalizer = Arc::new(NoteFinalizer::new(
            Arc::clone(&bus),
            Arc::clone(&integration),
            config,
        ));
        let driver = SessionDriver::new(
            Arc::clone(&bus),
            Arc::clone(&tagger),
            Arc::clone(&finalizer),
            rng,
            &config.session,
        );
        Ok(Self {
            bus,
            tagger,
            driver,
            finalizer,
            integration,
        })
    }

    /// Register a handler for one event kind.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriberId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.bus.unsubscribe(id);
    }

    /// Start the scripted dialogue for a session. Fails if one is already
    /// running.
    pub fn start_listening(&self, session_id: &str) -> Result<()> {
        self.driver.start(session_id)
    }

    /// Stop the running session and trigger note generation.
    pub fn stop_listening(&self) -> Result<()> {
        self.driver.stop()
    }

    pub fn is_listening(&self) -> bool {
        self.driver.is_listening()
    }

    pub fn current_session(&self) -> Option<String> {
        self.driver.current_session()
    }

    /// Extract clinical entities from a piece of text immediately, outside
    /// any session.
    pub fn tag(&self, text: &str) -> Vec<ClinicalEntity> {
        self.tagger.tag(text)
    }

    pub async fn analyze_note(&self, note_id: &str) -> Vec<Suggestion> {
        self.finalizer.analyze_note(note_id).await
    }

    pub async fn update_note(&self, note_id: &str, update: &NoteUpdate) -> Result<StructuredNote> {
        self.finalizer.update_note(note_id, update).await
    }

    pub async fn approve_note(&self, note_id: &str) -> Result<StructuredNote> {
        self.finalizer.approve_note(note_id).await
    }

    pub async fn get_notes(&self) -> Vec<StructuredNote> {
        self.finalizer.get_notes().await
    }

    pub async fn get_note(&self, note_id: &str) -> Result<StructuredNote> {
        self.finalizer.get_note(note_id).await
    }

    pub async fn finalize_note(
        &self,
        note_id: &str,
        targets: &[String],
    ) -> Vec<IntegrationResult> {
        self.finalizer.finalize_note(note_id, targets).await
    }

    pub fn system_status(&self) -> Vec<SystemStatus> {
        self.integration.system_status()
    }

    pub async fn test_connection(&self, system: &str) -> bool {
        self.integration.test_connection(system).await
    }
}
