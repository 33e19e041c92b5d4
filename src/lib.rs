//! clinsim - Simulated ambient clinical documentation backend
//!
//! A deterministic stand-in for a clinical transcription service: it
//! scripts a patient/clinician dialogue, tags clinical entities, and
//! synthesizes structured notes with review suggestions and EHR
//! submission outcomes, all published over a typed event bus.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod bus;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod integration;
pub mod notes;
pub mod session;
pub mod simulator;
pub mod tagger;
pub mod types;

// Event bus
pub use bus::{Event, EventBus, EventKind, SubscriberId};

// Simulator facade
pub use simulator::{SharedRng, Simulator, make_rng};

// Error handling
pub use error::{Result, SimError};

// Config
pub use config::Config;

// Domain model
pub use types::{
    ClinicalEntity, EntityKind, IntegrationResult, NoteStatus, NoteUpdate, Speaker, SpeakerRole,
    StructuredNote, Suggestion, SystemState, SystemStatus, Utterance,
};
