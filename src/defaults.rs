//! Default configuration constants for clinsim.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default session tick period in milliseconds.
///
/// One scripted utterance is emitted per tick. 3000ms approximates the
/// cadence of a real clinical conversation without making the demo drag.
pub const TICK_MS: u64 = 3000;

/// Default delay in milliseconds between an utterance and its entity batch.
///
/// Models the processing lag of a real extraction service. Deliberately
/// shorter than the tick period so each utterance is tagged before the
/// next one arrives.
pub const TAGGING_DELAY_MS: u64 = 500;

/// Default delay in milliseconds between session stop and note generation.
pub const NOTE_DELAY_MS: u64 = 1000;

/// Default delay in milliseconds between note generation and review suggestions.
pub const SUGGESTIONS_DELAY_MS: u64 = 1000;

/// Probability of emitting a bonus clinician filler question when the
/// dialogue script wraps around.
pub const FILLER_PROBABILITY: f64 = 0.3;

/// Probability that a single integration target accepts a submitted note.
pub const INTEGRATION_SUCCESS_RATE: f64 = 0.8;

/// Probability that a system's reported status flips away from its
/// baseline on any one status snapshot.
pub const STATUS_FLIP_RATE: f64 = 0.1;

/// Lower bound of the synthetic transcription confidence range.
///
/// Utterance confidences are drawn uniformly from [0.9, 1.0) — the
/// simulated recognizer is always fairly sure of itself.
pub const UTTERANCE_CONFIDENCE_MIN: f64 = 0.9;

/// Lower bound of the synthetic entity confidence range.
///
/// Entity confidences are drawn uniformly from [0.8, 1.0), slightly wider
/// than utterance confidence to reflect the extra extraction step.
pub const ENTITY_CONFIDENCE_MIN: f64 = 0.8;

/// Simulated latency in milliseconds for note analysis.
pub const ANALYZE_LATENCY_MS: u64 = 1500;

/// Simulated latency in milliseconds for note updates.
pub const UPDATE_LATENCY_MS: u64 = 500;

/// Simulated latency in milliseconds for note approval.
pub const APPROVE_LATENCY_MS: u64 = 1500;

/// Simulated latency in milliseconds for note reads.
pub const READ_LATENCY_MS: u64 = 300;

/// Simulated latency in milliseconds for note finalization to EHR targets.
pub const FINALIZE_LATENCY_MS: u64 = 2000;

/// Base simulated latency in milliseconds for a connection test.
///
/// A random 0-2000ms is added on top so repeated tests feel like a
/// real network probe.
pub const CONNECTION_TEST_BASE_MS: u64 = 1000;

/// Maximum random latency in milliseconds added to a connection test.
pub const CONNECTION_TEST_JITTER_MS: u64 = 2000;
