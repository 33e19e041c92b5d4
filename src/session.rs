//! Session lifecycle and the scripted dialogue tick loop.
//!
//! A driver instance is either `Idle` or `Active` with exactly one tick
//! task. Each tick emits the next scripted utterance, alternating speaker
//! roles over a shared cursor, and schedules entity tagging for it after a
//! short delay. Stopping cancels the tick task and hands the session off
//! to the note finalizer; tagging tasks already scheduled keep running, so
//! entity batches may still arrive after `listening-stopped`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep};
use tracing::{debug, info};
use uuid::Uuid;

use crate::bus::{Event, EventBus};
use crate::catalog::{CLINICIAN_SCRIPT, FILLER_QUESTIONS, PATIENT_SCRIPT, speaker_for};
use crate::config::SessionConfig;
use crate::defaults::{FILLER_PROBABILITY, UTTERANCE_CONFIDENCE_MIN};
use crate::error::{Result, SimError};
use crate::notes::NoteFinalizer;
use crate::simulator::SharedRng;
use crate::tagger::EntityTagger;
use crate::types::{SpeakerRole, Utterance};

enum DriverState {
    Idle,
    Active {
        session_id: String,
        /// Checked by the tick body; flipped before the task is aborted so
        /// a tick racing `stop()` on another worker does nothing.
        active: Arc<AtomicBool>,
        tick_task: JoinHandle<()>,
    },
}

/// Drives the turn-taking dialogue for at most one session at a time.
pub struct SessionDriver {
    bus: Arc<EventBus>,
    tagger: Arc<EntityTagger>,
    finalizer: Arc<NoteFinalizer>,
    rng: SharedRng,
    tick: Duration,
    tagging_delay: Duration,
    state: Mutex<DriverState>,
}

impl SessionDriver {
    pub fn new(
        bus: Arc<EventBus>,
        tagger: Arc<EntityTagger>,
        finalizer: Arc<NoteFinalizer>,
        rng: SharedRng,
        config: &SessionConfig,
    ) -> Self {
        Self {
            bus,
            tagger,
            finalizer,
            rng,
            tick: config.tick(),
            tagging_delay: config.tagging_delay(),
            state: Mutex::new(DriverState::Idle),
        }
    }

    /// Begin a session: publish `listening-started` and start the tick
    /// loop. The first utterance fires one full tick period after start.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, session_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let DriverState::Active {
            session_id: current,
            ..
        } = &*state
        {
            return Err(SimError::SessionAlreadyActive {
                session_id: current.clone(),
            });
        }

        let active = Arc::new(AtomicBool::new(true));
        let tick_task = tokio::spawn(run_ticks(
            Arc::clone(&self.bus),
            Arc::clone(&self.tagger),
            self.rng.clone(),
            Arc::clone(&active),
            self.tick,
            self.tagging_delay,
        ));
        *state = DriverState::Active {
            session_id: session_id.to_string(),
            active,
            tick_task,
        };
        drop(state);

        info!(session_id, "listening started");
        self.bus.publish(&Event::ListeningStarted {
            session_id: session_id.to_string(),
        });
        Ok(())
    }

    /// End the active session: cancel the tick loop, publish
    /// `listening-stopped`, and schedule note generation.
    pub fn stop(&self) -> Result<()> {
        let (session_id, active, tick_task) = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *state, DriverState::Idle) {
                DriverState::Idle => return Err(SimError::SessionNotActive),
                DriverState::Active {
                    session_id,
                    active,
                    tick_task,
                } => (session_id, active, tick_task),
            }
        };

        active.store(false, Ordering::SeqCst);
        tick_task.abort();

        info!(session_id, "listening stopped");
        self.bus.publish(&Event::ListeningStopped {
            session_id: session_id.clone(),
        });
        self.finalizer.spawn_generation(session_id);
        Ok(())
    }

    pub fn is_listening(&self) -> bool {
        matches!(
            &*self.state.lock().unwrap_or_else(|e| e.into_inner()),
            DriverState::Active { .. }
        )
    }

    pub fn current_session(&self) -> Option<String> {
        match &*self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            DriverState::Active { session_id, .. } => Some(session_id.clone()),
            DriverState::Idle => None,
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        if let DriverState::Active {
            active, tick_task, ..
        } = &*self.state.lock().unwrap_or_else(|e| e.into_inner())
        {
            active.store(false, Ordering::SeqCst);
            tick_task.abort();
        }
    }
}

/// The recurring tick loop. One shared cursor indexes both scripts; the
/// patient takes even positions and the clinician odd ones. When the
/// cursor runs off the end it wraps to zero and, with fixed probability,
/// one bonus clinician question is emitted without flipping the turn.
async fn run_ticks(
    bus: Arc<EventBus>,
    tagger: Arc<EntityTagger>,
    rng: SharedRng,
    active: Arc<AtomicBool>,
    tick: Duration,
    tagging_delay: Duration,
) {
    let mut timer = interval_at(Instant::now() + tick, tick);
    let mut cursor = 0usize;
    let mut patient_turn = true;

    loop {
        timer.tick().await;
        if !active.load(Ordering::SeqCst) {
            return;
        }

        let (script, role) = if patient_turn {
            (&PATIENT_SCRIPT[..], SpeakerRole::Patient)
        } else {
            (&CLINICIAN_SCRIPT[..], SpeakerRole::Clinician)
        };

        if cursor < script.len() {
            debug!(cursor, ?role, "tick");
            emit_utterance(&bus, &tagger, &rng, role, script[cursor], tagging_delay);
            cursor += 1;
            patient_turn = !patient_turn;
        } else {
            cursor = 0;
            let filler = {
                let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
                if rng.gen_bool(FILLER_PROBABILITY) {
                    let index = usize::from(!rng.gen_bool(0.5));
                    Some(FILLER_QUESTIONS[index])
                } else {
                    None
                }
            };
            debug!(filler = filler.is_some(), "script wrapped");
            if let Some(text) = filler {
                emit_utterance(
                    &bus,
                    &tagger,
                    &rng,
                    SpeakerRole::Clinician,
                    text,
                    tagging_delay,
                );
            }
        }
    }
}

/// Publish one utterance, then schedule its entity tagging. The
/// transcription event always precedes the derived entity batch.
fn emit_utterance(
    bus: &Arc<EventBus>,
    tagger: &Arc<EntityTagger>,
    rng: &SharedRng,
    role: SpeakerRole,
    text: &str,
    tagging_delay: Duration,
) {
    let confidence = {
        let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(UTTERANCE_CONFIDENCE_MIN..1.0)
    };
    let utterance = Utterance {
        id: Uuid::new_v4(),
        text: text.to_string(),
        confidence,
        timestamp: Utc::now(),
        speaker: speaker_for(role),
    };
    bus.publish(&Event::Transcription(utterance));

    let bus = Arc::clone(bus);
    let tagger = Arc::clone(tagger);
    let text = text.to_string();
    tokio::spawn(async move {
        sleep(tagging_delay).await;
        let entities = tagger.tag(&text);
        if !entities.is_empty() {
            bus.publish(&Event::ClinicalEntities(entities));
        }
    });
}
