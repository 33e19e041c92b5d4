//! Simulated downstream EHR integrations.
//!
//! Submissions and connection tests are coin flips weighted by the
//! configured success rate. System status reports start from a fixed
//! baseline table and occasionally flip a system into a random state.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::catalog::SYSTEM_BASELINES;
use crate::config::SimulatorConfig;
use crate::defaults::{CONNECTION_TEST_BASE_MS, CONNECTION_TEST_JITTER_MS};
use crate::simulator::SharedRng;
use crate::types::{IntegrationResult, SystemState, SystemStatus};

pub struct IntegrationSim {
    rng: SharedRng,
    success_rate: f64,
    flip_rate: f64,
}

impl IntegrationSim {
    pub fn new(rng: SharedRng, config: &SimulatorConfig) -> Self {
        Self {
            rng,
            success_rate: config.integration_success_rate,
            flip_rate: config.status_flip_rate,
        }
    }

    /// Attempt a submission to each target system in order. Success is
    /// decided per target; the message always reflects the outcome.
    pub fn submit(&self, targets: &[String]) -> Vec<IntegrationResult> {
        let now = Utc::now();
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        targets
            .iter()
            .map(|target| {
                let success = rng.gen_bool(self.success_rate);
                let message = if success {
                    format!("Successfully submitted to {target}")
                } else {
                    warn!(target, "integration submission failed");
                    format!("Failed to connect to {target}")
                };
                IntegrationResult {
                    target: target.clone(),
                    success,
                    message,
                    timestamp: now,
                }
            })
            .collect()
    }

    /// Report the health of every known downstream system. Each report
    /// starts from the system's baseline; with the configured flip rate
    /// the state is re-rolled uniformly across all states.
    pub fn system_status(&self) -> Vec<SystemStatus> {
        let now = Utc::now();
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        SYSTEM_BASELINES
            .iter()
            .map(|baseline| {
                let state = if rng.gen_bool(self.flip_rate) {
                    match rng.gen_range(0..3u8) {
                        0 => SystemState::Online,
                        1 => SystemState::Offline,
                        _ => SystemState::Degraded,
                    }
                } else {
                    baseline.state
                };
                SystemStatus {
                    name: baseline.name.to_string(),
                    state,
                    response_time_ms: rng.gen_range(100..600),
                    last_check: now - chrono::Duration::milliseconds(rng.gen_range(0..120_000)),
                    error_count: baseline.error_count,
                }
            })
            .collect()
    }

    /// Probe a single system. Takes between one and three seconds and
    /// succeeds at the configured rate.
    pub async fn test_connection(&self, system: &str) -> bool {
        let jitter = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..CONNECTION_TEST_JITTER_MS)
        };
        sleep(Duration::from_millis(CONNECTION_TEST_BASE_MS + jitter)).await;
        let reachable = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_bool(self.success_rate)
        };
        debug!(system, reachable, "connection test");
        reachable
    }
}
