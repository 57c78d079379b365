//! Difficulty Controller
//!
//! Owns the [`DifficultyState`] behind a lock. Verification reads the current
//! threshold and records solves; the periodic tick evaluates. Each critical
//! section is a few integer operations.

use crate::application::config::PowConfig;
use crate::domain::clock::Clock;
use crate::domain::difficulty::{DifficultyAdjustment, DifficultyState};
use crate::domain::value_objects::HashValue;
use crate::error::PowResult;
use parking_lot::RwLock;
use std::sync::Arc;

pub struct DifficultyController {
    state: RwLock<DifficultyState>,
    clock: Arc<dyn Clock>,
}

impl DifficultyController {
    pub fn new(config: &PowConfig, clock: Arc<dyn Clock>) -> PowResult<Self> {
        let state = DifficultyState::new(
            config.initial_maximum_allowed_hash_value.as_u256(),
            config.desired_solve_rate_per_minute,
            config.evaluations_per_minute(),
            config.recovery_ticks(),
            config.solve_rate_window_ms(),
        )?;

        Ok(Self {
            state: RwLock::new(state),
            clock,
        })
    }

    pub fn current_maximum_allowed_hash_value(&self) -> HashValue {
        HashValue::new(self.state.read().current_maximum_allowed_hash_value())
    }

    pub fn initial_maximum_allowed_hash_value(&self) -> HashValue {
        HashValue::new(self.state.read().initial_maximum_allowed_hash_value())
    }

    /// Record one successful verification
    pub fn record_solve(&self, id: &str) {
        let now_ms = self.clock.now_ms();
        self.state.write().record_solve(id, now_ms);
    }

    /// Run one evaluation tick
    pub fn evaluate(&self) -> DifficultyAdjustment {
        let now_ms = self.clock.now_ms();
        let adjustment = self.state.write().evaluate(now_ms);

        match adjustment {
            DifficultyAdjustment::Tightened {
                previous,
                current,
                solve_rate,
            } => {
                tracing::info!(
                    solve_rate = solve_rate,
                    desired_solve_rate = self.state.read().desired_solve_rate_per_minute(),
                    previous = %HashValue::new(previous),
                    current = %HashValue::new(current),
                    "PoW difficulty increased"
                );
            }
            DifficultyAdjustment::Loosened {
                previous,
                current,
                solve_rate,
            } => {
                tracing::debug!(
                    solve_rate = solve_rate,
                    previous = %HashValue::new(previous),
                    current = %HashValue::new(current),
                    "PoW difficulty decreased"
                );
            }
            DifficultyAdjustment::Unchanged { solve_rate, .. } => {
                tracing::debug!(solve_rate = solve_rate, "PoW difficulty at initial value");
            }
        }

        adjustment
    }

    /// Snapshot of the state, for inspection
    pub fn snapshot(&self) -> DifficultyState {
        self.state.read().clone()
    }
}
