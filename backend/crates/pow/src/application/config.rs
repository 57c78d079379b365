//! Application Configuration
//!
//! Configuration for the PoW application layer.

use crate::domain::value_objects::HashValue;
use crate::error::{PowError, PowResult};
use primitive_types::U256;
use std::time::Duration;

/// PoW application configuration
#[derive(Debug, Clone)]
pub struct PowConfig {
    /// Challenge TTL
    pub challenge_ttl: Duration,
    /// Period of the difficulty evaluation tick
    pub difficulty_evaluation_interval: Duration,
    /// Trailing window the solve rate is measured over
    pub solve_rate_window: Duration,
    /// Time for the threshold to ramp back to its initial value once load subsides
    pub difficulty_recovery_period: Duration,
    /// Solves per minute the controller aims for
    pub desired_solve_rate_per_minute: u64,
    /// Easiest (largest) threshold, also the starting point
    pub initial_maximum_allowed_hash_value: HashValue,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            challenge_ttl: Duration::from_secs(5 * 60),
            difficulty_evaluation_interval: Duration::from_secs(10),
            solve_rate_window: Duration::from_secs(60),
            difficulty_recovery_period: Duration::from_secs(10 * 60),
            desired_solve_rate_per_minute: 10,
            // 00FFFF...FF
            initial_maximum_allowed_hash_value: HashValue::new(U256::MAX >> 8),
        }
    }
}

impl PowConfig {
    /// Override the initial threshold from a hex string
    pub fn with_initial_maximum_allowed_hash_value(mut self, hex: &str) -> PowResult<Self> {
        self.initial_maximum_allowed_hash_value = HashValue::from_hex(hex)?;
        Ok(self)
    }

    pub fn validate(&self) -> PowResult<()> {
        if self.initial_maximum_allowed_hash_value.as_u256().is_zero() {
            return Err(PowError::InvalidConfig(
                "initial maximum allowed hash value must be at least 1".into(),
            ));
        }
        if self.desired_solve_rate_per_minute == 0 {
            return Err(PowError::InvalidConfig(
                "desired solve rate per minute must be at least 1".into(),
            ));
        }
        if self.challenge_ttl.is_zero()
            || self.difficulty_evaluation_interval.is_zero()
            || self.solve_rate_window.is_zero()
            || self.difficulty_recovery_period.is_zero()
        {
            return Err(PowError::InvalidConfig("durations must be non-zero".into()));
        }
        if self.sweep_interval().is_zero() {
            return Err(PowError::InvalidConfig(
                "challenge TTL too short for an expiry sweep period".into(),
            ));
        }
        Ok(())
    }

    /// Expiry sweep period: a quarter of the challenge TTL
    pub fn sweep_interval(&self) -> Duration {
        self.challenge_ttl / 4
    }

    /// Evaluation ticks per minute (at least 1)
    pub fn evaluations_per_minute(&self) -> u64 {
        let per_minute = Duration::from_secs(60).as_millis()
            / self.difficulty_evaluation_interval.as_millis().max(1);
        (per_minute as u64).max(1)
    }

    /// Evaluation ticks in one recovery period (at least 1)
    pub fn recovery_ticks(&self) -> u64 {
        let ticks = self.difficulty_recovery_period.as_nanos()
            / self.difficulty_evaluation_interval.as_nanos().max(1);
        (ticks as u64).max(1)
    }

    pub fn challenge_ttl_ms(&self) -> i64 {
        self.challenge_ttl.as_millis() as i64
    }

    pub fn solve_rate_window_ms(&self) -> i64 {
        self.solve_rate_window.as_millis() as i64
    }
}
