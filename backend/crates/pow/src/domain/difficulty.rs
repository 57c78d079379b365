//! Adaptive Difficulty Control Law
//!
//! **IMPORTANT**: the maximum allowed hash value is a CEILING:
//! - HIGHER value = EASIER (more digests qualify)
//! - LOWER value = HARDER (fewer digests qualify)
//!
//! When solves arrive faster than desired, the ceiling is LOWERED in
//! proportion to the overshoot, a fraction per evaluation so the full step is
//! spread over about one minute. Once the rate is back at or below the
//! desired rate, the ceiling ramps linearly back to its initial value over a
//! fixed recovery period, regardless of how far it had drifted.
//!
//! All arithmetic is on unsigned 256-bit integers. Ratios go through an
//! explicit multiply-then-divide with [`RATIO_SCALE`], widened to 512 bits so
//! the multiplication cannot overflow.

use crate::domain::entities::SolveEvent;
use crate::error::{PowError, PowResult};
use primitive_types::{U256, U512};

/// Fixed-point scale applied to the solve-rate ratio
pub const RATIO_SCALE: u64 = 1_000_000;

/// Result of one evaluation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyAdjustment {
    /// Ceiling lowered (difficulty increased)
    Tightened {
        previous: U256,
        current: U256,
        solve_rate: u64,
    },
    /// Ceiling raised toward the initial value (difficulty decreased)
    Loosened {
        previous: U256,
        current: U256,
        solve_rate: u64,
    },
    /// Already at the initial value
    Unchanged { current: U256, solve_rate: u64 },
}

impl DifficultyAdjustment {
    pub fn current(&self) -> U256 {
        match self {
            DifficultyAdjustment::Tightened { current, .. }
            | DifficultyAdjustment::Loosened { current, .. }
            | DifficultyAdjustment::Unchanged { current, .. } => *current,
        }
    }

    pub fn solve_rate(&self) -> u64 {
        match self {
            DifficultyAdjustment::Tightened { solve_rate, .. }
            | DifficultyAdjustment::Loosened { solve_rate, .. }
            | DifficultyAdjustment::Unchanged { solve_rate, .. } => *solve_rate,
        }
    }
}

/// Difficulty state mutated once per evaluation tick
///
/// Invariant: `1 <= current <= initial`.
#[derive(Debug, Clone)]
pub struct DifficultyState {
    current: U256,
    initial: U256,
    desired_solve_rate_per_minute: u64,
    evaluations_per_minute: u64,
    recovery_ticks: u64,
    solve_window_ms: i64,
    solve_events: Vec<SolveEvent>,
    pending_increment: Option<U256>,
}

impl DifficultyState {
    pub fn new(
        initial_maximum_allowed_hash_value: U256,
        desired_solve_rate_per_minute: u64,
        evaluations_per_minute: u64,
        recovery_ticks: u64,
        solve_window_ms: i64,
    ) -> PowResult<Self> {
        if initial_maximum_allowed_hash_value.is_zero() {
            return Err(PowError::InvalidConfig(
                "initial maximum allowed hash value must be at least 1".into(),
            ));
        }
        if desired_solve_rate_per_minute == 0 {
            return Err(PowError::InvalidConfig(
                "desired solve rate per minute must be at least 1".into(),
            ));
        }
        if evaluations_per_minute == 0 || recovery_ticks == 0 || solve_window_ms <= 0 {
            return Err(PowError::InvalidConfig(
                "evaluation frequency, recovery period and solve window must be positive".into(),
            ));
        }

        Ok(Self {
            current: initial_maximum_allowed_hash_value,
            initial: initial_maximum_allowed_hash_value,
            desired_solve_rate_per_minute,
            evaluations_per_minute,
            recovery_ticks,
            solve_window_ms,
            solve_events: Vec::new(),
            pending_increment: None,
        })
    }

    pub fn current_maximum_allowed_hash_value(&self) -> U256 {
        self.current
    }

    pub fn initial_maximum_allowed_hash_value(&self) -> U256 {
        self.initial
    }

    pub fn desired_solve_rate_per_minute(&self) -> u64 {
        self.desired_solve_rate_per_minute
    }

    pub fn pending_increment(&self) -> Option<U256> {
        self.pending_increment
    }

    /// Solve events currently held in the window (stale ones included until
    /// the next evaluation)
    pub fn solve_count(&self) -> usize {
        self.solve_events.len()
    }

    pub fn record_solve(&mut self, id: impl Into<String>, now_ms: i64) {
        self.solve_events.push(SolveEvent::new(id, now_ms));
    }

    /// Run one evaluation tick at `now_ms`
    pub fn evaluate(&mut self, now_ms: i64) -> DifficultyAdjustment {
        let window = self.solve_window_ms;
        self.solve_events
            .retain(|event| now_ms - event.solved_at_ms <= window);

        let solve_rate = self.solve_events.len() as u64;
        let previous = self.current;

        if solve_rate > self.desired_solve_rate_per_minute {
            // A new tightening phase invalidates any recovery ramp.
            self.pending_increment = None;
            self.current = self.tightened(solve_rate);
            return DifficultyAdjustment::Tightened {
                previous,
                current: self.current,
                solve_rate,
            };
        }

        if self.current >= self.initial {
            return DifficultyAdjustment::Unchanged {
                current: self.current,
                solve_rate,
            };
        }

        let increment = match self.pending_increment {
            Some(increment) => increment,
            None => {
                let increment = self.recovery_increment();
                self.pending_increment = Some(increment);
                increment
            }
        };

        self.current = self.current.saturating_add(increment).min(self.initial);

        DifficultyAdjustment::Loosened {
            previous,
            current: self.current,
            solve_rate,
        }
    }

    /// Next ceiling during a tightening phase
    ///
    /// The one-step target divides the current ceiling by the overshoot ratio
    /// `solve_rate / desired`; only `1 / evaluations_per_minute` of the gap is
    /// applied per tick. The ceiling always drops by at least 1 (unless it is
    /// already 1) and never below 1.
    fn tightened(&self, solve_rate: u64) -> U256 {
        let scaled_ratio = U256::from(solve_rate).full_mul(U256::from(RATIO_SCALE))
            / U512::from(self.desired_solve_rate_per_minute);

        let target = self.current.full_mul(U256::from(RATIO_SCALE)) / scaled_ratio;
        let target = U256::try_from(target).unwrap_or(self.current).min(self.current);

        let delta = self.current - target;
        let mut step = delta / U256::from(self.evaluations_per_minute);
        if step.is_zero() && self.current > U256::one() {
            step = U256::one();
        }

        self.current.saturating_sub(step).max(U256::one())
    }

    /// Per-tick increment that brings the ceiling back to `initial` within
    /// `recovery_ticks` ticks
    ///
    /// Rounded up, so it is not bit-identical to a floor-division
    /// `(initial - current) / ticks` computed elsewhere.
    fn recovery_increment(&self) -> U256 {
        let ticks = U256::from(self.recovery_ticks);
        let (quotient, remainder) = (self.initial - self.current).div_mod(ticks);
        if remainder.is_zero() {
            quotient
        } else {
            quotient + U256::one()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE_MS: i64 = 60_000;
    const TICK_MS: i64 = 10_000;

    fn easy() -> U256 {
        U256::MAX >> 8
    }

    fn state(desired: u64) -> DifficultyState {
        DifficultyState::new(easy(), desired, 6, 60, MINUTE_MS).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_configuration() {
        assert!(DifficultyState::new(U256::zero(), 10, 6, 60, MINUTE_MS).is_err());
        assert!(DifficultyState::new(easy(), 0, 6, 60, MINUTE_MS).is_err());
        assert!(DifficultyState::new(easy(), 10, 0, 60, MINUTE_MS).is_err());
    }

    #[test]
    fn test_idle_at_initial_is_unchanged() {
        let mut s = state(10);
        let adjustment = s.evaluate(TICK_MS);
        assert_eq!(
            adjustment,
            DifficultyAdjustment::Unchanged {
                current: easy(),
                solve_rate: 0
            }
        );
    }

    #[test]
    fn test_rate_at_desired_does_not_tighten() {
        let mut s = state(10);
        for i in 0..10 {
            s.record_solve(format!("{i}"), 0);
        }
        assert!(matches!(
            s.evaluate(TICK_MS),
            DifficultyAdjustment::Unchanged { solve_rate: 10, .. }
        ));
    }

    #[test]
    fn test_tightening_applies_fraction_of_one_step_target() {
        let mut s = state(10);
        for i in 0..20 {
            s.record_solve(format!("{i}"), 0);
        }

        // Overshoot 2x: one-step target is half, a sixth of the gap per tick.
        let current = easy();
        let expected = current - (current - current / 2) / 6;
        assert_eq!(s.evaluate(TICK_MS).current(), expected);
    }

    #[test]
    fn test_solves_leave_window_after_one_minute() {
        let mut s = state(1);
        s.record_solve("a", 0);
        s.record_solve("b", 0);

        assert!(matches!(s.evaluate(MINUTE_MS), DifficultyAdjustment::Tightened { .. }));
        assert_eq!(s.evaluate(MINUTE_MS + 1).solve_rate(), 0);
        assert_eq!(s.solve_count(), 0);
    }

    #[test]
    fn test_tightening_never_goes_below_one() {
        let mut s = DifficultyState::new(U256::from(3u64), 1, 6, 60, MINUTE_MS).unwrap();
        for i in 0..1_000 {
            s.record_solve(format!("{i}"), 0);
        }
        for tick in 0..5 {
            s.evaluate(tick);
        }
        assert_eq!(s.current_maximum_allowed_hash_value(), U256::one());

        // Still clamped under continued load.
        assert_eq!(s.evaluate(6).current(), U256::one());
    }

    #[test]
    fn test_recovery_returns_exactly_to_initial_in_ten_minutes() {
        let mut s = state(10);
        for i in 0..100 {
            s.record_solve(format!("{i}"), 0);
        }
        for tick in 1..=6 {
            s.evaluate(tick * TICK_MS);
        }
        let tightened = s.current_maximum_allowed_hash_value();
        assert!(tightened < easy());

        // Window empty from here on: 60 ticks of recovery.
        let start = 10 * MINUTE_MS;
        let mut previous = tightened;
        for tick in 0..60 {
            let current = s.evaluate(start + tick * TICK_MS).current();
            assert!(current > previous || current == easy());
            previous = current;
        }
        assert_eq!(s.current_maximum_allowed_hash_value(), easy());

        assert!(matches!(
            s.evaluate(start + 60 * TICK_MS),
            DifficultyAdjustment::Unchanged { .. }
        ));
    }

    #[test]
    fn test_recovery_honors_tick_count() {
        let mut s = DifficultyState::new(easy(), 1, 6, 9, MINUTE_MS).unwrap();
        s.record_solve("a", 0);
        s.record_solve("b", 0);
        s.evaluate(TICK_MS);
        assert!(s.current_maximum_allowed_hash_value() < easy());

        let start = 2 * MINUTE_MS;
        for tick in 0..8 {
            s.evaluate(start + tick * TICK_MS);
            assert!(s.current_maximum_allowed_hash_value() < easy());
        }
        s.evaluate(start + 8 * TICK_MS);
        assert_eq!(s.current_maximum_allowed_hash_value(), easy());
    }

    #[test]
    fn test_tightening_resets_pending_increment() {
        let mut s = state(1);
        s.record_solve("a", 0);
        s.record_solve("b", 0);
        s.evaluate(TICK_MS);
        s.evaluate(2 * MINUTE_MS);
        assert!(s.pending_increment().is_some());

        s.record_solve("c", 2 * MINUTE_MS);
        s.record_solve("d", 2 * MINUTE_MS);
        s.evaluate(2 * MINUTE_MS + TICK_MS);
        assert!(s.pending_increment().is_none());
    }
}
