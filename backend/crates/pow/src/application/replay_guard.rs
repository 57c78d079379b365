//! Replay Guard
//!
//! Remembers redeemed response nonces for as long as a challenge could still
//! be valid.

use crate::domain::services::is_well_formed_nonce;
use crate::error::{PowError, PowResult};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Recently redeemed response nonces with their redemption time
#[derive(Debug)]
pub struct ReplayGuard {
    used: Mutex<HashMap<String, i64>>,
    ttl_ms: i64,
}

impl ReplayGuard {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            used: Mutex::new(HashMap::new()),
            ttl_ms,
        }
    }

    /// Format check, replay check, then record the nonce as used
    pub fn consume(&self, response_nonce: &str, now_ms: i64) -> PowResult<()> {
        self.consume_with(response_nonce, now_ms, || Ok(()))
    }

    /// Like [`consume`](Self::consume) but records the nonce only if `admit`
    /// succeeds. The replay set stays locked while `admit` runs, so two
    /// submissions of the same nonce cannot both pass.
    pub fn consume_with<F>(&self, response_nonce: &str, now_ms: i64, admit: F) -> PowResult<()>
    where
        F: FnOnce() -> PowResult<()>,
    {
        if !is_well_formed_nonce(response_nonce) {
            return Err(PowError::InvalidResponseNonceFormat);
        }

        let key = response_nonce.to_ascii_uppercase();
        let mut used = self.used.lock();
        if used.contains_key(&key) {
            return Err(PowError::ResponseNonceReused);
        }

        admit()?;

        used.insert(key, now_ms);
        Ok(())
    }

    pub fn is_used(&self, response_nonce: &str) -> bool {
        self.used
            .lock()
            .contains_key(&response_nonce.to_ascii_uppercase())
    }

    /// Forget nonces older than the TTL; returns how many were removed
    pub fn sweep_expired(&self, now_ms: i64) -> usize {
        let mut used = self.used.lock();
        let before = used.len();
        used.retain(|_, used_at_ms| now_ms - *used_at_ms <= self.ttl_ms);
        before - used.len()
    }

    pub fn len(&self) -> usize {
        self.used.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::generate_nonce;

    const TTL_MS: i64 = 5 * 60 * 1000;

    #[test]
    fn test_format_checked_first() {
        let guard = ReplayGuard::new(TTL_MS);
        let mut admitted = false;
        let result = guard.consume_with("FFFF", 0, || {
            admitted = true;
            Ok(())
        });

        assert_eq!(result, Err(PowError::InvalidResponseNonceFormat));
        assert!(!admitted);
        assert!(guard.is_empty());
    }

    #[test]
    fn test_second_use_is_rejected() {
        let guard = ReplayGuard::new(TTL_MS);
        let nonce = generate_nonce();

        assert!(guard.consume(&nonce, 0).is_ok());
        assert_eq!(guard.consume(&nonce, 1), Err(PowError::ResponseNonceReused));
        assert_eq!(
            guard.consume(&nonce.to_lowercase(), 1),
            Err(PowError::ResponseNonceReused)
        );
    }

    #[test]
    fn test_failed_admission_does_not_record() {
        let guard = ReplayGuard::new(TTL_MS);
        let nonce = generate_nonce();

        let result = guard.consume_with(&nonce, 0, || Err(PowError::InsufficientSolutionNonce));
        assert_eq!(result, Err(PowError::InsufficientSolutionNonce));
        assert!(!guard.is_used(&nonce));
    }

    #[test]
    fn test_sweep_forgets_old_nonces() {
        let guard = ReplayGuard::new(TTL_MS);
        guard.consume(&generate_nonce(), 0).unwrap();
        guard.consume(&generate_nonce(), TTL_MS).unwrap();

        assert_eq!(guard.sweep_expired(TTL_MS + 1), 1);
        assert_eq!(guard.len(), 1);
    }
}
