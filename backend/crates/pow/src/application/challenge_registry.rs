//! Challenge Registry
//!
//! Per-challenge lifecycle: `Issued -> {Consumed | Expired}`.

use crate::domain::entities::Challenge;
use crate::domain::services::generate_nonce;
use crate::error::{PowError, PowResult};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Live challenges keyed by nonce
#[derive(Debug)]
pub struct ChallengeRegistry {
    challenges: Mutex<HashMap<String, Challenge>>,
    ttl_ms: i64,
}

impl ChallengeRegistry {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            challenges: Mutex::new(HashMap::new()),
            ttl_ms,
        }
    }

    /// Issue and record a fresh challenge
    pub fn issue(&self, now_ms: i64) -> Challenge {
        let challenge = Challenge::new(generate_nonce(), now_ms);
        self.challenges
            .lock()
            .insert(challenge.nonce.clone(), challenge.clone());
        challenge
    }

    /// Check that the challenge is known and within its TTL
    pub fn validate(&self, challenge_nonce: &str, now_ms: i64) -> PowResult<()> {
        let challenges = self.challenges.lock();
        match challenges.get(challenge_nonce) {
            Some(challenge) if !challenge.is_expired(now_ms, self.ttl_ms) => Ok(()),
            _ => Err(PowError::InvalidOrExpiredChallenge),
        }
    }

    /// Validate the challenge, run `verify`, and consume the challenge only if
    /// `verify` succeeds; all under one lock so a challenge is redeemed once
    pub fn redeem_with<F>(&self, challenge_nonce: &str, now_ms: i64, verify: F) -> PowResult<Challenge>
    where
        F: FnOnce(&Challenge) -> PowResult<()>,
    {
        let mut challenges = self.challenges.lock();
        let challenge = match challenges.get(challenge_nonce) {
            Some(challenge) if !challenge.is_expired(now_ms, self.ttl_ms) => challenge,
            _ => return Err(PowError::InvalidOrExpiredChallenge),
        };

        verify(challenge)?;

        challenges
            .remove(challenge_nonce)
            .ok_or(PowError::InvalidOrExpiredChallenge)
    }

    /// Remove expired challenges; returns how many were removed
    pub fn sweep_expired(&self, now_ms: i64) -> usize {
        let mut challenges = self.challenges.lock();
        let before = challenges.len();
        challenges.retain(|_, challenge| !challenge.is_expired(now_ms, self.ttl_ms));
        before - challenges.len()
    }

    pub fn len(&self) -> usize {
        self.challenges.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL_MS: i64 = 5 * 60 * 1000;

    #[test]
    fn test_issue_then_validate() {
        let registry = ChallengeRegistry::new(TTL_MS);
        let challenge = registry.issue(0);

        assert_eq!(challenge.nonce.len(), 64);
        assert!(registry.validate(&challenge.nonce, TTL_MS).is_ok());
        assert_eq!(
            registry.validate(&challenge.nonce, TTL_MS + 1),
            Err(PowError::InvalidOrExpiredChallenge)
        );
        assert_eq!(
            registry.validate("unknown", 0),
            Err(PowError::InvalidOrExpiredChallenge)
        );
    }

    #[test]
    fn test_redeem_consumes_only_on_success() {
        let registry = ChallengeRegistry::new(TTL_MS);
        let challenge = registry.issue(0);

        let failed = registry.redeem_with(&challenge.nonce, 1, |_| Err(PowError::InsufficientSolutionNonce));
        assert_eq!(failed, Err(PowError::InsufficientSolutionNonce));
        assert!(registry.validate(&challenge.nonce, 1).is_ok());

        let redeemed = registry.redeem_with(&challenge.nonce, 1, |_| Ok(())).unwrap();
        assert_eq!(redeemed, challenge);
        assert_eq!(
            registry.validate(&challenge.nonce, 1),
            Err(PowError::InvalidOrExpiredChallenge)
        );
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let registry = ChallengeRegistry::new(TTL_MS);
        registry.issue(0);
        registry.issue(0);
        let fresh = registry.issue(TTL_MS);

        assert_eq!(registry.sweep_expired(TTL_MS + 1), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.validate(&fresh.nonce, TTL_MS + 1).is_ok());
    }
}
