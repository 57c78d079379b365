//! Proof-of-Work Service
//!
//! Issues challenges and verifies submissions against the adaptive threshold.
//! Owns the background evaluation tick and the expiry sweep.

use crate::application::challenge_registry::ChallengeRegistry;
use crate::application::config::PowConfig;
use crate::application::difficulty_controller::DifficultyController;
use crate::application::replay_guard::ReplayGuard;
use crate::application::scheduler::PeriodicTask;
use crate::domain::clock::Clock;
use crate::domain::services::verify_response_nonce;
use crate::domain::value_objects::HashValue;
use crate::error::PowResult;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

/// Output of challenge issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOfWorkChallenge {
    pub challenge_nonce: String,
    pub maximum_allowed_hash_value: HashValue,
}

/// One submission to verify
#[derive(Debug, Clone)]
pub struct ProofOfWorkSubmission {
    pub challenge_nonce: String,
    pub response_nonce: String,
    /// Canonical serialization of the payload the work authorizes
    pub bound_data: Option<Vec<u8>>,
}

pub struct ProofOfWorkService {
    config: PowConfig,
    challenges: ChallengeRegistry,
    replay_guard: ReplayGuard,
    difficulty: DifficultyController,
    clock: Arc<dyn Clock>,
    tasks: Mutex<Vec<PeriodicTask>>,
}

impl ProofOfWorkService {
    pub fn new(config: PowConfig, clock: Arc<dyn Clock>) -> PowResult<Self> {
        config.validate()?;
        let ttl_ms = config.challenge_ttl_ms();

        Ok(Self {
            difficulty: DifficultyController::new(&config, clock.clone())?,
            challenges: ChallengeRegistry::new(ttl_ms),
            replay_guard: ReplayGuard::new(ttl_ms),
            config,
            clock,
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    pub fn challenges(&self) -> &ChallengeRegistry {
        &self.challenges
    }

    pub fn replay_guard(&self) -> &ReplayGuard {
        &self.replay_guard
    }

    /// Issue a challenge together with the threshold in force right now
    pub fn issue_challenge(&self) -> ProofOfWorkChallenge {
        let challenge = self.challenges.issue(self.clock.now_ms());
        let maximum_allowed_hash_value = self.difficulty.current_maximum_allowed_hash_value();

        tracing::debug!(
            challenge_nonce = %challenge.nonce,
            maximum_allowed_hash_value = %maximum_allowed_hash_value,
            "Issued PoW challenge"
        );

        ProofOfWorkChallenge {
            challenge_nonce: challenge.nonce,
            maximum_allowed_hash_value,
        }
    }

    /// Verify a submission and redeem its challenge and response nonce
    ///
    /// Check order: response nonce format, replay, challenge validity and TTL,
    /// digest against the current threshold. Nothing is recorded unless every
    /// check passes. The solve itself is not recorded here; callers record it
    /// with [`DifficultyController::record_solve`] once they admit the request.
    ///
    /// The digest only depends on the submission, so it is computed before any
    /// lock is taken. The locked section is map lookups and inserts.
    pub fn verify(&self, submission: &ProofOfWorkSubmission) -> PowResult<()> {
        let now_ms = self.clock.now_ms();
        let threshold = self.difficulty.current_maximum_allowed_hash_value().as_u256();
        let qualification = verify_response_nonce(
            &submission.challenge_nonce,
            &submission.response_nonce,
            submission.bound_data.as_deref(),
            threshold,
        );

        let result = self
            .replay_guard
            .consume_with(&submission.response_nonce, now_ms, || {
                self.challenges
                    .redeem_with(&submission.challenge_nonce, now_ms, |_| qualification)
                    .map(|_| ())
            });

        match &result {
            Ok(()) => tracing::debug!(
                challenge_nonce = %submission.challenge_nonce,
                "PoW verification successful"
            ),
            Err(e) => tracing::warn!(
                challenge_nonce = %submission.challenge_nonce,
                error = %e,
                "PoW verification failed"
            ),
        }

        result
    }

    /// Remove expired challenges and forget expired response nonces
    pub fn sweep_expired(&self) -> (usize, usize) {
        let now_ms = self.clock.now_ms();
        let challenges = self.challenges.sweep_expired(now_ms);
        let nonces = self.replay_guard.sweep_expired(now_ms);

        tracing::debug!(
            challenges_removed = challenges,
            nonces_removed = nonces,
            "Swept expired PoW state"
        );

        (challenges, nonces)
    }

    /// Start the difficulty evaluation tick and the expiry sweep
    ///
    /// Calling `start` on a running service does nothing.
    pub async fn start(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            tracing::debug!("PoW background tasks already running");
            return;
        }

        let service: Weak<Self> = Arc::downgrade(self);
        tasks.push(PeriodicTask::spawn(
            "pow-difficulty-evaluation",
            self.config.difficulty_evaluation_interval,
            move || {
                if let Some(service) = service.upgrade() {
                    service.difficulty.evaluate();
                }
            },
        ));

        let service: Weak<Self> = Arc::downgrade(self);
        tasks.push(PeriodicTask::spawn(
            "pow-expiry-sweep",
            self.config.sweep_interval(),
            move || {
                if let Some(service) = service.upgrade() {
                    service.sweep_expired();
                }
            },
        ));
    }

    /// Stop and join the background tasks
    pub async fn stop(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            tracing::debug!(task = task.name(), "Stopping PoW background task");
            task.stop().await;
        }
    }

    pub async fn is_running(&self) -> bool {
        !self.tasks.lock().await.is_empty()
    }
}
