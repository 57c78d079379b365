//! API DTOs (Data Transfer Objects)

use pow::ProofOfWorkChallenge;
use serde::{Deserialize, Serialize};

/// Response for GET /registration/proof-of-work
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOfWorkChallengeResponse {
    pub challenge_nonce: String,
    pub maximum_allowed_hash_value: String,
}

impl From<ProofOfWorkChallenge> for ProofOfWorkChallengeResponse {
    fn from(challenge: ProofOfWorkChallenge) -> Self {
        Self {
            challenge_nonce: challenge.challenge_nonce,
            maximum_allowed_hash_value: challenge.maximum_allowed_hash_value.to_hex(),
        }
    }
}

/// Response for POST /registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub success: bool,
}
