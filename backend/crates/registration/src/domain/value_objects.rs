//! Domain Value Objects

use crate::error::{RegistrationError, RegistrationResult};
use pow::crypto::sha256_hex;
use serde::{Deserialize, Serialize};

/// Terms of service text together with its content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsOfService {
    text: String,
    hash: String,
}

impl TermsOfService {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = sha256_hex(text.as_bytes());
        Self { text, hash }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Uppercase hex SHA-256 of the text
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Payload a proof-of-work authorizes
///
/// Field order is part of the canonical serialization clients hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    pub did: String,
    pub terms_of_service_hash: String,
}

impl RegistrationData {
    pub fn new(did: impl Into<String>, terms_of_service_hash: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            terms_of_service_hash: terms_of_service_hash.into(),
        }
    }

    /// Compact JSON: `{"did":"..","termsOfServiceHash":".."}`
    pub fn canonical_bytes(&self) -> RegistrationResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RegistrationError::Internal(e.to_string()))
    }
}
