//! PoW Error Types

use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// PoW-specific error variants
///
/// The first four variants are request validation failures and carry a
/// machine-readable [`code`](PowError::code). The remaining variants describe
/// misconfiguration and never originate from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowError {
    /// Challenge nonce unknown, already redeemed, or past its TTL
    #[error("Challenge nonce is invalid or has expired")]
    InvalidOrExpiredChallenge,

    /// Response nonce is not a 64 character hex string
    #[error("Response nonce must be a 64 character hex string")]
    InvalidResponseNonceFormat,

    /// Response nonce was already redeemed
    #[error("Response nonce has already been used")]
    ResponseNonceReused,

    /// Digest exceeds the current maximum allowed hash value
    #[error("Response nonce does not satisfy the current difficulty")]
    InsufficientSolutionNonce,

    /// Hash value is not 1 to 64 hex characters
    #[error("Invalid hash value: {0}")]
    InvalidHashValue(String),

    /// Configuration rejected by validation
    #[error("Invalid PoW configuration: {0}")]
    InvalidConfig(String),
}

impl PowError {
    /// Machine-readable code for request validation failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            PowError::InvalidOrExpiredChallenge => Some("InvalidOrExpiredChallenge"),
            PowError::InvalidResponseNonceFormat => Some("InvalidResponseNonceFormat"),
            PowError::ResponseNonceReused => Some("ResponseNonceReused"),
            PowError::InsufficientSolutionNonce => Some("InsufficientSolutionNonce"),
            PowError::InvalidHashValue(_) | PowError::InvalidConfig(_) => None,
        }
    }

    /// Whether the error was caused by the submitted proof-of-work
    pub fn is_client_error(&self) -> bool {
        self.code().is_some()
    }
}
