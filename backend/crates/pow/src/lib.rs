//! PoW (Proof of Work) Admission Primitives
//!
//! Clean Architecture structure:
//! - `domain/` - Hashing codec, entities, difficulty control law, clock
//! - `application/` - Challenge registry, replay guard, difficulty controller,
//!   and the `ProofOfWorkService` that composes them
//!
//! ## Security Model
//! - The server is the sole authority for challenges, difficulty and verification
//! - A challenge is single-use and expires after its TTL
//! - A response nonce can be redeemed once; replays are rejected
//! - The work is bound to the payload it authorizes, so a solved nonce cannot
//!   be moved to another payload
//! - Difficulty adapts to the observed solve rate, independently of traffic

pub mod application;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use application::config::PowConfig;
pub use application::difficulty_controller::DifficultyController;
pub use application::proof_of_work::{ProofOfWorkChallenge, ProofOfWorkService, ProofOfWorkSubmission};
pub use domain::clock::{Clock, ManualClock, SystemClock};
pub use domain::value_objects::HashValue;
pub use error::{PowError, PowResult};
pub use primitive_types::U256;

pub mod crypto {
    //! Hashing and nonce primitives shared with callers that bind payloads
    pub use crate::domain::services::*;
}
