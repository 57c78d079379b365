//! Domain Entities
//!
//! Core entities for the PoW domain.

/// Challenge entity - a nonce issued to a client to anchor one PoW round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// 256-bit value rendered as 64 uppercase hex characters
    pub nonce: String,
    pub issued_at_ms: i64,
}

impl Challenge {
    pub fn new(nonce: String, issued_at_ms: i64) -> Self {
        Self {
            nonce,
            issued_at_ms,
        }
    }

    /// A challenge is expired once strictly more than `ttl_ms` has elapsed
    pub fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms - self.issued_at_ms > ttl_ms
    }
}

/// One successful verification, as seen by the difficulty controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveEvent {
    pub id: String,
    pub solved_at_ms: i64,
}

impl SolveEvent {
    pub fn new(id: impl Into<String>, solved_at_ms: i64) -> Self {
        Self {
            id: id.into(),
            solved_at_ms,
        }
    }
}
