//! Presentation Layer
//!
//! HTTP handlers and DTOs for the registration API.

pub mod dto;
pub mod handlers;
pub mod router;
