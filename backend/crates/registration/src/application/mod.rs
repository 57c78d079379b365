//! Application Layer - Use Cases
//!
//! The registration manager orchestrates the proof-of-work service and the
//! registration store into one admission decision.

pub mod config;
pub mod registration_manager;
