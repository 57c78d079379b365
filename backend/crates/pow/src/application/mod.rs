//! Application Layer
//!
//! In-memory registries, the difficulty controller, the periodic task
//! runner, and the `ProofOfWorkService` that composes them.

pub mod challenge_registry;
pub mod config;
pub mod difficulty_controller;
pub mod proof_of_work;
pub mod replay_guard;
pub mod scheduler;
