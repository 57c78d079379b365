//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Challenge, SolveEvent)
//! - Domain value objects (HashValue)
//! - Domain services (digest computation and verification)
//! - The difficulty control law
//! - The clock abstraction

pub mod clock;
pub mod difficulty;
pub mod entities;
pub mod services;
pub mod value_objects;
