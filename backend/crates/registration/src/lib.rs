//! Tenant Registration Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and tenant gate traits
//! - `application/` - The registration manager
//! - `infra/` - PostgreSQL and in-memory registration stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Admission Model
//! - A tenant registers by solving a proof-of-work bound to its DID and the
//!   hash of the terms of service it agrees to
//! - A tenant is active while its stored terms-of-service hash equals the
//!   current one; replacing the terms re-gates every tenant without touching
//!   the store
//! - The tenant gate fails closed

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::RegistrationConfig;
pub use application::registration_manager::{ProofOfWorkResponse, RegistrationManager, RegistrationRequest};
pub use domain::tenant_gate::{AllowAllTenantGate, TenantGate};
pub use error::{RegistrationError, RegistrationResult};
pub use infra::memory::InMemoryTenantRepository;
pub use infra::postgres::PgTenantRepository;
pub use presentation::router::registration_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::PgTenantRepository as RegistrationStore;
}
