//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (TenantRegistration, TenantStatus)
//! - Domain value objects (TermsOfService, RegistrationData)
//! - Repository traits (interfaces)
//! - The tenant gate capability

pub mod entities;
pub mod repository;
pub mod tenant_gate;
pub mod value_objects;
