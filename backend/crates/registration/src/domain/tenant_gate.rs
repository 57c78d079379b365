//! Tenant Gate
//!
//! Admission predicate the message-processing engine consults before
//! accepting tenant-scoped writes. It must be cheap, side-effect free, and
//! fail closed.

/// Tenant admission capability
#[trait_variant::make(TenantGate: Send)]
pub trait LocalTenantGate {
    async fn is_active_tenant(&self, did: &str) -> bool;
}

/// Gate that admits every tenant, for deployments without registration
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllTenantGate;

impl TenantGate for AllowAllTenantGate {
    async fn is_active_tenant(&self, _did: &str) -> bool {
        true
    }
}
