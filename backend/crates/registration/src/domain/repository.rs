//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entities::TenantRegistration;
use crate::error::RegistrationResult;

/// Tenant registration store
///
/// There is no delete: revocation happens through terms-of-service mismatch.
#[trait_variant::make(TenantRegistrationRepository: Send)]
pub trait LocalTenantRegistrationRepository {
    /// Insert the tenant if absent, otherwise overwrite the supplied fields
    /// and keep the others
    async fn upsert(
        &self,
        did: &str,
        terms_of_service_hash: Option<&str>,
        pow_time_ms: Option<i64>,
    ) -> RegistrationResult<()>;

    /// Get the registration of a tenant
    async fn get(&self, did: &str) -> RegistrationResult<Option<TenantRegistration>>;
}
