//! Domain Entities

/// Persisted admission record of one tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRegistration {
    pub did: String,
    pub terms_of_service_hash: Option<String>,
    /// Unix milliseconds of the last accepted proof-of-work
    pub pow_time_ms: Option<i64>,
}

/// Outcome of a tenant gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantStatus {
    Active,
    NotRegistered,
    /// Registered under terms of service that have since been replaced
    OutdatedTermsOfService,
}

impl TenantStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TenantStatus::Active)
    }

    pub fn detail(&self) -> &'static str {
        match self {
            TenantStatus::Active => "Active tenant.",
            TenantStatus::NotRegistered => "Not a registered tenant.",
            TenantStatus::OutdatedTermsOfService => "Agreed terms-of-service is outdated.",
        }
    }
}
