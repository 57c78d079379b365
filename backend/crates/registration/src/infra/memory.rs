//! In-memory Repository Implementation
//!
//! Used when no database is configured, and by tests.

use crate::domain::entities::TenantRegistration;
use crate::domain::repository::TenantRegistrationRepository;
use crate::error::RegistrationResult;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryTenantRepository {
    tenants: RwLock<HashMap<String, TenantRegistration>>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tenants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TenantRegistrationRepository for InMemoryTenantRepository {
    async fn upsert(
        &self,
        did: &str,
        terms_of_service_hash: Option<&str>,
        pow_time_ms: Option<i64>,
    ) -> RegistrationResult<()> {
        let mut tenants = self.tenants.write();
        let entry = tenants
            .entry(did.to_string())
            .or_insert_with(|| TenantRegistration {
                did: did.to_string(),
                terms_of_service_hash: None,
                pow_time_ms: None,
            });

        if let Some(hash) = terms_of_service_hash {
            entry.terms_of_service_hash = Some(hash.to_string());
        }
        if let Some(pow_time_ms) = pow_time_ms {
            entry.pow_time_ms = Some(pow_time_ms);
        }

        Ok(())
    }

    async fn get(&self, did: &str) -> RegistrationResult<Option<TenantRegistration>> {
        Ok(self.tenants.read().get(did).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_inserts_then_overwrites_supplied_fields() {
        let repo = InMemoryTenantRepository::new();

        repo.upsert("did:example:alice", Some("H1"), Some(1)).await.unwrap();
        repo.upsert("did:example:alice", Some("H2"), None).await.unwrap();

        let record = repo.get("did:example:alice").await.unwrap().unwrap();
        assert_eq!(record.terms_of_service_hash.as_deref(), Some("H2"));
        assert_eq!(record.pow_time_ms, Some(1));

        repo.upsert("did:example:alice", None, Some(2)).await.unwrap();
        let record = repo.get("did:example:alice").await.unwrap().unwrap();
        assert_eq!(record.terms_of_service_hash.as_deref(), Some("H2"));
        assert_eq!(record.pow_time_ms, Some(2));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let repo = InMemoryTenantRepository::new();
        assert!(repo.get("did:example:nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_upserts_for_different_tenants() {
        let repo = std::sync::Arc::new(InMemoryTenantRepository::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.upsert(&format!("did:example:{i}"), Some("H"), Some(i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(repo.len(), 16);
    }
}
