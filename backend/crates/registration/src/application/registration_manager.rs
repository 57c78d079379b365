//! Registration Manager
//!
//! Admission pipeline: terms-of-service check, proof-of-work verification
//! bound to the registration data, solve accounting, then the durable write.
//! Also the tenant gate consulted by the message-processing engine.

use crate::application::config::RegistrationConfig;
use crate::domain::entities::TenantStatus;
use crate::domain::repository::TenantRegistrationRepository;
use crate::domain::tenant_gate::TenantGate;
use crate::domain::value_objects::{RegistrationData, TermsOfService};
use crate::error::{RegistrationError, RegistrationResult};
use parking_lot::RwLock;
use pow::{Clock, ProofOfWorkChallenge, ProofOfWorkService, ProofOfWorkSubmission, SystemClock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Proof-of-work part of a registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOfWorkResponse {
    pub challenge_nonce: String,
    pub response_nonce: String,
}

/// Input for a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub registration_data: RegistrationData,
    pub proof_of_work: ProofOfWorkResponse,
}

pub struct RegistrationManager<R>
where
    R: TenantRegistrationRepository,
{
    repo: Arc<R>,
    pow: Arc<ProofOfWorkService>,
    terms_of_service: RwLock<Option<TermsOfService>>,
    clock: Arc<dyn Clock>,
}

impl<R> RegistrationManager<R>
where
    R: TenantRegistrationRepository + Send + Sync,
{
    pub fn new(
        repo: Arc<R>,
        pow: Arc<ProofOfWorkService>,
        terms_of_service: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            pow,
            terms_of_service: RwLock::new(terms_of_service.map(TermsOfService::new)),
            clock,
        }
    }

    /// Build the manager and its proof-of-work service from configuration
    pub fn from_config(
        repo: Arc<R>,
        config: RegistrationConfig,
        clock: Arc<dyn Clock>,
    ) -> RegistrationResult<Self> {
        let pow = ProofOfWorkService::new(config.pow, clock.clone())?;
        Ok(Self::new(repo, Arc::new(pow), config.terms_of_service, clock))
    }

    /// [`from_config`](Self::from_config) on the wall clock
    pub fn create(repo: Arc<R>, config: RegistrationConfig) -> RegistrationResult<Self> {
        Self::from_config(repo, config, Arc::new(SystemClock))
    }

    pub fn proof_of_work(&self) -> &Arc<ProofOfWorkService> {
        &self.pow
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Start the proof-of-work background tasks
    pub async fn start(&self) {
        self.pow.start().await;
    }

    /// Stop the proof-of-work background tasks
    pub async fn stop(&self) {
        self.pow.stop().await;
    }

    pub fn get_proof_of_work_challenge(&self) -> ProofOfWorkChallenge {
        self.pow.issue_challenge()
    }

    pub fn get_terms_of_service(&self) -> Option<String> {
        self.terms_of_service
            .read()
            .as_ref()
            .map(|tos| tos.text().to_string())
    }

    pub fn get_terms_of_service_hash(&self) -> Option<String> {
        self.terms_of_service
            .read()
            .as_ref()
            .map(|tos| tos.hash().to_string())
    }

    /// Replace the current terms of service
    ///
    /// The store is not touched. Every tenant whose stored hash differs
    /// becomes inactive on its next gate check.
    pub fn update_terms_of_service(&self, text: impl Into<String>) {
        let tos = TermsOfService::new(text);
        tracing::info!(terms_of_service_hash = %tos.hash(), "Terms of service updated");
        *self.terms_of_service.write() = Some(tos);
    }

    /// Admit a tenant
    ///
    /// Any failure returns before the solve is recorded or the store written.
    /// The response nonce is marked consumed before the durable write begins.
    pub async fn handle_registration_request(
        &self,
        request: RegistrationRequest,
    ) -> RegistrationResult<()> {
        let data = &request.registration_data;

        if data.did.trim().is_empty() {
            return Err(RegistrationError::InvalidRequest(
                "did must not be empty".into(),
            ));
        }

        if let Some(expected) = self.get_terms_of_service_hash() {
            if data.terms_of_service_hash != expected {
                return Err(RegistrationError::OutdatedOrInvalidTermsOfServiceHash);
            }
        }

        let submission = ProofOfWorkSubmission {
            challenge_nonce: request.proof_of_work.challenge_nonce.clone(),
            response_nonce: request.proof_of_work.response_nonce.clone(),
            bound_data: Some(data.canonical_bytes()?),
        };
        self.pow.verify(&submission)?;
        self.pow.difficulty().record_solve(&submission.response_nonce);

        self.repo
            .upsert(
                &data.did,
                Some(&data.terms_of_service_hash),
                Some(self.clock.now_ms()),
            )
            .await?;

        tracing::info!(did = %data.did, "Tenant registered");

        Ok(())
    }

    /// Classify a tenant; store failures are logged and classified as not
    /// registered
    pub async fn check_tenant(&self, did: &str) -> TenantStatus {
        let registration = match self.repo.get(did).await {
            Ok(Some(registration)) => registration,
            Ok(None) => return TenantStatus::NotRegistered,
            Err(e) => {
                tracing::warn!(did = %did, error = %e, "Tenant lookup failed, denying");
                return TenantStatus::NotRegistered;
            }
        };

        match self.get_terms_of_service_hash() {
            None => TenantStatus::Active,
            Some(expected) if registration.terms_of_service_hash.as_deref() == Some(expected.as_str()) => {
                TenantStatus::Active
            }
            Some(_) => TenantStatus::OutdatedTermsOfService,
        }
    }
}

impl<R> TenantGate for RegistrationManager<R>
where
    R: TenantRegistrationRepository + Send + Sync,
{
    async fn is_active_tenant(&self, did: &str) -> bool {
        let status = self.check_tenant(did).await;
        if !status.is_active() {
            tracing::debug!(did = %did, detail = status.detail(), "Tenant not active");
        }
        status.is_active()
    }
}
