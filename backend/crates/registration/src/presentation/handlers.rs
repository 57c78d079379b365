//! HTTP Handlers

use crate::application::registration_manager::{RegistrationManager, RegistrationRequest};
use crate::domain::repository::TenantRegistrationRepository;
use crate::error::{RegistrationError, RegistrationResult};
use crate::presentation::dto::{ProofOfWorkChallengeResponse, RegistrationResponse};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Shared state for registration handlers
pub struct RegistrationAppState<R>
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    pub manager: Arc<RegistrationManager<R>>,
}

impl<R> Clone for RegistrationAppState<R>
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

/// GET /registration/proof-of-work
pub async fn get_proof_of_work_challenge<R>(
    State(state): State<RegistrationAppState<R>>,
) -> Json<ProofOfWorkChallengeResponse>
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    Json(state.manager.get_proof_of_work_challenge().into())
}

/// GET /registration/terms-of-service
pub async fn get_terms_of_service<R>(State(state): State<RegistrationAppState<R>>) -> Response
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    match state.manager.get_terms_of_service() {
        Some(text) => text.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /registration
pub async fn register_tenant<R>(
    State(state): State<RegistrationAppState<R>>,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> RegistrationResult<Json<RegistrationResponse>>
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    let Json(request) = body.map_err(|e| RegistrationError::InvalidRequest(e.body_text()))?;

    state.manager.handle_registration_request(request).await?;

    Ok(Json(RegistrationResponse { success: true }))
}
