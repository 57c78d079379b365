//! Registration Router

use crate::application::registration_manager::RegistrationManager;
use crate::domain::repository::TenantRegistrationRepository;
use crate::presentation::handlers::{self, RegistrationAppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the registration router for any repository implementation
pub fn registration_router<R>(manager: Arc<RegistrationManager<R>>) -> Router
where
    R: TenantRegistrationRepository + Send + Sync + 'static,
{
    let state = RegistrationAppState { manager };

    Router::new()
        .route(
            "/registration/proof-of-work",
            get(handlers::get_proof_of_work_challenge::<R>),
        )
        .route(
            "/registration/terms-of-service",
            get(handlers::get_terms_of_service::<R>),
        )
        .route("/registration", post(handlers::register_tenant::<R>))
        .with_state(state)
}
