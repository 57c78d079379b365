//! Application Configuration

use pow::PowConfig;

/// Registration application configuration
#[derive(Debug, Clone, Default)]
pub struct RegistrationConfig {
    /// Proof-of-work parameters
    pub pow: PowConfig,
    /// Terms of service text tenants must agree to, if any
    pub terms_of_service: Option<String>,
}

impl RegistrationConfig {
    pub fn with_terms_of_service(mut self, text: impl Into<String>) -> Self {
        self.terms_of_service = Some(text.into());
        self
    }
}
