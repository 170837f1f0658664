//! Driven port for the remote entity registry.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{EntityId, InsuranceEntityRequest};

define_port_error! {
    /// Errors surfaced while creating an entity.
    pub enum EntitiesApiError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "entity backend transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } =>
            "entity backend timed out: {message}",
        /// The backend answered with a non-success status.
        Rejected { status: u16, message: Option<String> } =>
            "entity backend rejected request with status {status}",
        /// The response carried no `result.id`.
        MissingId { body: String } =>
            "entity backend response carried no id",
    }
}

impl EntitiesApiError {
    /// Backend-supplied message, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Port for registering entities with the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitiesApi: Send + Sync {
    /// Create one insurance entity and return its identifier.
    async fn create_insurance(
        &self,
        request: &InsuranceEntityRequest,
    ) -> Result<EntityId, EntitiesApiError>;
}
