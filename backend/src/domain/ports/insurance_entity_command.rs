//! Driving port for insurance entity creation.

use async_trait::async_trait;

use crate::domain::{EntityId, Error, InsuranceDraft};

/// Use-case port for registering an insurance entity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsuranceEntityCommand: Send + Sync {
    /// Validate `draft`, create the entity, and return its identifier.
    async fn create(&self, draft: InsuranceDraft) -> Result<EntityId, Error>;
}
