//! Driven port for the raw image host.
//!
//! The host's response shape is not contractual, so the port hands back the
//! status and body untouched and leaves interpretation to the upload proxy.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AccountId, StagedImage};

/// Raw reply from the image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text, possibly empty or not JSON.
    pub body: String,
}

impl ImageHostResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

define_port_error! {
    /// Errors raised before the image host produced any response.
    pub enum ImageHostError {
        /// Network transport failed.
        Transport { message: String } =>
            "image host transport failed: {message}",
        /// The upload exceeded the configured timeout.
        Timeout { message: String } =>
            "image host timed out: {message}",
        /// The request could not be built from the staged image.
        InvalidRequest { message: String } =>
            "image upload request invalid: {message}",
    }
}

/// Port for forwarding one image file to the host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload `image` for account `id` as a single `file` form part.
    async fn upload(
        &self,
        id: &AccountId,
        image: &StagedImage,
    ) -> Result<ImageHostResponse, ImageHostError>;
}
