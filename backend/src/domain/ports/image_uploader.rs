//! Driving port for turning a staged image into a hosted image URL.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::{ImageHostError, define_port_error};
use crate::domain::{AccountId, StagedImage};

/// Shape of the URL built when the host response yields none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `temp-external-{id}-{millis}.jpg`, unique per attempt. Used on create.
    Timestamped,
    /// `profile-external-{id}.jpg`, stable per account. Used by the proxy
    /// route and on edit.
    Stable,
}

/// Probe tier that produced an image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "tier", content = "field", rename_all = "camelCase")]
pub enum ImageUrlSource {
    /// A named field of a JSON object response.
    StructuredField(String),
    /// First URL-looking substring of the raw body.
    TextScan,
    /// Built locally from the account id; the host confirmed nothing.
    Synthesized,
}

impl fmt::Display for ImageUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuredField(field) => write!(f, "field:{field}"),
            Self::TextScan => f.write_str("text_scan"),
            Self::Synthesized => f.write_str("synthesized"),
        }
    }
}

/// Normalised outcome of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Best-effort URL of the hosted image.
    pub image_url: String,
    /// Tier that produced [`Self::image_url`].
    pub source: ImageUrlSource,
}

impl UploadResult {
    /// Whether the URL was made up rather than read from the host response.
    pub fn is_low_confidence(&self) -> bool {
        matches!(self.source, ImageUrlSource::Synthesized)
    }
}

define_port_error! {
    /// Reasons an upload produced no usable URL.
    pub enum UploadError {
        /// The host answered with a non-2xx status.
        Rejected { status: u16, body: String } =>
            "image host rejected upload with status {status}",
        /// The host answered 2xx but no tier produced a URL.
        NoImageUrl { body: String } =>
            "image host response contained no image url",
        /// The host could not be reached.
        Host { cause: ImageHostError } =>
            "{cause}",
    }
}

impl UploadError {
    /// Raw host response body, when there was one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } | Self::NoImageUrl { body } => Some(body.as_str()),
            Self::Host { .. } => None,
        }
    }
}

impl From<ImageHostError> for UploadError {
    fn from(cause: ImageHostError) -> Self {
        Self::Host { cause }
    }
}

/// Port consumed by the workflows to upload a profile image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload `image` for account `id` and normalise the host response.
    async fn upload_profile_image(
        &self,
        id: &AccountId,
        image: &StagedImage,
        style: PlaceholderStyle,
    ) -> Result<UploadResult, UploadError>;
}
