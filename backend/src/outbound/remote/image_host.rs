//! Reqwest-backed image host adapter.
//!
//! Sends one multipart `file` part and returns the host's status and body
//! as-is. Non-2xx replies are not errors here; the upload proxy decides.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use url::Url;

use super::client::{RemoteClient, RemoteClientError};
use crate::domain::ports::{ImageHost, ImageHostError, ImageHostResponse};
use crate::domain::{AccountId, StagedImage};

/// Multipart field name the host expects.
pub const FILE_PART: &str = "file";

/// Image host adapter posting to `/api/ImageUploadExternal/upload/{id}`.
///
/// The exposed proxy route speaks the same contract, so `base` may point at
/// a deployed proxy instead of the raw host.
pub struct HttpImageHost {
    remote: RemoteClient,
}

impl HttpImageHost {
    /// Build an adapter against `base` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed or `base`
    /// cannot carry a path.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, RemoteClientError> {
        Ok(Self {
            remote: RemoteClient::new(base, timeout)?,
        })
    }
}

fn file_part(image: &StagedImage) -> Result<Part, ImageHostError> {
    let part = Part::bytes(image.bytes().to_vec()).file_name(image.file_name().to_owned());
    match image.content_type() {
        Some(mime) => part.mime_str(mime).map_err(|err| {
            ImageHostError::invalid_request(format!("unsupported content type {mime}: {err}"))
        }),
        None => Ok(part),
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(
        &self,
        id: &AccountId,
        image: &StagedImage,
    ) -> Result<ImageHostResponse, ImageHostError> {
        let url = self
            .remote
            .endpoint(["api", "ImageUploadExternal", "upload", id.as_str()]);
        let form = Form::new().part(FILE_PART, file_part(image)?);
        let response = self
            .remote
            .http()
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;
        Ok(ImageHostResponse { status, body })
    }
}

fn map_transport_error(error: reqwest::Error) -> ImageHostError {
    if error.is_timeout() {
        ImageHostError::timeout(error.to_string())
    } else {
        ImageHostError::transport(error.to_string())
    }
}
