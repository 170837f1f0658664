//! Upload proxy and response normaliser.
//!
//! The image host's reply has no fixed shape. [`UploadProxy`] forwards the
//! file and walks a prioritised probe chain over whatever comes back:
//!
//! 1. known JSON fields, in [`URL_FIELDS`] order;
//! 2. the first `http(s)://` substring of the raw text;
//! 3. a placeholder URL built from the account id, on 2xx only.
//!
//! Later tiers are progressively less trustworthy. The tier that produced the
//! URL travels with it as [`ImageUrlSource`] and is logged.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use mockable::Clock;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::ports::{
    ImageHost, ImageHostResponse, ImageUploader, ImageUrlSource, PlaceholderStyle, UploadError,
    UploadResult,
};
use crate::domain::{AccountId, StagedImage};

/// JSON fields probed for an image URL, highest priority first.
pub const URL_FIELDS: [&str; 6] = ["imageUrl", "url", "path", "image", "filePath", "fileUrl"];

static URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^"'\s]+"#).ok());

/// First probe tier that yields a URL from a raw host body.
///
/// Synthesis is not attempted here; see [`UploadProxy`].
///
/// # Examples
/// ```
/// use account_console::domain::{ImageUrlSource, probe_image_url};
///
/// let (url, source) = probe_image_url(r#"{"url":"http://x/y.png"}"#).expect("url");
/// assert_eq!(url, "http://x/y.png");
/// assert_eq!(source, ImageUrlSource::StructuredField("url".to_owned()));
///
/// let (url, source) = probe_image_url("see http://x/y.png for result").expect("url");
/// assert_eq!(url, "http://x/y.png");
/// assert_eq!(source, ImageUrlSource::TextScan);
/// ```
pub fn probe_image_url(body: &str) -> Option<(String, ImageUrlSource)> {
    probe_structured_fields(body).or_else(|| scan_text(body))
}

fn probe_structured_fields(body: &str) -> Option<(String, ImageUrlSource)> {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    URL_FIELDS.iter().find_map(|name| {
        let value = fields.get(*name)?.as_str()?.trim();
        (!value.is_empty()).then(|| {
            (
                value.to_owned(),
                ImageUrlSource::StructuredField((*name).to_owned()),
            )
        })
    })
}

fn scan_text(body: &str) -> Option<(String, ImageUrlSource)> {
    let pattern = URL_PATTERN.as_ref()?;
    pattern
        .find(body)
        .map(|found| (found.as_str().to_owned(), ImageUrlSource::TextScan))
}

/// Forwards staged images to an [`ImageHost`] and normalises the reply.
pub struct UploadProxy {
    host: Arc<dyn ImageHost>,
    clock: Arc<dyn Clock>,
    placeholder_base: Option<Url>,
}

impl UploadProxy {
    /// Build a proxy that synthesises placeholders under `placeholder_base`.
    ///
    /// Passing `None` disables the synthesis tier.
    pub fn new(
        host: Arc<dyn ImageHost>,
        clock: Arc<dyn Clock>,
        placeholder_base: Option<Url>,
    ) -> Self {
        Self {
            host,
            clock,
            placeholder_base,
        }
    }

    /// Normalise a host reply into an [`UploadResult`].
    pub fn normalise(
        &self,
        id: &AccountId,
        response: &ImageHostResponse,
        style: PlaceholderStyle,
    ) -> Result<UploadResult, UploadError> {
        if !response.is_success() {
            warn!(status = response.status, account_id = %id, "image host rejected upload");
            return Err(UploadError::rejected(response.status, response.body.as_str()));
        }

        if let Some((image_url, source)) = probe_image_url(&response.body) {
            info!(account_id = %id, %source, "image url resolved from host response");
            return Ok(UploadResult { image_url, source });
        }

        match self.synthesise(id, style) {
            Some(image_url) => {
                warn!(
                    account_id = %id,
                    source = %ImageUrlSource::Synthesized,
                    "host response carried no image url; using placeholder"
                );
                Ok(UploadResult {
                    image_url,
                    source: ImageUrlSource::Synthesized,
                })
            }
            None => Err(UploadError::no_image_url(response.body.as_str())),
        }
    }

    fn synthesise(&self, id: &AccountId, style: PlaceholderStyle) -> Option<String> {
        let base = self.placeholder_base.as_ref()?;
        let file_name = match style {
            PlaceholderStyle::Timestamped => {
                let millis = self.clock.utc().timestamp_millis();
                format!("temp-external-{id}-{millis}.jpg")
            }
            PlaceholderStyle::Stable => format!("profile-external-{id}.jpg"),
        };
        let mut url = base.clone();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().extend(["images", file_name.as_str()]);
            }
            Err(()) => return None,
        }
        Some(url.to_string())
    }
}

#[async_trait]
impl ImageUploader for UploadProxy {
    async fn upload_profile_image(
        &self,
        id: &AccountId,
        image: &StagedImage,
        style: PlaceholderStyle,
    ) -> Result<UploadResult, UploadError> {
        debug!(
            account_id = %id,
            file_name = image.file_name(),
            bytes = image.bytes().len(),
            "forwarding image to host"
        );
        let response = self.host.upload(id, image).await?;
        debug!(status = response.status, body = %response.body, "image host replied");
        self.normalise(id, &response, style)
    }
}
