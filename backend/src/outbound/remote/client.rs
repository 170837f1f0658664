//! Shared reqwest plumbing for the remote backend adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Failure building an adapter.
#[derive(Debug, Error)]
pub enum RemoteClientError {
    /// The reqwest client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    /// The base URL cannot have path segments appended.
    #[error("base url {url} cannot be used as a base")]
    InvalidBase { url: String },
}

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub(crate) struct RemoteClient {
    client: Client,
    base: Url,
}

impl RemoteClient {
    pub(crate) fn new(base: Url, timeout: Duration) -> Result<Self, RemoteClientError> {
        if base.cannot_be_a_base() {
            return Err(RemoteClientError::InvalidBase {
                url: base.to_string(),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// `base` with `segments` appended, each percent-encoded.
    pub(crate) fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Human-readable reason from an error body.
///
/// Prefers a JSON `message`, `error` or `title` string, then the compacted
/// body text, then the status reason phrase.
pub(crate) fn backend_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) {
        let named = ["message", "error", "title"].into_iter().find_map(|key| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
        });
        if let Some(text) = named {
            return text.to_owned();
        }
    }
    let preview = body_preview(body);
    if !preview.is_empty() {
        return preview;
    }
    status
        .canonical_reason()
        .map_or_else(|| format!("status {}", status.as_u16()), str::to_owned)
}

/// JSON `message` string of an error body, if present.
pub(crate) fn json_message(body: &[u8]) -> Option<String> {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return None;
    };
    fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Whitespace-compacted body text capped for logs and error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 200;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
        format!("{preview}...")
    } else {
        compact
    }
}
