//! Buffered multipart form extraction.
//!
//! Forms here are small: one JSON part plus at most one image. Parts are read
//! fully into memory with a per-part cap.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{Error, StagedImage};
use crate::outbound::remote::FILE_PART;

/// Largest accepted part, in bytes.
pub const MAX_PART_BYTES: usize = 10 * 1024 * 1024;

const FALLBACK_FILE_NAME: &str = "upload";

/// Buffered form: named text parts and the optional `file` part.
#[derive(Debug, Default)]
pub struct BufferedForm {
    parts: HashMap<String, Vec<u8>>,
    file: Option<StagedImage>,
}

impl BufferedForm {
    /// Drain `payload` into memory.
    ///
    /// A `file` part with no bytes counts as absent; browsers send one when
    /// no file was chosen.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` when the body is not valid multipart or a
    /// part exceeds [`MAX_PART_BYTES`].
    pub async fn read(mut payload: Multipart) -> Result<Self, Error> {
        let mut form = Self::default();
        while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let bytes = read_field(&mut field, &name).await?;
            if name == FILE_PART {
                if bytes.is_empty() {
                    continue;
                }
                form.file = Some(stage_file(&field, bytes)?);
            } else {
                form.parts.insert(name, bytes);
            }
        }
        Ok(form)
    }

    /// Decode the JSON part called `name`, if present.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` naming the part when it is not valid JSON
    /// for `T`.
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        let Some(bytes) = self.parts.get(name) else {
            return Ok(None);
        };
        serde_json::from_slice(bytes).map(Some).map_err(|err| {
            Error::invalid_request(format!("{name} part is not valid JSON: {err}"))
                .with_details(json!({ "part": name }))
        })
    }

    /// Decode a JSON part that must be present.
    ///
    /// # Errors
    ///
    /// As [`Self::json`], plus `invalid_request` when the part is missing.
    pub fn require_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, Error> {
        self.json(name)?.ok_or_else(|| {
            Error::invalid_request(format!("{name} part is required"))
                .with_details(json!({ "part": name }))
        })
    }

    /// Take the uploaded image, if one was sent.
    pub fn take_file(&mut self) -> Option<StagedImage> {
        self.file.take()
    }
}

async fn read_field(field: &mut Field, name: &str) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if buffer.len() + chunk.len() > MAX_PART_BYTES {
            return Err(Error::invalid_request(format!(
                "{name} part exceeds {MAX_PART_BYTES} bytes"
            ))
            .with_details(json!({ "part": name, "limit": MAX_PART_BYTES })));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

fn stage_file(field: &Field, bytes: Vec<u8>) -> Result<StagedImage, Error> {
    let file_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_owned();
    let content_type = field.content_type().map(ToString::to_string);
    StagedImage::new(file_name, content_type, bytes)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

fn malformed(err: actix_multipart::MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}
