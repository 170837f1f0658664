//! Console configuration loaded via OrthoConfig.
//!
//! Values layer defaults, an optional config file and `CONSOLE_*` environment
//! variables. Accessors validate and fill in defaults so callers never see a
//! half-configured value.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::UNKNOWN_LOGGED_IN_USER;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Errors raised while loading or interpreting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Sources could not be read or merged.
    #[error("failed to load settings: {message}")]
    Load { message: String },
    /// A URL setting did not parse.
    #[error("{field} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// The bind address did not parse.
    #[error("bind_address is not a socket address ({value}): {source}")]
    InvalidBindAddress {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A zero timeout would fail every call.
    #[error("request_timeout_seconds must be greater than zero")]
    ZeroTimeout,
}

/// Runtime settings shared by the server and the CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONSOLE")]
pub struct ConsoleSettings {
    /// Base URL of the account and entity backend.
    pub api_base_url: Option<String>,
    /// Base URL of the image host; defaults to the API base.
    pub image_host_base_url: Option<String>,
    /// Base for synthesised image URLs; defaults to the image host base.
    pub placeholder_image_base_url: Option<String>,
    /// Per-request timeout for outbound calls.
    pub request_timeout_seconds: Option<u64>,
    /// Listen address for the HTTP server.
    pub bind_address: Option<String>,
    /// `loggedInUser` sent with insurance entities when the form names nobody.
    pub logged_in_user: Option<String>,
    /// Build a placeholder URL when a 2xx upload response yields none.
    pub synthesize_placeholder_urls: Option<bool>,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

impl ConsoleSettings {
    /// Load settings from the environment and config file only.
    ///
    /// `program` stands in for `argv[0]`; command-line flags belong to the
    /// calling binary, not to the settings layer.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] when a source is malformed.
    pub fn load_without_args(program: &str) -> Result<Self, SettingsError> {
        Self::load_from_iter([std::ffi::OsString::from(program)]).map_err(|err| {
            SettingsError::Load {
                message: err.to_string(),
            }
        })
    }

    /// Account and entity backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value does not parse.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "api_base_url",
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
        )
    }

    /// Image host base URL, falling back to [`Self::api_base_url`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when either value does not parse.
    pub fn image_host_base_url(&self) -> Result<Url, SettingsError> {
        match self.image_host_base_url.as_deref() {
            Some(value) => parse_url("image_host_base_url", value),
            None => self.api_base_url(),
        }
    }

    /// Base for synthesised URLs, or `None` when synthesis is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when a configured value does not
    /// parse.
    pub fn placeholder_base_url(&self) -> Result<Option<Url>, SettingsError> {
        if !self.synthesize_placeholder_urls() {
            return Ok(None);
        }
        match self.placeholder_image_base_url.as_deref() {
            Some(value) => parse_url("placeholder_image_base_url", value).map(Some),
            None => self.image_host_base_url().map(Some),
        }
    }

    /// Whether the synthesis tier is enabled; on unless set to `false`.
    pub fn synthesize_placeholder_urls(&self) -> bool {
        self.synthesize_placeholder_urls.unwrap_or(true)
    }

    /// Outbound request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero value.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS) {
            0 => Err(SettingsError::ZeroTimeout),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    /// Server listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddress`] when the value does not
    /// parse.
    pub fn bind_address(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddress {
                value: value.to_owned(),
                source,
            })
    }

    /// Fallback `loggedInUser` for insurance entities.
    pub fn logged_in_user(&self) -> &str {
        self.logged_in_user
            .as_deref()
            .filter(|user| !user.trim().is_empty())
            .unwrap_or(UNKNOWN_LOGGED_IN_USER)
    }
}
