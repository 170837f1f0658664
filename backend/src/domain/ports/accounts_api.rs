//! Driven port for the remote account backend.
//!
//! Covers the four calls the workflows make against the
//! `WAVExternalUser` resource: create, list, fetch by id and full update.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AccountId, RemoteAccount};

define_port_error! {
    /// Errors surfaced while calling the account backend.
    pub enum AccountsApiError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "account backend transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } =>
            "account backend timed out: {message}",
        /// The backend answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "account backend rejected request with status {status}: {message}",
        /// A success body could not be decoded.
        Decode { message: String } =>
            "account backend response decode failed: {message}",
    }
}

impl AccountsApiError {
    /// Message suitable for showing to the person submitting the form.
    ///
    /// Rejections surface the backend's own wording; everything else uses the
    /// full error text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        }
    }

    /// Upstream status code when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Port for reading and writing remote account records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Create an account from `body`.
    ///
    /// Success bodies that are not JSON objects decode to an empty record so
    /// callers fall back to identifier lookup.
    async fn create_account(&self, body: &RemoteAccount) -> Result<RemoteAccount, AccountsApiError>;

    /// List every account visible to the caller.
    async fn list_accounts(&self) -> Result<Vec<RemoteAccount>, AccountsApiError>;

    /// Fetch one account.
    async fn fetch_account(&self, id: &AccountId) -> Result<RemoteAccount, AccountsApiError>;

    /// Replace one account with `body`.
    async fn update_account(
        &self,
        id: &AccountId,
        body: &RemoteAccount,
    ) -> Result<(), AccountsApiError>;
}
