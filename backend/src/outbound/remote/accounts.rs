//! Reqwest-backed account backend adapter.
//!
//! Owns transport details only: URLs, timeouts, status mapping and JSON
//! decoding into [`RemoteAccount`] records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::client::{RemoteClient, RemoteClientError, backend_message};
use crate::domain::ports::{AccountsApi, AccountsApiError};
use crate::domain::{AccountId, RemoteAccount};

const RESOURCE: [&str; 3] = ["api", "AccountManager", "WAVExternalUser"];

/// Account adapter for the `WAVExternalUser` resource.
pub struct HttpAccountsApi {
    remote: RemoteClient,
}

impl HttpAccountsApi {
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

    fn collection(&self) -> Url {
        self.remote.endpoint(RESOURCE)
    }

    fn member(&self, id: &AccountId) -> Url {
        let [api, manager, resource] = RESOURCE;
        self.remote
            .endpoint([api, manager, resource, id.as_str()])
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, AccountsApiError> {
        let response = request
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "account backend replied");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl AccountsApi for HttpAccountsApi {
    async fn create_account(&self, body: &RemoteAccount) -> Result<RemoteAccount, AccountsApiError> {
        let request = self.remote.http().post(self.collection()).json(body);
        let reply = self.send(request).await?;
        Ok(decode_lenient(&reply))
    }

    async fn list_accounts(&self) -> Result<Vec<RemoteAccount>, AccountsApiError> {
        let request = self.remote.http().get(self.collection());
        let reply = self.send(request).await?;
        decode_list(&reply)
    }

    async fn fetch_account(&self, id: &AccountId) -> Result<RemoteAccount, AccountsApiError> {
        let request = self.remote.http().get(self.member(id));
        let reply = self.send(request).await?;
        decode_record(&reply)
    }

    async fn update_account(
        &self,
        id: &AccountId,
        body: &RemoteAccount,
    ) -> Result<(), AccountsApiError> {
        let request = self.remote.http().put(self.member(id)).json(body);
        self.send(request).await.map(drop)
    }
}

/// Create replies may be empty or plain text; those decode to an empty record.
fn decode_lenient(body: &[u8]) -> RemoteAccount {
    serde_json::from_slice::<Value>(body)
        .map(RemoteAccount::from_response)
        .unwrap_or_default()
}

fn decode_list(body: &[u8]) -> Result<Vec<RemoteAccount>, AccountsApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| AccountsApiError::decode(format!("invalid account list JSON: {err}")))?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .map(RemoteAccount::from_response)
        .collect())
}

fn decode_record(body: &[u8]) -> Result<RemoteAccount, AccountsApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(RemoteAccount::from_response(value)),
        Ok(_) => Err(AccountsApiError::decode("account record is not a JSON object")),
        Err(err) => Err(AccountsApiError::decode(format!(
            "invalid account record JSON: {err}"
        ))),
    }
}

fn map_transport_error(error: reqwest::Error) -> AccountsApiError {
    if error.is_timeout() {
        AccountsApiError::timeout(error.to_string())
    } else {
        AccountsApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AccountsApiError {
    AccountsApiError::rejected(status.as_u16(), backend_message(status, body))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::object(br#"{"id":"5","email":"a@b.c"}"#.as_slice(), Some("5"))]
    #[case::wrapped(br#"{"result":{"id":6}}"#.as_slice(), Some("6"))]
    #[case::empty(b"".as_slice(), None)]
    #[case::text(b"Created".as_slice(), None)]
    #[case::bare_number(b"12".as_slice(), None)]
    fn create_replies_decode_leniently(#[case] body: &[u8], #[case] expected: Option<&str>) {
        let record = decode_lenient(body);
        assert_eq!(record.id().as_ref().map(AccountId::as_str), expected);
    }

    #[rstest]
    fn list_keeps_objects_only() {
        let body = json!([{ "id": "1" }, "noise", { "id": "2" }]).to_string();
        let records = decode_list(body.as_bytes()).expect("decode");
        assert_eq!(records.len(), 2);
    }

    #[rstest]
    fn non_array_list_is_empty() {
        let records = decode_list(br#"{"items":[]}"#).expect("decode");
        assert!(records.is_empty());
    }

    #[rstest]
    #[case::garbage(b"<html>".as_slice())]
    #[case::array(b"[]".as_slice())]
    fn fetch_requires_json_object(#[case] body: &[u8]) {
        assert!(matches!(
            decode_record(body),
            Err(AccountsApiError::Decode { .. })
        ));
    }

    #[rstest]
    fn status_errors_carry_backend_message() {
        let error = map_status_error(StatusCode::CONFLICT, br#"{"message":"Email already exists"}"#);
        assert_eq!(error, AccountsApiError::rejected(409_u16, "Email already exists"));
    }
}
