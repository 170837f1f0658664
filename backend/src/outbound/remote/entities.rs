//! Reqwest-backed entity registry adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use super::client::{RemoteClient, RemoteClientError, body_preview, json_message};
use crate::domain::ports::{EntitiesApi, EntitiesApiError};
use crate::domain::{EntityId, InsuranceEntityRequest};

/// Entity adapter posting to `/api/EntityData/Entity`.
pub struct HttpEntitiesApi {
    remote: RemoteClient,
}

impl HttpEntitiesApi {
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

#[async_trait]
impl EntitiesApi for HttpEntitiesApi {
    async fn create_insurance(
        &self,
        request: &InsuranceEntityRequest,
    ) -> Result<EntityId, EntitiesApiError> {
        let url = self.remote.endpoint(["api", "EntityData", "Entity"]);
        let response = self
            .remote
            .http()
            .post(url)
            .header(ACCEPT, "*/*")
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(EntitiesApiError::rejected(
                status.as_u16(),
                json_message(body.as_ref()),
            ));
        }
        created_id(body.as_ref())
    }
}

/// `result.id` of a create reply.
fn created_id(body: &[u8]) -> Result<EntityId, EntitiesApiError> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| value.pointer("/result/id"))
        .and_then(EntityId::from_value)
        .ok_or_else(|| EntitiesApiError::missing_id(body_preview(body)))
}

fn map_transport_error(error: reqwest::Error) -> EntitiesApiError {
    if error.is_timeout() {
        EntitiesApiError::timeout(error.to_string())
    } else {
        EntitiesApiError::transport(error.to_string())
    }
}
