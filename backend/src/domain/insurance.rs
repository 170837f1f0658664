//! Insurance entity creation.
//!
//! A single backend call with a fixed envelope: constant entity and address
//! types, an empty NPI number, no associated entities, and `""` for every
//! optional value left out of the form.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::ports::{EntitiesApi, EntitiesApiError, InsuranceEntityCommand};
use crate::domain::{Email, Error};

/// Fallback when the caller did not say who is logged in.
pub const UNKNOWN_LOGGED_IN_USER: &str = "unknown@example.com";
const CREATE_FAILED: &str = "Failed to create Insurance";

/// Insurance form as submitted.
///
/// Absent fields decode as empty so validation can report all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct InsuranceDraft {
    #[schema(example = "Acme Health")]
    pub name: String,
    #[schema(example = "HMO")]
    pub entity_subtype: String,
    #[schema(example = "Active")]
    pub lifecycle_stage: String,
    pub email: String,
    pub phone_no: String,
    pub logged_in_user: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub street_address: Option<String>,
    pub map_link: Option<String>,
    pub divisional_group: Option<String>,
    pub division: Option<String>,
    pub subdivision: Option<String>,
    pub sector: Option<String>,
    pub alternate_phone: Option<String>,
    pub website: Option<String>,
    pub fax_no: Option<String>,
    pub linkedin_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub twitter_id: Option<String>,
}

/// Wire body for `POST /api/EntityData/Entity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceEntityRequest {
    pub name: String,
    pub logged_in_user: String,
    pub entity_type: &'static str,
    pub entity_subtype: String,
    pub lifecycle_stage: String,
    pub address_type: &'static str,
    pub state: String,
    pub city: String,
    pub county: String,
    pub entity_npi_number: String,
    pub street_address: String,
    pub map_link: String,
    pub divisional_group: String,
    pub division: String,
    pub subdivision: String,
    pub sector: String,
    pub email: String,
    pub phone_no: String,
    pub alternate_phone: String,
    pub website: String,
    pub fax_no: String,
    pub linked_in_id: String,
    pub facebook_id: String,
    pub instagram_id: String,
    pub twitter_id: String,
    #[serde(rename = "e_AssociatedEntities")]
    pub associated_entities: Vec<Value>,
}

/// Identifier of a created entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Read an id from a JSON string or number.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(raw) if !raw.trim().is_empty() => Some(Self(raw.trim().to_owned())),
            Value::Number(raw) => Some(Self(raw.to_string())),
            _ => None,
        }
    }

    /// Identifier as text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn required(value: &str, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        missing.push(field);
    }
    trimmed.to_owned()
}

fn optional(value: Option<String>) -> String {
    value.map(|text| text.trim().to_owned()).unwrap_or_default()
}

impl InsuranceDraft {
    /// Validate required fields and fill the fixed envelope.
    ///
    /// # Errors
    /// Returns [`Error::invalid_request`] listing every missing field, or
    /// naming `email` when it is malformed.
    pub fn into_request(self, fallback_user: &str) -> Result<InsuranceEntityRequest, Error> {
        let mut missing = Vec::new();
        let name = required(&self.name, "name", &mut missing);
        let entity_subtype = required(&self.entity_subtype, "entitySubtype", &mut missing);
        let lifecycle_stage = required(&self.lifecycle_stage, "lifecycleStage", &mut missing);
        let email = required(&self.email, "email", &mut missing);
        let phone_no = required(&self.phone_no, "phoneNo", &mut missing);
        if !missing.is_empty() {
            return Err(Error::invalid_request("Please fill in all required fields.")
                .with_details(json!({ "fields": missing })));
        }
        let email = Email::new(&email).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "email" }))
        })?;

        let logged_in_user = self
            .logged_in_user
            .filter(|user| !user.trim().is_empty())
            .unwrap_or_else(|| fallback_user.to_owned());

        Ok(InsuranceEntityRequest {
            name,
            logged_in_user,
            entity_type: "INSURANCE",
            entity_subtype,
            lifecycle_stage,
            address_type: "PRIMARY",
            state: optional(self.state),
            city: optional(self.city),
            county: optional(self.county),
            entity_npi_number: String::new(),
            street_address: optional(self.street_address),
            map_link: optional(self.map_link),
            divisional_group: optional(self.divisional_group),
            division: optional(self.division),
            subdivision: optional(self.subdivision),
            sector: optional(self.sector),
            email: email.as_str().to_owned(),
            phone_no,
            alternate_phone: optional(self.alternate_phone),
            website: optional(self.website),
            fax_no: optional(self.fax_no),
            linked_in_id: optional(self.linkedin_id),
            facebook_id: optional(self.facebook_id),
            instagram_id: optional(self.instagram_id),
            twitter_id: optional(self.twitter_id),
            associated_entities: Vec::new(),
        })
    }
}

fn map_create_error(err: &EntitiesApiError) -> Error {
    match err {
        EntitiesApiError::Rejected { status, message } => {
            Error::upstream(message.as_deref().unwrap_or(CREATE_FAILED))
                .with_details(json!({ "upstreamStatus": status }))
        }
        EntitiesApiError::Transport { .. } | EntitiesApiError::Timeout { .. } => {
            Error::service_unavailable(CREATE_FAILED)
        }
        EntitiesApiError::MissingId { .. } => Error::upstream(CREATE_FAILED),
    }
}

/// Creates insurance entities through [`EntitiesApi`].
pub struct InsuranceEntityService {
    entities: Arc<dyn EntitiesApi>,
    fallback_user: String,
}

impl InsuranceEntityService {
    /// `fallback_user` is sent as `loggedInUser` when a draft names nobody.
    pub fn new(entities: Arc<dyn EntitiesApi>, fallback_user: impl Into<String>) -> Self {
        Self {
            entities,
            fallback_user: fallback_user.into(),
        }
    }
}

#[async_trait]
impl InsuranceEntityCommand for InsuranceEntityService {
    async fn create(&self, draft: InsuranceDraft) -> Result<EntityId, Error> {
        let request = draft.into_request(&self.fallback_user)?;
        match self.entities.create_insurance(&request).await {
            Ok(id) => {
                info!(entity_id = %id, name = %request.name, "insurance entity created");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, name = %request.name, "insurance entity creation failed");
                Err(map_create_error(&err))
            }
        }
    }
}
