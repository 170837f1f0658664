//! Insurance entity handler.
//!
//! ```text
//! POST /api/v1/entities/insurance {"name":"Acme Mutual","entitySubtype":"Health",...}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EntityId, Error, InsuranceDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Identifier of the created entity.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedEntity {
    pub id: EntityId,
}

/// Create an insurance entity.
#[utoipa::path(
    post,
    path = "/api/v1/entities/insurance",
    request_body = InsuranceDraft,
    responses(
        (status = 201, description = "Entity created", body = CreatedEntity),
        (status = 400, description = "Missing required fields", body = Error),
        (status = 502, description = "Entity registry rejected the request", body = Error),
        (status = 503, description = "Entity registry unreachable", body = Error)
    ),
    tags = ["entities"],
    operation_id = "createInsuranceEntity"
)]
#[post("/entities/insurance")]
pub async fn create_insurance(
    state: web::Data<HttpState>,
    payload: web::Json<InsuranceDraft>,
) -> ApiResult<HttpResponse> {
    let id = state.insurance.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(CreatedEntity { id }))
}
