//! External account handlers.
//!
//! ```text
//! POST /api/v1/accounts/external        multipart: draft (JSON), file (optional)
//! GET  /api/v1/accounts/external/{id}
//! PUT  /api/v1/accounts/external/{id}   multipart: edits (JSON), file (optional)
//! ```

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, put, web};
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::{AccountDraft, AccountEdits, AccountId, Error, RemoteAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts_dto::{
    CreateAccountForm, CreateAccountRequest, EditAccountForm, EditOutcomeBody,
    EditableAccountBody, WorkflowOutcomeBody, validation_error,
};
use crate::inbound::http::multipart::BufferedForm;
use crate::inbound::http::state::HttpState;

const DRAFT_PART: &str = "draft";
const EDITS_PART: &str = "edits";

fn account_id(raw: String) -> Result<AccountId, Error> {
    AccountId::new(raw).map_err(|err| validation_error(&err))
}

/// Create an external account, then attach the optional image.
///
/// Partial success (account stored, image not attached) is still `201`; the
/// body says which step fell short.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/external",
    request_body(content = CreateAccountForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Account created, possibly without its image", body = WorkflowOutcomeBody),
        (status = 400, description = "Invalid draft", body = Error),
        (status = 502, description = "Account backend rejected the create call", body = WorkflowOutcomeBody)
    ),
    tags = ["accounts"],
    operation_id = "createExternalAccount"
)]
#[post("/accounts/external")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let mut form = BufferedForm::read(payload).await?;
    let request: CreateAccountRequest = form.require_json(DRAFT_PART)?;
    let mut draft = AccountDraft::try_from(request).map_err(|err| validation_error(&err))?;
    if let Some(image) = form.take_file() {
        draft = draft.with_staged_image(image);
    }

    let outcome = state.account_creation.submit(draft).await;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_GATEWAY
    };
    info!(status = status.as_u16(), "account submission finished");
    Ok(HttpResponse::build(status).json(WorkflowOutcomeBody::from(outcome)))
}

/// Load an account for editing.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/external/{id}",
    params(("id" = String, Path, description = "Remote account identifier")),
    responses(
        (status = 200, description = "Account record", body = EditableAccountBody),
        (status = 404, description = "Unknown account", body = Error),
        (status = 502, description = "Account backend failed", body = Error),
        (status = 503, description = "Account backend unreachable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "getExternalAccount"
)]
#[get("/accounts/external/{id}")]
pub async fn get_account(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EditableAccountBody>> {
    let id = account_id(path.into_inner())?;
    let account = state.account_edit.load(&id).await?;
    Ok(web::Json(account.into()))
}

/// Apply edits to an account, replacing its image when a file is sent.
#[utoipa::path(
    put,
    path = "/api/v1/accounts/external/{id}",
    params(("id" = String, Path, description = "Remote account identifier")),
    request_body(content = EditAccountForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Account updated, possibly without its new image", body = EditOutcomeBody),
        (status = 400, description = "Invalid edits", body = Error),
        (status = 502, description = "Fetch or update failed", body = EditOutcomeBody)
    ),
    tags = ["accounts"],
    operation_id = "updateExternalAccount"
)]
#[put("/accounts/external/{id}")]
pub async fn update_account(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id = account_id(path.into_inner())?;
    let mut form = BufferedForm::read(payload).await?;
    let fields: Map<String, Value> = form.json(EDITS_PART)?.unwrap_or_default();
    let mut edits = AccountEdits::new(RemoteAccount::from_map(fields));
    if let Some(image) = form.take_file() {
        edits = edits.with_staged_image(image);
    }

    let body = EditOutcomeBody::from(state.account_edit.submit(&id, edits).await);
    let status = match body {
        EditOutcomeBody::Failed { .. } => StatusCode::BAD_GATEWAY,
        EditOutcomeBody::Updated { .. } | EditOutcomeBody::UpdatedImageFailed { .. } => {
            StatusCode::OK
        }
    };
    Ok(HttpResponse::build(status).json(body))
}
