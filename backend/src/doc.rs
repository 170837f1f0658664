//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound endpoint and the bodies they exchange.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use utoipa::OpenApi;

use crate::domain::ports::ImageUrlSource;
use crate::domain::{AccountProfile, EntityId, Error, ErrorCode, ImageStage, InsuranceDraft};
use crate::inbound::http::accounts_dto::{
    AttachedImage, CreateAccountForm, CreateAccountRequest, EditAccountForm, EditOutcomeBody,
    EditableAccountBody, WorkflowOutcomeBody,
};
use crate::inbound::http::image_upload::{UploadForm, UploadResponse};
use crate::inbound::http::insurance::CreatedEntity;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account console API",
        description = "External account creation with deferred profile image upload, \
                       the image upload proxy, and insurance entity creation."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::get_account,
        crate::inbound::http::accounts::update_account,
        crate::inbound::http::image_upload::upload_profile_image,
        crate::inbound::http::insurance::create_insurance,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AccountProfile,
        CreateAccountRequest,
        CreateAccountForm,
        EditAccountForm,
        WorkflowOutcomeBody,
        EditOutcomeBody,
        EditableAccountBody,
        AttachedImage,
        ImageStage,
        ImageUrlSource,
        UploadForm,
        UploadResponse,
        InsuranceDraft,
        CreatedEntity,
        EntityId,
    )),
    tags(
        (name = "accounts", description = "External account creation and editing"),
        (name = "images", description = "Profile image upload proxy"),
        (name = "entities", description = "Insurance entity creation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
