//! Upload proxy endpoint.
//!
//! ```text
//! POST /api/ImageUploadExternal/upload/{id}   (multipart, one `file` part)
//! ```
//!
//! Mirrors the image host's own route so existing clients can point at this
//! service unchanged, but always answers with a normalised body.

use actix_multipart::Multipart;
use actix_web::{post, web};
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::{ImageHostError, ImageUrlSource, PlaceholderStyle, UploadError};
use crate::domain::{AccountId, Error, UploadResult};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::BufferedForm;
use crate::inbound::http::state::HttpState;

const UPLOAD_OK_MESSAGE: &str = "Upload successful";

/// Multipart body accepted by the upload proxy.
#[derive(ToSchema)]
pub struct UploadForm {
    /// Image file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Normalised upload response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[schema(example = "Upload successful")]
    pub message: String,
    #[schema(example = "https://cdn.example.com/images/42.jpg")]
    pub image_url: String,
    pub source: ImageUrlSource,
    /// Set when the URL was synthesised rather than read from the host.
    pub low_confidence: bool,
}

impl From<UploadResult> for UploadResponse {
    fn from(result: UploadResult) -> Self {
        let low_confidence = result.is_low_confidence();
        Self {
            message: UPLOAD_OK_MESSAGE.to_owned(),
            image_url: result.image_url,
            source: result.source,
            low_confidence,
        }
    }
}

/// Forward one profile image to the image host and normalise the reply.
#[utoipa::path(
    post,
    path = "/api/ImageUploadExternal/upload/{id}",
    params(("id" = String, Path, description = "Remote account identifier")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing id or file", body = Error),
        (status = 502, description = "Image host rejected the upload or returned no URL", body = Error),
        (status = 503, description = "Image host unreachable", body = Error)
    ),
    tags = ["images"],
    operation_id = "uploadProfileImage"
)]
#[post("/api/ImageUploadExternal/upload/{id}")]
pub async fn upload_profile_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<web::Json<UploadResponse>> {
    let id = AccountId::new(path.into_inner())
        .map_err(|_| Error::invalid_request("User ID is required"))?;
    let mut form = BufferedForm::read(payload).await?;
    let image = form
        .take_file()
        .ok_or_else(|| Error::invalid_request("No file provided"))?;

    let result = state
        .image_uploader
        .upload_profile_image(&id, &image, PlaceholderStyle::Stable)
        .await
        .map_err(|err| map_upload_error(&id, err))?;
    Ok(web::Json(result.into()))
}

/// Map an upload failure onto the domain error envelope.
pub(crate) fn map_upload_error(id: &AccountId, err: UploadError) -> Error {
    warn!(account_id = %id, error = %err, "profile image upload failed");
    match err {
        UploadError::Rejected { status, .. } => {
            Error::upstream(format!("Upload failed with status {status}"))
                .with_details(json!({ "upstreamStatus": status }))
        }
        UploadError::NoImageUrl { .. } => {
            Error::upstream("Upload succeeded but no image URL was returned")
        }
        UploadError::Host { cause } => match cause {
            ImageHostError::InvalidRequest { message } => Error::invalid_request(message),
            ImageHostError::Transport { .. } | ImageHostError::Timeout { .. } => {
                Error::service_unavailable(cause.to_string())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use url::Url;

    use super::*;
    use crate::domain::UploadProxy;
    use crate::domain::ports::{
        ImageHostResponse, ImageUploader, MockAccountCreationCommand, MockAccountEditCommand,
        MockImageHost, MockImageUploader, MockInsuranceEntityCommand,
    };
    use crate::inbound::http::test_utils::{TestPart, with_multipart};
    use crate::test_support::MutableClock;

    fn state_with(uploader: Arc<dyn ImageUploader>) -> HttpState {
        HttpState::new(
            Arc::new(MockAccountCreationCommand::new()),
            Arc::new(MockAccountEditCommand::new()),
            uploader,
            Arc::new(MockInsuranceEntityCommand::new()),
        )
    }

    fn png_part() -> TestPart<'static> {
        TestPart::File {
            name: "file",
            file_name: "avatar.png",
            content_type: "image/png",
            bytes: b"\x89PNG",
        }
    }

    async fn call(uploader: MockImageUploader, parts: &[TestPart<'_>]) -> (StatusCode, Value) {
        send(state_with(Arc::new(uploader)), parts).await
    }

    async fn send(state: HttpState, parts: &[TestPart<'_>]) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(upload_profile_image),
        )
        .await;
        let request = with_multipart(
            actix_test::TestRequest::post().uri("/api/ImageUploadExternal/upload/42"),
            parts,
        )
        .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    #[actix_web::test]
    async fn returns_normalised_url() {
        let mut uploader = MockImageUploader::new();
        uploader
            .expect_upload_profile_image()
            .withf(|id, image, style| {
                id.as_str() == "42"
                    && image.file_name() == "avatar.png"
                    && image.content_type() == Some("image/png")
                    && *style == PlaceholderStyle::Stable
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(UploadResult {
                    image_url: "https://cdn.example.com/42.png".to_owned(),
                    source: ImageUrlSource::StructuredField("imageUrl".to_owned()),
                })
            });

        let (status, body) = call(uploader, &[png_part()]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageUrl"], "https://cdn.example.com/42.png");
        assert_eq!(body["message"], UPLOAD_OK_MESSAGE);
        assert_eq!(body["lowConfidence"], false);
        assert_eq!(body["source"]["field"], "imageUrl");
    }

    #[actix_web::test]
    async fn empty_host_reply_yields_stable_placeholder() {
        let mut host = MockImageHost::new();
        host.expect_upload().times(1).returning(|_, _| {
            Ok(ImageHostResponse {
                status: 200,
                body: String::new(),
            })
        });
        let proxy = UploadProxy::new(
            Arc::new(host),
            Arc::new(MutableClock::fixed()),
            Some(Url::parse("https://host.test/").expect("base url")),
        );

        let (status, body) = send(state_with(Arc::new(proxy)), &[png_part()]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["imageUrl"],
            "https://host.test/images/profile-external-42.jpg"
        );
        assert_eq!(body["source"]["tier"], "synthesized");
        assert_eq!(body["lowConfidence"], true);
    }

    #[actix_web::test]
    async fn missing_file_is_a_bad_request() {
        let mut uploader = MockImageUploader::new();
        uploader.expect_upload_profile_image().never();

        let note = TestPart::Json {
            name: "note",
            body: "{}".to_owned(),
        };
        let (status, body) = call(uploader, &[note]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No file provided");
    }

    #[rstest]
    #[case::rejected(
        UploadError::rejected(413_u16, "too large"),
        StatusCode::BAD_GATEWAY
    )]
    #[case::no_url(UploadError::no_image_url("{}"), StatusCode::BAD_GATEWAY)]
    #[case::unreachable(
        UploadError::from(ImageHostError::timeout("elapsed")),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[actix_web::test]
    async fn upload_failures_map_to_statuses(
        #[case] failure: UploadError,
        #[case] expected: StatusCode,
    ) {
        let mut uploader = MockImageUploader::new();
        uploader
            .expect_upload_profile_image()
            .return_once(move |_, _, _| Err(failure));

        let (status, _) = call(uploader, &[png_part()]).await;

        assert_eq!(status, expected);
    }

    #[rstest]
    fn rejection_reports_upstream_status() {
        let id = AccountId::new("7").expect("id");
        let error = map_upload_error(&id, UploadError::rejected(500_u16, "oops"));
        assert_eq!(error.details(), Some(&json!({ "upstreamStatus": 500 })));
    }
}
