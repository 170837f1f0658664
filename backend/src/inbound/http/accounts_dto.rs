//! Request and response bodies for the external account endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::ImageUrlSource;
use crate::domain::{
    AccountDraft, AccountProfile, AccountValidationError, EditOutcome, EditableAccount, Error,
    ImageStage, RemoteAccount, UploadResult, WorkflowOutcome,
};

/// `draft` part of `POST /api/v1/accounts/external`.
///
/// Example JSON:
/// `{"email":"ada@example.com","userRole":"External User","firstName":"Ada"}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "External User")]
    pub user_role: String,
    #[serde(flatten)]
    pub profile: AccountProfile,
}

impl TryFrom<CreateAccountRequest> for AccountDraft {
    type Error = AccountValidationError;

    fn try_from(value: CreateAccountRequest) -> Result<Self, Self::Error> {
        Self::new(value.email, value.user_role, value.profile)
    }
}

/// Turn a field validation failure into an `invalid_request` envelope.
pub fn validation_error(err: &AccountValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

/// Multipart body of `POST /api/v1/accounts/external`.
#[derive(ToSchema)]
pub struct CreateAccountForm {
    pub draft: CreateAccountRequest,
    /// Optional profile image, uploaded once the account exists.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

/// Multipart body of `PUT /api/v1/accounts/external/{id}`.
#[derive(ToSchema)]
pub struct EditAccountForm {
    /// Changed fields keyed by wire name.
    #[schema(value_type = Object)]
    pub edits: serde_json::Value,
    /// Optional replacement profile image.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

/// Image attached during a submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachedImage {
    pub image_url: String,
    pub source: ImageUrlSource,
    pub low_confidence: bool,
}

impl From<UploadResult> for AttachedImage {
    fn from(result: UploadResult) -> Self {
        Self {
            low_confidence: result.is_low_confidence(),
            image_url: result.image_url,
            source: result.source,
        }
    }
}

/// Result of one create submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WorkflowOutcomeBody {
    Created {
        id: String,
        message: String,
        image: Option<AttachedImage>,
    },
    CreatedImageFailed {
        id: String,
        message: String,
        stage: ImageStage,
        reason: String,
    },
    CreatedLookupFailed {
        message: String,
        reason: String,
    },
    Failed {
        message: String,
    },
}

impl From<WorkflowOutcome> for WorkflowOutcomeBody {
    fn from(outcome: WorkflowOutcome) -> Self {
        let message = outcome.user_message();
        match outcome {
            WorkflowOutcome::Created { id, image } => Self::Created {
                id: id.to_string(),
                message,
                image: image.map(AttachedImage::from),
            },
            WorkflowOutcome::CreatedImageFailed { id, stage, reason } => {
                Self::CreatedImageFailed {
                    id: id.to_string(),
                    message,
                    stage,
                    reason,
                }
            }
            WorkflowOutcome::CreatedLookupFailed { reason } => {
                Self::CreatedLookupFailed { message, reason }
            }
            WorkflowOutcome::Failed { .. } => Self::Failed { message },
        }
    }
}

/// Account record prepared for an edit form.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditableAccountBody {
    #[schema(value_type = Object)]
    pub record: RemoteAccount,
    pub image_url: Option<String>,
}

impl From<EditableAccount> for EditableAccountBody {
    fn from(account: EditableAccount) -> Self {
        Self {
            record: account.record,
            image_url: account.image_url,
        }
    }
}

/// Result of one edit submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EditOutcomeBody {
    Updated {
        message: String,
        image: Option<AttachedImage>,
    },
    UpdatedImageFailed {
        message: String,
        reason: String,
    },
    Failed {
        message: String,
    },
}

impl From<EditOutcome> for EditOutcomeBody {
    fn from(outcome: EditOutcome) -> Self {
        let message = outcome.user_message();
        match outcome {
            EditOutcome::Updated { image } => Self::Updated {
                message,
                image: image.map(AttachedImage::from),
            },
            EditOutcome::UpdatedImageFailed { reason } => {
                Self::UpdatedImageFailed { message, reason }
            }
            EditOutcome::Failed { .. } => Self::Failed { message },
        }
    }
}
