//! Account orchestrator: create, resolve id, upload image, patch.
//!
//! Every remote call is attempted once, in order; each step feeds the next.
//! Only the create call can fail the submission. Anything after it degrades
//! to a partial-success outcome because the account already exists.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::domain::ports::{
    AccountCreationCommand, AccountsApi, ImageUploader, PlaceholderStyle, UploadResult,
};
use crate::domain::{AccountDraft, AccountId, Email, RemoteAccount};

mod state;

pub use state::{WorkflowProgress, WorkflowState};

/// Secondary step that failed after the account was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ImageStage {
    /// The image host call or its normalisation failed.
    Upload,
    /// The update carrying the image URL failed.
    Patch,
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Account created; the image, if one was staged, is attached.
    Created {
        /// Identifier of the new account.
        id: AccountId,
        /// Attached image; `None` when no file was staged.
        image: Option<UploadResult>,
    },
    /// Account created but the staged image was not attached.
    CreatedImageFailed {
        /// Identifier of the new account.
        id: AccountId,
        /// Step that failed.
        stage: ImageStage,
        /// Failure reported by that step.
        reason: String,
    },
    /// Account created but its identifier could not be recovered.
    CreatedLookupFailed {
        /// Why the lookup came up empty.
        reason: String,
    },
    /// The create call failed; nothing was stored.
    Failed {
        /// Backend message, shown as-is.
        message: String,
    },
}

impl WorkflowOutcome {
    /// Whether the account exists after this submission.
    pub fn is_created(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Resolved identifier, when known.
    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            Self::Created { id, .. } | Self::CreatedImageFailed { id, .. } => Some(id),
            Self::CreatedLookupFailed { .. } | Self::Failed { .. } => None,
        }
    }

    /// One-line message for the person who submitted the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Created { .. } => "Account Created Successfully".to_owned(),
            Self::CreatedImageFailed { .. } => {
                "Account created, but failed to save profile image".to_owned()
            }
            Self::CreatedLookupFailed { .. } => {
                "Account created, but the new account could not be located".to_owned()
            }
            Self::Failed { message } => message.clone(),
        }
    }
}

/// Orchestrates account creation with a deferred image upload.
///
/// Holds no per-submission state, so one instance serves concurrent
/// submissions.
pub struct AccountCreationWorkflow {
    accounts: Arc<dyn AccountsApi>,
    uploader: Arc<dyn ImageUploader>,
}

impl AccountCreationWorkflow {
    /// Build a workflow over the account backend and the image uploader.
    pub fn new(accounts: Arc<dyn AccountsApi>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self { accounts, uploader }
    }

    /// Run one submission to completion without observing progress.
    pub async fn submit(&self, draft: AccountDraft) -> WorkflowOutcome {
        self.submit_observed(draft, &WorkflowProgress::detached())
            .await
    }

    /// Run one submission, publishing each step to `progress`.
    pub async fn submit_observed(
        &self,
        mut draft: AccountDraft,
        progress: &WorkflowProgress,
    ) -> WorkflowOutcome {
        let staged_image = draft.take_staged_image();
        let body = draft.create_body();

        progress.advance(WorkflowState::Creating);
        let created = match self.accounts.create_account(&body).await {
            Ok(created) => created,
            Err(err) => {
                error!(error = %err, email = %draft.email(), "account creation failed");
                progress.advance(WorkflowState::Failed);
                return WorkflowOutcome::Failed {
                    message: err.user_message(),
                };
            }
        };

        progress.advance(WorkflowState::ResolvingId);
        let (id, record) = match self.resolve_identifier(draft.email(), created).await {
            Ok(resolved) => resolved,
            Err(reason) => {
                warn!(%reason, email = %draft.email(), "created account could not be located");
                progress.advance(WorkflowState::PartialFailure);
                return WorkflowOutcome::CreatedLookupFailed { reason };
            }
        };
        info!(account_id = %id, "account created");

        let Some(image) = staged_image else {
            progress.advance(WorkflowState::Done);
            return WorkflowOutcome::Created { id, image: None };
        };

        progress.advance(WorkflowState::Uploading);
        let upload = match self
            .uploader
            .upload_profile_image(&id, &image, PlaceholderStyle::Timestamped)
            .await
        {
            Ok(upload) => upload,
            Err(err) => {
                warn!(account_id = %id, error = %err, body = ?err.body(), "profile image upload failed");
                progress.advance(WorkflowState::PartialFailure);
                return WorkflowOutcome::CreatedImageFailed {
                    id,
                    stage: ImageStage::Upload,
                    reason: err.to_string(),
                };
            }
        };

        progress.advance(WorkflowState::Patching);
        let patch = body
            .overlaid_with(&record)
            .without_placeholders()
            .with_id(&id)
            .with_image_url(&upload.image_url);
        match self.accounts.update_account(&id, &patch).await {
            Ok(()) => {
                info!(account_id = %id, source = %upload.source, "profile image attached");
                progress.advance(WorkflowState::Done);
                WorkflowOutcome::Created {
                    id,
                    image: Some(upload),
                }
            }
            Err(err) => {
                warn!(account_id = %id, error = %err, "attaching profile image failed");
                progress.advance(WorkflowState::PartialFailure);
                WorkflowOutcome::CreatedImageFailed {
                    id,
                    stage: ImageStage::Patch,
                    reason: err.user_message(),
                }
            }
        }
    }

    async fn resolve_identifier(
        &self,
        email: &Email,
        created: RemoteAccount,
    ) -> Result<(AccountId, RemoteAccount), String> {
        if let Some(id) = created.id() {
            return Ok((id, created));
        }

        info!(%email, "create response carried no id; listing accounts");
        let accounts = self
            .accounts
            .list_accounts()
            .await
            .map_err(|err| format!("listing accounts failed: {}", err.user_message()))?;

        accounts
            .into_iter()
            .find(|account| account.email() == Some(email.as_str()))
            .and_then(|account| account.id().map(|id| (id, account)))
            .ok_or_else(|| format!("no account with email {email} was found"))
    }
}

#[async_trait]
impl AccountCreationCommand for AccountCreationWorkflow {
    async fn submit(&self, draft: AccountDraft) -> WorkflowOutcome {
        self.submit_observed(draft, &WorkflowProgress::detached())
            .await
    }
}

#[cfg(test)]
mod tests;
