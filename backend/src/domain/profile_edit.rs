//! Profile edit workflow: fetch, optional upload, merge, update.
//!
//! The fetched record is the base of the update so fields the form does not
//! know about are written back unchanged. Edits only overwrite keys the record
//! already has.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountEditCommand, AccountsApi, AccountsApiError, ImageUploader, PlaceholderStyle,
    UploadResult,
};
use crate::domain::{AccountId, Error, RemoteAccount, StagedImage};

/// Field changes submitted from an edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountEdits {
    fields: RemoteAccount,
    staged_image: Option<StagedImage>,
}

impl AccountEdits {
    /// Wrap raw edited fields keyed by wire name.
    pub fn new(fields: RemoteAccount) -> Self {
        Self {
            fields,
            staged_image: None,
        }
    }

    /// Attach a replacement profile image.
    #[must_use]
    pub fn with_staged_image(mut self, image: StagedImage) -> Self {
        self.staged_image = Some(image);
        self
    }

    /// Edited fields.
    pub fn fields(&self) -> &RemoteAccount {
        &self.fields
    }

    /// Replacement image, if any.
    pub fn staged_image(&self) -> Option<&StagedImage> {
        self.staged_image.as_ref()
    }
}

/// Record prepared for display in an edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableAccount {
    /// Fetched record with placeholder values blanked.
    pub record: RemoteAccount,
    /// Effective image URL.
    pub image_url: Option<String>,
}

/// Terminal result of one edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Record stored; `image` is set when a new image was attached.
    Updated { image: Option<UploadResult> },
    /// Record stored but the replacement image could not be uploaded.
    UpdatedImageFailed { reason: String },
    /// Fetch or update failed; nothing was stored.
    Failed { message: String },
}

impl EditOutcome {
    /// One-line message for the person who submitted the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Updated { .. } => "Profile updated successfully".to_owned(),
            Self::UpdatedImageFailed { .. } => {
                "Profile updated, but failed to upload profile image".to_owned()
            }
            Self::Failed { message } => message.clone(),
        }
    }
}

/// Edits external accounts through [`AccountsApi`].
pub struct ProfileEditWorkflow {
    accounts: Arc<dyn AccountsApi>,
    uploader: Arc<dyn ImageUploader>,
}

impl ProfileEditWorkflow {
    /// Build a workflow over the account backend and the image uploader.
    pub fn new(accounts: Arc<dyn AccountsApi>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self { accounts, uploader }
    }

    async fn upload_replacement(
        &self,
        id: &AccountId,
        image: &StagedImage,
    ) -> Result<UploadResult, String> {
        self.uploader
            .upload_profile_image(id, image, PlaceholderStyle::Stable)
            .await
            .map_err(|err| {
                warn!(account_id = %id, error = %err, body = ?err.body(), "replacement image upload failed");
                err.to_string()
            })
    }
}

/// Build the update body from the stored record and the submitted edits.
pub fn merge_edits(
    id: &AccountId,
    current: &RemoteAccount,
    edits: &RemoteAccount,
    image_url: Option<&str>,
) -> RemoteAccount {
    let mut merged = current.without_placeholders();
    for (key, value) in edits.as_map() {
        if merged.contains_key(key) {
            merged.set(key.clone(), value.clone());
        }
    }
    if let Some(url) = image_url {
        merged = merged.with_image_url(url);
    }
    if merged.id().is_none() {
        merged = merged.with_id(id);
    }
    merged
}

fn map_fetch_error(id: &AccountId, err: &AccountsApiError) -> Error {
    match err {
        AccountsApiError::Rejected { .. } if err.is_not_found() => {
            Error::not_found(format!("account {id} does not exist"))
        }
        AccountsApiError::Rejected { status, message } => Error::upstream(message.clone())
            .with_details(json!({ "upstreamStatus": status })),
        AccountsApiError::Transport { .. } | AccountsApiError::Timeout { .. } => {
            Error::service_unavailable(err.to_string())
        }
        AccountsApiError::Decode { .. } => Error::upstream(err.to_string()),
    }
}

#[async_trait]
impl AccountEditCommand for ProfileEditWorkflow {
    async fn load(&self, id: &AccountId) -> Result<EditableAccount, Error> {
        let record = self
            .accounts
            .fetch_account(id)
            .await
            .map_err(|err| map_fetch_error(id, &err))?;
        let image_url = record.image_url().map(str::to_owned);
        Ok(EditableAccount {
            record: record.without_placeholders(),
            image_url,
        })
    }

    async fn submit(&self, id: &AccountId, edits: AccountEdits) -> EditOutcome {
        let current = match self.accounts.fetch_account(id).await {
            Ok(current) => current,
            Err(err) => {
                warn!(account_id = %id, error = %err, "fetching account for edit failed");
                return EditOutcome::Failed {
                    message: err.user_message(),
                };
            }
        };

        let upload = match edits.staged_image() {
            Some(image) => Some(self.upload_replacement(id, image).await),
            None => None,
        };
        let image_url = match &upload {
            Some(Ok(result)) => Some(result.image_url.as_str()),
            _ => None,
        };

        let body = merge_edits(id, &current, edits.fields(), image_url);
        if let Err(err) = self.accounts.update_account(id, &body).await {
            warn!(account_id = %id, error = %err, "updating account failed");
            return EditOutcome::Failed {
                message: err.user_message(),
            };
        }
        info!(account_id = %id, image = image_url.is_some(), "account updated");

        match upload {
            Some(Err(reason)) => EditOutcome::UpdatedImageFailed { reason },
            Some(Ok(image)) => EditOutcome::Updated { image: Some(image) },
            None => EditOutcome::Updated { image: None },
        }
    }
}
