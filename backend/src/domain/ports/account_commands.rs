//! Driving ports for account mutations.
//!
//! Inbound adapters (HTTP handlers, the CLI) submit drafts and edits through
//! these traits so they never reach the outbound clients directly.

use async_trait::async_trait;

use crate::domain::{
    AccountDraft, AccountEdits, AccountId, EditOutcome, EditableAccount, Error, WorkflowOutcome,
};

/// Use-case port for creating an external account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCreationCommand: Send + Sync {
    /// Run the create workflow to a terminal outcome.
    ///
    /// Partial successes are outcomes rather than errors, so this never fails.
    async fn submit(&self, draft: AccountDraft) -> WorkflowOutcome;
}

/// Use-case port for editing an existing external account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountEditCommand: Send + Sync {
    /// Fetch a sanitised copy of the record for display in an edit form.
    async fn load(&self, id: &AccountId) -> Result<EditableAccount, Error>;

    /// Apply `edits` to the record and store it.
    async fn submit(&self, id: &AccountId, edits: AccountEdits) -> EditOutcome;
}
