//! Domain primitives, workflows, and ports.
//!
//! Purpose: own the account creation and edit workflows, the upload response
//! normaliser, and insurance entity creation, independent of transport.
//! Inbound adapters call the driving ports; outbound adapters implement the
//! driven ports in [`ports`].
//!
//! Public surface:
//! - [`AccountCreationWorkflow`] with [`WorkflowOutcome`] and [`WorkflowState`].
//! - [`UploadProxy`] and the [`probe_image_url`] probe chain.
//! - [`ProfileEditWorkflow`] with [`EditOutcome`].
//! - [`InsuranceEntityService`].
//! - [`Error`] / [`ErrorCode`] for transport-agnostic failures.

pub mod account;
pub mod account_workflow;
pub mod error;
pub mod image_upload;
pub mod insurance;
pub mod ports;
pub mod profile_edit;
pub mod trace_id;

pub use self::account::{
    AccountDraft, AccountId, AccountProfile, AccountValidationError, Email, PROFILE_IMAGE_FIELD,
    PROFILE_PIC_FIELD, RemoteAccount, SCHEMA_PLACEHOLDER, StagedImage, is_blank,
};
pub use self::account_workflow::{
    AccountCreationWorkflow, ImageStage, WorkflowOutcome, WorkflowProgress, WorkflowState,
};
pub use self::error::{Error, ErrorCode};
pub use self::image_upload::{URL_FIELDS, UploadProxy, probe_image_url};
pub use self::insurance::{
    EntityId, InsuranceDraft, InsuranceEntityRequest, InsuranceEntityService,
    UNKNOWN_LOGGED_IN_USER,
};
pub use self::ports::{ImageUrlSource, PlaceholderStyle, UploadError, UploadResult};
pub use self::profile_edit::{
    AccountEdits, EditOutcome, EditableAccount, ProfileEditWorkflow, merge_edits,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
