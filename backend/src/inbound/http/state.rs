//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks and no network.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCreationCommand, AccountEditCommand, ImageUploader, InsuranceEntityCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub account_creation: Arc<dyn AccountCreationCommand>,
    pub account_edit: Arc<dyn AccountEditCommand>,
    pub image_uploader: Arc<dyn ImageUploader>,
    pub insurance: Arc<dyn InsuranceEntityCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        account_creation: Arc<dyn AccountCreationCommand>,
        account_edit: Arc<dyn AccountEditCommand>,
        image_uploader: Arc<dyn ImageUploader>,
        insurance: Arc<dyn InsuranceEntityCommand>,
    ) -> Self {
        Self {
            account_creation,
            account_edit,
            image_uploader,
            insurance,
        }
    }
}
