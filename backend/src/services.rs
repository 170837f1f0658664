//! Builds the domain services over the HTTP adapters from settings.
//!
//! Shared by the server and the CLI so both speak to the same backends the
//! same way.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;

use crate::domain::ports::{AccountsApi, ImageUploader};
use crate::domain::{
    AccountCreationWorkflow, InsuranceEntityService, ProfileEditWorkflow, UploadProxy,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::remote::{
    HttpAccountsApi, HttpEntitiesApi, HttpImageHost, RemoteClientError,
};
use crate::settings::{ConsoleSettings, SettingsError};

/// Errors raised while wiring services.
#[derive(Debug, Error)]
pub enum ServicesError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] RemoteClientError),
}

/// Fully wired domain services.
#[derive(Clone)]
pub struct ConsoleServices {
    pub account_creation: Arc<AccountCreationWorkflow>,
    pub account_edit: Arc<ProfileEditWorkflow>,
    pub image_uploader: Arc<UploadProxy>,
    pub insurance: Arc<InsuranceEntityService>,
}

impl ConsoleServices {
    /// Wire every service against the configured backends.
    ///
    /// # Errors
    ///
    /// Returns [`ServicesError`] when a setting is invalid or an HTTP client
    /// cannot be built.
    pub fn from_settings(settings: &ConsoleSettings) -> Result<Self, ServicesError> {
        let timeout = settings.request_timeout()?;
        let api_base = settings.api_base_url()?;

        let accounts: Arc<dyn AccountsApi> =
            Arc::new(HttpAccountsApi::new(api_base.clone(), timeout)?);
        let host = Arc::new(HttpImageHost::new(settings.image_host_base_url()?, timeout)?);
        let image_uploader = Arc::new(UploadProxy::new(
            host,
            Arc::new(DefaultClock),
            settings.placeholder_base_url()?,
        ));
        let uploader: Arc<dyn ImageUploader> = image_uploader.clone();
        let entities = Arc::new(HttpEntitiesApi::new(api_base, timeout)?);

        Ok(Self {
            account_creation: Arc::new(AccountCreationWorkflow::new(
                Arc::clone(&accounts),
                Arc::clone(&uploader),
            )),
            account_edit: Arc::new(ProfileEditWorkflow::new(accounts, uploader)),
            image_uploader,
            insurance: Arc::new(InsuranceEntityService::new(
                entities,
                settings.logged_in_user(),
            )),
        })
    }

    /// Driving ports for the HTTP handlers.
    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            self.account_creation.clone(),
            self.account_edit.clone(),
            self.image_uploader.clone(),
            self.insurance.clone(),
        )
    }
}
