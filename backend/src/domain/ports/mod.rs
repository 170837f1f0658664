//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AccountsApi`, `ImageHost`, `EntitiesApi`) are implemented by
//! the reqwest adapters in `outbound::remote`. Driving ports are implemented
//! by the domain services and consumed by the HTTP handlers and the CLI.

mod macros;
pub(crate) use macros::define_port_error;

mod account_commands;
mod accounts_api;
mod entities_api;
mod image_host;
mod image_uploader;
mod insurance_entity_command;

#[cfg(test)]
pub use account_commands::{MockAccountCreationCommand, MockAccountEditCommand};
pub use account_commands::{AccountCreationCommand, AccountEditCommand};
#[cfg(test)]
pub use accounts_api::MockAccountsApi;
pub use accounts_api::{AccountsApi, AccountsApiError};
#[cfg(test)]
pub use entities_api::MockEntitiesApi;
pub use entities_api::{EntitiesApi, EntitiesApiError};
#[cfg(test)]
pub use image_host::MockImageHost;
pub use image_host::{ImageHost, ImageHostError, ImageHostResponse};
#[cfg(test)]
pub use image_uploader::MockImageUploader;
pub use image_uploader::{
    ImageUploader, ImageUrlSource, PlaceholderStyle, UploadError, UploadResult,
};
#[cfg(test)]
pub use insurance_entity_command::MockInsuranceEntityCommand;
pub use insurance_entity_command::InsuranceEntityCommand;
