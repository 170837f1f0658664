//! HTTP adapters for the remote account backend, image host and entity
//! registry.

mod accounts;
mod client;
mod entities;
mod image_host;

pub use accounts::HttpAccountsApi;
pub use client::RemoteClientError;
pub use entities::HttpEntitiesApi;
pub use image_host::{FILE_PART, HttpImageHost};
