//! HTTP inbound adapter exposing the account console REST endpoints.

pub mod accounts;
pub mod accounts_dto;
pub mod error;
pub mod health;
pub mod image_upload;
pub mod insurance;
pub mod multipart;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
