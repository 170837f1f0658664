//! Account console backend.
//!
//! Creates and edits external accounts on a remote backend, attaching profile
//! images after the account exists, and normalises image host responses.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod services;
pub mod settings;
#[cfg(test)]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
