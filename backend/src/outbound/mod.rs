//! Outbound adapters implementing the driven ports over HTTP.
//!
//! Adapters translate between domain types and the remote services' wire
//! formats. They make one attempt per call and contain no workflow logic.

pub mod remote;
