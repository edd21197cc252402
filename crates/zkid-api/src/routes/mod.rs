//! HTTP route handlers.

pub mod credentials;
pub mod proofs;
