//! HTTP client for the external identity service.
//!
//! All authentication is delegated to this service: it owns the user table,
//! password verification, and token issuance. This crate only shuttles
//! credentials and tokens over its REST API; no password or token
//! cryptography happens in-process.

mod client;
mod types;

pub use client::{IdentityClient, IdentityError};
pub use types::{AuthSession, AuthUser, SignInResponse};
