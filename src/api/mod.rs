//! REST client module for the remote identity service.
//!
//! This module provides the `IdentityClient` for confirming the current
//! user, logging in, registering, and driving the password reset flow.
//!
//! The service uses JWT bearer token authentication; the token itself is
//! issued by the login/register endpoints and persisted by the credential
//! store, not by this module.

pub mod client;
pub mod error;

pub use client::{AuthPayload, IdentityClient};
pub use error::ApiError;
