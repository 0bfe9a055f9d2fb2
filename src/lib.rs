//! Authgate - client-side authentication session core.
//!
//! This library tracks whether a user is signed in, persists and validates
//! a bearer credential, and gates access to protected views until session
//! state is resolved. It is consumed by a larger host application that
//! provides routing, screens, and rendering; those stay on the other side
//! of the [`auth::Navigator`] and [`api::IdentityClient`] seams.

pub mod api;
pub mod auth;
pub mod config;

pub use api::{ApiError, IdentityClient};
pub use auth::{
    AccessGuard, AuthActionFailure, CredentialStore, GuardDecision, Navigator, Session,
    SessionManager, SessionStatus, UserProfile,
};
pub use config::{AuthConfig, AuthMethod};
