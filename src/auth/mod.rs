//! Authentication module: session state, credential persistence, access
//! gating.
//!
//! This module provides:
//! - `CredentialStore`: single-slot bearer credential persistence with a
//!   pure expiry check
//! - `Session` / `SessionManager`: the session state machine and its owner
//! - `AccessGuard`: one-shot gate for protected content
//!
//! The session starts `Resolving` and is settled by the first
//! `resolve_session()`; mutations (login/register/logout) move it from
//! there.

pub mod guard;
pub mod manager;
pub mod session;
pub mod store;

pub use guard::{AccessGuard, GuardDecision, Navigator};
pub use manager::{AuthActionFailure, SessionManager};
pub use session::{Session, SessionStatus, UserProfile};
pub use store::CredentialStore;
