//! Session ownership and the operations that move it.
//!
//! The manager is the single owner of the live [`Session`]: consumers get
//! cloned snapshots, and every transition goes through the operations here.
//! Construct one at application start, share it behind an `Arc`, and keep
//! it for the process lifetime.

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{ApiError, IdentityClient};

use super::{CredentialStore, Session, UserProfile};

/// Failure arm of login/register/password-reset operations.
///
/// These are returned to the caller for inline display, never raised
/// through the session machinery: a failed action leaves the session and
/// the credential store exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct AuthActionFailure {
    /// Operation that failed ("login", "register", ...)
    pub operation: &'static str,
    /// Backend HTTP status, when the failure came from the service
    pub status: Option<u16>,
    pub message: String,
}

impl AuthActionFailure {
    fn from_api(operation: &'static str, err: ApiError) -> Self {
        Self {
            operation,
            status: err.status(),
            message: err.to_string(),
        }
    }

    fn local(operation: &'static str, err: anyhow::Error) -> Self {
        Self {
            operation,
            status: None,
            message: format!("{:#}", err),
        }
    }
}

/// Owns session state and keeps it consistent with the credential store
/// and the remote identity service.
///
/// Mutations follow a two-step contract: `login`/`register` return
/// immediately with the optimistic result, and the caller awaits a
/// separate [`resolve_session`](Self::resolve_session) to reconcile with
/// canonical server state. Resolutions are not cancellable; when two
/// overlap, the last completing write determines the final session value,
/// so keep one logical resolution active at a time.
#[derive(Debug)]
pub struct SessionManager {
    client: IdentityClient,
    store: CredentialStore,
    session: RwLock<Session>,
}

impl SessionManager {
    /// Session starts as `Resolving` until the first resolution lands.
    pub fn new(client: IdentityClient, store: CredentialStore) -> Self {
        Self {
            client,
            store,
            session: RwLock::new(Session::resolving()),
        }
    }

    /// Read-only snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    async fn set_session(&self, next: Session) {
        *self.session.write().await = next;
    }

    /// Determine session status from the stored credential plus remote
    /// confirmation. Never errors outward: every path terminates in a
    /// concrete `Authenticated` or `Unauthenticated` status. A stale or
    /// unreadable credential means "no session", not a failure.
    pub async fn resolve_session(&self) {
        let Some(token) = self.store.read() else {
            debug!("No stored credential, session is unauthenticated");
            self.set_session(Session::unauthenticated()).await;
            return;
        };

        if !CredentialStore::is_valid(&token) {
            debug!("Stored credential is expired or malformed, discarding it");
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear stale credential");
            }
            self.set_session(Session::unauthenticated()).await;
            return;
        }

        match self.client.fetch_current_user(&token).await {
            Ok(user) => {
                info!("Session resolved: authenticated");
                self.set_session(Session::authenticated(user.with_access_token(&token)))
                    .await;
            }
            Err(e) => {
                // Fail closed: an ambiguous session is a logged-out session.
                warn!(error = %e, "Identity confirmation failed, treating session as unauthenticated");
                self.set_session(Session::unauthenticated()).await;
            }
        }
    }

    /// Exchange credentials for an issued token. On success the token is
    /// persisted, the session flips to `Authenticated` optimistically, and
    /// the merged profile is returned; follow up with
    /// [`resolve_session`](Self::resolve_session) to reconcile.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, AuthActionFailure> {
        let payload = self
            .client
            .login(username, password)
            .await
            .map_err(|e| AuthActionFailure::from_api("login", e))?;
        self.accept_issued_credential("login", payload).await
    }

    /// Create an account. Same shape as `login`: persist the issued
    /// credential, optimistic `Authenticated`, caller re-resolves.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserProfile, AuthActionFailure> {
        let payload = self
            .client
            .register(username, password, first_name, last_name)
            .await
            .map_err(|e| AuthActionFailure::from_api("register", e))?;
        self.accept_issued_credential("register", payload).await
    }

    /// Persist the issued credential, then flip the session. The write
    /// happens-before the state update; if it fails the session is left
    /// untouched and the caller gets a failure result.
    async fn accept_issued_credential(
        &self,
        operation: &'static str,
        payload: crate::api::AuthPayload,
    ) -> Result<UserProfile, AuthActionFailure> {
        self.store
            .write(&payload.access_token)
            .map_err(|e| AuthActionFailure::local(operation, e))?;

        let user = payload.user.with_access_token(&payload.access_token);
        info!(operation, "Credential issued, session authenticated");
        self.set_session(Session::authenticated(user.clone())).await;
        Ok(user)
    }

    /// Clear the credential slot and drop to `Unauthenticated`. Purely
    /// local and always succeeds; a storage hiccup is logged, not surfaced.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credential on logout");
        }
        info!("Logged out");
        self.set_session(Session::unauthenticated()).await;
    }

    /// Ask the service to start a password reset. Does not touch the
    /// session or the credential store.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<serde_json::Value, AuthActionFailure> {
        self.client
            .request_password_reset(email)
            .await
            .map_err(|e| AuthActionFailure::from_api("request_password_reset", e))
    }

    /// Complete a password reset with the emailed token. Does not touch
    /// the session or the credential store.
    pub async fn complete_password_reset(
        &self,
        new_password: &str,
        reset_token: &str,
    ) -> Result<serde_json::Value, AuthActionFailure> {
        self.client
            .complete_password_reset(new_password, reset_token)
            .await
            .map_err(|e| AuthActionFailure::from_api("complete_password_reset", e))
    }
}
