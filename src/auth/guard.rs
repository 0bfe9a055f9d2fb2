//! Gate for protected content.
//!
//! The guard wraps one mount of protected content: evaluate it with the
//! current session snapshot and it decides whether the host renders its
//! loading placeholder, nothing (a redirect is in flight), or the content
//! itself.

use url::form_urlencoded;

use super::{Session, SessionStatus};

/// Query parameter carrying the location to return to after login
const RETURN_TO_PARAM: &str = "returnTo";

/// What the host should render for this evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving: show the neutral loading placeholder
    Loading,
    /// Redirect issued (or previously issued): render nothing
    Blocked,
    /// Authentication confirmed: render the protected content
    Allowed,
}

/// Client-side navigation seam. The host's router implements this; tests
/// use a recording fake.
pub trait Navigator {
    /// Replace the current location, without adding a history entry.
    fn replace(&self, href: &str);
}

/// One-shot access check for a single mount of protected content.
///
/// The check runs once: after authentication is confirmed the guard stays
/// `Allowed` without re-checking, so transient state changes cannot cause
/// redirect flicker. The flip side is a soft guarantee - if the session
/// de-authenticates after content was allowed, this guard will not
/// re-redirect; re-validation takes a fresh guard (a remount).
#[derive(Debug)]
pub struct AccessGuard {
    login_path: String,
    checked: bool,
    redirected: bool,
}

impl AccessGuard {
    /// `login_path` is the active auth method's configured login
    /// destination, e.g. [`AuthConfig::login_path`](crate::AuthConfig::login_path).
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            checked: false,
            redirected: false,
        }
    }

    /// Evaluate the guard against a session snapshot. `current_path` is
    /// the location being protected; it becomes the `returnTo` parameter
    /// if a redirect is needed.
    pub fn evaluate<N: Navigator>(
        &mut self,
        session: &Session,
        current_path: &str,
        navigator: &N,
    ) -> GuardDecision {
        if self.checked {
            return GuardDecision::Allowed;
        }
        if self.redirected {
            return GuardDecision::Blocked;
        }

        match session.status {
            SessionStatus::Resolving => GuardDecision::Loading,
            SessionStatus::Authenticated => {
                self.checked = true;
                GuardDecision::Allowed
            }
            SessionStatus::Unauthenticated => {
                navigator.replace(&self.login_href(current_path));
                self.redirected = true;
                GuardDecision::Blocked
            }
        }
    }

    /// Login destination with the current location preserved for
    /// post-login return.
    fn login_href(&self, current_path: &str) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair(RETURN_TO_PARAM, current_path)
            .finish();
        format!("{}?{}", self.login_path, query)
    }
}
