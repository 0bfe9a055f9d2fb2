use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile attribute holding the bearer credential after merging
const ACCESS_TOKEN_FIELD: &str = "accessToken";

/// Where the session currently stands.
///
/// `Resolving` is the initial state, held until the first
/// `resolve_session()` completes. Neither resolved state is terminal; the
/// machine is re-entered by resolving again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Resolving,
    Authenticated,
    Unauthenticated,
}

/// The live session state: status plus the confirmed user, if any.
///
/// Owned exclusively by the `SessionManager`; consumers only ever see
/// cloned snapshots, so the named constructors below are the complete set
/// of transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub status: SessionStatus,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Initial state, before the first resolution completes.
    pub fn resolving() -> Self {
        Self {
            status: SessionStatus::Resolving,
            user: None,
        }
    }

    /// Resolution or login/register confirmed the user.
    pub fn authenticated(user: UserProfile) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user: Some(user),
        }
    }

    /// No credential, stale credential, failed confirmation, or logout.
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            user: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn is_resolving(&self) -> bool {
        self.status == SessionStatus::Resolving
    }
}

/// User record returned by the identity service.
///
/// The shape is collaborator-defined: attributes beyond identity are passed
/// through unchanged, so the profile is a flattened JSON object with typed
/// accessors for the fields this crate reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    fields: Map<String, Value>,
}

impl UserProfile {
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.fields.get(ACCESS_TOKEN_FIELD).and_then(Value::as_str)
    }

    /// Arbitrary pass-through attribute access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Merge the bearer credential into the profile, replacing any token
    /// the service may have echoed back.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.fields
            .insert(ACCESS_TOKEN_FIELD.to_string(), Value::String(token.to_string()));
        self
    }
}
