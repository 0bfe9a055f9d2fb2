//! HTTP client for the remote identity service.
//!
//! This module provides the `IdentityClient` struct for making the
//! authentication requests the session manager depends on: confirming the
//! current user, logging in, registering, and the password reset flow.
//!
//! The base URL is injected so the host application can target its own
//! backend and tests can target a mock server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::UserProfile;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Endpoint returning the profile behind a bearer credential
const ME_PATH: &str = "/auth/me";

/// Credential-issuing endpoints
const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";

/// Password reset flow endpoints
const PASSWORD_RESET_PATH: &str = "/auth/password-reset";
const PASSWORD_RESET_COMPLETE_PATH: &str = "/auth/password-reset/complete";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    user: UserProfile,
}

/// Payload issued by the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    /// Parsed for wire fidelity; the session core runs on the access
    /// credential alone and never stores or sends this.
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordResetCompleteRequest<'a> {
    password: &'a str,
    token: &'a str,
}

/// Identity service client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Create a new client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch the profile of the user the credential belongs to.
    pub async fn fetch_current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .get(self.url(ME_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body: CurrentUserResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed user payload: {}", e)))?;
        Ok(body.user)
    }

    /// Exchange credentials for an issued access token and profile.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.post_for_payload(LOGIN_PATH, &LoginRequest { username, password })
            .await
    }

    /// Create an account; the service issues a token on success, same as login.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AuthPayload, ApiError> {
        self.post_for_payload(
            REGISTER_PATH,
            &RegisterRequest {
                username,
                password,
                first_name,
                last_name,
            },
        )
        .await
    }

    /// Ask the service to start a password reset for `email`.
    /// The response payload is service-defined and passed through.
    pub async fn request_password_reset(&self, email: &str) -> Result<Value, ApiError> {
        self.post_for_value(PASSWORD_RESET_PATH, &PasswordResetRequest { email })
            .await
    }

    /// Complete a password reset with the emailed token.
    pub async fn complete_password_reset(
        &self,
        password: &str,
        token: &str,
    ) -> Result<Value, ApiError> {
        self.post_for_value(
            PASSWORD_RESET_COMPLETE_PATH,
            &PasswordResetCompleteRequest { password, token },
        )
        .await
    }

    async fn post_for_payload<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthPayload, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed auth payload: {}", e)))
    }

    async fn post_for_value<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed reset payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = IdentityClient::new("https://id.example.com/").unwrap();
        assert_eq!(client.url(ME_PATH), "https://id.example.com/auth/me");
    }

    #[test]
    fn test_auth_payload_parses_with_and_without_refresh_token() {
        let json = r#"{"accessToken":"a.b.c","refreshToken":"r.s.t","user":{"id":1,"name":"A"}}"#;
        let payload: AuthPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.access_token, "a.b.c");
        assert_eq!(payload.refresh_token.as_deref(), Some("r.s.t"));
        assert_eq!(payload.user.name(), Some("A"));

        let json = r#"{"accessToken":"a.b.c","user":{"id":1}}"#;
        let payload: AuthPayload = serde_json::from_str(json).unwrap();
        assert!(payload.refresh_token.is_none());
    }

    #[test]
    fn test_register_request_uses_camel_case_fields() {
        let req = RegisterRequest {
            username: "u",
            password: "p",
            first_name: "F",
            last_name: "L",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["firstName"], "F");
        assert_eq!(json["lastName"], "L");
    }
}
