//! Client for the remote token-introspection endpoint.
//!
//! Responsibility:
//! - POST `{"token": ...}` to the configured URI, one attempt per call
//!   (no retries, no caching of results)
//! - split transport failures from non-2xx authority answers, so the guard
//!   can map them to different statuses
//!
//! Every guarded request pays one round-trip here; the request timeout on
//! the client is the only bound on that latency.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection failure or timeout. The endpoint never answered.
    #[error("cannot reach introspection endpoint: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The endpoint answered outside the 2xx range.
    #[error("introspection endpoint answered {status}")]
    Status { status: u16 },

    /// 2xx answer whose body did not decode as an introspection payload.
    #[error("introspection payload did not decode: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct IntrospectRequest<'a> {
    token: &'a str,
}

/// Success payload of the introspection endpoint (Keycloak-style).
///
/// Unknown fields are ignored. `active` defaults to false, so an empty or
/// partial body reads as an inactive token rather than an error.
#[derive(Debug, Deserialize)]
pub struct IntrospectResponse {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub realm_access: RealmAccess,
}

#[derive(Debug, Default, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

pub struct IntrospectionClient {
    http: reqwest::Client,
    uri: String,
}

impl IntrospectionClient {
    /// The URI is taken as-is; a malformed value surfaces as `Unreachable`
    /// on the first call, not at construction.
    pub fn new(uri: impl Into<String>, timeout: Duration) -> Result<Self, IntrospectError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(IntrospectError::ClientBuild)?;

        Ok(Self {
            http,
            uri: uri.into(),
        })
    }

    pub async fn introspect(&self, token: &str) -> Result<IntrospectResponse, IntrospectError> {
        let response = self
            .http
            .post(&self.uri)
            .json(&IntrospectRequest { token })
            .send()
            .await
            .map_err(IntrospectError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IntrospectError::Status {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(IntrospectError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_decodes() {
        let payload: IntrospectResponse = serde_json::from_str(
            r#"{
                "active": true,
                "username": "alice",
                "email_verified": true,
                "realm_access": {"roles": ["admin", "editor"]},
                "exp": 1735689600
            }"#,
        )
        .unwrap();

        assert!(payload.active);
        assert_eq!(payload.username.as_deref(), Some("alice"));
        assert!(payload.email_verified);
        assert_eq!(payload.realm_access.roles, vec!["admin", "editor"]);
    }

    #[test]
    fn missing_fields_default_to_inactive() {
        let payload: IntrospectResponse = serde_json::from_str("{}").unwrap();

        assert!(!payload.active);
        assert_eq!(payload.username, None);
        assert!(!payload.email_verified);
        assert!(payload.realm_access.roles.is_empty());
    }

    #[test]
    fn inactive_answer_without_claims() {
        // RFC 7662 allows the server to return nothing but `active` for a
        // token it does not recognize.
        let payload: IntrospectResponse =
            serde_json::from_str(r#"{"active": false}"#).unwrap();

        assert!(!payload.active);
        assert!(payload.realm_access.roles.is_empty());
    }
}
