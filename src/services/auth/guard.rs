//! Request authorization against a remote token-introspection authority.
//!
//! Responsibility:
//! - extract the bearer token from the `Authorization` header
//! - resolve it to a `UserInfo` via the introspection endpoint
//! - decide access from the caller's roles vs required + globally granted
//!
//! Verification is a straight pipeline (extract → introspect → policy) that
//! stops at the first failing step; every failure maps to exactly one
//! `AppError` variant and aborts the request.

use std::collections::HashSet;
use std::time::Duration;

use axum::http::{HeaderMap, Method, header};

use crate::error::AppError;
use crate::services::auth::introspection::{IntrospectError, IntrospectionClient};
use crate::services::auth::roles::Role;
use crate::services::auth::user_info::UserInfo;

pub struct AuthorizationGuard {
    introspection: IntrospectionClient,
    enabled: bool,
    global_granted_roles: HashSet<String>,
}

impl AuthorizationGuard {
    /// `introspect_uri` is not validated here; a bad value surfaces on the
    /// first guarded request. `enabled = false` turns every check into a
    /// no-op.
    pub fn new(
        introspect_uri: impl Into<String>,
        enabled: bool,
        timeout: Duration,
    ) -> Result<Self, IntrospectError> {
        Ok(Self {
            introspection: IntrospectionClient::new(introspect_uri, timeout)?,
            enabled,
            global_granted_roles: HashSet::new(),
        })
    }

    /// Grant roles for every request, regardless of what the route itself
    /// requires. Duplicates are harmless (membership is a set).
    ///
    /// Registration happens during startup, before the guard is shared
    /// behind an `Arc`; evaluation afterwards is read-only, which is why
    /// this is the only `&mut self` method.
    pub fn grant_role_for_any_request(&mut self, roles: &[Role]) {
        self.global_granted_roles
            .extend(roles.iter().map(|role| role.as_str().to_string()));
    }

    /// Run the verification pipeline for one request.
    ///
    /// Returns the resolved identity on success, or `Ok(None)` when the
    /// check was bypassed: guard disabled, or a CORS pre-flight `OPTIONS`
    /// request (pre-flights never carry credentials).
    pub async fn verify_permission(
        &self,
        method: &Method,
        headers: &HeaderMap,
        required_roles: &[Role],
    ) -> Result<Option<UserInfo>, AppError> {
        if !self.enabled || *method == Method::OPTIONS {
            return Ok(None);
        }

        let token = extract_bearer_token(headers).ok_or(AppError::MissingToken)?;

        let user = self.introspect_token(token).await?;

        if !self.is_access_granted(&user, required_roles) {
            tracing::warn!(username = %user.username, "insufficient privileges");
            return Err(AppError::InsufficientPrivileges {
                username: user.username,
            });
        }

        Ok(Some(user))
    }

    async fn introspect_token(&self, token: &str) -> Result<UserInfo, AppError> {
        let payload = match self.introspection.introspect(token).await {
            Ok(payload) => payload,
            Err(err @ IntrospectError::Unreachable(_)) => {
                tracing::warn!(error = ?err, "introspection endpoint unreachable");
                return Err(AppError::AuthorityUnreachable);
            }
            Err(err) => {
                tracing::warn!(error = ?err, "introspection failed");
                return Err(AppError::AuthorityError);
            }
        };

        if !payload.active {
            return Err(AppError::AccessDenied);
        }

        // An active token without a username is not something the authority
        // should produce; treat it like any other malformed answer.
        let username = match payload.username {
            Some(name) if !name.is_empty() => name,
            _ => return Err(AppError::AuthorityError),
        };

        Ok(UserInfo {
            username,
            active: payload.active,
            email_verified: payload.email_verified,
            roles: payload.realm_access.roles,
        })
    }

    /// Flat set-membership policy: access iff the caller holds at least one
    /// role out of `required ∪ globally granted`. No hierarchy, no
    /// wildcards, no implicit authenticated-only mode — an empty union
    /// grants nothing.
    fn is_access_granted(&self, user: &UserInfo, required: &[Role]) -> bool {
        let mut granted: HashSet<&str> = self
            .global_granted_roles
            .iter()
            .map(String::as_str)
            .collect();
        granted.extend(required.iter().map(|role| role.as_str()));

        user.roles.iter().any(|role| granted.contains(role.as_str()))
    }
}

/// Strict extraction: the header must be exactly `Bearer <token>`. A header
/// in any other shape counts as missing, it is not forwarded mangled.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn guard(enabled: bool) -> AuthorizationGuard {
        // The URI is never dialed in these tests.
        AuthorizationGuard::new(
            "http://127.0.0.1:1/introspect",
            enabled,
            Duration::from_secs(1),
        )
        .unwrap()
    }

    fn user(roles: &[&str]) -> UserInfo {
        UserInfo {
            username: "alice".to_string(),
            active: true,
            email_verified: true,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_extraction_is_strict() {
        assert_eq!(
            extract_bearer_token(&bearer("Bearer abc123")),
            Some("abc123")
        );
        assert_eq!(extract_bearer_token(&bearer("bearer abc123")), None);
        assert_eq!(extract_bearer_token(&bearer("Token abc123")), None);
        assert_eq!(extract_bearer_token(&bearer("Bearer")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn route_roles_grant_access() {
        let g = guard(true);

        assert!(g.is_access_granted(&user(&["admin"]), &[Role::Admin]));
        assert!(!g.is_access_granted(&user(&["admin"]), &[Role::Editor]));
        assert!(!g.is_access_granted(&user(&[]), &[Role::Admin]));
    }

    #[test]
    fn empty_union_grants_nothing() {
        let g = guard(true);

        // Holding roles is not enough when nothing is required or granted.
        assert!(!g.is_access_granted(&user(&["admin", "editor"]), &[]));
    }

    #[test]
    fn global_grant_alone_suffices() {
        let mut g = guard(true);
        g.grant_role_for_any_request(&[Role::Admin]);

        assert!(g.is_access_granted(&user(&["admin"]), &[Role::Editor]));
        assert!(g.is_access_granted(&user(&["admin"]), &[]));
    }

    #[test]
    fn grant_registration_is_order_independent() {
        let mut a = guard(true);
        a.grant_role_for_any_request(&[Role::Admin, Role::Editor]);
        a.grant_role_for_any_request(&[Role::Viewer]);

        let mut b = guard(true);
        b.grant_role_for_any_request(&[Role::Viewer, Role::Admin, Role::Editor]);

        for caller in [user(&["admin"]), user(&["editor"]), user(&["viewer"])] {
            assert_eq!(
                a.is_access_granted(&caller, &[]),
                b.is_access_granted(&caller, &[])
            );
        }
    }

    #[tokio::test]
    async fn disabled_guard_bypasses_everything() {
        let g = guard(false);

        let out = g
            .verify_permission(&Method::GET, &bearer("garbage"), &[Role::Admin])
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn preflight_bypasses_credential_check() {
        let g = guard(true);

        let out = g
            .verify_permission(&Method::OPTIONS, &HeaderMap::new(), &[Role::Admin])
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn missing_header_fails_before_any_network_call() {
        let g = guard(true);

        let err = g
            .verify_permission(&Method::GET, &HeaderMap::new(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }

    #[tokio::test]
    async fn malformed_header_counts_as_missing() {
        let g = guard(true);

        let err = g
            .verify_permission(&Method::GET, &bearer("Basic dXNlcjpwdw=="), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }
}
