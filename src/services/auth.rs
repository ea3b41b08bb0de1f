use crate::connectors::{AuthGateway, AuthSession, AuthUser};
use crate::errors::CatalogError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifetime assumed when the auth response omits `expires_in`.
const DEFAULT_SESSION_SECS: u64 = 3600;
/// Upper bound on a stored session lifetime.
const MAX_SESSION_SECS: u64 = 60 * 60 * 24 * 365;

/// Admin session kept between commands.
///
/// Mirrors the password-grant response; the relative `expires_in` is turned
/// into an absolute `expires_at` when the session is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: String,
    pub email: Option<String>,
}

impl AdminSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl From<AuthSession> for AdminSession {
    fn from(session: AuthSession) -> Self {
        let ttl = session
            .expires_in
            .unwrap_or(DEFAULT_SESSION_SECS)
            .min(MAX_SESSION_SECS);
        let expires_at = Utc::now() + Duration::seconds(ttl as i64);
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: session.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at,
            user_id: session.user.id,
            email: session.user.email,
        }
    }
}

impl fmt::Display for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let email = self.email.as_deref().unwrap_or("<unknown>");
        let expired = if self.is_expired() { " (expired)" } else { "" };
        write!(f, "Logged in as {email}{expired}")
    }
}

/// Password sign-in against the remote auth service.
#[derive(Clone)]
pub struct AdminAuth {
    gateway: Arc<dyn AuthGateway>,
}

impl AdminAuth {
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, CatalogError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CatalogError::validation("email and password are required"));
        }
        let session = self
            .gateway
            .sign_in_with_password(email.trim(), password)
            .await
            .map_err(CatalogError::Remote)?;
        tracing::info!(email = %email.trim(), "Admin signed in");
        Ok(session.into())
    }

    /// Revoke the session remotely. Callers drop their local copy regardless.
    pub async fn sign_out(&self, session: &AdminSession) -> Result<(), CatalogError> {
        self.gateway
            .sign_out(&session.access_token)
            .await
            .map_err(CatalogError::Remote)
    }

    pub async fn current_user(&self, session: &AdminSession) -> Result<AuthUser, CatalogError> {
        self.gateway
            .get_user(&session.access_token)
            .await
            .map_err(CatalogError::Remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::MockRemoteStore;

    fn auth() -> AdminAuth {
        let remote = MockRemoteStore::new().with_admin("admin@moodoo.com", "secret");
        AdminAuth::new(Arc::new(remote))
    }

    #[tokio::test]
    async fn test_sign_in_builds_session() {
        let session = auth().sign_in(" admin@moodoo.com ", "secret").await.unwrap();
        assert_eq!(session.email.as_deref(), Some("admin@moodoo.com"));
        assert!(!session.is_expired());
        let remaining = session.expires_at - Utc::now();
        assert!(remaining.num_seconds() > 3500 && remaining.num_seconds() <= 3600);
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_password() {
        let err = auth().sign_in("admin@moodoo.com", "nope").await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_sign_in_requires_both_fields() {
        let err = auth().sign_in("", "secret").await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_current_user_and_sign_out() {
        let auth = auth();
        let session = auth.sign_in("admin@moodoo.com", "secret").await.unwrap();
        let user = auth.current_user(&session).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("admin@moodoo.com"));

        auth.sign_out(&session).await.unwrap();
        assert!(auth.current_user(&session).await.is_err());
    }

    #[test]
    fn test_oversized_expiry_is_clamped() {
        let session = AdminSession::from(AuthSession {
            access_token: "t".into(),
            refresh_token: None,
            token_type: None,
            expires_in: Some(u64::MAX),
            user: AuthUser {
                id: "u".into(),
                email: None,
            },
        });
        assert!(!session.is_expired());
        let remaining = session.expires_at - Utc::now();
        assert!(remaining.num_seconds() <= MAX_SESSION_SECS as i64);
        assert_eq!(session.token_type, "bearer");
    }

    #[test]
    fn test_display_marks_expired() {
        let session = AdminSession {
            access_token: "t".into(),
            refresh_token: None,
            token_type: "bearer".into(),
            expires_at: Utc::now() - Duration::minutes(1),
            user_id: "u".into(),
            email: Some("admin@moodoo.com".into()),
        };
        let shown = session.to_string();
        assert!(shown.contains("admin@moodoo.com"));
        assert!(shown.contains("expired"));
    }
}
