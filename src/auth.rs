//! Login verification
//!
//! The client ships with a fixed credential check rather than a real
//! authentication backend. The check sits behind the [`Authenticator`]
//! trait so a real backend can be substituted without touching the
//! project store or the chat gateway.

use crate::config::AuthConfig;
use crate::error::{IntermaxError, Result};
use crate::session::{Session, SessionKind, SessionManager};

/// Login credentials as collected from the operator
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Capability to turn credentials into a session
///
/// `verify` either issues a session of the requested kind or fails with
/// `IntermaxError::InvalidLogin`, leaving stored state untouched.
pub trait Authenticator {
    fn verify(&self, kind: SessionKind, credentials: &Credentials) -> Result<Session>;
}

/// Authenticator backed by credential pairs from the configuration
///
/// User and admin credentials are separate pairs; a valid user login
/// never grants admin access and vice versa.
pub struct StaticAuthenticator {
    config: AuthConfig,
    sessions: SessionManager,
}

impl StaticAuthenticator {
    pub fn new(config: AuthConfig, sessions: SessionManager) -> Self {
        Self { config, sessions }
    }

    fn expected(&self, kind: SessionKind) -> (&str, &str) {
        match kind {
            SessionKind::User => (&self.config.username, &self.config.password),
            SessionKind::Admin => (&self.config.admin_username, &self.config.admin_password),
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, kind: SessionKind, credentials: &Credentials) -> Result<Session> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(
                IntermaxError::InvalidLogin("username and password are required".to_string())
                    .into(),
            );
        }

        let (username, password) = self.expected(kind);
        if credentials.username != username || credentials.password != password {
            tracing::info!("Rejected {} login attempt for {}", kind, credentials.username);
            return Err(
                IntermaxError::InvalidLogin("invalid credentials, access denied".to_string())
                    .into(),
            );
        }

        tracing::info!("{} login accepted for {}", kind, credentials.username);
        Ok(self.sessions.start(kind, credentials.username.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KvStore;
    use tempfile::tempdir;

    fn create_test_authenticator() -> (StaticAuthenticator, SessionManager, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = KvStore::open(dir.path().join("store")).expect("failed to open store");
        let sessions = SessionManager::new(store);
        let auth = StaticAuthenticator::new(AuthConfig::default(), sessions.clone());
        (auth, sessions, dir)
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_user_login_starts_session() {
        let (auth, sessions, _dir) = create_test_authenticator();

        let session = auth
            .verify(SessionKind::User, &credentials("Paul", "intermaxuiweb2025"))
            .expect("login should succeed");
        assert_eq!(session.subject, "Paul");
        assert!(sessions.load(SessionKind::User).is_some());
    }

    #[test]
    fn test_valid_admin_login_starts_admin_session_only() {
        let (auth, sessions, _dir) = create_test_authenticator();

        auth.verify(
            SessionKind::Admin,
            &credentials("admin", "intermax-admin-2025"),
        )
        .expect("admin login should succeed");

        assert!(sessions.load(SessionKind::Admin).is_some());
        assert!(sessions.load(SessionKind::User).is_none());
    }

    #[test]
    fn test_wrong_password_is_rejected_without_state_change() {
        let (auth, sessions, _dir) = create_test_authenticator();

        let result = auth.verify(SessionKind::User, &credentials("Paul", "wrong"));
        assert!(result.is_err());
        assert!(sessions.load(SessionKind::User).is_none());
    }

    #[test]
    fn test_user_credentials_do_not_grant_admin() {
        let (auth, sessions, _dir) = create_test_authenticator();

        let result = auth.verify(
            SessionKind::Admin,
            &credentials("Paul", "intermaxuiweb2025"),
        );
        assert!(result.is_err());
        assert!(sessions.load(SessionKind::Admin).is_none());
    }

    #[test]
    fn test_empty_credentials_are_rejected() {
        let (auth, _sessions, _dir) = create_test_authenticator();

        assert!(auth
            .verify(SessionKind::User, &credentials("", ""))
            .is_err());
    }
}
