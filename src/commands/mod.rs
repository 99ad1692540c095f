/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes five top-level command modules:

- `chat`     — Interactive chat terminal
- `auth`     — User login/logout
- `projects` — Project management
- `models`   — Model catalog listing
- `admin`    — Admin console (login, report, export, prune)

These handlers are intentionally small and use the library components:
the storage wrapper, the session manager, the project store, and the
chat gateway.
*/

use crate::auth::Credentials;
use crate::error::{IntermaxError, Result};
use crate::session::{Session, SessionKind, SessionManager};

pub mod admin;
pub mod auth;
pub mod chat;
pub mod models;
pub mod projects;

/// Load a valid session of the given kind or fail with a pointer to the
/// right login command
pub(crate) fn require_session(sessions: &SessionManager, kind: SessionKind) -> Result<Session> {
    sessions.load(kind).ok_or_else(|| {
        let hint = match kind {
            SessionKind::User => "log in first with `intermax login`",
            SessionKind::Admin => "log in first with `intermax admin login`",
        };
        IntermaxError::SessionExpired(hint.to_string()).into()
    })
}

/// Collect credentials, prompting for anything not given on the CLI
pub(crate) fn collect_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<Credentials> {
    if let (Some(username), Some(password)) = (&username, &password) {
        return Ok(Credentials {
            username: username.clone(),
            password: password.clone(),
        });
    }

    let mut rl = rustyline::DefaultEditor::new()?;
    let username = match username {
        Some(username) => username,
        None => rl.readline("Username: ")?.trim().to_string(),
    };
    let password = match password {
        Some(password) => password,
        None => rl.readline("Password: ")?.trim().to_string(),
    };

    Ok(Credentials { username, password })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KvStore;
    use tempfile::tempdir;

    #[test]
    fn test_require_session_fails_without_login() {
        let dir = tempdir().unwrap();
        let store = KvStore::open(dir.path().join("store")).unwrap();
        let sessions = SessionManager::new(store);

        assert!(require_session(&sessions, SessionKind::User).is_err());
        assert!(require_session(&sessions, SessionKind::Admin).is_err());
    }

    #[test]
    fn test_require_session_returns_active_session() {
        let dir = tempdir().unwrap();
        let store = KvStore::open(dir.path().join("store")).unwrap();
        let sessions = SessionManager::new(store);
        sessions.start(SessionKind::User, "paul");

        let session = require_session(&sessions, SessionKind::User).unwrap();
        assert_eq!(session.subject, "paul");
    }
}
