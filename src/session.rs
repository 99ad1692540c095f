//! Session handling for user and admin logins
//!
//! Sessions are time-bounded proofs of having logged in, scoped to the
//! user or admin role. The two kinds are independent state machines with
//! separate storage keys and separate lifetimes; ending one never
//! affects the other. Expiry is checked lazily at load time rather than
//! by a timer, so a stale record survives in storage until the next
//! read notices it and clears it.

use crate::storage::{keys, KvStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// User sessions expire after 24 hours
pub const USER_SESSION_TTL_MS: i64 = 86_400_000;

/// Admin sessions expire after 2 hours
pub const ADMIN_SESSION_TTL_MS: i64 = 7_200_000;

/// Version stamp written into session records
pub const CLIENT_VERSION: &str = "2.2.8";

/// Which role a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    User,
    Admin,
}

impl SessionKind {
    /// Storage key holding this kind's session record
    pub fn storage_key(self) -> &'static str {
        match self {
            SessionKind::User => keys::SESSION,
            SessionKind::Admin => keys::ADMIN_SESSION,
        }
    }

    /// Wall-clock lifetime of this kind's sessions, in milliseconds
    pub fn ttl_ms(self) -> i64 {
        match self {
            SessionKind::User => USER_SESSION_TTL_MS,
            SessionKind::Admin => ADMIN_SESSION_TTL_MS,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::User => write!(f, "user"),
            SessionKind::Admin => write!(f, "admin"),
        }
    }
}

/// A stored login session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Who logged in
    pub subject: String,

    /// Epoch milliseconds at issuance
    pub issued_at: i64,

    /// Client version that issued the session
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    CLIENT_VERSION.to_string()
}

/// Validates, issues, and ends sessions against the durable store
#[derive(Clone)]
pub struct SessionManager {
    store: KvStore,
}

impl SessionManager {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Load the current session of the given kind, if still valid
    ///
    /// An absent, malformed, or expired record is treated as "no
    /// session"; malformed and expired records are cleared from the
    /// store as a side effect so they are not re-examined on the next
    /// load.
    pub fn load(&self, kind: SessionKind) -> Option<Session> {
        let key = kind.storage_key();
        let session: Option<Session> = self.store.get_opt(key);

        let session = match session {
            Some(session) if !session.subject.is_empty() => session,
            _ => {
                // Either nothing stored or an unreadable record; only
                // the latter needs clearing.
                if self.store.raw(key).is_some() {
                    tracing::warn!("Clearing unreadable {} session record", kind);
                    self.store.remove(key);
                }
                return None;
            }
        };

        let age_ms = now_ms() - session.issued_at;
        if age_ms >= kind.ttl_ms() {
            tracing::info!(
                "{} session for {} expired ({} ms old)",
                kind,
                session.subject,
                age_ms
            );
            self.store.remove(key);
            return None;
        }

        Some(session)
    }

    /// Issue and persist a fresh session for the given subject
    pub fn start(&self, kind: SessionKind, subject: impl Into<String>) -> Session {
        let session = Session {
            subject: subject.into(),
            issued_at: now_ms(),
            version: default_version(),
        };

        if !self.store.set(kind.storage_key(), &session) {
            tracing::warn!("Could not persist {} session; it will not survive restart", kind);
        }
        session
    }

    /// End the current session of the given kind
    pub fn end(&self, kind: SessionKind) -> bool {
        self.store.remove(kind.storage_key())
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
