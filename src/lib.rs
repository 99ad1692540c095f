//! InterMAX - terminal chat client library
//!
//! This library provides the core functionality for the InterMAX chat
//! client, including project persistence, session handling, the chat
//! gateway with its local simulator, and the admin aggregation layer.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: fault-suppressing wrapper over the embedded key-value store
//! - `session`: user and admin session lifecycle with independent TTLs
//! - `auth`: pluggable credential verification
//! - `project`: project collection ownership, validation, and migration
//! - `gateway`: chat relay to the inference endpoint or the local simulator
//! - `admin`: cross-project aggregation, export, and retention pruning
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use intermax::project::ProjectStore;
//! use intermax::storage::KvStore;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = KvStore::open_default()?;
//!     let mut projects = ProjectStore::initialize(store);
//!     projects.create_project("Field notes");
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod prefs;
pub mod project;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use admin::AdminAggregator;
pub use auth::{Authenticator, Credentials, StaticAuthenticator};
pub use config::Config;
pub use error::{IntermaxError, Result};
pub use gateway::ChatGateway;
pub use prefs::{Preferences, Theme};
pub use project::{Project, ProjectStore};
pub use session::{Session, SessionKind, SessionManager};
pub use storage::KvStore;
