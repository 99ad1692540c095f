//! Storage key names for the current and legacy schemes
//!
//! All client state lives under the `intermax-` namespace. The `edx-`
//! prefix is the superseded scheme from earlier releases: its project
//! list is consulted exactly once for migration and the admin scan still
//! enumerates it when reporting.

/// User session record
pub const SESSION: &str = "intermax-session";

/// Admin session record, tracked independently of the user session
pub const ADMIN_SESSION: &str = "intermax-admin-session";

/// Selected terminal theme
pub const THEME: &str = "intermax-theme";

/// Selected chat model identifier
pub const MODEL: &str = "intermax-model";

/// Index of the active project within the project list
pub const ACTIVE_PROJECT: &str = "intermax-active-project";

/// The whole project list, persisted as one value
pub const PROJECTS: &str = "intermax-projects";

/// Namespace prefix for the current scheme
pub const APP_PREFIX: &str = "intermax-";

/// Namespace prefix for the legacy scheme
pub const LEGACY_PREFIX: &str = "edx-";

/// Legacy project list, read once for migration then deleted
pub const LEGACY_PROJECTS: &str = "edx-projects";
