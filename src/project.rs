//! Project persistence and synchronization
//!
//! A project is a named conversation transcript. The store owns the
//! in-memory project list and the active-project index, validates and
//! migrates persisted data once at startup, and re-persists the whole
//! collection after every mutation.
//!
//! Transcript invariant: `notes` is a flattened alternating sequence of
//! (user turn, assistant turn) pairs appended two at a time. A failed
//! chat round-trip appends nothing, so the persisted transcript never
//! ends in a dangling user turn. The displayed message count is
//! `notes.len() / 2`.

use crate::session::now_ms;
use crate::storage::{keys, KvStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, independently addressable conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Creation-time-derived identifier (epoch milliseconds)
    pub id: i64,

    pub title: String,

    /// Alternating user/assistant turns, flattened
    #[serde(default)]
    pub notes: Vec<String>,

    /// Epoch milliseconds; absent in records written by older releases
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Epoch milliseconds, re-stamped on every persist
    #[serde(default, rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl Project {
    /// Completed exchanges in this transcript
    pub fn message_count(&self) -> usize {
        self.notes.len() / 2
    }
}

/// Owns the project list, the active index, and their persistence
///
/// Construction via [`ProjectStore::initialize`] is the only point at
/// which validation and legacy migration run; every later mutation
/// operates on the in-memory state and immediately re-persists it.
pub struct ProjectStore {
    store: KvStore,
    projects: Vec<Project>,
    active: usize,
}

impl ProjectStore {
    /// Load, validate, and migrate persisted projects
    ///
    /// A stored list is accepted only if at least one element survives
    /// per-element validation (an id, a non-empty title, and a notes
    /// sequence). When nothing survives, the list is replaced by the
    /// seeded welcome project and persisted immediately. The active
    /// index is restored from its own key only when it is in bounds.
    pub fn initialize(store: KvStore) -> Self {
        migrate_legacy_projects(&store);

        let stored: Option<Vec<Value>> = store.get_opt(keys::PROJECTS);
        let total = stored.as_ref().map(|s| s.len()).unwrap_or(0);

        let mut projects: Vec<Project> = stored
            .unwrap_or_default()
            .iter()
            .filter_map(validate_project)
            .collect();

        if projects.len() < total {
            tracing::warn!(
                "Dropped {} invalid project record(s) while loading",
                total - projects.len()
            );
        }

        if projects.is_empty() {
            tracing::info!("No usable projects found; seeding welcome project");
            projects = default_projects();
            store.set(keys::PROJECTS, &projects);
        }

        let saved_active: usize = store.get(keys::ACTIVE_PROJECT, 0);
        let active = if saved_active < projects.len() {
            saved_active
        } else {
            0
        };

        Self {
            store,
            projects,
            active,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_project(&self) -> &Project {
        &self.projects[self.active]
    }

    /// Create a project and make it active
    ///
    /// Whitespace-only titles are rejected as a no-op. Returns the new
    /// project's index on success.
    pub fn create_project(&mut self, title: &str) -> Option<usize> {
        if title.trim().is_empty() {
            return None;
        }

        let now = now_ms();
        let mut id = now;
        // Creation-time ids must stay unique even for back-to-back creates
        while self.projects.iter().any(|p| p.id == id) {
            id += 1;
        }

        self.projects.push(Project {
            id,
            title: title.to_string(),
            notes: Vec::new(),
            created_at: Some(now),
            last_modified: Some(now),
        });
        self.active = self.projects.len() - 1;
        self.persist();
        self.persist_active_index();
        Some(self.active)
    }

    /// Delete a project by id
    ///
    /// Refuses to delete the last remaining project. When the removed
    /// slot was at or before the active index, the active index moves to
    /// `max(0, previous - 1)` so it always stays in bounds.
    pub fn delete_project(&mut self, id: i64) -> bool {
        if self.projects.len() <= 1 {
            tracing::info!("Refusing to delete the last remaining project");
            return false;
        }

        let Some(position) = self.projects.iter().position(|p| p.id == id) else {
            return false;
        };

        self.projects.remove(position);
        if position <= self.active {
            self.active = self.active.saturating_sub(1);
        }

        self.persist();
        self.persist_active_index();
        true
    }

    /// Switch the active project; out-of-range indices are a no-op
    pub fn set_active(&mut self, index: usize) {
        if index < self.projects.len() {
            self.active = index;
            self.persist_active_index();
        }
    }

    /// Append one completed exchange to a project's transcript
    ///
    /// Appends exactly two entries and persists the whole collection.
    /// This is the sole mutation path for transcripts; it runs only once
    /// both turns of a round-trip are known, so a failed round-trip
    /// leaves the stored transcript untouched.
    pub fn append_exchange(
        &mut self,
        index: usize,
        user_turn: impl Into<String>,
        assistant_turn: impl Into<String>,
    ) -> bool {
        let Some(project) = self.projects.get_mut(index) else {
            return false;
        };

        project.notes.push(user_turn.into());
        project.notes.push(assistant_turn.into());
        self.persist();
        true
    }

    /// Write the whole collection back to the store
    ///
    /// Every project's `last_modified` is re-stamped, not just the
    /// mutated one; this matches the historical write path (see
    /// DESIGN.md).
    fn persist(&mut self) {
        let now = now_ms();
        for project in &mut self.projects {
            project.last_modified = Some(now);
        }
        if !self.store.set(keys::PROJECTS, &self.projects) {
            tracing::warn!("Project list could not be persisted; continuing in memory");
        }
    }

    fn persist_active_index(&self) {
        self.store.set(keys::ACTIVE_PROJECT, &self.active);
    }
}

/// Accept a stored element only if it looks like a usable project
///
/// Requires an id, a non-empty title, and a notes sequence (possibly
/// empty). Anything else is dropped by the caller.
fn validate_project(value: &Value) -> Option<Project> {
    let obj = value.as_object()?;
    obj.get("id")?.as_i64()?;
    let title = obj.get("title")?.as_str()?;
    if title.is_empty() {
        return None;
    }
    if !obj.get("notes")?.is_array() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// One-time migration of the legacy project list
///
/// Runs only when the current key holds nothing usable and the legacy
/// key holds project data: valid legacy entries are stamped with fresh
/// timestamps, written under the current key, and the legacy key is
/// deleted. One-directional; nothing is ever written back to the legacy
/// scheme.
fn migrate_legacy_projects(store: &KvStore) {
    let current: Option<Vec<Value>> = store.get_opt(keys::PROJECTS);
    if current.map(|c| !c.is_empty()).unwrap_or(false) {
        return;
    }

    let Some(legacy) = store.get_opt::<Vec<Value>>(keys::LEGACY_PROJECTS) else {
        return;
    };

    let now = now_ms();
    let migrated: Vec<Project> = legacy
        .iter()
        .filter_map(validate_project)
        .map(|mut project| {
            project.created_at = Some(now);
            project.last_modified = Some(now);
            project
        })
        .collect();

    if migrated.is_empty() {
        return;
    }

    tracing::info!("Migrating {} project(s) from the legacy scheme", migrated.len());
    if store.set(keys::PROJECTS, &migrated) {
        store.remove(keys::LEGACY_PROJECTS);
    }
}

/// Seeded project shown on first run (or after a wiped/corrupted store)
pub fn default_projects() -> Vec<Project> {
    let now = now_ms();
    vec![Project {
        id: now,
        title: "Welcome Session".to_string(),
        notes: vec![
            "Initialize ARIA interface".to_string(),
            "[GPT-4o Mini] ARIA systems online. Neural networks activated. Welcome to \
             InterMAX-UI Terminal v2.2.8.\n\nI am ARIA (Advanced Reasoning Intelligence \
             Agent), your cyberpunk AI assistant. File upload capabilities are active. How \
             may I assist you with your digital operations today?\n\n[Usage: 15 + 45 = 60 \
             tokens]"
                .to_string(),
        ],
        created_at: Some(now),
        last_modified: Some(now),
    }]
}
