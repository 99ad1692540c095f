//! Admin aggregation over the durable store
//!
//! The aggregator reads the same store as the client, out of band: it
//! enumerates every key under the current and legacy namespaces,
//! reconstructs a cross-project reporting view, computes summary
//! statistics, and supports exporting a snapshot and pruning stale
//! projects. Individual unreadable records are skipped with a warning;
//! a scan never aborts.

use crate::error::Result;
use crate::session::{now_ms, USER_SESSION_TTL_MS};
use crate::storage::{keys, KvStore};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

/// One project as seen by the admin view, tagged with its origin
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReportEntry {
    pub id: i64,
    pub title: String,
    /// Subject of the co-located user session, "Unknown" when that
    /// record is unreadable, "System" when there is none
    pub owner: String,
    /// Key the project was found under
    pub storage_key: String,
    /// Completed exchanges (`notes` entries halved)
    pub message_count: usize,
    pub note_count: usize,
    pub created_at: Option<i64>,
    pub last_modified: Option<i64>,
}

/// One session record as seen by the admin view
#[derive(Debug, Clone, Serialize)]
pub struct SessionReportEntry {
    pub storage_key: String,
    pub subject: String,
    /// Judged by the 24-hour activity rule regardless of kind
    pub active: bool,
    pub issued_at: Option<i64>,
}

/// Summary statistics over everything found in the scan
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_projects: usize,
    pub total_messages: usize,
    pub total_users: usize,
    pub active_sessions: usize,
    pub storage_bytes: u64,
    /// `storage_bytes` formatted in human units
    pub storage_used: String,
    pub last_updated: String,
}

/// Full result of one scan
#[derive(Debug, Clone, Serialize)]
pub struct AdminReport {
    pub projects: Vec<ProjectReportEntry>,
    pub sessions: Vec<SessionReportEntry>,
    pub stats: AdminStats,
}

/// Exportable snapshot of a scan
#[derive(Debug, Serialize)]
struct ExportSnapshot<'a> {
    stats: &'a AdminStats,
    projects: &'a [ProjectReportEntry],
    export_date: String,
    version: &'static str,
}

/// Aggregates and maintains all locally stored conversation data
pub struct AdminAggregator {
    store: KvStore,
}

impl AdminAggregator {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Scan the store and build the cross-project reporting view
    pub fn scan(&self) -> AdminReport {
        let scanned_keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(keys::APP_PREFIX) || k.starts_with(keys::LEGACY_PREFIX))
            .collect();

        let owner = self.project_owner();

        let mut projects = Vec::new();
        let mut sessions = Vec::new();
        let mut storage_bytes: u64 = 0;

        for key in &scanned_keys {
            let Some(raw) = self.store.raw(key) else {
                continue;
            };
            storage_bytes += raw.len() as u64;

            let value: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Skipping unparseable record under {}: {}", key, e);
                    continue;
                }
            };

            if key.contains("projects") {
                if let Some(entries) = value.as_array() {
                    for entry in entries {
                        if let Some(report) = project_entry(entry, key, &owner) {
                            projects.push(report);
                        }
                    }
                }
            }

            if key.contains("session") {
                sessions.push(session_entry(&value, key));
            }
        }

        let mut subjects: Vec<&str> = sessions
            .iter()
            .map(|s| s.subject.as_str())
            .filter(|s| *s != "Unknown")
            .collect();
        subjects.sort_unstable();
        subjects.dedup();

        // Per-project counts are already halved; the total halves the
        // sum once more. This keeps the dashboard's historical
        // arithmetic (see DESIGN.md before changing it).
        let total_messages = projects
            .iter()
            .map(|p| p.message_count)
            .sum::<usize>()
            / 2;

        let stats = AdminStats {
            total_projects: projects.len(),
            total_messages,
            total_users: subjects.len(),
            active_sessions: sessions.iter().filter(|s| s.active).count(),
            storage_bytes,
            storage_used: format_bytes(storage_bytes),
            last_updated: Utc::now().to_rfc3339(),
        };

        AdminReport {
            projects,
            sessions,
            stats,
        }
    }

    /// Produce a single JSON snapshot of stats and projects
    pub fn export(&self) -> Result<String> {
        let report = self.scan();
        let snapshot = ExportSnapshot {
            stats: &report.stats,
            projects: &report.projects,
            export_date: Utc::now().to_rfc3339(),
            version: "2.2.8",
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Drop projects older than the retention window
    ///
    /// For each current-scheme project-list key, keeps only projects
    /// whose `last_modified`, falling back to `created_at`, falling back
    /// to the epoch, lies within the window. A key is rewritten only
    /// when its project count actually changed. Returns how many
    /// projects were dropped in total.
    pub fn prune_older_than(&self, days: i64) -> usize {
        let cutoff = now_ms() - days * 86_400_000;
        let mut dropped = 0;

        let project_keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(keys::APP_PREFIX) && k.contains("projects"))
            .collect();

        for key in project_keys {
            let Some(entries) = self.store.get_opt::<Vec<Value>>(&key) else {
                continue;
            };

            let retained: Vec<Value> = entries
                .iter()
                .filter(|entry| {
                    let stamp = entry
                        .get("lastModified")
                        .and_then(timestamp_ms)
                        .or_else(|| entry.get("createdAt").and_then(timestamp_ms))
                        .unwrap_or(0);
                    stamp > cutoff
                })
                .cloned()
                .collect();

            if retained.len() != entries.len() {
                dropped += entries.len() - retained.len();
                tracing::info!(
                    "Pruned {} project(s) under {}",
                    entries.len() - retained.len(),
                    key
                );
                self.store.set(&key, &retained);
            }
        }

        dropped
    }

    /// Owner name derived from the co-located user session record
    fn project_owner(&self) -> String {
        match self.store.raw(keys::SESSION) {
            Some(raw) => serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|v| subject_of(&v))
                .unwrap_or_else(|| "Unknown".to_string()),
            None => "System".to_string(),
        }
    }
}

/// Build a report entry for one stored project element
fn project_entry(entry: &Value, key: &str, owner: &str) -> Option<ProjectReportEntry> {
    let obj = entry.as_object()?;
    let id = obj.get("id")?.as_i64()?;
    let title = obj.get("title")?.as_str()?.to_string();
    let note_count = obj
        .get("notes")
        .and_then(|n| n.as_array())
        .map(|n| n.len())
        .unwrap_or(0);

    Some(ProjectReportEntry {
        id,
        title,
        owner: owner.to_string(),
        storage_key: key.to_string(),
        message_count: note_count / 2,
        note_count,
        created_at: obj.get("createdAt").and_then(timestamp_ms),
        last_modified: obj.get("lastModified").and_then(timestamp_ms),
    })
}

/// Build a report entry for one stored session record
///
/// Tolerates both the current record shape and legacy shapes that used
/// `user`/`admin` and `timestamp` field names.
fn session_entry(value: &Value, key: &str) -> SessionReportEntry {
    let subject = subject_of(value).unwrap_or_else(|| "Unknown".to_string());
    let issued_at = value
        .get("issued_at")
        .and_then(timestamp_ms)
        .or_else(|| value.get("timestamp").and_then(timestamp_ms));

    let active = issued_at
        .map(|t| now_ms() - t < USER_SESSION_TTL_MS)
        .unwrap_or(false);

    SessionReportEntry {
        storage_key: key.to_string(),
        subject,
        active,
        issued_at,
    }
}

fn subject_of(value: &Value) -> Option<String> {
    for field in ["subject", "user", "admin"] {
        if let Some(subject) = value.get(field).and_then(|v| v.as_str()) {
            if !subject.is_empty() {
                return Some(subject.to_string());
            }
        }
    }
    None
}

/// Read a timestamp that may be epoch milliseconds or an RFC-3339 string
fn timestamp_ms(value: &Value) -> Option<i64> {
    if let Some(ms) = value.as_i64() {
        return Some(ms);
    }
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp_millis())
}

/// Format a byte count in human units at one decimal
///
/// # Examples
///
/// ```
/// use intermax::admin::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let formatted = format!("{:.1}", value);
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{} {}", trimmed, UNITS[exponent])
}
