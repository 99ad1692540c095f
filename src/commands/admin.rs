//! Admin console handlers
//!
//! Every data-touching subcommand requires a valid admin session; admin
//! login is tracked independently of the user session and expires after
//! two hours.

use crate::admin::AdminAggregator;
use crate::auth::{Authenticator, StaticAuthenticator};
use crate::cli::AdminCommand;
use crate::commands::{collect_credentials, require_session};
use crate::config::Config;
use crate::error::Result;
use crate::session::{SessionKind, SessionManager};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle the `admin` subcommands
pub fn handle_admin(config: Config, command: AdminCommand) -> Result<()> {
    let store = config.open_store()?;
    let sessions = SessionManager::new(store.clone());

    match command {
        AdminCommand::Login { username, password } => {
            if let Some(existing) = sessions.load(SessionKind::Admin) {
                println!(
                    "{}",
                    format!("Already logged in as admin {}.", existing.subject).yellow()
                );
                return Ok(());
            }

            let credentials = collect_credentials(username, password)?;
            let authenticator = StaticAuthenticator::new(config.auth.clone(), sessions);
            let session = authenticator.verify(SessionKind::Admin, &credentials)?;
            println!(
                "{}",
                format!("Admin access granted for {}.", session.subject).green()
            );
        }
        AdminCommand::Logout => {
            sessions.end(SessionKind::Admin);
            println!("{}", "Admin session ended.".green());
        }
        AdminCommand::Report => {
            require_session(&sessions, SessionKind::Admin)?;
            let report = AdminAggregator::new(store).scan();

            println!("\n{}", "InterMAX Control Center".bold());
            println!("Total projects:  {}", report.stats.total_projects);
            println!("Messages:        {}", report.stats.total_messages);
            println!("Users:           {}", report.stats.total_users);
            println!("Active sessions: {}", report.stats.active_sessions);
            println!("Storage used:    {}", report.stats.storage_used);

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Owner".bold(),
                "Msgs".bold(),
                "Key".bold()
            ]);
            for project in &report.projects {
                table.add_row(prettytable::row![
                    project.id.to_string().cyan(),
                    project.title,
                    project.owner,
                    project.message_count,
                    project.storage_key
                ]);
            }
            println!("\nProjects:");
            table.printstd();

            if !report.sessions.is_empty() {
                println!("\nSessions:");
                for session in &report.sessions {
                    let status = if session.active {
                        "active".green()
                    } else {
                        "expired".red()
                    };
                    println!("  {} ({}) - {}", session.subject, session.storage_key, status);
                }
            }
            println!();
        }
        AdminCommand::Export { output } => {
            require_session(&sessions, SessionKind::Admin)?;
            let snapshot = AdminAggregator::new(store).export()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &snapshot)?;
                    println!(
                        "{}",
                        format!("Exported snapshot to {}.", path.display()).green()
                    );
                }
                None => println!("{}", snapshot),
            }
        }
        AdminCommand::Prune { days } => {
            require_session(&sessions, SessionKind::Admin)?;
            let dropped = AdminAggregator::new(store).prune_older_than(days);
            if dropped == 0 {
                println!("{}", format!("Nothing older than {} days.", days).yellow());
            } else {
                println!(
                    "{}",
                    format!("Pruned {} project(s) older than {} days.", dropped, days).green()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::tempdir;

    fn config_for(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store"));
        config
    }

    fn admin_login(config: &Config) {
        let sessions = SessionManager::new(config.open_store().unwrap());
        sessions.start(SessionKind::Admin, "admin");
    }

    #[test]
    #[serial]
    fn test_report_requires_admin_session() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);

        assert!(handle_admin(config, AdminCommand::Report).is_err());
    }

    #[test]
    #[serial]
    fn test_report_runs_with_admin_session() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);
        admin_login(&config);

        assert!(handle_admin(config, AdminCommand::Report).is_ok());
    }

    #[test]
    #[serial]
    fn test_admin_login_with_valid_credentials() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);

        handle_admin(
            config.clone(),
            AdminCommand::Login {
                username: Some("admin".to_string()),
                password: Some("intermax-admin-2025".to_string()),
            },
        )
        .expect("admin login should succeed");

        let sessions = SessionManager::new(config.open_store().unwrap());
        assert!(sessions.load(SessionKind::Admin).is_some());
    }

    #[test]
    #[serial]
    fn test_export_writes_snapshot_file() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);
        admin_login(&config);

        let store = config.open_store().unwrap();
        store.set(keys::PROJECTS, &json!([{ "id": 1, "title": "A", "notes": ["q", "a"] }]));
        drop(store);

        let output = dir.path().join("snapshot.json");
        handle_admin(
            config,
            AdminCommand::Export {
                output: Some(output.clone()),
            },
        )
        .unwrap();

        let written = std::fs::read_to_string(output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["stats"]["total_projects"], 1);
    }

    #[test]
    #[serial]
    fn test_prune_requires_admin_session() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir);

        assert!(handle_admin(config, AdminCommand::Prune { days: 30 }).is_err());
    }
}
