//! Project management handlers

use crate::cli::ProjectCommand;
use crate::commands::require_session;
use crate::config::Config;
use crate::error::{IntermaxError, Result};
use crate::project::ProjectStore;
use crate::session::{SessionKind, SessionManager};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle the `projects` subcommands
pub fn handle_projects(config: Config, command: ProjectCommand) -> Result<()> {
    let store = config.open_store()?;
    let sessions = SessionManager::new(store.clone());
    require_session(&sessions, SessionKind::User)?;

    let mut projects = ProjectStore::initialize(store);

    match command {
        ProjectCommand::List => {
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Modified".bold(),
                "".bold()
            ]);

            for (index, project) in projects.projects().iter().enumerate() {
                let marker = if index == projects.active_index() {
                    "active".green().to_string()
                } else {
                    String::new()
                };
                table.add_row(prettytable::row![
                    project.id.to_string().cyan(),
                    project.title,
                    project.message_count(),
                    format_stamp(project.last_modified),
                    marker
                ]);
            }

            println!("\nProjects:");
            table.printstd();
            println!();
        }
        ProjectCommand::New { title } => match projects.create_project(&title) {
            Some(index) => println!(
                "{}",
                format!("Created project \"{}\" (#{}).", title, index).green()
            ),
            None => println!("{}", "Project title must not be empty.".yellow()),
        },
        ProjectCommand::Delete { id } => {
            if projects.delete_project(id) {
                println!("{}", format!("Deleted project {}.", id).green());
            } else if projects.len() == 1 {
                return Err(IntermaxError::InvariantViolation(
                    "the last remaining project cannot be deleted".to_string(),
                )
                .into());
            } else {
                println!("{}", format!("No project with id {}.", id).yellow());
            }
        }
        ProjectCommand::Use { index } => {
            if index < projects.len() {
                projects.set_active(index);
                println!(
                    "{}",
                    format!("Active project: {}", projects.active_project().title).green()
                );
            } else {
                println!(
                    "{}",
                    format!("Index {} is out of range (0..{}).", index, projects.len()).yellow()
                );
            }
        }
    }

    Ok(())
}

/// Render an epoch-milliseconds stamp for table display
fn format_stamp(stamp: Option<i64>) -> String {
    stamp
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn logged_in_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store"));
        let sessions = SessionManager::new(config.open_store().unwrap());
        sessions.start(SessionKind::User, "Paul");
        config
    }

    #[test]
    #[serial]
    fn test_projects_require_user_session() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store"));

        let result = handle_projects(config, ProjectCommand::List);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_new_then_list_round_trip() {
        let dir = tempdir().unwrap();
        let config = logged_in_config(&dir);

        handle_projects(config.clone(), ProjectCommand::New { title: "Lab".into() }).unwrap();
        handle_projects(config.clone(), ProjectCommand::List).unwrap();

        let projects = ProjectStore::initialize(config.open_store().unwrap());
        assert_eq!(projects.len(), 2);
        assert_eq!(projects.active_project().title, "Lab");
    }

    #[test]
    #[serial]
    fn test_delete_last_project_reports_invariant_violation() {
        let dir = tempdir().unwrap();
        let config = logged_in_config(&dir);
        let projects = ProjectStore::initialize(config.open_store().unwrap());
        let id = projects.projects()[0].id;
        drop(projects);

        let result = handle_projects(config, ProjectCommand::Delete { id });
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_format_stamp_handles_missing_value() {
        assert_eq!(format_stamp(None), "-");
        assert!(format_stamp(Some(1_700_000_000_000)).starts_with("2023-"));
    }
}
