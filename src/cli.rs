//! Command-line interface definition for InterMAX
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for login, interactive chat, project management,
//! model listing, and the admin console.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// InterMAX - terminal chat client
///
/// Chat with an AI assistant from the terminal, with conversations
/// organized into locally persisted projects.
#[derive(Parser, Debug, Clone)]
#[command(name = "intermax")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the durable store directory
    #[arg(long)]
    pub store: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for InterMAX
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and start a user session
    Login {
        /// Username (prompted for when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// End the current user session
    Logout,

    /// Start the interactive chat terminal
    Chat {
        /// Override the selected model for this session
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Manage conversation projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Inspect available chat models
    Models {
        #[command(subcommand)]
        command: ModelCommand,
    },

    /// Administrative console over all locally stored data
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

/// Project management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommand {
    /// List all projects
    List,

    /// Create a project and make it active
    New {
        /// Project title
        title: String,
    },

    /// Delete a project by id
    Delete {
        /// Project id (see `projects list`)
        id: i64,
    },

    /// Switch the active project
    Use {
        /// 0-based project index
        index: usize,
    },
}

/// Model inspection subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List available models
    List,
}

/// Admin console subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Log in as administrator
    Login {
        /// Admin username (prompted for when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Admin password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// End the current admin session
    Logout,

    /// Aggregate and display all stored conversation data
    Report,

    /// Export a JSON snapshot of stats and projects
    Export {
        /// Write the snapshot to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drop projects older than the retention window
    Prune {
        /// Retention window in days
        #[arg(long, default_value_t = 30)]
        days: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["intermax", "chat"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert!(matches!(cli.command, Commands::Chat { model: None }));
    }

    #[test]
    fn test_cli_parse_chat_with_model_override() {
        let cli = Cli::try_parse_from(["intermax", "chat", "--model", "gpt-4"]).unwrap();
        if let Commands::Chat { model } = cli.command {
            assert_eq!(model, Some("gpt-4".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_login_with_credentials() {
        let cli = Cli::try_parse_from([
            "intermax", "login", "--username", "Paul", "--password", "secret",
        ])
        .unwrap();
        if let Commands::Login { username, password } = cli.command {
            assert_eq!(username, Some("Paul".to_string()));
            assert_eq!(password, Some("secret".to_string()));
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_cli_parse_login_without_credentials() {
        let cli = Cli::try_parse_from(["intermax", "login"]).unwrap();
        if let Commands::Login { username, password } = cli.command {
            assert_eq!(username, None);
            assert_eq!(password, None);
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_cli_parse_logout() {
        let cli = Cli::try_parse_from(["intermax", "logout"]).unwrap();
        assert!(matches!(cli.command, Commands::Logout));
    }

    #[test]
    fn test_cli_parse_projects_list() {
        let cli = Cli::try_parse_from(["intermax", "projects", "list"]).unwrap();
        if let Commands::Projects { command } = cli.command {
            assert!(matches!(command, ProjectCommand::List));
        } else {
            panic!("Expected Projects command");
        }
    }

    #[test]
    fn test_cli_parse_projects_new_with_title() {
        let cli = Cli::try_parse_from(["intermax", "projects", "new", "Research Notes"]).unwrap();
        if let Commands::Projects {
            command: ProjectCommand::New { title },
        } = cli.command
        {
            assert_eq!(title, "Research Notes");
        } else {
            panic!("Expected Projects New command");
        }
    }

    #[test]
    fn test_cli_parse_projects_delete_by_id() {
        let cli = Cli::try_parse_from(["intermax", "projects", "delete", "1733000000000"]).unwrap();
        if let Commands::Projects {
            command: ProjectCommand::Delete { id },
        } = cli.command
        {
            assert_eq!(id, 1_733_000_000_000);
        } else {
            panic!("Expected Projects Delete command");
        }
    }

    #[test]
    fn test_cli_parse_projects_use_index() {
        let cli = Cli::try_parse_from(["intermax", "projects", "use", "2"]).unwrap();
        if let Commands::Projects {
            command: ProjectCommand::Use { index },
        } = cli.command
        {
            assert_eq!(index, 2);
        } else {
            panic!("Expected Projects Use command");
        }
    }

    #[test]
    fn test_cli_parse_models_list() {
        let cli = Cli::try_parse_from(["intermax", "models", "list"]).unwrap();
        if let Commands::Models { command } = cli.command {
            assert!(matches!(command, ModelCommand::List));
        } else {
            panic!("Expected Models command");
        }
    }

    #[test]
    fn test_cli_parse_admin_report() {
        let cli = Cli::try_parse_from(["intermax", "admin", "report"]).unwrap();
        if let Commands::Admin { command } = cli.command {
            assert!(matches!(command, AdminCommand::Report));
        } else {
            panic!("Expected Admin command");
        }
    }

    #[test]
    fn test_cli_parse_admin_prune_default_days() {
        let cli = Cli::try_parse_from(["intermax", "admin", "prune"]).unwrap();
        if let Commands::Admin {
            command: AdminCommand::Prune { days },
        } = cli.command
        {
            assert_eq!(days, 30);
        } else {
            panic!("Expected Admin Prune command");
        }
    }

    #[test]
    fn test_cli_parse_admin_prune_custom_days() {
        let cli = Cli::try_parse_from(["intermax", "admin", "prune", "--days", "7"]).unwrap();
        if let Commands::Admin {
            command: AdminCommand::Prune { days },
        } = cli.command
        {
            assert_eq!(days, 7);
        } else {
            panic!("Expected Admin Prune command");
        }
    }

    #[test]
    fn test_cli_parse_admin_export_with_output() {
        let cli =
            Cli::try_parse_from(["intermax", "admin", "export", "--output", "snapshot.json"])
                .unwrap();
        if let Commands::Admin {
            command: AdminCommand::Export { output },
        } = cli.command
        {
            assert_eq!(output, Some(PathBuf::from("snapshot.json")));
        } else {
            panic!("Expected Admin Export command");
        }
    }

    #[test]
    fn test_cli_parse_with_global_flags() {
        let cli = Cli::try_parse_from([
            "intermax", "--config", "custom.yaml", "--store", "/tmp/s", "-v", "chat",
        ])
        .unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
        assert_eq!(cli.store, Some("/tmp/s".to_string()));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["intermax"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["intermax", "frobnicate"]).is_err());
    }
}
