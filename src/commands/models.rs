//! Model catalog listing

use crate::cli::ModelCommand;
use crate::config::Config;
use crate::error::Result;
use crate::models::CHAT_MODELS;
use crate::prefs::Preferences;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle the `models` subcommands
pub fn handle_models(config: Config, command: ModelCommand) -> Result<()> {
    match command {
        ModelCommand::List => {
            let store = config.open_store()?;
            let prefs = Preferences::load(&store);

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "ID".bold(),
                "Name".bold(),
                "Max Tokens".bold(),
                "Cost/1K".bold(),
                "Files".bold(),
                "".bold()
            ]);

            for model in CHAT_MODELS {
                let marker = if model.id == prefs.selected_model {
                    "selected".green().to_string()
                } else {
                    String::new()
                };
                table.add_row(prettytable::row![
                    model.id.cyan(),
                    model.name,
                    model.max_tokens,
                    format!("${}", model.cost_per_1k),
                    if model.supports_files { "yes" } else { "no" },
                    marker
                ]);
            }

            println!("\nAvailable models:");
            table.printstd();
            println!();
            println!(
                "Switch models inside a chat with {} or via {}.",
                "/model <id>".cyan(),
                "intermax chat --model <id>".cyan()
            );
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_models_list_runs_without_session() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("store"));

        assert!(handle_models(config, ModelCommand::List).is_ok());
    }
}
