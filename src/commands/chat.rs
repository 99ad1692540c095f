//! Interactive chat terminal
//!
//! A readline loop that relays prompts through the chat gateway and
//! appends completed exchanges to the active project. Only a completed
//! round-trip mutates the store: the optimistic user turn exists solely
//! in the terminal scrollback until the assistant turn resolves, and a
//! failed round-trip renders an inline error entry without persisting
//! anything. Round-trips are awaited one at a time, so a project never
//! has more than one exchange in flight.

use crate::commands::require_session;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::ChatGateway;
use crate::models::model_by_id;
use crate::prefs::{Preferences, Theme};
use crate::project::ProjectStore;
use crate::session::{Session, SessionKind, SessionManager};
use crate::storage::KvStore;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// In-loop commands understood by the chat terminal
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    ListProjects,
    NewProject(String),
    UseProject(usize),
    DeleteProject(i64),
    SwitchModel(String),
    SwitchTheme(Theme),
    ShowStatus,
    Help,
    Exit,
    /// Not a command; treat the line as a prompt
    None,
}

/// Parse a line for an in-loop command
pub fn parse_chat_command(input: &str) -> ChatCommand {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return ChatCommand::Exit;
    }
    if !trimmed.starts_with('/') {
        return ChatCommand::None;
    }

    let (command, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/projects" => ChatCommand::ListProjects,
        "/new" if !argument.is_empty() => ChatCommand::NewProject(argument.to_string()),
        "/use" => match argument.parse() {
            Ok(index) => ChatCommand::UseProject(index),
            Err(_) => ChatCommand::Help,
        },
        "/delete" => match argument.parse() {
            Ok(id) => ChatCommand::DeleteProject(id),
            Err(_) => ChatCommand::Help,
        },
        "/model" if !argument.is_empty() => ChatCommand::SwitchModel(argument.to_string()),
        "/theme" => match argument.parse() {
            Ok(theme) => ChatCommand::SwitchTheme(theme),
            Err(_) => ChatCommand::Help,
        },
        "/status" => ChatCommand::ShowStatus,
        "/help" => ChatCommand::Help,
        _ => ChatCommand::Help,
    }
}

/// Start the interactive chat terminal
///
/// Requires a valid user session. Preferences are reloaded before the
/// project collection, and a `--model` override is persisted as the new
/// selection.
pub async fn run_chat(config: Config, model_override: Option<String>) -> Result<()> {
    let store = config.open_store()?;
    let sessions = SessionManager::new(store.clone());
    let session = require_session(&sessions, SessionKind::User)?;

    let mut prefs = Preferences::load(&store);
    if let Some(model) = model_override {
        prefs.selected_model = model;
        prefs.save(&store);
    }

    let mut projects = ProjectStore::initialize(store.clone());
    let gateway = ChatGateway::new(&config.provider)?;

    print_welcome_banner(&session, &prefs, &gateway);

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = format!("[{}] >> ", projects.active_project().title)
            .color(prefs.theme.color())
            .to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match parse_chat_command(trimmed) {
                    ChatCommand::ListProjects => print_project_list(&projects),
                    ChatCommand::NewProject(title) => match projects.create_project(&title) {
                        Some(_) => println!("Created and switched to \"{}\"\n", title),
                        None => println!("{}\n", "Project title must not be empty.".yellow()),
                    },
                    ChatCommand::UseProject(index) => {
                        if index < projects.len() {
                            projects.set_active(index);
                            println!(
                                "Switched to \"{}\"\n",
                                projects.active_project().title
                            );
                        } else {
                            println!("{}\n", format!("No project #{}.", index).yellow());
                        }
                    }
                    ChatCommand::DeleteProject(id) => {
                        if projects.delete_project(id) {
                            println!(
                                "Deleted. Active project is now \"{}\"\n",
                                projects.active_project().title
                            );
                        } else if projects.len() == 1 {
                            println!(
                                "{}\n",
                                "The last remaining project cannot be deleted.".yellow()
                            );
                        } else {
                            println!("{}\n", format!("No project with id {}.", id).yellow());
                        }
                    }
                    ChatCommand::SwitchModel(model) => {
                        prefs.selected_model = model_by_id(&model).id.to_string();
                        prefs.save(&store);
                        println!("Model: {}\n", model_by_id(&prefs.selected_model).name);
                    }
                    ChatCommand::SwitchTheme(theme) => {
                        prefs.theme = theme;
                        prefs.save(&store);
                        println!("Theme: {}\n", theme);
                    }
                    ChatCommand::ShowStatus => print_status(&prefs, &projects, &gateway, &store),
                    ChatCommand::Help => print_help(),
                    ChatCommand::Exit => break,
                    ChatCommand::None => {
                        send_prompt(trimmed, &gateway, &prefs, &mut projects).await;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Run one chat round-trip against the active project
///
/// The exchange is appended (and persisted) only when the gateway
/// resolves successfully; an error becomes an inline transcript entry
/// and nothing is stored.
async fn send_prompt(
    prompt: &str,
    gateway: &ChatGateway,
    prefs: &Preferences,
    projects: &mut ProjectStore,
) {
    let index = projects.active_index();
    let history = projects.active_project().notes.clone();

    println!("{}", "...".dimmed());
    match gateway.send(prompt, &prefs.selected_model, &history).await {
        Ok(response) => {
            projects.append_exchange(index, prompt, response.as_str());
            println!("\n{}\n", response);
        }
        Err(e) => {
            eprintln!("{}\n", format!("[ERROR] {}", e).red());
        }
    }
}

fn print_welcome_banner(session: &Session, prefs: &Preferences, gateway: &ChatGateway) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║              InterMAX-UI Terminal - ARIA v2.2.8              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("User:  {}", session.subject.color(prefs.theme.color()));
    println!("Model: {}", model_by_id(&prefs.selected_model).name);
    println!(
        "Link:  {}\n",
        if gateway.has_credential() {
            "live inference endpoint".to_string()
        } else {
            "local simulator (no API key configured)".to_string()
        }
    );
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

fn print_project_list(projects: &ProjectStore) {
    println!();
    for (index, project) in projects.projects().iter().enumerate() {
        let marker = if index == projects.active_index() {
            "*"
        } else {
            " "
        };
        println!(
            "{} [{}] {} (id {}, {} messages)",
            marker,
            index,
            project.title,
            project.id,
            project.message_count()
        );
    }
    println!();
}

fn print_status(
    prefs: &Preferences,
    projects: &ProjectStore,
    gateway: &ChatGateway,
    store: &KvStore,
) {
    println!("\nSession Status");
    println!("  Active project: {}", projects.active_project().title);
    println!(
        "  Messages:       {}",
        projects.active_project().message_count()
    );
    println!("  Projects:       {}", projects.len());
    println!("  Model:          {}", model_by_id(&prefs.selected_model).name);
    println!("  Theme:          {}", prefs.theme);
    println!(
        "  Endpoint:       {}",
        if gateway.has_credential() {
            "live"
        } else {
            "simulated"
        }
    );
    println!(
        "  Storage:        {}\n",
        if store.is_available() {
            "available"
        } else {
            "degraded (in-memory only)"
        }
    );
}

fn print_help() {
    println!("\nAvailable commands:");
    println!("  /projects         list projects");
    println!("  /new <title>      create a project and switch to it");
    println!("  /use <index>      switch the active project");
    println!("  /delete <id>      delete a project (the last one is kept)");
    println!("  /model <id>       switch the chat model");
    println!("  /theme <name>     switch the theme (cyan, green, blue, purple)");
    println!("  /status           show session status");
    println!("  /help             show this help");
    println!("  exit              leave the terminal\n");
}
