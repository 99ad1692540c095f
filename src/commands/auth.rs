//! User login and logout handlers

use crate::auth::{Authenticator, StaticAuthenticator};
use crate::commands::collect_credentials;
use crate::config::Config;
use crate::error::Result;
use crate::session::{SessionKind, SessionManager};
use colored::Colorize;

/// Verify credentials and start a user session
pub fn run_login(
    config: Config,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let store = config.open_store()?;
    let sessions = SessionManager::new(store);

    if let Some(existing) = sessions.load(SessionKind::User) {
        println!(
            "{}",
            format!("Already logged in as {}.", existing.subject).yellow()
        );
        return Ok(());
    }

    let credentials = collect_credentials(username, password)?;
    let authenticator = StaticAuthenticator::new(config.auth.clone(), sessions);
    let session = authenticator.verify(SessionKind::User, &credentials)?;

    println!(
        "{}",
        format!("Authentication successful. Welcome, {}!", session.subject).green()
    );
    Ok(())
}

/// End the current user session
pub fn run_logout(config: Config) -> Result<()> {
    let store = config.open_store()?;
    let sessions = SessionManager::new(store);

    match sessions.load(SessionKind::User) {
        Some(session) => {
            sessions.end(SessionKind::User);
            println!("{}", format!("Logged out {}.", session.subject).green());
        }
        None => println!("{}", "No active session.".yellow()),
    }
    Ok(())
}
