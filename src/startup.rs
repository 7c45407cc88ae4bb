//! Command-line front end.
//!
//! Parses the subcommand, builds the [`App`] and runs one session operation
//! or navigation, printing the notices the shell produced along the way.

use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, info};

use crate::config::ConfigV1;
use crate::request::{ApiError, LOGIN_PATH};
use crate::router::NavigationError;
use crate::shell::{LoadingEvent, ShellEvent};
use crate::state::App;

/// Command-line client for an aq3stat backend.
#[derive(Debug, Parser)]
#[command(name = "aq3stat")]
#[command(about = "aq3stat session client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the JSON schema of the configuration file
    Schema,
    /// Log in and store the session token
    Login { username: String, password: String },
    /// Show the user the stored token belongs to
    #[command(name = "whoami")]
    WhoAmI,
    /// Drop the stored session
    Logout,
    /// Navigate to a route, following guard redirects
    Open { path: String },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Runs one command against a freshly built application.
pub async fn run(config: ConfigV1, command: Command) -> Result<(), CliError> {
    let app = App::from_config(config).await?;
    let mut events = app.shell.subscribe();

    let result = execute(&app, &command).await;

    // A 401 anywhere above asks the router to go to the login page.
    for outcome in app.router.drain_redirects().await {
        let location = outcome?;
        debug!("Followed shell redirect to '{}'", location.full_path);
    }
    print_events(&mut events);
    if let Some(location) = app.router.current() {
        println!("location: {} ({})", location.full_path, location.title);
    }
    result
}

async fn execute(app: &App, command: &Command) -> Result<(), CliError> {
    match command {
        Command::Schema => Err(CliError::Usage(
            "the schema command does not need a running application".to_string(),
        )),
        Command::Login { username, password } => {
            let user = app
                .shell
                .with_loading(Some("Logging in..."), app.login(username, password))
                .await?;
            info!("Logged in as '{}'", user.username);
            println!("logged in as {} (admin: {})", user.username, user.is_admin());
            let location = app.router.push("/").await?;
            debug!("Landed on '{}'", location.full_path);
            Ok(())
        }
        Command::WhoAmI => {
            if app.session.token().is_none() {
                println!("not logged in");
                app.router.push(LOGIN_PATH).await?;
                return Ok(());
            }
            let user = app.get_info().await?;
            println!(
                "{} <{}> (id {}, admin: {})",
                user.username,
                user.email,
                user.id,
                user.is_admin()
            );
            Ok(())
        }
        Command::Logout => {
            app.logout().await;
            println!("logged out");
            app.router.push(LOGIN_PATH).await?;
            Ok(())
        }
        Command::Open { path } => {
            let location = app.router.push(path).await?;
            if location.path != path_without_query(path) {
                println!("redirected from {}", path);
            }
            Ok(())
        }
    }
}

fn path_without_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

fn print_events(events: &mut Receiver<ShellEvent>) {
    loop {
        match events.try_recv() {
            Ok(ShellEvent::Notice(notice)) => {
                eprintln!("[{:?}] {}", notice.level, notice.message)
            }
            Ok(ShellEvent::Loading(LoadingEvent::Show(text))) => debug!("loading: {}", text),
            Ok(_) => {}
            Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["aq3stat", "schema"]).unwrap();
        assert_eq!(cli.command, Command::Schema);

        let cli = Cli::try_parse_from(["aq3stat", "login", " bob ", "x"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Login {
                username: " bob ".to_string(),
                password: "x".to_string()
            }
        );

        let cli = Cli::try_parse_from(["aq3stat", "whoami"]).unwrap();
        assert_eq!(cli.command, Command::WhoAmI);

        let cli = Cli::try_parse_from(["aq3stat", "open", "/admin/users"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Open {
                path: "/admin/users".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_arity() {
        assert!(Cli::try_parse_from(["aq3stat", "login", "bob"]).is_err());
        assert!(Cli::try_parse_from(["aq3stat"]).is_err());
        assert!(Cli::try_parse_from(["aq3stat", "open"]).is_err());
        assert!(Cli::try_parse_from(["aq3stat", "whoami", "extra"]).is_err());
    }
}
