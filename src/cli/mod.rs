//! Argument-driven command line front end.

pub mod commands;
pub mod context;
pub mod output;
pub mod render;

use tracing::debug;

use crate::errors::CliError;

pub use commands::{CommandDefinition, CommandRegistry};
pub use context::AppContext;

pub type CommandResult = Result<(), CliError>;

/// Dispatches one invocation; `args` excludes the program name.
pub fn run_cli(args: &[String]) -> CommandResult {
    let registry = CommandRegistry::standard();
    let Some((name, rest)) = args.split_first() else {
        commands::system::print_overview(&registry);
        return Ok(());
    };
    let command = registry
        .get(&name.to_lowercase())
        .ok_or_else(|| CliError::Command(format!("unknown command `{name}`")))?;

    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    debug!(command = command.name, args = ?rest, "dispatching command");
    let mut context = AppContext::bootstrap()?;
    (command.handler)(&mut context, &rest)
}

/// Prints the command overview, used after unknown commands.
pub fn print_usage() {
    commands::system::print_overview(&CommandRegistry::standard());
}
