use crate::cli::commands::{CommandDefinition, CommandRegistry};
use crate::cli::{context::AppContext, output, render, CommandResult};
use crate::errors::CliError;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("status", "Show bill store status", "status", cmd_status),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
    ]
}

fn cmd_status(context: &mut AppContext, _args: &[&str]) -> CommandResult {
    let report = context.gateway().status();
    output::section("Store status");
    for line in render::store_status(&report) {
        output::info(line);
    }
    Ok(())
}

fn cmd_version(_context: &mut AppContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Finance Splitter {}", meta.version));
    output::info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Target       : {}", meta.target));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(_context: &mut AppContext, args: &[&str]) -> CommandResult {
    let registry = CommandRegistry::standard();
    match args.first() {
        Some(name) => {
            let command = registry
                .get(&name.to_lowercase())
                .ok_or_else(|| CliError::Command(format!("unknown command `{name}`")))?;
            output::section(format!("Help: {}", command.name));
            output::info(format!("  Description: {}", command.description));
            output::info(format!("  Usage: {}", command.usage));
        }
        None => print_overview(&registry),
    }
    Ok(())
}

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for command in registry.iter() {
        output::info(format!("  {:<54} {}", command.usage, command.description));
    }
    output::info("Use `help <command>` for details.");
}
