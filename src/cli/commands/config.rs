use std::path::PathBuf;

use crate::cli::commands::CommandDefinition;
use crate::cli::{context::AppContext, output, CommandResult};
use crate::errors::CliError;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and manage the bill store configuration",
        "config [show|set-database <path>|clear-database]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut AppContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show_config(context),
        ["set-database", path] => {
            let mut config = context.stored_config.clone();
            config.database_path = Some(PathBuf::from(*path));
            context.save_config(config)?;
            output::success(format!("Database set to {path}"));
            Ok(())
        }
        ["clear-database"] => {
            let mut config = context.stored_config.clone();
            config.database_path = None;
            context.save_config(config)?;
            output::success("Database cleared; bills are kept in the local cache only");
            Ok(())
        }
        _ => Err(CliError::Input(
            "usage: config [show|set-database <path>|clear-database]".into(),
        )),
    }
}

fn show_config(context: &AppContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!(
        "  File          : {}",
        context.config_manager.path().display()
    ));
    output::info(format!(
        "  Database      : {}",
        config
            .database_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(none)".into())
    ));
    output::info(format!("  Timeout       : {} ms", config.remote_timeout_ms));
    output::info(format!("  Cache key     : {}", config.cache_key));
    Ok(())
}
