use std::{env, path::PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    config::{Config, ConfigManager},
    core::{
        time::{Clock, FixedClock, SystemClock},
        utils::PathResolver,
    },
    errors::{BillError, CliError},
    storage::BillGateway,
};

const TODAY_ENV: &str = "FINANCE_SPLITTER_TODAY";

/// State shared by command handlers for one invocation.
pub struct AppContext {
    pub base_dir: PathBuf,
    pub config_manager: ConfigManager,
    /// Configuration as saved on disk, before environment overrides.
    pub stored_config: Config,
    pub config: Config,
    today_override: Option<NaiveDate>,
    gateway: Option<BillGateway>,
}

impl AppContext {
    pub fn bootstrap() -> Result<Self, CliError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let stored_config = config_manager.load()?;
        let mut config = stored_config.clone();
        config.apply_env_overrides();
        let today_override = today_from_env()?;
        debug!(base = %base_dir.display(), ?today_override, "cli context ready");
        Ok(Self {
            base_dir,
            config_manager,
            stored_config,
            config,
            today_override,
            gateway: None,
        })
    }

    /// Opens the store chain on first use.
    pub fn gateway(&mut self) -> &BillGateway {
        let base_dir = &self.base_dir;
        let config = &self.config;
        let today_override = self.today_override;
        self.gateway
            .get_or_insert_with(|| BillGateway::from_config(base_dir, config, clock(today_override)))
    }

    /// Persists `config` and rebuilds the effective configuration from it.
    pub fn save_config(&mut self, config: Config) -> Result<(), CliError> {
        self.config_manager.save(&config)?;
        let mut effective = config.clone();
        effective.apply_env_overrides();
        self.stored_config = config;
        self.config = effective;
        self.gateway = None;
        Ok(())
    }
}

fn clock(today_override: Option<NaiveDate>) -> Box<dyn Clock> {
    match today_override {
        Some(today) => Box::new(FixedClock::new(today)),
        None => Box::new(SystemClock),
    }
}

fn today_from_env() -> Result<Option<NaiveDate>, CliError> {
    let Ok(raw) = env::var(TODAY_ENV) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            BillError::ConfigError(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`")).into()
        })
}
