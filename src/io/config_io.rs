use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Config, StatusSet};

/// Name of the config file looked up by [`discover_config`]
pub const CONFIG_FILE: &str = "cascade.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse cascade.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid status set `{name}`: {reason}")]
    InvalidStatusSet { name: &'static str, reason: String },
    #[error("indent.tab_size must be at least 1")]
    ZeroTabSize,
}

/// Read and validate a config file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&text)
}

/// Parse and validate config text
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Walk up from `start` looking for a config file
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load the config at `explicit`, else the nearest discovered one, else defaults
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    match explicit.map(Path::to_path_buf).or_else(|| discover_config(cwd)) {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let statuses = &config.policy.statuses;
    require_non_empty("not_started", &statuses.not_started)?;
    require_non_empty("completed", &statuses.completed)?;
    require_non_empty("in_progress", &statuses.in_progress)?;

    if let Some(c) = statuses
        .completed
        .chars()
        .iter()
        .find(|c| statuses.not_started.contains(**c))
    {
        return Err(ConfigError::InvalidStatusSet {
            name: "completed",
            reason: format!("{:?} is also a not-started marker", c),
        });
    }

    if config.indent.tab_size == 0 {
        return Err(ConfigError::ZeroTabSize);
    }
    Ok(())
}

fn require_non_empty(name: &'static str, set: &StatusSet) -> Result<(), ConfigError> {
    if set.is_empty() {
        return Err(ConfigError::InvalidStatusSet {
            name,
            reason: "must list at least one marker".into(),
        });
    }
    Ok(())
}
