use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::probe_config::ProbeConfig;
use crate::http_probe::prelude::status_url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("PROBE_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("host {host:?} is not a bare host name or IP address: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
}

/// Load the probe configuration from defaults, an optional YAML file and environment variables.
/// A `.env` file in the working directory is honoured when present.
/// `CONFIG_FILE` names the YAML file; `PROBE_HOST` and `PROBE_PORT` override what it says.
pub fn load_config() -> Result<ProbeConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    let mut config = match env::var_os("CONFIG_FILE") {
        Some(path) => read_config_file(Path::new(&path))?,
        None => ProbeConfig::default(),
    };

    apply_overrides(
        &mut config,
        env::var("PROBE_HOST").ok(),
        env::var("PROBE_PORT").ok(),
    )?;
    validate_host(&config)?;

    log::info!("Probing {}:{}", config.host, config.port);
    Ok(config)
}

pub fn read_config_file(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(ProbeConfig::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_overrides(
    config: &mut ProbeConfig,
    host: Option<String>,
    port: Option<String>,
) -> Result<(), ConfigError> {
    if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
        config.host = host.trim().to_string();
    }
    if let Some(port) = port {
        config.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
    }
    Ok(())
}

/// The host ends up in the request URL, so it must not smuggle in a path, userinfo or port.
fn validate_host(config: &ProbeConfig) -> Result<(), ConfigError> {
    status_url(&config.host, config.port)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidHost {
            host: config.host.clone(),
            source,
        })
}
