use crate::models::error::{ActivityLogError, Result};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct LoggerConfig {
    pub database_file: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_max_connections() -> usize {
    // Physical cores + 7 gives a good mix of concurrent readers and writers
    num_cpus::get_physical() + 7
}

pub fn setup_config(config_file: String) -> Result<LoggerConfig> {
    let config_path = PathBuf::from(config_file);
    info!("Loading logger config from: {}", config_path.display());

    let config_str = fs::read_to_string(&config_path).map_err(|cause| {
        ActivityLogError::ConfigRead {
            path: config_path.clone(),
            cause,
        }
    })?;

    let config: LoggerConfig = serde_json::from_str(&config_str).map_err(|cause| {
        ActivityLogError::ConfigParse {
            path: config_path,
            cause,
        }
    })?;

    Ok(config)
}
