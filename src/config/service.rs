use std::{env, path::PathBuf};
use crate::{Error, Result};

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MODEL_PATH: &str = "capita_model.json";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 50001;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub model_path: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            model_path: DEFAULT_MODEL_PATH.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("HOUSING_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid HOUSING_PORT format: {}", raw)))?,
            None => defaults.port,
        };

        let model_path = lookup("HOUSING_MODEL_PATH").unwrap_or(defaults.model_path);
        if model_path.trim().is_empty() {
            return Err(Error::Config("HOUSING_MODEL_PATH is empty".to_string()));
        }

        Ok(Self {
            data_dir: lookup("HOUSING_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            model_path,
            host: lookup("HOUSING_HOST").unwrap_or(defaults.host),
            port,
        })
    }
}
