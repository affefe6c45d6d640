use crate::error::ConfigError;
use serde::Deserialize;
use std::{fs, io::ErrorKind, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "invoice_uploader.toml";

const DEFAULT_ENDPOINT: &str =
    "https://gf0hs3rhm3.execute-api.us-east-1.amazonaws.com/prod/api/v1/invoice";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Invoice-extraction endpoint every file is POSTed to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    640.0
}

fn default_height() -> f32 {
    720.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            log_filter: default_log_filter(),
            picker: PickerConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}
