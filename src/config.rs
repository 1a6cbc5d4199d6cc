use dirs::{config_dir, data_dir};
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tower_lsp::lsp_types::DiagnosticSeverity;

use crate::error::ConfigError;
use crate::word_set::{WordSet, DEFAULT_BUCKETS, MAX_WORD_LENGTH};

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDiagnosticSeverity {
    Error,
    Info,
    Warning,
    Hint,
}

impl ConfigDiagnosticSeverity {
    pub fn to_lsp_diagnostic(&self) -> DiagnosticSeverity {
        match self {
            ConfigDiagnosticSeverity::Error => DiagnosticSeverity::ERROR,
            ConfigDiagnosticSeverity::Info => DiagnosticSeverity::INFORMATION,
            ConfigDiagnosticSeverity::Warning => DiagnosticSeverity::WARNING,
            ConfigDiagnosticSeverity::Hint => DiagnosticSeverity::HINT,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,
    #[serde(default = "default_buckets")]
    pub buckets: usize,
    #[serde(default = "default_max_word_length")]
    pub max_word_length: usize,
    #[serde(default = "default_diagnostic_severity")]
    pub diagnostic_severity: ConfigDiagnosticSeverity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            buckets: default_buckets(),
            max_word_length: default_max_word_length(),
            diagnostic_severity: default_diagnostic_severity(),
        }
    }
}

impl Config {
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Config::from_json(serde_json::from_str(&text)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Config, ConfigError> {
        let mut config: Config = serde_json::from_value(value)?;
        if let Some(path) = expand_tilde(&config.dictionary) {
            config.dictionary = path;
        }
        Ok(config)
    }

    /// Reads the user config file if there is one, defaults otherwise.
    pub async fn load_default() -> Config {
        let Some(path) = default_config_path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }
        match Config::from_path(&path).await {
            Ok(config) => {
                info!("using config {:?}", path);
                config
            }
            Err(err) => {
                warn!("ignoring config: {err}");
                Config::default()
            }
        }
    }

    /// An empty word set shaped by this config. The table is allocated by
    /// the first load, so an unusable bucket count is reported there.
    pub fn word_set(&self) -> WordSet {
        WordSet::with_buckets(self.buckets).with_max_word_length(self.max_word_length)
    }
}

fn default_diagnostic_severity() -> ConfigDiagnosticSeverity {
    ConfigDiagnosticSeverity::Info
}

fn default_buckets() -> usize {
    DEFAULT_BUCKETS
}

fn default_max_word_length() -> usize {
    MAX_WORD_LENGTH
}

fn default_dictionary() -> PathBuf {
    let mut path = data_dir().unwrap_or_default();
    path.push("speller");
    path.push("dictionaries");
    path.push("large");
    path
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("speller").join("config.json"))
}

pub fn expand_tilde<P: AsRef<Path>>(path_user_input: P) -> Option<PathBuf> {
    let p = path_user_input.as_ref();
    if !p.starts_with("~") {
        return Some(p.to_path_buf());
    }
    if p == Path::new("~") {
        return dirs::home_dir();
    }
    let rest = p.strip_prefix("~").ok()?.to_path_buf();
    dirs::home_dir().map(|home| home.join(rest))
}
