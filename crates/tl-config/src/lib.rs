//! Layered configuration for tl.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > config file > defaults
//!
//! The config file and the environment share the same flat, upper-case key
//! names (`OPENAI_API_KEY`, `MODEL`, ...), so a file line can be moved into
//! the shell environment unchanged.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tl_types::ConfigError;

/// The default chat-completion API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// The default model to use.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// The default sampling temperature for translations.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// The default time budget for translating one text.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "OPENAI_API_BASE_URL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "MODEL";
pub const ENV_TEMPERATURE: &str = "TEMPERATURE";
pub const ENV_CLASSIFY: &str = "CLASSIFY";
pub const ENV_TIMEOUT_SECS: &str = "TIMEOUT_SECS";

/// Explicit config file location, overriding the XDG/home lookup.
pub const ENV_CONFIG_PATH: &str = "TL_CONFIG";

/// Resolved configuration for a tl run.
#[derive(Debug, Clone)]
pub struct TlConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Classify each text before translating it. When off, every text is
    /// translated with the generic prompt.
    pub classify: bool,
    pub timeout: Duration,
    /// Where the config file was looked for, and whether it existed.
    pub config_path: Option<PathBuf>,
    pub config_found: bool,
}

/// Settings that can be read from the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "OPENAI_API_BASE_URL", alias = "base_url")]
    pub base_url: Option<String>,
    #[serde(rename = "OPENAI_API_KEY", alias = "api_key")]
    pub api_key: Option<String>,
    #[serde(rename = "MODEL", alias = "model")]
    pub model: Option<String>,
    #[serde(rename = "TEMPERATURE", alias = "temperature")]
    pub temperature: Option<f32>,
    #[serde(rename = "CLASSIFY", alias = "classify")]
    pub classify: Option<bool>,
    #[serde(rename = "TIMEOUT_SECS", alias = "timeout_secs")]
    pub timeout_secs: Option<u64>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub classify: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl TlConfig {
    /// Load configuration from the process environment and config file.
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::load_with(overrides, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to look up environment variables.
    pub fn load_with<F>(overrides: CliOverrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let candidates = config_candidates(&env);
        let mut found = None;
        for path in &candidates {
            if let Some(settings) = load_settings_file(path)? {
                found = Some((path.clone(), settings));
                break;
            }
        }

        let config_found = found.is_some();
        let (path, settings) = match found {
            Some((path, settings)) => (Some(path), settings),
            None => (candidates.into_iter().next(), SettingsFile::default()),
        };
        let mut config = resolve(settings, &env, overrides)?;
        config.config_path = path;
        config.config_found = config_found;
        Ok(config)
    }

    /// The API key, or an error naming where it can be set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingKey {
                key: format!("api key (set {ENV_API_KEY} or add it to the config file)"),
            });
        }
        Ok(&self.api_key)
    }
}

/// Apply env vars and CLI overrides on top of file settings.
fn resolve<F>(file: SettingsFile, env: &F, overrides: CliOverrides) -> Result<TlConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let api_key = overrides
        .api_key
        .or_else(|| var(ENV_API_KEY))
        .or(file.api_key)
        .unwrap_or_default();

    let base_url = overrides
        .base_url
        .or_else(|| var(ENV_BASE_URL))
        .or(file.base_url)
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let model = overrides
        .model
        .or_else(|| var(ENV_MODEL))
        .or(file.model)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let env_temperature = var(ENV_TEMPERATURE)
        .map(|v| parse_value::<f32>(ENV_TEMPERATURE, &v))
        .transpose()?;
    let temperature = overrides
        .temperature
        .or(env_temperature)
        .or(file.temperature)
        .unwrap_or(DEFAULT_TEMPERATURE);

    let env_classify = var(ENV_CLASSIFY)
        .map(|v| parse_bool(ENV_CLASSIFY, &v))
        .transpose()?;
    let classify = overrides
        .classify
        .or(env_classify)
        .or(file.classify)
        .unwrap_or(true);

    let env_timeout = var(ENV_TIMEOUT_SECS)
        .map(|v| parse_value::<u64>(ENV_TIMEOUT_SECS, &v))
        .transpose()?;
    let timeout_secs = overrides
        .timeout_secs
        .or(env_timeout)
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(TlConfig {
        api_key,
        base_url,
        model,
        temperature,
        classify,
        timeout: Duration::from_secs(timeout_secs),
        config_path: None,
        config_found: false,
    })
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("fail to parse \"{value}\": {e}"),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got \"{value}\""),
        }),
    }
}

/// Config directory name used by earlier releases, still read as a fallback.
const LEGACY_DIR: &str = "trans-go";

/// Config file locations in lookup order; the first file that exists wins.
///
/// `$TL_CONFIG` is used alone when set. Otherwise
/// `$XDG_CONFIG_HOME/{tl,trans-go}/config.toml`, or without XDG
/// `~/.{tl,trans-go}/config.toml`.
pub fn config_candidates<F>(env: &F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(path) = non_empty(ENV_CONFIG_PATH) {
        return vec![PathBuf::from(path)];
    }
    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        let xdg = PathBuf::from(xdg);
        return vec![
            xdg.join("tl").join("config.toml"),
            xdg.join(LEGACY_DIR).join("config.toml"),
        ];
    }
    non_empty("HOME")
        .map(PathBuf::from)
        .or_else(dirs_next::home_dir)
        .map(|home| {
            vec![
                home.join(".tl").join("config.toml"),
                home.join(format!(".{LEGACY_DIR}")).join("config.toml"),
            ]
        })
        .unwrap_or_default()
}

/// Read and parse a TOML settings file. A missing file yields `Ok(None)`.
fn load_settings_file(path: &Path) -> Result<Option<SettingsFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };

    let settings = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(settings))
}

/// Mask all but the edges of a secret for display.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return "(unset)".to_string();
    }
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

impl fmt::Display for TlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BaseUrl: {}", self.base_url)?;
        writeln!(f, "ApiKey: {}", mask_secret(&self.api_key))?;
        writeln!(f, "Model: {}", self.model)?;
        writeln!(f, "Temperature: {:.2}", self.temperature)?;
        writeln!(f, "Classify: {}", self.classify)?;
        writeln!(f, "Timeout: {}s", self.timeout.as_secs())?;
        match &self.config_path {
            Some(path) if self.config_found => write!(f, "ConfigPath: {}", path.display()),
            Some(path) => write!(f, "ConfigPath: {} (not found)", path.display()),
            None => write!(f, "ConfigPath: (none)"),
        }
    }
}
