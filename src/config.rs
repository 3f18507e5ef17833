use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringMode;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub mode: ScoringMode,
}

/// Which text-generation service answers scoring prompts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderBackend {
    #[default]
    Gemini,
    OpenAi,
}

impl ProviderBackend {
    /// Well-known environment variable holding the credential
    pub fn env_key(&self) -> &'static str {
        match self {
            ProviderBackend::Gemini => "GEMINI_API_KEY",
            ProviderBackend::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderBackend::Gemini => "gemini",
            ProviderBackend::OpenAi => "openai",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub backend: ProviderBackend,
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Base URL override, e.g. for a self-hosted gateway
    pub endpoint: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            backend: ProviderBackend::default(),
            api_key: None,
            model: None,
            endpoint: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl ProviderSettings {
    /// Configured credential, ignoring blank values
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn default_temperature() -> f32 { 0.3 }
fn default_max_output_tokens() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RFP)
    /// 5. The backend's well-known credential variable (GEMINI_API_KEY / OPENAI_API_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RFP__SCORING__MODE -> scoring.mode
            .add_source(env_source())
            .build()?;

        let settings = substitute_credentials(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let settings = substitute_credentials(settings)?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RFP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Fill `provider.api_key` from the backend's well-known variable when unset
fn substitute_credentials(settings: Config) -> Result<Config, ConfigError> {
    let backend: ProviderBackend = settings.get("provider.backend").unwrap_or_default();
    let configured: Option<String> = settings.get("provider.api_key").ok();

    if configured.as_deref().is_some_and(|key| !key.trim().is_empty()) {
        return Ok(settings);
    }

    match std::env::var(backend.env_key()) {
        Ok(key) => Config::builder()
            .add_source(settings)
            .set_override("provider.api_key", key)?
            .build(),
        Err(_) => Ok(settings),
    }
}
