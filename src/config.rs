//! Configuration management for Shikshak Saathi
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::cli::{Cli, Commands};
use crate::error::{Result, SaathiError};
use crate::language::Language;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Shikshak Saathi
///
/// Holds the API server settings, the AI provider settings, the offline
/// client settings and logging options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// AI provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Offline client configuration
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment; `production` suppresses error details
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
        }
    }
}

impl ServerConfig {
    /// Whether error details must be hidden from API responses
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// AI provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; absent or blank means fallback-only mode
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (useful for tests and local mocks)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Maximum tokens generated per response
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_provider_timeout() -> u64 {
    60
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

/// Offline client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the coaching API, including the `/api` prefix
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Local database path; defaults to the platform data directory
    #[serde(default)]
    pub db_path: Option<String>,

    /// Preferred display language
    #[serde(default)]
    pub language: Language,

    /// Age in days after which cached responses are swept
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: u32,

    /// Origin serving the web application shell
    #[serde(default = "default_shell_origin")]
    pub shell_origin: String,

    /// Timeout for calls to the coaching API in seconds
    #[serde(default = "default_client_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_cache_ttl_days() -> u32 {
    7
}

/// Upper bound for `client.cache_ttl_days` (about a century)
pub const MAX_CACHE_TTL_DAYS: u32 = 36_500;

fn default_shell_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_client_timeout() -> u64 {
    90
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            db_path: None,
            language: Language::default(),
            cache_ttl_days: default_cache_ttl_days(),
            shell_origin: default_shell_origin(),
            timeout_seconds: default_client_timeout(),
        }
    }
}

impl ClientConfig {
    /// Resolve the local database path
    ///
    /// Uses `db_path` when set, otherwise `saathi.db` inside the platform
    /// data directory (created on demand).
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Storage` if no data directory can be determined
    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = ProjectDirs::from("in", "shikshak-saathi", "saathi")
            .ok_or_else(|| SaathiError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            SaathiError::Storage(format!("Failed to create data directory: {}", e))
        })?;

        Ok(data_dir.join("saathi.db"))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON formatted log lines
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SaathiError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SaathiError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("SAATHI_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid PORT: {}", port);
            }
        }

        if let Ok(environment) = std::env::var("SAATHI_ENV") {
            self.server.environment = environment;
        }

        // Provider overrides
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.provider.gemini.api_key = Some(api_key);
        }

        if let Ok(model) = std::env::var("SAATHI_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("SAATHI_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        // Client overrides
        if let Ok(api_base) = std::env::var("SAATHI_API_BASE") {
            self.client.api_base = api_base;
        }

        if let Ok(db_path) = std::env::var("SAATHI_DB") {
            self.client.db_path = Some(db_path);
        }

        if let Ok(language) = std::env::var("SAATHI_LANGUAGE") {
            self.client.language = Language::from_code(&language);
        }

        if let Ok(days) = std::env::var("SAATHI_CACHE_TTL_DAYS") {
            if let Ok(value) = days.parse() {
                self.client.cache_ttl_days = value;
            } else {
                tracing::warn!("Invalid SAATHI_CACHE_TTL_DAYS: {}", days);
            }
        }

        if let Ok(origin) = std::env::var("SAATHI_SHELL_ORIGIN") {
            self.client.shell_origin = origin;
        }

        // Logging overrides
        if let Ok(json) = std::env::var("SAATHI_LOG_JSON") {
            self.logging.json = matches!(json.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(api_base) = &cli.api_base {
            self.client.api_base = api_base.clone();
        }

        if let Some(db_path) = &cli.db_path {
            self.client.db_path = Some(db_path.clone());
        }

        match &cli.command {
            Commands::Serve { host, port } => {
                if let Some(host) = host {
                    self.server.host = host.clone();
                }
                if let Some(port) = port {
                    self.server.port = *port;
                }
            }
            Commands::Ask {
                language: Some(language),
                ..
            } => {
                self.client.language = Language::from_code(language);
            }
            _ => {}
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(SaathiError::Config("server.host cannot be empty".to_string()).into());
        }

        if self.provider.gemini.model.trim().is_empty() {
            return Err(
                SaathiError::Config("provider.gemini.model cannot be empty".to_string()).into(),
            );
        }

        if self.provider.gemini.max_output_tokens == 0 {
            return Err(SaathiError::Config(
                "provider.gemini.max_output_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.provider.gemini.temperature) {
            return Err(SaathiError::Config(
                "provider.gemini.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.gemini.timeout_seconds == 0 {
            return Err(SaathiError::Config(
                "provider.gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.client.cache_ttl_days > MAX_CACHE_TTL_DAYS {
            return Err(SaathiError::Config(format!(
                "client.cache_ttl_days must be at most {}",
                MAX_CACHE_TTL_DAYS
            ))
            .into());
        }

        if self.client.timeout_seconds == 0 {
            return Err(SaathiError::Config(
                "client.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        for (name, value) in [
            ("client.api_base", &self.client.api_base),
            ("client.shell_origin", &self.client.shell_origin),
            ("provider.gemini.api_base", &self.provider.gemini.api_base),
        ] {
            url::Url::parse(value).map_err(|e| {
                SaathiError::Config(format!("{} is not a valid URL ({}): {}", name, value, e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn cli_with(command: Commands) -> Cli {
        Cli {
            config: None,
            verbose: false,
            api_base: None,
            db_path: None,
            command,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.provider.gemini.model, "gemini-2.5-flash-lite");
        assert_eq!(config.provider.gemini.max_output_tokens, 500);
        assert!((config.provider.gemini.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.provider.gemini.timeout_seconds, 60);
        assert_eq!(config.client.api_base, "http://localhost:3001/api");
        assert_eq!(config.client.cache_ttl_days, 7);
        assert_eq!(config.client.language, Language::En);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_tokens() {
        let mut config = Config::default();
        config.provider.gemini.max_output_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_temperature() {
        let mut config = Config::default();
        config.provider.gemini.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_cache_ttl_too_large() {
        let mut config = Config::default();
        config.client.cache_ttl_days = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache_ttl_days"));

        config.client.cache_ttl_days = MAX_CACHE_TTL_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_api_base() {
        let mut config = Config::default();
        config.client.api_base = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
server:
  port: 8080
  environment: production
provider:
  gemini:
    api_key: test-key
    temperature: 0.2
client:
  language: hi
  cache_ttl_days: 3
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.is_production());
        assert_eq!(config.provider.gemini.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.provider.gemini.model, "gemini-2.5-flash-lite");
        assert_eq!(config.client.language, Language::Hi);
        assert_eq!(config.client.cache_ttl_days, 3);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.client.cache_ttl_days, 7);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        std::env::remove_var("PORT");
        let cli = cli_with(Commands::Serve {
            host: None,
            port: None,
        });
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("PORT", "4100");
        std::env::set_var("SAATHI_ENV", "production");
        std::env::set_var("SAATHI_CACHE_TTL_DAYS", "not-a-number");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("PORT");
        std::env::remove_var("SAATHI_ENV");
        std::env::remove_var("SAATHI_CACHE_TTL_DAYS");

        assert_eq!(config.server.port, 4100);
        assert!(config.server.is_production());
        assert_eq!(config.client.cache_ttl_days, 7);
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut cli = cli_with(Commands::Serve {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
        });
        cli.api_base = Some("http://example.test/api".to_string());

        let mut config = Config::default();
        config.apply_cli_overrides(&cli);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.client.api_base, "http://example.test/api");
    }

    #[test]
    fn test_ask_language_override() {
        let cli = cli_with(Commands::Ask {
            query: "help".to_string(),
            offline: false,
            language: Some("hi".to_string()),
            chat: None,
            new: false,
        });
        let mut config = Config::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.client.language, Language::Hi);
    }

    #[test]
    fn test_resolved_db_path_prefers_explicit() {
        let mut client = ClientConfig::default();
        client.db_path = Some("/tmp/saathi-test.db".to_string());
        assert_eq!(
            client.resolved_db_path().unwrap(),
            PathBuf::from("/tmp/saathi-test.db")
        );
    }
}
