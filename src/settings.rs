use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

/// Knobs for how strictly payloads are checked. Everything defaults to the
/// permissive behaviour, so `SchemaSettings::default()` needs no files or
/// environment.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SchemaSettings {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    /// Reject `end_year < start_year`, `end_date < start_date` and
    /// `is_current` combined with an `end_date`.
    #[serde(default)]
    pub enforce_chronology: bool,

    /// Reject keys that are not part of the schema instead of ignoring them.
    #[serde(default)]
    pub reject_unknown_fields: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}

impl Default for SchemaSettings {
    fn default() -> Self {
        SchemaSettings {
            env: default_env(),
            enforce_chronology: false,
            reject_unknown_fields: false,
        }
    }
}

impl SchemaSettings {
    /// Layers `config/default`, `config/{APP_ENV}` and `APP_*` variables
    /// (e.g. `APP_ENFORCE_CHRONOLOGY=true`).
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut settings: Self = builder.build()?.try_deserialize()?;
        settings.env = env_name;

        tracing::debug!("Loaded schema settings: {:?}", settings);
        Ok(settings)
    }

    /// Reads settings from an inline TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Strict everywhere: both optional rule sets switched on.
    pub fn strict() -> Self {
        SchemaSettings {
            enforce_chronology: true,
            reject_unknown_fields: true,
            ..Self::default()
        }
    }
}
