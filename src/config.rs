use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::food::SuggestionSettings;

pub const SERVICE_NAME: &str = "cooktales-ai-backend";

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY must be provided via --api-key or the environment")]
    MissingApiKey,
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub service_name: String,
}

impl AppConfig {
    /// Reads the process environment, letting `overrides` (command-line
    /// flags) win for any key it answers.
    pub fn from_env_with_overrides<O>(overrides: O) -> Result<Self, ConfigError>
    where
        O: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| overrides(key).or_else(|| env::var(key).ok()))
    }

    /// Builds the config from any key/value source. Missing keys fall back
    /// to defaults; present but unparseable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup("OPENAI_CHAT_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_url = lookup("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        check_url(&api_url)?;

        let temperature: f64 = parse_or(&lookup, "OPENAI_TEMPERATURE", 0.7)?;
        if !(temperature > 0.0 && temperature <= 2.0) {
            return Err(ConfigError::InvalidValue {
                key: "OPENAI_TEMPERATURE",
                reason: format!("{} is outside (0, 2]", temperature),
            });
        }

        let max_tokens: u32 = parse_or(&lookup, "OPENAI_MAX_TOKENS", 1200)?;
        if max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "OPENAI_MAX_TOKENS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let timeout_secs: u64 = parse_or(&lookup, "OPENAI_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "OPENAI_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let port: u16 = parse_or(&lookup, "PORT", 3001)?;

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|o| parse_origins(&o))
            .unwrap_or(AllowedOrigins::Any);

        Ok(Self {
            api_key,
            model,
            api_url,
            temperature,
            max_tokens,
            request_timeout: Duration::from_secs(timeout_secs),
            port,
            allowed_origins,
            service_name: SERVICE_NAME.to_string(),
        })
    }

    pub fn suggestion_settings(&self) -> SuggestionSettings {
        SuggestionSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..SuggestionSettings::default()
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn check_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        key: "OPENAI_API_URL",
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            key: "OPENAI_API_URL",
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

fn parse_origins(raw: &str) -> AllowedOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowedOrigins::Any
    } else {
        AllowedOrigins::List(origins)
    }
}
