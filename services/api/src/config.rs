use std::net::SocketAddr;
use tracing::Level;
use ventanilla_core::speech::{SUPPORTED_VOICES, parse_voice};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub transcription_language: Option<String>,
    pub tts_model: String,
    pub tts_voice: String,
    pub log_level: Level,
    pub require_user_input: bool,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a boolean", raw),
        )),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;
        let openai_api_base = var_or("OPENAI_API_BASE", "https://api.openai.com/v1");

        let chat_model = var_or("CHAT_MODEL", "gpt-4o-mini");
        let transcription_model = var_or("TRANSCRIPTION_MODEL", "whisper-1");
        let transcription_language = Some(var_or("TRANSCRIPTION_LANGUAGE", "es"))
            .filter(|lang| !lang.trim().is_empty());
        let tts_model = var_or("TTS_MODEL", "tts-1");

        let tts_voice = var_or("TTS_VOICE", "alloy");
        if parse_voice(&tts_voice).is_none() {
            return Err(ConfigError::InvalidValue(
                "TTS_VOICE".to_string(),
                format!(
                    "'{}' is not one of {}",
                    tts_voice,
                    SUPPORTED_VOICES.join(", ")
                ),
            ));
        }

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let require_user_input =
            parse_bool("REQUIRE_USER_INPUT", &var_or("REQUIRE_USER_INPUT", "false"))?;

        Ok(Self {
            bind_address,
            openai_api_key,
            openai_api_base,
            chat_model,
            transcription_model,
            transcription_language,
            tts_model,
            tts_voice,
            log_level,
            require_user_input,
        })
    }
}
