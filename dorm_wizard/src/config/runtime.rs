// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardPreferences {
    /// Whether invoice titles must carry the fields of their own title type
    pub enforce_invoice_title_type: bool,

    /// Whether the whole draft is re-validated before it is handed to the submitter
    pub validate_full_draft_on_submit: bool,

    /// Nationality code new drafts start with
    pub default_nationality: String,
}

impl Default for WizardPreferences {
    fn default() -> Self {
        Self {
            enforce_invoice_title_type: env::var(env_vars::ENFORCE_INVOICE_TITLE_TYPE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            validate_full_draft_on_submit: env::var(env_vars::VALIDATE_FULL_DRAFT_ON_SUBMIT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            default_nationality: env::var(env_vars::DEFAULT_NATIONALITY)
                .ok()
                .filter(|v| v.len() == 2)
                .map(|v| v.to_uppercase())
                .unwrap_or_else(|| compile_time::defaults::DEFAULT_NATIONALITY.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether console output is enabled at all
    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,

    /// Attach the wizard session id to every event
    pub include_session_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_session_context: env::var(env_vars::LOGGING_INCLUDE_SESSION_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub wizard: WizardPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from the environment
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Parse preferences from a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidToml {
            message: e.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid runtime configuration: {message}")]
    InvalidToml { message: String },
}

/// Environment variable names for configuration
pub mod env_vars {
    // Wizard
    pub const ENFORCE_INVOICE_TITLE_TYPE: &str = "DORM_ENFORCE_INVOICE_TITLE_TYPE";
    pub const VALIDATE_FULL_DRAFT_ON_SUBMIT: &str = "DORM_VALIDATE_FULL_DRAFT_ON_SUBMIT";
    pub const DEFAULT_NATIONALITY: &str = "DORM_DEFAULT_NATIONALITY";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "DORM_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "DORM_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "DORM_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_SESSION_CONTEXT: &str = "DORM_LOGGING_INCLUDE_SESSION_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(env_vars::ENFORCE_INVOICE_TITLE_TYPE.starts_with("DORM_"));
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("DORM_"));
    }

    #[test]
    fn test_runtime_config_from_toml_overrides_selected_keys() {
        let parsed = RuntimeConfig::from_toml_str(
            r#"
            [wizard]
            enforce_invoice_title_type = false
            default_nationality = "DE"

            [logging]
            min_log_level = "Debug"
            "#,
        )
        .unwrap();

        assert!(!parsed.wizard.enforce_invoice_title_type);
        assert_eq!(parsed.wizard.default_nationality, "DE");
        assert_eq!(parsed.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_runtime_config_is_reported() {
        let err = RuntimeConfig::from_toml_str("wizard = [").unwrap_err();
        assert!(err.to_string().contains("Invalid runtime configuration"));
    }
}
