use std::env::VarError;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::Year;

/// Runtime settings for the command-line driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Reference catalog file; the built-in catalog when `None`.
    pub reference_path: Option<PathBuf>,
    pub quotes_path: PathBuf,
    /// Fixed rating year; the local calendar year when `None`.
    pub rating_year: Option<Year>,
}

/// Load settings from the environment, reading a `.env` file first if present.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_settings() -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    build_settings(|key| std::env::var(key))
}

fn build_settings<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    };

    let rating_year = optional("COTIZADOR_RATING_YEAR")
        .map(|raw| {
            raw.parse::<i32>().map(Year).map_err(|e| ConfigError::InvalidEnvVar {
                var: "COTIZADOR_RATING_YEAR".to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()?;

    Ok(Settings {
        log_level: or_default("COTIZADOR_LOG_LEVEL", "info"),
        reference_path: optional("COTIZADOR_REFERENCE_PATH").map(PathBuf::from),
        quotes_path: PathBuf::from(or_default("COTIZADOR_QUOTES_PATH", "quotes.json")),
        rating_year,
    })
}
