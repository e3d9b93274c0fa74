//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `UNIBAZAAR_API_URL` - Base URL of the marketplace backend
//!
//! ## Optional
//! - `UNIBAZAAR_STATE_DIR` - Directory for durable session storage
//!   (default: `$HOME/.unibazaar`)
//! - `UNIBAZAAR_GEO_URL` - IP-geolocation endpoint used to detect the
//!   phone dialing code (default: `https://ipapi.co/json/`)
//! - `UNIBAZAAR_DIAL_CODE` - Fallback dialing code when detection fails
//!   (default: `+1`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default IP-geolocation endpoint.
const DEFAULT_GEO_URL: &str = "https://ipapi.co/json/";

/// Fallback phone dialing code.
pub const DEFAULT_DIAL_CODE: &str = "+1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the marketplace backend.
    pub api_url: Url,
    /// Directory holding the durable `user`/`token` entries.
    pub state_dir: PathBuf,
    /// IP-geolocation endpoint for dialing-code detection.
    pub geo_url: String,
    /// Dialing code used until (or instead of) detection.
    pub default_dial_code: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("UNIBAZAAR_API_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("UNIBAZAAR_API_URL".to_string(), e.to_string())
            })?;

        let state_dir = get_optional_env("UNIBAZAAR_STATE_DIR")
            .map_or_else(default_state_dir, PathBuf::from);

        let geo_url = get_env_or_default("UNIBAZAAR_GEO_URL", DEFAULT_GEO_URL);
        let default_dial_code = get_env_or_default("UNIBAZAAR_DIAL_CODE", DEFAULT_DIAL_CODE);

        Ok(Self {
            api_url,
            state_dir,
            geo_url,
            default_dial_code,
        })
    }

    /// Configuration pointing at `api_url` with defaults everywhere else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not a valid URL.
    pub fn for_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = api_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidEnvVar("api_url".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url,
            state_dir: default_state_dir(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            default_dial_code: DEFAULT_DIAL_CODE.to_string(),
        })
    }
}

/// Session state lives under `$HOME/.unibazaar`, or the working directory
/// when no home is available.
fn default_state_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from(".unibazaar"), |home| {
        PathBuf::from(home).join(".unibazaar")
    })
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    get_optional_env(name).unwrap_or_else(|| default.to_string())
}
