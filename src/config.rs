//! Session core configuration loaded from environment variables.
//!
//! Only the clock-skew tolerance and the re-validation interval tune the
//! core itself; the remaining settings locate the API and the local store.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default landing page for signed-in users.
pub const DEFAULT_LANDING_PATH: &str = "/home";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the race tracker API
    pub api_base_url: String,
    /// Seconds subtracted from a token's expiry before it counts as valid
    pub token_skew_secs: u64,
    /// Seconds between session re-validations while a protected view is open
    pub session_check_interval_secs: u64,
    /// Where the persistent session store lives
    pub store_path: PathBuf,
    /// Protected landing page (race-scoped home)
    pub landing_path: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            token_skew_secs: 10,
            session_check_interval_secs: 30,
            store_path: PathBuf::from(".racetrack-session.json"),
            landing_path: DEFAULT_LANDING_PATH.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development. Every setting has a
    /// default, but a value that is present and malformed is an error rather
    /// than being silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let token_skew_secs = parse_var("TOKEN_EXPIRY_SKEW_SECS", defaults.token_skew_secs)?;

        let session_check_interval_secs = parse_var(
            "SESSION_CHECK_INTERVAL_SECS",
            defaults.session_check_interval_secs,
        )?;
        if session_check_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_CHECK_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let landing_path = env::var("LANDING_PATH").unwrap_or(defaults.landing_path);
        if !landing_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                name: "LANDING_PATH",
                reason: "must be an absolute path".to_string(),
            });
        }

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            token_skew_secs,
            session_check_interval_secs,
            store_path: env::var("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            landing_path,
        })
    }

    /// Re-validation interval as a `Duration`.
    pub fn session_check_interval(&self) -> Duration {
        Duration::from_secs(self.session_check_interval_secs)
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-wide, so everything touching them
    // lives in one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("API_BASE_URL", "https://tracker.example.com/api/");
        env::set_var("TOKEN_EXPIRY_SKEW_SECS", "5");
        env::set_var("SESSION_CHECK_INTERVAL_SECS", "45");
        env::remove_var("LANDING_PATH");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_base_url, "https://tracker.example.com/api");
        assert_eq!(config.token_skew_secs, 5);
        assert_eq!(config.session_check_interval(), Duration::from_secs(45));
        assert_eq!(config.landing_path, DEFAULT_LANDING_PATH);

        env::set_var("SESSION_CHECK_INTERVAL_SECS", "0");
        assert!(Config::from_env().is_err());

        env::set_var("SESSION_CHECK_INTERVAL_SECS", "soon");
        assert!(Config::from_env().is_err());

        env::remove_var("SESSION_CHECK_INTERVAL_SECS");
        env::set_var("TOKEN_EXPIRY_SKEW_SECS", "-3");
        assert!(Config::from_env().is_err());

        env::remove_var("TOKEN_EXPIRY_SKEW_SECS");
        env::remove_var("API_BASE_URL");
    }
}
