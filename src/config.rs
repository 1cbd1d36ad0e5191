//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use chrono::Duration;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::{auth, reports};
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Directory holding one JSON document per storage key
    pub data_dir: PathBuf,
    /// How many of the most recent services attendance stats cover
    pub recent_services: usize,
    /// Lifetime of a password reset code, in minutes
    pub otp_ttl_minutes: i64,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Lifetime of a password reset code.
    pub fn otp_ttl(&self) -> Result<Duration> {
        if !(1..=auth::MAX_OTP_TTL_MINUTES).contains(&self.otp_ttl_minutes) {
            return Err(Error::config(
                format!("reset code lifetime of {} minutes is out of range", self.otp_ttl_minutes),
                "Set CONGREGATE_OTP_TTL_MINUTES between 1 and 10080 (one week)",
            ));
        }
        Duration::try_minutes(self.otp_ttl_minutes)
            .ok_or_else(|| Error::config("reset code lifetime overflowed", "Lower CONGREGATE_OTP_TTL_MINUTES"))
    }

    /// Return a copy of this config pointed at another data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::from(".congregate"),
            recent_services: reports::DEFAULT_RECENT_SERVICES,
            otp_ttl_minutes: auth::DEFAULT_OTP_TTL_MINUTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        config.data_dir = match env::var("CONGREGATE_DATA_DIR") {
            Ok(path) => PathBuf::from(shellexpand::tilde(&path).to_string()),
            Err(_) => default_data_dir()?,
        };

        if let Ok(count) = env::var("CONGREGATE_RECENT_SERVICES") {
            match count.parse::<usize>() {
                Ok(count) if count > 0 => config.recent_services = count,
                _ => tracing::warn!("Ignoring invalid CONGREGATE_RECENT_SERVICES={count}"),
            }
        }

        if let Ok(minutes) = env::var("CONGREGATE_OTP_TTL_MINUTES") {
            match minutes.parse::<i64>() {
                Ok(minutes) if (1..=auth::MAX_OTP_TTL_MINUTES).contains(&minutes) => {
                    config.otp_ttl_minutes = minutes;
                }
                _ => tracing::warn!("Ignoring invalid CONGREGATE_OTP_TTL_MINUTES={minutes}"),
            }
        }

        Ok(config)
    }
}

/// Platform data directory, e.g. `~/.local/share/congregate`.
fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(env!("CARGO_PKG_NAME")))
        .ok_or_else(|| {
            Error::config(
                "could not determine a data directory",
                "Set CONGREGATE_DATA_DIR or pass --data-dir",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reporting_constants() {
        let config = Config::default();
        assert_eq!(config.recent_services, reports::DEFAULT_RECENT_SERVICES);
        assert_eq!(config.otp_ttl_minutes, auth::DEFAULT_OTP_TTL_MINUTES);
        assert_eq!(config.app_name(), "congregate");
    }

    #[test]
    fn with_data_dir_overrides_path() {
        let config = Config::default().with_data_dir("/tmp/church");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/church"));
    }

    #[test]
    fn otp_ttl_rejects_out_of_range_minutes() {
        let mut config = Config::default();
        assert_eq!(config.otp_ttl().unwrap(), Duration::minutes(auth::DEFAULT_OTP_TTL_MINUTES));

        config.otp_ttl_minutes = 1_000_000_000_000;
        assert!(matches!(config.otp_ttl(), Err(Error::Config { .. })));
        config.otp_ttl_minutes = i64::MAX;
        assert!(config.otp_ttl().is_err());
        config.otp_ttl_minutes = 0;
        assert!(config.otp_ttl().is_err());
    }
}
