//! Stream configuration.
//!
//! ## Environment variables
//!
//! - `MEDIAN_WINDOW_SECS`: window width in seconds (default: 60)
//! - `MEDIAN_UPPER_BOUND`: exclusive upper bound on event timestamps, in Unix
//!   seconds, or `none` to disable it (default: process start time)

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::policy::WindowPolicy;
use crate::validate::EventValidator;
use crate::{WINDOW_FLOOR, WINDOW_WIDTH_SECS};

/// Environment variable for the window width.
pub const ENV_WINDOW_SECS: &str = "MEDIAN_WINDOW_SECS";
/// Environment variable for the timestamp upper bound.
pub const ENV_UPPER_BOUND: &str = "MEDIAN_UPPER_BOUND";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Window width must be positive.
    #[error("Window width must be positive, got {0}")]
    NonPositiveWindow(i64),
    /// Environment variable could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
    /// Upper bound does not lie above the floor.
    #[error("Upper bound {upper} must be greater than floor {floor}")]
    UpperBelowFloor {
        /// Configured upper bound.
        upper: i64,
        /// Window floor.
        floor: i64,
    },
}

/// Runtime configuration for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Window width in seconds.
    pub window_secs: i64,
    /// Watermark sentinel and exclusive lower bound on timestamps.
    pub window_floor: i64,
    /// Exclusive upper bound on timestamps; `None` disables the check.
    pub upper_bound: Option<i64>,
}

impl StreamConfig {
    /// Configuration with the upper bound pinned to the current time.
    pub fn bounded_by_now() -> Self {
        Self {
            upper_bound: Some(Utc::now().timestamp()),
            ..Self::default()
        }
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::bounded_by_now();

        if let Some(raw) = lookup(ENV_WINDOW_SECS) {
            config.window_secs = parse_env(ENV_WINDOW_SECS, &raw)?;
        }

        if let Some(raw) = lookup(ENV_UPPER_BOUND) {
            config.upper_bound = if raw.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_env(ENV_UPPER_BOUND, &raw)?)
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_secs <= 0 {
            return Err(ConfigError::NonPositiveWindow(self.window_secs));
        }
        if let Some(upper) = self.upper_bound {
            if upper <= self.window_floor {
                return Err(ConfigError::UpperBelowFloor {
                    upper,
                    floor: self.window_floor,
                });
            }
        }
        Ok(())
    }

    /// Window policy for this configuration.
    pub fn policy(&self) -> WindowPolicy {
        WindowPolicy::new(self.window_secs, self.window_floor)
    }

    /// Record validator for this configuration.
    pub fn validator(&self) -> EventValidator {
        EventValidator::new(self.window_floor, self.upper_bound)
    }
}

impl Default for StreamConfig {
    /// Default window and floor, no upper bound.
    fn default() -> Self {
        Self {
            window_secs: WINDOW_WIDTH_SECS,
            window_floor: WINDOW_FLOOR,
            upper_bound: None,
        }
    }
}

fn parse_env(name: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: raw.to_string(),
    })
}
