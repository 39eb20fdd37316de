// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tunable constants for the sleep heuristic and axis caching.

use planar_geom::DEFAULT_SMALL_ANGLE_TOLERANCE_SQ;
use thiserror::Error;

/// Error type for config validation and loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A threshold was NaN, infinite or not strictly positive.
    #[error("{name} must be finite and positive, got {value}")]
    OutOfRange {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Deserialization failure.
    #[cfg(feature = "serde")]
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Simulation-wide tunables consumed by bodies and the space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Linear speed (and per-step displacement scale) below which a body may
    /// fall asleep.
    pub linear_sleep_threshold: f64,
    /// Angular threshold, expressed as an equivalent linear speed at the
    /// body's bounding-box diagonal.
    pub angular_sleep_threshold: f64,
    /// Number of stamps a body must stay at rest before it sleeps.
    pub sleep_delay: u64,
    /// Squared rotation step above which axes are recomputed exactly.
    pub small_angle_tolerance_sq: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            linear_sleep_threshold: 0.2,
            angular_sleep_threshold: 0.4,
            sleep_delay: 60,
            small_angle_tolerance_sq: DEFAULT_SMALL_ANGLE_TOLERANCE_SQ,
        }
    }
}

impl SimConfig {
    /// Checks that every threshold is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("linear_sleep_threshold", self.linear_sleep_threshold),
            ("angular_sleep_threshold", self.angular_sleep_threshold),
            ("small_angle_tolerance_sq", self.small_angle_tolerance_sq),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Parses a JSON document (missing fields take their defaults) and
    /// validates the result.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}
