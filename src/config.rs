use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::timeline::TimelineIndex;
use crate::trajectory::SamplingPolicy;

/// Largest supported interpolation degree
pub const MAX_INTERPOLATION_DEGREE: usize = 8;
/// Largest supported coordinate precision
pub const MAX_COORDINATE_DECIMALS: u32 = 9;

/// Top-level configuration; every section falls back to its defaults
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub clock: ClockConfig,
    pub sampling: SamplingConfig,
    pub view: ViewConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, path) in [
            ("topology", &self.data.topology),
            ("trace", &self.data.trace),
            ("sat", &self.data.sat),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::InvalidData(format!(
                    "{} path cannot be empty",
                    name
                )));
            }
        }

        if !(self.clock.multiplier.is_finite() && self.clock.multiplier > 0.0) {
            return Err(ValidationError::InvalidClock(format!(
                "multiplier must be positive, got {}",
                self.clock.multiplier
            )));
        }
        if self.clock.step.is_zero() {
            return Err(ValidationError::InvalidClock(
                "step cannot be zero".to_string(),
            ));
        }

        let degree = self.sampling.interpolation_degree;
        if degree == 0 || degree > MAX_INTERPOLATION_DEGREE {
            return Err(ValidationError::InvalidSampling(format!(
                "interpolation_degree must be between 1 and {}, got {}",
                MAX_INTERPOLATION_DEGREE, degree
            )));
        }
        if self.sampling.coordinate_decimals > MAX_COORDINATE_DECIMALS {
            return Err(ValidationError::InvalidSampling(format!(
                "coordinate_decimals must be at most {}, got {}",
                MAX_COORDINATE_DECIMALS, self.sampling.coordinate_decimals
            )));
        }

        Ok(())
    }

    /// Log level from the file, or "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// Locations of the three CSV resources
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    /// Link events: source, target, time_ms, status
    pub topology: PathBuf,
    /// Aerial and ground telemetry
    pub trace: PathBuf,
    /// Satellite telemetry
    pub sat: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            topology: PathBuf::from("public/mock_topology.csv"),
            trace: PathBuf::from("public/mock_trace.csv"),
            sat: PathBuf::from("public/mock_sat.csv"),
        }
    }
}

/// Simulation clock settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ClockConfig {
    /// UTC instant that `time_ms = 0` refers to
    pub epoch: DateTime<Utc>,
    /// Simulated time between replayed frames
    #[serde(with = "humantime_serde")]
    pub step: Duration,
    pub multiplier: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
            step: Duration::from_secs(1),
            multiplier: 1.0,
        }
    }
}

fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 27, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Trajectory sampling settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SamplingConfig {
    #[serde(with = "humantime_serde")]
    pub min_sample_gap: Duration,
    pub coordinate_decimals: u32,
    pub interpolation_degree: usize,
    pub clamp_ground_height: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_sample_gap: Duration::from_millis(500),
            coordinate_decimals: 2,
            interpolation_degree: 2,
            clamp_ground_height: false,
        }
    }
}

impl SamplingConfig {
    pub fn policy(&self) -> SamplingPolicy {
        SamplingPolicy {
            min_gap_ms: self.min_sample_gap.as_secs_f64() * 1000.0,
            coordinate_decimals: self.coordinate_decimals,
            clamp_ground_height: self.clamp_ground_height,
        }
    }
}

/// View and overlay settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ViewConfig {
    pub timeline_index: TimelineIndex,
    /// Length of the trailing path drawn behind satellites
    #[serde(with = "humantime_serde")]
    pub satellite_trail: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            timeline_index: TimelineIndex::default(),
            satellite_trail: Duration::from_secs(3600),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid data configuration: {0}")]
    InvalidData(String),
    #[error("Invalid clock configuration: {0}")]
    InvalidClock(String),
    #[error("Invalid sampling configuration: {0}")]
    InvalidSampling(String),
}
