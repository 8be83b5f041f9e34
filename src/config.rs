//! Configuration management for the blink pilot application

use crate::{
    angle_mapper::SensitivityConfig,
    blink::BlinkThresholds,
    constants::{
        DEFAULT_CLICK_INTERVAL, DEFAULT_DEADZONE, DEFAULT_SENSITIVITY, DEFAULT_SETTLE_DURATION,
        DEFAULT_SMOOTHING_ALPHA, EAR_THRESHOLD, EAR_THRESHOLD_EYEWEAR,
    },
    cursor_smoother::ScreenSize,
    tuning::Tuning,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pointer motion configuration
    pub pointer: PointerConfig,

    /// Blink click configuration
    pub clicks: ClickConfig,

    /// Eye closure thresholds
    pub blink: BlinkConfig,

    /// Screen override; the actuator's screen size is used when absent
    pub screen: Option<ScreenSize>,
}

/// Pointer motion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Direction scale factor (>= 0)
    pub sensitivity: f64,

    /// Deadzone for small head motion (0.0-1.0)
    pub deadzone: f64,

    /// Exponential smoothing factor (0.0-1.0, exclusive of 0)
    pub smoothing_alpha: f64,

    /// Motion pause after a click, in seconds
    pub settle_secs: f64,
}

/// Blink click parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    /// Blink accumulation window, in seconds
    pub interval_secs: f64,
}

/// Eye closure thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Openness ratio below which an eye is closed
    pub threshold: f64,

    /// Threshold used while eyewear is detected
    pub eyewear_threshold: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            deadzone: DEFAULT_DEADZONE,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            settle_secs: DEFAULT_SETTLE_DURATION.as_secs_f64(),
        }
    }
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_CLICK_INTERVAL.as_secs_f64(),
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            threshold: EAR_THRESHOLD,
            eyewear_threshold: EAR_THRESHOLD_EYEWEAR,
        }
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| Error::ConfigError(format!("{name} must be a finite, non-negative number of seconds")))
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.pointer.sensitivity.is_finite() {
            return Err(Error::ConfigError("Sensitivity must be a finite number".to_string()));
        }
        if !self.pointer.deadzone.is_finite() {
            return Err(Error::ConfigError("Deadzone must be a finite number".to_string()));
        }
        if !(self.pointer.smoothing_alpha > 0.0 && self.pointer.smoothing_alpha <= 1.0) {
            return Err(Error::ConfigError(
                "Smoothing alpha must be in (0.0, 1.0]".to_string(),
            ));
        }

        seconds("Settle duration", self.pointer.settle_secs)?;
        seconds("Click interval", self.clicks.interval_secs)?;

        for (name, value) in [
            ("Blink threshold", self.blink.threshold),
            ("Eyewear blink threshold", self.blink.eyewear_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::ConfigError(format!("{name} must be greater than 0")));
            }
        }

        if let Some(screen) = self.screen {
            if screen.width == 0 || screen.height == 0 {
                return Err(Error::ConfigError("Screen size must be non-zero".to_string()));
            }
        }

        Ok(())
    }

    /// Validate and convert into runtime tuning; sensitivity and deadzone are clamped
    pub fn to_tuning(&self) -> Result<Tuning> {
        self.validate()?;

        Ok(Tuning {
            sensitivity: SensitivityConfig::new(self.pointer.sensitivity, self.pointer.deadzone),
            smoothing_alpha: self.pointer.smoothing_alpha,
            click_interval: seconds("Click interval", self.clicks.interval_secs)?,
            settle_duration: seconds("Settle duration", self.pointer.settle_secs)?,
            blink_thresholds: BlinkThresholds {
                normal: self.blink.threshold,
                eyewear: self.blink.eyewear_threshold,
            },
        })
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Blink Pilot Configuration

# Pointer motion
pointer:
  sensitivity: 1.0
  deadzone: 0.05
  smoothing_alpha: 0.2
  settle_secs: 0.1

# Blink clicks: 2 blinks = left, 3 = right, 4+ = double
clicks:
  interval_secs: 0.2

# Eye openness thresholds
blink:
  threshold: 0.25
  eyewear_threshold: 0.5

# Optional screen override
# screen:
#   width: 1920
#   height: 1080
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("pointer:\n  sensitivity: 3.0\n").unwrap();
        assert_eq!(config.pointer.sensitivity, 3.0);
        assert_eq!(config.pointer.deadzone, DEFAULT_DEADZONE);
        assert_eq!(config.clicks, ClickConfig::default());
    }

    #[test]
    fn test_to_tuning() {
        let mut config = Config::default();
        config.pointer.sensitivity = -4.0;
        config.pointer.deadzone = 3.0;
        config.clicks.interval_secs = 0.5;

        let tuning = config.to_tuning().unwrap();
        assert_eq!(tuning.sensitivity, SensitivityConfig::new(0.0, 1.0));
        assert_eq!(tuning.click_interval, Duration::from_millis(500));
        assert_eq!(tuning.settle_duration, DEFAULT_SETTLE_DURATION);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.pointer.smoothing_alpha = 0.0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.clicks.interval_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.blink.eyewear_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let config = Config {
            screen: Some(ScreenSize::new(0, 1080)),
            ..Config::default()
        };
        assert!(config.to_tuning().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blink-pilot.yaml");

        let config = Config {
            screen: Some(ScreenSize::new(2560, 1440)),
            ..Config::default()
        };
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(Config::from_file("/nonexistent/blink.yaml"), Err(Error::Io(_))));
    }
}
