//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::ControllerConfig;

/// Load controller configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a value is
/// out of range.
///
/// # Example
///
/// ```rust,ignore
/// use dualstep::load_config;
///
/// let config = load_config("controller.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ControllerConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse controller configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<ControllerConfig> {
    let config: ControllerConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use crate::engine::{Direction, MicrostepMode};

    use super::*;

    #[test]
    fn test_parse_empty_config_is_power_up_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_parse_partial_axis_table() {
        let toml = r#"
[axis1]
microsteps = 16
current = 1200
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.axis1.microsteps, MicrostepMode::Sixteenth);
        assert_eq!(config.axis1.current, 1200);
        // Unnamed fields keep power-up defaults.
        assert_eq!(config.axis1.step_delay, crate::engine::STEP_DELAY_DEFAULT);
        assert_eq!(config.axis2, Default::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[axis1]
enabled = true
direction = "high"
microsteps = 4
current = 2048
step_delay = 20

[axis2]
enabled = true
direction = "low"
microsteps = 2
current = 900
step_delay = 100
"#;

        let config = parse_config(toml).unwrap();
        assert!(config.axis1.enabled);
        assert_eq!(config.axis1.direction, Direction::High);
        assert_eq!(config.axis1.microsteps, MicrostepMode::Quarter);
        assert_eq!(config.axis2.step_delay, 100);
    }

    #[test]
    fn test_parse_rejects_unsupported_divisor() {
        let toml = r#"
[axis1]
microsteps = 8
"#;

        assert!(parse_config(toml).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_current() {
        let toml = r#"
[axis2]
current = 4096
"#;

        assert!(parse_config(toml).is_err());
    }
}
