//! Tunable limits for literal parsing and rendering, loaded from TOML.
//!
//! ```toml
//! [value]
//! max_literal_width = 65536
//! mixed_digit_marker = "#"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound on the width prefix of a sized literal.
pub const DEFAULT_MAX_LITERAL_WIDTH: u32 = 1 << 24;

/// Default placeholder for an octal/hex digit that mixes bit states.
pub const DEFAULT_MIXED_DIGIT_MARKER: char = '#';

/// Settings for literal parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    /// Sized literals wider than this are rejected.
    pub max_literal_width: u32,
    /// Character emitted for a digit group that cannot be one digit.
    pub mixed_digit_marker: char,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            max_literal_width: DEFAULT_MAX_LITERAL_WIDTH,
            mixed_digit_marker: DEFAULT_MIXED_DIGIT_MARKER,
        }
    }
}

/// Top-level layout of a config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    value: ValueConfig,
}

/// Loads and validates a value configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ValueConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a value configuration from a TOML string.
///
/// A missing `[value]` table or missing keys take their defaults.
pub fn load_config_from_str(content: &str) -> Result<ValueConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&file.value)?;
    Ok(file.value)
}

fn validate_config(config: &ValueConfig) -> Result<(), ConfigError> {
    if config.max_literal_width == 0 {
        return Err(ConfigError::ValidationError(
            "value.max_literal_width must be at least 1".to_string(),
        ));
    }
    let marker = config.mixed_digit_marker;
    if marker.is_ascii_hexdigit() || matches!(marker, 'x' | 'X' | 'z' | 'Z' | '?' | '_') {
        return Err(ConfigError::ValidationError(format!(
            "value.mixed_digit_marker '{marker}' is a literal digit character"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ValueConfig::default());
        assert_eq!(config.max_literal_width, 16_777_216);
        assert_eq!(config.mixed_digit_marker, '#');
    }

    #[test]
    fn parse_value_table() {
        let toml = r#"
[value]
max_literal_width = 4096
mixed_digit_marker = "!"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.max_literal_width, 4096);
        assert_eq!(config.mixed_digit_marker, '!');
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = load_config_from_str("[value]\nmax_literal_width = 64\n").unwrap();
        assert_eq!(config.max_literal_width, 64);
        assert_eq!(config.mixed_digit_marker, '#');
    }

    #[test]
    fn zero_width_limit_errors() {
        let err = load_config_from_str("[value]\nmax_literal_width = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn digit_marker_errors() {
        let err = load_config_from_str("[value]\nmixed_digit_marker = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        let err = load_config_from_str("[value]\nmixed_digit_marker = \"7\"\n").unwrap_err();
        assert!(err.to_string().contains("'7'"));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("[value\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[value]\nmax_literal_width = 128").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.max_literal_width, 128);
    }

    #[test]
    fn io_error_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("quartz.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
