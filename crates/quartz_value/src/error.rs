//! Error types for literal parsing, strict rendering, conversion and
//! configuration loading.

use crate::attrs::Radix;
use thiserror::Error;

/// Errors produced while parsing HDL literal text.
///
/// Positions are byte offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text contains no literal.
    #[error("empty literal")]
    Empty,

    /// The width prefix is not a decimal number.
    #[error("invalid size '{ch}' at position {position}")]
    InvalidSize {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// The width prefix is zero.
    #[error("literal size must be at least 1")]
    ZeroSize,

    /// The width prefix exceeds the configured limit.
    #[error("literal size {size} exceeds the limit of {limit} bits")]
    SizeTooLarge {
        /// The requested width.
        size: u64,
        /// The configured maximum.
        limit: u32,
    },

    /// A `'` is not followed by a base character.
    #[error("missing base specifier at position {position}")]
    MissingBase {
        /// Byte offset just after the `'`.
        position: usize,
    },

    /// The base character is not one of `b`, `o`, `d`, `h`.
    #[error("illegal base specifier '{ch}' at position {position}")]
    IllegalBase {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// A digit is not valid for the literal's radix.
    #[error("illegal digit '{ch}' for radix {radix} at position {position}")]
    IllegalDigit {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        position: usize,
        /// Radix of the literal.
        radix: Radix,
    },

    /// The literal has a base but no digits.
    #[error("missing digits at position {position}")]
    MissingDigits {
        /// Byte offset where digits were expected.
        position: usize,
    },
}

/// Errors produced by strict rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// An octal or hex digit group mixes resolved and unresolved bits, or
    /// `X` and `Z` bits, and cannot be written as a single digit.
    #[error("bits {lsb}..={msb} cannot be rendered as one radix-{radix} digit")]
    MixedDigit {
        /// Lowest bit index of the group.
        lsb: u32,
        /// Highest in-range bit index of the group.
        msb: u32,
        /// Radix being rendered.
        radix: Radix,
    },
}

/// Errors produced when converting a value to a machine type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value contains `X` or `Z` bits.
    #[error("value contains X or Z bits")]
    Indeterminate,

    /// The numeric value is not representable in the target type.
    #[error("value does not fit in {target}")]
    Overflow {
        /// Name of the target type.
        target: &'static str,
    },
}

/// Errors that can occur when loading a value configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading the config file.
    #[error("I/O error reading config: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("TOML parse error: {0}")]
    ParseError(String),

    /// The config parsed but failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::IllegalDigit {
            ch: '9',
            position: 4,
            radix: Radix::Octal,
        };
        assert_eq!(
            err.to_string(),
            "illegal digit '9' for radix 8 at position 4"
        );
        assert_eq!(
            ParseError::SizeTooLarge {
                size: 100,
                limit: 64
            }
            .to_string(),
            "literal size 100 exceeds the limit of 64 bits"
        );
        assert_eq!(
            ParseError::MissingBase { position: 2 }.to_string(),
            "missing base specifier at position 2"
        );
    }

    #[test]
    fn format_error_display() {
        let err = FormatError::MixedDigit {
            lsb: 4,
            msb: 7,
            radix: Radix::Hex,
        };
        assert_eq!(
            err.to_string(),
            "bits 4..=7 cannot be rendered as one radix-16 digit"
        );
    }

    #[test]
    fn conversion_error_display() {
        assert_eq!(
            ConversionError::Indeterminate.to_string(),
            "value contains X or Z bits"
        );
        assert_eq!(
            ConversionError::Overflow { target: "u32" }.to_string(),
            "value does not fit in u32"
        );
    }

    #[test]
    fn config_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io.into();
        assert!(err.to_string().contains("missing"));
        let v = ConfigError::ValidationError("bad".into());
        assert_eq!(v.to_string(), "validation error: bad");
    }
}
