//! Per-value attributes: sizedness, signedness and display radix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a plain integer literal or an unsized based literal.
pub const INTEGER_WIDTH: u32 = 32;

/// Width of a simulation time value.
pub const TIME_WIDTH: u32 = 64;

/// Preferred display base of a value. Does not affect its numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Radix {
    /// Base 2.
    #[default]
    Binary,
    /// Base 8.
    Octal,
    /// Base 10.
    Decimal,
    /// Base 16.
    Hex,
}

impl Radix {
    /// Returns the numeric base (2, 8, 10 or 16).
    pub fn value(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }

    /// Looks up a radix by its numeric base.
    pub fn from_value(base: u32) -> Option<Self> {
        match base {
            2 => Some(Radix::Binary),
            8 => Some(Radix::Octal),
            10 => Some(Radix::Decimal),
            16 => Some(Radix::Hex),
            _ => None,
        }
    }

    /// Parses a literal base character (`b`, `o`, `d`, `h`, any case).
    pub fn from_base_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Radix::Binary),
            'o' => Some(Radix::Octal),
            'd' => Some(Radix::Decimal),
            'h' => Some(Radix::Hex),
            _ => None,
        }
    }

    /// Returns the lower-case literal base character.
    pub fn base_char(self) -> char {
        match self {
            Radix::Binary => 'b',
            Radix::Octal => 'o',
            Radix::Decimal => 'd',
            Radix::Hex => 'h',
        }
    }

    /// Bits per digit for the positional radixes; `None` for decimal.
    pub(crate) fn digit_bits(self) -> Option<u32> {
        match self {
            Radix::Binary => Some(1),
            Radix::Octal => Some(3),
            Radix::Decimal => None,
            Radix::Hex => Some(4),
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// The sized/signed/radix attributes carried by every value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attrs {
    /// Whether the width was given explicitly by the producer.
    pub sized: bool,
    /// Whether the value is interpreted as two's complement.
    pub signed: bool,
    /// Preferred display radix.
    pub radix: Radix,
}

impl Attrs {
    /// Creates an attribute set.
    pub const fn new(sized: bool, signed: bool, radix: Radix) -> Self {
        Self {
            sized,
            signed,
            radix,
        }
    }

    /// Sized, unsigned, binary: the attributes of selects, concatenations
    /// and filled constants.
    pub const fn sized_binary() -> Self {
        Self::new(true, false, Radix::Binary)
    }

    /// Combines the attributes of two operands.
    ///
    /// The result is signed only if both are, sized if either is, and keeps
    /// the common radix or `fallback` when they differ.
    pub fn promote(self, other: Attrs, fallback: Radix) -> Attrs {
        Attrs {
            sized: self.sized || other.sized,
            signed: self.signed && other.signed,
            radix: if self.radix == other.radix {
                self.radix
            } else {
                fallback
            },
        }
    }
}

/// A required result shape: width, sizedness and signedness.
///
/// Passed to the evaluator entry points so callers can ask for a result of a
/// given type without re-deriving the promotion rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    /// Result width in bits.
    pub width: u32,
    /// Whether the result is sized.
    pub sized: bool,
    /// Whether the result is signed.
    pub signed: bool,
}

impl ValueType {
    /// The `integer` type: 32 bits, sized, signed.
    pub const INTEGER: ValueType = ValueType::new(INTEGER_WIDTH, true, true);

    /// The `time` type: 64 bits, sized, unsigned.
    pub const TIME: ValueType = ValueType::new(TIME_WIDTH, true, false);

    /// Creates a value type.
    pub const fn new(width: u32, sized: bool, signed: bool) -> Self {
        Self {
            width,
            sized,
            signed,
        }
    }
}
