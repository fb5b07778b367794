//! 64-bit simulation time values stored as two packed 32-bit words.
//!
//! [`SimTime`] is the interchange form used when a bit vector is read or
//! written in a time-valued context (`$time`, delay values).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A 64-bit unsigned simulation time split into low and high 32-bit words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime {
    high: u32,
    low: u32,
}

impl SimTime {
    /// Creates a time from its low and high words.
    pub fn new(low: u32, high: u32) -> Self {
        Self { high, low }
    }

    /// Creates a time point at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates a time from a single 64-bit value.
    pub fn from_u64(value: u64) -> Self {
        Self {
            high: (value >> 32) as u32,
            low: value as u32,
        }
    }

    /// Returns the low 32-bit word.
    pub fn low(&self) -> u32 {
        self.low
    }

    /// Returns the high 32-bit word.
    pub fn high(&self) -> u32 {
        self.high
    }

    /// Returns the time as a single 64-bit value.
    pub fn as_u64(&self) -> u64 {
        (u64::from(self.high) << 32) | u64::from(self.low)
    }
}

impl From<u64> for SimTime {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Add for SimTime {
    type Output = Self;

    /// Wrapping 64-bit addition with carry from the low into the high word.
    fn add(self, rhs: Self) -> Self {
        Self::from_u64(self.as_u64().wrapping_add(rhs.as_u64()))
    }
}

impl AddAssign for SimTime {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}
