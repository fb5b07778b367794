//! Rendering of bit vectors as HDL literal text.
//!
//! The output re-parses to an equal value whenever every digit can be
//! written exactly:
//!
//! - negative signed values render as `-` and their magnitude,
//! - sized values carry their width prefix, unsized values drop leading
//!   zero digits,
//! - decimal falls back to binary when any bit is `X` or `Z`,
//! - binary groups bits in fours with `_`,
//! - an octal or hex digit whose bits are all `X` or all `Z` renders as
//!   `x` or `z`; any other mix has no digit and renders as the configured
//!   marker.

use crate::attrs::Radix;
use crate::config::ValueConfig;
use crate::error::FormatError;
use crate::vector::BitVector;
use quartz_common::Logic;
use std::fmt;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Converts little-endian value words to decimal digits.
fn decimal_digits(words: &[u64]) -> String {
    let mut rest = words.to_vec();
    let mut digits = Vec::new();
    while rest.iter().any(|&w| w != 0) {
        let mut r = 0u128;
        for w in rest.iter_mut().rev() {
            let cur = (r << 64) | u128::from(*w);
            *w = (cur / 10) as u64;
            r = cur % 10;
        }
        digits.push(b'0' + r as u8);
    }
    if digits.is_empty() {
        return "0".to_string();
    }
    digits.iter().rev().map(|&d| d as char).collect()
}

impl BitVector {
    /// Renders in the value's own radix, using `#` for unwritable digits.
    pub fn verilog_string(&self) -> String {
        self.verilog_string_radix(self.radix())
    }

    /// Renders in `radix`, using `#` for unwritable digits.
    pub fn verilog_string_radix(&self, radix: Radix) -> String {
        self.verilog_string_with(radix, &ValueConfig::default())
    }

    /// Renders in `radix` with the marker character from `config`.
    pub fn verilog_string_with(&self, radix: Radix, config: &ValueConfig) -> String {
        self.render(radix, Some(config.mixed_digit_marker))
            .unwrap_or_default()
    }

    /// Renders in `radix`, failing instead of emitting a marker character.
    pub fn try_verilog_string(&self, radix: Radix) -> Result<String, FormatError> {
        self.render(radix, None)
    }

    fn render(&self, radix: Radix, marker: Option<char>) -> Result<String, FormatError> {
        if self.is_negative() && !self.has_xz() {
            let magnitude = self.negated_bits();
            let body = self.render_words(radix, marker, Some(&magnitude))?;
            return Ok(format!("-{body}"));
        }
        self.render_words(radix, marker, None)
    }

    /// Renders the bits of `self`, or `magnitude` in their place.
    fn render_words(
        &self,
        radix: Radix,
        marker: Option<char>,
        magnitude: Option<&[u64]>,
    ) -> Result<String, FormatError> {
        let source;
        let bits = match magnitude {
            Some(words) => {
                source = BitVector::from_words(self.width(), words, self.attrs());
                &source
            }
            None => self,
        };
        let radix = if radix == Radix::Decimal && bits.has_xz() {
            Radix::Binary
        } else {
            radix
        };

        let mut out = String::new();
        if self.is_sized() {
            out.push_str(&self.width().to_string());
        }
        let plain_decimal = radix == Radix::Decimal && self.is_signed() && !self.is_sized();
        if !plain_decimal {
            out.push('\'');
            if self.is_signed() {
                out.push('s');
            }
            out.push(radix.base_char());
        }

        match radix.digit_bits() {
            None => out.push_str(&decimal_digits(&bits.planes().value_words())),
            Some(1) => out.push_str(&bits.binary_digits()),
            Some(n) => out.push_str(&bits.grouped_digits(radix, n, marker)?),
        }
        Ok(out)
    }

    /// Index of the highest bit to print: all bits when sized, otherwise
    /// from the highest bit that is not a resolved `0`.
    fn top_bit(&self) -> u32 {
        if self.is_sized() {
            return self.width() - 1;
        }
        (0..self.width())
            .rev()
            .find(|&i| self.value(i as i32) != Logic::Zero)
            .unwrap_or(0)
    }

    fn binary_digits(&self) -> String {
        let top = self.top_bit();
        let mut out = String::new();
        for i in (0..=top).rev() {
            if i % 4 == 3 && i != top {
                out.push('_');
            }
            out.push(self.value(i as i32).to_char());
        }
        out
    }

    fn grouped_digits(
        &self,
        radix: Radix,
        bits: u32,
        marker: Option<char>,
    ) -> Result<String, FormatError> {
        let top_group = self.top_bit() / bits;
        let mut out = String::new();
        for g in (0..=top_group).rev() {
            let lsb = g * bits;
            let msb = (lsb + bits - 1).min(self.width() - 1);
            let states: Vec<Logic> = (lsb..=msb).map(|i| self.value(i as i32)).collect();
            let digit = if states.iter().all(|s| s.is_known()) {
                let v = states
                    .iter()
                    .enumerate()
                    .filter(|(_, &s)| s == Logic::One)
                    .fold(0usize, |acc, (b, _)| acc | (1 << b));
                HEX_DIGITS[v] as char
            } else if states.iter().all(|&s| s == Logic::X) {
                'x'
            } else if states.iter().all(|&s| s == Logic::Z) {
                'z'
            } else {
                match marker {
                    Some(m) => {
                        log::debug!("bits {lsb}..={msb} mix states; rendered as '{m}'");
                        m
                    }
                    None => return Err(FormatError::MixedDigit { lsb, msb, radix }),
                }
            };
            out.push(digit);
        }
        Ok(out)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verilog_string())
    }
}
