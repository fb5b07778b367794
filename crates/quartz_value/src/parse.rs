//! Parsing of HDL literal text into bit vectors.
//!
//! Accepted forms:
//!
//! ```text
//! [-]<decimal digits>                       32-bit, unsized, signed
//! [-][<size>]'[s|S]<b|o|d|h><digits>        sized when <size> is given
//! ```
//!
//! Binary, octal and hex digits are read positionally, most significant
//! first, and may be `x`/`X` (unknown) or `z`/`Z`/`?` (high impedance). A
//! decimal digit string may instead be a single `x` or `z`, which fills
//! every bit. `_` separators are skipped.

use crate::attrs::{Attrs, Radix, INTEGER_WIDTH};
use crate::config::ValueConfig;
use crate::error::ParseError;
use crate::vector::BitVector;
use quartz_common::Logic;
use std::str::FromStr;

enum Digit {
    Value(u32),
    Fill(Logic),
}

fn classify(ch: char, radix: Radix) -> Option<Digit> {
    match ch {
        'x' | 'X' => Some(Digit::Fill(Logic::X)),
        'z' | 'Z' | '?' => Some(Digit::Fill(Logic::Z)),
        _ => ch.to_digit(radix.value()).map(Digit::Value),
    }
}

/// Returns the digits without `_` separators, each with its byte offset.
fn digits_of(text: &str, offset: usize) -> Result<Vec<(char, usize)>, ParseError> {
    let digits: Vec<(char, usize)> = text
        .char_indices()
        .filter(|&(_, c)| c != '_')
        .map(|(i, c)| (c, offset + i))
        .collect();
    if digits.is_empty() {
        return Err(ParseError::MissingDigits {
            position: offset + text.len(),
        });
    }
    Ok(digits)
}

/// Reads binary, octal or hex digits into a vector exactly as wide as the
/// digits spell out.
fn positional(text: &str, offset: usize, radix: Radix, bits: u32) -> Result<BitVector, ParseError> {
    let digits = digits_of(text, offset)?
        .into_iter()
        .map(|(ch, position)| {
            classify(ch, radix).ok_or(ParseError::IllegalDigit {
                ch,
                position,
                radix,
            })
        })
        .collect::<Result<Vec<Digit>, ParseError>>()?;
    let width = digits.len() as u32 * bits;
    let mut out = BitVector::all_zero(width);
    for (n, digit) in digits.iter().rev().enumerate() {
        let lsb = n as u32 * bits;
        for b in 0..bits {
            let bit = match *digit {
                Digit::Value(v) => Logic::from_bool((v >> b) & 1 == 1),
                Digit::Fill(fill) => fill,
            };
            out.set_value((lsb + b) as i32, bit);
        }
    }
    Ok(out)
}

/// Reads decimal digits by repeated multiply-by-ten-and-add.
fn decimal(text: &str, offset: usize, allow_fill: bool) -> Result<BitVector, ParseError> {
    let digits = digits_of(text, offset)?;
    if allow_fill && digits.len() == 1 {
        if let Some(Digit::Fill(fill)) = classify(digits[0].0, Radix::Decimal) {
            return Ok(BitVector::filled(fill, 1));
        }
    }
    let mut words = vec![0u64];
    for &(ch, position) in &digits {
        let d = ch
            .to_digit(10)
            .ok_or(ParseError::IllegalDigit {
                ch,
                position,
                radix: Radix::Decimal,
            })?;
        let mut carry = u128::from(d);
        for w in words.iter_mut() {
            let t = u128::from(*w) * 10 + carry;
            *w = t as u64;
            carry = t >> 64;
        }
        if carry > 0 {
            words.push(carry as u64);
        }
    }
    let width = words
        .iter()
        .enumerate()
        .rev()
        .find(|(_, &w)| w != 0)
        .map_or(1, |(i, &w)| i as u32 * 64 + 64 - w.leading_zeros());
    Ok(BitVector::from_words(width, &words, Attrs::default()))
}

fn parse_size(text: &str, offset: usize, config: &ValueConfig) -> Result<Option<u32>, ParseError> {
    if text.is_empty() {
        return Ok(None);
    }
    let mut size: u64 = 0;
    for (i, ch) in text.char_indices() {
        let d = ch.to_digit(10).ok_or(ParseError::InvalidSize {
            ch,
            position: offset + i,
        })?;
        size = size.saturating_mul(10).saturating_add(u64::from(d));
    }
    if size == 0 {
        return Err(ParseError::ZeroSize);
    }
    if size > u64::from(config.max_literal_width) {
        return Err(ParseError::SizeTooLarge {
            size,
            limit: config.max_literal_width,
        });
    }
    Ok(Some(size as u32))
}

/// Builds a literal from its already-split parts.
///
/// `offset` is the byte position of `digits` in the original text.
fn build(
    size: Option<u32>,
    signed: bool,
    radix: Radix,
    digits: &str,
    offset: usize,
    allow_fill: bool,
) -> Result<BitVector, ParseError> {
    let src = match radix.digit_bits() {
        Some(bits) => positional(digits, offset, radix, bits)?,
        None => decimal(digits, offset, allow_fill)?,
    };
    let (width, sized) = match size {
        Some(w) => (w, true),
        None => (INTEGER_WIDTH, false),
    };
    if !sized && (width..src.width()).any(|i| src.value(i as i32) != Logic::Zero) {
        log::warn!("unsized literal '{digits}' does not fit in {width} bits; truncated");
    }
    // Literal digits extend as unsigned: zero, or X/Z from an X/Z top digit.
    let mut value = src.with_attrs(width, Attrs::new(sized, false, radix));
    value.set_signed(signed);
    Ok(value)
}

impl BitVector {
    /// Parses HDL literal text with the default configuration.
    pub fn parse_verilog(text: &str) -> Result<BitVector, ParseError> {
        Self::parse_with(text, &ValueConfig::default())
    }

    /// Parses HDL literal text.
    ///
    /// Surrounding whitespace is ignored, as is whitespace between the base
    /// character and the digits. A leading `-` negates the literal at its
    /// own width.
    pub fn parse_with(text: &str, config: &ValueConfig) -> Result<BitVector, ParseError> {
        let lead = text.len() - text.trim_start().len();
        let body = text.trim();
        if body.is_empty() {
            return Err(ParseError::Empty);
        }
        let (negative, body, offset) = match body.strip_prefix('-') {
            Some(rest) => (true, rest, lead + 1),
            None => (false, body, lead),
        };

        let value = match body.find('\'') {
            None => build(None, true, Radix::Decimal, body, offset, false)?,
            Some(quote) => {
                let size = parse_size(&body[..quote], offset, config)?;
                let mut pos = offset + quote + 1;
                let mut rest = &body[quote + 1..];
                let signed = match rest.strip_prefix(['s', 'S']) {
                    Some(r) => {
                        rest = r;
                        pos += 1;
                        true
                    }
                    None => false,
                };
                let base = rest
                    .chars()
                    .next()
                    .ok_or(ParseError::MissingBase { position: pos })?;
                let radix = Radix::from_base_char(base).ok_or(ParseError::IllegalBase {
                    ch: base,
                    position: pos,
                })?;
                rest = &rest[base.len_utf8()..];
                pos += base.len_utf8();
                let digits = rest.trim_start();
                pos += rest.len() - digits.len();
                build(size, signed, radix, digits, pos, true)?
            }
        };

        Ok(if negative { value.negate() } else { value })
    }

    /// Builds a value from a literal already split into its parts.
    ///
    /// `size` of `None` means unsized (32 bits). `digits` follow the same
    /// rules as the digits of a based literal.
    pub fn from_literal_parts(
        size: Option<u32>,
        signed: bool,
        radix: Radix,
        digits: &str,
    ) -> Result<BitVector, ParseError> {
        if size == Some(0) {
            return Err(ParseError::ZeroSize);
        }
        build(size, signed, radix, digits, 0, true)
    }

    /// Replaces `self` with the parsed literal.
    ///
    /// On error `self` is left unchanged.
    pub fn set_from_verilog_string(&mut self, text: &str) -> Result<(), ParseError> {
        *self = Self::parse_verilog(text)?;
        Ok(())
    }
}

impl FromStr for BitVector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_verilog(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(v: &BitVector) -> String {
        (0..v.width() as i32)
            .rev()
            .map(|i| v.value(i).to_char())
            .collect()
    }

    #[test]
    fn parse_sized_binary_with_xz() {
        let v: BitVector = "4'b10xz".parse().unwrap();
        assert_eq!(v.width(), 4);
        assert!(v.is_sized());
        assert!(!v.is_signed());
        assert_eq!(v.radix(), Radix::Binary);
        assert_eq!(bits(&v), "10XZ");
    }

    #[test]
    fn parse_plain_decimal() {
        let v = BitVector::parse_verilog("1_000").unwrap();
        assert_eq!(v.width(), 32);
        assert!(!v.is_sized());
        assert!(v.is_signed());
        assert_eq!(v.radix(), Radix::Decimal);
        assert_eq!(v.to_i32(), Ok(1000));
    }

    #[test]
    fn parse_unsized_based_is_unsigned() {
        let v = BitVector::parse_verilog("'hFF").unwrap();
        assert_eq!(v.width(), 32);
        assert!(!v.is_sized());
        assert!(!v.is_signed());
        assert_eq!(v.to_u32(), Ok(255));
    }

    #[test]
    fn parse_signed_hex_is_not_negated() {
        let v = BitVector::parse_verilog("8'shFF").unwrap();
        assert!(v.is_signed());
        assert!(v.is_negative());
        assert_eq!(v.to_i32(), Ok(-1));
        let u = BitVector::parse_verilog("8'hFF").unwrap();
        assert!(u.eq_exact(&v));
    }

    #[test]
    fn parse_signed_narrow_literal_zero_extends() {
        let v = BitVector::parse_verilog("8'sh F").unwrap();
        assert_eq!(bits(&v), "00001111");
    }

    #[test]
    fn parse_octal_and_hex() {
        assert_eq!(BitVector::parse_verilog("6'o75").unwrap().to_u32(), Ok(0o75));
        assert_eq!(
            BitVector::parse_verilog("16'hdead").unwrap().to_u32(),
            Ok(0xDEAD)
        );
        assert_eq!(bits(&BitVector::parse_verilog("8'hx5").unwrap()), "XXXX0101");
        assert_eq!(bits(&BitVector::parse_verilog("6'o?1").unwrap()), "ZZZ001");
    }

    #[test]
    fn parse_extends_with_top_xz() {
        assert_eq!(bits(&BitVector::parse_verilog("8'bx1").unwrap()), "XXXXXXX1");
        assert_eq!(bits(&BitVector::parse_verilog("8'bz").unwrap()), "ZZZZZZZZ");
        assert_eq!(bits(&BitVector::parse_verilog("8'b1").unwrap()), "00000001");
    }

    #[test]
    fn parse_truncates_sized() {
        assert_eq!(BitVector::parse_verilog("4'hFF").unwrap().to_u32(), Ok(0xF));
    }

    #[test]
    fn parse_decimal_based() {
        let v = BitVector::parse_verilog("12'd4095").unwrap();
        assert_eq!(v.to_u32(), Ok(4095));
        assert_eq!(v.radix(), Radix::Decimal);
        assert_eq!(bits(&BitVector::parse_verilog("4'dx").unwrap()), "XXXX");
        assert_eq!(bits(&BitVector::parse_verilog("4'd?").unwrap()), "ZZZZ");
    }

    #[test]
    fn parse_wide_decimal() {
        let v = BitVector::parse_verilog("100'd36893488147419103232").unwrap();
        assert_eq!(v.value(65), Logic::One);
        assert_eq!(v.to_real(), 2f64.powi(65));
    }

    #[test]
    fn parse_unsized_overflow_truncates() {
        let v = BitVector::parse_verilog("'h1_0000_0001").unwrap();
        assert_eq!(v.width(), 32);
        assert_eq!(v.to_u32(), Ok(1));
    }

    #[test]
    fn parse_negative() {
        let v = BitVector::parse_verilog("-8'sd5").unwrap();
        assert_eq!(v.to_i32(), Ok(-5));
        let w = BitVector::parse_verilog(" -12 ").unwrap();
        assert_eq!(w.to_i32(), Ok(-12));
        let u = BitVector::parse_verilog("-4'd1").unwrap();
        assert_eq!(u.to_u32(), Ok(15));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(BitVector::parse_verilog("   "), Err(ParseError::Empty));
        assert_eq!(
            BitVector::parse_verilog("8'b102"),
            Err(ParseError::IllegalDigit {
                ch: '2',
                position: 5,
                radix: Radix::Binary
            })
        );
        assert_eq!(
            BitVector::parse_verilog("8'q0"),
            Err(ParseError::IllegalBase {
                ch: 'q',
                position: 2
            })
        );
        assert_eq!(
            BitVector::parse_verilog("8'"),
            Err(ParseError::MissingBase { position: 2 })
        );
        assert_eq!(
            BitVector::parse_verilog("8'h"),
            Err(ParseError::MissingDigits { position: 3 })
        );
        assert_eq!(BitVector::parse_verilog("0'b1"), Err(ParseError::ZeroSize));
        assert_eq!(
            BitVector::parse_verilog("a'b1"),
            Err(ParseError::InvalidSize {
                ch: 'a',
                position: 0
            })
        );
        assert_eq!(
            BitVector::parse_verilog("12x"),
            Err(ParseError::IllegalDigit {
                ch: 'x',
                position: 2,
                radix: Radix::Decimal
            })
        );
    }

    #[test]
    fn size_limit_from_config() {
        let config = ValueConfig {
            max_literal_width: 16,
            ..ValueConfig::default()
        };
        assert!(BitVector::parse_with("16'h0", &config).is_ok());
        assert_eq!(
            BitVector::parse_with("17'h0", &config),
            Err(ParseError::SizeTooLarge {
                size: 17,
                limit: 16
            })
        );
    }

    #[test]
    fn literal_parts() {
        let v = BitVector::from_literal_parts(Some(8), true, Radix::Hex, "f0").unwrap();
        assert!(v.is_signed());
        assert_eq!(v.to_i32(), Ok(-16));
        assert_eq!(
            BitVector::from_literal_parts(Some(0), false, Radix::Hex, "0"),
            Err(ParseError::ZeroSize)
        );
    }

    #[test]
    fn set_from_string_keeps_value_on_error() {
        let mut v = BitVector::from_u64(7, 4);
        assert!(v.set_from_verilog_string("4'b12").is_err());
        assert_eq!(v.to_u64(), Ok(7));
        v.set_from_verilog_string("3'b101").unwrap();
        assert_eq!(v.width(), 3);
        assert_eq!(v.to_u64(), Ok(5));
    }
}
