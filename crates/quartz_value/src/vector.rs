//! The four-state bit-vector value type: construction, attribute changes,
//! bit queries and conversions to machine types.

use crate::attrs::{Attrs, Radix, ValueType, INTEGER_WIDTH, TIME_WIDTH};
use crate::error::ConversionError;
use crate::storage::{fill_words, last_word_mask, word_count, Planes, WORD_BITS};
use quartz_common::{Logic, SimTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An arbitrary-width vector of four-state bits with HDL value semantics.
///
/// A `BitVector` carries its width (always at least 1) and three attributes:
/// whether the width was explicitly sized, whether it is signed, and its
/// preferred display radix. Bit 0 is the least significant bit.
///
/// Operations never fail: an `X` or `Z` operand bit that makes a result
/// indeterminate produces `X` bits instead.
#[derive(Clone, Serialize, Deserialize)]
pub struct BitVector {
    attrs: Attrs,
    bits: Planes,
}

impl BitVector {
    /// Creates a vector of `width` bits, every bit set to `value`.
    ///
    /// The result is sized, unsigned and binary. A width of 0 is treated as 1.
    pub fn filled(value: Logic, width: u32) -> Self {
        Self {
            attrs: Attrs::sized_binary(),
            bits: Planes::filled(width, value),
        }
    }

    /// Creates a vector with all bits `0`.
    pub fn all_zero(width: u32) -> Self {
        Self::filled(Logic::Zero, width)
    }

    /// Creates a vector with all bits `1`.
    pub fn all_one(width: u32) -> Self {
        Self::filled(Logic::One, width)
    }

    /// Creates a vector with all bits `X`.
    pub fn all_x(width: u32) -> Self {
        Self::filled(Logic::X, width)
    }

    /// Creates a vector with all bits `Z`.
    pub fn all_z(width: u32) -> Self {
        Self::filled(Logic::Z, width)
    }

    /// Creates a sized, unsigned, decimal vector from a `u64`.
    ///
    /// Bits beyond `width` are discarded.
    pub fn from_u64(value: u64, width: u32) -> Self {
        Self::from_words(width, &[value], Attrs::new(true, false, Radix::Decimal))
    }

    /// Creates a vector from raw bytes, 8 bits per byte.
    ///
    /// The last byte holds the least significant bits. An empty slice is
    /// read as a single NUL byte. The result is sized, unsigned and binary.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::all_zero(8);
        }
        let width = bytes.len() as u32 * 8;
        let mut words = vec![0u64; word_count(width)];
        for (i, &b) in bytes.iter().rev().enumerate() {
            words[i / 8] |= u64::from(b) << ((i % 8) * 8);
        }
        Self::from_words(width, &words, Attrs::sized_binary())
    }

    /// Creates a resolved vector from little-endian value words.
    pub(crate) fn from_words(width: u32, words: &[u64], attrs: Attrs) -> Self {
        Self {
            attrs,
            bits: Planes::from_words(width, words),
        }
    }

    /// Creates an all-`X` vector with the given attributes.
    pub(crate) fn unknown(width: u32, attrs: Attrs) -> Self {
        Self {
            attrs,
            bits: Planes::filled(width, Logic::X),
        }
    }

    pub(crate) fn planes(&self) -> &Planes {
        &self.bits
    }

    pub(crate) fn planes_mut(&mut self) -> &mut Planes {
        &mut self.bits
    }

    /// Returns the width in bits.
    pub fn width(&self) -> u32 {
        self.bits.width()
    }

    /// Returns the attribute set.
    pub fn attrs(&self) -> Attrs {
        self.attrs
    }

    /// Returns true if the width was given explicitly.
    pub fn is_sized(&self) -> bool {
        self.attrs.sized
    }

    /// Returns true if the value is interpreted as two's complement.
    pub fn is_signed(&self) -> bool {
        self.attrs.signed
    }

    /// Returns the preferred display radix.
    pub fn radix(&self) -> Radix {
        self.attrs.radix
    }

    /// Replaces the attribute set without touching the bits.
    pub fn set_attrs(&mut self, attrs: Attrs) {
        self.attrs = attrs;
    }

    /// Marks the value signed or unsigned.
    pub fn set_signed(&mut self, signed: bool) {
        self.attrs.signed = signed;
    }

    /// Marks the value sized or unsized.
    pub fn set_sized(&mut self, sized: bool) {
        self.attrs.sized = sized;
    }

    /// Sets the preferred display radix.
    pub fn set_radix(&mut self, radix: Radix) {
        self.attrs.radix = radix;
    }

    /// Reallocates storage for `width` bits, discarding the old contents.
    ///
    /// The value reads all `0` afterwards. Use [`BitVector::resized`] to
    /// keep the low bits.
    pub fn resize(&mut self, width: u32) {
        self.bits.resize(width);
    }

    /// Returns a copy at `width` bits with the given attributes.
    ///
    /// The low `min(self.width(), width)` bits are copied. When widening,
    /// the new high bits are `X` if the most significant bit is `X`, `Z` if
    /// it is `Z`, a copy of it if `attrs` is signed, and `0` otherwise.
    /// Narrowing discards the high bits.
    pub fn with_attrs(&self, width: u32, attrs: Attrs) -> Self {
        let width = width.max(1);
        let src_width = self.width();
        let mut out = Planes::filled(width, Logic::Zero);
        let copied = word_count(src_width.min(width));
        out.plane0[..copied].copy_from_slice(&self.bits.plane0[..copied]);
        out.plane1[..copied].copy_from_slice(&self.bits.plane1[..copied]);

        if width > src_width {
            let fill = match self.bits.msb() {
                Logic::X => Logic::X,
                Logic::Z => Logic::Z,
                Logic::One if attrs.signed => Logic::One,
                _ => Logic::Zero,
            };
            let (f0, f1) = fill_words(fill);
            let last = copied - 1;
            let keep = last_word_mask(src_width);
            out.plane0[last] = (out.plane0[last] & keep) | (f0 & !keep);
            out.plane1[last] = (out.plane1[last] & keep) | (f1 & !keep);
            for i in copied..out.words() {
                out.plane0[i] = f0;
                out.plane1[i] = f1;
            }
        }
        out.trim();
        Self { attrs, bits: out }
    }

    /// Returns a sized copy at `width` bits keeping signedness and radix.
    pub fn resized(&self, width: u32) -> Self {
        self.with_attrs(
            width,
            Attrs {
                sized: true,
                ..self.attrs
            },
        )
    }

    /// Converts to a required result type, keeping the radix.
    pub fn coerce(&self, ty: ValueType) -> Self {
        self.with_attrs(
            ty.width,
            Attrs::new(ty.sized, ty.signed, self.attrs.radix),
        )
    }

    /// Applies [`BitVector::coerce`] when a result type is required.
    pub fn coerced(self, ty: Option<ValueType>) -> Self {
        match ty {
            Some(ty) => self.coerce(ty),
            None => self,
        }
    }

    /// Widens both operands to a common width and attribute set.
    ///
    /// Width is the larger of the two; attributes follow
    /// [`Attrs::promote`] with `fallback` as the radix on disagreement.
    pub(crate) fn harmonize(a: &Self, b: &Self, fallback: Radix) -> (Self, Self, Attrs) {
        let width = a.width().max(b.width());
        let attrs = a.attrs.promote(b.attrs, fallback);
        (a.with_attrs(width, attrs), b.with_attrs(width, attrs), attrs)
    }

    /// Returns the bit at `pos`, or `X` when `pos` is outside the vector.
    pub fn value(&self, pos: i32) -> Logic {
        match u32::try_from(pos) {
            Ok(i) if i < self.width() => self.bits.get(i),
            _ => Logic::X,
        }
    }

    /// Writes the bit at `pos`. Positions outside the vector are ignored.
    pub fn set_value(&mut self, pos: i32, value: Logic) {
        if let Ok(i) = u32::try_from(pos) {
            if i < self.width() {
                self.bits.set(i, value);
            }
        }
    }

    /// Returns true if the value is signed and its sign bit is a resolved `1`.
    pub fn is_negative(&self) -> bool {
        self.attrs.signed && self.bits.msb() == Logic::One
    }

    /// Returns true if any bit is `X`.
    pub fn has_x(&self) -> bool {
        self.bits.has_x()
    }

    /// Returns true if any bit is `Z`.
    pub fn has_z(&self) -> bool {
        self.bits.has_z()
    }

    /// Returns true if any bit is `X` or `Z`.
    pub fn has_xz(&self) -> bool {
        self.bits.has_xz()
    }

    /// Returns a copy with every `Z` bit replaced by `X`.
    pub fn z_to_x(&self) -> Self {
        let mut out = self.clone();
        out.bits.z_to_x();
        out
    }

    /// Returns a copy with every `X` and `Z` bit replaced by `0`.
    pub fn xz_to_0(&self) -> Self {
        let mut out = self.clone();
        out.bits.xz_to_0();
        out
    }

    /// Returns true if the value converts to `u32` without loss.
    pub fn is_u32(&self) -> bool {
        self.to_u32().is_ok()
    }

    /// Returns true if the value converts to `i32` without loss.
    pub fn is_i32(&self) -> bool {
        self.to_i32().is_ok()
    }

    /// Returns true if the value converts to a simulation time without loss.
    pub fn is_time(&self) -> bool {
        self.to_time().is_ok()
    }

    /// Converts to `u64`.
    ///
    /// Fails when the value has `X`/`Z` bits, is negative, or needs more
    /// than 64 bits.
    pub fn to_u64(&self) -> Result<u64, ConversionError> {
        if self.has_xz() {
            return Err(ConversionError::Indeterminate);
        }
        if self.is_negative() {
            return Err(ConversionError::Overflow { target: "u64" });
        }
        let words = self.bits.value_words();
        if words[1..].iter().any(|&w| w != 0) {
            return Err(ConversionError::Overflow { target: "u64" });
        }
        Ok(words[0])
    }

    /// Converts to `i64`, reading the bits as two's complement when signed.
    pub fn to_i64(&self) -> Result<i64, ConversionError> {
        if !self.attrs.signed {
            let v = self.to_u64().map_err(overflow_as("i64"))?;
            return i64::try_from(v).map_err(|_| ConversionError::Overflow { target: "i64" });
        }
        if self.has_xz() {
            return Err(ConversionError::Indeterminate);
        }
        let width = self.width();
        let words = self.bits.value_words();
        if width <= WORD_BITS {
            let shift = WORD_BITS - width;
            return Ok(((words[0] << shift) as i64) >> shift);
        }
        let negative = self.bits.msb() == Logic::One;
        let fill = if negative { u64::MAX } else { 0 };
        let last = words.len() - 1;
        let high_ok = words[1..].iter().enumerate().all(|(i, &w)| {
            let mask = if i + 1 == last {
                last_word_mask(width)
            } else {
                u64::MAX
            };
            w == fill & mask
        });
        let low = words[0] as i64;
        if !high_ok || (low < 0) != negative {
            return Err(ConversionError::Overflow { target: "i64" });
        }
        Ok(low)
    }

    /// Converts to `u32`.
    pub fn to_u32(&self) -> Result<u32, ConversionError> {
        let v = self.to_u64().map_err(overflow_as("u32"))?;
        u32::try_from(v).map_err(|_| ConversionError::Overflow { target: "u32" })
    }

    /// Converts to `i32`.
    pub fn to_i32(&self) -> Result<i32, ConversionError> {
        let v = self.to_i64().map_err(overflow_as("i32"))?;
        i32::try_from(v).map_err(|_| ConversionError::Overflow { target: "i32" })
    }

    /// Converts to a simulation time.
    pub fn to_time(&self) -> Result<SimTime, ConversionError> {
        self.to_u64().map(SimTime::from_u64)
    }

    /// Reduces the value to a scalar truth value.
    ///
    /// `One` if any bit is `1`, else `X` if any bit is `X` or `Z`, else `Zero`.
    pub fn to_logic(&self) -> Logic {
        let planes = &self.bits;
        if (0..planes.words()).any(|i| planes.one_word(i) != 0) {
            Logic::One
        } else if planes.has_xz() {
            Logic::X
        } else {
            Logic::Zero
        }
    }

    /// Returns true only if [`BitVector::to_logic`] is `One`.
    pub fn to_bool(&self) -> bool {
        self.to_logic() == Logic::One
    }

    /// Returns the least significant bit.
    pub fn to_scalar(&self) -> Logic {
        self.bits.get(0)
    }

    /// Converts to a real number. `X` and `Z` bits read as `0`.
    pub fn to_real(&self) -> f64 {
        let v = self.xz_to_0();
        if v.is_negative() {
            -magnitude(&v.negated_bits())
        } else {
            magnitude(&v.bits.value_words())
        }
    }

    /// Two's complement of the resolved bits, as value words.
    pub(crate) fn negated_bits(&self) -> Vec<u64> {
        let mut words: Vec<u64> = self.bits.value_words().iter().map(|w| !w).collect();
        for w in words.iter_mut() {
            let (sum, carry) = w.overflowing_add(1);
            *w = sum;
            if !carry {
                break;
            }
        }
        if let Some(last) = words.last_mut() {
            *last &= last_word_mask(self.width());
        }
        words
    }

    /// Packs the bits into bytes, most significant byte first.
    ///
    /// The width is rounded up to a multiple of 8 with leading zeros. Only
    /// resolved `1` bits are set.
    pub fn to_byte_string(&self) -> Vec<u8> {
        let words = self.bits.value_words();
        let count = self.width().div_ceil(8) as usize;
        (0..count)
            .rev()
            .map(|i| (words[i / 8] >> ((i % 8) * 8)) as u8)
            .collect()
    }
}

/// Reports an overflow against `target` instead of an intermediate type.
fn overflow_as(target: &'static str) -> impl Fn(ConversionError) -> ConversionError {
    move |err| match err {
        ConversionError::Overflow { .. } => ConversionError::Overflow { target },
        other => other,
    }
}

fn magnitude(words: &[u64]) -> f64 {
    words
        .iter()
        .rev()
        .fold(0.0, |acc, &w| acc * 18_446_744_073_709_551_616.0 + w as f64)
}

impl From<u32> for BitVector {
    /// A 32-bit, unsized, unsigned decimal value.
    fn from(value: u32) -> Self {
        Self::from_words(
            INTEGER_WIDTH,
            &[u64::from(value)],
            Attrs::new(false, false, Radix::Decimal),
        )
    }
}

impl From<i32> for BitVector {
    /// A 32-bit, unsized, signed decimal value.
    fn from(value: i32) -> Self {
        Self::from_words(
            INTEGER_WIDTH,
            &[u64::from(value as u32)],
            Attrs::new(false, true, Radix::Decimal),
        )
    }
}

impl From<bool> for BitVector {
    fn from(value: bool) -> Self {
        Self::filled(Logic::from_bool(value), 1)
    }
}

impl From<Logic> for BitVector {
    fn from(value: Logic) -> Self {
        Self::filled(value, 1)
    }
}

impl From<f64> for BitVector {
    /// Rounds to the nearest integer (ties away from zero) and stores it as a
    /// 32-bit, unsized, signed decimal value. Out-of-range inputs saturate.
    fn from(value: f64) -> Self {
        let rounded = value.round();
        if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&rounded) {
            log::warn!("real value {value} is outside the 32-bit integer range");
        }
        Self::from(rounded as i32)
    }
}

impl From<SimTime> for BitVector {
    /// A 64-bit, sized, unsigned decimal value.
    fn from(value: SimTime) -> Self {
        Self::from_words(
            TIME_WIDTH,
            &[value.as_u64()],
            Attrs::new(true, false, Radix::Decimal),
        )
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({})", self.verilog_string())
    }
}
