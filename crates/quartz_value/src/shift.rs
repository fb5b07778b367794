//! Logical and arithmetic shifts.
//!
//! The result keeps the width and attributes of the shifted value. A
//! dynamic shift amount is read at its own width as an unsigned number.

use crate::storage::{fill_words, Planes, WORD_BITS};
use crate::vector::BitVector;
use quartz_common::Logic;

/// Reads a shift amount, or `None` when it has `X`/`Z` bits or does not
/// fit a `u32`.
fn shift_amount(amount: &BitVector) -> Option<u32> {
    let mut unsigned = amount.clone();
    unsigned.set_signed(false);
    match unsigned.to_u32() {
        Ok(n) => Some(n),
        Err(err) => {
            log::debug!("shift amount {amount:?} is unusable ({err}); result is X");
            None
        }
    }
}

fn word_at(words: &[u64], index: isize, fill: u64) -> u64 {
    usize::try_from(index)
        .ok()
        .and_then(|i| words.get(i).copied())
        .unwrap_or(fill)
}

/// Shifts one plane towards the MSB, shifting `fill` in at the bottom.
fn plane_left(words: &[u64], n: u32, fill: u64) -> Vec<u64> {
    let ws = (n / WORD_BITS) as isize;
    let bs = n % WORD_BITS;
    (0..words.len() as isize)
        .map(|i| {
            let lo = word_at(words, i - ws, fill);
            if bs == 0 {
                lo
            } else {
                (lo << bs) | (word_at(words, i - ws - 1, fill) >> (WORD_BITS - bs))
            }
        })
        .collect()
}

/// Shifts one plane towards the LSB, shifting `fill` in at the top.
fn plane_right(words: &[u64], n: u32, fill: u64) -> Vec<u64> {
    let ws = (n / WORD_BITS) as isize;
    let bs = n % WORD_BITS;
    (0..words.len() as isize)
        .map(|i| {
            let lo = word_at(words, i + ws, fill);
            if bs == 0 {
                lo
            } else {
                (lo >> bs) | (word_at(words, i + ws + 1, fill) << (WORD_BITS - bs))
            }
        })
        .collect()
}

impl BitVector {
    fn shifted(&self, n: u32, fill: Logic, left: bool) -> BitVector {
        let width = self.width();
        if n == 0 {
            return self.clone();
        }
        if n >= width {
            let mut out = BitVector::filled(fill, width);
            out.set_attrs(self.attrs());
            return out;
        }
        let (f0, f1) = fill_words(fill);
        let mut src: Planes = self.planes().clone();
        if !left {
            // Padding reads as fill so it shifts into the top bits.
            let last = src.words() - 1;
            let mask = src.mask(last);
            src.plane0[last] |= f0 & !mask;
            src.plane1[last] |= f1 & !mask;
        }
        let mut out = self.clone();
        let planes = out.planes_mut();
        if left {
            planes.plane0 = plane_left(&src.plane0, n, f0);
            planes.plane1 = plane_left(&src.plane1, n, f1);
        } else {
            planes.plane0 = plane_right(&src.plane0, n, f0);
            planes.plane1 = plane_right(&src.plane1, n, f1);
        }
        planes.trim();
        out
    }

    /// Logical left shift by a fixed amount.
    pub fn lshift_by(&self, n: u32) -> BitVector {
        self.shifted(n, Logic::Zero, true)
    }

    /// Logical right shift by a fixed amount.
    pub fn rshift_by(&self, n: u32) -> BitVector {
        self.shifted(n, Logic::Zero, false)
    }

    /// Arithmetic left shift by a fixed amount; same as a logical left shift.
    pub fn alshift_by(&self, n: u32) -> BitVector {
        self.lshift_by(n)
    }

    /// Arithmetic right shift by a fixed amount.
    ///
    /// Signed values fill with their most significant bit, including `X`
    /// and `Z`. Unsigned values fill with `0`.
    pub fn arshift_by(&self, n: u32) -> BitVector {
        let fill = if self.is_signed() {
            self.planes().msb()
        } else {
            Logic::Zero
        };
        self.shifted(n, fill, false)
    }

    fn dynamic_shift(&self, amount: &BitVector, op: fn(&BitVector, u32) -> BitVector) -> BitVector {
        match shift_amount(amount) {
            Some(n) => op(self, n),
            None => BitVector::unknown(self.width(), self.attrs()),
        }
    }

    /// Logical left shift (`<<`). An unknown or oversized amount yields `X`.
    pub fn lshift(&self, amount: &BitVector) -> BitVector {
        self.dynamic_shift(amount, BitVector::lshift_by)
    }

    /// Logical right shift (`>>`).
    pub fn rshift(&self, amount: &BitVector) -> BitVector {
        self.dynamic_shift(amount, BitVector::rshift_by)
    }

    /// Arithmetic left shift (`<<<`).
    pub fn alshift(&self, amount: &BitVector) -> BitVector {
        self.dynamic_shift(amount, BitVector::alshift_by)
    }

    /// Arithmetic right shift (`>>>`).
    pub fn arshift(&self, amount: &BitVector) -> BitVector {
        self.dynamic_shift(amount, BitVector::arshift_by)
    }
}

impl std::ops::Shl<u32> for &BitVector {
    type Output = BitVector;

    fn shl(self, n: u32) -> BitVector {
        self.lshift_by(n)
    }
}

impl std::ops::Shl<u32> for BitVector {
    type Output = BitVector;

    fn shl(self, n: u32) -> BitVector {
        self.lshift_by(n)
    }
}

impl std::ops::Shr<u32> for &BitVector {
    type Output = BitVector;

    fn shr(self, n: u32) -> BitVector {
        self.rshift_by(n)
    }
}

impl std::ops::Shr<u32> for BitVector {
    type Output = BitVector;

    fn shr(self, n: u32) -> BitVector {
        self.rshift_by(n)
    }
}

impl std::ops::ShlAssign<u32> for BitVector {
    fn shl_assign(&mut self, n: u32) {
        *self = self.lshift_by(n);
    }
}

impl std::ops::ShrAssign<u32> for BitVector {
    fn shr_assign(&mut self, n: u32) {
        *self = self.rshift_by(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    fn bits(v: &BitVector) -> String {
        (0..v.width() as i32)
            .rev()
            .map(|i| v.value(i).to_char())
            .collect()
    }

    #[test]
    fn logical_shifts() {
        let v = lit("8'b1001_x01z");
        assert_eq!(bits(&(&v << 2)), "01X01Z00");
        assert_eq!(bits(&(&v >> 3)), "0001001X");
        assert_eq!(bits(&(&v << 0)), bits(&v));
    }

    #[test]
    fn shift_by_width_or_more() {
        let v = lit("8'hFF");
        assert_eq!(bits(&(&v << 8)), "00000000");
        assert_eq!(bits(&(&v >> 100)), "00000000");
        let s = lit("8'shF0");
        assert_eq!(bits(&s.arshift_by(8)), "11111111");
    }

    #[test]
    fn arithmetic_right_shift() {
        let s = lit("8'sb1000_0000");
        assert_eq!(bits(&s.arshift_by(3)), "11110000");
        let u = lit("8'b1000_0000");
        assert_eq!(bits(&u.arshift_by(3)), "00010000");
        let x = lit("4'sbx010");
        assert_eq!(bits(&x.arshift_by(2)), "XXX0");
        assert_eq!(bits(&s.alshift_by(1)), "00000000");
    }

    #[test]
    fn wide_shifts_cross_words() {
        let mut v = BitVector::all_zero(130);
        v.set_value(0, Logic::One);
        let l = v.lshift_by(129);
        assert_eq!(l.value(129), Logic::One);
        assert_eq!(l.value(0), Logic::Zero);
        let r = l.rshift_by(65);
        assert_eq!(r.value(64), Logic::One);
        assert!(!r.has_xz());
        let mut s = BitVector::all_zero(130);
        s.set_signed(true);
        s.set_value(129, Logic::One);
        let a = s.arshift_by(70);
        assert!((59..130).all(|i| a.value(i) == Logic::One));
        assert_eq!(a.value(58), Logic::Zero);
    }

    #[test]
    fn dynamic_amounts() {
        let v = lit("4'b0011");
        assert_eq!(bits(&v.lshift(&lit("2'd2"))), "1100");
        assert_eq!(bits(&v.rshift(&lit("3'd1"))), "0001");
        let neg = lit("4'sb1111");
        assert_eq!(bits(&v.lshift(&neg)), "0000");
    }

    #[test]
    fn unknown_amount_is_x() {
        let v = lit("8'sh7F");
        let r = v.arshift(&lit("4'b00x1"));
        assert_eq!(r.width(), 8);
        assert!(r.is_signed());
        assert_eq!(bits(&r), "XXXXXXXX");
        let mut big = BitVector::all_zero(40);
        big.set_value(35, Logic::One);
        assert_eq!(bits(&v.lshift(&big)), "XXXXXXXX");
    }

    #[test]
    fn assign_forms() {
        let mut v = lit("4'b0001");
        v <<= 3;
        assert_eq!(bits(&v), "1000");
        v >>= 2;
        assert_eq!(bits(&v), "0010");
    }
}
