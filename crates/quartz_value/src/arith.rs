//! Two's-complement arithmetic: negate, add, subtract, multiply, divide,
//! modulo and power.
//!
//! Binary operators widen both operands to the larger width. The result is
//! signed only if both operands are signed, sized if either is sized, and
//! displays in decimal unless both operands share a radix. Any `X` or `Z`
//! operand bit makes the whole result `X`.

use crate::attrs::Radix;
use crate::storage::word_count;
use crate::vector::BitVector;
use std::cmp::Ordering;

impl BitVector {
    /// Returns the two's-complement negation at the same width.
    ///
    /// An operand with any `X`/`Z` bit yields all `X`.
    pub fn negate(&self) -> BitVector {
        if self.has_xz() {
            return BitVector::unknown(self.width(), self.attrs());
        }
        BitVector::from_words(self.width(), &self.negated_bits(), self.attrs())
    }

    /// Raises `self` to the power `exp`.
    ///
    /// With a signed negative exponent the result is `1` for a base of `1`,
    /// `±1` for a base of `-1` depending on the exponent's parity, `X` for a
    /// base of `0`, and `0` otherwise.
    pub fn pow(&self, exp: &BitVector) -> BitVector {
        let (base, exp, attrs) = BitVector::harmonize(self, exp, Radix::Decimal);
        let width = base.width();
        if base.has_xz() || exp.has_xz() {
            return BitVector::unknown(width, attrs);
        }
        let base_words = base.planes().value_words();
        let exp_words = exp.planes().value_words();

        if exp.is_negative() {
            let minus_one = BitVector::all_one(width).planes().value_words();
            let one = unit(width);
            if base_words == one {
                return BitVector::from_words(width, &one, attrs);
            }
            if attrs.signed && base_words == minus_one {
                let odd = exp_words[0] & 1 == 1;
                let words = if odd { minus_one } else { one };
                return BitVector::from_words(width, &words, attrs);
            }
            if is_zero(&base_words) {
                return BitVector::unknown(width, attrs);
            }
            return BitVector::from_words(width, &[], attrs);
        }

        if !attrs.signed && width > 1 && base_words == two(width) {
            let shifted = match exp.to_u32() {
                Ok(n) if n < width => {
                    BitVector::from_words(width, &unit(width), attrs).lshift_by(n)
                }
                _ => BitVector::from_words(width, &[], attrs),
            };
            return shifted;
        }

        let n = word_count(width);
        let mut result = unit(width);
        let mut square = base_words;
        let top = highest_set_bit(&exp_words);
        for bit in 0..top.map_or(0, |t| t + 1) {
            if (exp_words[bit / 64] >> (bit % 64)) & 1 == 1 {
                result = mul_words(&result, &square, n);
            }
            if Some(bit) != top {
                square = mul_words(&square, &square, n);
            }
        }
        BitVector::from_words(width, &result, attrs)
    }
}

pub(crate) fn add(a: &BitVector, b: &BitVector) -> BitVector {
    let (x, y, attrs) = BitVector::harmonize(a, b, Radix::Decimal);
    if x.has_xz() || y.has_xz() {
        return BitVector::unknown(x.width(), attrs);
    }
    let xs = x.planes().value_words();
    let ys = y.planes().value_words();
    let mut carry = false;
    let sum: Vec<u64> = xs
        .iter()
        .zip(&ys)
        .map(|(&p, &q)| {
            let (s1, c1) = p.overflowing_add(q);
            let (s2, c2) = s1.overflowing_add(u64::from(carry));
            carry = c1 || c2;
            s2
        })
        .collect();
    BitVector::from_words(x.width(), &sum, attrs)
}

pub(crate) fn sub(a: &BitVector, b: &BitVector) -> BitVector {
    let (x, y, attrs) = BitVector::harmonize(a, b, Radix::Decimal);
    if x.has_xz() || y.has_xz() {
        return BitVector::unknown(x.width(), attrs);
    }
    let mut diff = x.planes().value_words();
    sub_in_place(&mut diff, &y.planes().value_words());
    BitVector::from_words(x.width(), &diff, attrs)
}

pub(crate) fn mul(a: &BitVector, b: &BitVector) -> BitVector {
    let (x, y, attrs) = BitVector::harmonize(a, b, Radix::Decimal);
    let width = x.width();
    if x.has_xz() || y.has_xz() {
        return BitVector::unknown(width, attrs);
    }
    let (xm, x_neg) = magnitude(&x);
    let (ym, y_neg) = magnitude(&y);
    let product = BitVector::from_words(width, &mul_words(&xm, &ym, word_count(width)), attrs);
    if x_neg != y_neg {
        product.negate()
    } else {
        product
    }
}

pub(crate) fn div(a: &BitVector, b: &BitVector) -> BitVector {
    divide(a, b).0
}

pub(crate) fn rem(a: &BitVector, b: &BitVector) -> BitVector {
    divide(a, b).1
}

/// Restoring long division returning `(quotient, remainder)`.
///
/// The quotient is negative when exactly one operand is; the remainder
/// takes the sign of the dividend. A zero divisor yields `X` for both.
fn divide(a: &BitVector, b: &BitVector) -> (BitVector, BitVector) {
    let (x, y, attrs) = BitVector::harmonize(a, b, Radix::Decimal);
    let width = x.width();
    if x.has_xz() || y.has_xz() {
        let x = BitVector::unknown(width, attrs);
        return (x.clone(), x);
    }
    let (dividend, x_neg) = magnitude(&x);
    let (divisor, y_neg) = magnitude(&y);
    if is_zero(&divisor) {
        log::debug!("division of {width}-bit value by zero yields X");
        let x = BitVector::unknown(width, attrs);
        return (x.clone(), x);
    }

    let n = word_count(width);
    let mut quotient = vec![0u64; n];
    let mut remainder = vec![0u64; n + 1];
    for bit in (0..width as usize).rev() {
        shl1(&mut remainder);
        remainder[0] |= (dividend[bit / 64] >> (bit % 64)) & 1;
        if compare_words(&remainder, &divisor) != Ordering::Less {
            sub_in_place(&mut remainder, &divisor);
            quotient[bit / 64] |= 1 << (bit % 64);
        }
    }

    let q = BitVector::from_words(width, &quotient, attrs);
    let r = BitVector::from_words(width, &remainder, attrs);
    let q = if x_neg != y_neg { q.negate() } else { q };
    let r = if x_neg { r.negate() } else { r };
    (q, r)
}

/// Returns the unsigned magnitude words and whether the value was negative.
fn magnitude(v: &BitVector) -> (Vec<u64>, bool) {
    if v.is_negative() {
        (v.negated_bits(), true)
    } else {
        (v.planes().value_words(), false)
    }
}

/// Multiplies two little-endian numbers, keeping the low `n` words.
fn mul_words(a: &[u64], b: &[u64], n: usize) -> Vec<u64> {
    let mut out = vec![0u64; n];
    for (i, &ai) in a.iter().enumerate().take(n) {
        if ai == 0 {
            continue;
        }
        let mut carry = 0u128;
        for (j, &bj) in b.iter().enumerate().take(n - i) {
            let t = u128::from(out[i + j]) + u128::from(ai) * u128::from(bj) + carry;
            out[i + j] = t as u64;
            carry = t >> 64;
        }
    }
    out
}

/// `a -= b` with borrow; `b` may be shorter than `a`.
fn sub_in_place(a: &mut [u64], b: &[u64]) {
    let mut borrow = false;
    for (i, w) in a.iter_mut().enumerate() {
        let rhs = b.get(i).copied().unwrap_or(0);
        let (d1, b1) = w.overflowing_sub(rhs);
        let (d2, b2) = d1.overflowing_sub(u64::from(borrow));
        *w = d2;
        borrow = b1 || b2;
    }
}

fn shl1(words: &mut [u64]) {
    let mut carry = 0;
    for w in words.iter_mut() {
        let next = *w >> 63;
        *w = (*w << 1) | carry;
        carry = next;
    }
}

/// Compares two little-endian numbers of possibly different lengths.
fn compare_words(a: &[u64], b: &[u64]) -> Ordering {
    let n = a.len().max(b.len());
    for i in (0..n).rev() {
        let p = a.get(i).copied().unwrap_or(0);
        let q = b.get(i).copied().unwrap_or(0);
        match p.cmp(&q) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

fn is_zero(words: &[u64]) -> bool {
    words.iter().all(|&w| w == 0)
}

fn highest_set_bit(words: &[u64]) -> Option<usize> {
    words
        .iter()
        .enumerate()
        .rev()
        .find(|(_, &w)| w != 0)
        .map(|(i, &w)| i * 64 + 63 - w.leading_zeros() as usize)
}

fn unit(width: u32) -> Vec<u64> {
    let mut words = vec![0u64; word_count(width)];
    words[0] = 1;
    words
}

fn two(width: u32) -> Vec<u64> {
    let mut words = vec![0u64; word_count(width)];
    words[0] = 2;
    words
}

impl std::ops::Neg for &BitVector {
    type Output = BitVector;

    fn neg(self) -> BitVector {
        self.negate()
    }
}

impl std::ops::Neg for BitVector {
    type Output = BitVector;

    fn neg(self) -> BitVector {
        self.negate()
    }
}

forward_binop!(Add, add, AddAssign, add_assign, add);
forward_binop!(Sub, sub, SubAssign, sub_assign, sub);
forward_binop!(Mul, mul, MulAssign, mul_assign, mul);
forward_binop!(Div, div, DivAssign, div_assign, div);
forward_binop!(Rem, rem, RemAssign, rem_assign, rem);
