//! Relational and equality comparisons.
//!
//! Operands are widened to the larger width first; they compare as signed
//! numbers only when both are signed.

use crate::attrs::Radix;
use crate::vector::BitVector;
use quartz_common::Logic;
use std::cmp::Ordering;

/// Orders two resolved operands of equal width and signedness.
fn order_resolved(a: &BitVector, b: &BitVector) -> Ordering {
    if a.is_signed() {
        match (a.is_negative(), b.is_negative()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            // Same-sign two's-complement values order like their raw bits.
            _ => {}
        }
    }
    let pa = a.planes();
    let pb = b.planes();
    for i in (0..pa.words()).rev() {
        match pa.one_word(i).cmp(&pb.one_word(i)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl BitVector {
    fn ordered(&self, rhs: &BitVector, test: fn(Ordering) -> bool) -> Logic {
        let (a, b, _) = BitVector::harmonize(self, rhs, Radix::Binary);
        if a.has_xz() || b.has_xz() {
            return Logic::X;
        }
        Logic::from_bool(test(order_resolved(&a, &b)))
    }

    /// `self < rhs`, or `X` if either operand has `X`/`Z` bits.
    pub fn lt_logic(&self, rhs: &BitVector) -> Logic {
        self.ordered(rhs, Ordering::is_lt)
    }

    /// `self <= rhs`, or `X` if either operand has `X`/`Z` bits.
    pub fn le_logic(&self, rhs: &BitVector) -> Logic {
        self.ordered(rhs, Ordering::is_le)
    }

    /// `self > rhs`, or `X` if either operand has `X`/`Z` bits.
    pub fn gt_logic(&self, rhs: &BitVector) -> Logic {
        self.ordered(rhs, Ordering::is_gt)
    }

    /// `self >= rhs`, or `X` if either operand has `X`/`Z` bits.
    pub fn ge_logic(&self, rhs: &BitVector) -> Logic {
        self.ordered(rhs, Ordering::is_ge)
    }

    /// Logical equality (`==`), or `X` if either operand has `X`/`Z` bits.
    pub fn eq_logic(&self, rhs: &BitVector) -> Logic {
        self.ordered(rhs, Ordering::is_eq)
    }

    /// Logical inequality (`!=`), or `X` if either operand has `X`/`Z` bits.
    pub fn ne_logic(&self, rhs: &BitVector) -> Logic {
        self.ordered(rhs, Ordering::is_ne)
    }

    /// Case equality (`===`): every bit matches exactly, `X` and `Z` included.
    pub fn eq_exact(&self, rhs: &BitVector) -> bool {
        self.eq_masked(rhs, |_, _, _| 0)
    }

    /// Case inequality (`!==`).
    pub fn ne_exact(&self, rhs: &BitVector) -> bool {
        !self.eq_exact(rhs)
    }

    /// Equality where an `X` bit on either side matches anything.
    ///
    /// `Z` bits must match exactly.
    pub fn eq_with_x(&self, rhs: &BitVector) -> bool {
        self.eq_masked(rhs, |a, b, i| a.planes().x_word(i) | b.planes().x_word(i))
    }

    /// Equality where an `X` or `Z` bit on either side matches anything.
    pub fn eq_with_xz(&self, rhs: &BitVector) -> bool {
        self.eq_masked(rhs, |a, b, i| a.planes().xz_word(i) | b.planes().xz_word(i))
    }

    /// Compares plane by plane, ignoring the bits selected by `wildcard`.
    fn eq_masked(
        &self,
        rhs: &BitVector,
        wildcard: impl Fn(&BitVector, &BitVector, usize) -> u64,
    ) -> bool {
        let (a, b, _) = BitVector::harmonize(self, rhs, Radix::Binary);
        let (pa, pb) = (a.planes(), b.planes());
        (0..pa.words()).all(|i| {
            let diff = (pa.plane0[i] ^ pb.plane0[i]) | (pa.plane1[i] ^ pb.plane1[i]);
            diff & !wildcard(&a, &b, i) == 0
        })
    }
}

impl PartialEq for BitVector {
    /// Logical equality: false whenever either side has `X`/`Z` bits.
    fn eq(&self, other: &Self) -> bool {
        self.eq_logic(other) == Logic::One
    }
}

impl PartialOrd for BitVector {
    /// Numeric ordering, or `None` when either side has `X`/`Z` bits.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (a, b, _) = BitVector::harmonize(self, other, Radix::Binary);
        if a.has_xz() || b.has_xz() {
            return None;
        }
        Some(order_resolved(&a, &b))
    }
}
