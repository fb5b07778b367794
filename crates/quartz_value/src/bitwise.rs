//! Bitwise, reduction, logical, merge and conditional operators.
//!
//! `Z` inputs are read as `X` before any gate-level combination.

use crate::attrs::{Attrs, Radix};
use crate::storage::Planes;
use crate::vector::BitVector;
use quartz_common::Logic;

/// Applies `op` word by word to the `Z`-normalized planes of both operands.
///
/// `op` receives `(a0, a1, b0, b1)` and returns the result `(plane0, plane1)`.
fn combine(
    a: &BitVector,
    b: &BitVector,
    op: impl Fn(u64, u64, u64, u64) -> (u64, u64),
) -> BitVector {
    let (x, y, attrs) = BitVector::harmonize(a, b, Radix::Binary);
    let xs = normalized(x.planes());
    let ys = normalized(y.planes());
    let mut out = x;
    out.set_attrs(attrs);
    let planes = out.planes_mut();
    for i in 0..planes.words() {
        let (p0, p1) = op(xs.plane0[i], xs.plane1[i], ys.plane0[i], ys.plane1[i]);
        planes.plane0[i] = p0;
        planes.plane1[i] = p1;
    }
    planes.trim();
    out
}

fn normalized(planes: &Planes) -> Planes {
    let mut p = planes.clone();
    p.z_to_x();
    p
}

pub(crate) fn bit_and(a: &BitVector, b: &BitVector) -> BitVector {
    combine(a, b, |a0, a1, b0, b1| (a0 | b0, a1 & b1))
}

pub(crate) fn bit_or(a: &BitVector, b: &BitVector) -> BitVector {
    combine(a, b, |a0, a1, b0, b1| (a0 & b0, a1 | b1))
}

pub(crate) fn bit_xor(a: &BitVector, b: &BitVector) -> BitVector {
    combine(a, b, |a0, a1, b0, b1| ((a0 & b0) | (a1 & b1), (a0 & b1) | (a1 & b0)))
}

impl BitVector {
    /// Bitwise complement. `X` and `Z` bits become `X`.
    pub fn bit_not(&self) -> BitVector {
        let mut out = self.clone();
        let planes = out.planes_mut();
        for i in 0..planes.words() {
            let z = planes.z_word(i);
            let (p0, p1) = (planes.plane0[i], planes.plane1[i]);
            planes.plane0[i] = p1 | z;
            planes.plane1[i] = p0 | z;
        }
        planes.trim();
        out
    }

    /// Bitwise exclusive NOR.
    pub fn xnor(&self, rhs: &BitVector) -> BitVector {
        combine(self, rhs, |a0, a1, b0, b1| {
            ((a0 & b1) | (a1 & b0), (a0 & b0) | (a1 & b1))
        })
    }

    /// AND of all bits: `0` if any bit is `0`, else `X` if any bit is
    /// unresolved, else `1`.
    pub fn reduce_and(&self) -> Logic {
        let p = self.planes();
        if (0..p.words()).any(|i| p.zero_word(i) != 0) {
            Logic::Zero
        } else if p.has_xz() {
            Logic::X
        } else {
            Logic::One
        }
    }

    /// OR of all bits: `1` if any bit is `1`, else `X` if any bit is
    /// unresolved, else `0`.
    pub fn reduce_or(&self) -> Logic {
        let p = self.planes();
        if (0..p.words()).any(|i| p.one_word(i) != 0) {
            Logic::One
        } else if p.has_xz() {
            Logic::X
        } else {
            Logic::Zero
        }
    }

    /// Parity of all bits, or `X` if any bit is unresolved.
    pub fn reduce_xor(&self) -> Logic {
        let p = self.planes();
        if p.has_xz() {
            return Logic::X;
        }
        let ones: u32 = (0..p.words()).map(|i| p.one_word(i).count_ones()).sum();
        Logic::from_bool(ones % 2 == 1)
    }

    /// Complement of [`BitVector::reduce_and`].
    pub fn reduce_nand(&self) -> Logic {
        !self.reduce_and()
    }

    /// Complement of [`BitVector::reduce_or`].
    pub fn reduce_nor(&self) -> Logic {
        !self.reduce_or()
    }

    /// Complement of [`BitVector::reduce_xor`].
    pub fn reduce_xnor(&self) -> Logic {
        !self.reduce_xor()
    }

    /// Logical negation of the value's truth.
    pub fn logical_not(&self) -> Logic {
        !self.to_logic()
    }

    /// Logical AND of the truth of both operands.
    pub fn logical_and(&self, rhs: &BitVector) -> Logic {
        self.to_logic() & rhs.to_logic()
    }

    /// Logical OR of the truth of both operands.
    pub fn logical_or(&self, rhs: &BitVector) -> Logic {
        self.to_logic() | rhs.to_logic()
    }

    /// Merges two values: bits that agree keep their value, the rest are `X`.
    ///
    /// `Z` bits never agree and always become `X`.
    pub fn merge(&self, rhs: &BitVector) -> BitVector {
        combine(self, rhs, |a0, a1, b0, b1| (a0 | b0, a1 | b1))
    }

    /// Selects `if_true` or `if_false` by the truth of `cond`.
    ///
    /// See [`BitVector::conditional_logic`].
    pub fn conditional(cond: &BitVector, if_true: &BitVector, if_false: &BitVector) -> BitVector {
        Self::conditional_logic(cond.to_logic(), if_true, if_false)
    }

    /// Selects `if_true` or `if_false` by a scalar condition.
    ///
    /// The result is as wide as the wider branch, sized if either branch is,
    /// and signed if both are. A resolved condition keeps the radix of the
    /// chosen branch. An unresolved condition merges both branches.
    pub fn conditional_logic(cond: Logic, if_true: &BitVector, if_false: &BitVector) -> BitVector {
        let width = if_true.width().max(if_false.width());
        let shape = if_true.attrs().promote(if_false.attrs(), Radix::Binary);
        let pick = |branch: &BitVector| {
            branch.with_attrs(
                width,
                Attrs {
                    radix: branch.radix(),
                    ..shape
                },
            )
        };
        match cond {
            Logic::One => pick(if_true),
            Logic::Zero => pick(if_false),
            Logic::X | Logic::Z => if_true.merge(if_false),
        }
    }
}

impl std::ops::Not for &BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        self.bit_not()
    }
}

impl std::ops::Not for BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        self.bit_not()
    }
}

forward_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, bit_and);
forward_binop!(BitOr, bitor, BitOrAssign, bitor_assign, bit_or);
forward_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, bit_xor);
