//! Four-state scalar logic values and their two-plane bit encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single four-state logic value.
///
/// The four states represent:
/// - `Zero`: resolved logic low
/// - `One`: resolved logic high
/// - `X`: unknown (indeterminate) value
/// - `Z`: high-impedance (undriven) value
///
/// Inside a bit vector each state is stored as one bit in each of two planes.
/// [`Logic::planes`] and [`Logic::from_planes`] convert between the two forms:
///
/// ```text
/// plane0 plane1  state
///   1      0     0
///   0      1     1
///   1      1     X
///   0      0     Z
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Logic low (0).
    #[default]
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown.
    X = 2,
    /// High-impedance.
    Z = 3,
}

impl Logic {
    /// Converts a literal digit character to a [`Logic`] value.
    ///
    /// Accepts '0', '1', 'x'/'X', and 'z'/'Z'/'?'.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' => Some(Logic::X),
            'z' | 'Z' | '?' => Some(Logic::Z),
            _ => None,
        }
    }

    /// Returns the upper-case display character for this value.
    pub fn to_char(self) -> char {
        match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'X',
            Logic::Z => 'Z',
        }
    }

    /// Converts a boolean to a resolved logic value.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }

    /// Returns `Some(bool)` for resolved values and `None` for X or Z.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Logic::Zero => Some(false),
            Logic::One => Some(true),
            Logic::X | Logic::Z => None,
        }
    }

    /// Returns true for `Zero` and `One`.
    pub fn is_known(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }

    /// Decodes a value from its `(plane0, plane1)` bit pair.
    pub fn from_planes(plane0: bool, plane1: bool) -> Self {
        match (plane0, plane1) {
            (true, false) => Logic::Zero,
            (false, true) => Logic::One,
            (true, true) => Logic::X,
            (false, false) => Logic::Z,
        }
    }

    /// Encodes this value as its `(plane0, plane1)` bit pair.
    pub fn planes(self) -> (bool, bool) {
        match self {
            Logic::Zero => (true, false),
            Logic::One => (false, true),
            Logic::X => (true, true),
            Logic::Z => (false, false),
        }
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        Logic::from_bool(value)
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// AND truth table:
/// ```text
///     0  1  X  Z
/// 0 | 0  0  0  0
/// 1 | 0  1  X  X
/// X | 0  X  X  X
/// Z | 0  X  X  X
/// ```
impl BitAnd for Logic {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Zero, _) | (_, Zero) => Zero,
            (One, One) => One,
            _ => X,
        }
    }
}

/// OR truth table:
/// ```text
///     0  1  X  Z
/// 0 | 0  1  X  X
/// 1 | 1  1  1  1
/// X | X  1  X  X
/// Z | X  1  X  X
/// ```
impl BitOr for Logic {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (One, _) | (_, One) => One,
            (Zero, Zero) => Zero,
            _ => X,
        }
    }
}

/// XOR truth table: any X or Z operand yields X.
impl BitXor for Logic {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Zero, Zero) | (One, One) => Zero,
            (Zero, One) | (One, Zero) => One,
            _ => X,
        }
    }
}

/// NOT: `!0 = 1`, `!1 = 0`, `!X = X`, `!Z = X`
impl Not for Logic {
    type Output = Self;

    fn not(self) -> Self {
        use Logic::*;
        match self {
            Zero => One,
            One => Zero,
            X | Z => X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Logic;
    use super::Logic::*;

    #[test]
    fn and_truth_table() {
        assert_eq!(Zero & X, Zero);
        assert_eq!(Z & Zero, Zero);
        assert_eq!(One & One, One);
        assert_eq!(One & X, X);
        assert_eq!(One & Z, X);
        assert_eq!(Z & Z, X);
    }

    #[test]
    fn or_truth_table() {
        assert_eq!(One | X, One);
        assert_eq!(Z | One, One);
        assert_eq!(Zero | Zero, Zero);
        assert_eq!(Zero | Z, X);
        assert_eq!(X | X, X);
    }

    #[test]
    fn xor_truth_table() {
        assert_eq!(Zero ^ One, One);
        assert_eq!(One ^ One, Zero);
        assert_eq!(One ^ X, X);
        assert_eq!(Z ^ Zero, X);
    }

    #[test]
    fn not_values() {
        assert_eq!(!Zero, One);
        assert_eq!(!One, Zero);
        assert_eq!(!X, X);
        assert_eq!(!Z, X);
    }

    #[test]
    fn plane_encoding_roundtrip() {
        for v in [Zero, One, X, Z] {
            let (p0, p1) = v.planes();
            assert_eq!(Logic::from_planes(p0, p1), v);
        }
        assert_eq!(Zero.planes(), (true, false));
        assert_eq!(Z.planes(), (false, false));
    }

    #[test]
    fn from_char_accepts_question_mark_as_z() {
        assert_eq!(Logic::from_char('?'), Some(Z));
        assert_eq!(Logic::from_char('x'), Some(X));
        assert_eq!(Logic::from_char('Z'), Some(Z));
        assert_eq!(Logic::from_char('2'), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{Zero}{One}{X}{Z}"), "01XZ");
    }

    #[test]
    fn bool_conversions() {
        assert_eq!(Logic::from(true), One);
        assert_eq!(Zero.to_bool(), Some(false));
        assert_eq!(X.to_bool(), None);
        assert!(One.is_known());
        assert!(!Z.is_known());
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&X).unwrap();
        let back: Logic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, X);
    }
}
