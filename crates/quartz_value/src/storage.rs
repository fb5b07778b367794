//! Word-packed two-plane storage for four-state bits.
//!
//! Every bit is held as one bit in `plane0` and one bit in `plane1`:
//!
//! ```text
//! plane0 plane1  state
//!   1      0     0
//!   0      1     1
//!   1      1     X
//!   0      0     Z
//! ```
//!
//! Bits above the width in the last word are kept at raw zero in both planes,
//! so two stores holding the same four-state bits are structurally equal.

use quartz_common::Logic;
use serde::{Deserialize, Serialize};

/// Number of bits held in one storage word.
pub const WORD_BITS: u32 = 64;

/// Returns the number of words needed to hold `width` bits.
pub fn word_count(width: u32) -> usize {
    width.div_ceil(WORD_BITS) as usize
}

/// Returns the number of valid bits in the last word of a `width`-bit store.
///
/// The result is in `1..=WORD_BITS` for any `width >= 1`.
pub fn last_word_shift(width: u32) -> u32 {
    match width % WORD_BITS {
        0 => WORD_BITS,
        r => r,
    }
}

/// Returns the mask selecting the valid bits of the last word.
pub fn last_word_mask(width: u32) -> u64 {
    match last_word_shift(width) {
        WORD_BITS => u64::MAX,
        s => (1u64 << s) - 1,
    }
}

/// Returns the mask selecting the valid bits of word `index`.
pub(crate) fn word_mask(width: u32, index: usize) -> u64 {
    if index + 1 == word_count(width) {
        last_word_mask(width)
    } else {
        u64::MAX
    }
}

/// Expands a scalar into its full-word `(plane0, plane1)` pattern.
pub(crate) fn fill_words(value: Logic) -> (u64, u64) {
    let (p0, p1) = value.planes();
    (
        if p0 { u64::MAX } else { 0 },
        if p1 { u64::MAX } else { 0 },
    )
}

/// The two bit planes of a four-state vector.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPlanes")]
pub(crate) struct Planes {
    width: u32,
    pub(crate) plane0: Vec<u64>,
    pub(crate) plane1: Vec<u64>,
}

/// Serialized form of [`Planes`], checked before use.
#[derive(Deserialize)]
struct RawPlanes {
    width: u32,
    plane0: Vec<u64>,
    plane1: Vec<u64>,
}

impl TryFrom<RawPlanes> for Planes {
    type Error = String;

    fn try_from(raw: RawPlanes) -> Result<Self, Self::Error> {
        if raw.width == 0 {
            return Err("bit vector width must be at least 1".to_string());
        }
        let n = word_count(raw.width);
        if raw.plane0.len() != n || raw.plane1.len() != n {
            return Err(format!(
                "width {} needs {n} words per plane, found {} and {}",
                raw.width,
                raw.plane0.len(),
                raw.plane1.len()
            ));
        }
        let mut planes = Self {
            width: raw.width,
            plane0: raw.plane0,
            plane1: raw.plane1,
        };
        planes.trim();
        Ok(planes)
    }
}

impl Planes {
    /// Creates a store of `width` bits, every bit set to `value`.
    pub(crate) fn filled(width: u32, value: Logic) -> Self {
        let width = width.max(1);
        let n = word_count(width);
        let (w0, w1) = fill_words(value);
        let mut planes = Self {
            width,
            plane0: vec![w0; n],
            plane1: vec![w1; n],
        };
        planes.trim();
        planes
    }

    /// Creates a resolved store from little-endian value words.
    ///
    /// Missing high words read as zero and extra words are ignored.
    pub(crate) fn from_words(width: u32, words: &[u64]) -> Self {
        let width = width.max(1);
        let n = word_count(width);
        let mut planes = Self {
            width,
            plane0: Vec::with_capacity(n),
            plane1: Vec::with_capacity(n),
        };
        for i in 0..n {
            let w = words.get(i).copied().unwrap_or(0);
            planes.plane0.push(!w);
            planes.plane1.push(w);
        }
        planes.trim();
        planes
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn words(&self) -> usize {
        self.plane0.len()
    }

    /// Reallocates both planes for `width` bits.
    ///
    /// Old contents are not preserved; the new store reads all `0`.
    pub(crate) fn resize(&mut self, width: u32) {
        *self = Self::filled(width, Logic::Zero);
    }

    /// Clears the padding above the width in both planes.
    pub(crate) fn trim(&mut self) {
        let mask = last_word_mask(self.width);
        if let Some(w) = self.plane0.last_mut() {
            *w &= mask;
        }
        if let Some(w) = self.plane1.last_mut() {
            *w &= mask;
        }
    }

    pub(crate) fn mask(&self, index: usize) -> u64 {
        word_mask(self.width, index)
    }

    pub(crate) fn get(&self, index: u32) -> Logic {
        debug_assert!(index < self.width);
        let word = (index / WORD_BITS) as usize;
        let bit = index % WORD_BITS;
        Logic::from_planes(
            (self.plane0[word] >> bit) & 1 != 0,
            (self.plane1[word] >> bit) & 1 != 0,
        )
    }

    pub(crate) fn set(&mut self, index: u32, value: Logic) {
        debug_assert!(index < self.width);
        let word = (index / WORD_BITS) as usize;
        let bit = 1u64 << (index % WORD_BITS);
        let (p0, p1) = value.planes();
        if p0 {
            self.plane0[word] |= bit;
        } else {
            self.plane0[word] &= !bit;
        }
        if p1 {
            self.plane1[word] |= bit;
        } else {
            self.plane1[word] &= !bit;
        }
    }

    /// Returns the most significant bit.
    pub(crate) fn msb(&self) -> Logic {
        self.get(self.width - 1)
    }

    /// Bits of word `index` that are a resolved `0`.
    pub(crate) fn zero_word(&self, index: usize) -> u64 {
        self.plane0[index] & !self.plane1[index]
    }

    /// Bits of word `index` that are a resolved `1`.
    pub(crate) fn one_word(&self, index: usize) -> u64 {
        !self.plane0[index] & self.plane1[index]
    }

    /// Bits of word `index` that are `X`.
    pub(crate) fn x_word(&self, index: usize) -> u64 {
        self.plane0[index] & self.plane1[index]
    }

    /// Bits of word `index` that are `Z`.
    pub(crate) fn z_word(&self, index: usize) -> u64 {
        !self.plane0[index] & !self.plane1[index] & self.mask(index)
    }

    /// Bits of word `index` that are `X` or `Z`.
    pub(crate) fn xz_word(&self, index: usize) -> u64 {
        !(self.plane0[index] ^ self.plane1[index]) & self.mask(index)
    }

    pub(crate) fn has_x(&self) -> bool {
        (0..self.words()).any(|i| self.x_word(i) != 0)
    }

    pub(crate) fn has_z(&self) -> bool {
        (0..self.words()).any(|i| self.z_word(i) != 0)
    }

    pub(crate) fn has_xz(&self) -> bool {
        (0..self.words()).any(|i| self.xz_word(i) != 0)
    }

    /// Rewrites every `Z` bit as `X`.
    pub(crate) fn z_to_x(&mut self) {
        for i in 0..self.words() {
            let z = self.z_word(i);
            self.plane0[i] |= z;
            self.plane1[i] |= z;
        }
    }

    /// Rewrites every `X` and `Z` bit as `0`.
    pub(crate) fn xz_to_0(&mut self) {
        for i in 0..self.words() {
            let xz = self.xz_word(i);
            self.plane0[i] |= xz;
            self.plane1[i] &= !xz;
        }
    }

    /// Returns the resolved-1 bits of every word, little-endian.
    ///
    /// For a store without `X`/`Z` bits this is its unsigned numeric value.
    pub(crate) fn value_words(&self) -> Vec<u64> {
        (0..self.words()).map(|i| self.one_word(i)).collect()
    }
}
