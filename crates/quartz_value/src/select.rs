//! Bit-select, part-select, concatenation and replication.
//!
//! Reads outside the vector return `X` bits and writes outside it are
//! dropped; neither is an error.

use crate::attrs::Attrs;
use crate::vector::BitVector;
use quartz_common::Logic;

/// Direction of an indexed part-select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartSelectDir {
    /// `[base +: width]`: `base` is the LSB, the range extends upward.
    Plus,
    /// `[base -: width]`: `base` is the MSB, the range extends downward.
    Minus,
}

/// Reads an index operand, or `None` when it has `X`/`Z` bits or does not
/// fit an `i64`.
fn index_of(index: &BitVector) -> Option<i64> {
    index.to_i64().ok()
}

impl BitVector {
    fn bit_at(&self, pos: i64) -> Logic {
        match i32::try_from(pos) {
            Ok(p) => self.value(p),
            Err(_) => Logic::X,
        }
    }

    fn set_bit_at(&mut self, pos: i64, value: Logic) {
        if let Ok(p) = i32::try_from(pos) {
            self.set_value(p, value);
        }
    }

    /// Positions in `[lsb, lsb + width)` that fall inside the vector.
    fn overlap(&self, lsb: i64, width: u32) -> std::ops::Range<i64> {
        let start = lsb.max(0);
        let end = (lsb + i64::from(width)).min(i64::from(self.width()));
        start..end.max(start)
    }

    fn read_range(&self, lsb: i64, width: u32) -> BitVector {
        let mut out = BitVector::all_x(width);
        for pos in self.overlap(lsb, width) {
            out.set_bit_at(pos - lsb, self.bit_at(pos));
        }
        out
    }

    /// Writes `value`, resized to `width` bits, at `lsb`.
    ///
    /// Only the bits that land inside the vector are computed. Bits of the
    /// resized value above `value.width()` all equal its extension bit.
    fn write_range(&mut self, lsb: i64, width: u32, value: &BitVector) {
        let src = value.with_attrs(
            width.min(value.width().saturating_add(1)),
            Attrs {
                sized: true,
                ..value.attrs()
            },
        );
        let top = i64::from(src.width()) - 1;
        for pos in self.overlap(lsb, width) {
            let bit = src.bit_at((pos - lsb).min(top));
            self.set_bit_at(pos, bit);
        }
    }

    /// Reads the bit at a dynamic index. An `X`/`Z` index reads `X`.
    pub fn bit_select(&self, index: &BitVector) -> Logic {
        match index_of(index) {
            Some(pos) => self.bit_at(pos),
            None => Logic::X,
        }
    }

    /// Writes the bit at a dynamic index. An `X`/`Z` index writes nothing.
    pub fn set_bit_select(&mut self, index: &BitVector, value: Logic) {
        if let Some(pos) = index_of(index) {
            self.set_bit_at(pos, value);
        }
    }

    /// Reads bits `[msb:lsb]`.
    ///
    /// The result is sized, unsigned and binary, `|msb - lsb| + 1` bits wide.
    /// A reversed range (`msb < lsb`) reads all `X`. A range wider than
    /// `i32::MAX` bits cannot be addressed and yields a single `X` bit.
    pub fn part_select(&self, msb: i32, lsb: i32) -> BitVector {
        let Some(width) = range_width(msb, lsb).filter(|&w| w <= i32::MAX as u32) else {
            log::warn!("part-select [{msb}:{lsb}] is too wide; result is X");
            return BitVector::all_x(1);
        };
        if msb < lsb {
            return BitVector::all_x(width);
        }
        self.read_range(i64::from(lsb), width)
    }

    /// Writes `value` into bits `[msb:lsb]`.
    ///
    /// `value` is first resized to the range width. A reversed range is
    /// ignored.
    pub fn set_part_select(&mut self, msb: i32, lsb: i32, value: &BitVector) {
        if msb < lsb {
            return;
        }
        if let Some(width) = range_width(msb, lsb) {
            self.write_range(i64::from(lsb), width, value);
        }
    }

    /// Reads an indexed part-select `[base +: width]` or `[base -: width]`.
    ///
    /// An `X`/`Z` base reads all `X`.
    pub fn part_select_indexed(
        &self,
        base: &BitVector,
        width: u32,
        dir: PartSelectDir,
    ) -> BitVector {
        let width = width.max(1);
        match index_of(base) {
            Some(base) => self.read_range(indexed_lsb(base, width, dir), width),
            None => BitVector::all_x(width),
        }
    }

    /// Writes an indexed part-select. An `X`/`Z` base writes nothing.
    pub fn set_part_select_indexed(
        &mut self,
        base: &BitVector,
        width: u32,
        dir: PartSelectDir,
        value: &BitVector,
    ) {
        let width = width.max(1);
        if let Some(base) = index_of(base) {
            self.write_range(indexed_lsb(base, width, dir), width, value);
        }
    }

    /// Concatenates `parts`, the first being most significant.
    ///
    /// The result is sized, unsigned and binary. An empty list yields a
    /// single `X` bit.
    pub fn concat(parts: &[BitVector]) -> BitVector {
        let total: u64 = parts.iter().map(|p| u64::from(p.width())).sum();
        let Ok(width) = i32::try_from(total) else {
            log::warn!("concatenation of {total} bits is too wide; result is X");
            return BitVector::all_x(1);
        };
        if width == 0 {
            return BitVector::all_x(1);
        }
        let mut out = BitVector::all_zero(width as u32);
        let mut pos = 0i32;
        for part in parts.iter().rev() {
            for i in 0..part.width() as i32 {
                out.set_value(pos + i, part.value(i));
            }
            pos += part.width() as i32;
        }
        out
    }

    /// Repeats the concatenation of `parts` `count` times.
    ///
    /// An `X`/`Z` or zero count, an empty list, or a result wider than
    /// `i32::MAX` bits yields a single `X` bit.
    pub fn replicate(count: &BitVector, parts: &[BitVector]) -> BitVector {
        let n = match count.to_u32() {
            Ok(n) if n > 0 => n,
            _ => return BitVector::all_x(1),
        };
        let unit = BitVector::concat(parts);
        if parts.is_empty() || u64::from(unit.width()) * u64::from(n) > i32::MAX as u64 {
            return BitVector::all_x(1);
        }
        let copies = vec![unit; n as usize];
        BitVector::concat(&copies)
    }
}

/// `|msb - lsb| + 1`, or `None` when that does not fit a `u32`.
fn range_width(msb: i32, lsb: i32) -> Option<u32> {
    u32::try_from((i64::from(msb) - i64::from(lsb)).unsigned_abs() + 1).ok()
}

fn indexed_lsb(base: i64, width: u32, dir: PartSelectDir) -> i64 {
    match dir {
        PartSelectDir::Plus => base,
        PartSelectDir::Minus => base - i64::from(width) + 1,
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
    fn fixed_part_select() {
        let v = lit("8'b1100_1010");
        let p = v.part_select(5, 2);
        assert_eq!(p.width(), 4);
        assert!(p.is_sized());
        assert!(!p.is_signed());
        assert_eq!(bits(&p), "0010");
    }

    #[test]
    fn part_select_out_of_range_reads_x() {
        let v = lit("8'hFF");
        assert_eq!(bits(&v.part_select(9, 6)), "XX11");
        assert_eq!(bits(&v.part_select(1, -2)), "11XX");
        let rev = v.part_select(10, 15);
        assert_eq!(rev.width(), 6);
        assert_eq!(bits(&rev), "XXXXXX");
    }

    #[test]
    fn part_select_extreme_bounds() {
        let v = lit("8'hFF");
        let wide = v.part_select(i32::MIN, i32::MAX);
        assert_eq!(wide.width(), 1);
        assert_eq!(wide.to_scalar(), Logic::X);
        assert_eq!(v.part_select(i32::MAX, i32::MIN).width(), 1);
        assert_eq!(v.part_select(i32::MAX, 0).width(), 1);
        let far = v.part_select(i32::MIN + 3, i32::MIN);
        assert_eq!(bits(&far), "XXXX");
    }

    #[test]
    fn set_part_select_extreme_bounds() {
        let mut v = lit("8'h00");
        v.set_part_select(i32::MAX, i32::MIN, &lit("1'b1"));
        assert_eq!(bits(&v), "00000000");
        // Sign extension of 2'sb10 fills every bit above it.
        v.set_part_select(i32::MAX, 4, &lit("2'sb10"));
        assert_eq!(bits(&v), "11100000");
        v.set_part_select(i32::MIN, i32::MAX, &lit("8'hFF"));
        assert_eq!(bits(&v), "11100000");
    }

    #[test]
    fn part_select_of_signed_is_unsigned() {
        let v = lit("8'shF0");
        assert!(!v.part_select(7, 4).is_signed());
    }

    #[test]
    fn set_part_select_resizes_and_clips() {
        let mut v = lit("8'h00");
        v.set_part_select(3, 0, &lit("8'hFA"));
        assert_eq!(bits(&v), "00001010");
        v.set_part_select(9, 6, &lit("4'b1111"));
        assert_eq!(bits(&v), "11001010");
        v.set_part_select(1, 4, &lit("4'b1111"));
        assert_eq!(bits(&v), "11001010");
    }

    #[test]
    fn dynamic_bit_select() {
        let mut v = lit("4'b1010");
        assert_eq!(v.bit_select(&lit("3")), Logic::One);
        assert_eq!(v.bit_select(&lit("2'bx1")), Logic::X);
        assert_eq!(v.bit_select(&lit("-1")), Logic::X);
        v.set_bit_select(&lit("0"), Logic::Z);
        v.set_bit_select(&lit("4'bz000"), Logic::One);
        assert_eq!(bits(&v), "101Z");
    }

    #[test]
    fn indexed_part_select() {
        let v = lit("16'hABCD");
        let up = v.part_select_indexed(&lit("4"), 8, PartSelectDir::Plus);
        assert_eq!(up.to_u64(), Ok(0xBC));
        let down = v.part_select_indexed(&lit("11"), 8, PartSelectDir::Minus);
        assert_eq!(down.to_u64(), Ok(0xBC));
        let x = v.part_select_indexed(&lit("4'bxx00"), 4, PartSelectDir::Plus);
        assert_eq!(bits(&x), "XXXX");
        let edge = v.part_select_indexed(&lit("14"), 4, PartSelectDir::Plus);
        assert_eq!(bits(&edge), "XX10");
    }

    #[test]
    fn indexed_part_select_write() {
        let mut v = lit("8'h00");
        v.set_part_select_indexed(&lit("7"), 4, PartSelectDir::Minus, &lit("4'b1001"));
        assert_eq!(bits(&v), "10010000");
        v.set_part_select_indexed(&lit("1'bx"), 4, PartSelectDir::Plus, &lit("4'b1111"));
        assert_eq!(bits(&v), "10010000");
    }

    #[test]
    fn concat_orders_msb_first() {
        let c = BitVector::concat(&[lit("2'b01"), lit("2'b10")]);
        assert_eq!(c.width(), 4);
        assert_eq!(bits(&c), "0110");
        let mixed = BitVector::concat(&[lit("1'bz"), lit("3'sb101")]);
        assert_eq!(bits(&mixed), "Z101");
        assert!(!mixed.is_signed());
        assert!(mixed.is_sized());
    }

    #[test]
    fn concat_empty_is_single_x() {
        let c = BitVector::concat(&[]);
        assert_eq!(c.width(), 1);
        assert_eq!(c.value(0), Logic::X);
    }

    #[test]
    fn replication() {
        let r = BitVector::replicate(&lit("3"), &[lit("2'b10")]);
        assert_eq!(bits(&r), "101010");
        let r = BitVector::replicate(&lit("2"), &[lit("1'b1"), lit("1'b0")]);
        assert_eq!(bits(&r), "1010");
        assert_eq!(bits(&BitVector::replicate(&lit("0"), &[lit("2'b11")])), "X");
        assert_eq!(bits(&BitVector::replicate(&lit("2'bx1"), &[lit("2'b11")])), "X");
        assert_eq!(bits(&BitVector::replicate(&lit("4"), &[])), "X");
    }
}
