//! Operator-level entry points for an expression evaluator.
//!
//! Each function computes the self-determined result of one operator and
//! then, when a required result type is given, converts the result to it
//! with [`BitVector::coerce`]. Scalar results (reductions, comparisons,
//! logical operators) are returned as 1-bit vectors.

use crate::attrs::ValueType;
use crate::vector::BitVector;
use serde::{Deserialize, Serialize};

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Unary plus (`+`).
    Plus,
    /// Arithmetic negation (`-`).
    Neg,
    /// Bitwise NOT (`~`).
    Not,
    /// Reduction AND (`&`).
    RedAnd,
    /// Reduction NAND (`~&`).
    RedNand,
    /// Reduction OR (`|`).
    RedOr,
    /// Reduction NOR (`~|`).
    RedNor,
    /// Reduction XOR (`^`).
    RedXor,
    /// Reduction XNOR (`~^`).
    RedXnor,
    /// Logical NOT (`!`).
    LogicNot,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Modulo (`%`).
    Mod,
    /// Exponentiation (`**`).
    Pow,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Bitwise XNOR (`~^`).
    Xnor,
    /// Logical left shift (`<<`).
    Shl,
    /// Logical right shift (`>>`).
    Shr,
    /// Arithmetic left shift (`<<<`).
    AShl,
    /// Arithmetic right shift (`>>>`).
    AShr,
    /// Logical equality (`==`).
    Eq,
    /// Logical inequality (`!=`).
    Ne,
    /// Case equality (`===`).
    CaseEq,
    /// Case inequality (`!==`).
    CaseNe,
    /// Equality with `X` as a wildcard (`casex`-style match).
    WildEqX,
    /// Equality with `X` and `Z` as wildcards (`casez`/`casex` match).
    WildEqXz,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
}

/// Evaluates a unary operator.
pub fn eval_unary(op: UnaryOp, val: &BitVector, ty: Option<ValueType>) -> BitVector {
    let result = match op {
        UnaryOp::Plus => val.clone(),
        UnaryOp::Neg => val.negate(),
        UnaryOp::Not => val.bit_not(),
        UnaryOp::RedAnd => val.reduce_and().into(),
        UnaryOp::RedNand => val.reduce_nand().into(),
        UnaryOp::RedOr => val.reduce_or().into(),
        UnaryOp::RedNor => val.reduce_nor().into(),
        UnaryOp::RedXor => val.reduce_xor().into(),
        UnaryOp::RedXnor => val.reduce_xnor().into(),
        UnaryOp::LogicNot => val.logical_not().into(),
    };
    result.coerced(ty)
}

/// Evaluates a binary operator.
pub fn eval_binary(
    op: BinaryOp,
    lhs: &BitVector,
    rhs: &BitVector,
    ty: Option<ValueType>,
) -> BitVector {
    let result = match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => lhs / rhs,
        BinaryOp::Mod => lhs % rhs,
        BinaryOp::Pow => lhs.pow(rhs),
        BinaryOp::And => lhs & rhs,
        BinaryOp::Or => lhs | rhs,
        BinaryOp::Xor => lhs ^ rhs,
        BinaryOp::Xnor => lhs.xnor(rhs),
        BinaryOp::Shl => lhs.lshift(rhs),
        BinaryOp::Shr => lhs.rshift(rhs),
        BinaryOp::AShl => lhs.alshift(rhs),
        BinaryOp::AShr => lhs.arshift(rhs),
        BinaryOp::Eq => lhs.eq_logic(rhs).into(),
        BinaryOp::Ne => lhs.ne_logic(rhs).into(),
        BinaryOp::CaseEq => lhs.eq_exact(rhs).into(),
        BinaryOp::CaseNe => lhs.ne_exact(rhs).into(),
        BinaryOp::WildEqX => lhs.eq_with_x(rhs).into(),
        BinaryOp::WildEqXz => lhs.eq_with_xz(rhs).into(),
        BinaryOp::Lt => lhs.lt_logic(rhs).into(),
        BinaryOp::Le => lhs.le_logic(rhs).into(),
        BinaryOp::Gt => lhs.gt_logic(rhs).into(),
        BinaryOp::Ge => lhs.ge_logic(rhs).into(),
        BinaryOp::LogicAnd => lhs.logical_and(rhs).into(),
        BinaryOp::LogicOr => lhs.logical_or(rhs).into(),
    };
    result.coerced(ty)
}

/// Evaluates `cond ? if_true : if_false`.
pub fn eval_conditional(
    cond: &BitVector,
    if_true: &BitVector,
    if_false: &BitVector,
    ty: Option<ValueType>,
) -> BitVector {
    BitVector::conditional(cond, if_true, if_false).coerced(ty)
}

/// Evaluates a concatenation `{a, b, ...}`.
pub fn eval_concat(parts: &[BitVector], ty: Option<ValueType>) -> BitVector {
    BitVector::concat(parts).coerced(ty)
}

/// Evaluates a replication `{count{a, b, ...}}`.
pub fn eval_replicate(count: &BitVector, parts: &[BitVector], ty: Option<ValueType>) -> BitVector {
    BitVector::replicate(count, parts).coerced(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_common::Logic;

    fn lit(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    #[test]
    fn unary_scalar_results_are_one_bit() {
        let r = eval_unary(UnaryOp::RedOr, &lit("8'h10"), None);
        assert_eq!(r.width(), 1);
        assert_eq!(r.to_scalar(), Logic::One);
        let n = eval_unary(UnaryOp::LogicNot, &lit("4'b00z0"), None);
        assert_eq!(n.to_scalar(), Logic::X);
    }

    #[test]
    fn unary_with_required_type() {
        let r = eval_unary(UnaryOp::Neg, &lit("4'd1"), Some(ValueType::new(8, true, false)));
        assert_eq!(r.width(), 8);
        assert_eq!(r.to_u32(), Ok(0x0F));
        let p = eval_unary(UnaryOp::Plus, &lit("-3"), Some(ValueType::INTEGER));
        assert_eq!(p.to_i32(), Ok(-3));
        assert!(p.is_sized());
    }

    #[test]
    fn binary_arithmetic_and_coercion() {
        let r = eval_binary(BinaryOp::Add, &lit("8'd250"), &lit("8'd10"), None);
        assert_eq!(r.to_u32(), Ok(4));
        let wide = eval_binary(
            BinaryOp::Add,
            &lit("8'd250"),
            &lit("8'd10"),
            Some(ValueType::new(9, true, false)),
        );
        // Coercion applies after the operation.
        assert_eq!(wide.to_u32(), Ok(4));
        let t = eval_binary(BinaryOp::Mul, &lit("3"), &lit("-4"), Some(ValueType::TIME));
        assert_eq!(t.width(), 64);
        assert!(!t.is_signed());
        assert_eq!(t.to_u64(), Ok(0xFFFF_FFF4));
    }

    #[test]
    fn binary_comparisons() {
        let one = |op| eval_binary(op, &lit("4'b10x1"), &lit("4'b1011"), None).to_scalar();
        assert_eq!(one(BinaryOp::Eq), Logic::X);
        assert_eq!(one(BinaryOp::CaseEq), Logic::Zero);
        assert_eq!(one(BinaryOp::CaseNe), Logic::One);
        assert_eq!(one(BinaryOp::WildEqX), Logic::One);
        assert_eq!(one(BinaryOp::WildEqXz), Logic::One);
        assert_eq!(one(BinaryOp::Lt), Logic::X);
        let ge = eval_binary(BinaryOp::Ge, &lit("5"), &lit("5"), None);
        assert_eq!(ge.to_scalar(), Logic::One);
    }

    #[test]
    fn binary_shifts_and_bitwise() {
        let s = eval_binary(BinaryOp::AShr, &lit("8'sh80"), &lit("2"), None);
        assert_eq!(s.verilog_string(), "-8'sh20");
        let x = eval_binary(BinaryOp::Xnor, &lit("2'b10"), &lit("2'b11"), None);
        assert_eq!(x.verilog_string(), "2'b10");
        let l = eval_binary(BinaryOp::LogicOr, &lit("0"), &lit("4'bx000"), None);
        assert_eq!(l.to_scalar(), Logic::X);
        let p = eval_binary(BinaryOp::Pow, &lit("3"), &lit("3"), None);
        assert_eq!(p.to_i32(), Ok(27));
    }

    #[test]
    fn structural_operators() {
        let c = eval_concat(&[lit("2'b01"), lit("2'b10")], None);
        assert_eq!(c.verilog_string(), "4'b0110");
        let r = eval_replicate(&lit("2"), &[lit("3'b101")], Some(ValueType::new(8, true, false)));
        assert_eq!(r.verilog_string(), "8'b0010_1101");
        let q = eval_conditional(&lit("1'bx"), &lit("2'b10"), &lit("2'b11"), None);
        assert_eq!(q.verilog_string(), "2'b1X");
    }
}
