//! Four-valued, arbitrary-width bit vectors for the Quartz HDL front end.
//!
//! [`BitVector`] is the value type used to evaluate constant expressions
//! during elaboration. Each bit is `0`, `1`, `X` (unknown) or `Z` (high
//! impedance), and every value carries a width, a sized flag, a signed flag
//! and a preferred display radix.
//!
//! ```
//! use quartz_value::BitVector;
//!
//! let a: BitVector = "8'shFF".parse().unwrap();
//! let b: BitVector = "8'sh01".parse().unwrap();
//! assert_eq!((&a + &b).verilog_string(), "8'sh00");
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod arith;
pub mod attrs;
mod bitwise;
mod compare;
pub mod config;
pub mod error;
mod format;
pub mod ops;
mod parse;
pub mod select;
mod shift;
pub mod storage;
pub mod vector;

pub use attrs::{Attrs, Radix, ValueType, INTEGER_WIDTH, TIME_WIDTH};
pub use config::{load_config, load_config_from_str, ValueConfig};
pub use error::{ConfigError, ConversionError, FormatError, ParseError};
pub use ops::{
    eval_binary, eval_concat, eval_conditional, eval_replicate, eval_unary, BinaryOp, UnaryOp,
};
pub use quartz_common::{Logic, SimTime};
pub use select::PartSelectDir;
pub use vector::BitVector;
