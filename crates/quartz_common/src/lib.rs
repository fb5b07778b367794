//! Shared foundational types for the Quartz HDL toolchain.
//!
//! This crate provides the four-state scalar [`Logic`] type and the packed
//! 64-bit [`SimTime`] value used at the interface between HDL values and the
//! host.

#![warn(missing_docs)]

pub mod logic;
pub mod time;

pub use logic::Logic;
pub use time::SimTime;
