//! # Thumb Instruction Set (16-bit)
//!
//! A compressed encoding of a subset of the ARM instructions. Only the
//! conditional branch carries a condition.

pub mod alu_instructions;

#[allow(clippy::cast_possible_truncation)]
pub mod instruction;
pub mod mode;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_lossless)]
pub mod operations;
