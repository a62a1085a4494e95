//! # ARM Instruction Set (32-bit)
//!
//! Every instruction is conditional.
//!
//! ```text
//! 31-28   27-25   24-0
//! [Cond] [Format] [Instruction-specific]
//! ```
//!
//! - **Condition (bits 28-31)**: See [`condition`](super::condition)
//! - **Format (bits 25-27)**: Determines instruction category
//!
//! ## Submodules
//!
//! - [`instructions`] - Classification (`From<u32>`)
//! - [`mode`] - Opcode wrapper and operand decoding
//! - [`operations`] - Primitives shared with Thumb
//! - [`alu_instruction`] - ALU ops and barrel shifter

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_lossless)]
pub mod alu_instruction;

#[allow(clippy::cast_possible_truncation)]
pub mod instructions;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
pub mod mode;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_lossless)]
#[allow(clippy::similar_names)]
pub mod operations;
