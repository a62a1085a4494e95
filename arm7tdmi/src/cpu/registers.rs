//! # Register File
//!
//! The 16 registers visible at any time.
//!
//! - **R0-R12**: General purpose
//! - **R13 (SP)**: Stack pointer (by convention)
//! - **R14 (LR)**: Link register (return address)
//! - **R15 (PC)**: Program counter (+8 ARM, +4 Thumb due to pipeline)
//!
//! Which physical registers back R8-R14 depends on the mode; see
//! [`register_bank`](super::register_bank).

use serde::{Deserialize, Serialize};

/// Stack Pointer register index.
pub const REG_SP: usize = 0xD;

/// Link Register index (return address for subroutines).
pub const REG_LR: usize = 0xE;

/// Program Counter register index.
pub const REG_PROGRAM_COUNTER: usize = 0xF;

/// The 16 live registers, readable as unsigned or two's complement values.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers([u32; 16]);

impl Registers {
    #[must_use]
    pub const fn register_at(&self, reg: usize) -> u32 {
        self.0[reg]
    }

    #[must_use]
    pub const fn signed_register_at(&self, reg: usize) -> i32 {
        self.0[reg] as i32
    }

    pub const fn set_register_at(&mut self, reg: usize, new_value: u32) {
        self.0[reg] = new_value;
    }

    pub const fn set_signed_register_at(&mut self, reg: usize, new_value: i32) {
        self.0[reg] = new_value as u32;
    }

    #[must_use]
    pub const fn program_counter(&self) -> u32 {
        self.0[REG_PROGRAM_COUNTER]
    }

    pub const fn set_program_counter(&mut self, new_value: u32) {
        self.0[REG_PROGRAM_COUNTER] = new_value;
    }

    pub const fn advance_program_counter(&mut self, bytes: u32) {
        self.0[REG_PROGRAM_COUNTER] = self.0[REG_PROGRAM_COUNTER].wrapping_add(bytes);
    }

    #[must_use]
    pub const fn as_array(&self) -> &[u32; 16] {
        &self.0
    }
}
