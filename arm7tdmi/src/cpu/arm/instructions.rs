//! # ARM Instruction Classification
//!
//! Maps a 32-bit word to the instruction family it belongs to. Operand fields
//! are extracted later by the execution engine from the raw bits.
//!
//! ```text
//! ┌───────────┬───────────────────────────────────────────────────┐
//! │ Bits 27-25│ Families                                          │
//! ├───────────┼───────────────────────────────────────────────────┤
//! │ 000       │ BX, MUL/MLA, MULL, SWP, halfword transfer,        │
//! │           │ MRS/MSR (register), data processing (register)    │
//! │ 001       │ MSR (immediate), data processing (immediate)      │
//! │ 010, 011  │ LDR/STR                                           │
//! │ 100       │ LDM/STM                                           │
//! │ 101       │ B/BL                                              │
//! │ 110       │ LDC/STC                                           │
//! │ 111       │ CDP, MCR/MRC (bit 24 = 0), SWI (bit 24 = 1)       │
//! └───────────┴───────────────────────────────────────────────────┘
//! ```
//!
//! Inside the `000` group the narrower patterns are tested first:
//!
//! 1. Branch and Exchange
//! 2. Multiply, Multiply Long, Single Data Swap
//! 3. Halfword Data Transfer (bits 7 and 4 set)
//! 4. PSR Transfer
//! 5. Data Processing
//!
//! Encodings that fit no family, a store with a signed halfword type, a
//! register-offset LDR/STR with bit 4 set and a test opcode without the S bit
//! that is not a PSR transfer, classify as [`ArmInstruction::Undefined`].

use crate::bitwise::Bits;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ArmInstruction {
    DataProcessing,
    /// MRS
    PsrRead,
    /// MSR, register or immediate source.
    PsrWrite,
    Multiply,
    MultiplyLong,
    SingleDataSwap,
    BranchAndExchange,
    HalfwordDataTransfer,
    SingleDataTransfer,
    BlockDataTransfer,
    Branch,
    CoprocessorDataTransfer,
    CoprocessorDataOperation,
    CoprocessorRegisterTransfer,
    SoftwareInterrupt,
    Undefined,
}

impl ArmInstruction {
    fn classify_group_000(op_code: u32) -> Self {
        if op_code & 0x0FC0_00F0 == 0x0000_0090 {
            Self::Multiply
        } else if op_code & 0x0F80_00F0 == 0x0080_0090 {
            Self::MultiplyLong
        } else if op_code & 0x0FB0_0FF0 == 0x0100_0090 {
            Self::SingleDataSwap
        } else if op_code.get_bit(7) && op_code.get_bit(4) {
            let sh = op_code.get_bits(5..=6);
            let load = op_code.get_bit(20);
            match (sh, load) {
                (0b00, _) | (0b10 | 0b11, false) => Self::Undefined,
                _ => Self::HalfwordDataTransfer,
            }
        } else if op_code & 0x0FBF_0FFF == 0x010F_0000 {
            Self::PsrRead
        } else if op_code & 0x0FB0_FFF0 == 0x0120_F000 {
            Self::PsrWrite
        } else {
            Self::data_processing_or_undefined(op_code)
        }
    }

    fn classify_group_001(op_code: u32) -> Self {
        if op_code & 0x0FB0_F000 == 0x0320_F000 {
            Self::PsrWrite
        } else {
            Self::data_processing_or_undefined(op_code)
        }
    }

    /// TST/TEQ/CMP/CMN without S is the PSR transfer space; anything there
    /// that is not a valid PSR transfer is undefined.
    fn data_processing_or_undefined(op_code: u32) -> Self {
        let is_test_opcode = op_code.get_bits(23..=24) == 0b10;
        if is_test_opcode && !op_code.get_bit(20) {
            Self::Undefined
        } else {
            Self::DataProcessing
        }
    }
}

impl From<u32> for ArmInstruction {
    fn from(op_code: u32) -> Self {
        if op_code & 0x0FFF_FFF0 == 0x012F_FF10 {
            return Self::BranchAndExchange;
        }

        match op_code.get_bits(25..=27) {
            0b000 => Self::classify_group_000(op_code),
            0b001 => Self::classify_group_001(op_code),
            0b010 => Self::SingleDataTransfer,
            0b011 if op_code.get_bit(4) => Self::Undefined,
            0b011 => Self::SingleDataTransfer,
            0b100 => Self::BlockDataTransfer,
            0b101 => Self::Branch,
            0b110 => Self::CoprocessorDataTransfer,
            0b111 if op_code.get_bit(24) => Self::SoftwareInterrupt,
            0b111 if op_code.get_bit(4) => Self::CoprocessorRegisterTransfer,
            0b111 => Self::CoprocessorDataOperation,
            _ => unreachable!(),
        }
    }
}

impl std::fmt::Display for ArmInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataProcessing => f.write_str("DataProcessing"),
            Self::PsrRead => f.write_str("MRS"),
            Self::PsrWrite => f.write_str("MSR"),
            Self::Multiply => f.write_str("Multiply"),
            Self::MultiplyLong => f.write_str("MultiplyLong"),
            Self::SingleDataSwap => f.write_str("SingleDataSwap"),
            Self::BranchAndExchange => f.write_str("BranchAndExchange"),
            Self::HalfwordDataTransfer => f.write_str("HalfwordDataTransfer"),
            Self::SingleDataTransfer => f.write_str("SingleDataTransfer"),
            Self::BlockDataTransfer => f.write_str("BlockDataTransfer"),
            Self::Branch => f.write_str("Branch"),
            Self::CoprocessorDataTransfer => f.write_str("CoprocessorDataTransfer"),
            Self::CoprocessorDataOperation => f.write_str("CoprocessorDataOperation"),
            Self::CoprocessorRegisterTransfer => f.write_str("CoprocessorRegisterTransfer"),
            Self::SoftwareInterrupt => f.write_str("SoftwareInterrupt"),
            Self::Undefined => f.write_str("Undefined"),
        }
    }
}
