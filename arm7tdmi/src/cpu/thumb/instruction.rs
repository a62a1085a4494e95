//! # Thumb Instruction Classification
//!
//! Thumb instructions are grouped into 19 formats, identified by their high bits:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Thumb Instruction Formats                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Format 1:  000 xx          Move shifted register                       │
//! │  Format 2:  00011           Add/subtract                                │
//! │  Format 3:  001 xx          Move/compare/add/subtract immediate         │
//! │  Format 4:  010000          ALU operations                              │
//! │  Format 5:  010001          Hi register operations / BX                 │
//! │  Format 6:  01001           PC-relative load                            │
//! │  Format 7:  0101 xx0        Load/store with register offset             │
//! │  Format 8:  0101 xx1        Load/store sign-extended byte/halfword      │
//! │  Format 9:  011 xx          Load/store with immediate offset            │
//! │  Format 10: 1000 x          Load/store halfword                         │
//! │  Format 11: 1001 x          SP-relative load/store                      │
//! │  Format 12: 1010 x          Load address                                │
//! │  Format 13: 10110000        Add offset to stack pointer                 │
//! │  Format 14: 1011 x10x       Push/pop registers                          │
//! │  Format 15: 1100 x          Multiple load/store                         │
//! │  Format 16: 1101 xxxx       Conditional branch                          │
//! │  Format 17: 11011111        Software interrupt                          │
//! │  Format 18: 11100           Unconditional branch                        │
//! │  Format 19: 1111 x          Long branch with link                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The remaining encodings (`1011` outside formats 13 and 14, a conditional
//! branch with condition `1110`, and `11101`) are undefined.
//!
//! ## Long Branch (BL)
//!
//! The BL instruction spans ±4MB but requires two 16-bit instructions:
//!
//! ```text
//! First:  1111 0xxx xxxx xxxx  ; LR = PC + (offset_hi << 12)
//! Second: 1111 1xxx xxxx xxxx  ; PC = LR + (offset_lo << 1), LR = next | 1
//! ```

use crate::bitwise::Bits;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ThumbInstruction {
    MoveShiftedRegister,
    AddSubtract,
    MoveCompareAddSubtractImm,
    AluOp,
    HiRegisterOpBX,
    PCRelativeLoad,
    LoadStoreRegisterOffset,
    LoadStoreSignExtByteHalfword,
    LoadStoreImmOffset,
    LoadStoreHalfword,
    SPRelativeLoadStore,
    LoadAddress,
    AddOffsetSP,
    PushPopReg,
    MultipleLoadStore,
    CondBranch,
    Swi,
    UncondBranch,
    LongBranchLink,
    Undefined,
}

impl From<u16> for ThumbInstruction {
    fn from(op_code: u16) -> Self {
        use ThumbInstruction::*;

        match op_code.get_bits(11..=15) {
            0b00011 => AddSubtract,
            0b00000..=0b00010 => MoveShiftedRegister,
            0b00100..=0b00111 => MoveCompareAddSubtractImm,
            0b01000 if op_code.get_bit(10) => HiRegisterOpBX,
            0b01000 => AluOp,
            0b01001 => PCRelativeLoad,
            0b01010 | 0b01011 if op_code.get_bit(9) => LoadStoreSignExtByteHalfword,
            0b01010 | 0b01011 => LoadStoreRegisterOffset,
            0b01100..=0b01111 => LoadStoreImmOffset,
            0b10000 | 0b10001 => LoadStoreHalfword,
            0b10010 | 0b10011 => SPRelativeLoadStore,
            0b10100 | 0b10101 => LoadAddress,
            0b10110 | 0b10111 => {
                if op_code.get_bits(8..=11) == 0b0000 {
                    AddOffsetSP
                } else if op_code.get_bits(9..=10) == 0b10 {
                    PushPopReg
                } else {
                    Undefined
                }
            }
            0b11000 | 0b11001 => MultipleLoadStore,
            0b11010 | 0b11011 => match op_code.get_bits(8..=11) {
                0b1111 => Swi,
                0b1110 => Undefined,
                _ => CondBranch,
            },
            0b11100 => UncondBranch,
            0b11101 => Undefined,
            0b11110 | 0b11111 => LongBranchLink,
            _ => unreachable!(),
        }
    }
}

impl std::fmt::Display for ThumbInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MoveShiftedRegister => f.write_str("MoveShiftedRegister"),
            Self::AddSubtract => f.write_str("AddSubtract"),
            Self::MoveCompareAddSubtractImm => f.write_str("MoveCompareAddSubtractImm"),
            Self::AluOp => f.write_str("AluOp"),
            Self::HiRegisterOpBX => f.write_str("HiRegisterOpBX"),
            Self::PCRelativeLoad => f.write_str("PCRelativeLoad"),
            Self::LoadStoreRegisterOffset => f.write_str("LoadStoreRegisterOffset"),
            Self::LoadStoreSignExtByteHalfword => f.write_str("LoadStoreSignExtByteHalfword"),
            Self::LoadStoreImmOffset => f.write_str("LoadStoreImmOffset"),
            Self::LoadStoreHalfword => f.write_str("LoadStoreHalfword"),
            Self::SPRelativeLoadStore => f.write_str("SPRelativeLoadStore"),
            Self::LoadAddress => f.write_str("LoadAddress"),
            Self::AddOffsetSP => f.write_str("AddOffsetSP"),
            Self::PushPopReg => f.write_str("PushPopReg"),
            Self::MultipleLoadStore => f.write_str("MultipleLoadStore"),
            Self::CondBranch => f.write_str("CondBranch"),
            Self::Swi => f.write_str("SWI"),
            Self::UncondBranch => f.write_str("UncondBranch"),
            Self::LongBranchLink => f.write_str("LongBranchLink"),
            Self::Undefined => f.write_str("Undefined"),
        }
    }
}
