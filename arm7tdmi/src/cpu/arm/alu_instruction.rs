//! ALU opcodes and the barrel shifter.
//!
//! ## Shifter carry-out
//!
//! | Shift | Amount | Result          | Carry          |
//! |-------|--------|-----------------|----------------|
//! | any   | 0      | unchanged       | unchanged      |
//! | LSL   | 1-31   | `v << n`        | bit `32 - n`   |
//! | LSL   | 32     | 0               | bit 0          |
//! | LSL   | > 32   | 0               | 0              |
//! | LSR   | 1-31   | `v >> n`        | bit `n - 1`    |
//! | LSR   | 32     | 0               | bit 31         |
//! | LSR   | > 32   | 0               | 0              |
//! | ASR   | 1-31   | `v >> n` signed | bit `n - 1`    |
//! | ASR   | >= 32  | sign fill       | bit 31         |
//! | ROR   | 32k    | unchanged       | bit 31         |
//! | ROR   | other  | rotated         | bit `n%32 - 1` |
//! | RRX   | -      | `C:v >> 1`      | bit 0          |
//!
//! Immediate shift amounts reuse the zero encoding: `LSR #0` and `ASR #0`
//! mean a shift by 32, `ROR #0` means RRX. `LSL #0` is a plain move.

use crate::bitwise::Bits;
use crate::cpu::flags::ShiftKind;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ArmModeAluInstruction {
    And = 0x0,
    Eor = 0x1,
    Sub = 0x2,
    Rsb = 0x3,
    Add = 0x4,
    Adc = 0x5,
    Sbc = 0x6,
    Rsc = 0x7,
    Tst = 0x8,
    Teq = 0x9,
    Cmp = 0xA,
    Cmn = 0xB,
    Orr = 0xC,
    Mov = 0xD,
    Bic = 0xE,
    Mvn = 0xF,
}

impl std::fmt::Display for ArmModeAluInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Eor => f.write_str("EOR"),
            Self::Sub => f.write_str("SUB"),
            Self::Rsb => f.write_str("RSB"),
            Self::Add => f.write_str("ADD"),
            Self::Adc => f.write_str("ADC"),
            Self::Sbc => f.write_str("SBC"),
            Self::Rsc => f.write_str("RSC"),
            Self::Tst => f.write_str("TST"),
            Self::Teq => f.write_str("TEQ"),
            Self::Cmp => f.write_str("CMP"),
            Self::Cmn => f.write_str("CMN"),
            Self::Orr => f.write_str("ORR"),
            Self::Mov => f.write_str("MOV"),
            Self::Bic => f.write_str("BIC"),
            Self::Mvn => f.write_str("MVN"),
        }
    }
}

impl ArmModeAluInstruction {
    /// TST, TEQ, CMP and CMN only update flags.
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }
}

impl From<u32> for ArmModeAluInstruction {
    fn from(alu_op_code: u32) -> Self {
        use ArmModeAluInstruction::*;
        match alu_op_code {
            0x0 => And,
            0x1 => Eor,
            0x2 => Sub,
            0x3 => Rsb,
            0x4 => Add,
            0x5 => Adc,
            0x6 => Sbc,
            0x7 => Rsc,
            0x8 => Tst,
            0x9 => Teq,
            0xA => Cmp,
            0xB => Cmn,
            0xC => Orr,
            0xD => Mov,
            0xE => Bic,
            0xF => Mvn,
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftResult {
    pub result: u32,
    pub carry: bool,
}

/// Shifts `rm` by a register-specified `shift_amount` (only the low byte of
/// the register is meaningful, larger values are treated the same way).
#[must_use]
pub fn shift(kind: ShiftKind, shift_amount: u32, rm: u32, carry: bool) -> ShiftResult {
    if shift_amount == 0 {
        return ShiftResult { result: rm, carry };
    }

    match kind {
        ShiftKind::Lsl => match shift_amount {
            1..=31 => ShiftResult {
                result: rm << shift_amount,
                carry: rm.get_bit((32 - shift_amount) as u8),
            },
            32 => ShiftResult {
                result: 0,
                carry: rm.get_bit(0),
            },
            _ => ShiftResult {
                result: 0,
                carry: false,
            },
        },
        ShiftKind::Lsr => match shift_amount {
            1..=31 => ShiftResult {
                result: rm >> shift_amount,
                carry: rm.get_bit((shift_amount - 1) as u8),
            },
            32 => ShiftResult {
                result: 0,
                carry: rm.get_bit(31),
            },
            _ => ShiftResult {
                result: 0,
                carry: false,
            },
        },
        ShiftKind::Asr => match shift_amount {
            1..=31 => ShiftResult {
                result: ((rm as i32) >> shift_amount) as u32,
                carry: rm.get_bit((shift_amount - 1) as u8),
            },
            _ => ShiftResult {
                result: ((rm as i32) >> 31) as u32,
                carry: rm.get_bit(31),
            },
        },
        ShiftKind::Ror => match shift_amount % 32 {
            0 => ShiftResult {
                result: rm,
                carry: rm.get_bit(31),
            },
            n => ShiftResult {
                result: rm.rotate_right(n),
                carry: rm.get_bit((n - 1) as u8),
            },
        },
    }
}

/// Rotate right extended: a 33-bit rotation through the carry flag.
#[must_use]
pub fn rrx(rm: u32, carry: bool) -> ShiftResult {
    ShiftResult {
        result: (u32::from(carry) << 31) | (rm >> 1),
        carry: rm.get_bit(0),
    }
}

/// Shifts `rm` by a 5-bit immediate amount, decoding the zero encodings.
#[must_use]
pub fn shift_immediate(kind: ShiftKind, shift_amount: u32, rm: u32, carry: bool) -> ShiftResult {
    match (kind, shift_amount) {
        (ShiftKind::Lsr | ShiftKind::Asr, 0) => shift(kind, 32, rm, carry),
        (ShiftKind::Ror, 0) => rrx(rm, carry),
        _ => shift(kind, shift_amount, rm, carry),
    }
}

/// An 8-bit immediate rotated right by twice the 4-bit rotate field.
/// A zero rotation leaves the carry alone.
#[must_use]
pub fn rotated_immediate(immediate: u32, rotate: u32, carry: bool) -> ShiftResult {
    if rotate == 0 {
        ShiftResult {
            result: immediate,
            carry,
        }
    } else {
        let result = immediate.rotate_right(rotate * 2);
        ShiftResult {
            result,
            carry: result.get_bit(31),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    fn shifted(kind: ShiftKind, amount: u32, rm: u32) -> (u32, bool) {
        let r = shift(kind, amount, rm, false);
        (r.result, r.carry)
    }

    #[test]
    fn check_test_opcodes() {
        let tests: Vec<_> = (0..16)
            .map(ArmModeAluInstruction::from)
            .filter(|alu| alu.is_test())
            .collect();

        assert_eq!(
            tests,
            vec![
                ArmModeAluInstruction::Tst,
                ArmModeAluInstruction::Teq,
                ArmModeAluInstruction::Cmp,
                ArmModeAluInstruction::Cmn,
            ]
        );
    }

    #[test]
    fn zero_amount_keeps_value_and_carry() {
        let rm = rand::thread_rng().r#gen::<u32>();
        for kind in [ShiftKind::Lsl, ShiftKind::Lsr, ShiftKind::Asr, ShiftKind::Ror] {
            assert_eq!(shift(kind, 0, rm, true), ShiftResult { result: rm, carry: true });
        }
    }

    #[test]
    fn check_lsl() {
        assert_eq!(shifted(ShiftKind::Lsl, 1, 0x8000_0001), (2, true));
        assert_eq!(shifted(ShiftKind::Lsl, 31, 0b11), (0x8000_0000, true));
        assert_eq!(shifted(ShiftKind::Lsl, 32, 0x0000_0001), (0, true));
        assert_eq!(shifted(ShiftKind::Lsl, 32, 0xFFFF_FFFE), (0, false));
        assert_eq!(shifted(ShiftKind::Lsl, 33, 0xFFFF_FFFF), (0, false));
    }

    #[test]
    fn check_lsr() {
        assert_eq!(shifted(ShiftKind::Lsr, 1, 0b11), (1, true));
        assert_eq!(shifted(ShiftKind::Lsr, 32, 0x8000_0000), (0, true));
        assert_eq!(shifted(ShiftKind::Lsr, 32, 0x7FFF_FFFF), (0, false));
        assert_eq!(shifted(ShiftKind::Lsr, 200, 0xFFFF_FFFF), (0, false));
    }

    #[test]
    fn check_asr() {
        assert_eq!(shifted(ShiftKind::Asr, 4, 0x8000_0010), (0xF800_0001, false));
        assert_eq!(shifted(ShiftKind::Asr, 32, 0x8000_0000), (0xFFFF_FFFF, true));
        assert_eq!(shifted(ShiftKind::Asr, 40, 0x7000_0000), (0, false));
        assert_eq!(shifted(ShiftKind::Asr, 255, 0x8000_0000), (0xFFFF_FFFF, true));
    }

    #[test]
    fn check_ror() {
        assert_eq!(shifted(ShiftKind::Ror, 4, 0x0000_001F), (0xF000_0001, true));
        assert_eq!(shifted(ShiftKind::Ror, 32, 0x8000_0001), (0x8000_0001, true));
        assert_eq!(shifted(ShiftKind::Ror, 36, 0x0000_001F), (0xF000_0001, true));
    }

    #[test]
    fn ror_by_multiples_of_32_is_identity() {
        let rm = rand::thread_rng().r#gen::<u32>();
        for amount in [32, 64, 96, 128] {
            let r = shift(ShiftKind::Ror, amount, rm, false);
            assert_eq!(r.result, rm);
            assert_eq!(r.carry, rm.get_bit(31));
        }
    }

    #[test]
    fn check_immediate_encodings() {
        let lsr = shift_immediate(ShiftKind::Lsr, 0, 0x8000_0000, false);
        assert_eq!(lsr, ShiftResult { result: 0, carry: true });

        let asr = shift_immediate(ShiftKind::Asr, 0, 0x8000_0000, false);
        assert_eq!(asr, ShiftResult { result: 0xFFFF_FFFF, carry: true });

        let rrx = shift_immediate(ShiftKind::Ror, 0, 0x0000_0003, true);
        assert_eq!(rrx, ShiftResult { result: 0x8000_0001, carry: true });

        let lsl = shift_immediate(ShiftKind::Lsl, 0, 0x1234, true);
        assert_eq!(lsl, ShiftResult { result: 0x1234, carry: true });
    }

    #[test]
    fn check_rotated_immediate() {
        assert_eq!(
            rotated_immediate(0xFF, 0, true),
            ShiftResult { result: 0xFF, carry: true }
        );
        // 0xFF ror 8
        assert_eq!(
            rotated_immediate(0xFF, 4, false),
            ShiftResult { result: 0xFF00_0000, carry: true }
        );
        assert_eq!(
            rotated_immediate(0x01, 1, true),
            ShiftResult { result: 0x4000_0000, carry: false }
        );
    }
}
