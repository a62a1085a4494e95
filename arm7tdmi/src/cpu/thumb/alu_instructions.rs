use crate::cpu::arm::alu_instruction::ArmModeAluInstruction;
use crate::cpu::flags::ShiftKind;

/// Format 4 opcodes.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ThumbModeAluInstruction {
    And = 0x0,
    Eor = 0x1,
    Lsl = 0x2,
    Lsr = 0x3,
    Asr = 0x4,
    Adc = 0x5,
    Sbc = 0x6,
    Ror = 0x7,
    Tst = 0x8,
    Neg = 0x9,
    Cmp = 0xA,
    Cmn = 0xB,
    Orr = 0xC,
    Mul = 0xD,
    Bic = 0xE,
    Mvn = 0xF,
}

/// How a format 4 opcode is carried out.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ThumbAluKind {
    /// `Rd <- Rd op Rs` with the ARM opcode of the same name.
    DataProcessing(ArmModeAluInstruction),
    /// `Rd <- Rd shifted by Rs`.
    Shift(ShiftKind),
    /// `Rd <- 0 - Rs`
    Negate,
    Multiply,
}

impl ThumbModeAluInstruction {
    #[must_use]
    pub const fn kind(self) -> ThumbAluKind {
        use ThumbAluKind::*;
        match self {
            Self::And => DataProcessing(ArmModeAluInstruction::And),
            Self::Eor => DataProcessing(ArmModeAluInstruction::Eor),
            Self::Adc => DataProcessing(ArmModeAluInstruction::Adc),
            Self::Sbc => DataProcessing(ArmModeAluInstruction::Sbc),
            Self::Tst => DataProcessing(ArmModeAluInstruction::Tst),
            Self::Cmp => DataProcessing(ArmModeAluInstruction::Cmp),
            Self::Cmn => DataProcessing(ArmModeAluInstruction::Cmn),
            Self::Orr => DataProcessing(ArmModeAluInstruction::Orr),
            Self::Bic => DataProcessing(ArmModeAluInstruction::Bic),
            Self::Mvn => DataProcessing(ArmModeAluInstruction::Mvn),
            Self::Lsl => Shift(ShiftKind::Lsl),
            Self::Lsr => Shift(ShiftKind::Lsr),
            Self::Asr => Shift(ShiftKind::Asr),
            Self::Ror => Shift(ShiftKind::Ror),
            Self::Neg => Negate,
            Self::Mul => Multiply,
        }
    }
}

impl From<u16> for ThumbModeAluInstruction {
    fn from(alu_op_code: u16) -> Self {
        use ThumbModeAluInstruction::*;
        match alu_op_code {
            0x0 => And,
            0x1 => Eor,
            0x2 => Lsl,
            0x3 => Lsr,
            0x4 => Asr,
            0x5 => Adc,
            0x6 => Sbc,
            0x7 => Ror,
            0x8 => Tst,
            0x9 => Neg,
            0xA => Cmp,
            0xB => Cmn,
            0xC => Orr,
            0xD => Mul,
            0xE => Bic,
            0xF => Mvn,
            _ => unreachable!(),
        }
    }
}

impl std::fmt::Display for ThumbModeAluInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Eor => f.write_str("EOR"),
            Self::Lsl => f.write_str("LSL"),
            Self::Lsr => f.write_str("LSR"),
            Self::Asr => f.write_str("ASR"),
            Self::Adc => f.write_str("ADC"),
            Self::Sbc => f.write_str("SBC"),
            Self::Ror => f.write_str("ROR"),
            Self::Tst => f.write_str("TST"),
            Self::Neg => f.write_str("NEG"),
            Self::Cmp => f.write_str("CMP"),
            Self::Cmn => f.write_str("CMN"),
            Self::Orr => f.write_str("ORR"),
            Self::Mul => f.write_str("MUL"),
            Self::Bic => f.write_str("BIC"),
            Self::Mvn => f.write_str("MVN"),
        }
    }
}

/// Format 5 opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbHighRegisterOperation {
    Add,
    Cmp,
    Mov,
    Bx,
}

impl std::fmt::Display for ThumbHighRegisterOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mov => f.write_str("MOV"),
            Self::Cmp => f.write_str("CMP"),
            Self::Add => f.write_str("ADD"),
            Self::Bx => f.write_str("BX"),
        }
    }
}

impl From<u16> for ThumbHighRegisterOperation {
    fn from(op: u16) -> Self {
        match op {
            0 => Self::Add,
            1 => Self::Cmp,
            2 => Self::Mov,
            3 => Self::Bx,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conversion_thumb_alu_op() {
        let op: ThumbModeAluInstruction = 0b0000.into();
        assert_eq!(op, ThumbModeAluInstruction::And);
        let op: ThumbModeAluInstruction = 0b0001.into();
        assert_eq!(op, ThumbModeAluInstruction::Eor);
        let op: ThumbModeAluInstruction = 0b1110.into();
        assert_eq!(op, ThumbModeAluInstruction::Bic);
        let op: ThumbModeAluInstruction = 0b1111.into();
        assert_eq!(op, ThumbModeAluInstruction::Mvn);
    }

    #[test]
    fn check_kinds() {
        assert_eq!(
            ThumbModeAluInstruction::Sbc.kind(),
            ThumbAluKind::DataProcessing(ArmModeAluInstruction::Sbc)
        );
        assert_eq!(ThumbModeAluInstruction::Ror.kind(), ThumbAluKind::Shift(ShiftKind::Ror));
        assert_eq!(ThumbModeAluInstruction::Neg.kind(), ThumbAluKind::Negate);
        assert_eq!(ThumbModeAluInstruction::Mul.kind(), ThumbAluKind::Multiply);
    }

    #[test]
    fn check_high_register_operations() {
        let ops: Vec<_> = (0..4).map(ThumbHighRegisterOperation::from).collect();
        assert_eq!(
            ops,
            vec![
                ThumbHighRegisterOperation::Add,
                ThumbHighRegisterOperation::Cmp,
                ThumbHighRegisterOperation::Mov,
                ThumbHighRegisterOperation::Bx,
            ]
        );
    }
}
