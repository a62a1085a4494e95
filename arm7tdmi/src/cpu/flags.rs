//! Single-bit and two-bit instruction fields shared by the ARM and Thumb
//! encodings.

/// Width of a single data transfer (the B bit).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReadWriteKind {
    #[default]
    Word,

    Byte,
}

impl From<bool> for ReadWriteKind {
    fn from(value: bool) -> Self {
        if value { Self::Byte } else { Self::Word }
    }
}

/// Direction of a transfer (the L bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStoreKind {
    Store,
    Load,
}

impl From<bool> for LoadStoreKind {
    fn from(b: bool) -> Self {
        if b { Self::Load } else { Self::Store }
    }
}

/// When the offset is applied to the base (the P bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexing {
    /// Add offset after transfer.
    Post,

    /// Add offset before transfer.
    Pre,
}

impl From<bool> for Indexing {
    fn from(state: bool) -> Self {
        if state { Self::Pre } else { Self::Post }
    }
}

/// Sign of the offset (the U bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offsetting {
    /// Subtract the offset from base.
    Down,

    /// Add the offset to base.
    Up,
}

impl From<bool> for Offsetting {
    fn from(state: bool) -> Self {
        if state { Self::Up } else { Self::Down }
    }
}

impl Offsetting {
    #[must_use]
    pub const fn apply(self, base: u32, offset: u32) -> u32 {
        match self {
            Self::Up => base.wrapping_add(offset),
            Self::Down => base.wrapping_sub(offset),
        }
    }
}

/// Source of the second operand (the I bit of data processing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Immediate,
    Register,
}

impl From<bool> for OperandKind {
    fn from(b: bool) -> Self {
        if b { Self::Immediate } else { Self::Register }
    }
}

/// Barrel shifter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl From<u32> for ShiftKind {
    fn from(op: u32) -> Self {
        match op {
            0 => Self::Lsl,
            1 => Self::Lsr,
            2 => Self::Asr,
            3 => Self::Ror,
            _ => unreachable!(),
        }
    }
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lsl => f.write_str("LSL"),
            Self::Lsr => f.write_str("LSR"),
            Self::Asr => f.write_str("ASR"),
            Self::Ror => f.write_str("ROR"),
        }
    }
}

/// Halfword and signed transfer type (the S and H bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfwordTransferKind {
    UnsignedHalfwords,
    SignedByte,
    SignedHalfwords,
}

impl TryFrom<u32> for HalfwordTransferKind {
    type Error = String;

    fn try_from(sh: u32) -> Result<Self, Self::Error> {
        match sh {
            0b01 => Ok(Self::UnsignedHalfwords),
            0b10 => Ok(Self::SignedByte),
            0b11 => Ok(Self::SignedHalfwords),
            _ => Err(format!("SH=0b{sh:02b} is not a halfword transfer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_offsetting() {
        assert_eq!(Offsetting::from(true).apply(0x100, 4), 0x104);
        assert_eq!(Offsetting::from(false).apply(0x100, 4), 0xFC);
        assert_eq!(Offsetting::Down.apply(0, 1), u32::MAX);
    }

    #[test]
    fn check_halfword_kind() {
        assert_eq!(
            HalfwordTransferKind::try_from(0b11),
            Ok(HalfwordTransferKind::SignedHalfwords)
        );
        assert!(HalfwordTransferKind::try_from(0b00).is_err());
    }
}
