//! # Processor Modes
//!
//! The ARM7TDMI runs in one of seven modes, encoded in bits 0-4 of the CPSR.
//!
//! | Mode       | Bits    | Bank | Privileged | Has SPSR |
//! |------------|---------|------|------------|----------|
//! | User       | `10000` | 0    | no         | no       |
//! | FIQ        | `10001` | 1    | yes        | yes      |
//! | IRQ        | `10010` | 2    | yes        | yes      |
//! | Supervisor | `10011` | 3    | yes        | yes      |
//! | Abort      | `10111` | 4    | yes        | yes      |
//! | Undefined  | `11011` | 5    | yes        | yes      |
//! | System     | `11111` | 0    | yes        | no       |
//!
//! User and System share the same registers. Every other mode owns a private
//! SP, LR and SPSR, and FIQ additionally owns R8-R12.
//! See [`register_bank`](super::register_bank) for how banks are swapped.

use serde::{Deserialize, Serialize};

/// Number of distinct register banks (User and System share one).
pub const BANK_COUNT: usize = 6;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Mode {
    /// The normal program execution state.
    User = 0b10000,

    /// Designed to support a data transfer or channel process.
    Fiq = 0b10001,

    /// Used for general-purpose interrupt handling.
    Irq = 0b10010,

    /// Protected mode for the operating system.
    Supervisor = 0b10011,

    /// Entered after a data or instruction prefetch abort.
    Abort = 0b10111,

    /// Entered when an undefined instruction is executed.
    Undefined = 0b11011,

    /// A privileged user mode for the operating system.
    System = 0b11111,
}

impl Mode {
    /// Index of the register bank that is live while in this mode.
    #[must_use]
    pub const fn bank(self) -> usize {
        match self {
            Self::User | Self::System => 0,
            Self::Fiq => 1,
            Self::Irq => 2,
            Self::Supervisor => 3,
            Self::Abort => 4,
            Self::Undefined => 5,
        }
    }

    #[must_use]
    pub const fn is_privileged(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Whether the mode owns a saved program status register.
    #[must_use]
    pub const fn has_spsr(self) -> bool {
        !matches!(self, Self::User | Self::System)
    }
}

impl From<Mode> for u32 {
    fn from(m: Mode) -> Self {
        m as Self
    }
}

impl TryFrom<u32> for Mode {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            0b10000 => Ok(Self::User),
            0b10001 => Ok(Self::Fiq),
            0b10010 => Ok(Self::Irq),
            0b10011 => Ok(Self::Supervisor),
            0b10111 => Ok(Self::Abort),
            0b11011 => Ok(Self::Undefined),
            0b11111 => Ok(Self::System),
            _ => Err(format!("Unexpected value for Mode: 0b{n:05b}")),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("USR"),
            Self::Fiq => f.write_str("FIQ"),
            Self::Irq => f.write_str("IRQ"),
            Self::Supervisor => f.write_str("SVC"),
            Self::Abort => f.write_str("ABT"),
            Self::Undefined => f.write_str("UND"),
            Self::System => f.write_str("SYS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_and_system_share_a_bank() {
        assert_eq!(Mode::User.bank(), Mode::System.bank());
        assert!(!Mode::User.has_spsr());
        assert!(!Mode::System.has_spsr());
        assert!(Mode::System.is_privileged());
        assert!(!Mode::User.is_privileged());
    }

    #[test]
    fn every_exception_mode_owns_a_bank() {
        let modes = [
            Mode::Fiq,
            Mode::Irq,
            Mode::Supervisor,
            Mode::Abort,
            Mode::Undefined,
        ];
        let mut banks: Vec<usize> = modes.iter().map(|m| m.bank()).collect();
        banks.sort_unstable();
        banks.dedup();

        assert_eq!(banks.len(), modes.len());
        assert!(banks.iter().all(|&b| b > 0 && b < BANK_COUNT));
    }

    #[test]
    fn mode_bits_round_trip() {
        for bits in 0..32 {
            if let Ok(mode) = Mode::try_from(bits) {
                assert_eq!(u32::from(mode), bits);
            }
        }
        assert!(Mode::try_from(0).is_err());
        assert!(Mode::try_from(0b10100).is_err());
    }
}
