//! # Program Status Registers (CPSR and SPSR)
//!
//! ```text
//! 31 30 29 28 27        8 7 6 5 4   0
//! ┌──┬──┬──┬──┬──────────┬─┬─┬─┬─────┐
//! │N │Z │C │V │ Reserved │I│F│T│Mode │
//! └──┴──┴──┴──┴──────────┴─┴─┴─┴─────┘
//! ```
//!
//! - **Flags (28-31)**: tested by [`condition`](super::condition)
//! - **I/F bits (7, 6)**: IRQ/FIQ disable
//! - **T bit (5)**: ARM (0) or Thumb (1) state
//! - **Mode (0-4)**: see [`cpu_modes`](super::cpu_modes)
//!
//! Every exception mode saves the CPSR into its own SPSR on entry.
//! See [`register_bank`](super::register_bank) for where SPSRs live.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::{condition::Condition, cpu_modes::Mode};

/// Mask of the flag field (`f`) of a PSR.
pub const FLAGS_MASK: u32 = 0xFF00_0000;

/// Program Status Register (CPSR or SPSR).
///
/// ```
/// use arm7tdmi::cpu::psr::Psr;
///
/// let mut cpsr = Psr::default();
///
/// cpsr.set_zero_flag(true);
/// assert!(cpsr.zero_flag());
/// ```
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Psr(u32);

impl Psr {
    #[must_use]
    pub fn can_execute(self, cond: Condition) -> bool {
        use Condition::{AL, CC, CS, EQ, GE, GT, HI, LE, LS, LT, MI, NE, NV, PL, VC, VS};
        match cond {
            EQ => self.zero_flag(),
            NE => !self.zero_flag(),
            CS => self.carry_flag(),
            CC => !self.carry_flag(),
            MI => self.sign_flag(),
            PL => !self.sign_flag(),
            VS => self.overflow_flag(),
            VC => !self.overflow_flag(),
            HI => self.carry_flag() && !self.zero_flag(),
            LS => !self.carry_flag() || self.zero_flag(),
            GE => self.sign_flag() == self.overflow_flag(),
            LT => self.sign_flag() != self.overflow_flag(),
            GT => !self.zero_flag() && (self.sign_flag() == self.overflow_flag()),
            LE => self.zero_flag() || (self.sign_flag() != self.overflow_flag()),
            AL => true,
            NV => false,
        }
    }

    /// N => Bit 31, (0=Not Signed, 1=Signed)
    #[must_use]
    pub fn sign_flag(self) -> bool {
        self.0.get_bit(31)
    }

    /// Z => Bit 30, (0=Not Zero, 1=Zero)
    #[must_use]
    pub fn zero_flag(self) -> bool {
        self.0.get_bit(30)
    }

    /// C => Bit 29, (0=Borrow/No Carry, 1=Carry/No Borrow)
    #[must_use]
    pub fn carry_flag(self) -> bool {
        self.0.get_bit(29)
    }

    /// V => Bit 28, (0=No Overflow, 1=Overflow)
    #[must_use]
    pub fn overflow_flag(self) -> bool {
        self.0.get_bit(28)
    }

    /// I => Bit 7, (0=Enable, 1=Disable)
    #[must_use]
    pub fn irq_disable(self) -> bool {
        self.0.get_bit(7)
    }

    /// F => Bit 6, (0=Enable, 1=Disable)
    #[must_use]
    pub fn fiq_disable(self) -> bool {
        self.0.get_bit(6)
    }

    /// T => Bit 5, (0=ARM, 1=THUMB)
    #[must_use]
    pub fn state_bit(self) -> bool {
        self.0.get_bit(5)
    }

    /// M4-M0 => Bits 4-0, unchecked.
    #[must_use]
    pub const fn mode_raw(self) -> u32 {
        self.0 & 0b1_1111
    }

    /// The decoded mode, or an error when bits 0-4 are not a mode code.
    ///
    /// # Errors
    ///
    /// Returns the [`Mode`] conversion error for unknown encodings.
    pub fn try_mode(self) -> Result<Mode, String> {
        Mode::try_from(self.mode_raw())
    }

    /// The decoded mode, User for invalid mode bits.
    ///
    /// [`RegisterBank::load_status`](super::register_bank::RegisterBank::load_status)
    /// reports invalid codes when it coerces them; this stays silent.
    #[must_use]
    pub fn mode(self) -> Mode {
        self.try_mode().unwrap_or(Mode::User)
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.0.set_bit(31, value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.0.set_bit(30, value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.0.set_bit(29, value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.0.set_bit(28, value);
    }

    /// Sets N and Z from a 32-bit result.
    pub fn set_nz(&mut self, result: u32) {
        self.set_sign_flag(result.get_bit(31));
        self.set_zero_flag(result == 0);
    }

    pub fn set_irq_disable(&mut self, value: bool) {
        self.0.set_bit(7, value);
    }

    pub fn set_fiq_disable(&mut self, value: bool) {
        self.0.set_bit(6, value);
    }

    pub fn set_state_bit(&mut self, value: bool) {
        self.0.set_bit(5, value);
    }

    pub const fn set_mode_raw(&mut self, m: u32) {
        self.0 &= !0b1_1111;
        self.0 |= m & 0b1_1111;
    }

    pub const fn set_mode(&mut self, m: Mode) {
        self.set_mode_raw(m as u32);
    }

    #[must_use]
    pub fn cpu_state(self) -> CpuState {
        self.state_bit().into()
    }

    pub fn set_cpu_state(&mut self, state: CpuState) {
        self.set_state_bit(state.into());
    }
}

impl From<Mode> for Psr {
    fn from(m: Mode) -> Self {
        let mut s = Self(0);

        s.set_mode(m);

        s
    }
}

impl From<u32> for Psr {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Psr> for u32 {
    fn from(p: Psr) -> Self {
        p.0
    }
}

impl std::fmt::Display for Psr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        write!(
            f,
            "{}{}{}{} {}{}{} {}",
            flag(self.sign_flag(), 'N'),
            flag(self.zero_flag(), 'Z'),
            flag(self.carry_flag(), 'C'),
            flag(self.overflow_flag(), 'V'),
            flag(self.irq_disable(), 'I'),
            flag(self.fiq_disable(), 'F'),
            flag(self.state_bit(), 'T'),
            self.try_mode()
                .map_or_else(|_| format!("?{:05b}", self.mode_raw()), |m| m.to_string()),
        )
    }
}

/// The CPU execution state (ARM or Thumb), selected by the T bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    /// 16-bit instructions. See [`thumb`](super::thumb).
    Thumb,
    /// 32-bit instructions. See [`arm`](super::arm).
    Arm,
}

impl CpuState {
    /// Size in bytes of one instruction.
    #[must_use]
    pub const fn instruction_size(self) -> u32 {
        match self {
            Self::Arm => 4,
            Self::Thumb => 2,
        }
    }

    /// Distance between the executing instruction and the value read from R15.
    #[must_use]
    pub const fn pipeline_offset(self) -> u32 {
        self.instruction_size() * 2
    }

    /// Mask clearing the bits below the instruction alignment.
    #[must_use]
    pub const fn alignment_mask(self) -> u32 {
        !(self.instruction_size() - 1)
    }
}

impl From<CpuState> for bool {
    fn from(state: CpuState) -> Self {
        match state {
            CpuState::Arm => false,
            CpuState::Thumb => true,
        }
    }
}

impl From<bool> for CpuState {
    fn from(state: bool) -> Self {
        if state { Self::Thumb } else { Self::Arm }
    }
}
