//! # Exceptions
//!
//! | Exception          | Mode       | Vector | LR                  | Masks |
//! |--------------------|------------|--------|---------------------|-------|
//! | Reset              | Supervisor | `0x00` | -                   | I, F  |
//! | Undefined          | Undefined  | `0x04` | instruction + width | I     |
//! | Software interrupt | Supervisor | `0x08` | instruction + width | I     |
//! | Prefetch abort     | Abort      | `0x0C` | instruction + 4     | I     |
//! | Data abort         | Abort      | `0x10` | instruction + 8     | I     |
//! | IRQ                | IRQ        | `0x18` | next + 4            | I     |
//! | FIQ                | FIQ        | `0x1C` | next + 4            | I, F  |
//!
//! "instruction" is the address of the instruction that raised the exception.
//! Interrupts are taken between instructions, so for them "next" is the
//! address of the instruction that would have executed. Entry always happens
//! in ARM state.

use crate::cpu::cpu_modes::Mode;
use crate::cpu::psr::CpuState;
use crate::cpu::register_bank::RegisterBank;
use crate::cpu::registers::REG_LR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    Reset,
    Undefined,
    SoftwareInterrupt,
    PrefetchAbort,
    DataAbort,
    Irq,
    Fiq,
}

impl Exception {
    #[must_use]
    pub const fn vector(self) -> u32 {
        match self {
            Self::Reset => 0x00,
            Self::Undefined => 0x04,
            Self::SoftwareInterrupt => 0x08,
            Self::PrefetchAbort => 0x0C,
            Self::DataAbort => 0x10,
            Self::Irq => 0x18,
            Self::Fiq => 0x1C,
        }
    }

    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::Reset | Self::SoftwareInterrupt => Mode::Supervisor,
            Self::Undefined => Mode::Undefined,
            Self::PrefetchAbort | Self::DataAbort => Mode::Abort,
            Self::Irq => Mode::Irq,
            Self::Fiq => Mode::Fiq,
        }
    }

    #[must_use]
    pub const fn disables_fiq(self) -> bool {
        matches!(self, Self::Reset | Self::Fiq)
    }

    /// Value of the banked LR on entry, from the address of the instruction
    /// that raised the exception (or would execute next, for interrupts).
    #[must_use]
    pub const fn return_address(self, instruction: u32, state: CpuState) -> u32 {
        let offset = match self {
            Self::Reset => 0,
            Self::Undefined | Self::SoftwareInterrupt => state.instruction_size(),
            Self::PrefetchAbort | Self::Irq | Self::Fiq => 4,
            Self::DataAbort => 8,
        };

        instruction.wrapping_add(offset)
    }
}

impl std::fmt::Display for Exception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reset => f.write_str("reset"),
            Self::Undefined => f.write_str("undefined instruction"),
            Self::SoftwareInterrupt => f.write_str("software interrupt"),
            Self::PrefetchAbort => f.write_str("prefetch abort"),
            Self::DataAbort => f.write_str("data abort"),
            Self::Irq => f.write_str("IRQ"),
            Self::Fiq => f.write_str("FIQ"),
        }
    }
}

impl RegisterBank {
    /// Enters `exception` on behalf of the instruction at
    /// [`current_instruction_address`](Self::current_instruction_address).
    pub fn enter_exception(&mut self, exception: Exception) {
        if exception == Exception::Reset {
            tracing::debug!("entering {exception}");
            self.reset();
            return;
        }

        let old_cpsr = self.cpsr();
        let instruction = self.current_instruction_address();
        let return_address = exception.return_address(instruction, self.cpu_state());

        let mut next = old_cpsr;
        next.set_mode(exception.mode());
        next.set_cpu_state(CpuState::Arm);
        next.set_irq_disable(true);
        if exception.disables_fiq() {
            next.set_fiq_disable(true);
        }

        self.load_status(next);
        self.set_spsr(old_cpsr);
        self.write_general(REG_LR, return_address);
        self.write_program_counter(exception.vector());

        tracing::debug!(
            "entering {exception} from 0x{instruction:08X}, LR=0x{return_address:08X}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::psr::Psr;
    use crate::cpu::registers::REG_PROGRAM_COUNTER;
    use pretty_assertions::assert_eq;

    fn user_bank_at(live_pc: u32, state: CpuState) -> RegisterBank {
        let mut bank = RegisterBank::default();
        let mut cpsr = Psr::from(Mode::User);
        cpsr.set_cpu_state(state);
        cpsr.set_zero_flag(true);
        bank.load_status(cpsr);
        bank.write_program_counter(live_pc.wrapping_sub(state.pipeline_offset()));
        bank
    }

    #[test]
    fn software_interrupt_from_user_mode() {
        let mut bank = user_bank_at(0x108, CpuState::Arm);
        let old_cpsr = bank.cpsr();

        bank.enter_exception(Exception::SoftwareInterrupt);

        assert_eq!(bank.mode(), Mode::Supervisor);
        assert_eq!(bank.current_instruction_address(), 0x8);
        assert_eq!(bank.read(REG_LR), 0x104);
        assert_eq!(bank.spsr(), old_cpsr);
        assert!(bank.cpsr().irq_disable());
        assert!(!bank.cpsr().fiq_disable());
        assert!(bank.cpsr().zero_flag());
    }

    #[test]
    fn undefined_from_thumb_returns_past_the_halfword() {
        let mut bank = user_bank_at(0x204, CpuState::Thumb);

        bank.enter_exception(Exception::Undefined);

        assert_eq!(bank.mode(), Mode::Undefined);
        assert_eq!(bank.cpu_state(), CpuState::Arm);
        assert_eq!(bank.read(REG_LR), 0x202);
        assert_eq!(bank.read(REG_PROGRAM_COUNTER), 0x04 + 8);
        assert!(bank.spsr().state_bit());
    }

    #[test]
    fn aborts_and_interrupts_link_addresses() {
        let cases = [
            (Exception::PrefetchAbort, Mode::Abort, 0x1004),
            (Exception::DataAbort, Mode::Abort, 0x1008),
            (Exception::Irq, Mode::Irq, 0x1004),
            (Exception::Fiq, Mode::Fiq, 0x1004),
        ];

        for (exception, mode, lr) in cases {
            let mut bank = user_bank_at(0x1008, CpuState::Arm);
            bank.enter_exception(exception);

            assert_eq!(bank.mode(), mode, "{exception}");
            assert_eq!(bank.read(REG_LR), lr, "{exception}");
            assert_eq!(bank.current_instruction_address(), exception.vector());
            assert_eq!(bank.cpsr().fiq_disable(), exception == Exception::Fiq);
        }
    }

    #[test]
    fn user_registers_survive_the_exception() {
        let mut bank = user_bank_at(0x108, CpuState::Arm);
        bank.write_general(REG_LR, 0xCAFE);

        bank.enter_exception(Exception::SoftwareInterrupt);
        let mut back = bank.spsr();
        back.set_cpu_state(CpuState::Arm);
        bank.load_status(back);

        assert_eq!(bank.mode(), Mode::User);
        assert_eq!(bank.read(REG_LR), 0xCAFE);
    }

    #[test]
    fn reset_masks_both_interrupts() {
        let mut bank = user_bank_at(0x108, CpuState::Thumb);
        bank.enter_exception(Exception::Reset);

        assert_eq!(bank.mode(), Mode::Supervisor);
        assert!(bank.cpsr().fiq_disable());
        assert_eq!(bank.current_instruction_address(), 0);
    }
}
