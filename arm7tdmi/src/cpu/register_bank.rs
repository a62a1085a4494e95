//! # Register Bank
//!
//! All architectural state of the core: the 16 live registers, the CPSR, the
//! live SPSR and the banked copies belonging to the modes that are not live.
//!
//! ```text
//!             ┌──────────┬───────┬───────┬───────┬───────┬───────┐
//!  bank       │ 0 USR/SYS│ 1 FIQ │ 2 IRQ │ 3 SVC │ 4 ABT │ 5 UND │
//!             ├──────────┼───────┼───────┼───────┼───────┼───────┤
//!  R13, R14   │    x     │   x   │   x   │   x   │   x   │   x   │
//!  SPSR       │    -     │   x   │   x   │   x   │   x   │   x   │
//!  R8-R12     │  shared  │   x   │ shared│ shared│ shared│ shared│
//!             └──────────┴───────┴───────┴───────┴───────┴───────┘
//! ```
//!
//! The live registers always hold the values of the current mode. The
//! outgoing mode's R13/R14/SPSR are parked in its [`Bank`] slot when the mode
//! changes, and FIQ's R8-R12 swap places with everyone else's.
//! [`RegisterBank::load_status`] is the only way to change mode.
//!
//! ## Program counter
//!
//! R15 holds the address of the instruction being executed plus the pipeline
//! offset (8 in ARM state, 4 in Thumb state). Control flow only ever changes
//! through [`RegisterBank::write_program_counter`], which re-applies it.

use serde::{Deserialize, Serialize};

use crate::cpu::cpu_modes::{BANK_COUNT, Mode};
use crate::cpu::psr::{CpuState, Psr};
use crate::cpu::registers::{REG_LR, REG_PROGRAM_COUNTER, REG_SP, Registers};

/// Registers owned by one mode while that mode is not live.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub sp: u32,
    pub lr: u32,
    pub spsr: Psr,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBank {
    registers: Registers,
    cpsr: Psr,
    spsr: Psr,
    banks: [Bank; BANK_COUNT],
    /// R8-R12 of the side (FIQ or non-FIQ) that is not live.
    fiq_swap: [u32; 5],
}

impl RegisterBank {
    #[must_use]
    pub const fn read(&self, reg: usize) -> u32 {
        self.registers.register_at(reg)
    }

    #[must_use]
    pub const fn read_signed(&self, reg: usize) -> i32 {
        self.registers.signed_register_at(reg)
    }

    /// Writes R0-R14 verbatim.
    pub fn write_general(&mut self, reg: usize, value: u32) {
        debug_assert!(reg < REG_PROGRAM_COUNTER, "R{reg} is not a general register");
        self.registers.set_register_at(reg, value);
    }

    /// Redirects execution to `address`, aligned to the current state.
    pub fn write_program_counter(&mut self, address: u32) {
        let state = self.cpu_state();
        self.registers.set_program_counter(
            (address & state.alignment_mask()).wrapping_add(state.pipeline_offset()),
        );
    }

    /// Writes any register, routing R15 through [`Self::write_program_counter`].
    pub fn write_register(&mut self, reg: usize, value: u32) {
        if reg == REG_PROGRAM_COUNTER {
            self.write_program_counter(value);
        } else {
            self.write_general(reg, value);
        }
    }

    /// Address of the instruction being executed.
    #[must_use]
    pub fn current_instruction_address(&self) -> u32 {
        self.registers
            .program_counter()
            .wrapping_sub(self.cpu_state().pipeline_offset())
    }

    /// Address of the instruction following the one being executed.
    #[must_use]
    pub fn next_instruction_address(&self) -> u32 {
        self.registers
            .program_counter()
            .wrapping_sub(self.cpu_state().instruction_size())
    }

    /// Moves past the current instruction.
    pub fn advance(&mut self) {
        let size = self.cpu_state().instruction_size();
        self.registers.advance_program_counter(size);
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    #[must_use]
    pub const fn cpsr(&self) -> Psr {
        self.cpsr
    }

    /// Direct access to the CPSR for flag and state updates.
    ///
    /// The mode bits must not be changed through this reference, use
    /// [`Self::load_status`] for that.
    pub(crate) const fn cpsr_mut(&mut self) -> &mut Psr {
        &mut self.cpsr
    }

    /// The live SPSR. Modes without one (User and System) read the CPSR.
    #[must_use]
    pub fn spsr(&self) -> Psr {
        if self.mode().has_spsr() {
            self.spsr
        } else {
            self.cpsr
        }
    }

    /// Replaces the live SPSR. Ignored in User and System mode.
    pub fn set_spsr(&mut self, value: Psr) {
        if self.mode().has_spsr() {
            self.spsr = value;
        } else {
            tracing::debug!("SPSR write ignored in {} mode", self.mode());
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.cpsr.mode()
    }

    #[must_use]
    pub fn cpu_state(&self) -> CpuState {
        self.cpsr.cpu_state()
    }

    /// Installs `next` as the CPSR, banking registers when the mode changes.
    ///
    /// A `next` value with an unknown mode code keeps the current mode bits.
    pub fn load_status(&mut self, mut next: Psr) {
        if next.try_mode().is_err() {
            tracing::debug!(
                "rejecting mode code 0b{:05b}, staying in {}",
                next.mode_raw(),
                self.mode()
            );
            next.set_mode_raw(self.cpsr.mode_raw());
        }

        let current_mode = self.mode();
        let next_mode = next.mode();

        if current_mode.bank() == next_mode.bank() {
            self.cpsr = next;
            return;
        }

        let outgoing = &mut self.banks[current_mode.bank()];
        outgoing.sp = self.registers.register_at(REG_SP);
        outgoing.lr = self.registers.register_at(REG_LR);
        outgoing.spsr = self.spsr;

        if current_mode == Mode::Fiq || next_mode == Mode::Fiq {
            for (i, parked) in self.fiq_swap.iter_mut().enumerate() {
                let live = self.registers.register_at(8 + i);
                self.registers.set_register_at(8 + i, *parked);
                *parked = live;
            }
        }

        let incoming = self.banks[next_mode.bank()];
        self.registers.set_register_at(REG_SP, incoming.sp);
        self.registers.set_register_at(REG_LR, incoming.lr);
        self.spsr = incoming.spsr;

        self.cpsr = next;

        tracing::debug!("mode switch {current_mode} -> {next_mode}");
    }

    /// The reset exception: Supervisor mode, IRQ and FIQ masked, ARM state,
    /// execution from address 0.
    pub fn reset(&mut self) {
        let mut cpsr = Psr::from(Mode::Supervisor);
        cpsr.set_irq_disable(true);
        cpsr.set_fiq_disable(true);
        cpsr.set_cpu_state(CpuState::Arm);

        self.load_status(cpsr);
        self.write_program_counter(0);
    }
}

impl std::fmt::Display for RegisterBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, value) in self.registers.as_array().iter().enumerate() {
            let sep = if i % 4 == 3 { '\n' } else { ' ' };
            write!(f, "R{i:<2}={value:08X}{sep}")?;
        }
        write!(f, "CPSR={} SPSR={}", self.cpsr, self.spsr())
    }
}
