//! # The ARM7TDMI core
//!
//! [`Arm7tdmi`] owns the [`RegisterBank`] and a [`MemoryPort`]. The host
//! drives it one instruction at a time, either with [`Arm7tdmi::step`]
//! (fetch, classify, execute) or by handing raw instruction bits to
//! [`Arm7tdmi::execute_arm`] and [`Arm7tdmi::execute_thumb`].
//!
//! Every instruction either completes and advances the program counter,
//! redirects it, or enters an exception. Bus failures never escape an
//! instruction: they become aborts.

use crate::cpu::arm::instructions::ArmInstruction;
use crate::cpu::arm::mode::ArmModeOpcode;
use crate::cpu::exception::Exception;
use crate::cpu::psr::CpuState;
use crate::cpu::register_bank::RegisterBank;
use crate::cpu::thumb::instruction::ThumbInstruction;
use crate::cpu::thumb::mode::ThumbModeOpcode;
use crate::memory::{MemoryFault, MemoryPort};

pub struct Arm7tdmi<M> {
    pub registers: RegisterBank,
    pub memory: M,
}

impl<M: MemoryPort> Arm7tdmi<M> {
    /// A core that has just gone through the reset exception.
    pub fn new(memory: M) -> Self {
        let mut registers = RegisterBank::default();
        registers.reset();

        Self { registers, memory }
    }

    /// A core resuming from previously saved registers.
    pub const fn with_registers(registers: RegisterBank, memory: M) -> Self {
        Self { registers, memory }
    }

    /// Fetches, classifies and executes the instruction at the current
    /// address. Returns whether program flow was redirected.
    pub fn step(&mut self) -> bool {
        let address = self.registers.current_instruction_address();

        match self.registers.cpu_state() {
            CpuState::Arm => match self.memory.read_word(address) {
                Ok(op_code) => self.execute_arm(op_code),
                Err(fault) => self.prefetch_abort(fault),
            },
            CpuState::Thumb => match self.memory.read_half_word(address) {
                Ok(op_code) => self.execute_thumb(op_code),
                Err(fault) => self.prefetch_abort(fault),
            },
        }
    }

    /// Executes one ARM instruction. Returns whether program flow was
    /// redirected.
    pub fn execute_arm(&mut self, op_code: u32) -> bool {
        self.execute_arm_opcode(ArmModeOpcode::from(op_code))
    }

    /// Executes an already classified ARM instruction.
    pub fn execute_arm_opcode(&mut self, op_code: ArmModeOpcode) -> bool {
        #[cfg(feature = "log_instructions")]
        tracing::trace!(
            "{:08X}: {:08X} {}",
            self.registers.current_instruction_address(),
            op_code.raw,
            op_code.instruction
        );

        if !self.registers.cpsr().can_execute(op_code.condition) {
            self.registers.advance();
            return false;
        }

        use ArmInstruction::*;
        let outcome = match op_code.instruction {
            DataProcessing => Ok(self.arm_data_processing(&op_code)),
            PsrRead => Ok(self.arm_psr_read(&op_code)),
            PsrWrite => Ok(self.arm_psr_write(&op_code)),
            Multiply => Ok(self.arm_multiply(&op_code)),
            MultiplyLong => Ok(self.arm_multiply_long(&op_code)),
            SingleDataSwap => self.arm_single_data_swap(&op_code),
            BranchAndExchange => Ok(self.arm_branch_and_exchange(&op_code)),
            HalfwordDataTransfer => self.arm_halfword_data_transfer(&op_code),
            SingleDataTransfer => self.arm_single_data_transfer(&op_code),
            BlockDataTransfer => self.arm_block_data_transfer(&op_code),
            Branch => Ok(self.arm_branch(&op_code)),
            CoprocessorDataTransfer | CoprocessorDataOperation | CoprocessorRegisterTransfer
            | Undefined => Ok(self.raise_exception(Exception::Undefined)),
            SoftwareInterrupt => Ok(self.raise_exception(Exception::SoftwareInterrupt)),
        };

        outcome.unwrap_or_else(|fault| self.data_abort(fault))
    }

    /// Executes one Thumb instruction. Returns whether program flow was
    /// redirected.
    pub fn execute_thumb(&mut self, op_code: u16) -> bool {
        self.execute_thumb_opcode(ThumbModeOpcode::from(op_code))
    }

    /// Executes an already classified Thumb instruction.
    pub fn execute_thumb_opcode(&mut self, op_code: ThumbModeOpcode) -> bool {
        #[cfg(feature = "log_instructions")]
        tracing::trace!(
            "{:08X}: {:04X} {}",
            self.registers.current_instruction_address(),
            op_code.raw,
            op_code.instruction
        );

        use ThumbInstruction::*;
        let outcome = match op_code.instruction {
            MoveShiftedRegister => Ok(self.thumb_move_shifted_register(&op_code)),
            AddSubtract => Ok(self.thumb_add_subtract(&op_code)),
            MoveCompareAddSubtractImm => Ok(self.thumb_move_compare_add_sub_imm(&op_code)),
            AluOp => Ok(self.thumb_alu_op(&op_code)),
            HiRegisterOpBX => Ok(self.thumb_hi_register_op_bx(&op_code)),
            PCRelativeLoad => self.thumb_pc_relative_load(&op_code),
            LoadStoreRegisterOffset => self.thumb_load_store_register_offset(&op_code),
            LoadStoreSignExtByteHalfword => self.thumb_load_store_sign_extended(&op_code),
            LoadStoreImmOffset => self.thumb_load_store_immediate_offset(&op_code),
            LoadStoreHalfword => self.thumb_load_store_halfword(&op_code),
            SPRelativeLoadStore => self.thumb_sp_relative_load_store(&op_code),
            LoadAddress => Ok(self.thumb_load_address(&op_code)),
            AddOffsetSP => Ok(self.thumb_add_offset_sp(&op_code)),
            PushPopReg => self.thumb_push_pop(&op_code),
            MultipleLoadStore => self.thumb_multiple_load_store(&op_code),
            CondBranch => Ok(self.thumb_conditional_branch(&op_code)),
            Swi => Ok(self.raise_exception(Exception::SoftwareInterrupt)),
            UncondBranch => Ok(self.thumb_unconditional_branch(&op_code)),
            LongBranchLink => Ok(self.thumb_long_branch_link(&op_code)),
            Undefined => Ok(self.raise_exception(Exception::Undefined)),
        };

        outcome.unwrap_or_else(|fault| self.data_abort(fault))
    }

    /// Enters `exception` for the instruction at the current address.
    /// Always redirects program flow.
    pub fn raise_exception(&mut self, exception: Exception) -> bool {
        self.registers.enter_exception(exception);
        true
    }

    /// Takes an IRQ or FIQ between two instructions, unless it is masked.
    /// Returns whether the interrupt was taken.
    pub fn request_interrupt(&mut self, exception: Exception) -> bool {
        let cpsr = self.registers.cpsr();
        let masked = match exception {
            Exception::Irq => cpsr.irq_disable(),
            Exception::Fiq => cpsr.fiq_disable(),
            _ => {
                tracing::debug!("{exception} is not an interrupt, request ignored");
                return false;
            }
        };

        if masked {
            return false;
        }

        self.raise_exception(exception)
    }

    fn data_abort(&mut self, fault: MemoryFault) -> bool {
        tracing::warn!(
            "{fault} at instruction 0x{:08X}, entering data abort",
            self.registers.current_instruction_address()
        );
        self.raise_exception(Exception::DataAbort)
    }

    fn prefetch_abort(&mut self, fault: MemoryFault) -> bool {
        tracing::warn!("fetch {fault}, entering prefetch abort");
        self.raise_exception(Exception::PrefetchAbort)
    }

    /// Word load as seen by the core: the bus is asked for the aligned word,
    /// which is then rotated so the addressed byte ends up in bits 0-7.
    pub fn read_word(&mut self, address: u32) -> Result<u32, MemoryFault> {
        let value = self.memory.read_word(address & !0b11)?;
        Ok(value.rotate_right((address & 0b11) * 8))
    }

    pub fn read_half_word(&mut self, address: u32) -> Result<u16, MemoryFault> {
        self.memory.read_half_word(address & !0b1)
    }

    pub fn read_byte(&mut self, address: u32) -> Result<u8, MemoryFault> {
        self.memory.read_byte(address)
    }

    pub fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryFault> {
        self.memory.write_word(address & !0b11, value)
    }

    pub fn write_half_word(&mut self, address: u32, value: u16) -> Result<(), MemoryFault> {
        self.memory.write_half_word(address & !0b1, value)
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryFault> {
        self.memory.write_byte(address, value)
    }
}

impl<M> std::fmt::Display for Arm7tdmi<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.registers)
    }
}
