//! Operation primitives shared by the ARM and Thumb engines.
//!
//! The engines decode operands out of the instruction bits and call into
//! these. Each primitive performs its memory accesses first, then advances
//! the program counter, then writes registers, so a bus fault leaves the
//! program counter on the faulting instruction for the abort handler.
//! Every primitive returns whether program flow was redirected.

use crate::bitwise::Bits;
use crate::cpu::arithmetic::{
    ArithmeticOpResult, add_inner_op, add_with_carry, is_negative_64, is_zero_64, sub_inner_op,
    sub_with_carry,
};
use crate::cpu::arm::alu_instruction::ArmModeAluInstruction;
use crate::cpu::arm7tdmi::Arm7tdmi;
use crate::cpu::cpu_modes::Mode;
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting};
use crate::cpu::psr::{CpuState, FLAGS_MASK, Psr};
use crate::cpu::registers::{REG_LR, REG_PROGRAM_COUNTER};
use crate::memory::{MemoryFault, MemoryPort};

const STATE_BIT_MASK: u32 = 1 << 5;

/// Result of an ALU operation before it is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    pub result: u32,
    pub carry: bool,
    /// `None` for logical operations, which leave V untouched.
    pub overflow: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferWidth {
    Word,
    Byte,
    HalfWord,
    SignedByte,
    SignedHalfWord,
}

/// A single register load or store.
#[derive(Debug, Clone, Copy)]
pub struct DataTransfer {
    pub load_store: LoadStoreKind,
    pub width: TransferWidth,
    pub indexing: Indexing,
    pub offsetting: Offsetting,
    /// Pre-indexed writeback. Post-indexed transfers always write back.
    pub write_back: bool,
    /// Perform the access as if in User mode (LDRT/STRT).
    pub force_user: bool,
    pub base_register: usize,
    pub register: usize,
    pub offset: u32,
}

/// A multiple register load or store.
#[derive(Debug, Clone, Copy)]
pub struct BlockTransfer {
    pub load_store: LoadStoreKind,
    pub indexing: Indexing,
    pub offsetting: Offsetting,
    pub write_back: bool,
    /// The S bit: restore CPSR from SPSR for an LDM including R15,
    /// otherwise transfer the User bank registers.
    pub psr_or_user_bank: bool,
    pub base_register: usize,
    pub register_list: u16,
}

impl<M: MemoryPort> Arm7tdmi<M> {
    pub(crate) fn alu_operation(
        &self,
        alu_instruction: ArmModeAluInstruction,
        op1: u32,
        op2: u32,
        shifter_carry: bool,
    ) -> AluOutput {
        use ArmModeAluInstruction::*;

        let carry = self.registers.cpsr().carry_flag();
        let logical = |result| AluOutput {
            result,
            carry: shifter_carry,
            overflow: None,
        };
        let arithmetic = |r: ArithmeticOpResult| AluOutput {
            result: r.result,
            carry: r.carry,
            overflow: Some(r.overflow),
        };

        match alu_instruction {
            And | Tst => logical(op1 & op2),
            Eor | Teq => logical(op1 ^ op2),
            Orr => logical(op1 | op2),
            Mov => logical(op2),
            Bic => logical(op1 & !op2),
            Mvn => logical(!op2),
            Sub | Cmp => arithmetic(sub_inner_op(op1, op2)),
            Rsb => arithmetic(sub_inner_op(op2, op1)),
            Add | Cmn => arithmetic(add_inner_op(op1, op2)),
            Adc => arithmetic(add_with_carry(op1, op2, carry)),
            Sbc => arithmetic(sub_with_carry(op1, op2, carry)),
            Rsc => arithmetic(sub_with_carry(op2, op1, carry)),
        }
    }

    pub(crate) fn set_alu_flags(&mut self, output: &AluOutput) {
        let cpsr = self.registers.cpsr_mut();
        cpsr.set_nz(output.result);
        cpsr.set_carry_flag(output.carry);
        if let Some(overflow) = output.overflow {
            cpsr.set_overflow_flag(overflow);
        }
    }

    /// CPSR <- SPSR, for modes that have one.
    pub(crate) fn restore_cpsr_from_spsr(&mut self) {
        if self.registers.mode().has_spsr() {
            let spsr = self.registers.spsr();
            self.registers.load_status(spsr);
        } else {
            tracing::debug!(
                "no SPSR to restore in {} mode, CPSR left as is",
                self.registers.mode()
            );
        }
    }

    pub(crate) fn data_processing(
        &mut self,
        alu_instruction: ArmModeAluInstruction,
        set_conditions: bool,
        rd: usize,
        op1: u32,
        op2: u32,
        shifter_carry: bool,
    ) -> bool {
        let output = self.alu_operation(alu_instruction, op1, op2, shifter_carry);

        self.registers.advance();

        if set_conditions {
            if rd == REG_PROGRAM_COUNTER {
                self.restore_cpsr_from_spsr();
            } else {
                self.set_alu_flags(&output);
            }
        }

        if alu_instruction.is_test() {
            return false;
        }

        self.registers.write_register(rd, output.result);

        rd == REG_PROGRAM_COUNTER
    }

    /// MRS
    pub(crate) fn psr_read(&mut self, use_spsr: bool, rd: usize) -> bool {
        let psr = if use_spsr {
            self.registers.spsr()
        } else {
            self.registers.cpsr()
        };

        self.registers.advance();
        self.registers.write_register(rd, psr.into());

        rd == REG_PROGRAM_COUNTER
    }

    /// MSR. `fields` holds the f, s, x and c field bits (bits 3 to 0).
    pub(crate) fn psr_write(&mut self, use_spsr: bool, fields: u32, value: u32) -> bool {
        let mut mask = [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000]
            .into_iter()
            .enumerate()
            .filter(|(bit, _)| fields.get_bit(*bit as u8))
            .fold(0, |mask, (_, byte)| mask | byte);

        if !self.registers.mode().is_privileged() && mask & !FLAGS_MASK != 0 {
            tracing::debug!("MSR control field write ignored in User mode");
            mask &= FLAGS_MASK;
        }

        if use_spsr {
            let old = u32::from(self.registers.spsr());
            self.registers
                .set_spsr(Psr::from((old & !mask) | (value & mask)));
        } else {
            mask &= !STATE_BIT_MASK;
            let old = u32::from(self.registers.cpsr());
            self.registers
                .load_status(Psr::from((old & !mask) | (value & mask)));
        }

        self.registers.advance();

        false
    }

    /// MUL and MLA. Only N and Z are affected.
    pub(crate) fn multiply(
        &mut self,
        set_conditions: bool,
        rd: usize,
        rm: u32,
        rs: u32,
        accumulate: Option<u32>,
    ) -> bool {
        let result = rm.wrapping_mul(rs).wrapping_add(accumulate.unwrap_or(0));

        if set_conditions {
            self.registers.cpsr_mut().set_nz(result);
        }

        self.registers.advance();
        self.registers.write_register(rd, result);

        rd == REG_PROGRAM_COUNTER
    }

    /// UMULL, UMLAL, SMULL and SMLAL.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn multiply_long(
        &mut self,
        set_conditions: bool,
        signed: bool,
        accumulate: bool,
        rdhi: usize,
        rdlo: usize,
        rm: u32,
        rs: u32,
    ) -> bool {
        let product = if signed {
            (i64::from(rm as i32) * i64::from(rs as i32)) as u64
        } else {
            u64::from(rm) * u64::from(rs)
        };

        let addend = if accumulate {
            (u64::from(self.registers.read(rdhi)) << 32) | u64::from(self.registers.read(rdlo))
        } else {
            0
        };

        let result = product.wrapping_add(addend);

        if set_conditions {
            let cpsr = self.registers.cpsr_mut();
            cpsr.set_sign_flag(is_negative_64(result));
            cpsr.set_zero_flag(is_zero_64(result));
        }

        self.registers.advance();
        self.registers.write_register(rdlo, result as u32);
        self.registers.write_register(rdhi, (result >> 32) as u32);

        rdlo == REG_PROGRAM_COUNTER || rdhi == REG_PROGRAM_COUNTER
    }

    /// SWP and SWPB. The read completes before the write.
    pub(crate) fn single_data_swap(
        &mut self,
        byte: bool,
        rn: usize,
        rd: usize,
        rm: usize,
    ) -> Result<bool, MemoryFault> {
        let address = self.registers.read(rn);
        let source = self.registers.read(rm);

        let value = if byte {
            let value = self.read_byte(address)?;
            self.write_byte(address, source as u8)?;
            u32::from(value)
        } else {
            let value = self.read_word(address)?;
            self.write_word(address, source)?;
            value
        };

        self.registers.advance();
        self.registers.write_register(rd, value);

        Ok(rd == REG_PROGRAM_COUNTER)
    }

    /// B and BL (ARM) as well as the Thumb single-instruction branches.
    pub(crate) fn branch(&mut self, offset: i32, link: bool) -> bool {
        let target = self
            .registers
            .read(REG_PROGRAM_COUNTER)
            .wrapping_add_signed(offset);

        if link {
            let return_address = self.registers.next_instruction_address();
            self.registers.write_general(REG_LR, return_address);
        }

        self.registers.write_program_counter(target);

        true
    }

    /// BX: bit 0 of the target selects the instruction set.
    pub(crate) fn branch_and_exchange(&mut self, target: u32) -> bool {
        let state = CpuState::from(target.get_bit(0));
        self.registers.cpsr_mut().set_cpu_state(state);
        self.registers.write_program_counter(target);

        true
    }

    /// LDR/STR in all widths and addressing modes.
    pub(crate) fn data_transfer(&mut self, transfer: DataTransfer) -> Result<bool, MemoryFault> {
        let rn = transfer.base_register;
        let rd = transfer.register;

        // Thumb reads the PC word aligned; ARM's is aligned already.
        let base = if rn == REG_PROGRAM_COUNTER {
            self.registers.read(rn) & !0b11
        } else {
            self.registers.read(rn)
        };

        let offset_address = transfer.offsetting.apply(base, transfer.offset);
        let (address, write_back) = match transfer.indexing {
            Indexing::Pre => (offset_address, transfer.write_back),
            Indexing::Post => (base, true),
        };

        match transfer.load_store {
            LoadStoreKind::Load => {
                let value = self.with_user_bank(transfer.force_user, |cpu| {
                    cpu.load(transfer.width, address)
                })?;

                self.registers.advance();
                if write_back {
                    self.registers.write_register(rn, offset_address);
                }
                self.registers.write_register(rd, value);

                Ok(rd == REG_PROGRAM_COUNTER || (write_back && rn == REG_PROGRAM_COUNTER))
            }
            LoadStoreKind::Store => {
                let value = if rd == REG_PROGRAM_COUNTER {
                    self.registers.read(rd).wrapping_add(4)
                } else {
                    self.registers.read(rd)
                };

                self.with_user_bank(transfer.force_user, |cpu| {
                    cpu.store(transfer.width, address, value)
                })?;

                self.registers.advance();
                if write_back {
                    self.registers.write_register(rn, offset_address);
                }

                Ok(write_back && rn == REG_PROGRAM_COUNTER)
            }
        }
    }

    fn load(&mut self, width: TransferWidth, address: u32) -> Result<u32, MemoryFault> {
        Ok(match width {
            TransferWidth::Word => self.read_word(address)?,
            TransferWidth::Byte => u32::from(self.read_byte(address)?),
            TransferWidth::HalfWord => u32::from(self.read_half_word(address)?),
            TransferWidth::SignedByte => u32::from(self.read_byte(address)?).sign_extended(8),
            TransferWidth::SignedHalfWord => {
                u32::from(self.read_half_word(address)?).sign_extended(16)
            }
        })
    }

    fn store(&mut self, width: TransferWidth, address: u32, value: u32) -> Result<(), MemoryFault> {
        match width {
            TransferWidth::Word => self.write_word(address, value),
            TransferWidth::Byte | TransferWidth::SignedByte => self.write_byte(address, value as u8),
            TransferWidth::HalfWord | TransferWidth::SignedHalfWord => {
                self.write_half_word(address, value as u16)
            }
        }
    }

    /// LDM/STM. Registers are transferred in increasing order, lowest
    /// register at the lowest address, whatever the direction.
    pub(crate) fn block_data_transfer(
        &mut self,
        transfer: BlockTransfer,
    ) -> Result<bool, MemoryFault> {
        let rn = transfer.base_register;
        let base = self.registers.read(rn);

        // An empty list transfers R15 and moves the base by 16 words.
        let (register_list, count) = match transfer.register_list {
            0 => (1_u16 << 15, 16),
            list => (list, list.count_ones()),
        };
        let size = count * 4;

        let (start, final_base) = match (transfer.offsetting, transfer.indexing) {
            (Offsetting::Up, Indexing::Pre) => (base.wrapping_add(4), base.wrapping_add(size)),
            (Offsetting::Up, Indexing::Post) => (base, base.wrapping_add(size)),
            (Offsetting::Down, Indexing::Pre) => (base.wrapping_sub(size), base.wrapping_sub(size)),
            (Offsetting::Down, Indexing::Post) => (
                base.wrapping_sub(size).wrapping_add(4),
                base.wrapping_sub(size),
            ),
        };

        let includes_pc = register_list.get_bit(15);
        let registers = (0..16_usize).filter(|&r| register_list.get_bit(r as u8));

        match transfer.load_store {
            LoadStoreKind::Load => {
                let user_bank = transfer.psr_or_user_bank && !includes_pc;
                let mut loaded = [0_u32; 16];
                let mut address = start;

                for reg in registers.clone() {
                    loaded[reg] = self.memory.read_word(address & !0b11)?;
                    address = address.wrapping_add(4);
                }

                self.registers.advance();
                self.with_user_bank(user_bank, |cpu| {
                    for reg in registers.filter(|&r| r != REG_PROGRAM_COUNTER) {
                        cpu.registers.write_general(reg, loaded[reg]);
                    }
                });
                let new_pc = includes_pc.then_some(loaded[REG_PROGRAM_COUNTER]);

                // A loaded base wins over writeback.
                if transfer.write_back && !register_list.get_bit(rn as u8) {
                    self.registers.write_register(rn, final_base);
                }

                match new_pc {
                    Some(pc) => {
                        if transfer.psr_or_user_bank {
                            self.restore_cpsr_from_spsr();
                        }
                        self.registers.write_program_counter(pc);
                        Ok(true)
                    }
                    None => Ok(transfer.write_back && rn == REG_PROGRAM_COUNTER),
                }
            }
            LoadStoreKind::Store => {
                let user_bank = transfer.psr_or_user_bank;
                let mut address = start;

                for (i, reg) in registers.enumerate() {
                    let value = if reg == REG_PROGRAM_COUNTER {
                        self.registers.read(reg).wrapping_add(4)
                    } else {
                        self.with_user_bank(user_bank, |cpu| cpu.registers.read(reg))
                    };
                    self.write_word(address, value)?;

                    // The base is updated after the first transfer, so a base
                    // that is not first in the list is stored updated.
                    if i == 0 && transfer.write_back && rn != REG_PROGRAM_COUNTER {
                        self.registers.write_general(rn, final_base);
                    }
                    address = address.wrapping_add(4);
                }

                self.registers.advance();

                Ok(false)
            }
        }
    }

    /// Runs `access` with the User mode registers live when `enabled`.
    fn with_user_bank<T>(&mut self, enabled: bool, access: impl FnOnce(&mut Self) -> T) -> T {
        if !enabled {
            return access(self);
        }

        let saved = self.registers.cpsr();
        let mut user = saved;
        user.set_mode(Mode::User);

        self.registers.load_status(user);
        let result = access(self);
        self.registers.load_status(saved);

        result
    }
}
