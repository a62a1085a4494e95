//! Thumb format handlers.
//!
//! Each handler pulls its fields out of the 16-bit encoding and runs the
//! equivalent ARM primitive with 32-bit operands.

use crate::bitwise::Bits;
use crate::cpu::arm::alu_instruction::{ArmModeAluInstruction, shift, shift_immediate};
use crate::cpu::arm::operations::{BlockTransfer, DataTransfer, TransferWidth};
use crate::cpu::arm7tdmi::Arm7tdmi;
use crate::cpu::condition::Condition;
use crate::cpu::flags::{Indexing, LoadStoreKind, Offsetting, ReadWriteKind, ShiftKind};
use crate::cpu::registers::{REG_LR, REG_PROGRAM_COUNTER, REG_SP};
use crate::cpu::thumb::alu_instructions::{
    ThumbAluKind, ThumbHighRegisterOperation, ThumbModeAluInstruction,
};
use crate::cpu::thumb::mode::ThumbModeOpcode;
use crate::memory::{MemoryFault, MemoryPort};

/// Reads a 3-bit register field.
fn low_register(op_code: u16, lsb: u8) -> usize {
    usize::from(op_code.get_bits(lsb..=lsb + 2))
}

/// A pre-indexed transfer without writeback, the only kind Thumb has.
const fn offset_transfer(
    load_store: LoadStoreKind,
    width: TransferWidth,
    base_register: usize,
    register: usize,
    offset: u32,
) -> DataTransfer {
    DataTransfer {
        load_store,
        width,
        indexing: Indexing::Pre,
        offsetting: Offsetting::Up,
        write_back: false,
        force_user: false,
        base_register,
        register,
        offset,
    }
}

impl<M: MemoryPort> Arm7tdmi<M> {
    fn carry(&self) -> bool {
        self.registers.cpsr().carry_flag()
    }

    pub(crate) fn thumb_move_shifted_register(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let kind = ShiftKind::from(u32::from(op_code.get_bits(11..=12)));
        let offset5 = u32::from(op_code.get_bits(6..=10));
        let rs = self.registers.read(low_register(**op_code, 3));
        let rd = low_register(**op_code, 0);

        let r = shift_immediate(kind, offset5, rs, self.carry());

        self.data_processing(ArmModeAluInstruction::Mov, true, rd, 0, r.result, r.carry)
    }

    pub(crate) fn thumb_add_subtract(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let immediate = op_code.get_bit(10);
        let alu_instruction = if op_code.get_bit(9) {
            ArmModeAluInstruction::Sub
        } else {
            ArmModeAluInstruction::Add
        };
        let rn_offset3 = low_register(**op_code, 6);
        let rs = self.registers.read(low_register(**op_code, 3));
        let rd = low_register(**op_code, 0);

        let op2 = if immediate {
            rn_offset3 as u32
        } else {
            self.registers.read(rn_offset3)
        };

        self.data_processing(alu_instruction, true, rd, rs, op2, self.carry())
    }

    pub(crate) fn thumb_move_compare_add_sub_imm(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let alu_instruction = match op_code.get_bits(11..=12) {
            0 => ArmModeAluInstruction::Mov,
            1 => ArmModeAluInstruction::Cmp,
            2 => ArmModeAluInstruction::Add,
            _ => ArmModeAluInstruction::Sub,
        };
        let rd = low_register(**op_code, 8);
        let offset8 = u32::from(op_code.get_bits(0..=7));

        let rd_value = self.registers.read(rd);
        self.data_processing(alu_instruction, true, rd, rd_value, offset8, self.carry())
    }

    pub(crate) fn thumb_alu_op(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let alu_operation = ThumbModeAluInstruction::from(op_code.get_bits(6..=9));
        let rs = self.registers.read(low_register(**op_code, 3));
        let rd = low_register(**op_code, 0);
        let rd_value = self.registers.read(rd);
        let carry = self.carry();

        match alu_operation.kind() {
            ThumbAluKind::DataProcessing(alu_instruction) => {
                self.data_processing(alu_instruction, true, rd, rd_value, rs, carry)
            }
            ThumbAluKind::Shift(kind) => {
                let r = shift(kind, rs & 0xFF, rd_value, carry);
                self.data_processing(ArmModeAluInstruction::Mov, true, rd, 0, r.result, r.carry)
            }
            ThumbAluKind::Negate => {
                self.data_processing(ArmModeAluInstruction::Rsb, true, rd, rs, 0, carry)
            }
            ThumbAluKind::Multiply => self.multiply(true, rd, rd_value, rs, None),
        }
    }

    pub(crate) fn thumb_hi_register_op_bx(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let operation = ThumbHighRegisterOperation::from(op_code.get_bits(8..=9));
        let rs = usize::from(op_code.get_bits(3..=6));
        let rd = low_register(**op_code, 0) | (usize::from(op_code.get_bit(7)) << 3);

        let rs_value = self.registers.read(rs);
        let rd_value = self.registers.read(rd);
        let carry = self.carry();

        match operation {
            ThumbHighRegisterOperation::Add => {
                self.data_processing(ArmModeAluInstruction::Add, false, rd, rd_value, rs_value, carry)
            }
            ThumbHighRegisterOperation::Cmp => {
                // Only CMP sets flags here, and a PC operand must not restore the SPSR.
                let output = self.alu_operation(ArmModeAluInstruction::Cmp, rd_value, rs_value, carry);
                self.set_alu_flags(&output);
                self.registers.advance();
                false
            }
            ThumbHighRegisterOperation::Mov => {
                self.data_processing(ArmModeAluInstruction::Mov, false, rd, 0, rs_value, carry)
            }
            ThumbHighRegisterOperation::Bx => self.branch_and_exchange(rs_value),
        }
    }

    pub(crate) fn thumb_pc_relative_load(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let rd = low_register(**op_code, 8);
        let offset = u32::from(op_code.get_bits(0..=7)) << 2;

        self.data_transfer(offset_transfer(
            LoadStoreKind::Load,
            TransferWidth::Word,
            REG_PROGRAM_COUNTER,
            rd,
            offset,
        ))
    }

    pub(crate) fn thumb_load_store_register_offset(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let load_store = LoadStoreKind::from(op_code.get_bit(11));
        let width = match ReadWriteKind::from(op_code.get_bit(10)) {
            ReadWriteKind::Word => TransferWidth::Word,
            ReadWriteKind::Byte => TransferWidth::Byte,
        };
        let offset = self.registers.read(low_register(**op_code, 6));

        self.data_transfer(offset_transfer(
            load_store,
            width,
            low_register(**op_code, 3),
            low_register(**op_code, 0),
            offset,
        ))
    }

    pub(crate) fn thumb_load_store_sign_extended(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let (load_store, width) = match (op_code.get_bit(10), op_code.get_bit(11)) {
            (false, false) => (LoadStoreKind::Store, TransferWidth::HalfWord),
            (false, true) => (LoadStoreKind::Load, TransferWidth::HalfWord),
            (true, false) => (LoadStoreKind::Load, TransferWidth::SignedByte),
            (true, true) => (LoadStoreKind::Load, TransferWidth::SignedHalfWord),
        };
        let offset = self.registers.read(low_register(**op_code, 6));

        self.data_transfer(offset_transfer(
            load_store,
            width,
            low_register(**op_code, 3),
            low_register(**op_code, 0),
            offset,
        ))
    }

    pub(crate) fn thumb_load_store_immediate_offset(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let load_store = LoadStoreKind::from(op_code.get_bit(11));
        let offset5 = u32::from(op_code.get_bits(6..=10));

        let (width, offset) = match ReadWriteKind::from(op_code.get_bit(12)) {
            ReadWriteKind::Word => (TransferWidth::Word, offset5 << 2),
            ReadWriteKind::Byte => (TransferWidth::Byte, offset5),
        };

        self.data_transfer(offset_transfer(
            load_store,
            width,
            low_register(**op_code, 3),
            low_register(**op_code, 0),
            offset,
        ))
    }

    pub(crate) fn thumb_load_store_halfword(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let load_store = LoadStoreKind::from(op_code.get_bit(11));
        let offset = u32::from(op_code.get_bits(6..=10)) << 1;

        self.data_transfer(offset_transfer(
            load_store,
            TransferWidth::HalfWord,
            low_register(**op_code, 3),
            low_register(**op_code, 0),
            offset,
        ))
    }

    pub(crate) fn thumb_sp_relative_load_store(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let load_store = LoadStoreKind::from(op_code.get_bit(11));
        let rd = low_register(**op_code, 8);
        let offset = u32::from(op_code.get_bits(0..=7)) << 2;

        self.data_transfer(offset_transfer(
            load_store,
            TransferWidth::Word,
            REG_SP,
            rd,
            offset,
        ))
    }

    pub(crate) fn thumb_load_address(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let rd = low_register(**op_code, 8);
        let offset = u32::from(op_code.get_bits(0..=7)) << 2;

        let base = if op_code.get_bit(11) {
            self.registers.read(REG_SP)
        } else {
            self.registers.read(REG_PROGRAM_COUNTER) & !0b11
        };

        self.registers.advance();
        self.registers.write_general(rd, base.wrapping_add(offset));

        false
    }

    pub(crate) fn thumb_add_offset_sp(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let offset = u32::from(op_code.get_bits(0..=6)) << 2;
        let offsetting = Offsetting::from(!op_code.get_bit(7));

        let sp = offsetting.apply(self.registers.read(REG_SP), offset);

        self.registers.advance();
        self.registers.write_general(REG_SP, sp);

        false
    }

    /// PUSH is `STMDB sp!`, POP is `LDMIA sp!`. R adds LR to a push and
    /// PC to a pop.
    pub(crate) fn thumb_push_pop(&mut self, op_code: &ThumbModeOpcode) -> Result<bool, MemoryFault> {
        let load_store = LoadStoreKind::from(op_code.get_bit(11));
        let mut register_list = op_code.get_bits(0..=7);

        let (indexing, offsetting, extra_register) = match load_store {
            LoadStoreKind::Store => (Indexing::Pre, Offsetting::Down, REG_LR),
            LoadStoreKind::Load => (Indexing::Post, Offsetting::Up, REG_PROGRAM_COUNTER),
        };
        if op_code.get_bit(8) {
            register_list.set_bit(extra_register as u8, true);
        }

        self.block_data_transfer(BlockTransfer {
            load_store,
            indexing,
            offsetting,
            write_back: true,
            psr_or_user_bank: false,
            base_register: REG_SP,
            register_list,
        })
    }

    pub(crate) fn thumb_multiple_load_store(
        &mut self,
        op_code: &ThumbModeOpcode,
    ) -> Result<bool, MemoryFault> {
        self.block_data_transfer(BlockTransfer {
            load_store: LoadStoreKind::from(op_code.get_bit(11)),
            indexing: Indexing::Post,
            offsetting: Offsetting::Up,
            write_back: true,
            psr_or_user_bank: false,
            base_register: low_register(**op_code, 8),
            register_list: op_code.get_bits(0..=7),
        })
    }

    pub(crate) fn thumb_conditional_branch(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let condition = Condition::from(op_code.get_bits(8..=11) as u8);

        if !self.registers.cpsr().can_execute(condition) {
            self.registers.advance();
            return false;
        }

        let offset = (u32::from(op_code.get_bits(0..=7)).sign_extended(8) << 1) as i32;
        self.branch(offset, false)
    }

    pub(crate) fn thumb_unconditional_branch(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let offset = (u32::from(op_code.get_bits(0..=10)).sign_extended(11) << 1) as i32;
        self.branch(offset, false)
    }

    pub(crate) fn thumb_long_branch_link(&mut self, op_code: &ThumbModeOpcode) -> bool {
        let offset = u32::from(op_code.get_bits(0..=10));

        if op_code.get_bit(11) {
            let target = self.registers.read(REG_LR).wrapping_add(offset << 1);
            let return_address = self.registers.next_instruction_address() | 1;

            self.registers.write_general(REG_LR, return_address);
            self.registers.write_program_counter(target);

            true
        } else {
            let high = offset.sign_extended(11) << 12;
            let lr = self.registers.read(REG_PROGRAM_COUNTER).wrapping_add(high);

            self.registers.advance();
            self.registers.write_general(REG_LR, lr);

            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::cpu_modes::Mode;
    use crate::cpu::exception::Exception;
    use crate::cpu::psr::{CpuState, Psr};
    use crate::memory::FlatMemory;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    fn thumb_cpu_at(address: u32) -> Arm7tdmi<FlatMemory> {
        let mut cpu = Arm7tdmi::new(FlatMemory::new(0x400));
        let mut cpsr = Psr::from(Mode::User);
        cpsr.set_cpu_state(CpuState::Thumb);
        cpu.registers.load_status(cpsr);
        cpu.registers.write_program_counter(address);
        cpu
    }

    #[test]
    fn check_move_compare_add_sub_imm() {
        let mut cpu = thumb_cpu_at(0x100);

        // MOV r2, #0
        cpu.execute_thumb(0b001_00_010_0000_0000);
        assert!(cpu.registers.cpsr().zero_flag());

        // ADD r2, #200
        cpu.execute_thumb(0b001_10_010_1100_1000);
        assert_eq!(cpu.registers.read(2), 200);

        // CMP r2, #200
        cpu.execute_thumb(0b001_01_010_1100_1000);
        assert!(cpu.registers.cpsr().zero_flag());
        assert!(cpu.registers.cpsr().carry_flag());

        // SUB r2, #201
        cpu.execute_thumb(0b001_11_010_1100_1001);
        assert_eq!(cpu.registers.read(2), 0xFFFF_FFFF);
        assert!(cpu.registers.cpsr().sign_flag());
        assert!(!cpu.registers.cpsr().carry_flag());

        assert_eq!(cpu.registers.current_instruction_address(), 0x108);
    }

    #[test]
    fn check_move_shifted_register() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(1, 0x8000_0003);

        // LSR r2, r1, #2
        cpu.execute_thumb(0b000_01_00010_001_010);
        assert_eq!(cpu.registers.read(2), 0x2000_0000);
        assert!(cpu.registers.cpsr().carry_flag());

        // ASR r2, r1, #0 (shift by 32)
        cpu.execute_thumb(0b000_10_00000_001_010);
        assert_eq!(cpu.registers.read(2), 0xFFFF_FFFF);
        assert!(cpu.registers.cpsr().sign_flag());
    }

    #[test]
    fn check_add_subtract() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(1, 0x7FFF_FFFF);
        cpu.registers.write_general(3, 1);

        // ADD r2, r1, r3
        cpu.execute_thumb(0b0001_1_0_0_011_001_010);
        assert_eq!(cpu.registers.read(2), 0x8000_0000);
        assert!(cpu.registers.cpsr().overflow_flag());

        // SUB r2, r1, #7
        cpu.execute_thumb(0b0001_1_1_1_111_001_010);
        assert_eq!(cpu.registers.read(2), 0x7FFF_FFF8);
        assert!(!cpu.registers.cpsr().overflow_flag());
    }

    #[test]
    fn check_alu_operations() {
        let mut rng = rand::thread_rng();
        let (a, b) = (rng.r#gen::<u32>(), rng.r#gen::<u32>());

        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(0, a);
        cpu.registers.write_general(1, b);

        // MUL r0, r1
        cpu.execute_thumb(0b010000_1101_001_000);
        assert_eq!(cpu.registers.read(0), a.wrapping_mul(b));

        // NEG r2, r1
        cpu.execute_thumb(0b010000_1001_001_010);
        assert_eq!(cpu.registers.read(2), b.wrapping_neg());

        // BIC r0, r0 clears everything
        cpu.execute_thumb(0b010000_1110_000_000);
        assert_eq!(cpu.registers.read(0), 0);
        assert!(cpu.registers.cpsr().zero_flag());
    }

    #[test]
    fn check_register_shift_by_more_than_32() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(0, 0xFFFF_FFFF);
        cpu.registers.write_general(1, 33);

        // LSL r0, r1
        cpu.execute_thumb(0b010000_0010_001_000);

        assert_eq!(cpu.registers.read(0), 0);
        assert!(!cpu.registers.cpsr().carry_flag());
        assert!(cpu.registers.cpsr().zero_flag());
    }

    #[test]
    fn check_hi_register_operations() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(8, 0x10);

        // MOV r0, r8
        cpu.execute_thumb(0b010001_10_0_1_000_000);
        assert_eq!(cpu.registers.read(0), 0x10);

        // ADD r8, r0
        cpu.execute_thumb(0b010001_00_1_0_000_000);
        assert_eq!(cpu.registers.read(8), 0x20);

        // CMP r8, r8
        cpu.execute_thumb(0b010001_01_1_1_000_000);
        assert!(cpu.registers.cpsr().zero_flag());

        // MOV pc, r8
        assert!(cpu.execute_thumb(0b010001_10_1_1_000_111));
        assert_eq!(cpu.registers.current_instruction_address(), 0x20);
    }

    #[test]
    fn check_bx_to_arm() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(REG_LR, 0x202);

        // BX lr
        assert!(cpu.execute_thumb(0b010001_11_0_1_110_000));

        assert_eq!(cpu.registers.cpu_state(), CpuState::Arm);
        assert_eq!(cpu.registers.current_instruction_address(), 0x200);
    }

    #[test]
    fn check_pc_relative_load_aligns_pc() {
        let mut cpu = thumb_cpu_at(0x102);
        cpu.memory.write_word(0x108, 0xCAFE_BABE).unwrap();

        // LDR r0, [pc, #4]: (0x106 & !3) + 4
        cpu.execute_thumb(0b01001_000_0000_0001);

        assert_eq!(cpu.registers.read(0), 0xCAFE_BABE);
    }

    #[test]
    fn check_loads_and_stores() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(1, 0x40);
        cpu.registers.write_general(2, 0x4);
        cpu.registers.write_general(0, 0x0000_80F0);

        // STR r0, [r1, r2]
        cpu.execute_thumb(0b0101_00_0_010_001_000);
        assert_eq!(cpu.memory.read_word(0x44).unwrap(), 0x80F0);

        // LDSB r3, [r1, r2]
        cpu.execute_thumb(0b0101_01_1_010_001_011);
        assert_eq!(cpu.registers.read(3), 0xFFFF_FFF0);

        // LDSH r3, [r1, r2]
        cpu.execute_thumb(0b0101_11_1_010_001_011);
        assert_eq!(cpu.registers.read(3), 0xFFFF_80F0);

        // STRH r0, [r1, #2]
        cpu.execute_thumb(0b1000_0_00001_001_000);
        assert_eq!(cpu.memory.read_half_word(0x42).unwrap(), 0x80F0);

        // LDRB r4, [r1, #5]
        cpu.execute_thumb(0b011_1_1_00101_001_100);
        assert_eq!(cpu.registers.read(4), 0x80);

        // LDR r5, [r1, #4]
        cpu.execute_thumb(0b011_0_1_00001_001_101);
        assert_eq!(cpu.registers.read(5), 0x80F0);
    }

    #[test]
    fn check_sp_relative_and_load_address() {
        let mut cpu = thumb_cpu_at(0x102);
        cpu.registers.write_general(REG_SP, 0x200);
        cpu.registers.write_general(0, 0x77);

        // STR r0, [sp, #8]
        cpu.execute_thumb(0b1001_0_000_0000_0010);
        assert_eq!(cpu.memory.read_word(0x208).unwrap(), 0x77);

        // ADD r1, sp, #8
        cpu.execute_thumb(0b1010_1_001_0000_0010);
        assert_eq!(cpu.registers.read(1), 0x208);

        // ADD r2, pc, #4 at 0x106: (0x10A & !3) + 4
        cpu.execute_thumb(0b1010_0_010_0000_0001);
        assert_eq!(cpu.registers.read(2), 0x10C);

        // SUB sp, #16
        cpu.execute_thumb(0b1011_0000_1_0000100);
        assert_eq!(cpu.registers.read(REG_SP), 0x1F0);
    }

    #[test]
    fn check_push_pop() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(REG_SP, 0x200);
        cpu.registers.write_general(4, 0x44);
        cpu.registers.write_general(REG_LR, 0x181);

        // PUSH {r4, lr}
        cpu.execute_thumb(0b1011_0_10_1_0001_0000);
        assert_eq!(cpu.registers.read(REG_SP), 0x1F8);
        assert_eq!(cpu.memory.read_word(0x1F8).unwrap(), 0x44);
        assert_eq!(cpu.memory.read_word(0x1FC).unwrap(), 0x181);

        // POP {r4, pc}
        cpu.registers.write_general(4, 0);
        assert!(cpu.execute_thumb(0b1011_1_10_1_0001_0000));
        assert_eq!(cpu.registers.read(REG_SP), 0x200);
        assert_eq!(cpu.registers.read(4), 0x44);
        assert_eq!(cpu.registers.cpu_state(), CpuState::Thumb);
        assert_eq!(cpu.registers.current_instruction_address(), 0x180);
    }

    #[test]
    fn check_multiple_load_store() {
        let mut cpu = thumb_cpu_at(0x100);
        cpu.registers.write_general(1, 0x40);
        cpu.registers.write_general(5, 0x55);
        cpu.registers.write_general(7, 0x77);

        // STMIA r1!, {r5, r7}
        cpu.execute_thumb(0b1100_0_001_1010_0000);

        assert_eq!(cpu.registers.read(1), 0x48);
        assert_eq!(cpu.memory.read_word(0x40).unwrap(), 0x55);
        assert_eq!(cpu.memory.read_word(0x44).unwrap(), 0x77);
    }

    #[test]
    fn check_branches() {
        let mut cpu = thumb_cpu_at(0x100);

        // BEQ -4 with Z clear
        assert!(!cpu.execute_thumb(0b1101_0000_1111_1110));
        assert_eq!(cpu.registers.current_instruction_address(), 0x102);

        // BNE -4: 0x106 - 4
        assert!(cpu.execute_thumb(0b1101_0001_1111_1110));
        assert_eq!(cpu.registers.current_instruction_address(), 0x102);

        // B +0x5E: 0x106 + 0x5E
        assert!(cpu.execute_thumb(0b11100_000_0010_1111));
        assert_eq!(cpu.registers.current_instruction_address(), 0x164);
    }

    #[test]
    fn check_long_branch_link() {
        let mut cpu = thumb_cpu_at(0x100);

        // BL +0x1000 split over two halves
        assert!(!cpu.execute_thumb(0b1111_0_000_0000_0001));
        assert_eq!(cpu.registers.read(REG_LR), 0x1104);

        assert!(cpu.execute_thumb(0b1111_1_000_0000_0000));
        assert_eq!(cpu.registers.current_instruction_address(), 0x1104);
        assert_eq!(cpu.registers.read(REG_LR), 0x105);
    }

    #[test]
    fn check_long_branch_backwards() {
        let mut cpu = thumb_cpu_at(0x300);

        // BL -0x200
        cpu.execute_thumb(0b1111_0_111_1111_1111);
        cpu.execute_thumb(0b1111_1_111_0000_0000);

        assert_eq!(cpu.registers.current_instruction_address(), 0x104);
    }

    #[test]
    fn check_swi_and_undefined() {
        let mut cpu = thumb_cpu_at(0x100);

        assert!(cpu.execute_thumb(0b1101_1111_0000_0001));
        assert_eq!(cpu.registers.mode(), Mode::Supervisor);
        assert_eq!(cpu.registers.read(REG_LR), 0x102);
        assert_eq!(cpu.registers.current_instruction_address(), Exception::SoftwareInterrupt.vector());

        let mut cpu = thumb_cpu_at(0x100);
        assert!(cpu.execute_thumb(0b1110_1000_0000_0000));
        assert_eq!(cpu.registers.mode(), Mode::Undefined);
        assert_eq!(cpu.registers.read(REG_LR), 0x102);
    }
}
