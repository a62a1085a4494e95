use crate::bitwise::Bits;
use crate::cpu::arm::alu_instruction::{
    ArmModeAluInstruction, rotated_immediate, shift, shift_immediate,
};
use crate::cpu::arm::instructions::ArmInstruction;
use crate::cpu::arm::operations::{BlockTransfer, DataTransfer, TransferWidth};
use crate::cpu::arm7tdmi::Arm7tdmi;
use crate::cpu::condition::Condition;
use crate::cpu::exception::Exception;
use crate::cpu::flags::{
    HalfwordTransferKind, Indexing, LoadStoreKind, OperandKind, Offsetting, ReadWriteKind,
    ShiftKind,
};
use crate::cpu::registers::REG_PROGRAM_COUNTER;
use crate::memory::{MemoryFault, MemoryPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmModeOpcode {
    pub instruction: ArmInstruction,
    pub condition: Condition,
    pub raw: u32,
}

impl From<u32> for ArmModeOpcode {
    fn from(op_code: u32) -> Self {
        Self {
            instruction: ArmInstruction::from(op_code),
            condition: Condition::from(op_code.get_bits(28..=31) as u8),
            raw: op_code,
        }
    }
}

impl std::ops::Deref for ArmModeOpcode {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl std::fmt::Display for ArmModeOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instruction = format!("INS: {} {}\n", self.instruction, self.condition);

        let bytes_pos1 = "POS: |..3 ..................2 ..................1 ..................0|\n";
        let bytes_pos2 = "     |1_0_9_8_7_6_5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0|\n";

        let op_code_format = match self.instruction {
            ArmInstruction::DataProcessing => {
                "FMT: |_Cond__|0_0|I|_code__|S|__Rn___|__Rd___|_______operand2________|"
            }
            ArmInstruction::PsrRead => {
                "FMT: |_Cond__|0_0_0_1_0|P|0_0|1_1_1_1|__Rd___|0_0_0_0_0_0_0_0_0_0_0_0|"
            }
            ArmInstruction::PsrWrite => {
                "FMT: |_Cond__|0_0|I|1_0|P|1_0|_Field_|1_1_1_1|_______operand2________|"
            }
            ArmInstruction::Multiply => {
                "FMT: |_Cond__|0_0_0_0_0_0|A|S|__Rd___|__Rn___|__Rs___|1_0_0_1|__Rm___|"
            }
            ArmInstruction::MultiplyLong => {
                "FMT: |_Cond__|0_0_0_0_1|U|A|S|_RdHi__|_RdLo__|__Rs___|1_0_0_1|__Rm___|"
            }
            ArmInstruction::SingleDataSwap => {
                "FMT: |_Cond__|0_0_0_1_0|B|0_0|__Rn___|__Rd___|0_0_0_0|1_0_0_1|__Rm___|"
            }
            ArmInstruction::BranchAndExchange => {
                "FMT: |_Cond__|0_0_0_1|0_0_1_0|1_1_1_1|1_1_1_1|1_1_1_1|0_0_0_1|__Rn___|"
            }
            ArmInstruction::HalfwordDataTransfer => {
                "FMT: |_Cond__|0_0_0|P|U|I|W|L|__Rn___|__Rd___|_OffHi_|1|S|H|1|_OffLo_|"
            }
            ArmInstruction::SingleDataTransfer => {
                "FMT: |_Cond__|0_1|I|P|U|B|W|L|__Rn___|__Rd___|________Offset_________|"
            }
            ArmInstruction::BlockDataTransfer => {
                "FMT: |_Cond__|1_0_0|P|U|S|W|L|__Rn___|_____________Reg_List__________|"
            }
            ArmInstruction::Branch => {
                "FMT: |_Cond__|1_0_1|L|______________________Offset___________________|"
            }
            ArmInstruction::CoprocessorDataTransfer => {
                "FMT: |_Cond__|1_1_0|P|U|N|W|L|__Rn___|__CRd__|__Cp#__|____Offset_____|"
            }
            ArmInstruction::CoprocessorDataOperation => {
                "FMT: |_Cond__|1_1_1_0|_CPOpc_|__CRn__|__CRd__|__Cp#__|_CP__|0|__CRm__|"
            }
            ArmInstruction::CoprocessorRegisterTransfer => {
                "FMT: |_Cond__|1_1_1_0|CPO__|L|__CRn__|__Rd___|__Cp#__|_CP__|1|__CRm__|"
            }
            ArmInstruction::SoftwareInterrupt => {
                "FMT: |_Cond__|1_1_1_1|_____________Ignored by processor______________|"
            }
            ArmInstruction::Undefined => "FMT: |_Cond__|",
        };

        let mut raw_bits = String::new();
        for i in format!("{:#034b}", self.raw).chars().skip(2) {
            raw_bits.push(i);
            raw_bits.push('_');
        }
        raw_bits.pop();
        let raw_bits = format!("RAW: |{raw_bits}|\n");

        writeln!(
            f,
            "{instruction}{bytes_pos1}{bytes_pos2}{raw_bits}{op_code_format}"
        )
    }
}

/// Operand decoding for the ARM instruction families.
impl<M: MemoryPort> Arm7tdmi<M> {
    /// Reads a register used as an operand. With a register-specified shift
    /// the PC reads one instruction further ahead.
    fn operand_register(&self, reg: usize, register_shift: bool) -> u32 {
        let value = self.registers.read(reg);
        if reg == REG_PROGRAM_COUNTER && register_shift {
            value.wrapping_add(4)
        } else {
            value
        }
    }

    pub(crate) fn arm_data_processing(&mut self, op_code: &ArmModeOpcode) -> bool {
        let alu_instruction = ArmModeAluInstruction::from(op_code.get_bits(21..=24));
        let set_conditions = op_code.get_bit(20);
        let rn = op_code.get_bits(16..=19) as usize;
        let rd = op_code.get_bits(12..=15) as usize;
        let carry = self.registers.cpsr().carry_flag();

        let register_shift = !op_code.get_bit(25) && op_code.get_bit(4);

        let op2 = match OperandKind::from(op_code.get_bit(25)) {
            OperandKind::Immediate => {
                rotated_immediate(op_code.get_bits(0..=7), op_code.get_bits(8..=11), carry)
            }
            OperandKind::Register => {
                let kind = ShiftKind::from(op_code.get_bits(5..=6));
                let rm = self.operand_register(op_code.get_bits(0..=3) as usize, register_shift);

                if register_shift {
                    let rs = op_code.get_bits(8..=11) as usize;
                    let amount = self.registers.read(rs) & 0xFF;
                    shift(kind, amount, rm, carry)
                } else {
                    shift_immediate(kind, op_code.get_bits(7..=11), rm, carry)
                }
            }
        };

        let op1 = self.operand_register(rn, register_shift);

        self.data_processing(
            alu_instruction,
            set_conditions,
            rd,
            op1,
            op2.result,
            op2.carry,
        )
    }

    pub(crate) fn arm_psr_read(&mut self, op_code: &ArmModeOpcode) -> bool {
        let use_spsr = op_code.get_bit(22);
        let rd = op_code.get_bits(12..=15) as usize;

        self.psr_read(use_spsr, rd)
    }

    pub(crate) fn arm_psr_write(&mut self, op_code: &ArmModeOpcode) -> bool {
        let use_spsr = op_code.get_bit(22);
        let fields = op_code.get_bits(16..=19);

        let value = match OperandKind::from(op_code.get_bit(25)) {
            OperandKind::Immediate => {
                let carry = self.registers.cpsr().carry_flag();
                rotated_immediate(op_code.get_bits(0..=7), op_code.get_bits(8..=11), carry).result
            }
            OperandKind::Register => self.registers.read(op_code.get_bits(0..=3) as usize),
        };

        self.psr_write(use_spsr, fields, value)
    }

    pub(crate) fn arm_multiply(&mut self, op_code: &ArmModeOpcode) -> bool {
        let accumulate = op_code.get_bit(21);
        let set_conditions = op_code.get_bit(20);
        let rd = op_code.get_bits(16..=19) as usize;
        let rn = op_code.get_bits(12..=15) as usize;
        let rs = self.registers.read(op_code.get_bits(8..=11) as usize);
        let rm = self.registers.read(op_code.get_bits(0..=3) as usize);

        let addend = accumulate.then(|| self.registers.read(rn));

        self.multiply(set_conditions, rd, rm, rs, addend)
    }

    pub(crate) fn arm_multiply_long(&mut self, op_code: &ArmModeOpcode) -> bool {
        let signed = op_code.get_bit(22);
        let accumulate = op_code.get_bit(21);
        let set_conditions = op_code.get_bit(20);
        let rdhi = op_code.get_bits(16..=19) as usize;
        let rdlo = op_code.get_bits(12..=15) as usize;
        let rs = self.registers.read(op_code.get_bits(8..=11) as usize);
        let rm = self.registers.read(op_code.get_bits(0..=3) as usize);

        self.multiply_long(set_conditions, signed, accumulate, rdhi, rdlo, rm, rs)
    }

    pub(crate) fn arm_single_data_swap(
        &mut self,
        op_code: &ArmModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let byte = op_code.get_bit(22);
        let rn = op_code.get_bits(16..=19) as usize;
        let rd = op_code.get_bits(12..=15) as usize;
        let rm = op_code.get_bits(0..=3) as usize;

        self.single_data_swap(byte, rn, rd, rm)
    }

    pub(crate) fn arm_branch_and_exchange(&mut self, op_code: &ArmModeOpcode) -> bool {
        let rn = op_code.get_bits(0..=3) as usize;
        let target = self.registers.read(rn);

        self.branch_and_exchange(target)
    }

    pub(crate) fn arm_halfword_data_transfer(
        &mut self,
        op_code: &ArmModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let width = match HalfwordTransferKind::try_from(op_code.get_bits(5..=6)) {
            Ok(HalfwordTransferKind::UnsignedHalfwords) => TransferWidth::HalfWord,
            Ok(HalfwordTransferKind::SignedByte) => TransferWidth::SignedByte,
            Ok(HalfwordTransferKind::SignedHalfwords) => TransferWidth::SignedHalfWord,
            Err(e) => {
                tracing::debug!("{e}");
                return Ok(self.raise_exception(Exception::Undefined));
            }
        };

        let offset = if op_code.get_bit(22) {
            (op_code.get_bits(8..=11) << 4) | op_code.get_bits(0..=3)
        } else {
            self.registers.read(op_code.get_bits(0..=3) as usize)
        };

        self.data_transfer(DataTransfer {
            load_store: LoadStoreKind::from(op_code.get_bit(20)),
            width,
            indexing: Indexing::from(op_code.get_bit(24)),
            offsetting: Offsetting::from(op_code.get_bit(23)),
            write_back: op_code.get_bit(21),
            force_user: false,
            base_register: op_code.get_bits(16..=19) as usize,
            register: op_code.get_bits(12..=15) as usize,
            offset,
        })
    }

    pub(crate) fn arm_single_data_transfer(
        &mut self,
        op_code: &ArmModeOpcode,
    ) -> Result<bool, MemoryFault> {
        let indexing = Indexing::from(op_code.get_bit(24));
        let write_back = op_code.get_bit(21);

        // The I bit is inverted here: set means a shifted register offset.
        let offset = if op_code.get_bit(25) {
            let kind = ShiftKind::from(op_code.get_bits(5..=6));
            let rm = self.registers.read(op_code.get_bits(0..=3) as usize);
            let carry = self.registers.cpsr().carry_flag();
            shift_immediate(kind, op_code.get_bits(7..=11), rm, carry).result
        } else {
            op_code.get_bits(0..=11)
        };

        let width = match ReadWriteKind::from(op_code.get_bit(22)) {
            ReadWriteKind::Word => TransferWidth::Word,
            ReadWriteKind::Byte => TransferWidth::Byte,
        };

        self.data_transfer(DataTransfer {
            load_store: LoadStoreKind::from(op_code.get_bit(20)),
            width,
            indexing,
            offsetting: Offsetting::from(op_code.get_bit(23)),
            write_back,
            force_user: indexing == Indexing::Post && write_back,
            base_register: op_code.get_bits(16..=19) as usize,
            register: op_code.get_bits(12..=15) as usize,
            offset,
        })
    }

    pub(crate) fn arm_block_data_transfer(
        &mut self,
        op_code: &ArmModeOpcode,
    ) -> Result<bool, MemoryFault> {
        self.block_data_transfer(BlockTransfer {
            load_store: LoadStoreKind::from(op_code.get_bit(20)),
            indexing: Indexing::from(op_code.get_bit(24)),
            offsetting: Offsetting::from(op_code.get_bit(23)),
            write_back: op_code.get_bit(21),
            psr_or_user_bank: op_code.get_bit(22),
            base_register: op_code.get_bits(16..=19) as usize,
            register_list: op_code.get_bits(0..=15) as u16,
        })
    }

    pub(crate) fn arm_branch(&mut self, op_code: &ArmModeOpcode) -> bool {
        let link = op_code.get_bit(24);
        let offset = (op_code.get_bits(0..=23).sign_extended(24) << 2) as i32;

        self.branch(offset, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::cpu_modes::Mode;
    use crate::cpu::psr::{CpuState, Psr};
    use crate::cpu::registers::{REG_LR, REG_SP};
    use crate::memory::FlatMemory;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    fn cpu_at(mode: Mode, address: u32) -> Arm7tdmi<FlatMemory> {
        let mut cpu = Arm7tdmi::new(FlatMemory::new(0x400));
        cpu.registers.load_status(Psr::from(mode));
        cpu.registers.write_program_counter(address);
        cpu
    }

    #[test]
    fn check_opcode_fields() {
        let op_code = ArmModeOpcode::from(0x1A00_0010);

        assert_eq!(op_code.instruction, ArmInstruction::Branch);
        assert_eq!(op_code.condition, Condition::NE);
        assert_eq!(*op_code, 0x1A00_0010);
    }

    #[test]
    fn check_display_shows_the_format() {
        let output = ArmModeOpcode::from(0xE12F_FF1E).to_string();

        assert!(output.starts_with("INS: BranchAndExchange"));
        assert!(output.contains("RAW: |1_1_1_0_0_0_0_1_0_0_1_0"));
        assert!(output.contains("FMT: |_Cond__|0_0_0_1|0_0_1_0|"));
    }

    #[test]
    fn check_adds_sets_all_flags() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(1, 0xFFFF_FFFF);
        cpu.registers.write_general(2, 1);

        // ADDS r0, r1, r2
        assert!(!cpu.execute_arm(0xE091_0002));

        assert_eq!(cpu.registers.read(0), 0);
        let cpsr = cpu.registers.cpsr();
        assert!(cpsr.zero_flag());
        assert!(cpsr.carry_flag());
        assert!(!cpsr.overflow_flag());
        assert!(!cpsr.sign_flag());
        assert_eq!(cpu.registers.current_instruction_address(), 0x104);
    }

    #[test]
    fn check_adcs_with_carry_in() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.cpsr_mut().set_carry_flag(true);
        cpu.registers.write_general(1, 0x7FFF_FFFF);
        cpu.registers.write_general(2, 0);

        // ADCS r0, r1, r2
        cpu.execute_arm(0xE0B1_0002);

        assert_eq!(cpu.registers.read(0), 0x8000_0000);
        assert!(cpu.registers.cpsr().overflow_flag());
        assert!(cpu.registers.cpsr().sign_flag());
        assert!(!cpu.registers.cpsr().carry_flag());
    }

    #[test]
    fn check_register_shift_reads_pc_ahead() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(3, 0);

        // MOV r0, pc, LSL r3
        cpu.execute_arm(0xE1A0_031F);
        assert_eq!(cpu.registers.read(0), 0x10C);

        // MOV r0, pc
        cpu.execute_arm(0xE1A0_000F);
        assert_eq!(cpu.registers.read(0), 0x10C);
    }

    #[test]
    fn check_immediate_shift_carry() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(1, 0x8000_0001);

        // MOVS r0, r1, LSR #1
        cpu.execute_arm(0xE1B0_00A1);

        assert_eq!(cpu.registers.read(0), 0x4000_0000);
        assert!(cpu.registers.cpsr().carry_flag());
    }

    #[test]
    fn check_mrs_msr() {
        let mut cpu = cpu_at(Mode::Supervisor, 0x100);

        // MSR CPSR_f, #0xF0000000
        cpu.execute_arm(0xE328_F20F);
        // MRS r0, CPSR
        cpu.execute_arm(0xE10F_0000);

        assert_eq!(cpu.registers.read(0), 0xF000_0013);
    }

    #[test]
    fn check_multiply() {
        let mut rng = rand::thread_rng();
        let (a, b, c) = (rng.r#gen::<u32>(), rng.r#gen::<u32>(), rng.r#gen::<u32>());

        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(1, a);
        cpu.registers.write_general(2, b);
        cpu.registers.write_general(0, c);

        // MLA r3, r1, r2, r0
        cpu.execute_arm(0xE023_0291);

        assert_eq!(cpu.registers.read(3), a.wrapping_mul(b).wrapping_add(c));
    }

    #[test]
    fn check_umull() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(2, 0xFFFF_FFFF);
        cpu.registers.write_general(3, 0xFFFF_FFFF);

        // UMULL r0, r1, r2, r3
        cpu.execute_arm(0xE081_0392);

        assert_eq!(cpu.registers.read(0), 0x0000_0001);
        assert_eq!(cpu.registers.read(1), 0xFFFF_FFFE);
    }

    #[test]
    fn check_ldr_str() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(1, 0x40);
        cpu.registers.write_general(0, 0xDEAD_BEEF);

        // STR r0, [r1, #4]!
        cpu.execute_arm(0xE5A1_0004);
        assert_eq!(cpu.memory.read_word(0x44).unwrap(), 0xDEAD_BEEF);
        assert_eq!(cpu.registers.read(1), 0x44);

        // LDRB r2, [r1], #1
        cpu.execute_arm(0xE4D1_2001);
        assert_eq!(cpu.registers.read(2), 0xEF);
        assert_eq!(cpu.registers.read(1), 0x45);

        // LDR r3, [r1]: unaligned word is rotated
        cpu.execute_arm(0xE591_3000);
        assert_eq!(cpu.registers.read(3), 0xEFDE_ADBE);
    }

    #[test]
    fn check_ldr_pc_relative() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.memory.write_word(0x110, 0x1234_5678).unwrap();

        // LDR r0, [pc, #8]
        cpu.execute_arm(0xE59F_0008);

        assert_eq!(cpu.registers.read(0), 0x1234_5678);
    }

    #[test]
    fn check_str_pc_stores_twelve_ahead() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(1, 0x40);

        // STR pc, [r1]
        cpu.execute_arm(0xE581_F000);

        assert_eq!(cpu.memory.read_word(0x40).unwrap(), 0x10C);
    }

    #[test]
    fn check_halfword_transfers() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.memory.write_word(0x40, 0x80FF_8001).unwrap();
        cpu.registers.write_general(1, 0x40);
        cpu.registers.write_general(2, 2);

        // LDRH r0, [r1]
        cpu.execute_arm(0xE1D1_00B0);
        assert_eq!(cpu.registers.read(0), 0x8001);

        // LDRSH r0, [r1, r2]
        cpu.execute_arm(0xE191_00F2);
        assert_eq!(cpu.registers.read(0), 0xFFFF_80FF);

        // LDRSB r0, [r1, #1]
        cpu.execute_arm(0xE1D1_00D1);
        assert_eq!(cpu.registers.read(0), 0xFFFF_FF80);

        // STRH r2, [r1, #4]
        cpu.execute_arm(0xE1C1_20B4);
        assert_eq!(cpu.memory.read_half_word(0x44).unwrap(), 2);
    }

    #[test]
    fn check_push_pop_with_block_transfers() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(REG_SP, 0x200);
        cpu.registers.write_general(0, 0x11);
        cpu.registers.write_general(REG_LR, 0x180);

        // STMDB sp!, {r0, lr}
        cpu.execute_arm(0xE92D_4001);
        assert_eq!(cpu.registers.read(REG_SP), 0x1F8);
        assert_eq!(cpu.memory.read_word(0x1F8).unwrap(), 0x11);
        assert_eq!(cpu.memory.read_word(0x1FC).unwrap(), 0x180);

        // LDMIA sp!, {r0, pc}
        cpu.registers.write_general(0, 0);
        assert!(cpu.execute_arm(0xE8BD_8001));
        assert_eq!(cpu.registers.read(REG_SP), 0x200);
        assert_eq!(cpu.registers.read(0), 0x11);
        assert_eq!(cpu.registers.current_instruction_address(), 0x180);
    }

    #[test]
    fn check_swp() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.memory.write_word(0x40, 0xAABB_CCDD).unwrap();
        cpu.registers.write_general(2, 0x40);
        cpu.registers.write_general(1, 0x42);

        // SWPB r0, r1, [r2]
        cpu.execute_arm(0xE142_0091);

        assert_eq!(cpu.registers.read(0), 0xDD);
        assert_eq!(cpu.memory.read_word(0x40).unwrap(), 0xAABB_CC42);
    }

    #[test]
    fn check_bx_to_thumb() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(REG_LR, 0x201);

        // BX lr
        assert!(cpu.execute_arm(0xE12F_FF1E));

        assert_eq!(cpu.registers.cpu_state(), CpuState::Thumb);
        assert_eq!(cpu.registers.current_instruction_address(), 0x200);
        assert_eq!(cpu.registers.read(REG_PROGRAM_COUNTER), 0x204);
    }

    #[test]
    fn check_branch_with_link() {
        let mut cpu = cpu_at(Mode::User, 0x100);

        // BL +0x20 (target = 0x108 + 0x20)
        assert!(cpu.execute_arm(0xEB00_0008));
        assert_eq!(cpu.registers.current_instruction_address(), 0x128);
        assert_eq!(cpu.registers.read(REG_LR), 0x104);

        // B -8 (branch to self)
        assert!(cpu.execute_arm(0xEAFF_FFFE));
        assert_eq!(cpu.registers.current_instruction_address(), 0x128);
    }

    #[test]
    fn check_ldrt_and_ldm_user_bank_from_irq() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(REG_SP, 0x80);
        cpu.registers.write_general(REG_LR, 0x84);
        cpu.registers.load_status(Psr::from(Mode::Irq));
        cpu.registers.write_general(REG_SP, 0x40);
        cpu.registers.write_general(REG_LR, 0x44);
        cpu.registers.write_program_counter(0x100);
        cpu.memory.write_word(0x40, 0x1357).unwrap();
        cpu.memory.write_word(0x60, 0xAAAA).unwrap();
        cpu.memory.write_word(0x64, 0xBBBB).unwrap();

        // LDRT r0, [sp], #4
        assert!(!cpu.execute_arm(0xE4BD_0004));
        assert_eq!(cpu.registers.mode(), Mode::Irq);
        assert_eq!(cpu.registers.read(0), 0x1357);
        assert_eq!(cpu.registers.read(REG_SP), 0x44);
        assert_eq!(cpu.registers.read(REG_LR), 0x44);

        // LDMIA r0, {sp, lr}^
        cpu.registers.write_general(0, 0x60);
        assert!(!cpu.execute_arm(0xE8D0_6000));
        assert_eq!(cpu.registers.mode(), Mode::Irq);
        assert_eq!(cpu.registers.read(REG_SP), 0x44);
        assert_eq!(cpu.registers.read(REG_LR), 0x44);
        assert_eq!(cpu.registers.current_instruction_address(), 0x108);

        cpu.registers.load_status(Psr::from(Mode::User));
        assert_eq!(cpu.registers.read(REG_SP), 0xAAAA);
        assert_eq!(cpu.registers.read(REG_LR), 0xBBBB);
    }

    #[test]
    fn check_data_abort_on_load() {
        let mut cpu = cpu_at(Mode::User, 0x100);
        cpu.registers.write_general(1, 0x1000);

        // LDR r0, [r1]
        assert!(cpu.execute_arm(0xE591_0000));

        assert_eq!(cpu.registers.mode(), Mode::Abort);
        assert_eq!(cpu.registers.read(REG_LR), 0x108);
        assert_eq!(cpu.registers.current_instruction_address(), 0x10);
    }
}
