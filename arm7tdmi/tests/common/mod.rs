use arm7tdmi::cpu::arm7tdmi::Arm7tdmi;
use arm7tdmi::memory::FlatMemory;
use tracing_subscriber::EnvFilter;

pub const MEMORY_SIZE: usize = 0x1000;

/// Routes `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A freshly reset core with `program` loaded at `address`.
pub fn core_with_program(address: u32, program: &[u8]) -> Arm7tdmi<FlatMemory> {
    init_tracing();

    let mut memory = FlatMemory::new(MEMORY_SIZE);
    memory.load_program(address, program).unwrap();

    Arm7tdmi::new(memory)
}

pub fn arm_program(instructions: &[u32]) -> Vec<u8> {
    instructions.iter().flat_map(|i| i.to_le_bytes()).collect()
}

pub fn thumb_program(instructions: &[u16]) -> Vec<u8> {
    instructions.iter().flat_map(|i| i.to_le_bytes()).collect()
}

/// Steps until the core reaches `address` or `max_steps` run out.
pub fn run_until(cpu: &mut Arm7tdmi<FlatMemory>, address: u32, max_steps: usize) {
    for _ in 0..max_steps {
        if cpu.registers.current_instruction_address() == address {
            return;
        }
        cpu.step();
    }

    panic!(
        "0x{address:08X} not reached, stopped at 0x{:08X}\n{cpu}",
        cpu.registers.current_instruction_address()
    );
}
