//! # ARM7TDMI interpreter core
//!
//! An instruction-level interpreter for the ARM7TDMI: the ARM (32-bit) and
//! Thumb (16-bit) instruction sets, the seven processor modes with their banked
//! registers and the exception model.
//!
//! The core never talks to a bus directly: every load, store and fetch goes
//! through a [`MemoryPort`](memory::MemoryPort) supplied by the host.
//!
//! ```
//! use arm7tdmi::cpu::arm7tdmi::Arm7tdmi;
//! use arm7tdmi::memory::FlatMemory;
//!
//! let mut memory = FlatMemory::new(0x100);
//! // MOV r0, #42
//! memory.load_program(0, &0xE3A0_002A_u32.to_le_bytes()).unwrap();
//!
//! let mut cpu = Arm7tdmi::new(memory);
//! cpu.step();
//!
//! assert_eq!(cpu.registers.read(0), 42);
//! ```

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_lossless)]
pub mod bitwise;

pub mod cpu;

#[allow(clippy::module_name_repetitions)]
pub mod memory;
