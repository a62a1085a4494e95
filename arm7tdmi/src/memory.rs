//! # Memory Port
//!
//! The core reaches the outside world only through [`MemoryPort`]: six
//! little-endian accessors (8, 16 and 32 bits, load and store), each of which
//! can fail. The port owns range validation and device side effects. The
//! core only applies alignment masking and word-load rotation on its side
//! (see [`Arm7tdmi::read_word`](crate::cpu::arm7tdmi::Arm7tdmi::read_word)).
//!
//! A failed access becomes a data abort (or a prefetch abort for fetches),
//! it never panics.

use serde::{Deserialize, Serialize};

/// Direction of a failed bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// A bus access the port refused to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFault {
    pub address: u32,
    pub kind: AccessKind,
    /// Width of the access in bytes (1, 2 or 4).
    pub size: u8,
}

impl MemoryFault {
    #[must_use]
    pub const fn read(address: u32, size: u8) -> Self {
        Self {
            address,
            kind: AccessKind::Read,
            size,
        }
    }

    #[must_use]
    pub const fn write(address: u32, size: u8) -> Self {
        Self {
            address,
            kind: AccessKind::Write,
            size,
        }
    }
}

impl std::fmt::Display for MemoryFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} byte(s) at 0x{:08X} failed",
            self.kind, self.size, self.address
        )
    }
}

impl std::error::Error for MemoryFault {}

/// Byte, halfword and word access to the system bus.
///
/// Halfword and word accessors receive naturally aligned addresses; values are
/// little endian.
pub trait MemoryPort {
    fn read_byte(&mut self, address: u32) -> Result<u8, MemoryFault>;

    fn read_half_word(&mut self, address: u32) -> Result<u16, MemoryFault>;

    fn read_word(&mut self, address: u32) -> Result<u32, MemoryFault>;

    fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryFault>;

    fn write_half_word(&mut self, address: u32, value: u16) -> Result<(), MemoryFault>;

    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryFault>;
}

impl<P: MemoryPort + ?Sized> MemoryPort for &mut P {
    fn read_byte(&mut self, address: u32) -> Result<u8, MemoryFault> {
        (**self).read_byte(address)
    }

    fn read_half_word(&mut self, address: u32) -> Result<u16, MemoryFault> {
        (**self).read_half_word(address)
    }

    fn read_word(&mut self, address: u32) -> Result<u32, MemoryFault> {
        (**self).read_word(address)
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryFault> {
        (**self).write_byte(address, value)
    }

    fn write_half_word(&mut self, address: u32, value: u16) -> Result<(), MemoryFault> {
        (**self).write_half_word(address, value)
    }

    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryFault> {
        (**self).write_word(address, value)
    }
}

/// A contiguous block of RAM mapped at address 0.
///
/// Any access that does not fit entirely inside the block fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMemory {
    data: Vec<u8>,
}

impl FlatMemory {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copies `bytes` into memory starting at `address`.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if `bytes` does not fit.
    pub fn load_program(&mut self, address: u32, bytes: &[u8]) -> Result<(), MemoryFault> {
        let len = u8::try_from(bytes.len().min(4)).unwrap_or(4);
        let range = self
            .range(address, bytes.len())
            .ok_or(MemoryFault::write(address, len))?;
        self.data[range].copy_from_slice(bytes);

        Ok(())
    }

    fn range(&self, address: u32, size: usize) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(address).ok()?;
        let end = start.checked_add(size)?;

        (end <= self.data.len()).then_some(start..end)
    }

    fn read_bytes<const N: usize>(&self, address: u32) -> Result<[u8; N], MemoryFault> {
        let range = self
            .range(address, N)
            .ok_or(MemoryFault::read(address, N as u8))?;

        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.data[range]);

        Ok(bytes)
    }

    fn write_bytes<const N: usize>(&mut self, address: u32, bytes: [u8; N]) -> Result<(), MemoryFault> {
        let range = self
            .range(address, N)
            .ok_or(MemoryFault::write(address, N as u8))?;
        self.data[range].copy_from_slice(&bytes);

        Ok(())
    }
}

impl MemoryPort for FlatMemory {
    fn read_byte(&mut self, address: u32) -> Result<u8, MemoryFault> {
        self.read_bytes::<1>(address).map(|[b]| b)
    }

    fn read_half_word(&mut self, address: u32) -> Result<u16, MemoryFault> {
        self.read_bytes(address).map(u16::from_le_bytes)
    }

    fn read_word(&mut self, address: u32) -> Result<u32, MemoryFault> {
        self.read_bytes(address).map(u32::from_le_bytes)
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryFault> {
        self.write_bytes(address, [value])
    }

    fn write_half_word(&mut self, address: u32, value: u16) -> Result<(), MemoryFault> {
        self.write_bytes(address, value.to_le_bytes())
    }

    fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryFault> {
        self.write_bytes(address, value.to_le_bytes())
    }
}
