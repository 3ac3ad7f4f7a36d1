//! Physical memory backing store
//!
//! A flat, fixed-size byte array standing in for RAM. It knows nothing about
//! pages or processes; callers address it with physical byte addresses
//! produced by the page table (`frame * page_size + offset`).
//!
//! # Error Handling
//!
//! Methods return `Result<_, String>`; the string errors are converted to
//! [`crate::simulator::errors::SimError`] at the simulator boundary.

/// The flat physical byte store
#[derive(Debug)]
pub struct PhysicalMemory {
    bytes: Vec<u8>,
}

impl PhysicalMemory {
    /// Allocate `size` zeroed bytes of simulated RAM
    pub fn new(size: u32) -> Self {
        PhysicalMemory {
            bytes: vec![0; size as usize],
        }
    }

    /// Capacity in bytes
    pub fn len(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read `len` bytes starting at a physical address
    pub fn read_bytes(&self, address: u32, len: u32) -> Result<&[u8], String> {
        let start = address as usize;
        let end = start + len as usize;
        self.bytes.get(start..end).ok_or_else(|| {
            format!(
                "physical read of {} bytes at 0x{:08X} past end of memory",
                len, address
            )
        })
    }

    /// Write bytes starting at a physical address
    pub fn write_bytes(&mut self, address: u32, bytes: &[u8]) -> Result<(), String> {
        let start = address as usize;
        let end = start + bytes.len();
        let slot = self.bytes.get_mut(start..end).ok_or_else(|| {
            format!(
                "physical write of {} bytes at 0x{:08X} past end of memory",
                bytes.len(),
                address
            )
        })?;
        slot.copy_from_slice(bytes);
        Ok(())
    }
}
