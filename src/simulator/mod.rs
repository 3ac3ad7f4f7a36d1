//! Memory-management engine
//!
//! This module provides the core simulation logic:
//! - [`allocator`]: process creation, first-fit allocation, free, terminate
//! - [`accessor`]: typed reads and writes through address translation
//! - [`errors`]: simulation error types
//!
//! # State Model
//!
//! All mutable state lives in one [`Simulator`]: the address-space registry,
//! the page table, and the physical byte store. The three are created
//! together at startup and mutated in place by the single command loop; no
//! statics, no locks.

pub mod accessor;
pub mod allocator;
pub mod errors;

use crate::memory::address_space::AddressSpaceRegistry;
use crate::memory::page_table::PageTable;
use crate::memory::physical::PhysicalMemory;
use crate::memory::{FIRST_PID, MEMORY_SIZE};

/// The whole simulated machine
#[derive(Debug)]
pub struct Simulator {
    registry: AddressSpaceRegistry,
    page_table: PageTable,
    physical: PhysicalMemory,
}

impl Simulator {
    /// Build a fresh machine with 64 MiB of physical memory and the given
    /// page size
    pub fn new(page_size: u32) -> Self {
        Simulator {
            registry: AddressSpaceRegistry::new(FIRST_PID, MEMORY_SIZE),
            page_table: PageTable::new(page_size),
            physical: PhysicalMemory::new(MEMORY_SIZE),
        }
    }

    pub fn registry(&self) -> &AddressSpaceRegistry {
        &self.registry
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }
}
