//! Allocation, freeing, and process lifecycle
//!
//! The allocator orchestrates the registry and the page table: it places new
//! variables with a strict first-fit search over the segment list, maps any
//! pages the placement newly touches, and on free it coalesces holes and
//! unmaps pages no live segment still uses.
//!
//! # Placement
//!
//! First-fit means exactly that: the first free segment at least as large as
//! the request wins, in address order, even when a tighter hole exists
//! further right. One wrinkle: when a new variable would spill past the
//! partially used page its predecessor ends on, and the leftover bytes of
//! that page are not a multiple of the element width, those leftover bytes
//! are split off as a small free segment so the variable starts on the page
//! boundary instead of misaligning elements across it.

use super::errors::SimError;
use super::Simulator;
use crate::memory::address_space::{Segment, SegmentKind};
use crate::memory::{DataType, MEMORY_SIZE, STACK_SIZE};

/// Segment names reserved for process bootstrap; allocated silently at
/// creation and never echoed back by the `allocate` command.
pub const BOOTSTRAP_NAMES: [&str; 3] = ["<TEXT>", "<GLOBALS>", "<STACK>"];

/// Is this one of the reserved bootstrap segment names?
pub fn is_bootstrap(name: &str) -> bool {
    BOOTSTRAP_NAMES.contains(&name)
}

impl Simulator {
    /// Create a process and bootstrap its `<TEXT>`, `<GLOBALS>`, and
    /// `<STACK>` segments. Returns the assigned pid.
    ///
    /// If any bootstrap allocation fails (the system can be nearly full),
    /// the half-built process is torn down before the error propagates.
    pub fn create_process(&mut self, text_size: u32, data_size: u32) -> Result<u32, SimError> {
        let pid = self.registry.create_process();
        let bootstrap = [
            ("<TEXT>", text_size),
            ("<GLOBALS>", data_size),
            ("<STACK>", STACK_SIZE),
        ];
        for (name, size) in bootstrap {
            if let Err(err) = self.allocate(pid, name, DataType::Char, size) {
                self.page_table.unmap_process(pid);
                self.registry.remove_process(pid);
                return Err(err);
            }
        }
        Ok(pid)
    }

    /// Place a new variable of `num_elements` elements of `data_type` and
    /// return its virtual address.
    pub fn allocate(
        &mut self,
        pid: u32,
        var_name: &str,
        data_type: DataType,
        num_elements: u32,
    ) -> Result<u32, SimError> {
        let width = data_type.width();
        let requested = num_elements as u64 * width as u64;
        if requested > MEMORY_SIZE as u64 {
            return Err(SimError::OutOfMemory {
                requested,
                limit: MEMORY_SIZE as u64,
            });
        }
        let total_size = requested as u32;
        let page_size = self.page_table.page_size();

        let proc = self
            .registry
            .process(pid)
            .ok_or(SimError::ProcessNotFound { pid })?;

        // First-fit: first free segment big enough, in address order.
        let (hole_index, hole_address, hole_size) = proc
            .segments
            .iter()
            .enumerate()
            .find(|(_, seg)| seg.is_free() && seg.size >= total_size)
            .map(|(index, seg)| (index, seg.virtual_address, seg.size))
            .ok_or(SimError::OutOfSpace {
                pid,
                requested: total_size,
            })?;

        // Alignment split: pad to the next page boundary when the variable
        // would spill out of a partially used page whose leftover bytes do
        // not divide evenly into elements. Skipped if the hole cannot hold
        // the padding alongside the variable.
        let page_leftover = page_size - hole_address % page_size;
        let padding = if hole_address % page_size != 0
            && total_size > page_leftover
            && page_leftover % width != 0
            && hole_size >= total_size + page_leftover
        {
            page_leftover
        } else {
            0
        };
        let virtual_address = hole_address + padding;

        // Global capacity check before anything mutates: a rejected
        // allocation must leave every structure untouched.
        let ceiling = self.registry.in_use_bytes(pid);
        let new_ceiling = ceiling.max(virtual_address + total_size);
        let others = self.registry.total_allocated_bytes() - ceiling;
        if others as u64 + new_ceiling as u64 > MEMORY_SIZE as u64 {
            return Err(SimError::OutOfMemory {
                requested,
                limit: MEMORY_SIZE as u64,
            });
        }

        // Back every page the new segment touches. Interior pages are always
        // new; the first and last may already be mapped by neighbors, and the
        // first may also have been reclaimed by an earlier free.
        let start_page = virtual_address / page_size;
        let end_page = (virtual_address + total_size) / page_size;
        for page_number in start_page..=end_page {
            if !self.page_table.has_mapping(pid, page_number) {
                self.page_table.map_page(pid, page_number);
            }
        }

        let mut index = hole_index;
        if padding > 0 {
            self.registry
                .insert_segment(pid, index, Segment::free_space(hole_address, padding));
            index += 1;
        }
        self.registry.insert_segment(
            pid,
            index,
            Segment {
                name: var_name.to_string(),
                kind: SegmentKind::Variable(data_type),
                virtual_address,
                size: total_size,
            },
        );

        Ok(virtual_address)
    }

    /// Free a variable: retype it as free space, coalesce, and unmap every
    /// page now fully inside a free segment.
    pub fn free(&mut self, pid: u32, var_name: &str) -> Result<(), SimError> {
        if !self.registry.has_process(pid) {
            return Err(SimError::ProcessNotFound { pid });
        }
        if !self.registry.mark_free(pid, var_name) {
            return Err(SimError::VariableNotFound {
                pid,
                name: var_name.to_string(),
            });
        }
        let page_size = self.page_table.page_size();
        for page_number in self.registry.coalesce_free(pid, page_size) {
            self.page_table.unmap_page(pid, page_number);
        }
        Ok(())
    }

    /// Kill a process: drop all its page mappings and its address space
    pub fn terminate(&mut self, pid: u32) -> Result<(), SimError> {
        if !self.registry.remove_process(pid) {
            return Err(SimError::ProcessNotFound { pid });
        }
        self.page_table.unmap_process(pid);
        Ok(())
    }
}
