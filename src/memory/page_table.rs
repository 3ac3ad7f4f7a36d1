//! Page table: lazy virtual-to-physical mapping
//!
//! Maps `(pid, virtual page number)` to a physical frame number. Entries are
//! created lazily the first time an allocation touches a page and removed
//! when a process terminates or a coalesced free segment fully covers the
//! page.
//!
//! # Frame Reuse
//!
//! Frames come from a monotonic counter, but frames released by
//! [`PageTable::unmap_page`] go into a free pool and are handed out again
//! (lowest frame first) before the counter advances. Translation is
//! unaffected by which frame backs a page.

use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// The system-wide page table
#[derive(Debug)]
pub struct PageTable {
    page_size: u32,
    frames: FxHashMap<(u32, u32), u32>,
    free_frames: BinaryHeap<Reverse<u32>>,
    next_frame: u32,
}

impl PageTable {
    /// Create an empty table for the given page size
    pub fn new(page_size: u32) -> Self {
        PageTable {
            page_size,
            frames: FxHashMap::default(),
            free_frames: BinaryHeap::new(),
            next_frame: 0,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Is this virtual page of this process backed by a frame?
    pub fn has_mapping(&self, pid: u32, page_number: u32) -> bool {
        self.frames.contains_key(&(pid, page_number))
    }

    /// Back a virtual page with a physical frame and return the frame number.
    ///
    /// An already-mapped page keeps its frame. Recycled frames are preferred
    /// over advancing the frame counter.
    pub fn map_page(&mut self, pid: u32, page_number: u32) -> u32 {
        if let Some(&frame) = self.frames.get(&(pid, page_number)) {
            return frame;
        }
        let frame = match self.free_frames.pop() {
            Some(Reverse(frame)) => frame,
            None => {
                let frame = self.next_frame;
                self.next_frame += 1;
                frame
            }
        };
        self.frames.insert((pid, page_number), frame);
        frame
    }

    /// Drop the mapping for a virtual page, returning its frame to the pool.
    ///
    /// Unmapping a page that was never mapped is a no-op: lazy mapping means
    /// reclaimable pages inside a free segment may never have been touched.
    pub fn unmap_page(&mut self, pid: u32, page_number: u32) {
        if let Some(frame) = self.frames.remove(&(pid, page_number)) {
            self.free_frames.push(Reverse(frame));
        }
    }

    /// Drop every mapping belonging to a process
    pub fn unmap_process(&mut self, pid: u32) {
        let pages: Vec<u32> = self
            .frames
            .keys()
            .filter(|(entry_pid, _)| *entry_pid == pid)
            .map(|(_, page)| *page)
            .collect();
        for page in pages {
            self.unmap_page(pid, page);
        }
    }

    /// Translate a virtual address to a physical one.
    ///
    /// Returns `None` when the containing page has no mapping.
    pub fn translate(&self, pid: u32, virtual_address: u32) -> Option<u32> {
        let page_number = virtual_address / self.page_size;
        let page_offset = virtual_address % self.page_size;
        self.frames
            .get(&(pid, page_number))
            .map(|frame| frame * self.page_size + page_offset)
    }

    /// All entries as `(pid, page number, frame number)`, sorted by pid then
    /// page number; used by the `print page` table.
    pub fn entries_sorted(&self) -> Vec<(u32, u32, u32)> {
        let mut entries: Vec<(u32, u32, u32)> = self
            .frames
            .iter()
            .map(|(&(pid, page), &frame)| (pid, page, frame))
            .collect();
        entries.sort_unstable_by_key(|&(pid, page, _)| (pid, page));
        entries
    }

    /// Number of live mappings across all processes
    pub fn mapped_count(&self) -> usize {
        self.frames.len()
    }
}
