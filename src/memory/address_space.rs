//! Per-process virtual address spaces
//!
//! The [`AddressSpaceRegistry`] owns every simulated process and, for each,
//! an ordered list of [`Segment`]s partitioning `[0, max_size)`: allocated
//! variables interleaved with free space.
//!
//! # Contiguity Invariant
//!
//! For every process, `segments[0].virtual_address == 0` and each segment
//! ends exactly where the next begins. Insertion carves the new segment out
//! of the free gap at the insertion index; freeing retypes a variable in
//! place; coalescing merges adjacent free runs. All three preserve the
//! partition.

use super::DataType;

/// What a segment holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Variable(DataType),
    FreeSpace,
}

/// A contiguous range of one process's virtual address space
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub kind: SegmentKind,
    pub virtual_address: u32,
    pub size: u32,
}

impl Segment {
    /// A free gap covering `[virtual_address, virtual_address + size)`
    pub fn free_space(virtual_address: u32, size: u32) -> Self {
        Segment {
            name: "<FREE_SPACE>".to_string(),
            kind: SegmentKind::FreeSpace,
            virtual_address,
            size,
        }
    }

    pub fn is_free(&self) -> bool {
        self.kind == SegmentKind::FreeSpace
    }

    /// One past the last address of this segment
    pub fn end(&self) -> u32 {
        self.virtual_address + self.size
    }
}

/// A simulated process: a pid and its segment list
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: u32,
    pub segments: Vec<Segment>,
}

/// Owner of all processes and their address spaces
#[derive(Debug)]
pub struct AddressSpaceRegistry {
    next_pid: u32,
    max_size: u32,
    processes: Vec<Process>,
}

impl AddressSpaceRegistry {
    /// Create an empty registry; `max_size` is each process's virtual ceiling
    pub fn new(first_pid: u32, max_size: u32) -> Self {
        AddressSpaceRegistry {
            next_pid: first_pid,
            max_size,
            processes: Vec::new(),
        }
    }

    /// Create a process with one free segment spanning the whole space
    pub fn create_process(&mut self) -> u32 {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.processes.push(Process {
            pid,
            segments: vec![Segment::free_space(0, self.max_size)],
        });
        pid
    }

    /// Live processes, in creation order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn has_process(&self, pid: u32) -> bool {
        self.process(pid).is_some()
    }

    pub fn process(&self, pid: u32) -> Option<&Process> {
        self.processes.iter().find(|proc| proc.pid == pid)
    }

    fn process_mut(&mut self, pid: u32) -> Option<&mut Process> {
        self.processes.iter_mut().find(|proc| proc.pid == pid)
    }

    /// The ordered segment list of a process
    pub fn segments_of(&self, pid: u32) -> Option<&[Segment]> {
        self.process(pid).map(|proc| proc.segments.as_slice())
    }

    /// The named variable segment of a process, if it exists
    pub fn find_variable(&self, pid: u32, var_name: &str) -> Option<&Segment> {
        self.process(pid)?
            .segments
            .iter()
            .find(|seg| !seg.is_free() && seg.name == var_name)
    }

    /// Insert `segment` at `index`, carving it out of the free gap there.
    ///
    /// The gap currently at `index` shrinks by `segment.size` and advances
    /// past the insertion; a gap consumed exactly is left behind with size
    /// zero (coalescing folds it away once a neighbor is freed). Returns
    /// false if the pid is unknown.
    pub fn insert_segment(&mut self, pid: u32, index: usize, segment: Segment) -> bool {
        let Some(proc) = self.process_mut(pid) else {
            return false;
        };
        let gap = &mut proc.segments[index];
        debug_assert!(gap.is_free() && gap.size >= segment.size);
        gap.virtual_address += segment.size;
        gap.size -= segment.size;
        proc.segments.insert(index, segment);
        true
    }

    /// Retype the named variable as free space, size and address unchanged.
    ///
    /// Returns false if the variable does not exist for that pid.
    pub fn mark_free(&mut self, pid: u32, var_name: &str) -> bool {
        let Some(proc) = self.process_mut(pid) else {
            return false;
        };
        match proc
            .segments
            .iter_mut()
            .find(|seg| !seg.is_free() && seg.name == var_name)
        {
            Some(seg) => {
                seg.name = "<FREE_SPACE>".to_string();
                seg.kind = SegmentKind::FreeSpace;
                true
            }
            None => false,
        }
    }

    /// Merge adjacent free segments and report reclaimable pages.
    ///
    /// A page is reclaimable when it lies entirely inside a free segment
    /// after merging; partially covered boundary pages stay mapped because
    /// a live neighbor still uses them. An empty result means nothing to
    /// reclaim.
    pub fn coalesce_free(&mut self, pid: u32, page_size: u32) -> Vec<u32> {
        let Some(proc) = self.process_mut(pid) else {
            return Vec::new();
        };
        let mut i = 0;
        while i + 1 < proc.segments.len() {
            if proc.segments[i].is_free() && proc.segments[i + 1].is_free() {
                let merged = proc.segments.remove(i + 1);
                proc.segments[i].size += merged.size;
            } else {
                i += 1;
            }
        }

        let mut pages = Vec::new();
        for seg in proc.segments.iter().filter(|seg| seg.is_free()) {
            let first_full = seg.virtual_address.div_ceil(page_size);
            let end_full = seg.end() / page_size;
            pages.extend(first_full..end_full);
        }
        pages
    }

    /// Delete a process and all its segments; false if the pid is unknown
    pub fn remove_process(&mut self, pid: u32) -> bool {
        let before = self.processes.len();
        self.processes.retain(|proc| proc.pid != pid);
        self.processes.len() != before
    }

    /// Bytes of one process's address space already in use: the end of its
    /// last allocated segment (everything beyond is the free tail).
    pub fn in_use_bytes(&self, pid: u32) -> u32 {
        self.process(pid)
            .map(|proc| {
                proc.segments
                    .iter()
                    .filter(|seg| !seg.is_free())
                    .map(Segment::end)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Sum of [`Self::in_use_bytes`] across all processes; checked against
    /// the physical ceiling before any allocation commits.
    pub fn total_allocated_bytes(&self) -> u32 {
        self.processes
            .iter()
            .map(|proc| self.in_use_bytes(proc.pid))
            .sum()
    }
}
