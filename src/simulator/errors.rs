//! Simulation error types
//!
//! [`SimError`] covers everything a command can fail with. None of these are
//! fatal: the session reports the error as a single line and keeps accepting
//! input, and a failed operation leaves all state unchanged.
//!
//! [`SimError::UnmappedPage`] is different in kind: on valid input every
//! address inside an allocated variable translates, so surfacing it means an
//! internal invariant broke. The session logs it loudly in addition to the
//! normal error line.

use std::fmt;

/// Errors surfaced by simulator operations
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// No live process has this pid
    ProcessNotFound { pid: u32 },

    /// The process has no variable with this name
    VariableNotFound { pid: u32, name: String },

    /// No free segment in this process's space is large enough
    OutOfSpace { pid: u32, requested: u32 },

    /// Granting the request would exceed total physical memory
    OutOfMemory { requested: u64, limit: u64 },

    /// Address translation hit a page with no frame (invariant breach)
    UnmappedPage { pid: u32, page_number: u32 },
}

impl SimError {
    /// True for errors that indicate internal state corruption rather than
    /// a bad command
    pub fn is_invariant_breach(&self) -> bool {
        matches!(self, SimError::UnmappedPage { .. })
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ProcessNotFound { .. } => {
                write!(f, "error: process not found")
            }
            SimError::VariableNotFound { .. } => {
                write!(f, "error: variable not found")
            }
            SimError::OutOfSpace { requested, .. } => {
                write!(f, "error: no free space large enough for {} bytes", requested)
            }
            SimError::OutOfMemory { requested, limit } => {
                write!(
                    f,
                    "error: allocating {} bytes would exceed the {} bytes of physical memory",
                    requested, limit
                )
            }
            SimError::UnmappedPage { pid, page_number } => {
                write!(
                    f,
                    "error: no mapping for page {} of process {}",
                    page_number, pid
                )
            }
        }
    }
}

impl std::error::Error for SimError {}
