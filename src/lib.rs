//! # Introduction
//!
//! pagesim simulates the memory-management half of an operating system
//! kernel: one 64 MiB physical memory shared by simulated processes, each
//! with its own virtual address space. Variables are placed by a first-fit
//! segment allocator that splits and coalesces free gaps, and a page table
//! lazily assigns physical frames as each address space grows.
//!
//! ## Command pipeline
//!
//! ```text
//! stdin → Command parser → Simulator (registry / page table / buffer) → tables
//! ```
//!
//! 1. [`repl`] — parses command lines and renders the `print` tables.
//! 2. [`simulator`] — the engine: allocation, freeing, process lifecycle,
//!    and typed element access through address translation.
//! 3. [`memory`] — the state objects: [`memory::address_space`] segment
//!    lists, the [`memory::page_table::PageTable`], the flat
//!    [`memory::physical::PhysicalMemory`] byte store, and tagged
//!    [`memory::value::ScalarValue`]s.
//!
//! ## Supported commands
//!
//! `create`, `allocate`, `set`, `free`, `terminate`,
//! `print mmu|page|processes|<pid>:<var>`, `exit`.

pub mod memory;
pub mod repl;
pub mod simulator;
