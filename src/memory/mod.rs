//! Memory model for the simulator
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Tagged scalar values and their little-endian byte encoding
//! - [`address_space`]: Per-process segment lists with first-fit holes and coalescing
//! - [`page_table`]: Lazy (pid, page) → frame mapping and address translation
//! - [`physical`]: The flat physical byte store backing every frame
//!
//! # Address Spaces
//!
//! Each process owns an ordered list of [`address_space::Segment`]s that
//! partitions `[0, MEMORY_SIZE)` with no gaps and no overlap: allocated
//! variables interleaved with free space. Virtual pages are backed by
//! physical frames only once an allocation actually touches them.

pub mod address_space;
pub mod page_table;
pub mod physical;
pub mod value;

use std::str::FromStr;

/// Total physical memory shared by all simulated processes (64 MiB)
pub const MEMORY_SIZE: u32 = 64 * 1024 * 1024;

/// First pid handed out; pids count upward from here and are never reused
pub const FIRST_PID: u32 = 1024;

/// Fixed size of the `<STACK>` segment every process is bootstrapped with
pub const STACK_SIZE: u32 = 65_536;

/// Scalar element types a variable can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Char,
    Short,
    Int,
    Float,
    Long,
    Double,
}

impl DataType {
    /// Byte width of a single element of this type
    pub fn width(self) -> u32 {
        match self {
            DataType::Char => 1,
            DataType::Short => 2,
            DataType::Int | DataType::Float => 4,
            DataType::Long | DataType::Double => 8,
        }
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" => Ok(DataType::Char),
            "short" => Ok(DataType::Short),
            "int" => Ok(DataType::Int),
            "float" => Ok(DataType::Float),
            "long" => Ok(DataType::Long),
            "double" => Ok(DataType::Double),
            _ => Err(format!("unknown data type '{}'", s)),
        }
    }
}
