//! Typed access to variable storage
//!
//! Bridges variables to the physical buffer: a `(pid, variable, element
//! offset)` triple becomes a virtual address, the page table turns that into
//! a physical address, and the element's bytes are copied little-endian.
//!
//! Every element gets its own translation. A variable is contiguous in
//! virtual space but not necessarily in physical space once it straddles a
//! page boundary, so reading `size` bytes in one go from the first element's
//! physical address would read the wrong frames.

use super::errors::SimError;
use super::Simulator;
use crate::memory::address_space::SegmentKind;
use crate::memory::value::ScalarValue;
use crate::memory::DataType;

impl Simulator {
    /// The declared element type of a variable
    pub fn variable_type(&self, pid: u32, var_name: &str) -> Result<DataType, SimError> {
        self.lookup_variable(pid, var_name)
            .map(|(_, _, data_type)| data_type)
    }

    /// Write one element at `element_offset` within the named variable
    pub fn write_element(
        &mut self,
        pid: u32,
        var_name: &str,
        element_offset: u32,
        value: ScalarValue,
    ) -> Result<(), SimError> {
        let (base, _, _) = self.lookup_variable(pid, var_name)?;
        let width = value.data_type().width();
        // An absurd offset saturates into an address no page backs and
        // surfaces as a translation fault below.
        let virtual_address = base.saturating_add(element_offset.saturating_mul(width));
        let physical = self.translate(pid, virtual_address)?;
        self.physical
            .write_bytes(physical, &value.to_le_bytes())
            .map_err(|_| self.translation_fault(pid, virtual_address))
    }

    /// Read the whole variable as a typed sequence, element by element and
    /// in virtual order
    pub fn read_typed_array(&self, pid: u32, var_name: &str) -> Result<Vec<ScalarValue>, SimError> {
        let (base, size, data_type) = self.lookup_variable(pid, var_name)?;
        let width = data_type.width();
        let count = size / width;

        let mut values = Vec::with_capacity(count as usize);
        for i in 0..count {
            let virtual_address = base + i * width;
            let physical = self.translate(pid, virtual_address)?;
            let bytes = self
                .physical
                .read_bytes(physical, width)
                .map_err(|_| self.translation_fault(pid, virtual_address))?;
            values.push(ScalarValue::from_le_bytes(data_type, bytes));
        }
        Ok(values)
    }

    /// Resolve a variable to `(virtual base, size, element type)`
    fn lookup_variable(&self, pid: u32, var_name: &str) -> Result<(u32, u32, DataType), SimError> {
        if !self.registry.has_process(pid) {
            return Err(SimError::ProcessNotFound { pid });
        }
        let seg = self
            .registry
            .find_variable(pid, var_name)
            .ok_or_else(|| SimError::VariableNotFound {
                pid,
                name: var_name.to_string(),
            })?;
        match seg.kind {
            SegmentKind::Variable(data_type) => Ok((seg.virtual_address, seg.size, data_type)),
            SegmentKind::FreeSpace => Err(SimError::VariableNotFound {
                pid,
                name: var_name.to_string(),
            }),
        }
    }

    fn translate(&self, pid: u32, virtual_address: u32) -> Result<u32, SimError> {
        self.page_table
            .translate(pid, virtual_address)
            .ok_or_else(|| self.translation_fault(pid, virtual_address))
    }

    fn translation_fault(&self, pid: u32, virtual_address: u32) -> SimError {
        SimError::UnmappedPage {
            pid,
            page_number: virtual_address / self.page_table.page_size(),
        }
    }
}
