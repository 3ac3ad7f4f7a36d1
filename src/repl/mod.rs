//! Interactive command session
//!
//! This module wires the command grammar to the simulator:
//! - [`command`]: line parsing (text → [`command::Command`])
//! - [`Session`]: dispatch, table printing, and the prompt loop
//!
//! All user-visible output goes through the writer handed to
//! [`Session::handle_line`], so tests can capture a whole session in a
//! `Vec<u8>`. Diagnostics for internal invariant breaches go to stderr.

pub mod command;

use std::io::{self, BufRead, Write};

use crate::memory::address_space::SegmentKind;
use crate::memory::value::ScalarValue;
use crate::simulator::allocator::is_bootstrap;
use crate::simulator::errors::SimError;
use crate::simulator::Simulator;
use command::Command;

/// Whether the session should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Continue,
    Exit,
}

/// One interactive session over one simulated machine
#[derive(Debug)]
pub struct Session {
    sim: Simulator,
}

impl Session {
    pub fn new(page_size: u32) -> Self {
        Session {
            sim: Simulator::new(page_size),
        }
    }

    /// Read-only view of the machine, for tests and callers that inspect
    /// state between commands
    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Prompt loop: read a line, handle it, repeat until `exit` or EOF
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if self.handle_line(line.trim_end(), &mut output)? == SessionStatus::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and execute one command line, writing any output to `out`.
    ///
    /// Every failure is a single `error: ...` line; the command is otherwise
    /// a no-op and the session continues.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<SessionStatus> {
        if line.trim().is_empty() {
            return Ok(SessionStatus::Continue);
        }
        let cmd = match command::parse_command(line) {
            Ok(cmd) => cmd,
            Err(message) => {
                writeln!(out, "{}", message)?;
                return Ok(SessionStatus::Continue);
            }
        };
        if cmd == Command::Exit {
            return Ok(SessionStatus::Exit);
        }
        self.dispatch(cmd, out)?;
        Ok(SessionStatus::Continue)
    }

    fn dispatch<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Create {
                text_size,
                data_size,
            } => match self.sim.create_process(text_size, data_size) {
                Ok(pid) => writeln!(out, "{}", pid),
                Err(err) => self.report(err, out),
            },
            Command::Allocate {
                pid,
                var_name,
                data_type,
                num_elements,
            } => match self.sim.allocate(pid, &var_name, data_type, num_elements) {
                // Bootstrap segments are placed silently; everything else
                // echoes its virtual address.
                Ok(address) if !is_bootstrap(&var_name) => writeln!(out, "{}", address),
                Ok(_) => Ok(()),
                Err(err) => self.report(err, out),
            },
            Command::Set {
                pid,
                var_name,
                offset,
                values,
            } => self.handle_set(pid, &var_name, offset, &values, out),
            Command::Free { pid, var_name } => match self.sim.free(pid, &var_name) {
                Ok(()) => Ok(()),
                Err(err) => self.report(err, out),
            },
            Command::Terminate { pid } => match self.sim.terminate(pid) {
                Ok(()) => Ok(()),
                Err(err) => self.report(err, out),
            },
            Command::PrintMmu => self.print_mmu(out),
            Command::PrintPage => self.print_page(out),
            Command::PrintProcesses => self.print_processes(out),
            Command::PrintVariable { pid, var_name } => self.print_variable(pid, &var_name, out),
            Command::Exit => Ok(()),
        }
    }

    fn handle_set<W: Write>(
        &mut self,
        pid: u32,
        var_name: &str,
        offset: u32,
        values: &[String],
        out: &mut W,
    ) -> io::Result<()> {
        let data_type = match self.sim.variable_type(pid, var_name) {
            Ok(data_type) => data_type,
            Err(err) => return self.report(err, out),
        };
        // Parse everything before writing anything, so a bad token leaves
        // the variable untouched.
        let mut parsed = Vec::with_capacity(values.len());
        for token in values {
            match ScalarValue::parse(data_type, token) {
                Ok(value) => parsed.push(value),
                Err(message) => return writeln!(out, "error: {}", message),
            }
        }
        for (i, value) in parsed.into_iter().enumerate() {
            let element_offset = offset.saturating_add(i as u32);
            if let Err(err) = self.sim.write_element(pid, var_name, element_offset, value) {
                return self.report(err, out);
            }
        }
        Ok(())
    }

    fn print_variable<W: Write>(&self, pid: u32, var_name: &str, out: &mut W) -> io::Result<()> {
        let values = match self.sim.read_typed_array(pid, var_name) {
            Ok(values) => values,
            Err(err) => return self.report(err, out),
        };
        let shown: Vec<String> = values.iter().take(4).map(ToString::to_string).collect();
        if values.len() > 4 {
            writeln!(out, "{}, ... [{} items]", shown.join(", "), values.len())
        } else {
            writeln!(out, "{}", shown.join(", "))
        }
    }

    fn print_mmu<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, " PID  | Variable Name | Virtual Addr | Size")?;
        writeln!(out, "------+---------------+--------------+------------")?;
        for proc in self.sim.registry().processes() {
            for seg in &proc.segments {
                if let SegmentKind::Variable(_) = seg.kind {
                    writeln!(
                        out,
                        " {:4} | {:<13} |  0x{:08X}  | {:10} ",
                        proc.pid, seg.name, seg.virtual_address, seg.size
                    )?;
                }
            }
        }
        Ok(())
    }

    fn print_page<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, " PID  | Page Number | Frame Number")?;
        writeln!(out, "------+-------------+--------------")?;
        for (pid, page_number, frame_number) in self.sim.page_table().entries_sorted() {
            // The table treats page keys as 1-based: each prints one lower
            // than stored, so page 0 shows as -1.
            writeln!(
                out,
                " {:4} | {:11} | {:12} ",
                pid,
                page_number as i64 - 1,
                frame_number
            )?;
        }
        Ok(())
    }

    fn print_processes<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for proc in self.sim.registry().processes() {
            writeln!(out, "{}", proc.pid)?;
        }
        Ok(())
    }

    fn report<W: Write>(&self, err: SimError, out: &mut W) -> io::Result<()> {
        if err.is_invariant_breach() {
            eprintln!("internal error: {}", err);
        }
        writeln!(out, "{}", err)
    }
}
