// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Execution tracing hooks
//!
//! A tracer receives callbacks for every executed instruction, accepted
//! interrupt, exception, DIVU operation and DMA transfer while it is
//! installed on a core. Hooks are only dispatched on the traced execution
//! path, so an uninstalled tracer costs nothing.

use super::Disassembler;
use crate::core::dma::AddressMode;
use crate::core::error::Result;
use crate::core::interrupt::InterruptSource;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Debug hooks invoked by the core
///
/// Every method has an empty default implementation, so implementors only
/// override what they need.
#[allow(unused_variables)]
pub trait Sh2Tracer: Send {
    /// About to execute `instruction` at `pc`
    fn execute(&mut self, pc: u32, instruction: u16, delay_slot: bool) {}

    /// Interrupt accepted
    fn interrupt(&mut self, vector: u8, level: u8, source: InterruptSource, pc: u32) {}

    /// Exception entered (after SR and PC were pushed)
    fn exception(&mut self, vector: u8, pc: u32, sr: u32) {}

    fn begin_32x32_division(&mut self, dividend: i32, divisor: i32, overflow_irq_enable: bool) {}

    fn end_32x32_division(&mut self, quotient: i32, remainder: i32, overflow: bool) {}

    fn begin_64x32_division(&mut self, dividend: i64, divisor: i32, overflow_irq_enable: bool) {}

    fn end_64x32_division(&mut self, quotient: i32, remainder: i32, overflow: bool) {}

    #[allow(clippy::too_many_arguments)]
    fn dma_transfer_begin(
        &mut self,
        channel: usize,
        source: u32,
        destination: u32,
        count: u32,
        unit_size: u32,
        source_mode: AddressMode,
        destination_mode: AddressMode,
    ) {
    }

    /// One unit moved
    fn dma_transfer(&mut self, channel: usize, source: u32, destination: u32, value: u32, size: u32) {
    }

    fn dma_transfer_end(&mut self, channel: usize, irq_raised: bool) {}
}

/// Tracer writing one line per event to a file
///
/// # Example
/// ```no_run
/// use sh2_core::core::cpu::{FileTracer, Sh2};
///
/// let mut cpu = Sh2::default();
/// cpu.set_tracer(Box::new(FileTracer::new("trace.log").unwrap()));
/// ```
pub struct FileTracer {
    output: BufWriter<File>,
    enabled: bool,
}

impl FileTracer {
    /// Create the trace file, truncating any existing one
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let output = BufWriter::new(File::create(path)?);
        Ok(Self {
            output,
            enabled: true,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flush buffered lines to disk
    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    fn write_line(&mut self, line: std::fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        if let Err(e) = writeln!(self.output, "{}", line) {
            log::warn!("Trace write failed, disabling tracer: {}", e);
            self.enabled = false;
        }
    }
}

impl Sh2Tracer for FileTracer {
    fn execute(&mut self, pc: u32, instruction: u16, delay_slot: bool) {
        let disasm = Disassembler::disassemble(instruction, pc);
        let slot = if delay_slot { " (slot)" } else { "" };
        self.write_line(format_args!(
            "PC=0x{:08X} [0x{:04X}] {}{}",
            pc, instruction, disasm, slot
        ));
    }

    fn interrupt(&mut self, vector: u8, level: u8, source: InterruptSource, pc: u32) {
        self.write_line(format_args!(
            "INT {:?} level={} vector=0x{:02X} PC=0x{:08X}",
            source, level, vector, pc
        ));
    }

    fn exception(&mut self, vector: u8, pc: u32, sr: u32) {
        self.write_line(format_args!(
            "EXC vector=0x{:02X} PC=0x{:08X} SR=0x{:08X}",
            vector, pc, sr
        ));
    }

    fn end_32x32_division(&mut self, quotient: i32, remainder: i32, overflow: bool) {
        self.write_line(format_args!(
            "DIVU 32/32 q={} r={} overflow={}",
            quotient, remainder, overflow
        ));
    }

    fn end_64x32_division(&mut self, quotient: i32, remainder: i32, overflow: bool) {
        self.write_line(format_args!(
            "DIVU 64/32 q={} r={} overflow={}",
            quotient, remainder, overflow
        ));
    }

    fn dma_transfer_begin(
        &mut self,
        channel: usize,
        source: u32,
        destination: u32,
        count: u32,
        unit_size: u32,
        source_mode: AddressMode,
        destination_mode: AddressMode,
    ) {
        self.write_line(format_args!(
            "DMA{} 0x{:08X} ({:?}) -> 0x{:08X} ({:?}) count={} unit={}",
            channel, source, source_mode, destination, destination_mode, count, unit_size
        ));
    }

    fn dma_transfer_end(&mut self, channel: usize, irq_raised: bool) {
        self.write_line(format_args!("DMA{} end irq={}", channel, irq_raised));
    }
}
