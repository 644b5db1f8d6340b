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

use crate::core::cache::Cache;
use crate::core::config::Sh2Config;
use crate::core::dma::{DmaController, DmaRequestSource};
use crate::core::interrupt::{InterruptController, InterruptSource, PendingInterrupt};
use crate::core::memory::Bus;
use crate::core::onchip::{
    BusStateController, DivisionUnit, FreeRunningTimer, SerialInterface, WatchdogTimer,
};
use serde::Serialize;

/// Hitachi SH-2 (SH7604) interpreter core
///
/// # Specifications
/// - Architecture: SuperH SH-2 (32-bit RISC, 16-bit fixed-length instructions)
/// - Registers: 16 general-purpose registers + SR, GBR, VBR, MACH/MACL, PR, PC
/// - One delay slot after every delayed branch
/// - On-chip cache, interrupt controller, DMAC, DIVU, FRT, WDT, SCI and BSC
///
/// The core never owns its memory. Every call that may touch memory borrows
/// the system bus for the duration of the call.
///
/// # Example
/// ```
/// use sh2_core::core::cpu::Sh2;
/// use sh2_core::core::memory::RamBus;
///
/// let mut bus = RamBus::new(0x10000);
/// bus.load(0, &[0, 0, 0x10, 0, 0, 0, 0x80, 0]).unwrap();
/// bus.load_program(0x1000, &[0x0009, 0x0009]); // nop; nop
///
/// let mut cpu = Sh2::default();
/// cpu.reset(&mut bus, true);
/// assert_eq!(cpu.pc(), 0x1000);
/// assert_eq!(cpu.reg(15), 0x8000);
///
/// let cycles = cpu.advance(&mut bus, 2);
/// assert_eq!(cycles, 2);
/// assert_eq!(cpu.pc(), 0x1004);
/// ```
pub struct Sh2 {
    /// General purpose registers (R0-R15); R15 is the stack pointer
    pub(crate) r: [u32; 16],

    /// Program counter
    pub(crate) pc: u32,

    /// Procedure register (return address)
    pub(crate) pr: u32,

    /// Multiply-accumulate register
    pub(crate) mac: MacRegister,

    /// Status register
    pub(crate) sr: StatusRegister,

    /// Global base register
    pub(crate) gbr: u32,

    /// Vector base register
    pub(crate) vbr: u32,

    /// A delayed branch is waiting for its slot instruction
    pub(crate) delay_slot: bool,

    /// Branch target committed after the slot instruction
    pub(crate) delay_slot_target: u32,

    /// Last instruction was SLEEP
    pub(crate) sleeping: bool,

    /// Total cycles executed since creation
    pub(crate) total_cycles: u64,

    pub(crate) config: Sh2Config,

    pub(crate) cache: Cache,
    pub(crate) intc: InterruptController,
    pub(crate) dmac: DmaController,
    pub(crate) bsc: BusStateController,
    pub(crate) divu: DivisionUnit,
    pub(crate) frt: FreeRunningTimer,
    pub(crate) wdt: WatchdogTimer,
    pub(crate) sci: SerialInterface,

    /// Standby control register
    pub(crate) sbycr: u8,

    /// DREQ / RXI / TXI request lines
    pub(crate) dma_requests: [bool; 3],

    decode_table: &'static DecodeTable,
    pub(crate) tracer: Option<Box<dyn Sh2Tracer>>,
    external_ack: Option<Box<dyn FnMut() + Send>>,
}

/// Snapshot of the architectural registers
///
/// Serializable so front-ends can dump it as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterDump {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub sr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
    pub cycles: u64,
}

// Module declarations
mod decode;
mod disassembler;
mod exception;
mod instructions;
mod registers;
#[cfg(test)]
mod tests;
mod tracer;

// Re-exports
pub use decode::{decode_instruction, DecodeEntry, DecodeTable, DecodedArgs, OpcodeType};
pub use disassembler::Disassembler;
pub use exception::{
    VECTOR_CPU_ADDRESS_ERROR, VECTOR_DMA_ADDRESS_ERROR, VECTOR_ILLEGAL_INSTRUCTION, VECTOR_ILLEGAL_SLOT,
};
pub use registers::{MacRegister, StatusRegister};
pub use tracer::{FileTracer, Sh2Tracer};

impl Sh2 {
    /// Cycles charged for accepting an interrupt
    pub const INTERRUPT_CYCLES: u64 = 13;

    /// Create a new core
    ///
    /// Registers start in their reset state, but PC and SP are only loaded
    /// from the vector table by [`Sh2::reset`].
    pub fn new(config: Sh2Config) -> Self {
        log::debug!(
            "[{}] Creating SH-2 core (cache emulation: {})",
            config.role.tag(),
            config.cache_emulation
        );
        Self {
            r: [0; 16],
            pc: 0,
            pr: 0,
            mac: MacRegister::default(),
            sr: StatusRegister::reset_value(),
            gbr: 0,
            vbr: 0,
            delay_slot: false,
            delay_slot_target: 0,
            sleeping: false,
            total_cycles: 0,
            cache: Cache::new(),
            intc: InterruptController::new(),
            dmac: DmaController::new(),
            bsc: BusStateController::new(config.role),
            divu: DivisionUnit::new(),
            frt: FreeRunningTimer::new(),
            wdt: WatchdogTimer::new(),
            sci: SerialInterface::new(),
            sbycr: 0,
            dma_requests: [false; 3],
            decode_table: DecodeTable::get(),
            tracer: None,
            external_ack: None,
            config,
        }
    }

    /// Reset the core
    ///
    /// A power-on reset (`hard`) loads PC and SP from vectors 0 and 1 and
    /// also resets the bus state controller, the cache and the watchdog. A
    /// manual reset uses vectors 2 and 3 and keeps those three modules.
    pub fn reset(&mut self, bus: &mut dyn Bus, hard: bool) {
        self.r = [0; 16];
        self.pr = 0;
        self.mac = MacRegister::default();
        self.sr = StatusRegister::reset_value();
        self.gbr = 0;
        self.vbr = 0;
        self.delay_slot = false;
        self.delay_slot_target = 0;
        self.sleeping = false;

        self.intc.reset();
        self.dmac.reset();
        self.divu.reset();
        self.frt.reset();
        self.sci.reset();
        self.sbycr = 0;
        if hard {
            self.bsc.reset(self.config.role);
            self.cache.reset();
            self.wdt.reset();
        }

        let (pc_vector, sp_vector) = if hard { (0, 1) } else { (2, 3) };
        self.pc = self.mem_read_long::<false>(bus, pc_vector * 4) & !1;
        self.r[15] = self.mem_read_long::<false>(bus, sp_vector * 4);
        self.recalc_interrupts();

        log::info!(
            "[{}] {} reset: PC=0x{:08X} SP=0x{:08X}",
            self.config.role.tag(),
            if hard { "Power-on" } else { "Manual" },
            self.pc,
            self.r[15]
        );
    }

    /// Execute instructions until at least `cycles` cycles have elapsed
    ///
    /// # Returns
    ///
    /// Cycles actually executed; may exceed the budget by less than the cost
    /// of one instruction.
    pub fn advance(&mut self, bus: &mut dyn Bus, cycles: u64) -> u64 {
        let debug = self.tracer.is_some();
        match (debug, self.config.cache_emulation) {
            (false, false) => self.advance_impl::<false, false>(bus, cycles),
            (false, true) => self.advance_impl::<false, true>(bus, cycles),
            (true, false) => self.advance_impl::<true, false>(bus, cycles),
            (true, true) => self.advance_impl::<true, true>(bus, cycles),
        }
    }

    /// Execute exactly one instruction (or accept one interrupt)
    ///
    /// # Returns
    ///
    /// Number of cycles consumed
    pub fn step(&mut self, bus: &mut dyn Bus) -> u64 {
        let debug = self.tracer.is_some();
        match (debug, self.config.cache_emulation) {
            (false, false) => self.step_impl::<false, false>(bus),
            (false, true) => self.step_impl::<false, true>(bus),
            (true, false) => self.step_impl::<true, false>(bus),
            (true, true) => self.step_impl::<true, true>(bus),
        }
    }

    fn advance_impl<const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        cycles: u64,
    ) -> u64 {
        let mut executed = 0;
        while executed < cycles {
            executed += self.step_impl::<DEBUG, CACHE>(bus);
        }
        executed
    }

    #[inline(always)]
    fn step_impl<const DEBUG: bool, const CACHE: bool>(&mut self, bus: &mut dyn Bus) -> u64 {
        let cycles = self.interpret_next::<DEBUG, CACHE>(bus);
        self.advance_peripherals(cycles);
        self.total_cycles += cycles;
        cycles
    }

    /// Accept a pending interrupt or execute the instruction at PC
    fn interpret_next<const DEBUG: bool, const CACHE: bool>(&mut self, bus: &mut dyn Bus) -> u64 {
        if self.interrupt_eligible() {
            return self.service_interrupt::<DEBUG, CACHE>(bus);
        }

        let pc = self.pc;
        let instruction = self.mem_read::<u16, true, false, CACHE>(bus, pc);
        if self.delay_slot {
            self.execute::<DEBUG, CACHE, true>(bus, instruction)
        } else {
            self.execute::<DEBUG, CACHE, false>(bus, instruction)
        }
    }

    /// Clock the on-chip timers
    fn advance_peripherals(&mut self, cycles: u64) {
        if self.frt.advance(cycles) {
            self.update_interrupts(&[
                InterruptSource::FrtIci,
                InterruptSource::FrtOci,
                InterruptSource::FrtOvi,
            ]);
        }
        if self.wdt.advance(cycles) {
            self.update_interrupts(&[InterruptSource::WdtIti]);
        }
        if self.bsc.advance(cycles) {
            self.update_interrupts(&[InterruptSource::BscRefCmi]);
        }
    }

    /// Commit PC after the current instruction
    ///
    /// Outside a delay slot PC moves to the next instruction. In a slot the
    /// pending branch target is committed and the slot is cleared.
    #[inline(always)]
    pub(crate) fn advance_pc<const DELAY: bool>(&mut self) {
        if DELAY {
            self.pc = self.delay_slot_target;
            self.delay_slot = false;
        } else {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    /// Arm a delayed branch to `target`
    ///
    /// Bit 0 of the target is dropped; PC is always even.
    #[inline(always)]
    pub(crate) fn setup_delay_slot(&mut self, target: u32) {
        self.delay_slot = true;
        self.delay_slot_target = target & !1;
    }

    // External interfaces

    /// Set the external interrupt request (IRL) level and vector
    ///
    /// A level of 0 withdraws the request.
    pub fn set_external_interrupt(&mut self, level: u8, vector: u8) {
        log::trace!(
            "[{}] External interrupt: level {} vector 0x{:02X}",
            self.config.role.tag(),
            level,
            vector
        );
        self.intc.set_irl(level, vector);
        self.update_interrupts(&[InterruptSource::Irl]);
    }

    /// Latch a non-maskable interrupt
    ///
    /// Also sets DMAOR.NMIF, which halts both DMA channels.
    pub fn set_nmi(&mut self) {
        log::debug!("[{}] NMI raised", self.config.role.tag());
        self.intc.nmi = true;
        self.dmac.raise_nmi();
        self.update_interrupts(&[InterruptSource::Nmi]);
    }

    /// Register the callback invoked when an IRL interrupt is accepted
    pub fn set_external_ack_callback<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.external_ack = Some(Box::new(callback));
    }

    pub(crate) fn acknowledge_external_interrupt(&mut self) {
        if let Some(callback) = self.external_ack.as_mut() {
            callback();
        }
    }

    /// Pulse the FRT input capture pin
    pub fn trigger_frt_input_capture(&mut self) {
        self.frt.trigger_input_capture();
        self.update_interrupts(&[InterruptSource::FrtIci]);
    }

    /// Drive a DMA request line
    ///
    /// Channels in module-request mode waiting on `source` transfer as soon
    /// as the line is asserted.
    pub fn set_dma_request(&mut self, bus: &mut dyn Bus, source: DmaRequestSource, asserted: bool) {
        self.dma_requests[source.index()] = asserted;
        if asserted {
            if self.config.cache_emulation {
                self.run_dma::<true>(bus);
            } else {
                self.run_dma::<false>(bus);
            }
        }
    }

    /// Install an execution tracer
    pub fn set_tracer(&mut self, tracer: Box<dyn Sh2Tracer>) {
        self.tracer = Some(tracer);
    }

    /// Remove and return the current tracer
    pub fn take_tracer(&mut self) -> Option<Box<dyn Sh2Tracer>> {
        self.tracer.take()
    }

    // Register access

    /// Read a general purpose register (index masked to 0-15)
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        self.r[(index & 0xF) as usize]
    }

    /// Write a general purpose register (index masked to 0-15)
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        self.r[(index & 0xF) as usize] = value;
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Set PC; bit 0 is ignored
    pub fn set_pc(&mut self, value: u32) {
        self.pc = value & !1;
    }

    pub fn pr(&self) -> u32 {
        self.pr
    }

    pub fn set_pr(&mut self, value: u32) {
        self.pr = value;
    }

    pub fn sr(&self) -> StatusRegister {
        self.sr
    }

    pub fn set_sr(&mut self, value: u32) {
        self.sr.set_bits(value);
    }

    pub fn gbr(&self) -> u32 {
        self.gbr
    }

    pub fn set_gbr(&mut self, value: u32) {
        self.gbr = value;
    }

    pub fn vbr(&self) -> u32 {
        self.vbr
    }

    pub fn set_vbr(&mut self, value: u32) {
        self.vbr = value;
    }

    pub fn mac(&self) -> MacRegister {
        self.mac
    }

    pub fn set_mac(&mut self, value: u64) {
        self.mac.set_value(value);
    }

    /// Check if a delayed branch is pending
    pub fn in_delay_slot(&self) -> bool {
        self.delay_slot
    }

    pub fn delay_slot_target(&self) -> u32 {
        self.delay_slot_target
    }

    /// Whether the core is halted in SLEEP
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn config(&self) -> &Sh2Config {
        &self.config
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn dmac(&self) -> &DmaController {
        &self.dmac
    }

    pub fn interrupt_controller(&self) -> &InterruptController {
        &self.intc
    }

    pub fn pending_interrupt(&self) -> PendingInterrupt {
        self.intc.pending()
    }

    pub fn frt(&self) -> &FreeRunningTimer {
        &self.frt
    }

    pub fn wdt(&self) -> &WatchdogTimer {
        &self.wdt
    }

    /// Snapshot of the architectural registers
    pub fn register_dump(&self) -> RegisterDump {
        RegisterDump {
            r: self.r,
            pc: self.pc,
            pr: self.pr,
            sr: self.sr.bits(),
            gbr: self.gbr,
            vbr: self.vbr,
            mach: self.mac.high(),
            macl: self.mac.low(),
            cycles: self.total_cycles,
        }
    }

    /// Dump all CPU registers to the log
    pub fn dump_registers(&self) {
        log::info!("[{}] CPU registers:", self.config.role.tag());
        for row in 0..4 {
            let base = row * 4;
            log::info!(
                "  R{:<2}={:08X} R{:<2}={:08X} R{:<2}={:08X} R{:<2}={:08X}",
                base,
                self.r[base],
                base + 1,
                self.r[base + 1],
                base + 2,
                self.r[base + 2],
                base + 3,
                self.r[base + 3]
            );
        }
        log::info!(
            "  PC={:08X} PR={:08X} SR={:08X} GBR={:08X} VBR={:08X} MACH={:08X} MACL={:08X}",
            self.pc,
            self.pr,
            self.sr.bits(),
            self.gbr,
            self.vbr,
            self.mac.high(),
            self.mac.low()
        );
    }
}

impl Default for Sh2 {
    fn default() -> Self {
        Self::new(Sh2Config::default())
    }
}
