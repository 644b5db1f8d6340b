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

//! On-chip register bank
//!
//! The 512-byte window at 0xFFFF_FE00 holds the control registers of every
//! on-chip module. The low half (offsets 0x00-0xFF) is accessed with 8- or
//! 16-bit accesses, the high half (0x100-0x1FF) with 16- or 32-bit accesses.
//! Other widths are logged and ignored (reads return zero).
//!
//! ## Low half
//!
//! ```text
//! 0x00-0x05  SCI    SMR BRR SCR TDR SSR RDR
//! 0x10-0x19  FRT    TIER FTCSR FRC OCRA/B TCR TOCR FICR
//! 0x60-0x69  INTC   IPRB VCRA VCRB VCRC VCRD
//! 0x71-0x72  DMAC   DRCR0 DRCR1
//! 0x80-0x83  WDT    WTCSR WTCNT RSTCSR (keyed 16-bit writes)
//! 0x91       SBYCR
//! 0x92       CCR
//! 0xE0-0xE5  INTC   ICR IPRA VCRWDT
//! ```
//!
//! ## High half
//!
//! ```text
//! 0x100-0x13F  DIVU  DVSR DVDNT DVCR VCRDIV DVDNTH DVDNTL (mirrored at +0x20)
//! 0x180-0x1B0  DMAC  SAR DAR TCR CHCR (x2), VCRDMA0/1, DMAOR
//! 0x1E0-0x1F8  BSC   BCR1 BCR2 WCR MCR RTCSR RTCNT RTCOR
//! ```

mod bsc;
mod divu;
mod frt;
mod sci;
mod wdt;

#[cfg(test)]
mod tests;

pub use bsc::{BusStateController, BSC_WRITE_KEY};
pub use divu::{DivisionResult, DivisionUnit};
pub use frt::FreeRunningTimer;
pub use sci::SerialInterface;
pub use wdt::WatchdogTimer;

use crate::core::cpu::Sh2;
use crate::core::interrupt::{InterruptController, InterruptSource};
use crate::core::memory::{Bus, MemPrimitive};

/// Base address of the on-chip register window
pub const ONCHIP_BASE: u32 = 0xFFFF_FE00;

const FRT_SOURCES: [InterruptSource; 3] = [
    InterruptSource::FrtIci,
    InterruptSource::FrtOci,
    InterruptSource::FrtOvi,
];

const SCI_SOURCES: [InterruptSource; 4] = [
    InterruptSource::SciEri,
    InterruptSource::SciRxi,
    InterruptSource::SciTxi,
    InterruptSource::SciTei,
];

/// Sources whose level lives in IPRA
const IPRA_SOURCES: [InterruptSource; 5] = [
    InterruptSource::DivuOvfi,
    InterruptSource::Dmac0XferEnd,
    InterruptSource::Dmac1XferEnd,
    InterruptSource::WdtIti,
    InterruptSource::BscRefCmi,
];

/// Sources whose level lives in IPRB
const IPRB_SOURCES: [InterruptSource; 7] = [
    InterruptSource::SciEri,
    InterruptSource::SciRxi,
    InterruptSource::SciTxi,
    InterruptSource::SciTei,
    InterruptSource::FrtIci,
    InterruptSource::FrtOci,
    InterruptSource::FrtOvi,
];

impl Sh2 {
    /// Read an on-chip register
    ///
    /// `offset` is relative to [`ONCHIP_BASE`] and aligned to the access size.
    pub(crate) fn onchip_read<T: MemPrimitive, const PEEK: bool>(&mut self, offset: u32) -> T {
        match (T::SIZE, offset < 0x100) {
            (1, true) => T::from_u32(self.onchip_read_byte::<PEEK>(offset) as u32),
            (2, true) => T::from_u32(self.onchip_read_word::<PEEK>(offset) as u32),
            (2, false) => T::from_long(self.onchip_read_long(offset & !3), offset),
            (4, false) => T::from_u32(self.onchip_read_long(offset)),
            _ => {
                if !PEEK {
                    log::debug!(
                        "Invalid {}-bit on-chip read at 0x{:08X}",
                        T::SIZE * 8,
                        ONCHIP_BASE | offset
                    );
                }
                T::from_u32(0)
            }
        }
    }

    /// Write an on-chip register
    ///
    /// `PEEK` marks a debugger poke: the value is stored but no division,
    /// DMA transfer or interrupt re-evaluation is started.
    pub(crate) fn onchip_write<T: MemPrimitive, const PEEK: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        offset: u32,
        value: T,
    ) {
        let value = value.to_u32();
        match (T::SIZE, offset < 0x100) {
            (1, true) => self.onchip_write_byte::<PEEK>(offset, value as u8),
            (2, true) => self.onchip_write_word::<PEEK>(offset, value as u16),
            (2, false) => {
                // Merge into the containing long register
                let aligned = offset & !3;
                let shift = if offset & 2 == 0 { 16 } else { 0 };
                let current = self.onchip_read_long(aligned);
                let merged = (current & !(0xFFFF << shift)) | (value << shift);
                self.onchip_write_long::<PEEK, CACHE>(bus, aligned, merged);
            }
            (4, false) => self.onchip_write_long::<PEEK, CACHE>(bus, offset, value),
            _ => log::debug!(
                "Invalid {}-bit on-chip write 0x{:08X} at 0x{:08X}",
                T::SIZE * 8,
                value,
                ONCHIP_BASE | offset
            ),
        }
    }

    fn onchip_read_byte<const PEEK: bool>(&mut self, offset: u32) -> u8 {
        match offset {
            0x00..=0x05 => self.sci.read_byte(offset),
            0x10..=0x19 => self.frt.read_byte(offset, PEEK),
            0x60 => (self.intc.read_iprb() >> 8) as u8,
            0x61 => self.intc.read_iprb() as u8,
            0x62 => (self.intc.read_vcra() >> 8) as u8,
            0x63 => self.intc.read_vcra() as u8,
            0x64 => (self.intc.read_vcrb() >> 8) as u8,
            0x65 => self.intc.read_vcrb() as u8,
            0x66 => (self.intc.read_vcrc() >> 8) as u8,
            0x67 => self.intc.read_vcrc() as u8,
            0x68 => (self.intc.read_vcrd() >> 8) as u8,
            0x69 => self.intc.read_vcrd() as u8,
            0x71 => self.dmac.channels[0].resource_select,
            0x72 => self.dmac.channels[1].resource_select,
            0x80..=0x83 => self.wdt.read_byte(offset),
            0x91 => self.sbycr,
            0x92 => self.cache.ccr(),
            0xE0 => (self.intc.read_icr() >> 8) as u8,
            0xE1 => self.intc.read_icr() as u8,
            0xE2 => (self.intc.read_ipra() >> 8) as u8,
            0xE3 => self.intc.read_ipra() as u8,
            0xE4 => (self.intc.read_vcrwdt() >> 8) as u8,
            0xE5 => self.intc.read_vcrwdt() as u8,
            _ => {
                if !PEEK {
                    log::debug!("Unmapped on-chip byte read at offset 0x{:03X}", offset);
                }
                0
            }
        }
    }

    fn onchip_read_word<const PEEK: bool>(&mut self, offset: u32) -> u16 {
        match offset {
            0x60 => self.intc.read_iprb(),
            0x62 => self.intc.read_vcra(),
            0x64 => self.intc.read_vcrb(),
            0x66 => self.intc.read_vcrc(),
            0x68 => self.intc.read_vcrd(),
            0xE0 => self.intc.read_icr(),
            0xE2 => self.intc.read_ipra(),
            0xE4 => self.intc.read_vcrwdt(),
            _ => {
                // 8-bit register: the byte appears in both halves
                let byte = self.onchip_read_byte::<PEEK>(offset) as u16;
                (byte << 8) | byte
            }
        }
    }

    fn onchip_read_long(&mut self, offset: u32) -> u32 {
        match offset {
            0x100..=0x13F => match 0x100 | (offset & 0x1F) {
                0x100 => self.divu.dvsr,
                0x104 => self.divu.dvdnt,
                0x108 => self.divu.read_dvcr(),
                0x10C => self.intc.read_vcrdiv(),
                0x110 | 0x118 => self.divu.dvdnth,
                _ => self.divu.dvdntl,
            },
            0x180 => self.dmac.channels[0].source_address,
            0x184 => self.dmac.channels[0].destination_address,
            0x188 => self.dmac.channels[0].transfer_count,
            0x18C => self.dmac.channels[0].read_chcr(),
            0x190 => self.dmac.channels[1].source_address,
            0x194 => self.dmac.channels[1].destination_address,
            0x198 => self.dmac.channels[1].transfer_count,
            0x19C => self.dmac.channels[1].read_chcr(),
            0x1A0 => self.intc.read_vcrdma(0),
            0x1A8 => self.intc.read_vcrdma(1),
            0x1B0 => self.dmac.read_dmaor(),
            0x1E0..=0x1FF => self.bsc.read_long(offset),
            _ => 0,
        }
    }

    fn onchip_write_byte<const PEEK: bool>(&mut self, offset: u32, value: u8) {
        match offset {
            0x00..=0x05 => {
                self.sci.write_byte(offset, value, PEEK);
                if !PEEK {
                    self.update_interrupts(&SCI_SOURCES);
                }
            }
            0x10..=0x19 => {
                self.frt.write_byte(offset, value, PEEK);
                if !PEEK {
                    self.update_interrupts(&FRT_SOURCES);
                }
            }
            0x60..=0x69 | 0xE0..=0xE5 => {
                // Read-modify-write the containing 16-bit register
                let aligned = offset & !1;
                let current = self.onchip_read_word::<true>(aligned);
                let merged = if offset & 1 == 0 {
                    (current & 0x00FF) | ((value as u16) << 8)
                } else {
                    (current & 0xFF00) | value as u16
                };
                self.write_intc_word::<PEEK>(aligned, merged);
            }
            0x71 => self.dmac.write_drcr(0, value),
            0x72 => self.dmac.write_drcr(1, value),
            0x80..=0x83 => log::debug!("Ignoring 8-bit WDT write at offset 0x{:02X}", offset),
            0x91 => self.sbycr = value & 0xDF,
            0x92 => self.cache.write_ccr(value),
            _ => log::debug!(
                "Unmapped on-chip byte write 0x{:02X} at offset 0x{:03X}",
                value,
                offset
            ),
        }
    }

    fn onchip_write_word<const PEEK: bool>(&mut self, offset: u32, value: u16) {
        match offset {
            0x60..=0x69 | 0xE0..=0xE5 => self.write_intc_word::<PEEK>(offset, value),
            0x80 | 0x82 => {
                self.wdt.write_word(offset, value);
                if !PEEK {
                    self.update_interrupts(&[InterruptSource::WdtIti]);
                }
            }
            _ => {
                self.onchip_write_byte::<PEEK>(offset, (value >> 8) as u8);
                self.onchip_write_byte::<PEEK>(offset | 1, value as u8);
            }
        }
    }

    fn write_intc_word<const PEEK: bool>(&mut self, offset: u32, value: u16) {
        // Vector and ICR writes never change which source is pending
        let sources: &[InterruptSource] = match offset {
            0x60 => &IPRB_SOURCES,
            0xE2 => &IPRA_SOURCES,
            _ => &[],
        };
        let mut previous = [0u8; IPRB_SOURCES.len()];
        for (level, &source) in previous.iter_mut().zip(sources) {
            *level = self.intc.level(source);
        }

        match offset {
            0x60 => self.intc.write_iprb(value),
            0x62 => self.intc.write_vcra(value),
            0x64 => self.intc.write_vcrb(value),
            0x66 => self.intc.write_vcrc(value),
            0x68 => self.intc.write_vcrd(value),
            0xE0 => self.intc.write_icr(value),
            0xE2 => self.intc.write_ipra(value),
            0xE4 => self.intc.write_vcrwdt(value),
            _ => return,
        }
        if !PEEK {
            self.update_interrupt_levels(sources, &previous);
        }
    }

    fn onchip_write_long<const PEEK: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        offset: u32,
        value: u32,
    ) {
        match offset {
            0x100..=0x13F => self.write_divu::<PEEK>(0x100 | (offset & 0x1F), value),
            0x180 | 0x190 => self.dmac.write_sar(Self::dma_channel_index(offset), value),
            0x184 | 0x194 => self.dmac.write_dar(Self::dma_channel_index(offset), value),
            0x188 | 0x198 => self.dmac.write_tcr(Self::dma_channel_index(offset), value),
            0x18C | 0x19C => {
                let index = Self::dma_channel_index(offset);
                self.dmac.channels[index].write_chcr(value);
                if !PEEK {
                    self.update_interrupts(&[InterruptController::dma_source(index)]);
                    self.run_dma::<CACHE>(bus);
                }
            }
            0x1A0 => self.intc.write_vcrdma(0, value),
            0x1A8 => self.intc.write_vcrdma(1, value),
            0x1B0 => {
                self.dmac.write_dmaor(value);
                if !PEEK {
                    self.run_dma::<CACHE>(bus);
                }
            }
            0x1E0..=0x1FF => {
                self.bsc.write_long(offset, value);
                if !PEEK {
                    self.update_interrupts(&[InterruptSource::BscRefCmi]);
                }
            }
            _ => log::debug!(
                "Unmapped on-chip long write 0x{:08X} at offset 0x{:03X}",
                value,
                offset
            ),
        }
    }

    fn dma_channel_index(offset: u32) -> usize {
        ((offset >> 4) & 1) as usize
    }

    fn write_divu<const PEEK: bool>(&mut self, offset: u32, value: u32) {
        match offset {
            0x100 => self.divu.dvsr = value,
            0x104 => {
                if PEEK {
                    self.divu.dvdnt = value;
                    return;
                }
                let divisor = self.divu.dvsr as i32;
                let irq_enable = self.divu.overflow_interrupt_enabled();
                if let Some(tracer) = self.tracer.as_mut() {
                    tracer.begin_32x32_division(value as i32, divisor, irq_enable);
                }
                let result = self.divu.divide_32(value);
                self.finish_division(result, false);
            }
            0x108 => {
                self.divu.write_dvcr(value);
                if !PEEK {
                    self.update_interrupts(&[InterruptSource::DivuOvfi]);
                }
            }
            0x10C => self.intc.write_vcrdiv(value),
            0x110 | 0x118 => self.divu.dvdnth = value,
            _ => {
                if PEEK {
                    self.divu.dvdntl = value;
                    return;
                }
                let dividend = self.divu.dividend_64(value);
                let divisor = self.divu.dvsr as i32;
                let irq_enable = self.divu.overflow_interrupt_enabled();
                if let Some(tracer) = self.tracer.as_mut() {
                    tracer.begin_64x32_division(dividend, divisor, irq_enable);
                }
                let result = self.divu.divide_64(value);
                self.finish_division(result, true);
            }
        }
    }

    fn finish_division(&mut self, result: DivisionResult, wide: bool) {
        if let Some(tracer) = self.tracer.as_mut() {
            if wide {
                tracer.end_64x32_division(result.quotient, result.remainder, result.overflow);
            } else {
                tracer.end_32x32_division(result.quotient, result.remainder, result.overflow);
            }
        }
        if result.overflow {
            log::debug!(
                "[{}] DIVU overflow (quotient saturated to 0x{:08X})",
                self.config.role.tag(),
                result.quotient as u32
            );
            self.update_interrupts(&[InterruptSource::DivuOvfi]);
        }
    }
}
