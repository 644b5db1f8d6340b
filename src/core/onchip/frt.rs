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

//! Free-running timer (FRT)
//!
//! A 16-bit up-counter clocked from the CPU clock through a prescaler, with
//! two output compare registers and one input capture register. The CPU
//! accesses the 16-bit registers one byte at a time through a shared TEMP
//! latch: the high byte is written first and read first.
//!
//! ```text
//! 0x10 TIER   ICIE(7) OCIAE(3) OCIBE(2) OVIE(1)
//! 0x11 FTCSR  ICF(7)  OCFA(3)  OCFB(2)  OVF(1)  CCLRA(0)
//! 0x12 FRC    high/low
//! 0x14 OCRA/B high/low (selected by TOCR.OCRS)
//! 0x16 TCR    IEDG(7) CKS(1..0)
//! 0x17 TOCR   OCRS(4) OLVLA(1) OLVLB(0)
//! 0x18 FICR   high/low
//! ```

const TIER_ICIE: u8 = 1 << 7;
const TIER_OCIAE: u8 = 1 << 3;
const TIER_OCIBE: u8 = 1 << 2;
const TIER_OVIE: u8 = 1 << 1;

const FTCSR_ICF: u8 = 1 << 7;
const FTCSR_OCFA: u8 = 1 << 3;
const FTCSR_OCFB: u8 = 1 << 2;
const FTCSR_OVF: u8 = 1 << 1;
const FTCSR_CCLRA: u8 = 1 << 0;

const TOCR_OCRS: u8 = 1 << 4;

/// Free-running timer state
pub struct FreeRunningTimer {
    pub(crate) tier: u8,
    pub(crate) ftcsr: u8,
    pub(crate) frc: u16,
    pub(crate) ocra: u16,
    pub(crate) ocrb: u16,
    pub(crate) tcr: u8,
    pub(crate) tocr: u8,
    pub(crate) ficr: u16,
    pub(crate) temp: u8,
    /// Cycles not yet converted into counter ticks
    pub(crate) cycle_count: u64,
}

impl FreeRunningTimer {
    pub fn new() -> Self {
        Self {
            tier: 0x01,
            ftcsr: 0,
            frc: 0,
            ocra: 0xFFFF,
            ocrb: 0xFFFF,
            tcr: 0,
            tocr: 0xE0,
            ficr: 0,
            temp: 0,
            cycle_count: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Prescaler shift for TCR.CKS, or `None` for the external clock
    fn clock_shift(&self) -> Option<u32> {
        match self.tcr & 3 {
            0 => Some(3),
            1 => Some(5),
            2 => Some(7),
            _ => None,
        }
    }

    /// Current counter value
    pub fn counter(&self) -> u16 {
        self.frc
    }

    /// Run the counter for `cycles` CPU cycles
    ///
    /// Returns true if any interrupt flag was raised.
    pub fn advance(&mut self, cycles: u64) -> bool {
        let Some(shift) = self.clock_shift() else {
            return false;
        };
        self.cycle_count += cycles;
        let ticks = self.cycle_count >> shift;
        self.cycle_count &= (1 << shift) - 1;

        let mut raised = false;
        for _ in 0..ticks {
            raised |= self.tick();
        }
        raised
    }

    fn tick(&mut self) -> bool {
        let before = self.ftcsr;
        let (next, overflow) = self.frc.overflowing_add(1);
        self.frc = next;
        if overflow {
            self.ftcsr |= FTCSR_OVF;
        }
        if next == self.ocrb {
            self.ftcsr |= FTCSR_OCFB;
        }
        if next == self.ocra {
            self.ftcsr |= FTCSR_OCFA;
            if self.ftcsr & FTCSR_CCLRA != 0 {
                self.frc = 0;
            }
        }
        self.ftcsr != before
    }

    /// Latch the counter into FICR
    pub fn trigger_input_capture(&mut self) {
        self.ficr = self.frc;
        self.ftcsr |= FTCSR_ICF;
        log::trace!("FRT input capture: FICR=0x{:04X}", self.ficr);
    }

    pub fn ici_pending(&self) -> bool {
        self.ftcsr & FTCSR_ICF != 0 && self.tier & TIER_ICIE != 0
    }

    pub fn oci_pending(&self) -> bool {
        (self.ftcsr & FTCSR_OCFA != 0 && self.tier & TIER_OCIAE != 0)
            || (self.ftcsr & FTCSR_OCFB != 0 && self.tier & TIER_OCIBE != 0)
    }

    pub fn ovi_pending(&self) -> bool {
        self.ftcsr & FTCSR_OVF != 0 && self.tier & TIER_OVIE != 0
    }

    fn selected_ocr(&mut self) -> &mut u16 {
        if self.tocr & TOCR_OCRS != 0 {
            &mut self.ocrb
        } else {
            &mut self.ocra
        }
    }

    /// Byte read at on-chip offset 0x10..=0x19
    ///
    /// Reading a high byte loads the low byte into TEMP unless `peek` is set.
    pub fn read_byte(&mut self, offset: u32, peek: bool) -> u8 {
        match offset {
            0x10 => self.tier,
            0x11 => self.ftcsr,
            0x12 => {
                if !peek {
                    self.temp = self.frc as u8;
                }
                (self.frc >> 8) as u8
            }
            0x13 => {
                if peek {
                    self.frc as u8
                } else {
                    self.temp
                }
            }
            0x14 => (*self.selected_ocr() >> 8) as u8,
            0x15 => *self.selected_ocr() as u8,
            0x16 => self.tcr,
            0x17 => self.tocr | 0xE0,
            0x18 => {
                if !peek {
                    self.temp = self.ficr as u8;
                }
                (self.ficr >> 8) as u8
            }
            0x19 => {
                if peek {
                    self.ficr as u8
                } else {
                    self.temp
                }
            }
            _ => 0,
        }
    }

    /// Byte write at on-chip offset 0x10..=0x19
    ///
    /// High bytes go to TEMP; the low byte write commits the 16-bit value.
    /// With `poke` set, both halves are stored directly.
    pub fn write_byte(&mut self, offset: u32, value: u8, poke: bool) {
        match offset {
            0x10 => self.tier = (value & 0x8E) | 0x01,
            0x11 => {
                // Flags can only be cleared; CCLRA is plain read/write
                let flags = if poke {
                    value & 0x8E
                } else {
                    self.ftcsr & value & 0x8E
                };
                self.ftcsr = flags | (value & FTCSR_CCLRA);
            }
            0x12 | 0x14 => {
                if poke {
                    let target = if offset == 0x12 {
                        &mut self.frc
                    } else {
                        self.selected_ocr()
                    };
                    *target = (*target & 0x00FF) | ((value as u16) << 8);
                } else {
                    self.temp = value;
                }
            }
            0x13 | 0x15 => {
                let high = if poke {
                    let current = if offset == 0x13 {
                        self.frc
                    } else {
                        *self.selected_ocr()
                    };
                    (current >> 8) as u8
                } else {
                    self.temp
                };
                let combined = ((high as u16) << 8) | value as u16;
                if offset == 0x13 {
                    self.frc = combined;
                } else {
                    *self.selected_ocr() = combined;
                }
            }
            0x16 => self.tcr = value & 0x83,
            0x17 => self.tocr = (value & 0x13) | 0xE0,
            // FICR is read-only
            0x18 | 0x19 => {}
            _ => {}
        }
    }
}

impl Default for FreeRunningTimer {
    fn default() -> Self {
        Self::new()
    }
}
