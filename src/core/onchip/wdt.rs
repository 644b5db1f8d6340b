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

//! Watchdog timer (WDT)
//!
//! An 8-bit up-counter that either raises the ITI interrupt on overflow
//! (interval mode) or requests a reset (watchdog mode). Registers are read
//! as bytes but written with keyed 16-bit writes:
//!
//! | Write address | Upper byte | Effect               |
//! |---------------|------------|----------------------|
//! | 0x80          | 0xA5       | WTCSR <- lower byte  |
//! | 0x80          | 0x5A       | WTCNT <- lower byte  |
//! | 0x82          | 0xA5       | clear RSTCSR.WOVF    |
//! | 0x82          | 0x5A       | RSTCSR.RSTE/RSTS     |

const WTCSR_OVF: u8 = 1 << 7;
const WTCSR_WT_IT: u8 = 1 << 6;
const WTCSR_TME: u8 = 1 << 5;

const RSTCSR_WOVF: u8 = 1 << 7;

/// Prescaler dividers selected by WTCSR.CKS
const DIVIDER_SHIFTS: [u32; 8] = [1, 6, 7, 8, 9, 10, 12, 13];

/// Watchdog timer state
pub struct WatchdogTimer {
    pub(crate) wtcsr: u8,
    pub(crate) wtcnt: u8,
    pub(crate) rstcsr: u8,
    pub(crate) cycle_count: u64,
}

impl WatchdogTimer {
    pub fn new() -> Self {
        Self {
            wtcsr: 0x18,
            wtcnt: 0,
            rstcsr: 0x1F,
            cycle_count: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn counter(&self) -> u8 {
        self.wtcnt
    }

    fn running(&self) -> bool {
        self.wtcsr & WTCSR_TME != 0
    }

    fn watchdog_mode(&self) -> bool {
        self.wtcsr & WTCSR_WT_IT != 0
    }

    /// Watchdog-mode overflow occurred and has not been cleared
    pub fn reset_requested(&self) -> bool {
        self.rstcsr & RSTCSR_WOVF != 0
    }

    /// Interval-mode overflow interrupt
    pub fn iti_pending(&self) -> bool {
        !self.watchdog_mode() && self.wtcsr & WTCSR_OVF != 0
    }

    /// Run the counter for `cycles` CPU cycles
    ///
    /// Returns true if the interval interrupt was raised.
    pub fn advance(&mut self, cycles: u64) -> bool {
        if !self.running() {
            return false;
        }
        let shift = DIVIDER_SHIFTS[(self.wtcsr & 7) as usize];
        self.cycle_count += cycles;
        let ticks = self.cycle_count >> shift;
        self.cycle_count &= (1 << shift) - 1;
        if ticks == 0 {
            return false;
        }

        let total = self.wtcnt as u64 + ticks;
        self.wtcnt = total as u8;
        if total < 0x100 {
            return false;
        }

        if self.watchdog_mode() {
            if self.rstcsr & RSTCSR_WOVF == 0 {
                log::warn!("Watchdog overflow: reset requested");
            }
            self.rstcsr |= RSTCSR_WOVF;
            false
        } else {
            let raised = self.wtcsr & WTCSR_OVF == 0;
            self.wtcsr |= WTCSR_OVF;
            raised
        }
    }

    /// Byte read at on-chip offset 0x80..=0x83
    pub fn read_byte(&self, offset: u32) -> u8 {
        match offset {
            0x80 => self.wtcsr,
            0x81 => self.wtcnt,
            0x83 => self.rstcsr,
            _ => 0,
        }
    }

    /// Keyed 16-bit write at offset 0x80 or 0x82
    pub fn write_word(&mut self, offset: u32, value: u16) {
        let key = (value >> 8) as u8;
        let data = value as u8;
        match (offset, key) {
            (0x80, 0xA5) => {
                let ovf = self.wtcsr & data & WTCSR_OVF;
                self.wtcsr = ovf | (data & 0x67) | 0x18;
                if !self.running() {
                    self.wtcnt = 0;
                }
            }
            (0x80, 0x5A) => self.wtcnt = data,
            (0x82, 0xA5) => {
                if data == 0 {
                    self.rstcsr &= !RSTCSR_WOVF;
                }
            }
            (0x82, 0x5A) => self.rstcsr = (self.rstcsr & RSTCSR_WOVF) | (data & 0x60) | 0x1F,
            _ => log::debug!(
                "Ignoring unkeyed WDT write 0x{:04X} at offset 0x{:02X}",
                value,
                offset
            ),
        }
    }
}

impl Default for WatchdogTimer {
    fn default() -> Self {
        Self::new()
    }
}
