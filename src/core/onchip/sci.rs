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

//! Serial communication interface (SCI)
//!
//! Register storage only: no bits are shifted in or out. The status flags
//! still drive the SCI interrupt sources so guest code that polls or masks
//! them behaves consistently.

const SCR_TIE: u8 = 1 << 7;
const SCR_RIE: u8 = 1 << 6;
const SCR_TEIE: u8 = 1 << 2;

const SSR_TDRE: u8 = 1 << 7;
const SSR_RDRF: u8 = 1 << 6;
const SSR_ERRORS: u8 = 0b0011_1000;
const SSR_TEND: u8 = 1 << 2;
const SSR_MPBT: u8 = 1 << 0;

/// SCI registers
pub struct SerialInterface {
    pub(crate) smr: u8,
    pub(crate) brr: u8,
    pub(crate) scr: u8,
    pub(crate) tdr: u8,
    pub(crate) ssr: u8,
    pub(crate) rdr: u8,
}

impl SerialInterface {
    pub fn new() -> Self {
        Self {
            smr: 0x00,
            brr: 0xFF,
            scr: 0x00,
            tdr: 0xFF,
            ssr: 0x84,
            rdr: 0x00,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn eri_pending(&self) -> bool {
        self.ssr & SSR_ERRORS != 0 && self.scr & SCR_RIE != 0
    }

    pub fn rxi_pending(&self) -> bool {
        self.ssr & SSR_RDRF != 0 && self.scr & SCR_RIE != 0
    }

    pub fn txi_pending(&self) -> bool {
        self.ssr & SSR_TDRE != 0 && self.scr & SCR_TIE != 0
    }

    pub fn tei_pending(&self) -> bool {
        self.ssr & SSR_TEND != 0 && self.scr & SCR_TEIE != 0
    }

    /// Byte read at on-chip offset 0x00..=0x05
    pub fn read_byte(&self, offset: u32) -> u8 {
        match offset {
            0x00 => self.smr,
            0x01 => self.brr,
            0x02 => self.scr,
            0x03 => self.tdr,
            0x04 => self.ssr,
            0x05 => self.rdr,
            _ => 0,
        }
    }

    /// Byte write at on-chip offset 0x00..=0x04; RDR is read-only
    pub fn write_byte(&mut self, offset: u32, value: u8, poke: bool) {
        match offset {
            0x00 => self.smr = value,
            0x01 => self.brr = value,
            0x02 => self.scr = value,
            0x03 => self.tdr = value,
            0x04 => {
                if poke {
                    self.ssr = value;
                } else {
                    // Status flags can only be cleared; TEND is read-only
                    let flags = self.ssr & value & 0xF8;
                    self.ssr = flags | (self.ssr & SSR_TEND) | (value & SSR_MPBT);
                }
            }
            0x05 if poke => self.rdr = value,
            _ => {}
        }
    }
}

impl Default for SerialInterface {
    fn default() -> Self {
        Self::new()
    }
}
