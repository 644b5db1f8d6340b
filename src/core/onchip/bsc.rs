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

//! Bus state controller (BSC)
//!
//! Holds the external bus configuration registers and the refresh timer that
//! drives the compare-match interrupt. Writes must be 32-bit with 0xA55A in
//! the upper half; anything else is ignored.

use crate::core::config::Sh2Role;

/// Key expected in the upper 16 bits of every BSC write
pub const BSC_WRITE_KEY: u32 = 0xA55A;

const BCR1_MASTER: u16 = 1 << 15;
const RTCSR_CMF: u16 = 1 << 7;
const RTCSR_CMIE: u16 = 1 << 6;

/// Refresh timer prescaler shifts for RTCSR.CKS 1..=7
const REFRESH_SHIFTS: [u32; 8] = [0, 2, 4, 6, 8, 10, 11, 12];

/// Bus state controller registers
pub struct BusStateController {
    pub(crate) bcr1: u16,
    pub(crate) bcr2: u16,
    pub(crate) wcr: u16,
    pub(crate) mcr: u16,
    pub(crate) rtcsr: u16,
    pub(crate) rtcnt: u16,
    pub(crate) rtcor: u16,
    pub(crate) cycle_count: u64,
}

impl BusStateController {
    pub fn new(role: Sh2Role) -> Self {
        let mut bsc = Self {
            bcr1: 0,
            bcr2: 0,
            wcr: 0,
            mcr: 0,
            rtcsr: 0,
            rtcnt: 0,
            rtcor: 0,
            cycle_count: 0,
        };
        bsc.reset(role);
        bsc
    }

    /// Restore power-on values; BCR1.MASTER reflects the CPU role
    pub fn reset(&mut self, role: Sh2Role) {
        self.bcr1 = 0x03F0 | if role == Sh2Role::Slave { BCR1_MASTER } else { 0 };
        self.bcr2 = 0x00FC;
        self.wcr = 0xAAFF;
        self.mcr = 0;
        self.rtcsr = 0;
        self.rtcnt = 0;
        self.rtcor = 0;
        self.cycle_count = 0;
    }

    /// Refresh compare-match interrupt
    pub fn cmi_pending(&self) -> bool {
        self.rtcsr & (RTCSR_CMF | RTCSR_CMIE) == (RTCSR_CMF | RTCSR_CMIE)
    }

    /// Run the refresh counter for `cycles` CPU cycles
    ///
    /// Returns true if a compare match was raised.
    pub fn advance(&mut self, cycles: u64) -> bool {
        let cks = ((self.rtcsr >> 3) & 7) as usize;
        if cks == 0 {
            return false;
        }
        let shift = REFRESH_SHIFTS[cks];
        self.cycle_count += cycles;
        let ticks = self.cycle_count >> shift;
        self.cycle_count &= (1 << shift) - 1;

        let mut raised = false;
        for _ in 0..ticks {
            self.rtcnt = (self.rtcnt + 1) & 0xFF;
            if self.rtcnt == self.rtcor {
                self.rtcnt = 0;
                raised |= self.rtcsr & RTCSR_CMF == 0;
                self.rtcsr |= RTCSR_CMF;
            }
        }
        raised
    }

    /// 32-bit read at on-chip offset 0x1E0..=0x1FF
    pub fn read_long(&self, offset: u32) -> u32 {
        let value = match offset {
            0x1E0 => self.bcr1,
            0x1E4 => self.bcr2,
            0x1E8 => self.wcr,
            0x1EC => self.mcr,
            0x1F0 => self.rtcsr,
            0x1F4 => self.rtcnt,
            0x1F8 => self.rtcor,
            _ => 0,
        };
        value as u32
    }

    /// 32-bit write at on-chip offset 0x1E0..=0x1FF
    pub fn write_long(&mut self, offset: u32, value: u32) {
        if value >> 16 != BSC_WRITE_KEY {
            log::debug!(
                "Ignoring BSC write without key: 0x{:08X} at offset 0x{:03X}",
                value,
                offset
            );
            return;
        }
        let value = value as u16;
        match offset {
            0x1E0 => self.bcr1 = (self.bcr1 & BCR1_MASTER) | (value & 0x1FF7),
            0x1E4 => self.bcr2 = value & 0x00FC,
            0x1E8 => self.wcr = value,
            0x1EC => self.mcr = value & 0xFEFC,
            0x1F0 => {
                let cmf = self.rtcsr & value & RTCSR_CMF;
                self.rtcsr = cmf | (value & 0x0078);
            }
            0x1F4 => self.rtcnt = value & 0xFF,
            0x1F8 => self.rtcor = value & 0xFF,
            _ => {}
        }
    }
}
