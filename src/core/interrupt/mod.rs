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

//! SH7604 Interrupt Controller (INTC)
//!
//! Tracks the priority level and vector of every interrupt source and the
//! single pending interrupt the CPU will service next.
//!
//! ## Sources
//!
//! Sources are scanned in the fixed order below. The first active source with
//! a non-zero level becomes pending, even if a later source has a higher
//! level.
//!
//! ```text
//! Source        | Level               | Vector
//! --------------|---------------------|---------------------------------
//! NMI           | 16                  | 11
//! User break    | 15                  | 12
//! IRL           | external            | external (VECMD) or 64 + level/2
//! DIVU OVFI     | IPRA 15..12         | VCRDIV
//! DMAC0 end     | IPRA 11..8          | VCRDMA0
//! DMAC1 end     | IPRA 11..8          | VCRDMA1
//! WDT ITI       | IPRA 7..4           | VCRWDT 14..8
//! BSC CMI       | IPRA 7..4           | VCRWDT 6..0
//! SCI ERI       | IPRB 15..12         | VCRA 14..8
//! SCI RXI       | IPRB 15..12         | VCRA 6..0
//! SCI TXI       | IPRB 15..12         | VCRB 14..8
//! SCI TEI       | IPRB 15..12         | VCRB 6..0
//! FRT ICI       | IPRB 11..8          | VCRC 14..8
//! FRT OCI       | IPRB 11..8          | VCRC 6..0
//! FRT OVI       | IPRB 11..8          | VCRD 14..8
//! ```
//!
//! Whether a source is active depends on the owning module's flags, so the
//! scan itself lives on the CPU (see `dispatch`).

mod dispatch;

#[cfg(test)]
mod tests;

use crate::core::save_state::{InterruptState, StateSave};
use serde::{Deserialize, Serialize};

/// Interrupt source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InterruptSource {
    None = 0,
    FrtOvi = 1,
    FrtOci = 2,
    FrtIci = 3,
    SciTei = 4,
    SciTxi = 5,
    SciRxi = 6,
    SciEri = 7,
    BscRefCmi = 8,
    WdtIti = 9,
    Dmac1XferEnd = 10,
    Dmac0XferEnd = 11,
    DivuOvfi = 12,
    Irl = 13,
    UserBreak = 14,
    Nmi = 15,
}

/// Number of source slots, including `None`
pub const SOURCE_COUNT: usize = 16;

/// Priority scan order
pub const SCAN_ORDER: [InterruptSource; SOURCE_COUNT - 1] = [
    InterruptSource::Nmi,
    InterruptSource::UserBreak,
    InterruptSource::Irl,
    InterruptSource::DivuOvfi,
    InterruptSource::Dmac0XferEnd,
    InterruptSource::Dmac1XferEnd,
    InterruptSource::WdtIti,
    InterruptSource::BscRefCmi,
    InterruptSource::SciEri,
    InterruptSource::SciRxi,
    InterruptSource::SciTxi,
    InterruptSource::SciTei,
    InterruptSource::FrtIci,
    InterruptSource::FrtOci,
    InterruptSource::FrtOvi,
];

impl InterruptSource {
    /// Position in the scan order; `None` sorts last
    pub fn scan_rank(self) -> usize {
        SCAN_ORDER
            .iter()
            .position(|&source| source == self)
            .unwrap_or(SCAN_ORDER.len())
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => InterruptSource::FrtOvi,
            2 => InterruptSource::FrtOci,
            3 => InterruptSource::FrtIci,
            4 => InterruptSource::SciTei,
            5 => InterruptSource::SciTxi,
            6 => InterruptSource::SciRxi,
            7 => InterruptSource::SciEri,
            8 => InterruptSource::BscRefCmi,
            9 => InterruptSource::WdtIti,
            10 => InterruptSource::Dmac1XferEnd,
            11 => InterruptSource::Dmac0XferEnd,
            12 => InterruptSource::DivuOvfi,
            13 => InterruptSource::Irl,
            14 => InterruptSource::UserBreak,
            15 => InterruptSource::Nmi,
            _ => InterruptSource::None,
        }
    }
}

/// Interrupt selected for service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInterrupt {
    pub level: u8,
    pub source: InterruptSource,
}

impl PendingInterrupt {
    pub const NONE: Self = Self {
        level: 0,
        source: InterruptSource::None,
    };
}

/// Level assigned to NMI
pub const NMI_LEVEL: u8 = 16;
/// Level assigned to user break
pub const USER_BREAK_LEVEL: u8 = 15;
/// Vector of NMI
pub const NMI_VECTOR: u8 = 11;
/// Vector of user break
pub const USER_BREAK_VECTOR: u8 = 12;

/// Interrupt controller state
///
/// Levels and vectors are kept per source; the priority and vector registers
/// are views over those tables.
///
/// # Example
///
/// ```
/// use sh2_core::core::interrupt::{InterruptController, InterruptSource};
///
/// let mut intc = InterruptController::new();
/// intc.write_ipra(0x5000);
/// assert_eq!(intc.level(InterruptSource::DivuOvfi), 5);
/// assert_eq!(intc.read_ipra(), 0x5000);
/// ```
pub struct InterruptController {
    levels: [u8; SOURCE_COUNT],
    vectors: [u8; SOURCE_COUNT],
    pub(crate) pending: PendingInterrupt,

    /// NMIE (bit 8) and VECMD (bit 0)
    icr: u16,
    /// NMI latched and not yet serviced
    pub(crate) nmi: bool,

    irl_level: u8,
    irl_vector: u8,
}

impl InterruptController {
    const ICR_NMIL: u16 = 1 << 15;
    const ICR_NMIE: u16 = 1 << 8;
    const ICR_VECMD: u16 = 1 << 0;

    pub fn new() -> Self {
        let mut intc = Self {
            levels: [0; SOURCE_COUNT],
            vectors: [0; SOURCE_COUNT],
            pending: PendingInterrupt::NONE,
            icr: 0,
            nmi: false,
            irl_level: 0,
            irl_vector: 0,
        };
        intc.reset();
        intc
    }

    /// Reset all priorities and vectors
    pub fn reset(&mut self) {
        self.levels = [0; SOURCE_COUNT];
        self.vectors = [0; SOURCE_COUNT];
        self.levels[InterruptSource::Nmi as usize] = NMI_LEVEL;
        self.vectors[InterruptSource::Nmi as usize] = NMI_VECTOR;
        self.levels[InterruptSource::UserBreak as usize] = USER_BREAK_LEVEL;
        self.vectors[InterruptSource::UserBreak as usize] = USER_BREAK_VECTOR;
        self.pending = PendingInterrupt::NONE;
        self.icr = 0;
        self.nmi = false;
        self.irl_level = 0;
        self.irl_vector = 0;
    }

    #[inline(always)]
    pub fn level(&self, source: InterruptSource) -> u8 {
        self.levels[source as usize]
    }

    #[inline(always)]
    pub fn vector(&self, source: InterruptSource) -> u8 {
        self.vectors[source as usize]
    }

    pub(crate) fn set_level(&mut self, source: InterruptSource, level: u8) {
        self.levels[source as usize] = level;
    }

    pub(crate) fn set_vector(&mut self, source: InterruptSource, vector: u8) {
        self.vectors[source as usize] = vector;
    }

    /// Currently pending interrupt
    pub fn pending(&self) -> PendingInterrupt {
        self.pending
    }

    /// External IRL level (0 = no request)
    pub fn irl_level(&self) -> u8 {
        self.irl_level
    }

    /// Latch an external interrupt request
    ///
    /// The IRL source takes the given level. Its vector is the supplied one
    /// in external vector mode (ICR.VECMD) and `64 + level / 2` otherwise.
    pub(crate) fn set_irl(&mut self, level: u8, vector: u8) {
        self.irl_level = level & 0xF;
        self.irl_vector = vector;
        self.levels[InterruptSource::Irl as usize] = self.irl_level;
        self.update_irl_vector();
    }

    fn update_irl_vector(&mut self) {
        let vector = if self.icr & Self::ICR_VECMD != 0 {
            self.irl_vector
        } else {
            64 + self.irl_level / 2
        };
        self.vectors[InterruptSource::Irl as usize] = vector;
    }

    /// Whether a latched NMI is waiting for service
    pub fn nmi_pending(&self) -> bool {
        self.nmi
    }

    // Register views

    pub fn read_icr(&self) -> u16 {
        let nmil = if self.nmi { Self::ICR_NMIL } else { 0 };
        nmil | (self.icr & (Self::ICR_NMIE | Self::ICR_VECMD))
    }

    pub fn write_icr(&mut self, value: u16) {
        self.icr = value & (Self::ICR_NMIE | Self::ICR_VECMD);
        self.update_irl_vector();
    }

    pub fn read_ipra(&self) -> u16 {
        ((self.level(InterruptSource::DivuOvfi) as u16) << 12)
            | ((self.level(InterruptSource::Dmac0XferEnd) as u16) << 8)
            | ((self.level(InterruptSource::WdtIti) as u16) << 4)
    }

    pub fn write_ipra(&mut self, value: u16) {
        let divu = ((value >> 12) & 0xF) as u8;
        let dmac = ((value >> 8) & 0xF) as u8;
        let wdt = ((value >> 4) & 0xF) as u8;
        self.set_level(InterruptSource::DivuOvfi, divu);
        self.set_level(InterruptSource::Dmac0XferEnd, dmac);
        self.set_level(InterruptSource::Dmac1XferEnd, dmac);
        self.set_level(InterruptSource::WdtIti, wdt);
        self.set_level(InterruptSource::BscRefCmi, wdt);
    }

    pub fn read_iprb(&self) -> u16 {
        ((self.level(InterruptSource::SciEri) as u16) << 12)
            | ((self.level(InterruptSource::FrtIci) as u16) << 8)
    }

    pub fn write_iprb(&mut self, value: u16) {
        let sci = ((value >> 12) & 0xF) as u8;
        let frt = ((value >> 8) & 0xF) as u8;
        for source in [
            InterruptSource::SciEri,
            InterruptSource::SciRxi,
            InterruptSource::SciTxi,
            InterruptSource::SciTei,
        ] {
            self.set_level(source, sci);
        }
        for source in [
            InterruptSource::FrtIci,
            InterruptSource::FrtOci,
            InterruptSource::FrtOvi,
        ] {
            self.set_level(source, frt);
        }
    }

    fn read_vector_pair(&self, high: InterruptSource, low: InterruptSource) -> u16 {
        ((self.vector(high) as u16) << 8) | self.vector(low) as u16
    }

    fn write_vector_pair(&mut self, high: InterruptSource, low: InterruptSource, value: u16) {
        self.set_vector(high, ((value >> 8) & 0x7F) as u8);
        self.set_vector(low, (value & 0x7F) as u8);
    }

    pub fn read_vcra(&self) -> u16 {
        self.read_vector_pair(InterruptSource::SciEri, InterruptSource::SciRxi)
    }

    pub fn write_vcra(&mut self, value: u16) {
        self.write_vector_pair(InterruptSource::SciEri, InterruptSource::SciRxi, value);
    }

    pub fn read_vcrb(&self) -> u16 {
        self.read_vector_pair(InterruptSource::SciTxi, InterruptSource::SciTei)
    }

    pub fn write_vcrb(&mut self, value: u16) {
        self.write_vector_pair(InterruptSource::SciTxi, InterruptSource::SciTei, value);
    }

    pub fn read_vcrc(&self) -> u16 {
        self.read_vector_pair(InterruptSource::FrtIci, InterruptSource::FrtOci)
    }

    pub fn write_vcrc(&mut self, value: u16) {
        self.write_vector_pair(InterruptSource::FrtIci, InterruptSource::FrtOci, value);
    }

    pub fn read_vcrd(&self) -> u16 {
        (self.vector(InterruptSource::FrtOvi) as u16) << 8
    }

    pub fn write_vcrd(&mut self, value: u16) {
        self.set_vector(InterruptSource::FrtOvi, ((value >> 8) & 0x7F) as u8);
    }

    pub fn read_vcrwdt(&self) -> u16 {
        self.read_vector_pair(InterruptSource::WdtIti, InterruptSource::BscRefCmi)
    }

    pub fn write_vcrwdt(&mut self, value: u16) {
        self.write_vector_pair(InterruptSource::WdtIti, InterruptSource::BscRefCmi, value);
    }

    pub fn read_vcrdiv(&self) -> u32 {
        self.vector(InterruptSource::DivuOvfi) as u32
    }

    pub fn write_vcrdiv(&mut self, value: u32) {
        self.set_vector(InterruptSource::DivuOvfi, (value & 0x7F) as u8);
    }

    pub fn read_vcrdma(&self, channel: usize) -> u32 {
        self.vector(Self::dma_source(channel)) as u32
    }

    pub fn write_vcrdma(&mut self, channel: usize, value: u32) {
        self.set_vector(Self::dma_source(channel), value as u8);
    }

    /// Transfer-end source of a DMA channel
    pub fn dma_source(channel: usize) -> InterruptSource {
        if channel == 0 {
            InterruptSource::Dmac0XferEnd
        } else {
            InterruptSource::Dmac1XferEnd
        }
    }
}

impl StateSave for InterruptController {
    type State = InterruptState;

    fn to_state(&self) -> Self::State {
        InterruptState {
            levels: self.levels,
            vectors: self.vectors,
            icr: self.icr,
            nmi: self.nmi,
            irl_level: self.irl_level,
            irl_vector: self.irl_vector,
            pending_level: self.pending.level,
            pending_source: self.pending.source as u8,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.levels = state.levels;
        self.vectors = state.vectors;
        self.icr = state.icr;
        self.nmi = state.nmi;
        self.irl_level = state.irl_level;
        self.irl_vector = state.irl_vector;
        self.pending = PendingInterrupt {
            level: state.pending_level,
            source: InterruptSource::from_u8(state.pending_source),
        };
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
