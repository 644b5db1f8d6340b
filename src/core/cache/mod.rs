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

//! On-chip cache
//!
//! The SH7604 has a 4 KB unified cache organised as 64 entries x 4 ways x
//! 16-byte lines, with a 6-bit LRU word per entry.
//!
//! # Address Layout
//!
//! ```text
//! [28:10] Tag
//! [9:4]   Entry index (0-63)
//! [3:0]   Byte within line
//! ```
//!
//! Writes are write-through and never allocate. Read misses fill a whole
//! line with four 32-bit bus reads, starting at the word that missed and
//! wrapping around the line.
//!
//! # Cache Control Register (CCR)
//!
//! | Bits | Field | Meaning                                   |
//! |------|-------|-------------------------------------------|
//! | 7..6 | W     | Way selected for address-array access     |
//! | 4    | CP    | Purge all entries (reads as 0)            |
//! | 3    | TW    | Two-way mode (ways 0-1 become RAM)        |
//! | 2    | OD    | Disable replacement on data reads         |
//! | 1    | ID    | Disable replacement on instruction fetch  |
//! | 0    | CE    | Cache enable                              |

use crate::core::memory::{Bus, MemPrimitive, PHYSICAL_ADDRESS_MASK};
use crate::core::save_state::{CacheState, StateSave};
use bitflags::bitflags;

#[cfg(test)]
mod tests;

bitflags! {
    /// CCR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CacheControl: u8 {
        const CE = 1 << 0;
        const ID = 1 << 1;
        const OD = 1 << 2;
        const TW = 1 << 3;
        const CP = 1 << 4;
        const W0 = 1 << 6;
        const W1 = 1 << 7;
    }
}

impl CacheControl {
    /// Way used by address-array accesses
    #[inline(always)]
    pub fn way_select(self) -> usize {
        (self.bits() >> 6) as usize & 3
    }
}

/// Number of entries (sets)
pub const ENTRY_COUNT: usize = 64;
/// Number of ways per entry
pub const WAY_COUNT: usize = 4;
/// Line size in bytes
pub const LINE_SIZE: usize = 16;

const TAG_MASK: u32 = 0x1FFF_FC00;
const VALID_BIT: u32 = 1 << 2;

/// One cache entry: four tagged lines
#[derive(Debug, Clone, Copy, Default)]
struct CacheEntry {
    /// Tag (bits 28..10) plus valid bit 2
    tags: [u32; WAY_COUNT],
    lines: [[u8; LINE_SIZE]; WAY_COUNT],
}

/// SH7604 cache unit
///
/// # Example
///
/// ```
/// use sh2_core::core::cache::{Cache, CacheControl};
///
/// let mut cache = Cache::new();
/// cache.write_ccr(CacheControl::CE.bits());
/// assert!(cache.is_enabled());
/// assert_eq!(cache.find_way(0x0600_0000), None);
/// ```
pub struct Cache {
    ccr: CacheControl,
    entries: Vec<CacheEntry>,
    lru: [u8; ENTRY_COUNT],
}

impl Cache {
    pub fn new() -> Self {
        Self {
            ccr: CacheControl::empty(),
            entries: vec![CacheEntry::default(); ENTRY_COUNT],
            lru: [0; ENTRY_COUNT],
        }
    }

    /// Hard reset: cache disabled and fully purged
    pub fn reset(&mut self) {
        self.ccr = CacheControl::empty();
        self.purge_all();
    }

    #[inline(always)]
    fn entry_index(address: u32) -> usize {
        ((address >> 4) & 0x3F) as usize
    }

    #[inline(always)]
    fn line_offset(address: u32) -> usize {
        (address & 0xF) as usize
    }

    /// Current CCR value
    pub fn ccr(&self) -> u8 {
        self.ccr.bits()
    }

    pub fn control(&self) -> CacheControl {
        self.ccr
    }

    /// Write CCR
    ///
    /// Setting CP purges every entry; the bit itself is never stored.
    pub fn write_ccr(&mut self, value: u8) {
        let control = CacheControl::from_bits_truncate(value);
        if control.contains(CacheControl::CP) {
            log::trace!("Cache purge via CCR.CP");
            self.purge_all();
        }
        let previous = self.ccr;
        self.ccr = control - CacheControl::CP;
        if previous.contains(CacheControl::CE) != self.ccr.contains(CacheControl::CE) {
            log::debug!(
                "Cache {}",
                if self.ccr.contains(CacheControl::CE) {
                    "enabled"
                } else {
                    "disabled"
                }
            );
        }
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.ccr.contains(CacheControl::CE)
    }

    #[inline(always)]
    fn way_range(&self) -> std::ops::Range<usize> {
        if self.ccr.contains(CacheControl::TW) {
            2..WAY_COUNT
        } else {
            0..WAY_COUNT
        }
    }

    /// Find the way holding `address`, if any
    ///
    /// Always misses while the cache is disabled.
    #[inline]
    pub fn find_way(&self, address: u32) -> Option<usize> {
        if !self.is_enabled() {
            return None;
        }
        let entry = &self.entries[Self::entry_index(address)];
        let tag = (address & TAG_MASK) | VALID_BIT;
        self.way_range().find(|&way| entry.tags[way] == tag)
    }

    /// Choose the way to replace on a read miss
    ///
    /// Returns `None` when replacement is disabled for this kind of access
    /// (CCR.ID for instruction fetches, CCR.OD for data reads).
    pub fn select_way<const INSTR: bool>(&self, address: u32) -> Option<usize> {
        let disabled = if INSTR {
            CacheControl::ID
        } else {
            CacheControl::OD
        };
        if self.ccr.contains(disabled) {
            return None;
        }

        let lru = self.lru[Self::entry_index(address)];
        if self.ccr.contains(CacheControl::TW) {
            return Some(if lru & 0b000001 != 0 { 2 } else { 3 });
        }
        Some(if lru & 0b111000 == 0b111000 {
            0
        } else if lru & 0b100110 == 0b000110 {
            1
        } else if lru & 0b010101 == 0b000001 {
            2
        } else {
            3
        })
    }

    /// Record an access to `way`
    pub fn update_lru(&mut self, address: u32, way: usize) {
        let lru = &mut self.lru[Self::entry_index(address)];
        *lru = match way {
            0 => *lru & !0b111000,
            1 => (*lru & !0b000110) | 0b100000,
            2 => (*lru & !0b000001) | 0b010100,
            _ => *lru | 0b001011,
        };
    }

    /// Read from a cached line
    #[inline]
    pub fn read_line<T: MemPrimitive>(&self, address: u32, way: usize) -> T {
        let line = &self.entries[Self::entry_index(address)].lines[way];
        T::read_be(&line[Self::line_offset(address)..])
    }

    /// Update a cached line in place
    #[inline]
    pub fn write_line<T: MemPrimitive>(&mut self, address: u32, way: usize, value: T) {
        let offset = Self::line_offset(address);
        let line = &mut self.entries[Self::entry_index(address)].lines[way];
        value.write_be(&mut line[offset..]);
    }

    /// Fill `way` with the line containing `address`
    ///
    /// Issues four 32-bit bus reads, starting at the word that missed.
    pub fn fill_line(&mut self, bus: &mut dyn Bus, address: u32, way: usize) {
        let base = address & !0xF & PHYSICAL_ADDRESS_MASK;
        let first = address & 0xC;
        let entry = &mut self.entries[Self::entry_index(address)];
        for i in 0..4 {
            let offset = (first + i * 4) & 0xC;
            let value = bus.read32(base | offset);
            let offset = offset as usize;
            entry.lines[way][offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        }
        entry.tags[way] = (address & TAG_MASK) | VALID_BIT;
        log::trace!(
            "Cache fill: entry {} way {} <- 0x{:08X}",
            Self::entry_index(address),
            way,
            base
        );
    }

    /// Invalidate every way holding `address`
    pub fn associative_purge(&mut self, address: u32) {
        let tag = (address & TAG_MASK) | VALID_BIT;
        let entry = &mut self.entries[Self::entry_index(address)];
        for way_tag in entry.tags.iter_mut() {
            if *way_tag == tag {
                *way_tag &= !VALID_BIT;
            }
        }
    }

    /// Invalidate all lines and clear LRU state
    pub fn purge_all(&mut self) {
        for entry in self.entries.iter_mut() {
            for tag in entry.tags.iter_mut() {
                *tag &= !VALID_BIT;
            }
        }
        self.lru = [0; ENTRY_COUNT];
    }

    /// Read the address array
    ///
    /// Returns the tag of the CCR-selected way with the entry's LRU bits at
    /// 9..4 and the valid bit at 2.
    pub fn read_address_array(&self, address: u32) -> u32 {
        let index = Self::entry_index(address);
        let way = self.ccr.way_select();
        let tag = self.entries[index].tags[way];
        (tag & (TAG_MASK | VALID_BIT)) | ((self.lru[index] as u32) << 4)
    }

    /// Write the address array
    ///
    /// The tag and valid bit come from the address; the LRU bits come from
    /// bits 9..4 of the value. `update_lru` is false for debugger pokes.
    pub fn write_address_array(&mut self, address: u32, value: u32, update_lru: bool) {
        let index = Self::entry_index(address);
        let way = self.ccr.way_select();
        self.entries[index].tags[way] = address & (TAG_MASK | VALID_BIT);
        if update_lru {
            self.lru[index] = ((value >> 4) & 0x3F) as u8;
        }
    }

    /// Read the data array directly
    ///
    /// Address bits 11..10 select the way, 9..4 the entry and 3..0 the byte.
    pub fn read_data_array<T: MemPrimitive>(&self, address: u32) -> T {
        let way = ((address >> 10) & 3) as usize;
        self.read_line(address, way)
    }

    /// Write the data array directly
    pub fn write_data_array<T: MemPrimitive>(&mut self, address: u32, value: T) {
        let way = ((address >> 10) & 3) as usize;
        self.write_line(address, way, value);
    }

    /// LRU word of an entry
    pub fn lru(&self, index: usize) -> u8 {
        self.lru[index]
    }
}

impl StateSave for Cache {
    type State = CacheState;

    fn to_state(&self) -> Self::State {
        let mut tags = Vec::with_capacity(ENTRY_COUNT * WAY_COUNT);
        let mut data = Vec::with_capacity(ENTRY_COUNT * WAY_COUNT * LINE_SIZE);
        for entry in &self.entries {
            tags.extend_from_slice(&entry.tags);
            for line in &entry.lines {
                data.extend_from_slice(line);
            }
        }
        CacheState {
            ccr: self.ccr.bits(),
            tags,
            lru: self.lru.to_vec(),
            data,
        }
    }

    /// Lengths must already be validated
    fn restore_from_state(&mut self, state: &Self::State) {
        self.ccr = CacheControl::from_bits_truncate(state.ccr);
        let tags = state.tags.chunks_exact(WAY_COUNT);
        let lines = state.data.chunks_exact(WAY_COUNT * LINE_SIZE);
        for ((entry, tags), lines) in self.entries.iter_mut().zip(tags).zip(lines) {
            entry.tags.copy_from_slice(tags);
            for (line, bytes) in entry.lines.iter_mut().zip(lines.chunks_exact(LINE_SIZE)) {
                line.copy_from_slice(bytes);
            }
        }
        for (lru, &saved) in self.lru.iter_mut().zip(&state.lru) {
            *lru = saved & 0x3F;
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
