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

//! Partition routing for CPU, DMA and debugger accesses

use super::{Bus, MemPrimitive, PHYSICAL_ADDRESS_MASK};
use crate::core::cpu::Sh2;
use crate::core::onchip::ONCHIP_BASE;

/// Long values returned by reads from the associative purge partition
const PURGE_READ_LOW: u32 = 0x2312_2312;
const PURGE_READ_HIGH: u32 = 0x1223_1223;

/// Open-bus pattern for I/O addresses outside the on-chip window
const OPEN_BUS_LONG: u32 = 0x0011_2233;

impl Sh2 {
    /// Read `T` at `address`
    ///
    /// - `INSTR`: instruction fetch (selects the instruction side of the cache)
    /// - `PEEK`: debugger access (no cache fill, no LRU update, no side effects)
    /// - `CACHE`: cache emulation enabled
    pub(crate) fn mem_read<T: MemPrimitive, const INSTR: bool, const PEEK: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        address: u32,
    ) -> T {
        let address = Self::align::<T, PEEK>(address);

        match address >> 29 {
            0b000 => {
                if CACHE && self.cache.is_enabled() {
                    self.cached_read::<T, INSTR, PEEK>(bus, address)
                } else {
                    Self::bus_read::<T, PEEK>(bus, address)
                }
            }
            0b001 | 0b101 => Self::bus_read::<T, PEEK>(bus, address),
            0b010 => {
                if T::SIZE == 4 {
                    if !PEEK {
                        self.cache.associative_purge(address);
                    }
                    let decoy = if address & 4 == 0 {
                        PURGE_READ_LOW
                    } else {
                        PURGE_READ_HIGH
                    };
                    T::from_u32(decoy)
                } else {
                    T::from_u32(0)
                }
            }
            0b011 => {
                let value = self.cache.read_address_array(address);
                T::from_long(value, address)
            }
            0b110 => self.cache.read_data_array::<T>(address),
            _ => {
                if INSTR {
                    log::debug!(
                        "[{}] Instruction fetch from I/O area at 0x{:08X}",
                        self.config.role.tag(),
                        address
                    );
                    return T::from_u32(0);
                }
                if address >= ONCHIP_BASE {
                    self.onchip_read::<T, PEEK>(address & 0x1FF)
                } else {
                    T::from_long(OPEN_BUS_LONG, address)
                }
            }
        }
    }

    /// Write `T` at `address`
    pub(crate) fn mem_write<T: MemPrimitive, const PEEK: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        address: u32,
        value: T,
    ) {
        let address = Self::align::<T, PEEK>(address);

        match address >> 29 {
            0b000 => {
                if CACHE && self.cache.is_enabled() {
                    if let Some(way) = self.cache.find_way(address) {
                        self.cache.write_line(address, way, value);
                        if !PEEK {
                            self.cache.update_lru(address, way);
                        }
                    }
                }
                Self::bus_write::<T, PEEK>(bus, address, value);
            }
            0b001 | 0b101 => Self::bus_write::<T, PEEK>(bus, address, value),
            0b010 => {
                if T::SIZE == 4 {
                    if !PEEK {
                        self.cache.associative_purge(address);
                    }
                } else {
                    log::debug!(
                        "Ignoring {}-bit associative purge write at 0x{:08X}",
                        T::SIZE * 8,
                        address
                    );
                }
            }
            0b011 => {
                if T::SIZE == 4 {
                    self.cache
                        .write_address_array(address, value.to_u32(), !PEEK);
                } else {
                    log::debug!(
                        "Ignoring {}-bit address array write at 0x{:08X}",
                        T::SIZE * 8,
                        address
                    );
                }
            }
            0b110 => self.cache.write_data_array::<T>(address, value),
            _ => {
                if address >= ONCHIP_BASE {
                    self.onchip_write::<T, PEEK, CACHE>(bus, address & 0x1FF, value);
                } else {
                    log::debug!(
                        "Ignoring {}-bit write 0x{:X} to unmapped I/O address 0x{:08X}",
                        T::SIZE * 8,
                        value.to_u32(),
                        address
                    );
                }
            }
        }
    }

    fn align<T: MemPrimitive, const PEEK: bool>(address: u32) -> u32 {
        let mask = T::SIZE - 1;
        if address & mask != 0 && !PEEK {
            log::debug!(
                "Misaligned {}-bit access at 0x{:08X}",
                T::SIZE * 8,
                address
            );
        }
        address & !mask
    }

    fn cached_read<T: MemPrimitive, const INSTR: bool, const PEEK: bool>(
        &mut self,
        bus: &mut dyn Bus,
        address: u32,
    ) -> T {
        if let Some(way) = self.cache.find_way(address) {
            if !PEEK {
                self.cache.update_lru(address, way);
            }
            return self.cache.read_line::<T>(address, way);
        }

        if PEEK {
            return T::bus_peek(bus, address & PHYSICAL_ADDRESS_MASK);
        }

        match self.cache.select_way::<INSTR>(address) {
            Some(way) => {
                self.cache.fill_line(bus, address, way);
                self.cache.update_lru(address, way);
                self.cache.read_line::<T>(address, way)
            }
            None => T::bus_read(bus, address & PHYSICAL_ADDRESS_MASK),
        }
    }

    fn bus_read<T: MemPrimitive, const PEEK: bool>(bus: &mut dyn Bus, address: u32) -> T {
        let physical = address & PHYSICAL_ADDRESS_MASK;
        if PEEK {
            T::bus_peek(bus, physical)
        } else {
            T::bus_read(bus, physical)
        }
    }

    fn bus_write<T: MemPrimitive, const PEEK: bool>(bus: &mut dyn Bus, address: u32, value: T) {
        let physical = address & PHYSICAL_ADDRESS_MASK;
        if PEEK {
            T::bus_poke(bus, physical, value);
        } else {
            T::bus_write(bus, physical, value);
        }
    }

    // Data access shorthands used by the interpreter

    #[inline(always)]
    pub(crate) fn mem_read_byte<const CACHE: bool>(&mut self, bus: &mut dyn Bus, address: u32) -> u8 {
        self.mem_read::<u8, false, false, CACHE>(bus, address)
    }

    #[inline(always)]
    pub(crate) fn mem_read_word<const CACHE: bool>(&mut self, bus: &mut dyn Bus, address: u32) -> u16 {
        self.mem_read::<u16, false, false, CACHE>(bus, address)
    }

    #[inline(always)]
    pub(crate) fn mem_read_long<const CACHE: bool>(&mut self, bus: &mut dyn Bus, address: u32) -> u32 {
        self.mem_read::<u32, false, false, CACHE>(bus, address)
    }

    #[inline(always)]
    pub(crate) fn mem_write_byte<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        address: u32,
        value: u8,
    ) {
        self.mem_write::<u8, false, CACHE>(bus, address, value)
    }

    #[inline(always)]
    pub(crate) fn mem_write_word<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        address: u32,
        value: u16,
    ) {
        self.mem_write::<u16, false, CACHE>(bus, address, value)
    }

    #[inline(always)]
    pub(crate) fn mem_write_long<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        address: u32,
        value: u32,
    ) {
        self.mem_write::<u32, false, CACHE>(bus, address, value)
    }

    // Debugger access
    //
    // Peeks see cached data when the line is present but never fill the cache
    // or touch the LRU state. Pokes update a present line and the bus.

    pub fn peek_byte(&mut self, bus: &mut dyn Bus, address: u32) -> u8 {
        self.mem_read::<u8, false, true, true>(bus, address)
    }

    pub fn peek_word(&mut self, bus: &mut dyn Bus, address: u32) -> u16 {
        self.mem_read::<u16, false, true, true>(bus, address)
    }

    pub fn peek_long(&mut self, bus: &mut dyn Bus, address: u32) -> u32 {
        self.mem_read::<u32, false, true, true>(bus, address)
    }

    pub fn poke_byte(&mut self, bus: &mut dyn Bus, address: u32, value: u8) {
        self.mem_write::<u8, true, true>(bus, address, value)
    }

    pub fn poke_word(&mut self, bus: &mut dyn Bus, address: u32, value: u16) {
        self.mem_write::<u16, true, true>(bus, address, value)
    }

    pub fn poke_long(&mut self, bus: &mut dyn Bus, address: u32, value: u32) {
        self.mem_write::<u32, true, true>(bus, address, value)
    }
}
