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

//! Memory access
//!
//! The SH-2 sees a 32-bit address space split into eight partitions by the
//! top three address bits. Cached and cache-through partitions reach the
//! external bus, which is supplied by the host through the [`Bus`] trait.
//! The remaining partitions expose the cache arrays and the on-chip register
//! bank. Partition routing lives in [`router`].
//!
//! # Partitions
//!
//! | Bits 31..29 | Region                        |
//! |-------------|-------------------------------|
//! | 000         | Cached external bus           |
//! | 001, 101    | Cache-through external bus    |
//! | 010         | Associative purge             |
//! | 011         | Cache address array           |
//! | 100, 111    | I/O area (on-chip registers)  |
//! | 110         | Cache data array              |

mod ram_bus;
pub(crate) mod router;

pub use ram_bus::{BusAccess, RamBus};

/// Mask applied to cache-through addresses before they reach the bus
pub const PHYSICAL_ADDRESS_MASK: u32 = 0x07FF_FFFF;

/// External memory capability
///
/// Implemented by the surrounding system. Every address passed in is already
/// masked to the 27-bit physical range and aligned to the access width.
///
/// `peek_*`/`poke_*` are debugger accesses and must not have side effects
/// beyond the stored value itself.
pub trait Bus {
    fn read8(&mut self, address: u32) -> u8;
    fn read16(&mut self, address: u32) -> u16;
    fn read32(&mut self, address: u32) -> u32;

    fn write8(&mut self, address: u32, value: u8);
    fn write16(&mut self, address: u32, value: u16);
    fn write32(&mut self, address: u32, value: u32);

    fn peek8(&self, address: u32) -> u8;
    fn peek16(&self, address: u32) -> u16;
    fn peek32(&self, address: u32) -> u32;

    fn poke8(&mut self, address: u32, value: u8);
    fn poke16(&mut self, address: u32, value: u16);
    fn poke32(&mut self, address: u32, value: u32);
}

/// A memory access width (8, 16 or 32 bits)
///
/// Lets the router and the cache be written once for all three widths.
pub trait MemPrimitive: Copy + Default + std::fmt::Debug + 'static {
    /// Access size in bytes
    const SIZE: u32;

    fn bus_read(bus: &mut dyn Bus, address: u32) -> Self;
    fn bus_write(bus: &mut dyn Bus, address: u32, value: Self);
    fn bus_peek(bus: &dyn Bus, address: u32) -> Self;
    fn bus_poke(bus: &mut dyn Bus, address: u32, value: Self);

    /// Truncating conversion from a 32-bit value
    fn from_u32(value: u32) -> Self;
    fn to_u32(self) -> u32;

    /// Read a big-endian value from the start of `bytes`
    fn read_be(bytes: &[u8]) -> Self;
    /// Write a big-endian value to the start of `bytes`
    fn write_be(self, bytes: &mut [u8]);

    /// Extract this width from a big-endian 32-bit word at `address`
    #[inline(always)]
    fn from_long(value: u32, address: u32) -> Self {
        let offset = address & 3 & !(Self::SIZE - 1);
        let shift = (4 - Self::SIZE - offset) * 8;
        Self::from_u32(value >> shift)
    }
}

impl MemPrimitive for u8 {
    const SIZE: u32 = 1;

    #[inline(always)]
    fn bus_read(bus: &mut dyn Bus, address: u32) -> Self {
        bus.read8(address)
    }
    #[inline(always)]
    fn bus_write(bus: &mut dyn Bus, address: u32, value: Self) {
        bus.write8(address, value)
    }
    #[inline(always)]
    fn bus_peek(bus: &dyn Bus, address: u32) -> Self {
        bus.peek8(address)
    }
    #[inline(always)]
    fn bus_poke(bus: &mut dyn Bus, address: u32, value: Self) {
        bus.poke8(address, value)
    }
    #[inline(always)]
    fn from_u32(value: u32) -> Self {
        value as u8
    }
    #[inline(always)]
    fn to_u32(self) -> u32 {
        self as u32
    }
    #[inline(always)]
    fn read_be(bytes: &[u8]) -> Self {
        bytes[0]
    }
    #[inline(always)]
    fn write_be(self, bytes: &mut [u8]) {
        bytes[0] = self;
    }
}

impl MemPrimitive for u16 {
    const SIZE: u32 = 2;

    #[inline(always)]
    fn bus_read(bus: &mut dyn Bus, address: u32) -> Self {
        bus.read16(address)
    }
    #[inline(always)]
    fn bus_write(bus: &mut dyn Bus, address: u32, value: Self) {
        bus.write16(address, value)
    }
    #[inline(always)]
    fn bus_peek(bus: &dyn Bus, address: u32) -> Self {
        bus.peek16(address)
    }
    #[inline(always)]
    fn bus_poke(bus: &mut dyn Bus, address: u32, value: Self) {
        bus.poke16(address, value)
    }
    #[inline(always)]
    fn from_u32(value: u32) -> Self {
        value as u16
    }
    #[inline(always)]
    fn to_u32(self) -> u32 {
        self as u32
    }
    #[inline(always)]
    fn read_be(bytes: &[u8]) -> Self {
        u16::from_be_bytes([bytes[0], bytes[1]])
    }
    #[inline(always)]
    fn write_be(self, bytes: &mut [u8]) {
        bytes[..2].copy_from_slice(&self.to_be_bytes());
    }
}

impl MemPrimitive for u32 {
    const SIZE: u32 = 4;

    #[inline(always)]
    fn bus_read(bus: &mut dyn Bus, address: u32) -> Self {
        bus.read32(address)
    }
    #[inline(always)]
    fn bus_write(bus: &mut dyn Bus, address: u32, value: Self) {
        bus.write32(address, value)
    }
    #[inline(always)]
    fn bus_peek(bus: &dyn Bus, address: u32) -> Self {
        bus.peek32(address)
    }
    #[inline(always)]
    fn bus_poke(bus: &mut dyn Bus, address: u32, value: Self) {
        bus.poke32(address, value)
    }
    #[inline(always)]
    fn from_u32(value: u32) -> Self {
        value
    }
    #[inline(always)]
    fn to_u32(self) -> u32 {
        self
    }
    #[inline(always)]
    fn read_be(bytes: &[u8]) -> Self {
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
    #[inline(always)]
    fn write_be(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.to_be_bytes());
    }
}

#[cfg(test)]
mod tests;
