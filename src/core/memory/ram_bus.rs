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

//! Flat RAM bus
//!
//! A simple [`Bus`] implementation backed by a power-of-two sized byte array
//! that mirrors across the whole physical address range. Used by the
//! `sh2-run` binary, the benchmarks and the tests. It can optionally record
//! every non-debug access, which makes it easy to compare the bus traffic of
//! two runs.

use super::Bus;
use crate::core::error::{EmulatorError, Result};

/// One recorded bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusAccess {
    Read { address: u32, size: u8, value: u32 },
    Write { address: u32, size: u8, value: u32 },
}

/// Big-endian RAM mirrored over the physical address space
pub struct RamBus {
    memory: Vec<u8>,
    mask: u32,
    access_log: Option<Vec<BusAccess>>,
}

impl RamBus {
    /// Create a zero-filled RAM bus
    ///
    /// # Arguments
    ///
    /// * `size` - Capacity in bytes; rounded up to a power of two
    pub fn new(size: usize) -> Self {
        let size = size.max(4).next_power_of_two();
        Self {
            memory: vec![0; size],
            mask: (size - 1) as u32,
            access_log: None,
        }
    }

    /// Enable the access log
    pub fn with_access_log(mut self) -> Self {
        self.access_log = Some(Vec::new());
        self
    }

    /// Capacity in bytes
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    /// Copy raw bytes into memory
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::ImageTooLarge`] if the data does not fit
    /// between `address` and the end of memory.
    pub fn load(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let start = (address & self.mask) as usize;
        let end = start + data.len();
        if end > self.memory.len() {
            return Err(EmulatorError::ImageTooLarge {
                address,
                size: data.len(),
                capacity: self.memory.len(),
            });
        }
        self.memory[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Store a sequence of 16-bit instruction words starting at `address`
    pub fn load_program(&mut self, address: u32, words: &[u16]) {
        for (i, &word) in words.iter().enumerate() {
            self.poke16(address.wrapping_add(i as u32 * 2), word);
        }
    }

    /// Raw memory contents
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Recorded accesses, empty if logging is disabled
    pub fn accesses(&self) -> &[BusAccess] {
        self.access_log.as_deref().unwrap_or(&[])
    }

    /// Drain the access log
    pub fn take_accesses(&mut self) -> Vec<BusAccess> {
        self.access_log
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }

    fn record(&mut self, access: BusAccess) {
        if let Some(log) = self.access_log.as_mut() {
            log.push(access);
        }
    }

    #[inline(always)]
    fn offset(&self, address: u32) -> usize {
        (address & self.mask) as usize
    }

    fn get8(&self, address: u32) -> u8 {
        self.memory[self.offset(address)]
    }

    fn get16(&self, address: u32) -> u16 {
        let offset = self.offset(address & !1);
        u16::from_be_bytes([self.memory[offset], self.memory[offset + 1]])
    }

    fn get32(&self, address: u32) -> u32 {
        let offset = self.offset(address & !3);
        u32::from_be_bytes([
            self.memory[offset],
            self.memory[offset + 1],
            self.memory[offset + 2],
            self.memory[offset + 3],
        ])
    }

    fn set8(&mut self, address: u32, value: u8) {
        let offset = self.offset(address);
        self.memory[offset] = value;
    }

    fn set16(&mut self, address: u32, value: u16) {
        let offset = self.offset(address & !1);
        self.memory[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    fn set32(&mut self, address: u32, value: u32) {
        let offset = self.offset(address & !3);
        self.memory[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }
}

impl Bus for RamBus {
    fn read8(&mut self, address: u32) -> u8 {
        let value = self.get8(address);
        self.record(BusAccess::Read {
            address,
            size: 1,
            value: value as u32,
        });
        value
    }

    fn read16(&mut self, address: u32) -> u16 {
        let value = self.get16(address);
        self.record(BusAccess::Read {
            address,
            size: 2,
            value: value as u32,
        });
        value
    }

    fn read32(&mut self, address: u32) -> u32 {
        let value = self.get32(address);
        self.record(BusAccess::Read {
            address,
            size: 4,
            value,
        });
        value
    }

    fn write8(&mut self, address: u32, value: u8) {
        self.record(BusAccess::Write {
            address,
            size: 1,
            value: value as u32,
        });
        self.set8(address, value);
    }

    fn write16(&mut self, address: u32, value: u16) {
        self.record(BusAccess::Write {
            address,
            size: 2,
            value: value as u32,
        });
        self.set16(address, value);
    }

    fn write32(&mut self, address: u32, value: u32) {
        self.record(BusAccess::Write {
            address,
            size: 4,
            value,
        });
        self.set32(address, value);
    }

    fn peek8(&self, address: u32) -> u8 {
        self.get8(address)
    }

    fn peek16(&self, address: u32) -> u16 {
        self.get16(address)
    }

    fn peek32(&self, address: u32) -> u32 {
        self.get32(address)
    }

    fn poke8(&mut self, address: u32, value: u8) {
        self.set8(address, value);
    }

    fn poke16(&mut self, address: u32, value: u16) {
        self.set16(address, value);
    }

    fn poke32(&mut self, address: u32, value: u32) {
        self.set32(address, value);
    }
}
