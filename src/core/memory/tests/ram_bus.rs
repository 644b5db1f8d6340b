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

use super::*;
use crate::core::error::EmulatorError;

#[test]
fn test_size_rounds_to_power_of_two() {
    assert_eq!(RamBus::new(3000).size(), 4096);
    assert_eq!(RamBus::new(0x10000).size(), 0x10000);
}

#[test]
fn test_big_endian_storage() {
    let mut bus = RamBus::new(0x100);
    bus.write32(0x10, 0x1234_5678);
    assert_eq!(&bus.memory()[0x10..0x14], &[0x12, 0x34, 0x56, 0x78]);
    assert_eq!(bus.read16(0x12), 0x5678);
    assert_eq!(bus.read8(0x11), 0x34);
}

#[test]
fn test_memory_mirrors() {
    let mut bus = RamBus::new(0x100);
    bus.write8(0x105, 0xAA);
    assert_eq!(bus.peek8(0x05), 0xAA);
}

#[test]
fn test_load_program() {
    let mut bus = RamBus::new(0x100);
    bus.load_program(0x20, &[0x7505, 0x0009]);
    assert_eq!(&bus.memory()[0x20..0x24], &[0x75, 0x05, 0x00, 0x09]);
}

#[test]
fn test_load_too_large() {
    let mut bus = RamBus::new(0x100);
    let result = bus.load(0xF0, &[0; 0x20]);
    assert!(matches!(
        result,
        Err(EmulatorError::ImageTooLarge {
            address: 0xF0,
            size: 0x20,
            capacity: 0x100
        })
    ));
}

#[test]
fn test_access_log() {
    let mut bus = RamBus::new(0x100).with_access_log();
    bus.write16(0x10, 0xBEEF);
    bus.read32(0x10);
    bus.peek32(0x10);
    bus.poke8(0x10, 0);

    assert_eq!(
        bus.accesses(),
        &[
            BusAccess::Write {
                address: 0x10,
                size: 2,
                value: 0xBEEF
            },
            BusAccess::Read {
                address: 0x10,
                size: 4,
                value: 0xBEEF_0000
            },
        ]
    );

    assert_eq!(bus.take_accesses().len(), 2);
    assert!(bus.accesses().is_empty());
}

#[test]
fn test_access_log_disabled_by_default() {
    let mut bus = RamBus::new(0x100);
    bus.read8(0);
    assert!(bus.accesses().is_empty());
    assert!(bus.take_accesses().is_empty());
}
