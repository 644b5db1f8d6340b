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

//! Custom assertions for SH-2 core testing

use sh2_core::core::cpu::Sh2;
use sh2_core::core::memory::RamBus;

/// Assert a general purpose register has the expected value
#[allow(dead_code)]
pub fn assert_reg(cpu: &Sh2, reg: u8, expected: u32) {
    let actual = cpu.reg(reg);
    assert_eq!(
        actual, expected,
        "R{} mismatch: expected 0x{:08X}, got 0x{:08X}",
        reg, expected, actual
    );
}

/// Assert PC is at the expected address
#[allow(dead_code)]
pub fn assert_pc(cpu: &Sh2, expected: u32) {
    let actual = cpu.pc();
    assert_eq!(
        actual, expected,
        "PC mismatch: expected 0x{:08X}, got 0x{:08X}",
        expected, actual
    );
}

/// Assert bus memory holds the expected big-endian long
#[allow(dead_code)]
pub fn assert_memory_long(bus: &RamBus, address: u32, expected: u32) {
    let offset = address as usize;
    let bytes = &bus.memory()[offset..offset + 4];
    let actual = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(
        actual, expected,
        "Memory at 0x{:08X} mismatch: expected 0x{:08X}, got 0x{:08X}",
        address, expected, actual
    );
}
