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

//! CPU test modules
//!
//! - `basic`: reset, register access, cycle accounting
//! - `instructions`: instruction semantics
//! - `branches`: delayed and non-delayed branches, delay slots
//! - `exceptions`: TRAPA, illegal instructions, interrupts, SLEEP
//! - `properties`: proptest checks against host arithmetic

use super::*;
use crate::core::memory::RamBus;

mod basic;
mod exceptions;

/// Address the test programs are loaded at (reset vector 0)
const CODE: u32 = 0x1000;
/// Initial stack pointer (reset vector 1)
const STACK: u32 = 0x8000;
/// Scratch data area
const DATA: u32 = 0x2000;

/// Build a core with `program` at [`CODE`] and run a power-on reset
fn setup(program: &[u16]) -> (Sh2, RamBus) {
    setup_with_memory(program, 0x10000)
}

fn setup_with_memory(program: &[u16], size: usize) -> (Sh2, RamBus) {
    let mut bus = RamBus::new(size);
    bus.load(0, &CODE.to_be_bytes()).unwrap();
    bus.load(4, &STACK.to_be_bytes()).unwrap();
    bus.load_program(CODE, program);

    let mut cpu = Sh2::default();
    cpu.reset(&mut bus, true);
    (cpu, bus)
}

fn write_long(bus: &mut RamBus, address: u32, value: u32) {
    bus.load(address, &value.to_be_bytes()).unwrap();
}

fn read_long(bus: &RamBus, address: u32) -> u32 {
    let a = address as usize;
    u32::from_be_bytes(bus.memory()[a..a + 4].try_into().unwrap())
}

/// Step `count` instructions and return the cycles spent
fn run(cpu: &mut Sh2, bus: &mut RamBus, count: usize) -> u64 {
    (0..count).map(|_| cpu.step(bus)).sum()
}
