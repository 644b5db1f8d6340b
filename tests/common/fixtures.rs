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

//! Fixtures for common test scenarios

use sh2_core::core::config::Sh2Config;
use sh2_core::core::cpu::Sh2;
use sh2_core::core::memory::RamBus;

/// Entry point written to reset vector 0
pub const ENTRY: u32 = 0x1000;
/// Stack pointer written to reset vector 1
pub const STACK: u32 = 0x8000;

/// Memory image with reset vectors and `program` at [`ENTRY`]
#[allow(dead_code)]
pub fn create_bus(program: &[u16]) -> RamBus {
    let mut bus = RamBus::new(0x10000);
    bus.load(0, &ENTRY.to_be_bytes()).unwrap();
    bus.load(4, &STACK.to_be_bytes()).unwrap();
    bus.load_program(ENTRY, program);
    bus
}

/// Create a core with `config`, load `program` and run a power-on reset
#[allow(dead_code)]
pub fn boot_with_config(program: &[u16], config: Sh2Config) -> (Sh2, RamBus) {
    let mut bus = create_bus(program);
    let mut cpu = Sh2::new(config);
    cpu.reset(&mut bus, true);
    (cpu, bus)
}

/// Create a default core, load `program` and run a power-on reset
#[allow(dead_code)]
pub fn boot(program: &[u16]) -> (Sh2, RamBus) {
    boot_with_config(program, Sh2Config::default())
}

/// Point an exception vector at `handler`
#[allow(dead_code)]
pub fn set_vector(bus: &mut RamBus, vector: u32, handler: u32) {
    bus.load(vector * 4, &handler.to_be_bytes()).unwrap();
}
