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

//! Interrupt controller tests
//!
//! - `registers`: priority and vector register views
//! - `arbitration`: scan order, incremental updates and acceptance

use super::*;
use crate::core::cpu::Sh2;
use crate::core::memory::RamBus;


const HANDLER: u32 = 0x3000;

/// Core reset into a NOP sled at 0x1000 with I = 0
fn setup() -> (Sh2, RamBus) {
    let mut bus = RamBus::new(0x10000);
    bus.load(0, &[0, 0, 0x10, 0x00, 0, 0, 0x80, 0x00]).unwrap();
    bus.load_program(0x1000, &[0x0009; 16]);

    let mut cpu = Sh2::default();
    cpu.reset(&mut bus, true);
    cpu.set_sr(0);
    (cpu, bus)
}
