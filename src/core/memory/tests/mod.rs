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

//! Memory tests
//!
//! - `ram_bus`: the flat RAM bus used by the runner and tests
//! - `partitions`: routing of CPU, DMA and debugger accesses

use super::*;
use crate::core::cpu::Sh2;

mod ram_bus;

/// Core with CCR.CE set and a logging bus
fn cached_setup() -> (Sh2, RamBus) {
    let mut cpu = Sh2::default();
    let mut bus = RamBus::new(0x10000).with_access_log();
    cpu.mem_write_byte::<true>(&mut bus, 0xFFFF_FE92, 0x01);
    (cpu, bus)
}

fn read_addresses(bus: &mut RamBus) -> Vec<u32> {
    bus.take_accesses()
        .into_iter()
        .filter_map(|access| match access {
            BusAccess::Read { address, .. } => Some(address),
            BusAccess::Write { .. } => None,
        })
        .collect()
}
