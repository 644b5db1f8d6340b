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

//! DMA controller tests
//!
//! - `registers`: CHCR/DMAOR register behaviour
//! - `transfers`: complete transfers driven through the on-chip registers

use super::*;
use crate::core::cpu::Sh2;
use crate::core::interrupt::InterruptSource;
use crate::core::memory::{BusAccess, RamBus};

mod transfers;

const SAR0: u32 = 0xFFFF_FF80;
const DAR0: u32 = 0xFFFF_FF84;
const TCR0: u32 = 0xFFFF_FF88;
const CHCR0: u32 = 0xFFFF_FF8C;
const SAR1: u32 = 0xFFFF_FF90;
const DAR1: u32 = 0xFFFF_FF94;
const TCR1: u32 = 0xFFFF_FF98;
const CHCR1: u32 = 0xFFFF_FF9C;
const VCRDMA0: u32 = 0xFFFF_FFA0;
const DMAOR: u32 = 0xFFFF_FFB0;

/// Destination increment, source increment
const INC_INC: u32 = (1 << 14) | (1 << 12);
const TS_BYTE: u32 = 0;
const TS_LONG: u32 = 2 << 10;
const TS_16: u32 = 3 << 10;
const AR: u32 = 1 << 9;
const IE: u32 = 1 << 2;
const DE: u32 = 1 << 0;

fn setup() -> (Sh2, RamBus) {
    (Sh2::default(), RamBus::new(0x10000).with_access_log())
}

fn write(cpu: &mut Sh2, bus: &mut RamBus, address: u32, value: u32) {
    cpu.mem_write_long::<false>(bus, address, value);
}

fn read(cpu: &mut Sh2, bus: &mut RamBus, address: u32) -> u32 {
    cpu.mem_read_long::<false>(bus, address)
}

/// Program channel 0 without enabling it
fn program_channel0(cpu: &mut Sh2, bus: &mut RamBus, src: u32, dst: u32, count: u32) {
    write(cpu, bus, SAR0, src);
    write(cpu, bus, DAR0, dst);
    write(cpu, bus, TCR0, count);
}
