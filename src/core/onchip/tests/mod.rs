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

//! On-chip register tests
//!
//! Registers are driven through the CPU memory path so the width rules of
//! the register window apply.

use crate::core::config::{Sh2Config, Sh2Role};
use crate::core::cpu::Sh2;
use crate::core::interrupt::InterruptSource;
use crate::core::memory::RamBus;


fn setup() -> (Sh2, RamBus) {
    (Sh2::default(), RamBus::new(0x1000))
}

fn read_byte(cpu: &mut Sh2, bus: &mut RamBus, address: u32) -> u8 {
    cpu.mem_read_byte::<false>(bus, address)
}

fn read_word(cpu: &mut Sh2, bus: &mut RamBus, address: u32) -> u16 {
    cpu.mem_read_word::<false>(bus, address)
}

fn read_long(cpu: &mut Sh2, bus: &mut RamBus, address: u32) -> u32 {
    cpu.mem_read_long::<false>(bus, address)
}

fn write_byte(cpu: &mut Sh2, bus: &mut RamBus, address: u32, value: u8) {
    cpu.mem_write_byte::<false>(bus, address, value);
}

fn write_word(cpu: &mut Sh2, bus: &mut RamBus, address: u32, value: u16) {
    cpu.mem_write_word::<false>(bus, address, value);
}

fn write_long(cpu: &mut Sh2, bus: &mut RamBus, address: u32, value: u32) {
    cpu.mem_write_long::<false>(bus, address, value);
}
