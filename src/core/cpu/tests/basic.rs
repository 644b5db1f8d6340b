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

#[test]
fn test_power_on_reset_loads_vectors() {
    let (cpu, _bus) = setup(&[0x0009]);
    assert_eq!(cpu.pc(), CODE);
    assert_eq!(cpu.reg(15), STACK);
    assert_eq!(cpu.sr().bits(), 0xF0);
    assert_eq!(cpu.vbr(), 0);
    assert!(!cpu.in_delay_slot());
}

#[test]
fn test_manual_reset_uses_vectors_2_and_3() {
    let (mut cpu, mut bus) = setup(&[0x0009]);
    write_long(&mut bus, 8, 0x3000);
    write_long(&mut bus, 12, 0x7000);
    cpu.set_reg(4, 0x1234);

    cpu.reset(&mut bus, false);

    assert_eq!(cpu.pc(), 0x3000);
    assert_eq!(cpu.reg(15), 0x7000);
    assert_eq!(cpu.reg(4), 0);
}

#[test]
fn test_manual_reset_keeps_cache_state() {
    let (mut cpu, mut bus) = setup(&[0x0009]);
    cpu.poke_byte(&mut bus, 0xFFFF_FE92, 0x01);
    assert!(cpu.cache().is_enabled());

    cpu.reset(&mut bus, false);
    assert!(cpu.cache().is_enabled());

    cpu.reset(&mut bus, true);
    assert!(!cpu.cache().is_enabled());
}

#[test]
fn test_add_immediate_example() {
    // add #5, r5
    let (mut cpu, mut bus) = setup(&[0x7505]);

    let cycles = cpu.step(&mut bus);

    assert_eq!(cycles, 1);
    assert_eq!(cpu.reg(5), 5);
    assert_eq!(cpu.pc(), CODE + 2);
}

#[test]
fn test_register_index_is_masked() {
    let mut cpu = Sh2::default();
    cpu.set_reg(0x13, 0xDEAD_BEEF);
    assert_eq!(cpu.reg(3), 0xDEAD_BEEF);
}

#[test]
fn test_sr_write_mask() {
    let mut cpu = Sh2::default();
    cpu.set_sr(0xFFFF_FFFF);
    assert_eq!(cpu.sr().bits(), 0x3F3);
}

#[test]
fn test_advance_runs_at_least_budget() {
    let (mut cpu, mut bus) = setup(&[0x0009; 16]);

    let cycles = cpu.advance(&mut bus, 5);

    assert_eq!(cycles, 5);
    assert_eq!(cpu.pc(), CODE + 10);
    assert_eq!(cpu.total_cycles(), 5);
}

#[test]
fn test_advance_may_overshoot_by_one_instruction() {
    // tas.b @r1 costs 4 cycles
    let (mut cpu, mut bus) = setup(&[0x411B, 0x411B]);
    cpu.set_reg(1, DATA);

    let cycles = cpu.advance(&mut bus, 5);

    assert_eq!(cycles, 8);
}

#[test]
fn test_register_dump_matches_accessors() {
    let (mut cpu, _bus) = setup(&[0x0009]);
    cpu.set_mac(0x0000_0001_0000_0002);
    let dump = cpu.register_dump();
    assert_eq!(dump.pc, CODE);
    assert_eq!(dump.r[15], STACK);
    assert_eq!(dump.mach, 1);
    assert_eq!(dump.macl, 2);
}

#[test]
fn test_register_dump_serializes_to_json() {
    let (cpu, _bus) = setup(&[0x0009]);
    let json = serde_json::to_string(&cpu.register_dump()).unwrap();
    assert!(json.contains("\"pc\":4096"));
}
