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

//! Integration tests for the SH-2 core
//!
//! These drive whole programs through the public API: reset, advance,
//! host interrupt lines, the cache, save states and the disassembler.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::assertions::{assert_memory_long, assert_pc, assert_reg};
use common::fixtures::{boot, boot_with_config, set_vector, ENTRY, STACK};
use common::programs::{cached_accumulate_loop, double_read, idle_loop};
use sh2_core::core::config::Sh2Config;
use sh2_core::core::cpu::{Disassembler, Sh2};
use sh2_core::core::memory::RamBus;
use sh2_core::core::save_state::SaveState;

const CCR: u32 = 0xFFFF_FE92;
const DATA: u32 = 0x4000;

fn prepare_accumulate(cpu: &mut Sh2, iterations: u32) {
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, CCR);
    cpu.set_reg(4, iterations);
}

#[test]
fn test_power_on_reset_loads_vectors() {
    let (cpu, _bus) = boot(&idle_loop());

    assert_pc(&cpu, ENTRY);
    assert_reg(&cpu, 15, STACK);
    assert_eq!(cpu.sr().imask(), 0xF);
    assert_eq!(cpu.vbr(), 0);
}

#[test]
fn test_accumulate_loop_runs_to_completion() {
    let (mut cpu, mut bus) = boot(&cached_accumulate_loop());
    prepare_accumulate(&mut cpu, 5);

    cpu.advance(&mut bus, 200);

    // R0 doubles each iteration
    assert_reg(&cpu, 0, 32);
    assert_reg(&cpu, 4, 0);
    assert_reg(&cpu, 1, DATA + 5 * 4);
    assert_memory_long(&bus, DATA + 16, 16);
    assert!(cpu.pc() == ENTRY + 0x10 || cpu.pc() == ENTRY + 0x12);
}

#[test]
fn test_advance_respects_budget() {
    let (mut cpu, mut bus) = boot(&idle_loop());

    let executed = cpu.advance(&mut bus, 100);

    assert!(executed >= 100);
    // Overshoot is bounded by a single instruction
    assert!(executed < 100 + 16);
    assert_eq!(cpu.total_cycles(), executed);
}

#[test]
fn test_cache_hides_external_write() {
    let (mut cpu, mut bus) = boot(&double_read());
    bus.load(DATA, &0x1111_1111u32.to_be_bytes()).unwrap();
    cpu.set_reg(0, 1);
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, CCR);

    cpu.step(&mut bus); // mov.b r0, @r2
    cpu.step(&mut bus); // mov.l @r1, r3
    bus.load(DATA, &0x2222_2222u32.to_be_bytes()).unwrap();
    cpu.step(&mut bus); // mov.l @r1, r4

    assert_reg(&cpu, 3, 0x1111_1111);
    assert_reg(&cpu, 4, 0x1111_1111);
}

#[test]
fn test_cache_emulation_disabled_sees_external_write() {
    let config = Sh2Config {
        cache_emulation: false,
        ..Sh2Config::default()
    };
    let (mut cpu, mut bus) = boot_with_config(&double_read(), config);
    bus.load(DATA, &0x1111_1111u32.to_be_bytes()).unwrap();
    cpu.set_reg(0, 1);
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, CCR);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    bus.load(DATA, &0x2222_2222u32.to_be_bytes()).unwrap();
    cpu.step(&mut bus);

    assert_reg(&cpu, 3, 0x1111_1111);
    assert_reg(&cpu, 4, 0x2222_2222);
}

#[test]
fn test_external_interrupt_runs_handler_and_returns() {
    const HANDLER: u32 = 0x3000;
    let (mut cpu, mut bus) = boot(&idle_loop());
    // IRL level 8 auto vector
    set_vector(&mut bus, 68, HANDLER);
    bus.load_program(
        HANDLER,
        &[
            0xE542, // mov #0x42, r5
            0x002B, // rte
            0x0009, // nop
        ],
    );

    let acks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&acks);
    cpu.set_external_ack_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    cpu.set_sr(0);
    cpu.set_external_interrupt(8, 0);

    cpu.advance(&mut bus, 1);
    assert_pc(&cpu, HANDLER);
    assert_eq!(cpu.sr().imask(), 8);
    assert_eq!(acks.load(Ordering::SeqCst), 1);

    cpu.set_external_interrupt(0, 0);
    cpu.advance(&mut bus, 20);

    assert_reg(&cpu, 5, 0x42);
    assert_eq!(cpu.sr().imask(), 0);
    assert!(cpu.pc() == ENTRY || cpu.pc() == ENTRY + 2);
    assert_eq!(acks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_save_state_resume_matches_original_run() {
    let (mut cpu, mut bus) = boot(&cached_accumulate_loop());
    prepare_accumulate(&mut cpu, 40);
    cpu.advance(&mut bus, 60);

    let state = cpu.save_state("mid-loop");
    let mut replay_bus = RamBus::new(bus.size()).with_access_log();
    replay_bus.load(0, bus.memory()).unwrap();
    let mut original_bus = RamBus::new(bus.size()).with_access_log();
    original_bus.load(0, bus.memory()).unwrap();

    for _ in 0..50 {
        cpu.step(&mut original_bus);
    }

    let mut restored = Sh2::default();
    restored.load_state(&state).unwrap();
    for _ in 0..50 {
        restored.step(&mut replay_bus);
    }

    assert_eq!(original_bus.accesses(), replay_bus.accesses());
    assert_eq!(cpu.register_dump(), restored.register_dump());
    assert_eq!(original_bus.memory(), replay_bus.memory());
}

#[test]
fn test_save_state_file_round_trip() {
    let (mut cpu, mut bus) = boot(&cached_accumulate_loop());
    prepare_accumulate(&mut cpu, 10);
    cpu.advance(&mut bus, 30);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot1.state");
    cpu.save_state("slot 1").save_to_file(&path).unwrap();

    let loaded = SaveState::load_from_file(&path).unwrap();
    let mut restored = Sh2::default();
    restored.load_state(&loaded).unwrap();

    assert_eq!(cpu.register_dump(), restored.register_dump());
    assert_eq!(loaded.metadata.description, "slot 1");
}

#[test]
fn test_save_state_rejects_garbage() {
    assert!(SaveState::from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF]).is_err());
    assert!(SaveState::from_bytes(&[]).is_err());
}

#[test]
fn test_register_dump_serializes_to_json() {
    let (mut cpu, mut bus) = boot(&cached_accumulate_loop());
    prepare_accumulate(&mut cpu, 3);
    cpu.step(&mut bus);

    let json = serde_json::to_value(cpu.register_dump()).unwrap();

    assert_eq!(json["pc"], ENTRY + 2);
    assert_eq!(json["r"][0], 1);
    assert_eq!(json["r"][15], STACK);
    assert_eq!(json["cycles"], 1);
}

#[test]
fn test_disassemble_program_listing() {
    let listing: Vec<String> = cached_accumulate_loop()
        .iter()
        .enumerate()
        .map(|(i, &word)| Disassembler::disassemble(word, ENTRY + i as u32 * 2))
        .collect();

    assert_eq!(listing[0], "mov #1, r0");
    assert_eq!(listing[1], "mov.b r0, @r2");
    assert_eq!(listing[4], "add r3, r0");
    assert_eq!(listing[6], "bf 0x00001004");
    assert_eq!(listing[7], "nop");
    assert_eq!(listing[8], "bra 0x00001010");
}

#[test]
fn test_slave_role_from_toml() {
    let config = Sh2Config::from_toml_str("role = \"slave\"\ncache_emulation = true\n").unwrap();
    let (cpu, _bus) = boot_with_config(&idle_loop(), config);

    assert_eq!(cpu.config().role.tag(), "SSH2");
}
