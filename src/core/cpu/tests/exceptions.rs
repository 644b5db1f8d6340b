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
use crate::core::interrupt::InterruptSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const HANDLER: u32 = 0x3000;

#[test]
fn test_trapa_pushes_sr_and_next_pc() {
    let (mut cpu, mut bus) = setup_with_memory(&[0xC320], 0x20000);
    write_long(&mut bus, 0x80, HANDLER);
    cpu.set_reg(15, 0x0001_0020);

    let cycles = cpu.step(&mut bus);

    assert_eq!(cycles, 8);
    assert_eq!(read_long(&bus, 0x1001C), 0xF0);
    assert_eq!(read_long(&bus, 0x10018), CODE + 2);
    assert_eq!(cpu.reg(15), 0x10018);
    assert_eq!(cpu.pc(), HANDLER);
}

#[test]
fn test_trapa_uses_vbr() {
    let (mut cpu, mut bus) = setup(&[0xC310]);
    cpu.set_vbr(0x4000);
    write_long(&mut bus, 0x4000 + 0x10 * 4, HANDLER);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), HANDLER);
}

#[test]
fn test_illegal_instruction() {
    let (mut cpu, mut bus) = setup(&[0xFFFF]);
    write_long(&mut bus, (VECTOR_ILLEGAL_INSTRUCTION as u32) * 4, HANDLER);

    let cycles = cpu.step(&mut bus);

    assert_eq!(cycles, 8);
    assert_eq!(cpu.pc(), HANDLER);
    assert_eq!(read_long(&bus, STACK - 8), CODE);
}

#[test]
fn test_rte_returns_from_trap() {
    let (mut cpu, mut bus) = setup(&[0xC320, 0x7101]);
    write_long(&mut bus, 0x80, HANDLER);
    // rte; nop
    bus.load_program(HANDLER, &[0x002B, 0x0009]);

    cpu.step(&mut bus);
    cpu.set_sr(0x0000_0001);
    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.in_delay_slot());
    cpu.step(&mut bus);

    assert_eq!(cpu.pc(), CODE + 2);
    assert_eq!(cpu.reg(15), STACK);
    assert_eq!(cpu.sr().bits(), 0xF0);

    cpu.step(&mut bus);
    assert_eq!(cpu.reg(1), 1);
}

#[test]
fn test_irl_masked_until_level_exceeds_imask() {
    let (mut cpu, mut bus) = setup(&[0x0009, 0x0009, 0x0009]);
    write_long(&mut bus, 66 * 4, HANDLER);

    let acknowledged = Arc::new(AtomicBool::new(false));
    let flag = acknowledged.clone();
    cpu.set_external_ack_callback(move || flag.store(true, Ordering::SeqCst));

    cpu.set_external_interrupt(5, 0);
    assert_eq!(cpu.pending_interrupt().source, InterruptSource::Irl);

    // I = 15 blocks level 5
    assert_eq!(cpu.step(&mut bus), 1);
    assert_eq!(cpu.pc(), CODE + 2);
    assert!(!acknowledged.load(Ordering::SeqCst));

    cpu.set_sr(0);
    assert_eq!(cpu.step(&mut bus), Sh2::INTERRUPT_CYCLES);
    assert_eq!(cpu.pc(), HANDLER);
    assert_eq!(cpu.sr().imask(), 5);
    assert_eq!(read_long(&bus, STACK - 8), CODE + 2);
    assert!(acknowledged.load(Ordering::SeqCst));
}

#[test]
fn test_irl_withdrawn() {
    let (mut cpu, _bus) = setup(&[0x0009]);
    cpu.set_external_interrupt(5, 0);
    cpu.set_external_interrupt(0, 0);
    assert_eq!(cpu.pending_interrupt().source, InterruptSource::None);
}

#[test]
fn test_nmi_ignores_mask() {
    let (mut cpu, mut bus) = setup(&[0x0009]);
    write_long(&mut bus, 11 * 4, HANDLER);

    cpu.set_nmi();
    assert!(cpu.interrupt_controller().nmi_pending());
    assert_ne!(cpu.dmac().read_dmaor() & 0x2, 0);

    assert_eq!(cpu.step(&mut bus), Sh2::INTERRUPT_CYCLES);
    assert_eq!(cpu.pc(), HANDLER);
    assert_eq!(cpu.sr().imask(), 15);
    assert!(!cpu.interrupt_controller().nmi_pending());
    assert_eq!(cpu.pending_interrupt().source, InterruptSource::None);
}

#[test]
fn test_sleep_until_interrupt() {
    let (mut cpu, mut bus) = setup(&[0x001B, 0x7101]);
    write_long(&mut bus, 11 * 4, HANDLER);

    assert_eq!(cpu.step(&mut bus), 3);
    assert!(cpu.is_sleeping());
    assert_eq!(cpu.pc(), CODE);

    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), CODE);

    cpu.set_nmi();
    cpu.step(&mut bus);
    assert!(!cpu.is_sleeping());
    assert_eq!(cpu.pc(), HANDLER);
    assert_eq!(read_long(&bus, STACK - 8), CODE + 2);
}

#[derive(Default)]
struct Recorder {
    executed: Vec<(u32, u16, bool)>,
    exceptions: Vec<(u8, u32)>,
}

struct RecordingTracer(Arc<Mutex<Recorder>>);

impl Sh2Tracer for RecordingTracer {
    fn execute(&mut self, pc: u32, instruction: u16, delay_slot: bool) {
        self.0.lock().unwrap().executed.push((pc, instruction, delay_slot));
    }

    fn exception(&mut self, vector: u8, pc: u32, _sr: u32) {
        self.0.lock().unwrap().exceptions.push((vector, pc));
    }
}

#[test]
fn test_tracer_sees_instructions_and_exceptions() {
    let (mut cpu, mut bus) = setup(&[0xA001, 0x0009, 0x0009, 0xC320]);
    write_long(&mut bus, 0x80, HANDLER);

    let recorder = Arc::new(Mutex::new(Recorder::default()));
    cpu.set_tracer(Box::new(RecordingTracer(recorder.clone())));

    run(&mut cpu, &mut bus, 3);

    let recorder = recorder.lock().unwrap();
    assert_eq!(
        recorder.executed,
        vec![(0x1000, 0xA001, false), (0x1002, 0x0009, true), (0x1006, 0xC320, false)]
    );
    assert_eq!(recorder.exceptions, vec![(0x20, 0x1008)]);
}
