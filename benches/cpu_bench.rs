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

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sh2_core::core::cpu::{decode_instruction, DecodeTable, Disassembler, Sh2};
use sh2_core::core::memory::RamBus;
use sh2_core::core::{Sh2Config, Sh2Role};
use std::hint::black_box;

/// add #1, r0; bra <self>; nop
const LOOP: [u16; 3] = [0x7001, 0xAFFD, 0x0009];

fn setup(cache_emulation: bool) -> (Sh2, RamBus) {
    let mut bus = RamBus::new(0x10000);
    bus.load(0, &[0, 0, 0x10, 0x00, 0, 0, 0x80, 0x00])
        .expect("vector table fits");
    bus.load_program(0x1000, &LOOP);

    let mut cpu = Sh2::new(Sh2Config {
        role: Sh2Role::Master,
        cache_emulation,
    });
    cpu.reset(&mut bus, true);
    // CCR: cache enabled
    cpu.poke_byte(&mut bus, 0xFFFF_FE92, 0x01);
    (cpu, bus)
}

fn cpu_advance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for cache_emulation in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("tight_loop", cache_emulation),
            &cache_emulation,
            |b, &cache_emulation| {
                let (mut cpu, mut bus) = setup(cache_emulation);
                b.iter(|| black_box(cpu.advance(&mut bus, black_box(10_000))));
            },
        );
    }

    group.finish();
}

fn cpu_step_benchmark(c: &mut Criterion) {
    c.bench_function("cpu_step", |b| {
        let (mut cpu, mut bus) = setup(true);
        b.iter(|| black_box(cpu.step(&mut bus)));
    });
}

fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.bench_function("table_lookup", |b| {
        let table = DecodeTable::get();
        b.iter(|| {
            for word in (0..=u16::MAX).step_by(97) {
                black_box(table.entry::<false>(black_box(word)));
            }
        });
    });

    group.bench_function("decode_instruction", |b| {
        b.iter(|| {
            for word in (0..=u16::MAX).step_by(97) {
                black_box(decode_instruction(black_box(word)));
            }
        });
    });

    group.bench_function("disassemble", |b| {
        b.iter(|| black_box(Disassembler::disassemble(black_box(0x6F26), 0x0600_0000)));
    });

    group.finish();
}

criterion_group!(
    benches,
    cpu_advance_benchmark,
    cpu_step_benchmark,
    decode_benchmark
);
criterion_main!(benches);
