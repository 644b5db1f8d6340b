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

//! Hitachi SH-2 (SH7604) interpreter core library
//!
//! This library provides the instruction-execution core of a cycle-counting
//! SH-2 emulator, including the delay-slot pipeline, the 4-way set-associative
//! cache, the interrupt controller, the two-channel DMA engine and the bank of
//! on-chip control registers.
//!
//! The surrounding system supplies memory through the [`core::memory::Bus`]
//! capability and drives execution with [`core::cpu::Sh2::advance`].
//!
//! # Example
//!
//! ```
//! use sh2_core::core::cpu::Sh2;
//! use sh2_core::core::memory::RamBus;
//!
//! let mut bus = RamBus::new(64 * 1024);
//! // Reset vectors: PC = 0x400, SP = 0x8000
//! bus.load(0x0000, &[0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x80, 0x00]).unwrap();
//! bus.load_program(0x0400, &[0x7505]); // add #5, r5
//!
//! let mut cpu = Sh2::default();
//! cpu.reset(&mut bus, true);
//! let cycles = cpu.step(&mut bus);
//! assert_eq!(cycles, 1);
//! assert_eq!(cpu.reg(5), 5);
//! ```

pub mod core;
