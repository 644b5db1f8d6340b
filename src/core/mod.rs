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

//! Core emulation components
//!
//! This module contains all SH-2 emulation components:
//! - CPU register file, decoder and instruction handlers
//! - Memory access router and the external bus capability
//! - Cache unit (64 sets x 4 ways x 16-byte lines)
//! - Interrupt controller
//! - DMA controller (2 channels)
//! - On-chip peripherals (BSC, DIVU, FRT, WDT, SCI)
//! - Save states and configuration

pub mod cache;
pub mod config;
pub mod cpu;
pub mod dma;
pub mod error;
pub mod interrupt;
pub mod memory;
pub mod onchip;
pub mod save_state;

// Re-export commonly used types
pub use config::{Sh2Config, Sh2Role};
pub use cpu::Sh2;
pub use error::{EmulatorError, Result};
pub use memory::{Bus, RamBus};
