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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
///
/// Guest-visible faults (illegal instructions, slot-illegal instructions) are
/// modelled as CPU exceptions and never surface here. These errors only cover
/// host-side operations such as file I/O and save-state handling.
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save state encoding failed: {0}")]
    SaveStateEncode(#[from] bincode::error::EncodeError),

    #[error("Save state decoding failed: {0}")]
    SaveStateDecode(#[from] bincode::error::DecodeError),

    #[error("Incompatible save state version: expected {expected}, got {got}")]
    IncompatibleSaveState { expected: u32, got: u32 },

    #[error("Invalid save state: {0}")]
    InvalidSaveState(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Image of {size} bytes at 0x{address:08X} does not fit in {capacity} bytes of memory")]
    ImageTooLarge {
        address: u32,
        size: usize,
        capacity: usize,
    },
}
