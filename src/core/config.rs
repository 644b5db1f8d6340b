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

//! Core configuration
//!
//! Settings that select which specialisation of the interpreter runs. They are
//! read once when the core is created and can be loaded from a TOML file:
//!
//! ```toml
//! role = "slave"
//! cache_emulation = false
//! ```

use super::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which of the two CPUs this instance emulates
///
/// The role is visible to guest code through the MASTER bit of BCR1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sh2Role {
    #[default]
    Master,
    Slave,
}

impl Sh2Role {
    /// Short tag used as a log prefix
    pub fn tag(self) -> &'static str {
        match self {
            Sh2Role::Master => "MSH2",
            Sh2Role::Slave => "SSH2",
        }
    }
}

/// SH-2 core configuration
///
/// # Example
///
/// ```
/// use sh2_core::core::config::{Sh2Config, Sh2Role};
///
/// let config = Sh2Config::from_toml_str("role = \"slave\"").unwrap();
/// assert_eq!(config.role, Sh2Role::Slave);
/// assert!(config.cache_emulation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sh2Config {
    /// Master or slave CPU
    pub role: Sh2Role,

    /// Emulate the on-chip cache
    ///
    /// When disabled, cached-area accesses go straight to the bus regardless
    /// of CCR.CE. The address and data arrays remain accessible.
    pub cache_emulation: bool,
}

impl Default for Sh2Config {
    fn default() -> Self {
        Self {
            role: Sh2Role::Master,
            cache_emulation: true,
        }
    }
}

impl Sh2Config {
    /// Parse a configuration from TOML text
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
