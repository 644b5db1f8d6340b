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

//! Save state serialization for the SH-2 core
//!
//! Captures the complete architectural and on-chip state of one core so it
//! can be restored later. External memory belongs to the host and is not
//! part of the state.
//!
//! # Save State Format
//!
//! States are encoded with bincode (standard configuration). A state holds:
//! - Metadata (timestamp, core role, free-form description)
//! - CPU registers and execution flags
//! - Cache (CCR, tags, LRU bits, line data)
//! - Interrupt controller (levels, vectors, ICR, NMI and IRL latches)
//! - DMAC, DIVU, FRT, WDT, BSC and SCI registers
//!
//! # Version Compatibility
//!
//! Loading a state whose version differs from [`SAVE_STATE_VERSION`] fails
//! with [`EmulatorError::IncompatibleSaveState`].
//!
//! # Example
//!
//! ```
//! use sh2_core::core::cpu::Sh2;
//! use sh2_core::core::save_state::SaveState;
//!
//! let mut cpu = Sh2::default();
//! cpu.set_reg(3, 0x1234);
//!
//! let bytes = cpu.save_state("checkpoint").to_bytes().unwrap();
//!
//! let mut restored = Sh2::default();
//! restored.load_state(&SaveState::from_bytes(&bytes).unwrap()).unwrap();
//! assert_eq!(restored.reg(3), 0x1234);
//! ```

use crate::core::cache::{ENTRY_COUNT, LINE_SIZE, WAY_COUNT};
use crate::core::cpu::{MacRegister, Sh2, StatusRegister};
use crate::core::dma::DmaController;
use crate::core::error::{EmulatorError, Result};
use crate::core::onchip::{
    BusStateController, DivisionUnit, FreeRunningTimer, SerialInterface, WatchdogTimer,
};
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Save state version for compatibility checking
///
/// Incremented whenever the format changes incompatibly.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete core save state
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    pub metadata: SaveStateMetadata,

    pub cpu: Sh2CpuState,
    pub cache: CacheState,
    pub interrupts: InterruptState,
    pub dma: DmaState,
    pub divu: DivuState,
    pub frt: FrtState,
    pub wdt: WdtState,
    pub bsc: BscState,
    pub sci: SciState,
}

/// Save state metadata
#[derive(Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// "MSH2" or "SSH2"
    pub role: String,

    pub description: String,
}

/// CPU registers and execution flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Sh2CpuState {
    pub r: [u32; 16],
    pub pc: u32,
    pub pr: u32,
    pub mac: u64,
    pub sr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub delay_slot: bool,
    pub delay_slot_target: u32,
    pub sleeping: bool,
    pub total_cycles: u64,
    pub dma_requests: [bool; 3],
    pub sbycr: u8,
}

/// Cache contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CacheState {
    pub ccr: u8,
    /// Entry-major, four ways per entry
    pub tags: Vec<u32>,
    pub lru: Vec<u8>,
    /// Entry-major, four 16-byte lines per entry
    pub data: Vec<u8>,
}

impl CacheState {
    fn validate(&self) -> Result<()> {
        let lines = ENTRY_COUNT * WAY_COUNT;
        if self.tags.len() != lines
            || self.lru.len() != ENTRY_COUNT
            || self.data.len() != lines * LINE_SIZE
        {
            return Err(EmulatorError::InvalidSaveState(format!(
                "cache arrays have lengths {}/{}/{}",
                self.tags.len(),
                self.lru.len(),
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// Interrupt controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct InterruptState {
    pub levels: [u8; 16],
    pub vectors: [u8; 16],
    pub icr: u16,
    pub nmi: bool,
    pub irl_level: u8,
    pub irl_vector: u8,
    pub pending_level: u8,
    pub pending_source: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DmaChannelState {
    pub sar: u32,
    pub dar: u32,
    pub tcr: u32,
    pub chcr: u32,
    pub drcr: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DmaState {
    pub channels: Vec<DmaChannelState>,
    pub dmaor: u32,
    pub next_channel: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DivuState {
    pub dvsr: u32,
    pub dvdnt: u32,
    pub dvcr: u32,
    pub dvdnth: u32,
    pub dvdntl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FrtState {
    pub tier: u8,
    pub ftcsr: u8,
    pub frc: u16,
    pub ocra: u16,
    pub ocrb: u16,
    pub tcr: u8,
    pub tocr: u8,
    pub ficr: u16,
    pub temp: u8,
    pub cycle_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct WdtState {
    pub wtcsr: u8,
    pub wtcnt: u8,
    pub rstcsr: u8,
    pub cycle_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct BscState {
    pub bcr1: u16,
    pub bcr2: u16,
    pub wcr: u16,
    pub mcr: u16,
    pub rtcsr: u16,
    pub rtcnt: u16,
    pub rtcor: u16,
    pub cycle_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SciState {
    pub smr: u8,
    pub brr: u8,
    pub scr: u8,
    pub tdr: u8,
    pub ssr: u8,
    pub rdr: u8,
}

impl SaveState {
    /// Capture the state of `sh2`
    pub fn from_sh2(sh2: &Sh2, description: &str) -> Self {
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                role: sh2.config.role.tag().to_string(),
                description: description.to_string(),
            },
            cpu: sh2.to_state(),
            cache: sh2.cache.to_state(),
            interrupts: sh2.intc.to_state(),
            dma: sh2.dmac.to_state(),
            divu: sh2.divu.to_state(),
            frt: sh2.frt.to_state(),
            wdt: sh2.wdt.to_state(),
            bsc: sh2.bsc.to_state(),
            sci: sh2.sci.to_state(),
        }
    }

    /// Restore `sh2` from this state
    ///
    /// # Errors
    ///
    /// Fails if the version does not match or the cache arrays have the
    /// wrong length; `sh2` is left untouched in that case.
    pub fn apply_to(&self, sh2: &mut Sh2) -> Result<()> {
        self.validate()?;

        sh2.restore_from_state(&self.cpu);
        sh2.cache.restore_from_state(&self.cache);
        sh2.intc.restore_from_state(&self.interrupts);
        sh2.dmac.restore_from_state(&self.dma);
        sh2.divu.restore_from_state(&self.divu);
        sh2.frt.restore_from_state(&self.frt);
        sh2.wdt.restore_from_state(&self.wdt);
        sh2.bsc.restore_from_state(&self.bsc);
        sh2.sci.restore_from_state(&self.sci);

        log::debug!(
            "[{}] Restored save state \"{}\" from {}",
            sh2.config.role.tag(),
            self.metadata.description,
            self.metadata.timestamp
        );
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::IncompatibleSaveState {
                expected: SAVE_STATE_VERSION,
                got: self.version,
            });
        }
        if self.dma.channels.len() != 2 {
            return Err(EmulatorError::InvalidSaveState(format!(
                "expected 2 DMA channels, got {}",
                self.dma.channels.len()
            )));
        }
        self.cache.validate()
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    /// Decode from bytes and check the version
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _): (SaveState, usize) =
            bincode::decode_from_slice(bytes, config::standard())?;
        state.validate()?;
        Ok(state)
    }

    /// Save state to file
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use sh2_core::core::cpu::Sh2;
    /// # let cpu = Sh2::default();
    /// cpu.save_state("boot").save_to_file("msh2.state").unwrap();
    /// ```
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = self.to_bytes()?;
        let mut file = File::create(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Load state from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, decoding fails or the
    /// version is incompatible.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }
}

/// Trait for components that can be saved and restored
pub trait StateSave {
    /// The state type for this component
    type State: Serialize + for<'de> Deserialize<'de>;

    /// Convert this component to a saveable state
    fn to_state(&self) -> Self::State;

    /// Restore this component from a saved state
    fn restore_from_state(&mut self, state: &Self::State);
}

impl Sh2 {
    /// Capture a save state of this core
    pub fn save_state(&self, description: &str) -> SaveState {
        SaveState::from_sh2(self, description)
    }

    /// Restore this core from a save state
    pub fn load_state(&mut self, state: &SaveState) -> Result<()> {
        state.apply_to(self)
    }
}

impl StateSave for Sh2 {
    type State = Sh2CpuState;

    fn to_state(&self) -> Self::State {
        Sh2CpuState {
            r: self.r,
            pc: self.pc,
            pr: self.pr,
            mac: self.mac.value(),
            sr: self.sr.bits(),
            gbr: self.gbr,
            vbr: self.vbr,
            delay_slot: self.delay_slot,
            delay_slot_target: self.delay_slot_target,
            sleeping: self.sleeping,
            total_cycles: self.total_cycles,
            dma_requests: self.dma_requests,
            sbycr: self.sbycr,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.r = state.r;
        self.pc = state.pc;
        self.pr = state.pr;
        self.mac = MacRegister::new(state.mac);
        self.sr = StatusRegister::new(state.sr);
        self.gbr = state.gbr;
        self.vbr = state.vbr;
        self.delay_slot = state.delay_slot;
        self.delay_slot_target = state.delay_slot_target;
        self.sleeping = state.sleeping;
        self.total_cycles = state.total_cycles;
        self.dma_requests = state.dma_requests;
        self.sbycr = state.sbycr;
    }
}

impl StateSave for DmaController {
    type State = DmaState;

    fn to_state(&self) -> Self::State {
        DmaState {
            channels: self
                .channels
                .iter()
                .map(|channel| DmaChannelState {
                    sar: channel.source_address,
                    dar: channel.destination_address,
                    tcr: channel.transfer_count,
                    chcr: channel.read_chcr(),
                    drcr: channel.resource_select,
                })
                .collect(),
            dmaor: self.read_dmaor(),
            next_channel: self.next_channel as u8,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        for (channel, saved) in self.channels.iter_mut().zip(&state.channels) {
            channel.source_address = saved.sar;
            channel.destination_address = saved.dar;
            channel.transfer_count = saved.tcr;
            channel.restore_chcr(saved.chcr);
            channel.resource_select = saved.drcr;
        }
        self.restore_dmaor(state.dmaor);
        self.next_channel = (state.next_channel & 1) as usize;
    }
}

impl StateSave for DivisionUnit {
    type State = DivuState;

    fn to_state(&self) -> Self::State {
        DivuState {
            dvsr: self.dvsr,
            dvdnt: self.dvdnt,
            dvcr: self.dvcr,
            dvdnth: self.dvdnth,
            dvdntl: self.dvdntl,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.dvsr = state.dvsr;
        self.dvdnt = state.dvdnt;
        self.dvcr = state.dvcr;
        self.dvdnth = state.dvdnth;
        self.dvdntl = state.dvdntl;
    }
}

impl StateSave for FreeRunningTimer {
    type State = FrtState;

    fn to_state(&self) -> Self::State {
        FrtState {
            tier: self.tier,
            ftcsr: self.ftcsr,
            frc: self.frc,
            ocra: self.ocra,
            ocrb: self.ocrb,
            tcr: self.tcr,
            tocr: self.tocr,
            ficr: self.ficr,
            temp: self.temp,
            cycle_count: self.cycle_count,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.tier = state.tier;
        self.ftcsr = state.ftcsr;
        self.frc = state.frc;
        self.ocra = state.ocra;
        self.ocrb = state.ocrb;
        self.tcr = state.tcr;
        self.tocr = state.tocr;
        self.ficr = state.ficr;
        self.temp = state.temp;
        self.cycle_count = state.cycle_count;
    }
}

impl StateSave for WatchdogTimer {
    type State = WdtState;

    fn to_state(&self) -> Self::State {
        WdtState {
            wtcsr: self.wtcsr,
            wtcnt: self.wtcnt,
            rstcsr: self.rstcsr,
            cycle_count: self.cycle_count,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.wtcsr = state.wtcsr;
        self.wtcnt = state.wtcnt;
        self.rstcsr = state.rstcsr;
        self.cycle_count = state.cycle_count;
    }
}

impl StateSave for BusStateController {
    type State = BscState;

    fn to_state(&self) -> Self::State {
        BscState {
            bcr1: self.bcr1,
            bcr2: self.bcr2,
            wcr: self.wcr,
            mcr: self.mcr,
            rtcsr: self.rtcsr,
            rtcnt: self.rtcnt,
            rtcor: self.rtcor,
            cycle_count: self.cycle_count,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.bcr1 = state.bcr1;
        self.bcr2 = state.bcr2;
        self.wcr = state.wcr;
        self.mcr = state.mcr;
        self.rtcsr = state.rtcsr;
        self.rtcnt = state.rtcnt;
        self.rtcor = state.rtcor;
        self.cycle_count = state.cycle_count;
    }
}

impl StateSave for SerialInterface {
    type State = SciState;

    fn to_state(&self) -> Self::State {
        SciState {
            smr: self.smr,
            brr: self.brr,
            scr: self.scr,
            tdr: self.tdr,
            ssr: self.ssr,
            rdr: self.rdr,
        }
    }

    fn restore_from_state(&mut self, state: &Self::State) {
        self.smr = state.smr;
        self.brr = state.brr;
        self.scr = state.scr;
        self.tdr = state.tdr;
        self.ssr = state.ssr;
        self.rdr = state.rdr;
    }
}
