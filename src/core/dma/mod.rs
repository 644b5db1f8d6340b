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

//! DMA Controller (DMAC)
//!
//! The SH7604 has two DMA channels that copy data between any two addresses
//! the CPU can reach, using the same memory path as the CPU.
//!
//! # Channel Registers
//!
//! | Offset (ch0/ch1) | Register | Width  |
//! |------------------|----------|--------|
//! | 0x180 / 0x190    | SAR      | 32     |
//! | 0x184 / 0x194    | DAR      | 32     |
//! | 0x188 / 0x198    | TCR      | 24     |
//! | 0x18C / 0x19C    | CHCR     | 16     |
//! | 0x071 / 0x072    | DRCR     | 8      |
//!
//! # CHCR Layout
//!
//! ```text
//! [15:14] DM   destination address mode (fixed/inc/dec)
//! [13:12] SM   source address mode
//! [11:10] TS   transfer unit (1, 2, 4 or 16 bytes)
//! [9]     AR   auto-request
//! [8:3]   AM AL DS DL TB TA (bus handshake, stored only)
//! [2]     IE   interrupt on transfer end
//! [1]     TE   transfer ended
//! [0]     DE   channel enable
//! ```
//!
//! Transfers complete immediately when triggered; they are not spread over
//! CPU cycles.

mod transfer;

#[cfg(test)]
mod tests;

use bitflags::bitflags;

bitflags! {
    /// Single-bit CHCR fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChannelFlags: u32 {
        const DE = 1 << 0;
        const TE = 1 << 1;
        const IE = 1 << 2;
        const TA = 1 << 3;
        const TB = 1 << 4;
        const DL = 1 << 5;
        const DS = 1 << 6;
        const AL = 1 << 7;
        const AM = 1 << 8;
        const AR = 1 << 9;
    }
}

bitflags! {
    /// DMA operation register (DMAOR)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DmaOperation: u32 {
        /// Master enable
        const DME = 1 << 0;
        /// NMI occurred; blocks all transfers until cleared
        const NMIF = 1 << 1;
        /// Address error; blocks all transfers until cleared
        const AE = 1 << 2;
        /// Round-robin priority
        const PR = 1 << 3;
    }
}

/// Address step applied after each unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Fixed,
    Increment,
    Decrement,
    Reserved,
}

impl AddressMode {
    fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => AddressMode::Fixed,
            1 => AddressMode::Increment,
            2 => AddressMode::Decrement,
            _ => AddressMode::Reserved,
        }
    }

    fn bits(self) -> u32 {
        match self {
            AddressMode::Fixed => 0,
            AddressMode::Increment => 1,
            AddressMode::Decrement => 2,
            AddressMode::Reserved => 3,
        }
    }

    /// Apply this step to an address
    pub fn step(self, address: u32, size: u32) -> u32 {
        match self {
            AddressMode::Increment => address.wrapping_add(size),
            AddressMode::Decrement => address.wrapping_sub(size),
            AddressMode::Fixed | AddressMode::Reserved => address,
        }
    }
}

/// Transfer unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSize {
    Byte,
    Word,
    Long,
    Block16,
}

impl TransferSize {
    fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => TransferSize::Byte,
            1 => TransferSize::Word,
            2 => TransferSize::Long,
            _ => TransferSize::Block16,
        }
    }

    fn bits(self) -> u32 {
        match self {
            TransferSize::Byte => 0,
            TransferSize::Word => 1,
            TransferSize::Long => 2,
            TransferSize::Block16 => 3,
        }
    }

    /// Unit size in bytes
    pub fn bytes(self) -> u32 {
        match self {
            TransferSize::Byte => 1,
            TransferSize::Word => 2,
            TransferSize::Long => 4,
            TransferSize::Block16 => 16,
        }
    }

    /// Amount TCR decreases per unit
    pub fn count_step(self) -> u32 {
        match self {
            TransferSize::Block16 => 4,
            _ => 1,
        }
    }
}

/// Peripheral request line selected by DRCR.RS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaRequestSource {
    /// External DREQ pin
    Dreq,
    /// SCI receive-data-full
    RxI,
    /// SCI transmit-data-empty
    TxI,
}

impl DmaRequestSource {
    pub fn from_drcr(value: u8) -> Self {
        match value & 3 {
            1 => DmaRequestSource::RxI,
            2 => DmaRequestSource::TxI,
            _ => DmaRequestSource::Dreq,
        }
    }

    pub fn index(self) -> usize {
        match self {
            DmaRequestSource::Dreq => 0,
            DmaRequestSource::RxI => 1,
            DmaRequestSource::TxI => 2,
        }
    }
}

/// Mask of the 24-bit transfer count
pub const TCR_MASK: u32 = 0x00FF_FFFF;

/// One DMA channel
#[derive(Debug, Clone)]
pub struct DmaChannel {
    pub(crate) source_address: u32,
    pub(crate) destination_address: u32,
    pub(crate) transfer_count: u32,
    pub(crate) dest_mode: AddressMode,
    pub(crate) src_mode: AddressMode,
    pub(crate) transfer_size: TransferSize,
    pub(crate) flags: ChannelFlags,
    /// DRCR
    pub(crate) resource_select: u8,
}

impl DmaChannel {
    fn new() -> Self {
        Self {
            source_address: 0,
            destination_address: 0,
            transfer_count: 0,
            dest_mode: AddressMode::Fixed,
            src_mode: AddressMode::Fixed,
            transfer_size: TransferSize::Byte,
            flags: ChannelFlags::empty(),
            resource_select: 0,
        }
    }

    pub fn read_chcr(&self) -> u32 {
        (self.dest_mode.bits() << 14)
            | (self.src_mode.bits() << 12)
            | (self.transfer_size.bits() << 10)
            | self.flags.bits()
    }

    /// Write CHCR
    ///
    /// TE can only be cleared by software, never set.
    pub fn write_chcr(&mut self, value: u32) {
        self.dest_mode = AddressMode::from_bits(value >> 14);
        self.src_mode = AddressMode::from_bits(value >> 12);
        self.transfer_size = TransferSize::from_bits(value >> 10);
        let te = self.flags.contains(ChannelFlags::TE) && value & ChannelFlags::TE.bits() != 0;
        self.flags = ChannelFlags::from_bits_truncate(value) - ChannelFlags::TE;
        self.flags.set(ChannelFlags::TE, te);
    }

    /// Load CHCR verbatim, including TE
    pub(crate) fn restore_chcr(&mut self, value: u32) {
        self.write_chcr(value);
        self.flags = ChannelFlags::from_bits_truncate(value);
    }

    pub fn source_address(&self) -> u32 {
        self.source_address
    }

    pub fn destination_address(&self) -> u32 {
        self.destination_address
    }

    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    pub fn transfer_ended(&self) -> bool {
        self.flags.contains(ChannelFlags::TE)
    }

    /// Transfer-end interrupt requested
    pub fn interrupt_pending(&self) -> bool {
        self.flags.contains(ChannelFlags::TE | ChannelFlags::IE)
    }

    pub fn request_source(&self) -> DmaRequestSource {
        DmaRequestSource::from_drcr(self.resource_select)
    }
}

/// Two-channel DMA controller
///
/// # Example
///
/// ```
/// use sh2_core::core::dma::DmaController;
///
/// let mut dmac = DmaController::new();
/// dmac.write_tcr(0, 0);
/// assert_eq!(dmac.channel(0).transfer_count(), 0);
/// dmac.write_dmaor(1);
/// assert_eq!(dmac.read_dmaor(), 1);
/// ```
pub struct DmaController {
    pub(crate) channels: [DmaChannel; 2],
    pub(crate) dmaor: DmaOperation,
    /// Channel served first in round-robin mode
    pub(crate) next_channel: usize,
}

impl DmaController {
    pub fn new() -> Self {
        Self {
            channels: [DmaChannel::new(), DmaChannel::new()],
            dmaor: DmaOperation::empty(),
            next_channel: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn channel(&self, index: usize) -> &DmaChannel {
        &self.channels[index]
    }

    /// Whether a channel may transfer right now
    pub fn is_channel_enabled(&self, index: usize) -> bool {
        let flags = self.channels[index].flags;
        flags.contains(ChannelFlags::DE)
            && !flags.contains(ChannelFlags::TE)
            && self.dmaor.contains(DmaOperation::DME)
            && !self.dmaor.intersects(DmaOperation::AE | DmaOperation::NMIF)
    }

    pub fn write_sar(&mut self, index: usize, value: u32) {
        self.channels[index].source_address = value;
    }

    pub fn write_dar(&mut self, index: usize, value: u32) {
        self.channels[index].destination_address = value;
    }

    pub fn write_tcr(&mut self, index: usize, value: u32) {
        self.channels[index].transfer_count = value & TCR_MASK;
    }

    pub fn write_drcr(&mut self, index: usize, value: u8) {
        self.channels[index].resource_select = value & 3;
    }

    pub fn read_dmaor(&self) -> u32 {
        self.dmaor.bits()
    }

    /// Write DMAOR
    ///
    /// AE and NMIF can only be cleared by software.
    pub fn write_dmaor(&mut self, value: u32) {
        let sticky = DmaOperation::AE | DmaOperation::NMIF;
        let kept = self.dmaor & sticky & DmaOperation::from_bits_truncate(value);
        self.dmaor = (DmaOperation::from_bits_truncate(value) - sticky) | kept;
    }

    /// Load DMAOR verbatim, including the sticky flags
    pub(crate) fn restore_dmaor(&mut self, value: u32) {
        self.dmaor = DmaOperation::from_bits_truncate(value);
    }

    /// Latch an NMI, halting all channels
    pub fn raise_nmi(&mut self) {
        self.dmaor.insert(DmaOperation::NMIF);
    }

    /// Latch an address error, halting all channels
    pub fn raise_address_error(&mut self) {
        self.dmaor.insert(DmaOperation::AE);
    }

    /// Channel service order for the current priority mode
    ///
    /// Fixed mode always serves channel 0 first. Round-robin mode starts with
    /// the channel that did not transfer last.
    pub(crate) fn service_order(&self) -> [usize; 2] {
        if self.dmaor.contains(DmaOperation::PR) {
            [self.next_channel, 1 - self.next_channel]
        } else {
            [0, 1]
        }
    }

    /// Record that `index` finished a transfer
    pub(crate) fn finish_channel(&mut self, index: usize) {
        self.channels[index].transfer_count = 0;
        self.channels[index].flags.insert(ChannelFlags::TE);
        self.next_channel = 1 - index;
    }
}

impl Default for DmaController {
    fn default() -> Self {
        Self::new()
    }
}
