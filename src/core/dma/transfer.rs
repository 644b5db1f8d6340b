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

//! DMA transfer execution

use super::{ChannelFlags, TransferSize};
use crate::core::cpu::Sh2;
use crate::core::interrupt::InterruptController;
use crate::core::memory::{Bus, MemPrimitive};

/// TCR value 0 means the maximum count
const MAX_TRANSFER_COUNT: u32 = 0x0100_0000;

impl Sh2 {
    /// Run every channel that is ready, in priority order
    pub(crate) fn run_dma<const CACHE: bool>(&mut self, bus: &mut dyn Bus) {
        let debug = self.tracer.is_some();
        for index in self.dmac.service_order() {
            if debug {
                self.run_dma_channel::<true, CACHE>(bus, index);
            } else {
                self.run_dma_channel::<false, CACHE>(bus, index);
            }
        }
    }

    /// Run a whole transfer on one channel if it is enabled and requested
    pub(crate) fn run_dma_channel<const DEBUG: bool, const CACHE: bool>(&mut self, bus: &mut dyn Bus, index: usize) {
        if !self.dmac.is_channel_enabled(index) {
            return;
        }

        let channel = &self.dmac.channels[index];
        if !channel.flags.contains(ChannelFlags::AR)
            && !self.dma_requests[channel.request_source().index()]
        {
            return;
        }

        let unit = channel.transfer_size;
        let src_mode = channel.src_mode;
        let dst_mode = channel.dest_mode;
        let mut src = channel.source_address;
        let mut dst = channel.destination_address;
        let mut count = match channel.transfer_count {
            0 => MAX_TRANSFER_COUNT,
            count => count,
        };

        let alignment = unit.bytes() - 1;
        if src & alignment != 0 || dst & alignment != 0 {
            log::warn!(
                "[{}] DMA{} address error: src=0x{:08X} dst=0x{:08X} unit={}",
                self.config.role.tag(),
                index,
                src,
                dst,
                unit.bytes()
            );
            self.dmac.raise_address_error();
            return;
        }

        if DEBUG {
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.dma_transfer_begin(index, src, dst, count, unit.bytes(), src_mode, dst_mode);
            }
        }
        log::trace!(
            "[{}] DMA{}: 0x{:08X} -> 0x{:08X}, {} x {} bytes",
            self.config.role.tag(),
            index,
            src,
            dst,
            count,
            unit.bytes()
        );

        while count > 0 {
            match unit {
                TransferSize::Byte => self.dma_copy::<u8, DEBUG, CACHE>(bus, index, src, dst),
                TransferSize::Word => self.dma_copy::<u16, DEBUG, CACHE>(bus, index, src, dst),
                TransferSize::Long => self.dma_copy::<u32, DEBUG, CACHE>(bus, index, src, dst),
                TransferSize::Block16 => {
                    for i in 0..4 {
                        let offset = i * 4;
                        self.dma_copy::<u32, DEBUG, CACHE>(
                            bus,
                            index,
                            src.wrapping_add(offset),
                            dst.wrapping_add(offset),
                        );
                    }
                }
            }
            src = src_mode.step(src, unit.bytes());
            dst = dst_mode.step(dst, unit.bytes());
            count = count.saturating_sub(unit.count_step());
        }

        self.dmac.channels[index].source_address = src;
        self.dmac.channels[index].destination_address = dst;
        self.dmac.finish_channel(index);

        let irq = self.dmac.channels[index].flags.contains(ChannelFlags::IE);
        if DEBUG {
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.dma_transfer_end(index, irq);
            }
        }
        if irq {
            self.update_interrupts(&[InterruptController::dma_source(index)]);
        }
    }

    fn dma_copy<T: MemPrimitive, const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        index: usize,
        src: u32,
        dst: u32,
    ) {
        let value = self.mem_read::<T, false, false, CACHE>(bus, src);
        self.mem_write::<T, false, CACHE>(bus, dst, value);
        if DEBUG {
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.dma_transfer(index, src, dst, value.to_u32(), T::SIZE);
            }
        }
    }
}
