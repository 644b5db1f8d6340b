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

//! Exception entry

use super::Sh2;
use crate::core::memory::Bus;

/// General illegal instruction
pub const VECTOR_ILLEGAL_INSTRUCTION: u8 = 4;
/// Illegal instruction in a delay slot
pub const VECTOR_ILLEGAL_SLOT: u8 = 6;
/// CPU address error
pub const VECTOR_CPU_ADDRESS_ERROR: u8 = 9;
/// DMA address error
pub const VECTOR_DMA_ADDRESS_ERROR: u8 = 10;

/// Cycles charged for illegal instruction exceptions
const ILLEGAL_CYCLES: u64 = 8;

impl Sh2 {
    /// Push SR and `pushed_pc`, then jump through the vector table
    ///
    /// ```text
    /// [SP-4] <- SR
    /// [SP-8] <- pushed_pc
    /// SP     <- SP - 8
    /// PC     <- [VBR + vector * 4] & !1
    /// ```
    pub(crate) fn enter_exception<const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        vector: u8,
        pushed_pc: u32,
    ) {
        let sp = self.r[15];
        self.mem_write_long::<CACHE>(bus, sp.wrapping_sub(4), self.sr.bits());
        self.mem_write_long::<CACHE>(bus, sp.wrapping_sub(8), pushed_pc);
        self.r[15] = sp.wrapping_sub(8);

        let entry = self.vbr.wrapping_add((vector as u32) << 2);
        self.pc = self.mem_read_long::<CACHE>(bus, entry) & !1;

        if DEBUG {
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.exception(vector, pushed_pc, self.sr.bits());
            }
        }
    }

    /// Undefined opcode outside a delay slot
    pub(crate) fn illegal_instruction<const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        instruction: u16,
    ) -> u64 {
        log::warn!(
            "[{}] Illegal instruction 0x{:04X} at PC=0x{:08X}",
            self.config.role.tag(),
            instruction,
            self.pc
        );
        let pc = self.pc;
        self.enter_exception::<DEBUG, CACHE>(bus, VECTOR_ILLEGAL_INSTRUCTION, pc);
        ILLEGAL_CYCLES
    }

    /// Undefined or branch opcode in a delay slot
    ///
    /// The pushed PC is the branch target that the slot would have committed.
    pub(crate) fn illegal_slot_instruction<const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        instruction: u16,
    ) -> u64 {
        log::warn!(
            "[{}] Illegal slot instruction 0x{:04X} at PC=0x{:08X}",
            self.config.role.tag(),
            instruction,
            self.pc
        );
        let target = self.delay_slot_target;
        self.delay_slot = false;
        self.enter_exception::<DEBUG, CACHE>(bus, VECTOR_ILLEGAL_SLOT, target);
        ILLEGAL_CYCLES
    }
}
