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

use super::super::{DecodedArgs, Sh2};
use crate::core::memory::Bus;

impl Sh2 {
    // === System Control Instructions ===

    pub(in crate::core::cpu) fn op_clrt(&mut self) -> u64 {
        self.sr.set_t(false);
        1
    }

    pub(in crate::core::cpu) fn op_sett(&mut self) -> u64 {
        self.sr.set_t(true);
        1
    }

    pub(in crate::core::cpu) fn op_clrmac(&mut self) -> u64 {
        self.mac.set_value(0);
        1
    }

    /// RTE
    ///
    /// Pops PC then SR from the stack and branches to the popped PC after
    /// the delay slot. The new SR is in effect for the slot instruction.
    pub(in crate::core::cpu) fn op_rte<const CACHE: bool>(&mut self, bus: &mut dyn Bus) -> u64 {
        let sp = self.r[15];
        let target = self.mem_read_long::<CACHE>(bus, sp);
        let sr = self.mem_read_long::<CACHE>(bus, sp.wrapping_add(4));
        self.r[15] = sp.wrapping_add(8);
        self.sr.set_bits(sr);

        self.setup_delay_slot(target);
        self.advance_pc::<false>();
        // A lowered mask may unblock a pending interrupt
        self.recalc_interrupts();
        4
    }

    /// SLEEP
    ///
    /// PC stays on the SLEEP instruction until an interrupt is accepted.
    pub(in crate::core::cpu) fn op_sleep(&mut self) -> u64 {
        if !self.sleeping {
            log::trace!(
                "[{}] Entering sleep at PC=0x{:08X}",
                self.config.role.tag(),
                self.pc
            );
        }
        self.sleeping = true;
        3
    }

    /// TRAPA #imm
    ///
    /// Pushes SR and the address of the next instruction, then jumps through
    /// vector `imm`.
    pub(in crate::core::cpu) fn op_trapa<const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let return_pc = self.pc.wrapping_add(2);
        self.enter_exception::<DEBUG, CACHE>(bus, args.dispimm as u8, return_pc);
        8
    }

    // LDC / LDS

    pub(in crate::core::cpu) fn op_ldc_sr(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_bits(self.reg(args.rm));
        self.recalc_interrupts();
        1
    }

    pub(in crate::core::cpu) fn op_ldc_gbr(&mut self, args: DecodedArgs) -> u64 {
        self.gbr = self.reg(args.rm);
        1
    }

    pub(in crate::core::cpu) fn op_ldc_vbr(&mut self, args: DecodedArgs) -> u64 {
        self.vbr = self.reg(args.rm);
        1
    }

    /// Pop a long from @Rm+
    fn pop_long<const CACHE: bool>(&mut self, bus: &mut dyn Bus, rm: u8) -> u32 {
        let address = self.reg(rm);
        let value = self.mem_read_long::<CACHE>(bus, address);
        self.set_reg(rm, address.wrapping_add(4));
        value
    }

    /// LDC.L @Rm+,SR
    pub(in crate::core::cpu) fn op_ldc_l_sr<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let value = self.pop_long::<CACHE>(bus, args.rm);
        self.sr.set_bits(value);
        self.recalc_interrupts();
        3
    }

    pub(in crate::core::cpu) fn op_ldc_l_gbr<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        self.gbr = self.pop_long::<CACHE>(bus, args.rm);
        3
    }

    pub(in crate::core::cpu) fn op_ldc_l_vbr<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        self.vbr = self.pop_long::<CACHE>(bus, args.rm);
        3
    }

    pub(in crate::core::cpu) fn op_lds_mach(&mut self, args: DecodedArgs) -> u64 {
        self.mac.set_high(self.reg(args.rm));
        1
    }

    pub(in crate::core::cpu) fn op_lds_macl(&mut self, args: DecodedArgs) -> u64 {
        self.mac.set_low(self.reg(args.rm));
        1
    }

    pub(in crate::core::cpu) fn op_lds_pr(&mut self, args: DecodedArgs) -> u64 {
        self.pr = self.reg(args.rm);
        1
    }

    pub(in crate::core::cpu) fn op_lds_l_mach<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let value = self.pop_long::<CACHE>(bus, args.rm);
        self.mac.set_high(value);
        1
    }

    pub(in crate::core::cpu) fn op_lds_l_macl<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let value = self.pop_long::<CACHE>(bus, args.rm);
        self.mac.set_low(value);
        1
    }

    pub(in crate::core::cpu) fn op_lds_l_pr<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        self.pr = self.pop_long::<CACHE>(bus, args.rm);
        1
    }

    // STC / STS

    /// STC/STS to Rn
    pub(in crate::core::cpu) fn op_store_reg(&mut self, args: DecodedArgs, value: u32) -> u64 {
        self.set_reg(args.rn, value);
        1
    }

    /// Push a long to @-Rn
    fn push_long<const CACHE: bool>(&mut self, bus: &mut dyn Bus, rn: u8, value: u32) {
        let address = self.reg(rn).wrapping_sub(4);
        self.mem_write_long::<CACHE>(bus, address, value);
        self.set_reg(rn, address);
    }

    /// STC.L SR/GBR/VBR,@-Rn
    pub(in crate::core::cpu) fn op_stc_l<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
        value: u32,
    ) -> u64 {
        self.push_long::<CACHE>(bus, args.rn, value);
        2
    }

    /// STS.L MACH/MACL/PR,@-Rn
    pub(in crate::core::cpu) fn op_sts_l<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
        value: u32,
    ) -> u64 {
        self.push_long::<CACHE>(bus, args.rn, value);
        1
    }
}
