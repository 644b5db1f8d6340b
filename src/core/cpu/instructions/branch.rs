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

impl Sh2 {
    // === Branch Instructions ===
    //
    // Targets are relative to the address of the branch plus 4. Delayed
    // branches arm the slot and step onto the slot instruction; the target
    // is committed once the slot instruction finishes.

    #[inline(always)]
    fn branch_target(&self, displacement: u32) -> u32 {
        self.pc.wrapping_add(4).wrapping_add(displacement)
    }

    #[inline(always)]
    fn delayed_branch(&mut self, target: u32) {
        self.setup_delay_slot(target);
        self.advance_pc::<false>();
    }

    /// BF disp
    ///
    /// Operation: if T == 0 then PC = PC + 4 + disp (no delay slot)
    pub(in crate::core::cpu) fn op_bf(&mut self, args: DecodedArgs) -> u64 {
        if !self.sr.t() {
            self.pc = self.branch_target(args.dispimm);
            3
        } else {
            self.advance_pc::<false>();
            1
        }
    }

    /// BF/S disp (delayed)
    pub(in crate::core::cpu) fn op_bfs(&mut self, args: DecodedArgs) -> u64 {
        if !self.sr.t() {
            let target = self.branch_target(args.dispimm);
            self.delayed_branch(target);
            2
        } else {
            self.advance_pc::<false>();
            1
        }
    }

    /// BT disp
    ///
    /// Operation: if T == 1 then PC = PC + 4 + disp (no delay slot)
    pub(in crate::core::cpu) fn op_bt(&mut self, args: DecodedArgs) -> u64 {
        if self.sr.t() {
            self.pc = self.branch_target(args.dispimm);
            3
        } else {
            self.advance_pc::<false>();
            1
        }
    }

    /// BT/S disp (delayed)
    pub(in crate::core::cpu) fn op_bts(&mut self, args: DecodedArgs) -> u64 {
        if self.sr.t() {
            let target = self.branch_target(args.dispimm);
            self.delayed_branch(target);
            2
        } else {
            self.advance_pc::<false>();
            1
        }
    }

    /// BRA disp
    pub(in crate::core::cpu) fn op_bra(&mut self, args: DecodedArgs) -> u64 {
        let target = self.branch_target(args.dispimm);
        self.delayed_branch(target);
        2
    }

    /// BRAF Rm
    pub(in crate::core::cpu) fn op_braf(&mut self, args: DecodedArgs) -> u64 {
        let target = self.branch_target(self.reg(args.rm));
        self.delayed_branch(target);
        2
    }

    /// BSR disp
    ///
    /// Operation: PR = PC + 4, PC = PC + 4 + disp (delayed)
    pub(in crate::core::cpu) fn op_bsr(&mut self, args: DecodedArgs) -> u64 {
        self.pr = self.pc.wrapping_add(4);
        let target = self.branch_target(args.dispimm);
        self.delayed_branch(target);
        2
    }

    /// BSRF Rm
    pub(in crate::core::cpu) fn op_bsrf(&mut self, args: DecodedArgs) -> u64 {
        self.pr = self.pc.wrapping_add(4);
        let target = self.branch_target(self.reg(args.rm));
        self.delayed_branch(target);
        2
    }

    /// JMP @Rm
    pub(in crate::core::cpu) fn op_jmp(&mut self, args: DecodedArgs) -> u64 {
        let target = self.reg(args.rm);
        self.delayed_branch(target);
        2
    }

    /// JSR @Rm
    pub(in crate::core::cpu) fn op_jsr(&mut self, args: DecodedArgs) -> u64 {
        self.pr = self.pc.wrapping_add(4);
        let target = self.reg(args.rm);
        self.delayed_branch(target);
        2
    }

    /// RTS
    pub(in crate::core::cpu) fn op_rts(&mut self) -> u64 {
        let target = self.pr;
        self.delayed_branch(target);
        2
    }
}
