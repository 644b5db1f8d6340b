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
    // === Logical Instructions ===

    pub(in crate::core::cpu) fn op_and(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn) & self.reg(args.rm);
        self.set_reg(args.rn, result);
        1
    }

    /// AND #imm,R0
    pub(in crate::core::cpu) fn op_and_imm(&mut self, args: DecodedArgs) -> u64 {
        self.r[0] &= args.dispimm;
        1
    }

    pub(in crate::core::cpu) fn op_not(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, !self.reg(args.rm));
        1
    }

    pub(in crate::core::cpu) fn op_or(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn) | self.reg(args.rm);
        self.set_reg(args.rn, result);
        1
    }

    /// OR #imm,R0
    pub(in crate::core::cpu) fn op_or_imm(&mut self, args: DecodedArgs) -> u64 {
        self.r[0] |= args.dispimm;
        1
    }

    pub(in crate::core::cpu) fn op_xor(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn) ^ self.reg(args.rm);
        self.set_reg(args.rn, result);
        1
    }

    /// XOR #imm,R0
    pub(in crate::core::cpu) fn op_xor_imm(&mut self, args: DecodedArgs) -> u64 {
        self.r[0] ^= args.dispimm;
        1
    }

    /// TST Rm,Rn: T = (Rn & Rm) == 0
    pub(in crate::core::cpu) fn op_tst(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.reg(args.rn) & self.reg(args.rm) == 0);
        1
    }

    /// TST #imm,R0
    pub(in crate::core::cpu) fn op_tst_imm(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.r[0] & args.dispimm == 0);
        1
    }

    /// TST.B #imm,@(R0,GBR)
    pub(in crate::core::cpu) fn op_tst_b<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.gbr.wrapping_add(self.r[0]);
        let value = self.mem_read_byte::<CACHE>(bus, address);
        self.sr.set_t(value as u32 & args.dispimm == 0);
        3
    }

    /// AND.B / OR.B / XOR.B #imm,@(R0,GBR)
    ///
    /// Read-modify-write of one byte with `op(byte, imm)`.
    pub(in crate::core::cpu) fn op_gbr_rmw<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
        op: impl Fn(u8, u8) -> u8,
    ) -> u64 {
        let address = self.gbr.wrapping_add(self.r[0]);
        let value = self.mem_read_byte::<CACHE>(bus, address);
        self.mem_write_byte::<CACHE>(bus, address, op(value, args.dispimm as u8));
        3
    }

    /// TAS.B @Rn
    ///
    /// Tests the byte for zero and sets its bit 7. The bus lock of the real
    /// read-modify-write cycle is not modelled.
    pub(in crate::core::cpu) fn op_tas_b<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rn);
        let value = self.mem_read_byte::<CACHE>(bus, address);
        self.sr.set_t(value == 0);
        self.mem_write_byte::<CACHE>(bus, address, value | 0x80);
        4
    }
}
