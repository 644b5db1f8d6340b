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
    // === Shift and Rotate Instructions ===

    /// ROTL Rn: T = MSB, rotate left by one
    pub(in crate::core::cpu) fn op_rotl(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        self.sr.set_t(value & 0x8000_0000 != 0);
        self.set_reg(args.rn, value.rotate_left(1));
        1
    }

    /// ROTR Rn: T = LSB, rotate right by one
    pub(in crate::core::cpu) fn op_rotr(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        self.sr.set_t(value & 1 != 0);
        self.set_reg(args.rn, value.rotate_right(1));
        1
    }

    /// ROTCL Rn: rotate left through T
    pub(in crate::core::cpu) fn op_rotcl(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        let carry_in = self.sr.t() as u32;
        self.sr.set_t(value & 0x8000_0000 != 0);
        self.set_reg(args.rn, (value << 1) | carry_in);
        1
    }

    /// ROTCR Rn: rotate right through T
    pub(in crate::core::cpu) fn op_rotcr(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        let carry_in = (self.sr.t() as u32) << 31;
        self.sr.set_t(value & 1 != 0);
        self.set_reg(args.rn, (value >> 1) | carry_in);
        1
    }

    /// SHLL Rn / SHAL Rn
    pub(in crate::core::cpu) fn op_shll(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        self.sr.set_t(value & 0x8000_0000 != 0);
        self.set_reg(args.rn, value << 1);
        1
    }

    /// SHAR Rn: arithmetic shift right, T = LSB
    pub(in crate::core::cpu) fn op_shar(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        self.sr.set_t(value & 1 != 0);
        self.set_reg(args.rn, ((value as i32) >> 1) as u32);
        1
    }

    /// SHLR Rn: logical shift right, T = LSB
    pub(in crate::core::cpu) fn op_shlr(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rn);
        self.sr.set_t(value & 1 != 0);
        self.set_reg(args.rn, value >> 1);
        1
    }

    /// SHLL2 / SHLL8 / SHLL16 (T unchanged)
    pub(in crate::core::cpu) fn op_shift_left(&mut self, args: DecodedArgs, amount: u32) -> u64 {
        self.set_reg(args.rn, self.reg(args.rn) << amount);
        1
    }

    /// SHLR2 / SHLR8 / SHLR16 (T unchanged)
    pub(in crate::core::cpu) fn op_shift_right(&mut self, args: DecodedArgs, amount: u32) -> u64 {
        self.set_reg(args.rn, self.reg(args.rn) >> amount);
        1
    }
}
