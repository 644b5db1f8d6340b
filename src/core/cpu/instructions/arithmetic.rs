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
    // === Arithmetic Instructions ===

    /// ADD Rm,Rn
    pub(in crate::core::cpu) fn op_add(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn).wrapping_add(self.reg(args.rm));
        self.set_reg(args.rn, result);
        1
    }

    /// ADD #imm,Rn
    pub(in crate::core::cpu) fn op_add_imm(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn).wrapping_add(args.dispimm);
        self.set_reg(args.rn, result);
        1
    }

    /// ADDC Rm,Rn
    ///
    /// Operation: Rn = Rn + Rm + T, T = carry
    pub(in crate::core::cpu) fn op_addc(&mut self, args: DecodedArgs) -> u64 {
        let (partial, carry1) = self.reg(args.rn).overflowing_add(self.reg(args.rm));
        let (result, carry2) = partial.overflowing_add(self.sr.t() as u32);
        self.set_reg(args.rn, result);
        self.sr.set_t(carry1 || carry2);
        1
    }

    /// ADDV Rm,Rn
    ///
    /// Operation: Rn = Rn + Rm, T = signed overflow
    pub(in crate::core::cpu) fn op_addv(&mut self, args: DecodedArgs) -> u64 {
        let (result, overflow) =
            (self.reg(args.rn) as i32).overflowing_add(self.reg(args.rm) as i32);
        self.set_reg(args.rn, result as u32);
        self.sr.set_t(overflow);
        1
    }

    /// CMP/EQ #imm,R0
    pub(in crate::core::cpu) fn op_cmp_eq_imm(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.r[0] == args.dispimm);
        1
    }

    /// CMP/EQ Rm,Rn
    pub(in crate::core::cpu) fn op_cmp_eq(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.reg(args.rn) == self.reg(args.rm));
        1
    }

    /// CMP/HS Rm,Rn: unsigned Rn >= Rm
    pub(in crate::core::cpu) fn op_cmp_hs(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.reg(args.rn) >= self.reg(args.rm));
        1
    }

    /// CMP/GE Rm,Rn: signed Rn >= Rm
    pub(in crate::core::cpu) fn op_cmp_ge(&mut self, args: DecodedArgs) -> u64 {
        self.sr
            .set_t(self.reg(args.rn) as i32 >= self.reg(args.rm) as i32);
        1
    }

    /// CMP/HI Rm,Rn: unsigned Rn > Rm
    pub(in crate::core::cpu) fn op_cmp_hi(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.reg(args.rn) > self.reg(args.rm));
        1
    }

    /// CMP/GT Rm,Rn: signed Rn > Rm
    pub(in crate::core::cpu) fn op_cmp_gt(&mut self, args: DecodedArgs) -> u64 {
        self.sr
            .set_t(self.reg(args.rn) as i32 > self.reg(args.rm) as i32);
        1
    }

    /// CMP/PZ Rn: Rn >= 0
    pub(in crate::core::cpu) fn op_cmp_pz(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.reg(args.rn) as i32 >= 0);
        1
    }

    /// CMP/PL Rn: Rn > 0
    pub(in crate::core::cpu) fn op_cmp_pl(&mut self, args: DecodedArgs) -> u64 {
        self.sr.set_t(self.reg(args.rn) as i32 > 0);
        1
    }

    /// CMP/STR Rm,Rn
    ///
    /// T is set when any byte position holds equal bytes in Rn and Rm.
    pub(in crate::core::cpu) fn op_cmp_str(&mut self, args: DecodedArgs) -> u64 {
        let diff = self.reg(args.rn) ^ self.reg(args.rm);
        let any_equal = diff.to_be_bytes().contains(&0);
        self.sr.set_t(any_equal);
        1
    }

    /// DIV1 Rm,Rn
    ///
    /// One step of non-restoring division. Shifts T into Rn, then adds or
    /// subtracts Rm depending on whether Q and M differ.
    pub(in crate::core::cpu) fn op_div1(&mut self, args: DecodedArgs) -> u64 {
        let old_q = self.sr.q();
        let divisor = self.reg(args.rm);
        let dividend = self.reg(args.rn);

        let msb = dividend & 0x8000_0000 != 0;
        let shifted = (dividend << 1) | self.sr.t() as u32;

        let (result, carry) = if old_q == self.sr.m() {
            shifted.overflowing_sub(divisor)
        } else {
            shifted.overflowing_add(divisor)
        };
        self.set_reg(args.rn, result);

        let q = msb ^ carry ^ self.sr.m();
        self.sr.set_q(q);
        self.sr.set_t(q == self.sr.m());
        1
    }

    /// DIV0S Rm,Rn: initialise signed division
    pub(in crate::core::cpu) fn op_div0s(&mut self, args: DecodedArgs) -> u64 {
        let q = self.reg(args.rn) & 0x8000_0000 != 0;
        let m = self.reg(args.rm) & 0x8000_0000 != 0;
        self.sr.set_q(q);
        self.sr.set_m(m);
        self.sr.set_t(q != m);
        1
    }

    /// DIV0U: initialise unsigned division
    pub(in crate::core::cpu) fn op_div0u(&mut self) -> u64 {
        self.sr.set_q(false);
        self.sr.set_m(false);
        self.sr.set_t(false);
        1
    }

    /// DT Rn: decrement and test for zero
    pub(in crate::core::cpu) fn op_dt(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn).wrapping_sub(1);
        self.set_reg(args.rn, result);
        self.sr.set_t(result == 0);
        1
    }

    pub(in crate::core::cpu) fn op_exts_b(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rm) as u8 as i8 as i32 as u32;
        self.set_reg(args.rn, value);
        1
    }

    pub(in crate::core::cpu) fn op_exts_w(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rm) as u16 as i16 as i32 as u32;
        self.set_reg(args.rn, value);
        1
    }

    pub(in crate::core::cpu) fn op_extu_b(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, self.reg(args.rm) & 0xFF);
        1
    }

    pub(in crate::core::cpu) fn op_extu_w(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, self.reg(args.rm) & 0xFFFF);
        1
    }

    /// NEG Rm,Rn
    pub(in crate::core::cpu) fn op_neg(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, self.reg(args.rm).wrapping_neg());
        1
    }

    /// NEGC Rm,Rn
    ///
    /// Operation: Rn = 0 - Rm - T, T = borrow
    pub(in crate::core::cpu) fn op_negc(&mut self, args: DecodedArgs) -> u64 {
        let (partial, borrow1) = 0u32.overflowing_sub(self.reg(args.rm));
        let (result, borrow2) = partial.overflowing_sub(self.sr.t() as u32);
        self.set_reg(args.rn, result);
        self.sr.set_t(borrow1 || borrow2);
        1
    }

    /// SUB Rm,Rn
    pub(in crate::core::cpu) fn op_sub(&mut self, args: DecodedArgs) -> u64 {
        let result = self.reg(args.rn).wrapping_sub(self.reg(args.rm));
        self.set_reg(args.rn, result);
        1
    }

    /// SUBC Rm,Rn
    ///
    /// Operation: Rn = Rn - Rm - T, T = borrow
    pub(in crate::core::cpu) fn op_subc(&mut self, args: DecodedArgs) -> u64 {
        let (partial, borrow1) = self.reg(args.rn).overflowing_sub(self.reg(args.rm));
        let (result, borrow2) = partial.overflowing_sub(self.sr.t() as u32);
        self.set_reg(args.rn, result);
        self.sr.set_t(borrow1 || borrow2);
        1
    }

    /// SUBV Rm,Rn
    ///
    /// Operation: Rn = Rn - Rm, T = signed underflow
    pub(in crate::core::cpu) fn op_subv(&mut self, args: DecodedArgs) -> u64 {
        let (result, overflow) =
            (self.reg(args.rn) as i32).overflowing_sub(self.reg(args.rm) as i32);
        self.set_reg(args.rn, result as u32);
        self.sr.set_t(overflow);
        1
    }
}
