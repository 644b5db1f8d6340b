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

/// 48-bit saturation bounds for MAC.L with S set
const MAC48_MAX: i64 = 0x0000_7FFF_FFFF_FFFF;
const MAC48_MIN: i64 = -0x0000_8000_0000_0000;

impl Sh2 {
    // === Multiply Instructions ===
    //
    // Multiplications finish immediately; their results are visible to the
    // next instruction.

    /// DMULS.L Rm,Rn
    ///
    /// Operation: MACH:MACL = (i64)Rn * (i64)Rm
    pub(in crate::core::cpu) fn op_dmuls_l(&mut self, args: DecodedArgs) -> u64 {
        let product = (self.reg(args.rn) as i32 as i64) * (self.reg(args.rm) as i32 as i64);
        self.mac.set_value(product as u64);
        2
    }

    /// DMULU.L Rm,Rn
    ///
    /// Operation: MACH:MACL = (u64)Rn * (u64)Rm
    pub(in crate::core::cpu) fn op_dmulu_l(&mut self, args: DecodedArgs) -> u64 {
        let product = (self.reg(args.rn) as u64) * (self.reg(args.rm) as u64);
        self.mac.set_value(product);
        2
    }

    /// MUL.L Rm,Rn: MACL = Rn * Rm
    pub(in crate::core::cpu) fn op_mul_l(&mut self, args: DecodedArgs) -> u64 {
        let product = self.reg(args.rn).wrapping_mul(self.reg(args.rm));
        self.mac.set_low(product);
        2
    }

    /// MULS.W Rm,Rn: signed 16x16 into MACL
    pub(in crate::core::cpu) fn op_muls_w(&mut self, args: DecodedArgs) -> u64 {
        let a = self.reg(args.rn) as u16 as i16 as i32;
        let b = self.reg(args.rm) as u16 as i16 as i32;
        self.mac.set_low(a.wrapping_mul(b) as u32);
        1
    }

    /// MULU.W Rm,Rn: unsigned 16x16 into MACL
    pub(in crate::core::cpu) fn op_mulu_w(&mut self, args: DecodedArgs) -> u64 {
        let a = self.reg(args.rn) & 0xFFFF;
        let b = self.reg(args.rm) & 0xFFFF;
        self.mac.set_low(a * b);
        1
    }

    /// MAC.W @Rm+,@Rn+
    ///
    /// Multiplies two signed words and accumulates into MAC. With S set the
    /// result saturates to 32 bits in MACL and MACH is left unchanged;
    /// otherwise the full 64-bit MAC wraps.
    pub(in crate::core::cpu) fn op_mac_w<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address_n = self.reg(args.rn);
        let a = self.mem_read_word::<CACHE>(bus, address_n) as i16 as i64;
        self.set_reg(args.rn, address_n.wrapping_add(2));

        let address_m = self.reg(args.rm);
        let b = self.mem_read_word::<CACHE>(bus, address_m) as i16 as i64;
        self.set_reg(args.rm, address_m.wrapping_add(2));

        let product = a * b;
        if self.sr.s() {
            let acc = self.mac.low() as i32 as i64;
            let result = (acc + product).clamp(i32::MIN as i64, i32::MAX as i64);
            self.mac.set_low(result as u32);
        } else {
            let result = (self.mac.value() as i64).wrapping_add(product);
            self.mac.set_value(result as u64);
        }
        2
    }

    /// MAC.L @Rm+,@Rn+
    ///
    /// Multiplies two signed longs and accumulates into MAC. With S set the
    /// result saturates to 48 bits.
    pub(in crate::core::cpu) fn op_mac_l<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address_n = self.reg(args.rn);
        let a = self.mem_read_long::<CACHE>(bus, address_n) as i32 as i64;
        self.set_reg(args.rn, address_n.wrapping_add(4));

        let address_m = self.reg(args.rm);
        let b = self.mem_read_long::<CACHE>(bus, address_m) as i32 as i64;
        self.set_reg(args.rm, address_m.wrapping_add(4));

        let product = a * b;
        if self.sr.s() {
            let acc = ((self.mac.value() as i64) << 16) >> 16;
            let result = acc.saturating_add(product).clamp(MAC48_MIN, MAC48_MAX);
            self.mac.set_value(result as u64);
        } else {
            let result = (self.mac.value() as i64).wrapping_add(product);
            self.mac.set_value(result as u64);
        }
        2
    }
}
