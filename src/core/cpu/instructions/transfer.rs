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
use crate::core::memory::{Bus, MemPrimitive};

/// Sign-extend a loaded value to 32 bits
#[inline(always)]
fn sign_extend<T: MemPrimitive>(value: T) -> u32 {
    match T::SIZE {
        1 => value.to_u32() as u8 as i8 as i32 as u32,
        2 => value.to_u32() as u16 as i16 as i32 as u32,
        _ => value.to_u32(),
    }
}

impl Sh2 {
    // === Data Transfer Instructions ===

    /// MOV #imm,Rn
    ///
    /// Operation: Rn = sign_extend(imm)
    pub(in crate::core::cpu) fn op_mov_imm(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, args.dispimm);
        1
    }

    /// MOV.W @(disp,PC),Rn
    ///
    /// The effective address is PC + 4 + disp.
    pub(in crate::core::cpu) fn op_mov_w_pc<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.pc.wrapping_add(4).wrapping_add(args.dispimm);
        let value = self.mem_read_word::<CACHE>(bus, address);
        self.set_reg(args.rn, sign_extend(value));
        1
    }

    /// MOV.L @(disp,PC),Rn
    ///
    /// The effective address is (PC & !3) + 4 + disp.
    pub(in crate::core::cpu) fn op_mov_l_pc<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = (self.pc & !3).wrapping_add(4).wrapping_add(args.dispimm);
        let value = self.mem_read_long::<CACHE>(bus, address);
        self.set_reg(args.rn, value);
        1
    }

    /// MOV Rm,Rn
    pub(in crate::core::cpu) fn op_mov(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, self.reg(args.rm));
        1
    }

    /// MOV.x Rm,@Rn
    pub(in crate::core::cpu) fn op_mov_store<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rn);
        let value = T::from_u32(self.reg(args.rm));
        self.mem_write::<T, false, CACHE>(bus, address, value);
        1
    }

    /// MOV.x @Rm,Rn
    pub(in crate::core::cpu) fn op_mov_load<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rm);
        let value = self.mem_read::<T, false, false, CACHE>(bus, address);
        self.set_reg(args.rn, sign_extend(value));
        1
    }

    /// MOV.x Rm,@-Rn
    ///
    /// Stores the value Rm held before the decrement, even when n == m.
    pub(in crate::core::cpu) fn op_mov_store_predec<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let value = T::from_u32(self.reg(args.rm));
        let address = self.reg(args.rn).wrapping_sub(T::SIZE);
        self.mem_write::<T, false, CACHE>(bus, address, value);
        self.set_reg(args.rn, address);
        1
    }

    /// MOV.x @Rm+,Rn
    ///
    /// When n == m the loaded value wins over the increment.
    pub(in crate::core::cpu) fn op_mov_load_postinc<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rm);
        let value = self.mem_read::<T, false, false, CACHE>(bus, address);
        if args.rn != args.rm {
            self.set_reg(args.rm, address.wrapping_add(T::SIZE));
        }
        self.set_reg(args.rn, sign_extend(value));
        1
    }

    /// MOV.B/W R0,@(disp,Rn)
    pub(in crate::core::cpu) fn op_mov_store_disp_r0<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rn).wrapping_add(args.dispimm);
        let value = T::from_u32(self.r[0]);
        self.mem_write::<T, false, CACHE>(bus, address, value);
        1
    }

    /// MOV.B/W @(disp,Rm),R0
    pub(in crate::core::cpu) fn op_mov_load_disp_r0<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rm).wrapping_add(args.dispimm);
        let value = self.mem_read::<T, false, false, CACHE>(bus, address);
        self.r[0] = sign_extend(value);
        1
    }

    /// MOV.L Rm,@(disp,Rn)
    pub(in crate::core::cpu) fn op_mov_l_store_disp<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rn).wrapping_add(args.dispimm);
        self.mem_write_long::<CACHE>(bus, address, self.reg(args.rm));
        1
    }

    /// MOV.L @(disp,Rm),Rn
    pub(in crate::core::cpu) fn op_mov_l_load_disp<const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rm).wrapping_add(args.dispimm);
        let value = self.mem_read_long::<CACHE>(bus, address);
        self.set_reg(args.rn, value);
        1
    }

    /// MOV.x Rm,@(R0,Rn)
    pub(in crate::core::cpu) fn op_mov_store_indexed<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rn).wrapping_add(self.r[0]);
        let value = T::from_u32(self.reg(args.rm));
        self.mem_write::<T, false, CACHE>(bus, address, value);
        1
    }

    /// MOV.x @(R0,Rm),Rn
    pub(in crate::core::cpu) fn op_mov_load_indexed<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.reg(args.rm).wrapping_add(self.r[0]);
        let value = self.mem_read::<T, false, false, CACHE>(bus, address);
        self.set_reg(args.rn, sign_extend(value));
        1
    }

    /// MOV.x R0,@(disp,GBR)
    pub(in crate::core::cpu) fn op_mov_store_gbr<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.gbr.wrapping_add(args.dispimm);
        let value = T::from_u32(self.r[0]);
        self.mem_write::<T, false, CACHE>(bus, address, value);
        1
    }

    /// MOV.x @(disp,GBR),R0
    pub(in crate::core::cpu) fn op_mov_load_gbr<T: MemPrimitive, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
        args: DecodedArgs,
    ) -> u64 {
        let address = self.gbr.wrapping_add(args.dispimm);
        let value = self.mem_read::<T, false, false, CACHE>(bus, address);
        self.r[0] = sign_extend(value);
        1
    }

    /// MOVA @(disp,PC),R0
    ///
    /// Operation: R0 = (PC & !3) + 4 + disp
    pub(in crate::core::cpu) fn op_mova(&mut self, args: DecodedArgs) -> u64 {
        self.r[0] = (self.pc & !3).wrapping_add(4).wrapping_add(args.dispimm);
        1
    }

    /// MOVT Rn
    pub(in crate::core::cpu) fn op_movt(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, self.sr.t() as u32);
        1
    }

    /// SWAP.B Rm,Rn: swap the two low bytes
    pub(in crate::core::cpu) fn op_swap_b(&mut self, args: DecodedArgs) -> u64 {
        let value = self.reg(args.rm);
        let swapped = (value & 0xFFFF_0000) | ((value & 0xFF) << 8) | ((value >> 8) & 0xFF);
        self.set_reg(args.rn, swapped);
        1
    }

    /// SWAP.W Rm,Rn: swap the two halves
    pub(in crate::core::cpu) fn op_swap_w(&mut self, args: DecodedArgs) -> u64 {
        self.set_reg(args.rn, self.reg(args.rm).rotate_left(16));
        1
    }

    /// XTRCT Rm,Rn: middle 32 bits of Rm:Rn
    pub(in crate::core::cpu) fn op_xtrct(&mut self, args: DecodedArgs) -> u64 {
        let value = (self.reg(args.rn) >> 16) | (self.reg(args.rm) << 16);
        self.set_reg(args.rn, value);
        1
    }
}
