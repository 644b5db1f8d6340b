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

//! SH-2 instruction implementations
//!
//! Handlers are grouped by instruction class. Each returns the cycles it
//! consumed. Handlers that manage PC themselves (branches, RTE, TRAPA, SLEEP
//! and illegal instructions) return from [`Sh2::execute`] directly; every
//! other handler has PC committed afterwards by [`Sh2::advance_pc`].

use super::{OpcodeType, Sh2};
use crate::core::memory::Bus;

mod arithmetic;
mod branch;
mod logical;
mod multiply;
mod shift;
mod system;
mod transfer;

impl Sh2 {
    /// Execute one decoded instruction
    ///
    /// `DELAY` selects the delay-slot decode table and commits the pending
    /// branch target once the instruction completes.
    pub(super) fn execute<const DEBUG: bool, const CACHE: bool, const DELAY: bool>(
        &mut self,
        bus: &mut dyn Bus,
        instruction: u16,
    ) -> u64 {
        if DEBUG {
            let pc = self.pc;
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.execute(pc, instruction, DELAY);
            }
        }

        let entry = self.decode_table.entry::<DELAY>(instruction);
        let args = entry.args;

        use OpcodeType::*;
        let cycles = match entry.opcode {
            // Data transfer
            MovI => self.op_mov_imm(args),
            MovWPc => self.op_mov_w_pc::<CACHE>(bus, args),
            MovLPc => self.op_mov_l_pc::<CACHE>(bus, args),
            MovR => self.op_mov(args),
            MovBStore => self.op_mov_store::<u8, CACHE>(bus, args),
            MovWStore => self.op_mov_store::<u16, CACHE>(bus, args),
            MovLStore => self.op_mov_store::<u32, CACHE>(bus, args),
            MovBLoad => self.op_mov_load::<u8, CACHE>(bus, args),
            MovWLoad => self.op_mov_load::<u16, CACHE>(bus, args),
            MovLLoad => self.op_mov_load::<u32, CACHE>(bus, args),
            MovBStorePreDec => self.op_mov_store_predec::<u8, CACHE>(bus, args),
            MovWStorePreDec => self.op_mov_store_predec::<u16, CACHE>(bus, args),
            MovLStorePreDec => self.op_mov_store_predec::<u32, CACHE>(bus, args),
            MovBLoadPostInc => self.op_mov_load_postinc::<u8, CACHE>(bus, args),
            MovWLoadPostInc => self.op_mov_load_postinc::<u16, CACHE>(bus, args),
            MovLLoadPostInc => self.op_mov_load_postinc::<u32, CACHE>(bus, args),
            MovBStoreDisp => self.op_mov_store_disp_r0::<u8, CACHE>(bus, args),
            MovWStoreDisp => self.op_mov_store_disp_r0::<u16, CACHE>(bus, args),
            MovLStoreDisp => self.op_mov_l_store_disp::<CACHE>(bus, args),
            MovBLoadDisp => self.op_mov_load_disp_r0::<u8, CACHE>(bus, args),
            MovWLoadDisp => self.op_mov_load_disp_r0::<u16, CACHE>(bus, args),
            MovLLoadDisp => self.op_mov_l_load_disp::<CACHE>(bus, args),
            MovBStoreR0 => self.op_mov_store_indexed::<u8, CACHE>(bus, args),
            MovWStoreR0 => self.op_mov_store_indexed::<u16, CACHE>(bus, args),
            MovLStoreR0 => self.op_mov_store_indexed::<u32, CACHE>(bus, args),
            MovBLoadR0 => self.op_mov_load_indexed::<u8, CACHE>(bus, args),
            MovWLoadR0 => self.op_mov_load_indexed::<u16, CACHE>(bus, args),
            MovLLoadR0 => self.op_mov_load_indexed::<u32, CACHE>(bus, args),
            MovBStoreGbr => self.op_mov_store_gbr::<u8, CACHE>(bus, args),
            MovWStoreGbr => self.op_mov_store_gbr::<u16, CACHE>(bus, args),
            MovLStoreGbr => self.op_mov_store_gbr::<u32, CACHE>(bus, args),
            MovBLoadGbr => self.op_mov_load_gbr::<u8, CACHE>(bus, args),
            MovWLoadGbr => self.op_mov_load_gbr::<u16, CACHE>(bus, args),
            MovLLoadGbr => self.op_mov_load_gbr::<u32, CACHE>(bus, args),
            Mova => self.op_mova(args),
            Movt => self.op_movt(args),
            SwapB => self.op_swap_b(args),
            SwapW => self.op_swap_w(args),
            Xtrct => self.op_xtrct(args),

            // Arithmetic
            Add => self.op_add(args),
            AddI => self.op_add_imm(args),
            Addc => self.op_addc(args),
            Addv => self.op_addv(args),
            CmpEqI => self.op_cmp_eq_imm(args),
            CmpEq => self.op_cmp_eq(args),
            CmpHs => self.op_cmp_hs(args),
            CmpGe => self.op_cmp_ge(args),
            CmpHi => self.op_cmp_hi(args),
            CmpGt => self.op_cmp_gt(args),
            CmpPz => self.op_cmp_pz(args),
            CmpPl => self.op_cmp_pl(args),
            CmpStr => self.op_cmp_str(args),
            Div1 => self.op_div1(args),
            Div0S => self.op_div0s(args),
            Div0U => self.op_div0u(),
            Dt => self.op_dt(args),
            ExtsB => self.op_exts_b(args),
            ExtsW => self.op_exts_w(args),
            ExtuB => self.op_extu_b(args),
            ExtuW => self.op_extu_w(args),
            Neg => self.op_neg(args),
            Negc => self.op_negc(args),
            Sub => self.op_sub(args),
            Subc => self.op_subc(args),
            Subv => self.op_subv(args),

            // Multiply
            DmulsL => self.op_dmuls_l(args),
            DmuluL => self.op_dmulu_l(args),
            MacL => self.op_mac_l::<CACHE>(bus, args),
            MacW => self.op_mac_w::<CACHE>(bus, args),
            MulL => self.op_mul_l(args),
            MulsW => self.op_muls_w(args),
            MuluW => self.op_mulu_w(args),

            // Logic
            And => self.op_and(args),
            AndI => self.op_and_imm(args),
            AndB => self.op_gbr_rmw::<CACHE>(bus, args, |byte, imm| byte & imm),
            Not => self.op_not(args),
            Or => self.op_or(args),
            OrI => self.op_or_imm(args),
            OrB => self.op_gbr_rmw::<CACHE>(bus, args, |byte, imm| byte | imm),
            TasB => self.op_tas_b::<CACHE>(bus, args),
            Tst => self.op_tst(args),
            TstI => self.op_tst_imm(args),
            TstB => self.op_tst_b::<CACHE>(bus, args),
            Xor => self.op_xor(args),
            XorI => self.op_xor_imm(args),
            XorB => self.op_gbr_rmw::<CACHE>(bus, args, |byte, imm| byte ^ imm),

            // Shift and rotate
            Rotl => self.op_rotl(args),
            Rotr => self.op_rotr(args),
            Rotcl => self.op_rotcl(args),
            Rotcr => self.op_rotcr(args),
            Shal | Shll => self.op_shll(args),
            Shar => self.op_shar(args),
            Shlr => self.op_shlr(args),
            Shll2 => self.op_shift_left(args, 2),
            Shlr2 => self.op_shift_right(args, 2),
            Shll8 => self.op_shift_left(args, 8),
            Shlr8 => self.op_shift_right(args, 8),
            Shll16 => self.op_shift_left(args, 16),
            Shlr16 => self.op_shift_right(args, 16),

            // Branches manage PC themselves
            Bf => return self.op_bf(args),
            Bfs => return self.op_bfs(args),
            Bt => return self.op_bt(args),
            Bts => return self.op_bts(args),
            Bra => return self.op_bra(args),
            Braf => return self.op_braf(args),
            Bsr => return self.op_bsr(args),
            Bsrf => return self.op_bsrf(args),
            Jmp => return self.op_jmp(args),
            Jsr => return self.op_jsr(args),
            Rts => return self.op_rts(),

            // System control
            Clrt => self.op_clrt(),
            Clrmac => self.op_clrmac(),
            Sett => self.op_sett(),
            Nop => 1,
            Rte => return self.op_rte::<CACHE>(bus),
            Sleep => return self.op_sleep(),
            Trapa => return self.op_trapa::<DEBUG, CACHE>(bus, args),
            LdcSr => self.op_ldc_sr(args),
            LdcGbr => self.op_ldc_gbr(args),
            LdcVbr => self.op_ldc_vbr(args),
            LdcLSr => self.op_ldc_l_sr::<CACHE>(bus, args),
            LdcLGbr => self.op_ldc_l_gbr::<CACHE>(bus, args),
            LdcLVbr => self.op_ldc_l_vbr::<CACHE>(bus, args),
            LdsMach => self.op_lds_mach(args),
            LdsMacl => self.op_lds_macl(args),
            LdsPr => self.op_lds_pr(args),
            LdsLMach => self.op_lds_l_mach::<CACHE>(bus, args),
            LdsLMacl => self.op_lds_l_macl::<CACHE>(bus, args),
            LdsLPr => self.op_lds_l_pr::<CACHE>(bus, args),
            StcSr => self.op_store_reg(args, self.sr.bits()),
            StcGbr => self.op_store_reg(args, self.gbr),
            StcVbr => self.op_store_reg(args, self.vbr),
            StcLSr => self.op_stc_l::<CACHE>(bus, args, self.sr.bits()),
            StcLGbr => self.op_stc_l::<CACHE>(bus, args, self.gbr),
            StcLVbr => self.op_stc_l::<CACHE>(bus, args, self.vbr),
            StsMach => self.op_store_reg(args, self.mac.high()),
            StsMacl => self.op_store_reg(args, self.mac.low()),
            StsPr => self.op_store_reg(args, self.pr),
            StsLMach => self.op_sts_l::<CACHE>(bus, args, self.mac.high()),
            StsLMacl => self.op_sts_l::<CACHE>(bus, args, self.mac.low()),
            StsLPr => self.op_sts_l::<CACHE>(bus, args, self.pr),

            Illegal => return self.illegal_instruction::<DEBUG, CACHE>(bus, instruction),
            IllegalSlot => return self.illegal_slot_instruction::<DEBUG, CACHE>(bus, instruction),
        };

        self.advance_pc::<DELAY>();
        cycles
    }
}
