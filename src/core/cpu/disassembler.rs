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

//! SH-2 instruction disassembler for debugging
//!
//! Converts 16-bit instruction words to Hitachi assembler syntax.

use super::decode::{decode_instruction, OpcodeType};

/// Instruction disassembler
///
/// # Example
/// ```
/// use sh2_core::core::cpu::Disassembler;
///
/// assert_eq!(Disassembler::disassemble(0x0009, 0x0600_0000), "nop");
/// assert_eq!(Disassembler::disassemble(0x7505, 0x0600_0000), "add #5, r5");
/// assert_eq!(Disassembler::disassemble(0xA002, 0x0600_0000), "bra 0x06000008");
/// ```
pub struct Disassembler;

impl Disassembler {
    /// Disassemble a single instruction
    ///
    /// # Arguments
    ///
    /// * `instruction` - The 16-bit instruction word
    /// * `pc` - Address of the instruction (used for PC-relative operands)
    pub fn disassemble(instruction: u16, pc: u32) -> String {
        use OpcodeType::*;

        let entry = decode_instruction(instruction);
        let n = entry.args.rn;
        let m = entry.args.rm;
        let disp = entry.args.dispimm;
        let simm = disp as i32;
        let target = pc.wrapping_add(4).wrapping_add(disp);

        match entry.opcode {
            MovI => format!("mov #{}, r{}", simm, n),
            MovWPc => format!("mov.w @(0x{:08X}), r{}", target, n),
            MovLPc => format!(
                "mov.l @(0x{:08X}), r{}",
                (pc & !3).wrapping_add(4).wrapping_add(disp),
                n
            ),
            MovR => format!("mov r{}, r{}", m, n),
            MovBStore => format!("mov.b r{}, @r{}", m, n),
            MovWStore => format!("mov.w r{}, @r{}", m, n),
            MovLStore => format!("mov.l r{}, @r{}", m, n),
            MovBLoad => format!("mov.b @r{}, r{}", m, n),
            MovWLoad => format!("mov.w @r{}, r{}", m, n),
            MovLLoad => format!("mov.l @r{}, r{}", m, n),
            MovBStorePreDec => format!("mov.b r{}, @-r{}", m, n),
            MovWStorePreDec => format!("mov.w r{}, @-r{}", m, n),
            MovLStorePreDec => format!("mov.l r{}, @-r{}", m, n),
            MovBLoadPostInc => format!("mov.b @r{}+, r{}", m, n),
            MovWLoadPostInc => format!("mov.w @r{}+, r{}", m, n),
            MovLLoadPostInc => format!("mov.l @r{}+, r{}", m, n),
            MovBStoreDisp => format!("mov.b r0, @({}, r{})", disp, n),
            MovWStoreDisp => format!("mov.w r0, @({}, r{})", disp, n),
            MovLStoreDisp => format!("mov.l r{}, @({}, r{})", m, disp, n),
            MovBLoadDisp => format!("mov.b @({}, r{}), r0", disp, m),
            MovWLoadDisp => format!("mov.w @({}, r{}), r0", disp, m),
            MovLLoadDisp => format!("mov.l @({}, r{}), r{}", disp, m, n),
            MovBStoreR0 => format!("mov.b r{}, @(r0, r{})", m, n),
            MovWStoreR0 => format!("mov.w r{}, @(r0, r{})", m, n),
            MovLStoreR0 => format!("mov.l r{}, @(r0, r{})", m, n),
            MovBLoadR0 => format!("mov.b @(r0, r{}), r{}", m, n),
            MovWLoadR0 => format!("mov.w @(r0, r{}), r{}", m, n),
            MovLLoadR0 => format!("mov.l @(r0, r{}), r{}", m, n),
            MovBStoreGbr => format!("mov.b r0, @({}, gbr)", disp),
            MovWStoreGbr => format!("mov.w r0, @({}, gbr)", disp),
            MovLStoreGbr => format!("mov.l r0, @({}, gbr)", disp),
            MovBLoadGbr => format!("mov.b @({}, gbr), r0", disp),
            MovWLoadGbr => format!("mov.w @({}, gbr), r0", disp),
            MovLLoadGbr => format!("mov.l @({}, gbr), r0", disp),
            Mova => format!(
                "mova @(0x{:08X}), r0",
                (pc & !3).wrapping_add(4).wrapping_add(disp)
            ),
            Movt => format!("movt r{}", n),
            SwapB => format!("swap.b r{}, r{}", m, n),
            SwapW => format!("swap.w r{}, r{}", m, n),
            Xtrct => format!("xtrct r{}, r{}", m, n),

            Add => format!("add r{}, r{}", m, n),
            AddI => format!("add #{}, r{}", simm, n),
            Addc => format!("addc r{}, r{}", m, n),
            Addv => format!("addv r{}, r{}", m, n),
            CmpEqI => format!("cmp/eq #{}, r0", simm),
            CmpEq => format!("cmp/eq r{}, r{}", m, n),
            CmpHs => format!("cmp/hs r{}, r{}", m, n),
            CmpGe => format!("cmp/ge r{}, r{}", m, n),
            CmpHi => format!("cmp/hi r{}, r{}", m, n),
            CmpGt => format!("cmp/gt r{}, r{}", m, n),
            CmpPz => format!("cmp/pz r{}", n),
            CmpPl => format!("cmp/pl r{}", n),
            CmpStr => format!("cmp/str r{}, r{}", m, n),
            Div1 => format!("div1 r{}, r{}", m, n),
            Div0S => format!("div0s r{}, r{}", m, n),
            Div0U => "div0u".to_string(),
            Dt => format!("dt r{}", n),
            ExtsB => format!("exts.b r{}, r{}", m, n),
            ExtsW => format!("exts.w r{}, r{}", m, n),
            ExtuB => format!("extu.b r{}, r{}", m, n),
            ExtuW => format!("extu.w r{}, r{}", m, n),
            Neg => format!("neg r{}, r{}", m, n),
            Negc => format!("negc r{}, r{}", m, n),
            Sub => format!("sub r{}, r{}", m, n),
            Subc => format!("subc r{}, r{}", m, n),
            Subv => format!("subv r{}, r{}", m, n),

            DmulsL => format!("dmuls.l r{}, r{}", m, n),
            DmuluL => format!("dmulu.l r{}, r{}", m, n),
            MacL => format!("mac.l @r{}+, @r{}+", m, n),
            MacW => format!("mac.w @r{}+, @r{}+", m, n),
            MulL => format!("mul.l r{}, r{}", m, n),
            MulsW => format!("muls.w r{}, r{}", m, n),
            MuluW => format!("mulu.w r{}, r{}", m, n),

            And => format!("and r{}, r{}", m, n),
            AndI => format!("and #0x{:02X}, r0", disp),
            AndB => format!("and.b #0x{:02X}, @(r0, gbr)", disp),
            Not => format!("not r{}, r{}", m, n),
            Or => format!("or r{}, r{}", m, n),
            OrI => format!("or #0x{:02X}, r0", disp),
            OrB => format!("or.b #0x{:02X}, @(r0, gbr)", disp),
            TasB => format!("tas.b @r{}", n),
            Tst => format!("tst r{}, r{}", m, n),
            TstI => format!("tst #0x{:02X}, r0", disp),
            TstB => format!("tst.b #0x{:02X}, @(r0, gbr)", disp),
            Xor => format!("xor r{}, r{}", m, n),
            XorI => format!("xor #0x{:02X}, r0", disp),
            XorB => format!("xor.b #0x{:02X}, @(r0, gbr)", disp),

            Rotl => format!("rotl r{}", n),
            Rotr => format!("rotr r{}", n),
            Rotcl => format!("rotcl r{}", n),
            Rotcr => format!("rotcr r{}", n),
            Shal => format!("shal r{}", n),
            Shar => format!("shar r{}", n),
            Shll => format!("shll r{}", n),
            Shlr => format!("shlr r{}", n),
            Shll2 => format!("shll2 r{}", n),
            Shlr2 => format!("shlr2 r{}", n),
            Shll8 => format!("shll8 r{}", n),
            Shlr8 => format!("shlr8 r{}", n),
            Shll16 => format!("shll16 r{}", n),
            Shlr16 => format!("shlr16 r{}", n),

            Bf => format!("bf 0x{:08X}", target),
            Bfs => format!("bf/s 0x{:08X}", target),
            Bt => format!("bt 0x{:08X}", target),
            Bts => format!("bt/s 0x{:08X}", target),
            Bra => format!("bra 0x{:08X}", target),
            Braf => format!("braf r{}", m),
            Bsr => format!("bsr 0x{:08X}", target),
            Bsrf => format!("bsrf r{}", m),
            Jmp => format!("jmp @r{}", m),
            Jsr => format!("jsr @r{}", m),
            Rts => "rts".to_string(),

            Clrt => "clrt".to_string(),
            Clrmac => "clrmac".to_string(),
            Sett => "sett".to_string(),
            Nop => "nop".to_string(),
            Rte => "rte".to_string(),
            Sleep => "sleep".to_string(),
            Trapa => format!("trapa #0x{:02X}", disp),
            LdcSr => format!("ldc r{}, sr", m),
            LdcGbr => format!("ldc r{}, gbr", m),
            LdcVbr => format!("ldc r{}, vbr", m),
            LdcLSr => format!("ldc.l @r{}+, sr", m),
            LdcLGbr => format!("ldc.l @r{}+, gbr", m),
            LdcLVbr => format!("ldc.l @r{}+, vbr", m),
            LdsMach => format!("lds r{}, mach", m),
            LdsMacl => format!("lds r{}, macl", m),
            LdsPr => format!("lds r{}, pr", m),
            LdsLMach => format!("lds.l @r{}+, mach", m),
            LdsLMacl => format!("lds.l @r{}+, macl", m),
            LdsLPr => format!("lds.l @r{}+, pr", m),
            StcSr => format!("stc sr, r{}", n),
            StcGbr => format!("stc gbr, r{}", n),
            StcVbr => format!("stc vbr, r{}", n),
            StcLSr => format!("stc.l sr, @-r{}", n),
            StcLGbr => format!("stc.l gbr, @-r{}", n),
            StcLVbr => format!("stc.l vbr, @-r{}", n),
            StsMach => format!("sts mach, r{}", n),
            StsMacl => format!("sts macl, r{}", n),
            StsPr => format!("sts pr, r{}", n),
            StsLMach => format!("sts.l mach, @-r{}", n),
            StsLMacl => format!("sts.l macl, @-r{}", n),
            StsLPr => format!("sts.l pr, @-r{}", n),

            Illegal | IllegalSlot => format!(".word 0x{:04X}", instruction),
        }
    }
}
