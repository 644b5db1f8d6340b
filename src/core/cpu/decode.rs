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

//! Instruction decoder
//!
//! Every 16-bit instruction word is decoded once into a [`DecodeEntry`] and
//! stored in two immutable lookup tables: one for normal execution and one
//! for delay-slot execution. In the delay-slot table every instruction that
//! is not permitted in a slot decodes to [`OpcodeType::IllegalSlot`].
//!
//! Displacements are pre-scaled by the access size and extended (sign for
//! branch and `#imm` arithmetic forms, zero for everything else), so the
//! handlers never touch raw instruction bits.

use std::sync::LazyLock;

/// Decoded operation
///
/// One variant per addressing form. Register fields and the displacement or
/// immediate live in [`DecodedArgs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpcodeType {
    // Data transfer
    MovI,
    MovWPc,
    MovLPc,
    MovR,
    MovBStore,
    MovWStore,
    MovLStore,
    MovBLoad,
    MovWLoad,
    MovLLoad,
    MovBStorePreDec,
    MovWStorePreDec,
    MovLStorePreDec,
    MovBLoadPostInc,
    MovWLoadPostInc,
    MovLLoadPostInc,
    MovBStoreDisp,
    MovWStoreDisp,
    MovLStoreDisp,
    MovBLoadDisp,
    MovWLoadDisp,
    MovLLoadDisp,
    MovBStoreR0,
    MovWStoreR0,
    MovLStoreR0,
    MovBLoadR0,
    MovWLoadR0,
    MovLLoadR0,
    MovBStoreGbr,
    MovWStoreGbr,
    MovLStoreGbr,
    MovBLoadGbr,
    MovWLoadGbr,
    MovLLoadGbr,
    Mova,
    Movt,
    SwapB,
    SwapW,
    Xtrct,

    // Arithmetic
    Add,
    AddI,
    Addc,
    Addv,
    CmpEqI,
    CmpEq,
    CmpHs,
    CmpGe,
    CmpHi,
    CmpGt,
    CmpPz,
    CmpPl,
    CmpStr,
    Div1,
    Div0S,
    Div0U,
    Dt,
    ExtsB,
    ExtsW,
    ExtuB,
    ExtuW,
    Neg,
    Negc,
    Sub,
    Subc,
    Subv,

    // Multiply
    DmulsL,
    DmuluL,
    MacL,
    MacW,
    MulL,
    MulsW,
    MuluW,

    // Logic
    And,
    AndI,
    AndB,
    Not,
    Or,
    OrI,
    OrB,
    TasB,
    Tst,
    TstI,
    TstB,
    Xor,
    XorI,
    XorB,

    // Shift and rotate
    Rotl,
    Rotr,
    Rotcl,
    Rotcr,
    Shal,
    Shar,
    Shll,
    Shlr,
    Shll2,
    Shlr2,
    Shll8,
    Shlr8,
    Shll16,
    Shlr16,

    // Branch
    Bf,
    Bfs,
    Bt,
    Bts,
    Bra,
    Braf,
    Bsr,
    Bsrf,
    Jmp,
    Jsr,
    Rts,

    // System control
    Clrt,
    Clrmac,
    Sett,
    Nop,
    Rte,
    Sleep,
    Trapa,
    LdcSr,
    LdcGbr,
    LdcVbr,
    LdcLSr,
    LdcLGbr,
    LdcLVbr,
    LdsMach,
    LdsMacl,
    LdsPr,
    LdsLMach,
    LdsLMacl,
    LdsLPr,
    StcSr,
    StcGbr,
    StcVbr,
    StcLSr,
    StcLGbr,
    StcLVbr,
    StsMach,
    StsMacl,
    StsPr,
    StsLMach,
    StsLMacl,
    StsLPr,

    /// Undefined encoding
    Illegal,
    /// Instruction not permitted in a delay slot
    IllegalSlot,
}

impl OpcodeType {
    /// Whether this operation may not appear in a delay slot
    pub fn is_slot_illegal(self) -> bool {
        matches!(
            self,
            OpcodeType::Bf
                | OpcodeType::Bfs
                | OpcodeType::Bt
                | OpcodeType::Bts
                | OpcodeType::Bra
                | OpcodeType::Braf
                | OpcodeType::Bsr
                | OpcodeType::Bsrf
                | OpcodeType::Jmp
                | OpcodeType::Jsr
                | OpcodeType::Rts
                | OpcodeType::Rte
                | OpcodeType::Trapa
                | OpcodeType::Sleep
                | OpcodeType::Illegal
        )
    }
}

/// Operand fields of a decoded instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodedArgs {
    /// Destination register
    pub rn: u8,
    /// Source register
    pub rm: u8,
    /// Scaled and extended displacement or immediate
    pub dispimm: u32,
}

/// One decode table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeEntry {
    pub opcode: OpcodeType,
    pub args: DecodedArgs,
}

impl DecodeEntry {
    const fn new(opcode: OpcodeType, rn: u8, rm: u8, dispimm: u32) -> Self {
        Self {
            opcode,
            args: DecodedArgs { rn, rm, dispimm },
        }
    }

    const fn op(opcode: OpcodeType) -> Self {
        Self::new(opcode, 0, 0, 0)
    }
}

/// Precomputed decode tables for all 65536 instruction words
pub struct DecodeTable {
    normal: Box<[DecodeEntry]>,
    delay_slot: Box<[DecodeEntry]>,
}

static DECODE_TABLE: LazyLock<DecodeTable> = LazyLock::new(DecodeTable::build);

impl DecodeTable {
    /// Build both tables
    pub fn build() -> Self {
        let normal: Box<[DecodeEntry]> = (0..=u16::MAX).map(decode_instruction).collect();
        let delay_slot: Box<[DecodeEntry]> = normal
            .iter()
            .map(|entry| {
                if entry.opcode.is_slot_illegal() {
                    DecodeEntry::op(OpcodeType::IllegalSlot)
                } else {
                    *entry
                }
            })
            .collect();
        log::debug!("Built SH-2 decode tables ({} entries each)", normal.len());
        Self { normal, delay_slot }
    }

    /// Shared process-wide instance, built on first use
    pub fn get() -> &'static DecodeTable {
        &DECODE_TABLE
    }

    /// Look up an instruction word
    ///
    /// `DELAY` selects the delay-slot table.
    #[inline(always)]
    pub fn entry<const DELAY: bool>(&self, instruction: u16) -> DecodeEntry {
        if DELAY {
            self.delay_slot[instruction as usize]
        } else {
            self.normal[instruction as usize]
        }
    }
}

/// Decode a single instruction word for normal execution
pub fn decode_instruction(instr: u16) -> DecodeEntry {
    use OpcodeType::*;

    let n = ((instr >> 8) & 0xF) as u8;
    let m = ((instr >> 4) & 0xF) as u8;
    let d4 = (instr & 0xF) as u32;
    let imm8 = (instr & 0xFF) as u32;
    let s8 = (instr & 0xFF) as u8 as i8 as i32 as u32;
    let s12 = (((instr & 0xFFF) << 4) as i16 >> 4) as i32 as u32;

    match instr >> 12 {
        0x0 => match instr & 0xF {
            0x2 => match m {
                0 => DecodeEntry::new(StcSr, n, 0, 0),
                1 => DecodeEntry::new(StcGbr, n, 0, 0),
                2 => DecodeEntry::new(StcVbr, n, 0, 0),
                _ => DecodeEntry::op(Illegal),
            },
            0x3 => match m {
                0 => DecodeEntry::new(Bsrf, 0, n, 0),
                2 => DecodeEntry::new(Braf, 0, n, 0),
                _ => DecodeEntry::op(Illegal),
            },
            0x4 => DecodeEntry::new(MovBStoreR0, n, m, 0),
            0x5 => DecodeEntry::new(MovWStoreR0, n, m, 0),
            0x6 => DecodeEntry::new(MovLStoreR0, n, m, 0),
            0x7 => DecodeEntry::new(MulL, n, m, 0),
            0x8 if n == 0 => match m {
                0 => DecodeEntry::op(Clrt),
                1 => DecodeEntry::op(Sett),
                2 => DecodeEntry::op(Clrmac),
                _ => DecodeEntry::op(Illegal),
            },
            0x9 => match m {
                0 if n == 0 => DecodeEntry::op(Nop),
                1 if n == 0 => DecodeEntry::op(Div0U),
                2 => DecodeEntry::new(Movt, n, 0, 0),
                _ => DecodeEntry::op(Illegal),
            },
            0xA => match m {
                0 => DecodeEntry::new(StsMach, n, 0, 0),
                1 => DecodeEntry::new(StsMacl, n, 0, 0),
                2 => DecodeEntry::new(StsPr, n, 0, 0),
                _ => DecodeEntry::op(Illegal),
            },
            0xB if n == 0 => match m {
                0 => DecodeEntry::op(Rts),
                1 => DecodeEntry::op(Sleep),
                2 => DecodeEntry::op(Rte),
                _ => DecodeEntry::op(Illegal),
            },
            0xC => DecodeEntry::new(MovBLoadR0, n, m, 0),
            0xD => DecodeEntry::new(MovWLoadR0, n, m, 0),
            0xE => DecodeEntry::new(MovLLoadR0, n, m, 0),
            0xF => DecodeEntry::new(MacL, n, m, 0),
            _ => DecodeEntry::op(Illegal),
        },
        0x1 => DecodeEntry::new(MovLStoreDisp, n, m, d4 << 2),
        0x2 => {
            let opcode = match instr & 0xF {
                0x0 => MovBStore,
                0x1 => MovWStore,
                0x2 => MovLStore,
                0x4 => MovBStorePreDec,
                0x5 => MovWStorePreDec,
                0x6 => MovLStorePreDec,
                0x7 => Div0S,
                0x8 => Tst,
                0x9 => And,
                0xA => Xor,
                0xB => Or,
                0xC => CmpStr,
                0xD => Xtrct,
                0xE => MuluW,
                0xF => MulsW,
                _ => return DecodeEntry::op(Illegal),
            };
            DecodeEntry::new(opcode, n, m, 0)
        }
        0x3 => {
            let opcode = match instr & 0xF {
                0x0 => CmpEq,
                0x2 => CmpHs,
                0x3 => CmpGe,
                0x4 => Div1,
                0x5 => DmuluL,
                0x6 => CmpHi,
                0x7 => CmpGt,
                0x8 => Sub,
                0xA => Subc,
                0xB => Subv,
                0xC => Add,
                0xD => DmulsL,
                0xE => Addc,
                0xF => Addv,
                _ => return DecodeEntry::op(Illegal),
            };
            DecodeEntry::new(opcode, n, m, 0)
        }
        0x4 => {
            if instr & 0xF == 0xF {
                return DecodeEntry::new(MacW, n, m, 0);
            }
            // Single-register forms; loads take their source in bits 11..8
            let (opcode, is_source) = match instr & 0xFF {
                0x00 => (Shll, false),
                0x01 => (Shlr, false),
                0x02 => (StsLMach, false),
                0x03 => (StcLSr, false),
                0x04 => (Rotl, false),
                0x05 => (Rotr, false),
                0x06 => (LdsLMach, true),
                0x07 => (LdcLSr, true),
                0x08 => (Shll2, false),
                0x09 => (Shlr2, false),
                0x0A => (LdsMach, true),
                0x0B => (Jsr, true),
                0x0E => (LdcSr, true),
                0x10 => (Dt, false),
                0x11 => (CmpPz, false),
                0x12 => (StsLMacl, false),
                0x13 => (StcLGbr, false),
                0x15 => (CmpPl, false),
                0x16 => (LdsLMacl, true),
                0x17 => (LdcLGbr, true),
                0x18 => (Shll8, false),
                0x19 => (Shlr8, false),
                0x1A => (LdsMacl, true),
                0x1B => (TasB, false),
                0x1E => (LdcGbr, true),
                0x20 => (Shal, false),
                0x21 => (Shar, false),
                0x22 => (StsLPr, false),
                0x23 => (StcLVbr, false),
                0x24 => (Rotcl, false),
                0x25 => (Rotcr, false),
                0x26 => (LdsLPr, true),
                0x27 => (LdcLVbr, true),
                0x28 => (Shll16, false),
                0x29 => (Shlr16, false),
                0x2A => (LdsPr, true),
                0x2B => (Jmp, true),
                0x2E => (LdcVbr, true),
                _ => return DecodeEntry::op(Illegal),
            };
            if is_source {
                DecodeEntry::new(opcode, 0, n, 0)
            } else {
                DecodeEntry::new(opcode, n, 0, 0)
            }
        }
        0x5 => DecodeEntry::new(MovLLoadDisp, n, m, d4 << 2),
        0x6 => {
            let opcode = match instr & 0xF {
                0x0 => MovBLoad,
                0x1 => MovWLoad,
                0x2 => MovLLoad,
                0x3 => MovR,
                0x4 => MovBLoadPostInc,
                0x5 => MovWLoadPostInc,
                0x6 => MovLLoadPostInc,
                0x7 => Not,
                0x8 => SwapB,
                0x9 => SwapW,
                0xA => Negc,
                0xB => Neg,
                0xC => ExtuB,
                0xD => ExtuW,
                0xE => ExtsB,
                _ => ExtsW,
            };
            DecodeEntry::new(opcode, n, m, 0)
        }
        0x7 => DecodeEntry::new(AddI, n, 0, s8),
        0x8 => match n {
            0x0 => DecodeEntry::new(MovBStoreDisp, m, 0, d4),
            0x1 => DecodeEntry::new(MovWStoreDisp, m, 0, d4 << 1),
            0x4 => DecodeEntry::new(MovBLoadDisp, 0, m, d4),
            0x5 => DecodeEntry::new(MovWLoadDisp, 0, m, d4 << 1),
            0x8 => DecodeEntry::new(CmpEqI, 0, 0, s8),
            0x9 => DecodeEntry::new(Bt, 0, 0, s8 << 1),
            0xB => DecodeEntry::new(Bf, 0, 0, s8 << 1),
            0xD => DecodeEntry::new(Bts, 0, 0, s8 << 1),
            0xF => DecodeEntry::new(Bfs, 0, 0, s8 << 1),
            _ => DecodeEntry::op(Illegal),
        },
        0x9 => DecodeEntry::new(MovWPc, n, 0, imm8 << 1),
        0xA => DecodeEntry::new(Bra, 0, 0, s12 << 1),
        0xB => DecodeEntry::new(Bsr, 0, 0, s12 << 1),
        0xC => match n {
            0x0 => DecodeEntry::new(MovBStoreGbr, 0, 0, imm8),
            0x1 => DecodeEntry::new(MovWStoreGbr, 0, 0, imm8 << 1),
            0x2 => DecodeEntry::new(MovLStoreGbr, 0, 0, imm8 << 2),
            0x3 => DecodeEntry::new(Trapa, 0, 0, imm8),
            0x4 => DecodeEntry::new(MovBLoadGbr, 0, 0, imm8),
            0x5 => DecodeEntry::new(MovWLoadGbr, 0, 0, imm8 << 1),
            0x6 => DecodeEntry::new(MovLLoadGbr, 0, 0, imm8 << 2),
            0x7 => DecodeEntry::new(Mova, 0, 0, imm8 << 2),
            0x8 => DecodeEntry::new(TstI, 0, 0, imm8),
            0x9 => DecodeEntry::new(AndI, 0, 0, imm8),
            0xA => DecodeEntry::new(XorI, 0, 0, imm8),
            0xB => DecodeEntry::new(OrI, 0, 0, imm8),
            0xC => DecodeEntry::new(TstB, 0, 0, imm8),
            0xD => DecodeEntry::new(AndB, 0, 0, imm8),
            0xE => DecodeEntry::new(XorB, 0, 0, imm8),
            _ => DecodeEntry::new(OrB, 0, 0, imm8),
        },
        0xD => DecodeEntry::new(MovLPc, n, 0, imm8 << 2),
        0xE => DecodeEntry::new(MovI, n, 0, s8),
        _ => DecodeEntry::op(Illegal),
    }
}
