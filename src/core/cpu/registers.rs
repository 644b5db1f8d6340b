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

//! Control registers
//!
//! The status register and the multiply-accumulate register pair.

use serde::{Deserialize, Serialize};

/// Status register (SR)
///
/// | Bits | Field | Meaning                          |
/// |------|-------|----------------------------------|
/// | 9    | M     | Division step flag               |
/// | 8    | Q     | Division step flag               |
/// | 7..4 | I     | Interrupt mask level             |
/// | 1    | S     | Saturation mode for MAC          |
/// | 0    | T     | Test/carry flag                  |
///
/// All other bits read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRegister(u32);

impl StatusRegister {
    /// Writable bits
    pub const WRITE_MASK: u32 = 0x0000_03F3;

    const T: u32 = 1 << 0;
    const S: u32 = 1 << 1;
    const Q: u32 = 1 << 8;
    const M: u32 = 1 << 9;
    const I_SHIFT: u32 = 4;
    const I_MASK: u32 = 0xF << Self::I_SHIFT;

    /// Create a status register, discarding unimplemented bits
    pub const fn new(value: u32) -> Self {
        Self(value & Self::WRITE_MASK)
    }

    /// Value after reset (I = 15, everything else clear)
    pub const fn reset_value() -> Self {
        Self(Self::I_MASK)
    }

    #[inline(always)]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn set_bits(&mut self, value: u32) {
        self.0 = value & Self::WRITE_MASK;
    }

    #[inline(always)]
    fn flag(self, mask: u32) -> bool {
        self.0 & mask != 0
    }

    #[inline(always)]
    fn set_flag(&mut self, mask: u32, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    #[inline(always)]
    pub fn t(self) -> bool {
        self.flag(Self::T)
    }

    #[inline(always)]
    pub fn set_t(&mut self, value: bool) {
        self.set_flag(Self::T, value)
    }

    #[inline(always)]
    pub fn s(self) -> bool {
        self.flag(Self::S)
    }

    #[inline(always)]
    pub fn q(self) -> bool {
        self.flag(Self::Q)
    }

    #[inline(always)]
    pub fn set_q(&mut self, value: bool) {
        self.set_flag(Self::Q, value)
    }

    #[inline(always)]
    pub fn m(self) -> bool {
        self.flag(Self::M)
    }

    #[inline(always)]
    pub fn set_m(&mut self, value: bool) {
        self.set_flag(Self::M, value)
    }

    /// Interrupt mask level (0-15)
    #[inline(always)]
    pub fn imask(self) -> u8 {
        ((self.0 & Self::I_MASK) >> Self::I_SHIFT) as u8
    }

    #[inline(always)]
    pub fn set_imask(&mut self, level: u8) {
        self.0 = (self.0 & !Self::I_MASK) | (((level as u32) & 0xF) << Self::I_SHIFT);
    }
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self::reset_value()
    }
}

/// Multiply-accumulate register (MACH:MACL)
///
/// Stored as one 64-bit value. MAC.L in saturation mode only uses the low
/// 48 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacRegister(u64);

impl MacRegister {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub fn value(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn set_value(&mut self, value: u64) {
        self.0 = value;
    }

    /// MACH
    #[inline(always)]
    pub fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// MACL
    #[inline(always)]
    pub fn low(self) -> u32 {
        self.0 as u32
    }

    #[inline(always)]
    pub fn set_high(&mut self, value: u32) {
        self.0 = (self.0 & 0xFFFF_FFFF) | ((value as u64) << 32);
    }

    #[inline(always)]
    pub fn set_low(&mut self, value: u32) {
        self.0 = (self.0 & 0xFFFF_FFFF_0000_0000) | value as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sr_write_mask() {
        let sr = StatusRegister::new(0xFFFF_FFFF);
        assert_eq!(sr.bits(), 0x3F3);
    }

    #[test]
    fn test_sr_reset_value() {
        let sr = StatusRegister::reset_value();
        assert_eq!(sr.imask(), 15);
        assert!(!sr.t());
        assert_eq!(sr.bits(), 0xF0);
    }

    #[test]
    fn test_sr_flags() {
        let mut sr = StatusRegister::new(0);
        sr.set_t(true);
        sr.set_q(true);
        sr.set_m(true);
        assert_eq!(sr.bits(), 0x301);
        sr.set_q(false);
        assert!(!sr.q());
        assert!(sr.m());
        assert!(sr.t());
    }

    #[test]
    fn test_sr_imask() {
        let mut sr = StatusRegister::new(0x3F3);
        sr.set_imask(3);
        assert_eq!(sr.imask(), 3);
        assert_eq!(sr.bits(), 0x333);
    }

    #[test]
    fn test_mac_halves() {
        let mut mac = MacRegister::default();
        mac.set_high(0x1234_5678);
        mac.set_low(0x9ABC_DEF0);
        assert_eq!(mac.value(), 0x1234_5678_9ABC_DEF0);
        assert_eq!(mac.high(), 0x1234_5678);
        assert_eq!(mac.low(), 0x9ABC_DEF0);
    }
}
