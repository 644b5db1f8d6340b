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

//! Division unit (DIVU)
//!
//! Signed 32/32 and 64/32 division. Writing DVDNT starts a 32-bit division,
//! writing DVDNTL starts a 64-bit division of DVDNTH:DVDNTL. Results are
//! available immediately: the quotient in DVDNTL (and DVDNT), the remainder
//! in DVDNTH.
//!
//! On overflow (division by zero or a quotient outside 32 bits) DVCR.OVF is
//! set, the quotient saturates towards the sign of the true result and
//! DVDNTH keeps the upper dividend word.

const DVCR_OVF: u32 = 1 << 0;
const DVCR_OVFIE: u32 = 1 << 1;

/// Result of one division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionResult {
    pub quotient: i32,
    pub remainder: i32,
    pub overflow: bool,
}

/// Division unit registers
pub struct DivisionUnit {
    pub(crate) dvsr: u32,
    pub(crate) dvdnt: u32,
    pub(crate) dvcr: u32,
    pub(crate) dvdnth: u32,
    pub(crate) dvdntl: u32,
}

impl DivisionUnit {
    pub fn new() -> Self {
        Self {
            dvsr: 0,
            dvdnt: 0,
            dvcr: 0,
            dvdnth: 0,
            dvdntl: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Overflow interrupt requested
    pub fn ovfi_pending(&self) -> bool {
        self.dvcr & (DVCR_OVF | DVCR_OVFIE) == (DVCR_OVF | DVCR_OVFIE)
    }

    pub fn overflow_interrupt_enabled(&self) -> bool {
        self.dvcr & DVCR_OVFIE != 0
    }

    pub fn read_dvcr(&self) -> u32 {
        self.dvcr
    }

    pub fn write_dvcr(&mut self, value: u32) {
        self.dvcr = value & (DVCR_OVF | DVCR_OVFIE);
    }

    fn saturated(negative: bool) -> i32 {
        if negative {
            i32::MIN
        } else {
            i32::MAX
        }
    }

    /// 32/32 division of `dividend` by DVSR
    pub fn divide_32(&mut self, dividend: u32) -> DivisionResult {
        let divisor = self.dvsr as i32;
        let dividend = dividend as i32;

        let result = match (dividend.checked_div(divisor), dividend.checked_rem(divisor)) {
            (Some(quotient), Some(remainder)) => DivisionResult {
                quotient,
                remainder,
                overflow: false,
            },
            _ => DivisionResult {
                quotient: Self::saturated((dividend < 0) != (divisor < 0)),
                remainder: dividend,
                overflow: true,
            },
        };

        self.dvdnt = result.quotient as u32;
        self.dvdntl = result.quotient as u32;
        self.dvdnth = result.remainder as u32;
        if result.overflow {
            self.dvcr |= DVCR_OVF;
        }
        result
    }

    /// 64/32 division of DVDNTH:`low` by DVSR
    pub fn divide_64(&mut self, low: u32) -> DivisionResult {
        let dividend = (((self.dvdnth as u64) << 32) | low as u64) as i64;
        let divisor = self.dvsr as i32 as i64;

        let quotient = dividend
            .checked_div(divisor)
            .and_then(|q| i32::try_from(q).ok());
        let result = match quotient {
            Some(quotient) => DivisionResult {
                quotient,
                remainder: (dividend % divisor) as i32,
                overflow: false,
            },
            None => DivisionResult {
                quotient: Self::saturated((dividend < 0) != (divisor < 0)),
                remainder: self.dvdnth as i32,
                overflow: true,
            },
        };

        self.dvdnt = result.quotient as u32;
        self.dvdntl = result.quotient as u32;
        self.dvdnth = result.remainder as u32;
        if result.overflow {
            self.dvcr |= DVCR_OVF;
        }
        result
    }

    /// Combined 64-bit dividend currently held in DVDNTH:DVDNTL
    pub fn dividend_64(&self, low: u32) -> i64 {
        (((self.dvdnth as u64) << 32) | low as u64) as i64
    }
}

impl Default for DivisionUnit {
    fn default() -> Self {
        Self::new()
    }
}
