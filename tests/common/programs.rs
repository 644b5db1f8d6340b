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

//! Small SH-2 test programs, loaded at the reset entry point

/// Enable the cache, then sum a memory cell into R0 R4 times
///
/// Expects R1 = data address, R2 = 0xFFFF_FE92 (CCR), R4 = iteration count.
#[allow(dead_code)]
pub fn cached_accumulate_loop() -> Vec<u16> {
    vec![
        0xE001, // mov #1, r0
        0x2200, // mov.b r0, @r2        ; CCR.CE = 1
        0x2102, // loop: mov.l r0, @r1
        0x6316, // mov.l @r1+, r3
        0x303C, // add r3, r0
        0x4410, // dt r4
        0x8BFA, // bf loop
        0x0009, // nop
        0xAFFE, // done: bra done
        0x0009, // nop
    ]
}

/// Read @R1 twice with a host-visible pause in between
///
/// Expects R0 = 1, R2 = 0xFFFF_FE92 (CCR).
#[allow(dead_code)]
pub fn double_read() -> Vec<u16> {
    vec![
        0x2200, // mov.b r0, @r2        ; CCR.CE = 1
        0x6312, // mov.l @r1, r3
        0x6412, // mov.l @r1, r4
        0xAFFE, // bra .
        0x0009, // nop
    ]
}

/// Spin forever
#[allow(dead_code)]
pub fn idle_loop() -> Vec<u16> {
    vec![
        0xAFFE, // bra .
        0x0009, // nop
    ]
}
