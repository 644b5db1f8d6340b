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

//! Interrupt arbitration and service

use super::{InterruptSource, PendingInterrupt, SCAN_ORDER, SOURCE_COUNT};
use crate::core::cpu::Sh2;
use crate::core::memory::Bus;

impl Sh2 {
    /// Whether `source` is currently requesting service
    pub(crate) fn is_interrupt_active(&self, source: InterruptSource) -> bool {
        match source {
            InterruptSource::None | InterruptSource::UserBreak => false,
            InterruptSource::Nmi => self.intc.nmi,
            InterruptSource::Irl => self.intc.irl_level() > 0,
            InterruptSource::DivuOvfi => self.divu.ovfi_pending(),
            InterruptSource::Dmac0XferEnd => self.dmac.channels[0].interrupt_pending(),
            InterruptSource::Dmac1XferEnd => self.dmac.channels[1].interrupt_pending(),
            InterruptSource::WdtIti => self.wdt.iti_pending(),
            InterruptSource::BscRefCmi => self.bsc.cmi_pending(),
            InterruptSource::SciEri => self.sci.eri_pending(),
            InterruptSource::SciRxi => self.sci.rxi_pending(),
            InterruptSource::SciTxi => self.sci.txi_pending(),
            InterruptSource::SciTei => self.sci.tei_pending(),
            InterruptSource::FrtIci => self.frt.ici_pending(),
            InterruptSource::FrtOci => self.frt.oci_pending(),
            InterruptSource::FrtOvi => self.frt.ovi_pending(),
        }
    }

    fn candidate(&self, source: InterruptSource) -> Option<PendingInterrupt> {
        let level = self.intc.level(source);
        (level > 0 && self.is_interrupt_active(source)).then_some(PendingInterrupt { level, source })
    }

    /// Rescan every source and pick the highest-priority active one
    pub(crate) fn recalc_interrupts(&mut self) {
        self.intc.pending = SCAN_ORDER
            .iter()
            .find_map(|&source| self.candidate(source))
            .unwrap_or(PendingInterrupt::NONE);
    }

    /// Re-evaluate after the state of `changed` sources moved
    ///
    /// A full rescan is only needed when the pending source itself changed;
    /// otherwise a changed source can only take over by outranking it.
    pub(crate) fn update_interrupts(&mut self, changed: &[InterruptSource]) {
        let pending = self.intc.pending;
        if pending.source != InterruptSource::None && changed.contains(&pending.source) {
            self.recalc_interrupts();
            return;
        }

        for &source in changed {
            let current = self.intc.pending.source;
            if source.scan_rank() >= current.scan_rank() {
                continue;
            }
            if let Some(candidate) = self.candidate(source) {
                self.intc.pending = candidate;
            }
        }
    }

    /// Re-evaluate after a priority register write
    ///
    /// `previous` holds the levels of `sources` before the write. Only sources
    /// whose level actually moved are passed on to [`Self::update_interrupts`].
    pub(crate) fn update_interrupt_levels(&mut self, sources: &[InterruptSource], previous: &[u8]) {
        let mut changed = [InterruptSource::None; SOURCE_COUNT];
        let mut count = 0;
        for (&source, &level) in sources.iter().zip(previous) {
            if self.intc.level(source) != level {
                changed[count] = source;
                count += 1;
            }
        }
        if count > 0 {
            self.update_interrupts(&changed[..count]);
        }
    }

    /// Whether the pending interrupt can be accepted before the next instruction
    pub(crate) fn interrupt_eligible(&self) -> bool {
        let pending = self.intc.pending;
        !self.delay_slot
            && pending.source != InterruptSource::None
            && (pending.source == InterruptSource::Nmi || pending.level > self.sr.imask())
    }

    /// Accept the pending interrupt
    ///
    /// Returns the cycles spent on exception entry.
    pub(crate) fn service_interrupt<const DEBUG: bool, const CACHE: bool>(
        &mut self,
        bus: &mut dyn Bus,
    ) -> u64 {
        let PendingInterrupt { level, source } = self.intc.pending;
        let vector = self.intc.vector(source);

        if DEBUG {
            let pc = self.pc;
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.interrupt(vector, level, source, pc);
            }
        }
        log::trace!(
            "[{}] Interrupt {:?} level {} vector {} at PC=0x{:08X}",
            self.config.role.tag(),
            source,
            level,
            vector,
            self.pc
        );

        // SLEEP leaves PC on itself; resume after it
        let pushed_pc = if self.sleeping {
            self.pc.wrapping_add(2)
        } else {
            self.pc
        };
        self.sleeping = false;

        self.enter_exception::<DEBUG, CACHE>(bus, vector, pushed_pc);
        self.sr.set_imask(level.min(15));

        match source {
            InterruptSource::Nmi => self.intc.nmi = false,
            InterruptSource::Irl => self.acknowledge_external_interrupt(),
            _ => {}
        }

        self.recalc_interrupts();
        Self::INTERRUPT_CYCLES
    }
}
