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

use super::*;

fn long_pairs(accesses: &[BusAccess]) -> Vec<(u32, u32)> {
    accesses
        .chunks(2)
        .map(|pair| match pair {
            [BusAccess::Read { address: src, size: 4, .. }, BusAccess::Write { address: dst, size: 4, .. }] => {
                (*src, *dst)
            }
            other => panic!("unexpected access pattern: {:?}", other),
        })
        .collect()
}

#[test]
fn test_long_transfer_counts_units() {
    let (mut cpu, mut bus) = setup();
    for i in 0..10u32 {
        bus.load(0x1000 + i * 4, &(0x1111_0000 + i).to_be_bytes()).unwrap();
    }
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 10);
    write(&mut cpu, &mut bus, DMAOR, 1);
    bus.take_accesses();

    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);

    let pairs = long_pairs(&bus.take_accesses());
    assert_eq!(pairs.len(), 10);
    assert_eq!(pairs[0], (0x1000, 0x2000));
    assert_eq!(pairs[9], (0x1024, 0x2024));
    assert_eq!(&bus.memory()[0x2024..0x2028], &0x1111_0009u32.to_be_bytes());

    let channel = cpu.dmac().channel(0);
    assert!(channel.transfer_ended());
    assert_eq!(channel.transfer_count(), 0);
    assert_eq!(channel.source_address(), 0x1028);
    assert_eq!(channel.destination_address(), 0x2028);
}

#[test]
fn test_block16_transfer_counts_longs() {
    let (mut cpu, mut bus) = setup();
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x4000, 40);
    write(&mut cpu, &mut bus, DMAOR, 1);
    bus.take_accesses();

    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_16 | AR | DE);

    let pairs = long_pairs(&bus.take_accesses());
    // 10 blocks of 4 longs
    assert_eq!(pairs.len(), 40);
    assert_eq!(pairs[4], (0x1010, 0x4010));
    assert_eq!(cpu.dmac().channel(0).source_address(), 0x1000 + 10 * 16);
    assert!(cpu.dmac().channel(0).transfer_ended());
}

#[test]
fn test_byte_transfer_with_decrementing_destination() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[1, 2, 3]).unwrap();
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2002, 3);
    write(&mut cpu, &mut bus, DMAOR, 1);

    write(&mut cpu, &mut bus, CHCR0, (2 << 14) | (1 << 12) | TS_BYTE | AR | DE);

    assert_eq!(&bus.memory()[0x2000..0x2003], &[3, 2, 1]);
    assert_eq!(cpu.dmac().channel(0).destination_address(), 0x1FFF);
}

#[test]
fn test_transfer_end_interrupt_requires_ie() {
    let (mut cpu, mut bus) = setup();
    // IPRA: DMAC level 10
    cpu.mem_write_word::<false>(&mut bus, 0xFFFF_FEE2, 0x0A00);
    write(&mut cpu, &mut bus, VCRDMA0, 0x48);
    write(&mut cpu, &mut bus, DMAOR, 1);

    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 1);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);
    assert!(cpu.dmac().channel(0).transfer_ended());
    assert_eq!(cpu.pending_interrupt().source, InterruptSource::None);

    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 1);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | IE | DE);
    let pending = cpu.pending_interrupt();
    assert_eq!(pending.source, InterruptSource::Dmac0XferEnd);
    assert_eq!(pending.level, 10);
    assert_eq!(cpu.interrupt_controller().vector(pending.source), 0x48);

    // Clearing TE withdraws the request
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | IE);
    assert_eq!(cpu.pending_interrupt().source, InterruptSource::None);
}

#[test]
fn test_misaligned_address_sets_ae() {
    let (mut cpu, mut bus) = setup();
    program_channel0(&mut cpu, &mut bus, 0x1002, 0x2000, 4);
    write(&mut cpu, &mut bus, DMAOR, 1);
    bus.take_accesses();

    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);

    assert!(bus.accesses().is_empty());
    assert_eq!(read(&mut cpu, &mut bus, DMAOR) & 0x4, 0x4);
    assert!(!cpu.dmac().channel(0).transfer_ended());

    // AE halts every channel until cleared
    write(&mut cpu, &mut bus, SAR1, 0x1000);
    write(&mut cpu, &mut bus, DAR1, 0x2000);
    write(&mut cpu, &mut bus, TCR1, 1);
    write(&mut cpu, &mut bus, CHCR1, INC_INC | TS_LONG | AR | DE);
    assert!(!cpu.dmac().channel(1).transfer_ended());
}

#[test]
fn test_dmaor_enable_starts_pending_channel() {
    let (mut cpu, mut bus) = setup();
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 2);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);
    assert!(!cpu.dmac().channel(0).transfer_ended());

    write(&mut cpu, &mut bus, DMAOR, 1);
    assert!(cpu.dmac().channel(0).transfer_ended());
}

#[test]
fn test_nmi_halts_dma() {
    let (mut cpu, mut bus) = setup();
    write(&mut cpu, &mut bus, DMAOR, 1);
    cpu.set_nmi();

    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 2);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);
    assert!(!cpu.dmac().channel(0).transfer_ended());
}

#[test]
fn test_module_request_waits_for_line() {
    let (mut cpu, mut bus) = setup();
    write(&mut cpu, &mut bus, DMAOR, 1);
    // DRCR0: RXI
    cpu.mem_write_byte::<false>(&mut bus, 0xFFFF_FE71, 0x01);
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 2);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | DE);
    assert!(!cpu.dmac().channel(0).transfer_ended());

    cpu.set_dma_request(&mut bus, DmaRequestSource::Dreq, true);
    assert!(!cpu.dmac().channel(0).transfer_ended());

    cpu.set_dma_request(&mut bus, DmaRequestSource::RxI, true);
    assert!(cpu.dmac().channel(0).transfer_ended());
}

#[test]
fn test_poke_chcr_does_not_transfer() {
    let (mut cpu, mut bus) = setup();
    write(&mut cpu, &mut bus, DMAOR, 1);
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 2);

    cpu.poke_long(&mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);
    assert!(!cpu.dmac().channel(0).transfer_ended());
    assert_eq!(cpu.peek_long(&mut bus, CHCR0), INC_INC | TS_LONG | AR | DE);
}

#[derive(Default)]
struct TransferLog {
    begun: Vec<(usize, u32, u32)>,
    units: usize,
    ended: Vec<(usize, bool)>,
}

struct TransferTracer(std::sync::Arc<std::sync::Mutex<TransferLog>>);

impl crate::core::cpu::Sh2Tracer for TransferTracer {
    fn dma_transfer_begin(
        &mut self,
        channel: usize,
        _source: u32,
        _destination: u32,
        count: u32,
        unit_size: u32,
        _source_mode: AddressMode,
        _destination_mode: AddressMode,
    ) {
        self.0.lock().unwrap().begun.push((channel, count, unit_size));
    }

    fn dma_transfer(&mut self, _channel: usize, _source: u32, _destination: u32, _value: u32, _size: u32) {
        self.0.lock().unwrap().units += 1;
    }

    fn dma_transfer_end(&mut self, channel: usize, irq_raised: bool) {
        self.0.lock().unwrap().ended.push((channel, irq_raised));
    }
}

#[test]
fn test_tracer_sees_transfer_only_while_installed() {
    let (mut cpu, mut bus) = setup();
    let log = std::sync::Arc::new(std::sync::Mutex::new(TransferLog::default()));
    cpu.set_tracer(Box::new(TransferTracer(log.clone())));

    program_channel0(&mut cpu, &mut bus, 0x1000, 0x2000, 4);
    write(&mut cpu, &mut bus, DMAOR, 1);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | IE | DE);

    {
        let log = log.lock().unwrap();
        assert_eq!(log.begun, vec![(0, 4, 4)]);
        assert_eq!(log.units, 4);
        assert_eq!(log.ended, vec![(0, true)]);
    }

    // Second transfer runs without a tracer
    assert!(cpu.take_tracer().is_some());
    write(&mut cpu, &mut bus, CHCR0, 0);
    program_channel0(&mut cpu, &mut bus, 0x1000, 0x3000, 2);
    write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_LONG | AR | DE);

    assert!(cpu.dmac().channel(0).transfer_ended());
    let log = log.lock().unwrap();
    assert_eq!(log.units, 4);
    assert_eq!(log.begun.len(), 1);
}

#[test]
fn test_count_of_forty_in_sixteen_byte_units_runs_ten_units() {
    let (mut cpu, mut bus) = setup();
    cpu.mem_write_word::<false>(&mut bus, 0xFFFF_FEE2, 0x0A00);
    write(&mut cpu, &mut bus, VCRDMA0, 0x48);
    write(&mut cpu, &mut bus, DMAOR, 1);

    for ie in [0, IE] {
        program_channel0(&mut cpu, &mut bus, 0x1000, 0x4000, 40);
        bus.take_accesses();
        write(&mut cpu, &mut bus, CHCR0, INC_INC | TS_16 | AR | ie | DE);

        let pairs = long_pairs(&bus.take_accesses());
        let units: Vec<_> = pairs.chunks(4).collect();
        assert_eq!(units.len(), 10);
        for (n, unit) in units.iter().enumerate() {
            let base = n as u32 * 16;
            for (i, &(src, dst)) in unit.iter().enumerate() {
                let offset = base + i as u32 * 4;
                assert_eq!((src, dst), (0x1000 + offset, 0x4000 + offset));
            }
        }

        let channel = cpu.dmac().channel(0);
        assert_eq!(channel.transfer_count(), 0);
        assert!(channel.transfer_ended());
        let expected = if ie == 0 {
            InterruptSource::None
        } else {
            InterruptSource::Dmac0XferEnd
        };
        assert_eq!(cpu.pending_interrupt().source, expected);
    }
}
