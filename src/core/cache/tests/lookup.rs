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
use crate::core::memory::BusAccess;

#[test]
fn test_disabled_cache_always_misses() {
    let mut cache = Cache::new();
    let mut bus = RamBus::new(0x1000);
    cache.fill_line(&mut bus, 0x100, 0);
    assert_eq!(cache.find_way(0x100), None);

    cache.write_ccr(CacheControl::CE.bits());
    assert_eq!(cache.find_way(0x100), Some(0));
}

#[test]
fn test_fill_line_reads_four_words_wrapping() {
    let mut cache = enabled_cache();
    let mut bus = RamBus::new(0x1000).with_access_log();
    bus.load(0x200, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])
        .unwrap();

    cache.fill_line(&mut bus, 0x0000_0208, 1);

    let addresses: Vec<u32> = bus
        .accesses()
        .iter()
        .map(|access| match access {
            BusAccess::Read { address, size, .. } => {
                assert_eq!(*size, 4);
                *address
            }
            BusAccess::Write { .. } => panic!("fill must not write"),
        })
        .collect();
    assert_eq!(addresses, vec![0x208, 0x20C, 0x200, 0x204]);

    assert_eq!(cache.find_way(0x200), Some(1));
    assert_eq!(cache.read_line::<u32>(0x204, 1), 0x0405_0607);
    assert_eq!(cache.read_line::<u16>(0x20E, 1), 0x0E0F);
    assert_eq!(cache.read_line::<u8>(0x209, 1), 9);
}

#[test]
fn test_tag_distinguishes_addresses_in_same_entry() {
    let mut cache = enabled_cache();
    let mut bus = RamBus::new(0x10000);
    cache.fill_line(&mut bus, 0x0000_0410, 0);

    assert_eq!(cache.find_way(0x0000_0410), Some(0));
    assert_eq!(cache.find_way(0x0000_0810), None);
    assert_eq!(cache.find_way(0x0000_0420), None);
}

#[test]
fn test_lru_replacement_order_four_way() {
    let mut cache = enabled_cache();
    let address = 0x0000_0040;

    // Fresh entry: LRU = 0 selects way 3
    assert_eq!(cache.select_way::<false>(address), Some(3));
    cache.update_lru(address, 3);
    assert_eq!(cache.select_way::<false>(address), Some(2));
    cache.update_lru(address, 2);
    assert_eq!(cache.select_way::<false>(address), Some(1));
    cache.update_lru(address, 1);
    assert_eq!(cache.select_way::<false>(address), Some(0));
    cache.update_lru(address, 0);
    // Way 3 is now least recently used again
    assert_eq!(cache.select_way::<false>(address), Some(3));
}

#[test]
fn test_lru_update_bits() {
    let mut cache = enabled_cache();
    cache.update_lru(0, 3);
    assert_eq!(cache.lru(0), 0b001011);
    cache.update_lru(0, 0);
    assert_eq!(cache.lru(0), 0b000011);
    cache.update_lru(0, 1);
    assert_eq!(cache.lru(0), 0b100001);
    cache.update_lru(0, 2);
    assert_eq!(cache.lru(0), 0b110100);
}

#[test]
fn test_two_way_mode_uses_ways_two_and_three() {
    let mut cache = Cache::new();
    cache.write_ccr((CacheControl::CE | CacheControl::TW).bits());
    let address = 0x0000_0080;

    assert_eq!(cache.select_way::<false>(address), Some(3));
    cache.update_lru(address, 3);
    assert_eq!(cache.select_way::<false>(address), Some(2));
    cache.update_lru(address, 2);
    assert_eq!(cache.select_way::<false>(address), Some(3));

    let mut bus = RamBus::new(0x1000);
    cache.fill_line(&mut bus, address, 0);
    assert_eq!(cache.find_way(address), None, "ways 0-1 are RAM in two-way mode");
}

#[test]
fn test_replacement_disable_bits() {
    let mut cache = Cache::new();
    cache.write_ccr((CacheControl::CE | CacheControl::ID).bits());
    assert_eq!(cache.select_way::<true>(0), None);
    assert!(cache.select_way::<false>(0).is_some());

    cache.write_ccr((CacheControl::CE | CacheControl::OD).bits());
    assert!(cache.select_way::<true>(0).is_some());
    assert_eq!(cache.select_way::<false>(0), None);
}

#[test]
fn test_write_line_updates_cached_copy() {
    let mut cache = enabled_cache();
    let mut bus = RamBus::new(0x1000);
    cache.fill_line(&mut bus, 0x300, 2);
    cache.write_line::<u16>(0x302, 2, 0xBEEF);
    assert_eq!(cache.read_line::<u32>(0x300, 2), 0x0000_BEEF);
}
