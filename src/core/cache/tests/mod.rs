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

//! Cache unit tests
//!
//! - `lookup`: tag matching, line fill and replacement
//! - `arrays`: address/data array access and purges

use super::*;
use crate::core::memory::RamBus;

mod lookup;

fn enabled_cache() -> Cache {
    let mut cache = Cache::new();
    cache.write_ccr(CacheControl::CE.bits());
    cache
}
