// Copyright 2025 JiangLong.
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

use crate::domain::template::Kind;
use crate::shared::error::{Result, TopologyError};
use std::net::Ipv4Addr;

/// Lowest octet value an allocator hands out.
pub const MIN_OCTET: u8 = 2;
/// Highest octet value an allocator hands out.
pub const MAX_OCTET: u8 = 254;

/// Sequential IPv4 allocator.
///
/// The address is an odometer over four octets: the last octet is bumped, and an
/// octet that would pass [`MAX_OCTET`] rolls over to [`MIN_OCTET`] and carries
/// into its left neighbour. A carry out of the first octet means the space is
/// used up; that is reported as [`TopologyError::AllocationExhausted`].
#[derive(Debug, Clone)]
pub struct AddressAllocator {
    kind: Kind,
    last: [u8; 4],
    issued: u64,
}

impl AddressAllocator {
    /// The seed is the state before the first call; it is never issued itself.
    pub fn new(kind: Kind, seed: Ipv4Addr) -> Self {
        Self {
            kind,
            last: seed.octets(),
            issued: 0,
        }
    }

    /// Issue the next address for an instance of template `key`. The key only
    /// feeds the exhaustion diagnostic.
    pub fn allocate(&mut self, key: &str) -> Result<Ipv4Addr> {
        let mut octets = self.last;

        for i in (0..octets.len()).rev() {
            if octets[i] < MAX_OCTET {
                octets[i] += 1;
                self.last = octets;
                self.issued += 1;
                return Ok(Ipv4Addr::from(octets));
            }
            octets[i] = MIN_OCTET;
        }

        Err(TopologyError::AllocationExhausted {
            kind: self.kind,
            key: key.to_string(),
            last: Ipv4Addr::from(self.last),
        })
    }

    /// The most recently issued address, or the seed before the first call.
    pub fn last(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.last)
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}
