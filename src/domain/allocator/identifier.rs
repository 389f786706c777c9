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
use crate::shared::error::TopologyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the numeric suffix of an instance id is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdNumbering {
    /// One counter per kind, shared by every key of that kind: `a-1, b-2, a-3`.
    #[default]
    Shared,
    /// One counter per key: `a-1, b-1, a-2`.
    PerKey,
}

impl std::str::FromStr for IdNumbering {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(IdNumbering::Shared),
            "per-key" => Ok(IdNumbering::PerKey),
            _ => Err(TopologyError::ConfigError(format!(
                "Invalid id numbering: {} (expected 'shared' or 'per-key')",
                s
            ))),
        }
    }
}

/// Issues `"{key}-{n}"` identifiers for one kind.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    kind: Kind,
    numbering: IdNumbering,
    counter: u64,
    per_key: HashMap<String, u64>,
}

impl IdAllocator {
    pub fn new(kind: Kind, numbering: IdNumbering) -> Self {
        Self {
            kind,
            numbering,
            counter: 0,
            per_key: HashMap::new(),
        }
    }

    pub fn allocate(&mut self, key: &str) -> String {
        self.counter += 1;
        let suffix = match self.numbering {
            IdNumbering::Shared => self.counter,
            IdNumbering::PerKey => {
                let n = self.per_key.entry(key.to_string()).or_insert(0);
                *n += 1;
                *n
            }
        };
        format!("{}-{}", key, suffix)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Total ids issued so far, across all keys.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}
