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
use std::net::Ipv4Addr;
use thiserror::Error;
pub type Result<T> = std::result::Result<T, TopologyError>;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Reference error: {kind} '{key}' not found (referenced by {parent_kind} '{parent_key}')")]
    NotFound {
        kind: Kind,
        key: String,
        parent_kind: Kind,
        parent_key: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed input at line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Address space exhausted: no valid {kind} address follows {last} (needed by {kind} '{key}')")]
    AllocationExhausted {
        kind: Kind,
        key: String,
        last: Ipv4Addr,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl TopologyError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn validation(context: impl Into<String>) -> Self {
        Self::ValidationError(context.into())
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            reason: reason.into(),
        }
    }

    pub fn not_found(
        kind: Kind,
        key: impl Into<String>,
        parent_kind: Kind,
        parent_key: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
            parent_kind,
            parent_key: parent_key.into(),
        }
    }

    /// Fatal errors halt the whole run; everything else only drops the offending record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AllocationExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_both_sides() {
        let err = TopologyError::not_found(Kind::Pod, "pod-x", Kind::VNode, "vnode1");
        let msg = err.to_string();
        assert!(msg.contains("pod 'pod-x'"));
        assert!(msg.contains("vnode 'vnode1'"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_exhaustion_is_fatal() {
        let err = TopologyError::AllocationExhausted {
            kind: Kind::Node,
            key: "rack-a".to_string(),
            last: Ipv4Addr::new(254, 254, 254, 254),
        };
        assert!(err.is_fatal());
        let msg = err.to_string();
        assert!(msg.contains("254.254.254.254"));
        assert!(msg.contains("node 'rack-a'"));
    }
}
