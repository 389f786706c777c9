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

//! Template records: one typed variant per kind, validated once when the record
//! enters the store.

use crate::shared::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

// ============================================================================
// Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Container,
    Pod,
    VNode,
    Node,
    Service,
}

impl Kind {
    /// Kinds that take part in expansion, leaf first.
    pub const EXPANDED: [Kind; 4] = [Kind::Container, Kind::Pod, Kind::VNode, Kind::Node];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Container => "container",
            Kind::Pod => "pod",
            Kind::VNode => "vnode",
            Kind::Node => "node",
            Kind::Service => "service",
        }
    }

    /// Whether instances of this kind receive an IPv4 address.
    pub fn is_network_attached(&self) -> bool {
        matches!(self, Kind::VNode | Kind::Node)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = TopologyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "container" => Ok(Kind::Container),
            "pod" => Ok(Kind::Pod),
            "vnode" => Ok(Kind::VNode),
            "node" => Ok(Kind::Node),
            "service" => Ok(Kind::Service),
            _ => Err(TopologyError::validation(format!("unknown kind '{}'", s))),
        }
    }
}

// ============================================================================
// Resource attributes
// ============================================================================

/// `[limit, used, request]` triple as written in a container record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "[Number; 3]")]
pub struct Resource {
    pub limit: Number,
    pub used: Number,
    pub request: Number,
}

impl From<[Number; 3]> for Resource {
    fn from([limit, used, request]: [Number; 3]) -> Self {
        Self {
            limit,
            used,
            request,
        }
    }
}

/// `[limit, used]` pair for request throughput.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "[Number; 2]")]
pub struct Throughput {
    pub limit: Number,
    pub used: Number,
}

impl From<[Number; 2]> for Throughput {
    fn from([limit, used]: [Number; 2]) -> Self {
        Self { limit, used }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContainerTemplate {
    pub key: String,
    pub cpu: Resource,
    pub mem: Resource,
    pub qps: Throughput,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PodTemplate {
    pub key: String,
    pub containers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VNodeTemplate {
    pub key: String,
    pub cpu: Number,
    pub mem: Number,
    pub pods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeTemplate {
    pub key: String,
    pub cpu: Number,
    pub mem: Number,
    pub vnodes: Vec<String>,
    /// How many times the whole node subtree is instantiated.
    pub num: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceTemplate {
    pub key: String,
    #[serde(default)]
    pub pods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Template {
    Container(ContainerTemplate),
    Pod(PodTemplate),
    VNode(VNodeTemplate),
    Node(NodeTemplate),
    Service(ServiceTemplate),
}

impl Template {
    /// Validate an untyped record and convert it into its typed variant.
    ///
    /// The `kind` tag is checked first so that a missing or unknown tag is
    /// reported as such rather than as a generic shape mismatch.
    pub fn from_record(record: Value) -> Result<Self> {
        let kind = match record.get("kind") {
            None => return Err(TopologyError::validation("record has no kind tag")),
            Some(Value::String(tag)) => tag.parse::<Kind>()?,
            Some(other) => {
                return Err(TopologyError::validation(format!(
                    "kind tag must be a string, got {}",
                    other
                )))
            }
        };

        serde_json::from_value(record)
            .map_err(|e| TopologyError::validation(format!("invalid {} record: {}", kind, e)))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Template::Container(_) => Kind::Container,
            Template::Pod(_) => Kind::Pod,
            Template::VNode(_) => Kind::VNode,
            Template::Node(_) => Kind::Node,
            Template::Service(_) => Kind::Service,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Template::Container(t) => &t.key,
            Template::Pod(t) => &t.key,
            Template::VNode(t) => &t.key,
            Template::Node(t) => &t.key,
            Template::Service(t) => &t.key,
        }
    }
}
