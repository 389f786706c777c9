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

use crate::domain::template::{Kind, Resource, Throughput};
use serde_json::Number;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInstance {
    pub id: String,
    pub cpu: Resource,
    pub mem: Resource,
    pub qps: Throughput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PodInstance {
    pub id: String,
    pub containers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VNodeInstance {
    pub id: String,
    pub cpu: Number,
    pub mem: Number,
    pub ip: Ipv4Addr,
    pub pods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeInstance {
    pub id: String,
    pub cpu: Number,
    pub mem: Number,
    pub ip: Ipv4Addr,
    pub vnodes: Vec<String>,
}

/// A concrete, uniquely identified realization of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    Container(ContainerInstance),
    Pod(PodInstance),
    VNode(VNodeInstance),
    Node(NodeInstance),
}

impl Instance {
    pub fn kind(&self) -> Kind {
        match self {
            Instance::Container(_) => Kind::Container,
            Instance::Pod(_) => Kind::Pod,
            Instance::VNode(_) => Kind::VNode,
            Instance::Node(_) => Kind::Node,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Instance::Container(c) => &c.id,
            Instance::Pod(p) => &p.id,
            Instance::VNode(v) => &v.id,
            Instance::Node(n) => &n.id,
        }
    }

    /// Ids of the child instances, in creation order.
    pub fn children(&self) -> &[String] {
        match self {
            Instance::Container(_) => &[],
            Instance::Pod(p) => &p.containers,
            Instance::VNode(v) => &v.pods,
            Instance::Node(n) => &n.vnodes,
        }
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        match self {
            Instance::VNode(v) => Some(v.ip),
            Instance::Node(n) => Some(n.ip),
            _ => None,
        }
    }
}

/// Instances produced by one run, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    instances: Vec<Instance>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, instances: Vec<Instance>) {
        self.instances.extend(instances);
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Instance> {
        self.instances.iter().filter(move |i| i.kind() == kind)
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn find(&self, id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
