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

use crate::domain::allocator::{AddressAllocator, IdAllocator, IdNumbering};
use crate::domain::config::GeneratorConf;
use crate::domain::template::Kind;
use crate::shared::error::{Result, TopologyError};
use std::net::Ipv4Addr;

/// Run-wide allocator state, threaded through every expansion step.
///
/// There is exactly one identifier allocator per expanded kind and one
/// address allocator per network-attached kind.
#[derive(Debug, Clone)]
pub struct ExpansionContext {
    container_ids: IdAllocator,
    pod_ids: IdAllocator,
    vnode_ids: IdAllocator,
    node_ids: IdAllocator,
    vnode_ips: AddressAllocator,
    node_ips: AddressAllocator,
}

impl ExpansionContext {
    pub fn new(numbering: IdNumbering, vnode_seed: Ipv4Addr, node_seed: Ipv4Addr) -> Self {
        Self {
            container_ids: IdAllocator::new(Kind::Container, numbering),
            pod_ids: IdAllocator::new(Kind::Pod, numbering),
            vnode_ids: IdAllocator::new(Kind::VNode, numbering),
            node_ids: IdAllocator::new(Kind::Node, numbering),
            vnode_ips: AddressAllocator::new(Kind::VNode, vnode_seed),
            node_ips: AddressAllocator::new(Kind::Node, node_seed),
        }
    }

    pub fn from_conf(conf: &GeneratorConf) -> Self {
        Self::new(conf.id_numbering, conf.vnode_ip, conf.node_ip)
    }

    pub fn next_id(&mut self, kind: Kind, key: &str) -> Result<String> {
        let ids = match kind {
            Kind::Container => &mut self.container_ids,
            Kind::Pod => &mut self.pod_ids,
            Kind::VNode => &mut self.vnode_ids,
            Kind::Node => &mut self.node_ids,
            Kind::Service => {
                return Err(TopologyError::validation(
                    "service templates are not expanded",
                ))
            }
        };
        Ok(ids.allocate(key))
    }

    /// Next address for an instance of `kind` expanded from template `key`.
    pub fn next_address(&mut self, kind: Kind, key: &str) -> Result<Ipv4Addr> {
        if !kind.is_network_attached() {
            return Err(TopologyError::validation(format!(
                "{} instances are not network attached",
                kind
            )));
        }
        match kind {
            Kind::VNode => self.vnode_ips.allocate(key),
            _ => self.node_ips.allocate(key),
        }
    }

    /// Ids issued so far for `kind`.
    pub fn issued(&self, kind: Kind) -> u64 {
        match kind {
            Kind::Container => self.container_ids.issued(),
            Kind::Pod => self.pod_ids.issued(),
            Kind::VNode => self.vnode_ids.issued(),
            Kind::Node => self.node_ids.issued(),
            Kind::Service => 0,
        }
    }
}

impl Default for ExpansionContext {
    fn default() -> Self {
        Self::from_conf(&GeneratorConf::default())
    }
}
