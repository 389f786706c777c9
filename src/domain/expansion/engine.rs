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

//! Expansion of node templates into concrete instances.
//!
//! Every reference is instantiated afresh: a key listed twice yields two
//! independent subtrees, and each of the `num` repetitions of a node yields a
//! new copy of everything below it. Nothing is cached.

use super::context::ExpansionContext;
use super::instance::{
    ContainerInstance, Instance, NodeInstance, PodInstance, Topology, VNodeInstance,
};
use crate::domain::template::{Kind, NodeTemplate, TemplateStore};
use crate::shared::error::{Result, TopologyError};
use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};

/// A top-level template that produced no instances, and why.
#[derive(Debug)]
pub struct SkippedTemplate {
    pub kind: Kind,
    pub key: String,
    pub errors: Vec<TopologyError>,
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    pub skipped: Vec<SkippedTemplate>,
    /// Keys of service templates, which are stored but never expanded.
    pub ignored_services: Vec<String>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug)]
pub struct Expansion {
    pub topology: Topology,
    pub report: GenerationReport,
}

pub struct ExpansionEngine<'a> {
    store: &'a TemplateStore,
}

impl<'a> ExpansionEngine<'a> {
    pub fn new(store: &'a TemplateStore) -> Self {
        Self { store }
    }

    /// Expand every node template, in store order.
    ///
    /// A node template with a dangling reference anywhere below it is skipped
    /// before any id or address is spent on it. Address exhaustion aborts the
    /// whole run.
    #[instrument(skip_all, fields(nodes = self.store.count(Kind::Node)))]
    pub fn expand(&self, ctx: &mut ExpansionContext) -> Result<Expansion> {
        let mut topology = Topology::new();
        let mut report = GenerationReport::default();

        for service in self.store.services() {
            warn!("service '{}' is not expanded", service.key);
            report.ignored_services.push(service.key.clone());
        }

        for node in self.store.nodes() {
            let dangling = self.dangling_references(node);
            if !dangling.is_empty() {
                for err in &dangling {
                    error!("{}", err);
                }
                warn!(
                    "Skipping node '{}': {} unresolved reference(s)",
                    node.key,
                    dangling.len()
                );
                report.skipped.push(SkippedTemplate {
                    kind: Kind::Node,
                    key: node.key.clone(),
                    errors: dangling,
                });
                continue;
            }

            let mut emitted = Vec::new();
            match self.expand_node(ctx, node, &mut emitted) {
                Ok(()) => topology.extend(emitted),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    error!("{}", err);
                    report.skipped.push(SkippedTemplate {
                        kind: Kind::Node,
                        key: node.key.clone(),
                        errors: vec![err],
                    });
                }
            }
        }

        info!(
            "Generated {} containers, {} pods, {} vnodes, {} nodes",
            topology.count(Kind::Container),
            topology.count(Kind::Pod),
            topology.count(Kind::VNode),
            topology.count(Kind::Node)
        );

        Ok(Expansion { topology, report })
    }

    /// Every unresolvable reference in the containment tree below `node`.
    /// Each template is visited once, so a missing key is reported once.
    fn dangling_references(&self, node: &NodeTemplate) -> Vec<TopologyError> {
        let mut errors = Vec::new();
        let mut visited: HashSet<(Kind, &str)> = HashSet::new();

        for vnode_key in &node.vnodes {
            if !visited.insert((Kind::VNode, vnode_key.as_str())) {
                continue;
            }
            let Some(vnode) = self.store.vnode(vnode_key) else {
                errors.push(TopologyError::not_found(
                    Kind::VNode,
                    vnode_key,
                    Kind::Node,
                    &node.key,
                ));
                continue;
            };

            for pod_key in &vnode.pods {
                if !visited.insert((Kind::Pod, pod_key.as_str())) {
                    continue;
                }
                let Some(pod) = self.store.pod(pod_key) else {
                    errors.push(TopologyError::not_found(
                        Kind::Pod,
                        pod_key,
                        Kind::VNode,
                        &vnode.key,
                    ));
                    continue;
                };

                for container_key in &pod.containers {
                    if visited.insert((Kind::Container, container_key.as_str()))
                        && !self.store.contains(Kind::Container, container_key)
                    {
                        errors.push(TopologyError::not_found(
                            Kind::Container,
                            container_key,
                            Kind::Pod,
                            &pod.key,
                        ));
                    }
                }
            }
        }

        errors
    }

    #[instrument(level = "debug", skip(self, ctx, node, out), fields(node = %node.key, num = node.num))]
    fn expand_node(
        &self,
        ctx: &mut ExpansionContext,
        node: &NodeTemplate,
        out: &mut Vec<Instance>,
    ) -> Result<()> {
        if node.num == 0 {
            debug!("node '{}' has num = 0, nothing to generate", node.key);
        }

        for _ in 0..node.num {
            let vnodes = node
                .vnodes
                .iter()
                .map(|vnode_key| self.expand_vnode(ctx, &node.key, vnode_key, out))
                .collect::<Result<Vec<_>>>()?;

            let id = ctx.next_id(Kind::Node, &node.key)?;
            let ip = ctx.next_address(Kind::Node, &node.key)?;
            debug!("[node] {} at {}", id, ip);

            out.push(Instance::Node(NodeInstance {
                id,
                cpu: node.cpu.clone(),
                mem: node.mem.clone(),
                ip,
                vnodes,
            }));
        }

        Ok(())
    }

    fn expand_vnode(
        &self,
        ctx: &mut ExpansionContext,
        parent: &str,
        key: &str,
        out: &mut Vec<Instance>,
    ) -> Result<String> {
        let vnode = self
            .store
            .vnode(key)
            .ok_or_else(|| TopologyError::not_found(Kind::VNode, key, Kind::Node, parent))?;

        let pods = vnode
            .pods
            .iter()
            .map(|pod_key| self.expand_pod(ctx, &vnode.key, pod_key, out))
            .collect::<Result<Vec<_>>>()?;

        let id = ctx.next_id(Kind::VNode, key)?;
        let ip = ctx.next_address(Kind::VNode, key)?;

        out.push(Instance::VNode(VNodeInstance {
            id: id.clone(),
            cpu: vnode.cpu.clone(),
            mem: vnode.mem.clone(),
            ip,
            pods,
        }));
        Ok(id)
    }

    fn expand_pod(
        &self,
        ctx: &mut ExpansionContext,
        parent: &str,
        key: &str,
        out: &mut Vec<Instance>,
    ) -> Result<String> {
        let pod = self
            .store
            .pod(key)
            .ok_or_else(|| TopologyError::not_found(Kind::Pod, key, Kind::VNode, parent))?;

        let containers = pod
            .containers
            .iter()
            .map(|container_key| self.expand_container(ctx, &pod.key, container_key, out))
            .collect::<Result<Vec<_>>>()?;

        let id = ctx.next_id(Kind::Pod, key)?;
        out.push(Instance::Pod(PodInstance {
            id: id.clone(),
            containers,
        }));
        Ok(id)
    }

    fn expand_container(
        &self,
        ctx: &mut ExpansionContext,
        parent: &str,
        key: &str,
        out: &mut Vec<Instance>,
    ) -> Result<String> {
        let container = self
            .store
            .container(key)
            .ok_or_else(|| TopologyError::not_found(Kind::Container, key, Kind::Pod, parent))?;

        let id = ctx.next_id(Kind::Container, key)?;
        out.push(Instance::Container(ContainerInstance {
            id: id.clone(),
            cpu: container.cpu.clone(),
            mem: container.mem.clone(),
            qps: container.qps.clone(),
        }));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocator::IdNumbering;
    use serde_json::{json, Value};
    use std::net::Ipv4Addr;

    fn store(records: Vec<Value>) -> TemplateStore {
        let mut store = TemplateStore::new();
        for record in records {
            store.add(record).unwrap();
        }
        store
    }

    fn container(key: &str) -> Value {
        json!({"kind": "container", "key": key, "cpu": [1, 1, 1], "mem": [1, 1, 1], "qps": [1, 1]})
    }

    fn pod(key: &str, containers: &[&str]) -> Value {
        json!({"kind": "pod", "key": key, "containers": containers})
    }

    fn vnode(key: &str, pods: &[&str]) -> Value {
        json!({"kind": "vnode", "key": key, "cpu": 5200, "mem": 8192, "pods": pods})
    }

    fn node(key: &str, num: u32, vnodes: &[&str]) -> Value {
        json!({"kind": "node", "key": key, "cpu": 10400, "mem": 16384, "vnodes": vnodes, "num": num})
    }

    fn expand(store: &TemplateStore) -> Expansion {
        ExpansionEngine::new(store)
            .expand(&mut ExpansionContext::default())
            .unwrap()
    }

    fn ids(topology: &Topology, kind: Kind) -> Vec<String> {
        topology.of_kind(kind).map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn test_minimal_cluster() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1", "c1"]),
            vnode("v1", &["p1"]),
            node("node1", 1, &["v1"]),
        ]);
        let expansion = expand(&store);
        let topology = &expansion.topology;

        assert!(expansion.report.is_clean());
        assert_eq!(ids(topology, Kind::Container), vec!["c1-1", "c1-2"]);
        assert_eq!(
            topology.find("p1-1").unwrap().children().to_vec(),
            vec!["c1-1", "c1-2"]
        );

        let vnode = topology.find("v1-1").unwrap();
        assert_eq!(vnode.ip(), Some(Ipv4Addr::new(10, 1, 1, 2)));
        assert_eq!(vnode.children().to_vec(), vec!["p1-1"]);

        let node = topology.find("node1-1").unwrap();
        assert_eq!(node.ip(), Some(Ipv4Addr::new(200, 1, 1, 2)));
        assert_eq!(node.children().to_vec(), vec!["v1-1"]);
    }

    #[test]
    fn test_emission_order_is_bottom_up() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1"]),
            vnode("v1", &["p1", "p1"]),
            node("n", 1, &["v1"]),
        ]);
        let expansion = expand(&store);
        let order: Vec<_> = expansion
            .topology
            .instances()
            .iter()
            .map(|i| i.id().to_string())
            .collect();
        assert_eq!(order, vec!["c1-1", "p1-1", "c1-2", "p1-2", "v1-1", "n-1"]);
    }

    #[test]
    fn test_num_repeats_whole_subtree() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1"]),
            vnode("v1", &["p1"]),
            node("n", 3, &["v1"]),
        ]);
        let topology = expand(&store).topology;

        assert_eq!(ids(&topology, Kind::Node), vec!["n-1", "n-2", "n-3"]);
        let vnode_children: Vec<_> = topology
            .of_kind(Kind::Node)
            .map(|n| n.children().to_vec())
            .collect();
        assert_eq!(vnode_children, vec![vec!["v1-1"], vec!["v1-2"], vec!["v1-3"]]);
        assert_eq!(topology.count(Kind::Container), 3);
    }

    #[test]
    fn test_container_count_is_product_of_multiplicities() {
        // vnode1 holds 2x p1 + 1x p2, p1 holds 2 containers, p2 holds 3
        let store = store(vec![
            container("a"),
            container("b"),
            pod("p1", &["a", "b"]),
            pod("p2", &["a", "a", "b"]),
            vnode("v1", &["p1", "p1", "p2"]),
            node("n", 4, &["v1", "v1"]),
        ]);
        let topology = expand(&store).topology;

        let per_vnode = 2 * 2 + 3;
        assert_eq!(topology.count(Kind::Container), 4 * 2 * per_vnode);
        assert_eq!(topology.count(Kind::Pod), 4 * 2 * 3);
        assert_eq!(topology.count(Kind::VNode), 4 * 2);
        assert_eq!(topology.count(Kind::Node), 4);
    }

    #[test]
    fn test_ids_and_addresses_unique() {
        let store = store(vec![
            container("a"),
            pod("p", &["a", "a"]),
            vnode("v", &["p", "p"]),
            node("n1", 3, &["v", "v"]),
            node("n2", 2, &["v"]),
        ]);
        let topology = expand(&store).topology;

        let all_ids: HashSet<_> = topology
            .instances()
            .iter()
            .map(|i| (i.kind(), i.id()))
            .collect();
        assert_eq!(all_ids.len(), topology.len());

        for kind in [Kind::VNode, Kind::Node] {
            let ips: Vec<_> = topology.of_kind(kind).filter_map(|i| i.ip()).collect();
            let unique: HashSet<_> = ips.iter().collect();
            assert_eq!(unique.len(), ips.len());
        }
    }

    #[test]
    fn test_shared_counter_across_keys() {
        let store = store(vec![
            container("A"),
            container("B"),
            pod("p", &["A", "B", "A"]),
            vnode("v", &["p"]),
            node("n", 1, &["v"]),
        ]);
        let topology = expand(&store).topology;
        assert_eq!(ids(&topology, Kind::Container), vec!["A-1", "B-2", "A-3"]);
    }

    #[test]
    fn test_per_key_numbering() {
        let store = store(vec![
            container("A"),
            container("B"),
            pod("p", &["A", "B", "A"]),
            vnode("v", &["p"]),
            node("n", 1, &["v"]),
        ]);
        let mut ctx = ExpansionContext::new(
            IdNumbering::PerKey,
            Ipv4Addr::new(10, 1, 1, 1),
            Ipv4Addr::new(200, 1, 1, 1),
        );
        let topology = ExpansionEngine::new(&store).expand(&mut ctx).unwrap().topology;
        assert_eq!(ids(&topology, Kind::Container), vec!["A-1", "B-1", "A-2"]);
    }

    #[test]
    fn test_missing_reference_skips_only_that_node() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1"]),
            pod("broken", &["ghost", "ghost"]),
            vnode("v1", &["p1"]),
            vnode("v2", &["broken"]),
            node("bad", 2, &["v2", "missing-vnode"]),
            node("good", 1, &["v1"]),
        ]);
        let expansion = expand(&store);

        assert_eq!(expansion.report.skipped.len(), 1);
        let skipped = &expansion.report.skipped[0];
        assert_eq!(skipped.kind, Kind::Node);
        assert_eq!(skipped.key, "bad");
        // ghost is reported once, plus the missing vnode
        assert_eq!(skipped.errors.len(), 2);
        assert!(skipped
            .errors
            .iter()
            .all(|e| matches!(e, TopologyError::NotFound { .. })));

        // the good node is generated with fresh allocator state
        let topology = &expansion.topology;
        assert_eq!(ids(topology, Kind::Node), vec!["good-1"]);
        assert_eq!(ids(topology, Kind::Container), vec!["c1-1"]);
        assert_eq!(
            topology.find("good-1").unwrap().ip(),
            Some(Ipv4Addr::new(200, 1, 1, 2))
        );
    }

    #[test]
    fn test_zero_num_generates_nothing() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1"]),
            vnode("v1", &["p1"]),
            node("n", 0, &["v1"]),
        ]);
        let expansion = expand(&store);
        assert!(expansion.topology.is_empty());
        assert!(expansion.report.is_clean());
    }

    #[test]
    fn test_services_are_reported_not_expanded() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1"]),
            json!({"kind": "service", "key": "svc", "pods": ["p1"]}),
        ]);
        let expansion = expand(&store);
        assert!(expansion.topology.is_empty());
        assert_eq!(expansion.report.ignored_services, vec!["svc"]);
    }

    #[test]
    fn test_exhaustion_halts_the_run() {
        let store = store(vec![
            container("c1"),
            pod("p1", &["c1"]),
            vnode("v1", &["p1"]),
            node("n", 3, &["v1"]),
        ]);
        let mut ctx = ExpansionContext::new(
            IdNumbering::Shared,
            Ipv4Addr::new(10, 1, 1, 1),
            Ipv4Addr::new(254, 254, 254, 253),
        );

        let err = ExpansionEngine::new(&store).expand(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::AllocationExhausted { kind: Kind::Node, ref key, .. } if key == "n"
        ));
        assert!(err.to_string().contains("node 'n'"));
    }
}
