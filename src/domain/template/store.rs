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

use super::record::{
    ContainerTemplate, Kind, NodeTemplate, PodTemplate, ServiceTemplate, Template, VNodeTemplate,
};
use crate::shared::error::Result;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Templates of one kind, iterated in first-insertion order.
#[derive(Debug, Clone)]
struct Section<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T> Section<T> {
    /// Returns true when an existing template was replaced.
    fn insert(&mut self, key: &str, template: T) -> bool {
        let replaced = self.entries.insert(key.to_string(), template).is_some();
        if !replaced {
            self.order.push(key.to_string());
        }
        replaced
    }

    fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|key| self.entries.get(key))
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// All input templates, grouped by kind and keyed by their user-supplied key.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    containers: Section<ContainerTemplate>,
    pods: Section<PodTemplate>,
    vnodes: Section<VNodeTemplate>,
    nodes: Section<NodeTemplate>,
    services: Section<ServiceTemplate>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an untyped record and store it. Returns the record's kind.
    pub fn add(&mut self, record: Value) -> Result<Kind> {
        let template = Template::from_record(record)?;
        Ok(self.insert(template))
    }

    /// Store an already-typed template. A second template with the same kind
    /// and key replaces the first but keeps its position.
    pub fn insert(&mut self, template: Template) -> Kind {
        let kind = template.kind();
        let key = template.key().to_string();

        let replaced = match template {
            Template::Container(t) => self.containers.insert(&key, t),
            Template::Pod(t) => self.pods.insert(&key, t),
            Template::VNode(t) => self.vnodes.insert(&key, t),
            Template::Node(t) => self.nodes.insert(&key, t),
            Template::Service(t) => self.services.insert(&key, t),
        };

        if replaced {
            warn!("{} '{}' defined more than once, keeping the last definition", kind, key);
        } else {
            debug!("[{}] {}", kind, key);
        }
        kind
    }

    pub fn container(&self, key: &str) -> Option<&ContainerTemplate> {
        self.containers.get(key)
    }

    pub fn pod(&self, key: &str) -> Option<&PodTemplate> {
        self.pods.get(key)
    }

    pub fn vnode(&self, key: &str) -> Option<&VNodeTemplate> {
        self.vnodes.get(key)
    }

    pub fn node(&self, key: &str) -> Option<&NodeTemplate> {
        self.nodes.get(key)
    }

    pub fn service(&self, key: &str) -> Option<&ServiceTemplate> {
        self.services.get(key)
    }

    /// Whether a template of `kind` is stored under `key`.
    pub fn contains(&self, kind: Kind, key: &str) -> bool {
        match kind {
            Kind::Container => self.containers.get(key).is_some(),
            Kind::Pod => self.pods.get(key).is_some(),
            Kind::VNode => self.vnodes.get(key).is_some(),
            Kind::Node => self.nodes.get(key).is_some(),
            Kind::Service => self.services.get(key).is_some(),
        }
    }

    /// Node templates in insertion order; this order drives expansion.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeTemplate> {
        self.nodes.iter()
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceTemplate> {
        self.services.iter()
    }

    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Container => self.containers.len(),
            Kind::Pod => self.pods.len(),
            Kind::VNode => self.vnodes.len(),
            Kind::Node => self.nodes.len(),
            Kind::Service => self.services.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Kind::EXPANDED
            .iter()
            .chain(std::iter::once(&Kind::Service))
            .all(|kind| self.count(*kind) == 0)
    }
}
