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

//! Writer for the generated topology file

use super::constants::{
    COMMENT_PREFIX, CONTAINER_SECTION, FIELD_SEPARATOR, NODE_SECTION, POD_SECTION,
    VNODE_SECTION,
};
use crate::domain::config::OutputLayout;
use crate::domain::expansion::{Instance, Topology};
use crate::domain::template::Kind;
use crate::shared::error::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Render one instance as its record line, without framing.
///
/// Parent records always end with the field separator after the ip (or id for
/// pods), so a record with no children keeps a trailing `", "`.
pub fn record_line(instance: &Instance) -> String {
    match instance {
        Instance::Container(c) => [
            Kind::Container.as_str().to_string(),
            c.id.clone(),
            c.cpu.limit.to_string(),
            c.cpu.used.to_string(),
            c.cpu.request.to_string(),
            c.mem.limit.to_string(),
            c.mem.used.to_string(),
            c.mem.request.to_string(),
            c.qps.limit.to_string(),
            c.qps.used.to_string(),
        ]
        .join(FIELD_SEPARATOR),
        Instance::Pod(p) => format!(
            "{}{sep}{}{sep}{}",
            Kind::Pod,
            p.id,
            p.containers.join(FIELD_SEPARATOR),
            sep = FIELD_SEPARATOR
        ),
        Instance::VNode(v) => format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            Kind::VNode,
            v.id,
            v.cpu,
            v.mem,
            v.ip,
            v.pods.join(FIELD_SEPARATOR),
            sep = FIELD_SEPARATOR
        ),
        Instance::Node(n) => format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            Kind::Node,
            n.id,
            n.cpu,
            n.mem,
            n.ip,
            n.vnodes.join(FIELD_SEPARATOR),
            sep = FIELD_SEPARATOR
        ),
    }
}

pub struct TopologyWriter {
    layout: OutputLayout,
}

impl TopologyWriter {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> OutputLayout {
        self.layout
    }

    pub fn render(&self, topology: &Topology) -> String {
        let mut out = String::new();
        match self.layout {
            OutputLayout::Emission => {
                for instance in topology.instances() {
                    push_framed(&mut out, instance);
                }
            }
            OutputLayout::Grouped => {
                for kind in Kind::EXPANDED {
                    out.push_str(section_header(kind));
                    out.push('\n');
                    for instance in topology.of_kind(kind) {
                        push_framed(&mut out, instance);
                    }
                    out.push('\n');
                }
            }
        }
        out
    }

    pub fn write_file(&self, topology: &Topology, path: &Path) -> Result<()> {
        let rendered = self.render(topology);
        debug!("Rendered {} bytes of topology output", rendered.len());
        fs::write(path, rendered)?;
        info!(
            "Wrote {} instances to {} ({:?} layout)",
            topology.len(),
            path.display(),
            self.layout
        );
        Ok(())
    }
}

fn section_header(kind: Kind) -> &'static str {
    match kind {
        Kind::Container => CONTAINER_SECTION,
        Kind::Pod => POD_SECTION,
        Kind::VNode => VNODE_SECTION,
        Kind::Node => NODE_SECTION,
        Kind::Service => "",
    }
}

fn push_framed(out: &mut String, instance: &Instance) {
    let trailing_blanks = match instance.kind() {
        Kind::VNode => 1,
        Kind::Node => 2,
        _ => 0,
    };
    if trailing_blanks > 0 {
        out.push(COMMENT_PREFIX);
        out.push(' ');
        out.push_str(instance.kind().as_str());
        out.push_str(FIELD_SEPARATOR);
        out.push_str(instance.id());
        out.push('\n');
    }
    out.push_str(&record_line(instance));
    out.push('\n');
    for _ in 0..trailing_blanks {
        out.push('\n');
    }
}
