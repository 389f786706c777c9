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

use super::generator::{GeneratorConf, OutputLayout};
use crate::domain::allocator::IdNumbering;
use crate::shared::error::{Result, TopologyError};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use tracing::warn;

pub const KEY_VNODE_IP: &str = "generator.vnode-ip";
pub const KEY_NODE_IP: &str = "generator.node-ip";
pub const KEY_ID_NUMBERING: &str = "generator.id-numbering";
pub const KEY_LAYOUT: &str = "generator.layout";

const KNOWN_KEYS: [&str; 4] = [KEY_VNODE_IP, KEY_NODE_IP, KEY_ID_NUMBERING, KEY_LAYOUT];

/// Parse `-D key=value` properties into a map.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(TopologyError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(TopologyError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_generator_conf(
    configs: &HashMap<String, String>,
    conf: &mut GeneratorConf,
) -> Result<()> {
    if let Some(ip) = configs.get(KEY_VNODE_IP) {
        conf.vnode_ip = parse_ip(KEY_VNODE_IP, ip)?;
    }

    if let Some(ip) = configs.get(KEY_NODE_IP) {
        conf.node_ip = parse_ip(KEY_NODE_IP, ip)?;
    }

    if let Some(numbering) = configs.get(KEY_ID_NUMBERING) {
        conf.id_numbering = numbering.parse::<IdNumbering>()?;
    }

    if let Some(layout) = configs.get(KEY_LAYOUT) {
        conf.layout = layout.parse::<OutputLayout>()?;
    }

    for key in configs.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!("Ignoring unknown property: {}", key);
        }
    }

    Ok(())
}

fn parse_ip(key: &str, value: &str) -> Result<Ipv4Addr> {
    value.parse::<Ipv4Addr>().map_err(|e| {
        TopologyError::config_error(format!("Invalid IPv4 address for {}: '{}' ({})", key, value, e))
    })
}
