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

//! Generator configuration loaded from TOML

use crate::domain::allocator::IdNumbering;
use crate::infrastructure::constants::{DEFAULT_NODE_IP, DEFAULT_VNODE_IP};
use crate::shared::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::net::Ipv4Addr;
use std::path::Path;

/// Order in which generated records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// Records in the order expansion produced them.
    #[default]
    Emission,
    /// One section per kind, each introduced by a format comment.
    Grouped,
}

impl std::str::FromStr for OutputLayout {
    type Err = TopologyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "emission" => Ok(OutputLayout::Emission),
            "grouped" => Ok(OutputLayout::Grouped),
            _ => Err(TopologyError::ConfigError(format!(
                "Invalid layout: {} (expected 'emission' or 'grouped')",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConf {
    /// Seed of the vnode address allocator.
    pub vnode_ip: Ipv4Addr,
    /// Seed of the node address allocator.
    pub node_ip: Ipv4Addr,
    pub id_numbering: IdNumbering,
    pub layout: OutputLayout,
}

impl Default for GeneratorConf {
    fn default() -> Self {
        Self {
            vnode_ip: DEFAULT_VNODE_IP,
            node_ip: DEFAULT_NODE_IP,
            id_numbering: IdNumbering::default(),
            layout: OutputLayout::default(),
        }
    }
}

impl GeneratorConf {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            TopologyError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let conf = GeneratorConf::default();
        assert_eq!(conf.vnode_ip, Ipv4Addr::new(10, 1, 1, 1));
        assert_eq!(conf.node_ip, Ipv4Addr::new(200, 1, 1, 1));
        assert_eq!(conf.id_numbering, IdNumbering::Shared);
        assert_eq!(conf.layout, OutputLayout::Emission);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let conf = GeneratorConf::from_toml(
            r#"
            node_ip = "172.16.2.2"
            id_numbering = "per-key"
            "#,
        )
        .unwrap();
        assert_eq!(conf.node_ip, Ipv4Addr::new(172, 16, 2, 2));
        assert_eq!(conf.vnode_ip, DEFAULT_VNODE_IP);
        assert_eq!(conf.id_numbering, IdNumbering::PerKey);
        assert_eq!(conf.layout, OutputLayout::Emission);
    }

    #[test]
    fn test_bad_toml_values() {
        assert!(GeneratorConf::from_toml(r#"vnode_ip = "10.1.1""#).is_err());
        assert!(GeneratorConf::from_toml(r#"layout = "sideways""#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = GeneratorConf::from_file("/nonexistent/topology-gen.toml").unwrap_err();
        assert!(matches!(err, TopologyError::ConfigError(_)));
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("grouped".parse::<OutputLayout>().unwrap(), OutputLayout::Grouped);
        assert!("flat".parse::<OutputLayout>().is_err());
    }
}
