//! The generate command: load templates, expand, write

use super::commands::CliArgs;
use super::display::{KindSummary, TableRenderer};
use crate::domain::allocator::IdNumbering;
use crate::domain::config::{apply_to_generator_conf, parse_dynamic_configs, GeneratorConf, OutputLayout};
use crate::domain::expansion::{ExpansionContext, ExpansionEngine};
use crate::domain::template::TemplateStore;
use crate::infrastructure::constants::EXIT_RECORDS_SKIPPED;
use crate::infrastructure::{TopologyReader, TopologyWriter};
use crate::shared::error::{Result, TopologyError};
use anyhow::Context;
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// Result of a run that produced an output file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub instances: usize,
    /// Node templates dropped because of unresolved references.
    pub skipped_templates: usize,
    /// Input lines dropped by the reader.
    pub rejected_lines: usize,
}

impl RunOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped_templates == 0 && self.rejected_lines == 0
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            0
        } else {
            EXIT_RECORDS_SKIPPED
        }
    }
}

impl CliArgs {
    /// Resolve the generator configuration.
    /// Priority: command line flag > -D property > config file > defaults.
    pub fn resolve_conf(&self) -> Result<GeneratorConf> {
        let mut conf = match self.config_file {
            Some(ref path) => {
                let conf = GeneratorConf::from_file(path)?;
                info!("Loaded generator configuration from {}", path.display());
                conf
            }
            None => GeneratorConf::default(),
        };

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties)?;
            apply_to_generator_conf(&dynamic_configs, &mut conf)?;
        }

        if let Some(ref ip) = self.vnode_ip {
            conf.vnode_ip = parse_seed("--vnode-ip", ip)?;
        }
        if let Some(ref ip) = self.node_ip {
            conf.node_ip = parse_seed("--node-ip", ip)?;
        }
        if let Some(ref numbering) = self.id_numbering {
            conf.id_numbering = numbering.parse::<IdNumbering>()?;
        }
        if let Some(ref layout) = self.layout {
            conf.layout = layout.parse::<OutputLayout>()?;
        }

        Ok(conf)
    }

    pub fn execute(&self) -> anyhow::Result<RunOutcome> {
        let conf = self.resolve_conf()?;
        info!(
            "Seeds: vnode {} node {}, {:?} numbering, {:?} layout",
            conf.vnode_ip, conf.node_ip, conf.id_numbering, conf.layout
        );

        let reader = TopologyReader::new()?;
        let mut store = TemplateStore::new();
        let load = reader
            .load_file(&self.input, &mut store)
            .with_context(|| format!("Failed to read templates from {}", self.input.display()))?;
        if store.is_empty() {
            warn!("No templates found in {}", self.input.display());
        }

        let mut ctx = ExpansionContext::from_conf(&conf);
        let expansion = ExpansionEngine::new(&store).expand(&mut ctx)?;

        TopologyWriter::new(conf.layout)
            .write_file(&expansion.topology, &self.output)
            .with_context(|| format!("Failed to write topology to {}", self.output.display()))?;

        if self.summary {
            let rows = KindSummary::collect(&store, &expansion.topology, &expansion.report.skipped);
            println!(
                "{}",
                TableRenderer::new().render_summary(
                    &rows,
                    &expansion.report.skipped,
                    load.rejected.len()
                )
            );
        }

        let outcome = RunOutcome {
            instances: expansion.topology.len(),
            skipped_templates: expansion.report.skipped.len(),
            rejected_lines: load.rejected.len(),
        };
        if !outcome.is_clean() {
            warn!(
                "{} template(s) skipped, {} line(s) rejected; output is incomplete",
                outcome.skipped_templates, outcome.rejected_lines
            );
        }
        Ok(outcome)
    }
}

fn parse_seed(flag: &str, value: &str) -> Result<Ipv4Addr> {
    value.parse::<Ipv4Addr>().map_err(|e| {
        TopologyError::config_error(format!("Invalid IPv4 address for {}: '{}' ({})", flag, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["topology-gen", "in.topo", "out.topo"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_flag_beats_property_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let conf_path = dir.path().join("gen.toml");
        fs::write(
            &conf_path,
            "vnode_ip = \"10.9.9.9\"\nnode_ip = \"172.16.0.1\"\nlayout = \"grouped\"\n",
        )
        .unwrap();

        let conf = args(&[
            "--config-file",
            conf_path.to_str().unwrap(),
            "-Dgenerator.node-ip=172.16.5.5",
            "-Dgenerator.layout=emission",
            "--layout",
            "grouped",
        ])
        .resolve_conf()
        .unwrap();

        assert_eq!(conf.vnode_ip, Ipv4Addr::new(10, 9, 9, 9));
        assert_eq!(conf.node_ip, Ipv4Addr::new(172, 16, 5, 5));
        assert_eq!(conf.layout, OutputLayout::Grouped);
    }

    #[test]
    fn test_invalid_seed_is_config_error() {
        let err = args(&["--vnode-ip", "10.1.1"]).resolve_conf().unwrap_err();
        assert!(matches!(err, TopologyError::ConfigError(_)));
    }

    #[test]
    fn test_outcome_exit_codes() {
        let clean = RunOutcome {
            instances: 6,
            skipped_templates: 0,
            rejected_lines: 0,
        };
        assert_eq!(clean.exit_code(), 0);

        let partial = RunOutcome {
            rejected_lines: 1,
            ..clean
        };
        assert_eq!(partial.exit_code(), EXIT_RECORDS_SKIPPED);
    }
}
