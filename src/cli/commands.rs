// CLI command definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "topology-gen",
    version,
    about = "Generate virtual cluster topology fixtures",
    long_about = "Expands container, pod, vnode and node templates into a flat list of \
uniquely identified instances with sequential IPv4 addresses"
)]
pub struct CliArgs {
    /// Template file, one `<kind>, <json record>` per line
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where the generated topology is written
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Seed of the vnode address allocator (never issued itself)
    #[arg(long, value_name = "IPV4")]
    pub vnode_ip: Option<String>,

    /// Seed of the node address allocator (never issued itself)
    #[arg(long, value_name = "IPV4")]
    pub node_ip: Option<String>,

    /// Identifier numbering: `shared` (one counter per kind) or `per-key`
    #[arg(long, value_name = "MODE")]
    pub id_numbering: Option<String>,

    /// Output layout: `emission` or `grouped`
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<String>,

    /// Path to a TOML generator configuration file
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Keys: generator.vnode-ip, generator.node-ip, generator.id-numbering, generator.layout
    ///
    /// Example: -Dgenerator.node-ip=172.16.0.1 -Dgenerator.layout=grouped
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Print a per-kind summary table after generation
    #[arg(long)]
    pub summary: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(short = 'v', long, default_value = "info")]
    pub verbosity: String,
}
