//! Development tasks for topology-gen
//!
//! Usage: cargo xtask <command>
//!
//! - test: unit and integration tests
//! - demo: generate target/demo-<layout>.topo from demos/cluster.topo
//! - fmt / clippy: code hygiene
//! - ci: fmt check, clippy, tests, then the demo in both layouts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const LAYOUTS: [&str; 2] = ["emission", "grouped"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for topology-gen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run unit and integration tests
    Test,
    /// Generate a topology from the bundled demo templates
    Demo {
        /// emission or grouped
        #[arg(long, default_value = "emission")]
        layout: String,
    },
    /// Format the workspace
    Fmt {
        /// Only report unformatted files
        #[arg(long)]
        check: bool,
    },
    /// Lint with warnings denied
    Clippy,
    /// Everything a change must pass before merge
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = project_root()?;
    let sh = Shell::new()?;
    sh.change_dir(&root);

    match cli.command {
        Commands::Test => test(&sh),
        Commands::Demo { layout } => demo(&sh, &root, &layout),
        Commands::Fmt { check } => fmt(&sh, check),
        Commands::Clippy => clippy(&sh),
        Commands::Ci => ci(&sh, &root),
    }
}

fn test(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo test --package topology-gen").run()?;
    Ok(())
}

fn demo(sh: &Shell, root: &Path, layout: &str) -> Result<()> {
    let input = root.join("demos/cluster.topo");
    let config = root.join("demos/generator.toml");
    let output = root.join(format!("target/demo-{}.topo", layout));
    sh.create_dir(root.join("target"))?;

    cmd!(
        sh,
        "cargo run --quiet --bin topology-gen -- {input} {output} --config-file {config} --layout {layout} --summary"
    )
    .run()
    .with_context(|| format!("demo generation failed for the {} layout", layout))?;

    println!("📦 {}", output.display());
    Ok(())
}

fn fmt(sh: &Shell, check: bool) -> Result<()> {
    let check = check.then_some("--check");
    cmd!(sh, "cargo fmt --all -- {check...}").run()?;
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
    Ok(())
}

fn ci(sh: &Shell, root: &Path) -> Result<()> {
    fmt(sh, true)?;
    clippy(sh)?;
    test(sh)?;
    for layout in LAYOUTS {
        demo(sh, root, layout)?;
    }
    println!("✅ ci passed");
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the workspace root")
}
