//! CLI command definitions and handlers

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use servicegraph_core::{Catalog, Config, Session, Snapshot, UnknownParentPolicy};
use tracing::info;

/// One click on a service checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Check(String),
    Uncheck(String),
    Flip(String),
}

/// Parse `ID:on`, `ID:off` or a bare `ID` (flip).
fn parse_op(s: &str) -> Result<Op, String> {
    let op = match s.rsplit_once(':') {
        Some((id, "on")) => Op::Check(id.to_string()),
        Some((id, "off")) => Op::Uncheck(id.to_string()),
        _ => Op::Flip(s.to_string()),
    };
    match &op {
        Op::Check(id) | Op::Uncheck(id) | Op::Flip(id) if id.is_empty() => {
            Err(format!("'{}' does not name a service", s))
        }
        _ => Ok(op),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Servicegraph - pick dependent services and see the critical-path total
#[derive(Parser, Debug)]
#[command(name = "servicegraph")]
#[command(
    version,
    about = "Replay service selections against a dependency catalog and print the resulting totals",
    after_help = "\
Examples:
  servicegraph catalog.json a:on b:on          Check a, then b
  servicegraph catalog.json a b a              Click a, b, then a again
  servicegraph catalog.json --restore a,c c:off --format json"
)]
pub struct Cli {
    /// Catalog JSON file (list of entries or object keyed by id)
    pub catalog: PathBuf,

    /// Clicks to apply in order: ID:on, ID:off, or ID to flip
    #[arg(value_parser = parse_op)]
    pub ops: Vec<Op>,

    /// Previously selected ids, re-applied before the clicks
    #[arg(long, value_delimiter = ',')]
    pub restore: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Engine config JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drop dependencies on services missing from the catalog
    #[arg(long)]
    pub ignore_unknown_parents: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Config::from_json(&json).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };
    if cli.ignore_unknown_parents {
        config = config.with_unknown_parents(UnknownParentPolicy::Ignore);
    }
    Ok(config)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let json = fs::read_to_string(&cli.catalog)
        .with_context(|| format!("reading catalog {}", cli.catalog.display()))?;
    let catalog = Catalog::from_json(&json)
        .with_context(|| format!("parsing catalog {}", cli.catalog.display()))?;
    let mut session = Session::from_catalog(&catalog, &config)
        .with_context(|| format!("building graph from {}", cli.catalog.display()))?;
    info!(services = catalog.len(), "catalog loaded");

    if !cli.restore.is_empty() {
        session.restore(&cli.restore).context("restoring selection")?;
    }

    for op in &cli.ops {
        let applied = match op {
            Op::Check(id) => session.toggle(id, true),
            Op::Uncheck(id) => session.toggle(id, false),
            Op::Flip(id) => session.flip(id),
        };
        applied.with_context(|| format!("applying {:?}", op))?;
    }

    let snapshot = session.snapshot();
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print!("{}", render_text(&session, &snapshot)),
    }
    Ok(())
}

fn render_text(session: &Session, snapshot: &Snapshot) -> String {
    let width = snapshot
        .nodes
        .iter()
        .map(|node| node.id.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for view in &snapshot.nodes {
        let mark = if view.checked { "[x]" } else { "[ ]" };
        let disabled = if view.enabled { "" } else { "disabled" };
        let duration = session
            .graph()
            .get(view.id.as_str())
            .map(|node| node.duration().to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{mark} {:<width$}  {:<8}  {duration}", view.id.as_str(), disabled);
    }

    let _ = writeln!(
        out,
        "total: {} days, {} work days",
        snapshot.total.primary, snapshot.total.secondary
    );
    if !snapshot.critical_path.is_empty() {
        let chain: Vec<&str> = snapshot.critical_path.iter().map(|id| id.as_str()).collect();
        let _ = writeln!(out, "critical path: {}", chain.join(" -> "));
    }
    out
}
