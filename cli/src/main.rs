use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use backing_studio::config::{ConfigError, EngineConfig};
use backing_studio::coords::{CoordinateSystem, Point};
use backing_studio::doc::DocStore;
use backing_studio::engine::EngineCore;
use backing_studio::manipulate::{Alignment, DistributeAxis};
use backing_studio::measure::label_for;
use backing_studio::project::ProjectError;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("project error: {0}")]
    Project(#[from] ProjectError),
    #[error("{command} needs at least {needed} placements, project has {found}")]
    TooFewPlacements { command: &'static str, needed: usize, found: usize },
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "backing-cli", about = "Inspect and batch-edit backing project files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a project: counts per type and status plus the placement extent in drawing units.
    Inspect {
        #[arg(env = "BACKING_PROJECT")]
        project: PathBuf,
    },
    /// Align every placement in a project.
    Align {
        #[arg(env = "BACKING_PROJECT")]
        project: PathBuf,
        #[arg(long, help = "left, center-v, right, top, center-h or bottom")]
        mode: Alignment,
        #[arg(long, help = "Write here instead of overwriting the input")]
        output: Option<PathBuf>,
    },
    /// Space every placement in a project evenly along one axis.
    Distribute {
        #[arg(env = "BACKING_PROJECT")]
        project: PathBuf,
        #[arg(long, help = "horizontal or vertical")]
        axis: DistributeAxis,
        #[arg(long, help = "Write here instead of overwriting the input")]
        output: Option<PathBuf>,
    },
    /// Print the distance between two drawing points in feet and inches.
    Measure {
        #[arg(allow_negative_numbers = true)]
        x1: f64,
        #[arg(allow_negative_numbers = true)]
        y1: f64,
        #[arg(allow_negative_numbers = true)]
        x2: f64,
        #[arg(allow_negative_numbers = true)]
        y2: f64,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = EngineConfig::from_env()?;
    match cli.command {
        Command::Inspect { project } => run_inspect(config, &project),
        Command::Align { project, mode, output } => run_align(config, &project, mode, output.as_deref()),
        Command::Distribute { project, axis, output } => run_distribute(config, &project, axis, output.as_deref()),
        Command::Measure { x1, y1, x2, y2 } => run_measure(&config, Point::new(x1, y1), Point::new(x2, y2)),
    }
}

// =============================================================
// Commands
// =============================================================

fn run_inspect(config: EngineConfig, path: &Path) -> Result<(), CliError> {
    let (engine, doc) = open_project(config, path)?;

    let mut by_type: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    for placement in doc.placements() {
        *by_type.entry(placement.backing_type.label()).or_default() += 1;
        let status = serde_json::to_value(placement.status)?;
        *by_status.entry(status.as_str().unwrap_or_default().to_owned()).or_default() += 1;
    }
    let extent = doc.extent(&engine.coords).map(|r| json!({ "x": r.x, "y": r.y, "width": r.width, "height": r.height }));

    print_json(&json!({
        "placements": doc.len(),
        "by_type": by_type,
        "by_status": by_status,
        "extent": extent,
    }))
}

fn run_align(config: EngineConfig, path: &Path, mode: Alignment, output: Option<&Path>) -> Result<(), CliError> {
    let (mut engine, mut doc) = open_project(config, path)?;
    require_placements(&doc, "align", 2)?;
    engine.select_all(&doc);
    let actions = engine.align(&mut doc, mode);
    tracing::info!(?mode, changed = !actions.is_empty(), "align applied");
    write_project(&engine, &doc, output.unwrap_or(path))
}

fn run_distribute(
    config: EngineConfig,
    path: &Path,
    axis: DistributeAxis,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let (mut engine, mut doc) = open_project(config, path)?;
    require_placements(&doc, "distribute", 3)?;
    engine.select_all(&doc);
    let actions = engine.distribute(&mut doc, axis);
    tracing::info!(?axis, changed = !actions.is_empty(), "distribute applied");
    write_project(&engine, &doc, output.unwrap_or(path))
}

fn run_measure(config: &EngineConfig, start: Point, end: Point) -> Result<(), CliError> {
    let coords = CoordinateSystem::new(config.inches_per_unit);
    let label = label_for(&coords, start, end);
    print_json(&json!({
        "distance": start.distance_to(end),
        "label": label.text,
        "angle_deg": label.angle_deg,
    }))
}

// =============================================================
// Helpers
// =============================================================

fn open_project(config: EngineConfig, path: &Path) -> Result<(EngineCore, DocStore), CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    let mut engine = EngineCore::new(config);
    let mut doc = DocStore::new();
    engine.load_project(&mut doc, &text)?;
    tracing::info!(path = %path.display(), placements = doc.len(), "opened project");
    Ok((engine, doc))
}

fn require_placements(doc: &DocStore, command: &'static str, needed: usize) -> Result<(), CliError> {
    if doc.len() < needed {
        return Err(CliError::TooFewPlacements { command, needed, found: doc.len() });
    }
    Ok(())
}

fn write_project(engine: &EngineCore, doc: &DocStore, path: &Path) -> Result<(), CliError> {
    let json = engine.save_project(doc)?;
    std::fs::write(path, json).map_err(|source| CliError::Write { path: path.to_owned(), source })?;
    tracing::info!(path = %path.display(), "wrote project");
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
