mod config;
mod document;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use floorplan::engine::{EngineCore, ViewMode};
use floorplan::export::{ExportError, ExportFormat, export};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::{ConfigError, PlanConfig};
use document::{AdjacencyReport, DocumentError, PlanDocument};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "planview", about = "Floor-plan layout, adjacency and export CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the placement for every room.
    Layout(PlanArgs),
    /// Print shared walls and unmatched declared neighbors.
    Adjacency(PlanArgs),
    /// Print the drawing primitives for a view.
    Scene(SceneArgs),
    /// Serialize a view as SVG or PNG.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Plan document: `{ rooms, placement?, annotations? }`.
    #[arg(long, short, env = "FLOORPLAN_INPUT")]
    input: PathBuf,

    /// Ignore cached positions and lay out every room again.
    #[arg(long)]
    arrange: bool,
}

#[derive(Args, Debug)]
struct SceneArgs {
    #[command(flatten)]
    plan: PlanArgs,

    #[arg(long, value_enum, default_value_t = ViewArg::Plan)]
    view: ViewArg,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// `svg` or `png`.
    #[arg(long, default_value = "svg")]
    format: String,

    /// Destination file; stdout when absent.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Plan,
    Isometric,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Plan => ViewMode::Plan,
            ViewArg::Isometric => ViewMode::Isometric,
        }
    }
}

fn main() -> Result<(), CliError> {
    let env_file = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    match env_file {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) => debug!(error = %e, "no environment file loaded"),
    }

    let cli = Cli::parse();
    let config = PlanConfig::from_env()?;

    match cli.command {
        Command::Layout(args) => run_layout(&config, &args),
        Command::Adjacency(args) => run_adjacency(&config, &args),
        Command::Scene(args) => run_scene(&config, &args),
        Command::Export(args) => run_export(&config, &args),
    }
}

fn open_session(config: &PlanConfig, args: &PlanArgs) -> Result<EngineCore, CliError> {
    let doc = PlanDocument::open(&args.input)?;
    let mut engine = EngineCore::with_settings(config.settings);
    engine.load(doc.rooms, doc.placement.as_ref());
    engine.load_annotations(doc.annotations);
    if args.arrange {
        engine.auto_arrange();
    }
    info!(input = %args.input.display(), rooms = engine.rooms.len(), edges = engine.adjacency().len(), "plan opened");
    Ok(engine)
}

fn run_layout(config: &PlanConfig, args: &PlanArgs) -> Result<(), CliError> {
    let engine = open_session(config, args)?;
    print_json(&engine.placement)
}

fn run_adjacency(config: &PlanConfig, args: &PlanArgs) -> Result<(), CliError> {
    let engine = open_session(config, args)?;
    print_json(&AdjacencyReport::new(engine.adjacency()))
}

fn run_scene(config: &PlanConfig, args: &SceneArgs) -> Result<(), CliError> {
    let mut engine = open_session(config, &args.plan)?;
    engine.set_view_mode(args.view.into());
    print_json(&engine.scene())
}

fn run_export(config: &PlanConfig, args: &ExportArgs) -> Result<(), CliError> {
    let format: ExportFormat = args.format.parse()?;
    let mut engine = open_session(config, &args.scene.plan)?;
    engine.set_view_mode(args.scene.view.into());
    let bytes = export(&engine.scene(), format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes)?;
            info!(path = %path.display(), %format, bytes = bytes.len(), "export written");
        }
        None => io::stdout().lock().write_all(&bytes)?,
    }
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
