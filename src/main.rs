use anyhow::{bail, Result};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use chessboard_viewer::assets::{fetch_all, planned_fetches, FetchRole};
use chessboard_viewer::core::ViewerConfig;
use chessboard_viewer::rendering::{plan_placement, SkipReason, TemplateRegistry, STARTING_LAYOUT};
use chessboard_viewer::ChessboardPlugins;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const WINDOW_WIDTH: u32 = 1366;
const WINDOW_HEIGHT: u32 = 768;

const LOG_FILTER: &str = "wgpu=warn,naga=error,chessboard_viewer=info";

#[derive(Parser, Debug)]
#[command(name = "chessboard-viewer", version, about = "Interactive 3D chessboard viewer")]
struct Cli {
    /// Config file (defaults to viewer.json in the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board OBJ, URL or path; overrides the config
    #[arg(long)]
    board: Option<String>,

    /// Pieces OBJ, URL or path; repeatable, overrides the config
    #[arg(long)]
    pieces: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every model, print the templates and the placement plan, then exit
    Inspect,
}

impl Cli {
    fn apply_overrides(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(board) = &self.board {
            config.board_source = board.as_str().into();
        }
        if !self.pieces.is_empty() {
            config.piece_sources = self.pieces.iter().map(|p| p.as_str().into()).collect();
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Some(Command::Inspect) => inspect(&cli),
        None => {
            run_viewer(&cli);
            Ok(())
        }
    }
}

fn run_viewer(cli: &Cli) {
    let window = Window {
        title: "Chessboard Viewer".to_string(),
        resolution: (WINDOW_WIDTH, WINDOW_HEIGHT).into(),
        fit_canvas_to_parent: true,
        ..default()
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window),
                ..default()
            })
            .set(LogPlugin {
                filter: LOG_FILTER.to_string(),
                ..default()
            }),
    );

    // Loaded after LogPlugin so config warnings reach the log
    let config = cli.apply_overrides(ViewerConfig::load_or_default(cli.config.as_deref()));
    app.insert_resource(config)
        .add_plugins(ChessboardPlugins)
        .run();
}

/// Headless run: fetch everything, report templates and the placement plan
fn inspect(cli: &Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let _span = tracing::info_span!("inspect").entered();

    let config = cli.apply_overrides(ViewerConfig::load_or_default(cli.config.as_deref()));
    let fetches = planned_fetches(&config);
    let sources = fetches.iter().map(|(_, source)| source.clone()).collect();
    let results = futures::executor::block_on(fetch_all(sources));

    let mut registry = TemplateRegistry::default();
    for ((role, _), (source, result)) in fetches.iter().zip(results) {
        match result {
            Ok(model) => {
                println!(
                    "{:?} {}: {} objects, {} vertices",
                    role,
                    source,
                    model.objects.len(),
                    model.vertex_count()
                );
                if *role == FetchRole::Pieces {
                    registry.register_model(&model);
                }
            }
            Err(e) => println!("{:?} {}: FAILED ({})", role, source, e),
        }
    }

    println!("\nTemplates ({}):", registry.len());
    for name in registry.names() {
        println!("  {}", name);
    }

    if registry.is_empty() {
        bail!("no piece templates could be loaded from {} source(s)", config.piece_sources.len());
    }
    let plan = plan_placement(
        &registry,
        &config.naming,
        &config.piece_scale,
        &config.board_geometry(),
        &STARTING_LAYOUT,
    )?;

    println!(
        "\nPlacement: {}/{} placed",
        plan.placements.len(),
        STARTING_LAYOUT.len()
    );
    for placement in &plan.placements {
        let e = placement.entry;
        let t = placement.transform;
        println!(
            "  {} {} ({}, {}) <- {} at {:.2?} scale {:.4}",
            e.color, e.kind, e.file, e.rank, placement.template, t.translation, t.scale.x
        );
    }
    for skipped in &plan.skipped {
        let e = skipped.entry;
        let reason = match &skipped.reason {
            SkipReason::MissingTemplate { key } => format!("no template `{}`", key),
            SkipReason::DegenerateGeometry {
                expected_min,
                actual,
            } => format!(
                "degenerate geometry ({} vertices, need a multiple of {})",
                actual, expected_min
            ),
        };
        println!("  SKIPPED {} {} ({}, {}): {}", e.color, e.kind, e.file, e.rank, reason);
    }
    Ok(())
}
