#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating and inspecting circular cell mazes.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::Vec2;
use phage_maze_core::{CellAddress, MazeConfig, TopologyVariant};
use phage_maze_grid::query;
use phage_maze_system_generation::{GeneratedMaze, Generator};
use phage_maze_system_geometry::{MazeWall, WallShape};
use phage_maze_system_spawning::{Config as SpawnConfig, SpawnedCell, Spawning};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "phage-maze",
    version,
    about = "Generate and inspect circular cell mazes"
)]
struct Cli {
    /// Raise the default log level to debug; RUST_LOG takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze from a configuration file and flag overrides.
    Generate(GenerateArgs),
    /// Place non-overlapping cells around a point.
    Spawn(SpawnArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML file with `[maze]` and `[spawn]` tables.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of concentric rings.
    #[arg(long)]
    rings: Option<u32>,
    /// Random seed; zero draws a fresh one.
    #[arg(long)]
    seed: Option<u64>,
    /// Probability of staying within the current ring while carving.
    #[arg(long)]
    curviness: Option<f32>,
    /// Number of openings in the outermost ring.
    #[arg(long)]
    entrances: Option<u32>,
    /// Wall thickness in world units.
    #[arg(long)]
    wall_thickness: Option<f32>,
    /// Straight segments per arc wall.
    #[arg(long)]
    arc_resolution: Option<u32>,
    /// Use the classic ring layout instead of the refined one.
    #[arg(long)]
    classic: bool,
    /// How the generated maze is printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct SpawnArgs {
    /// TOML file with `[maze]` and `[spawn]` tables.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Horizontal coordinate of the focus point.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    x: f32,
    /// Vertical coordinate of the focus point.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    y: f32,
    /// Number of cells to place.
    #[arg(long)]
    count: Option<u32>,
    /// Random seed; zero draws a fresh one.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable overview.
    Summary,
    /// Every wall with its mesh and collider.
    Json,
    /// One merged mesh with one collider path per quad.
    Merged,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    maze: MazeConfig,
    spawn: SpawnConfig,
}

#[derive(Serialize)]
struct MazeReport<'a> {
    seed: u64,
    variant: TopologyVariant,
    cell_counts: &'a [u32],
    entrances: &'a [CellAddress],
    walls: &'a [MazeWall],
}

#[derive(Serialize)]
struct SpawnReport<'a> {
    seed: u64,
    cells: &'a [SpawnedCell],
}

/// Entry point for the phage maze command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate_command(args),
        Command::Spawn(args) => spawn_command(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    let config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse configuration {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn generate_command(args: GenerateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.maze;
    apply_overrides(&mut config, &args);

    let generator = Generator::new(config).context("invalid maze configuration")?;
    let maze = generator.generate();
    print_maze(&maze, args.format)
}

fn apply_overrides(config: &mut MazeConfig, args: &GenerateArgs) {
    if let Some(rings) = args.rings {
        config.rings = rings;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(curviness) = args.curviness {
        config.curviness = curviness;
    }
    if let Some(entrances) = args.entrances {
        config.entrances = entrances;
    }
    if let Some(thickness) = args.wall_thickness {
        config.wall_thickness = thickness;
    }
    if let Some(resolution) = args.arc_resolution {
        config.arc_resolution = resolution;
    }
    if args.classic {
        config.variant = TopologyVariant::Classic;
    }
}

fn spawn_command(args: SpawnArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?.spawn;
    if let Some(count) = args.count {
        config.count = count;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut spawning = Spawning::new(config).context("invalid spawn configuration")?;
    let mut cells = Vec::new();
    spawning.spawn(Vec2::new(args.x, args.y), &mut cells);

    let report = SpawnReport {
        seed: spawning.seed(),
        cells: &cells,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialise cells")?;
    println!("{json}");
    Ok(())
}

fn print_maze(maze: &GeneratedMaze, format: OutputFormat) -> Result<()> {
    let topology = maze.grid.topology();
    match format {
        OutputFormat::Summary => {
            let (arcs, spokes) = maze.geometry.walls().iter().fold((0, 0), |(arcs, spokes), wall| {
                match wall.shape() {
                    WallShape::Arc { .. } => (arcs + 1, spokes),
                    WallShape::Spoke { .. } => (arcs, spokes + 1),
                }
            });
            let entrances: Vec<String> = maze
                .entrances
                .iter()
                .map(|cell| format!("{}:{}", cell.ring(), cell.index()))
                .collect();

            println!("seed:       {}", maze.seed);
            println!("variant:    {:?}", topology.variant());
            println!("rings:      {} {:?}", topology.ring_count(), topology.cell_counts());
            println!("cells:      {}", maze.grid.len());
            println!("passages:   {}", query::open_connection_count(&maze.grid));
            println!("entrances:  {}", entrances.join(" "));
            println!(
                "walls:      {} ({arcs} arcs, {spokes} spokes)",
                maze.geometry.len()
            );
        }
        OutputFormat::Json => {
            let report = MazeReport {
                seed: maze.seed,
                variant: topology.variant(),
                cell_counts: topology.cell_counts(),
                entrances: &maze.entrances,
                walls: maze.geometry.walls(),
            };
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialise maze")?;
            println!("{json}");
        }
        OutputFormat::Merged => {
            let json = serde_json::to_string_pretty(&maze.geometry.merged())
                .context("failed to serialise merged geometry")?;
            println!("{json}");
        }
    }
    Ok(())
}
