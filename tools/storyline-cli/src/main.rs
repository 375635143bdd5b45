//! Storyline CLI — Command-line access to the timeline engine.
//!
//! Usage:
//!   storyline import <SCENES>              Convert scenes and show the timeline
//!   storyline roundtrip <SCENES>           Scenes -> project -> scenes
//!   storyline replay <SCENES> <SCRIPT>     Apply a JSONL edit script
//!   storyline snap <SCENES> --time <T>     Run a snap query

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use storyline_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "storyline",
    about = "Scene-based timeline editing from the command line",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a scene list and print the resulting timeline
    Import {
        /// Path to the scene list (JSON array)
        path: PathBuf,

        /// Narrator video spanning every scene
        #[arg(long)]
        narrator: Option<String>,
    },

    /// Convert scenes to a project and back, printing the scene JSON
    Roundtrip {
        /// Path to the scene list (JSON array)
        path: PathBuf,

        /// Narrator video spanning every scene
        #[arg(long)]
        narrator: Option<String>,

        /// Write the scenes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a JSONL script of actions and key events
    Replay {
        /// Path to the scene list (JSON array)
        scenes: PathBuf,

        /// Path to the JSONL script
        script: PathBuf,

        /// Narrator video spanning every scene
        #[arg(long)]
        narrator: Option<String>,

        /// Write the re-synchronized scenes here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask where a dragged time or clip would snap
    Snap {
        /// Path to the scene list (JSON array)
        path: PathBuf,

        /// Proposed time (seconds)
        #[arg(long)]
        time: f64,

        /// Timeline zoom in pixels per second
        #[arg(long, default_value = "100")]
        pps: f64,

        /// Clip being dragged; its own edges are excluded
        #[arg(long)]
        clip: Option<String>,

        /// Treat the query as a trim of this edge of --clip
        #[arg(long, value_enum, requires = "clip")]
        edge: Option<EdgeArg>,

        /// Enable frame-grid snapping
        #[arg(long)]
        frame_snap: bool,

        /// Narrator video spanning every scene
        #[arg(long)]
        narrator: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeArg {
    Start,
    End,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    storyline_common::logging::init_logging(&config.logging);

    let defaults = config.editor;
    match cli.command {
        Commands::Import { path, narrator } => commands::import::run(path, narrator, &defaults),
        Commands::Roundtrip {
            path,
            narrator,
            output,
        } => commands::roundtrip::run(path, narrator, output, &defaults),
        Commands::Replay {
            scenes,
            script,
            narrator,
            output,
        } => commands::replay::run(scenes, script, narrator, output, &defaults),
        Commands::Snap {
            path,
            time,
            pps,
            clip,
            edge,
            frame_snap,
            narrator,
        } => {
            let mut defaults = defaults;
            defaults.frame_snap |= frame_snap;
            let edge = edge.map(|e| match e {
                EdgeArg::Start => storyline_timeline_engine::TrimEdge::Start,
                EdgeArg::End => storyline_timeline_engine::TrimEdge::End,
            });
            commands::snap::run(path, narrator, time, pps, clip, edge, &defaults)
        }
    }
}
