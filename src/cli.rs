use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Generates demo terrain, meshes it on the worker pool and reports the
/// size of the result.
///
/// Flags override values loaded from the config file.
#[derive(Parser, Debug)]
#[command(name = "quarry", version, about)]
pub struct CliArgs {
    /// Path to a quarry.toml config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chunks meshed in each direction from the origin.
    #[arg(long)]
    pub radius: Option<i32>,

    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<i32>,

    /// Use per-face instead of smooth lighting.
    #[arg(long)]
    pub flat_lighting: bool,

    /// Mesh worker threads (0 = one per core).
    #[arg(long)]
    pub workers: Option<usize>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(r) = args.radius {
            self.world.radius = r.max(0);
        }
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if args.flat_lighting {
            self.mesher.smooth_lighting = false;
        }
        if let Some(w) = args.workers {
            self.runtime.workers = w;
        }
    }
}
