mod cli;
mod config;
mod demo;

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use hashbrown::HashMap;
use quarry_blocks::{BlockRegistry, DEFAULT_TEXTURES};
use quarry_lighting::BiomePalette;
use quarry_mesh::elapsed_ms;
use quarry_model::TextureAtlas;
use quarry_runtime::Runtime;
use quarry_world::{ChunkCoord, Terrain, TerrainParams};

use crate::cli::CliArgs;
use crate::config::Config;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_cli_overrides(args);

    let atlas = match &config.atlas {
        Some(path) => TextureAtlas::from_path(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => TextureAtlas::grid(16, 16, DEFAULT_TEXTURES),
    };
    let palette = match &config.palette {
        Some(path) => BiomePalette::from_path(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => BiomePalette::with_defaults(),
    };
    let reg = Arc::new(BlockRegistry::with_defaults(&atlas));
    log::info!(
        "{} textures, {} block shapes, seed {}, radius {}, {} lighting",
        atlas.len(),
        reg.len(),
        config.world.seed,
        config.world.radius,
        if config.mesher.smooth_lighting { "smooth" } else { "flat" }
    );

    let params = TerrainParams {
        seed: config.world.seed,
        height: config.world.chunk_height,
        ..TerrainParams::default()
    };
    let terrain = Terrain::new(params, &reg);
    let t_gen = Instant::now();
    let raw = demo::generate_raw(&terrain, &reg, config.world.radius);
    log::info!("generated {} chunks in {}ms", raw.len(), elapsed_ms(t_gen));

    let runtime = Runtime::new(
        Arc::clone(&reg),
        Arc::new(palette),
        config.mesher.clone(),
        config.runtime.workers,
    )?;
    let requests = demo::requests(&raw, config.world.radius, 1);
    let mut latest: HashMap<ChunkCoord, u64> = HashMap::new();
    for req in &requests {
        latest.insert(req.coord, req.job_id);
    }
    let t_mesh = Instant::now();
    let submitted = requests.len();
    for req in requests {
        runtime.submit(req);
    }

    // Every request ends as exactly one response or one drop.
    let mut received = 0usize;
    let mut stale = 0usize;
    let mut vertices = 0usize;
    let mut bytes = 0usize;
    while received + stale + runtime.dropped() < submitted {
        let Some(res) = runtime.recv_timeout(Duration::from_millis(50)) else {
            continue;
        };
        if latest.get(&res.coord) != Some(&res.job_id) {
            log::debug!("discarding stale mesh for chunk ({}, {})", res.coord.cx, res.coord.cz);
            stale += 1;
            continue;
        }
        received += 1;
        vertices += res.mesh.vertex_count;
        bytes += res.mesh.len;
        log::info!(
            "chunk ({:>3}, {:>3}): {:>7} vertices, {:>8} bytes, decode {}ms, mesh {}ms",
            res.coord.cx,
            res.coord.cz,
            res.mesh.vertex_count,
            res.mesh.len,
            res.t_decode_ms,
            res.t_mesh_ms
        );
    }

    log::info!(
        "meshed {}/{} chunks ({} dropped) on {} workers in {}ms: {} vertices, {} bytes",
        received,
        submitted,
        runtime.dropped(),
        runtime.workers(),
        elapsed_ms(t_mesh),
        vertices,
        bytes
    );
    Ok(())
}
