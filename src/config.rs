//! `quarry.toml` loading.
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use quarry_mesh::MeshOptions;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mesher: MeshOptions,
    pub runtime: RuntimeConfig,
    pub world: WorldConfig,
    /// Texture atlas description; the built-in grid when absent.
    pub atlas: Option<PathBuf>,
    /// Biome palette; the built-in colours when absent.
    pub palette: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Mesh worker threads; 0 uses one per core.
    pub workers: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorldConfig {
    pub chunk_height: i32,
    pub seed: i32,
    /// Chunks meshed in each direction from the origin.
    pub radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_height: 128,
            seed: 1337,
            radius: 2,
        }
    }
}

impl Config {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Config = toml::from_str(toml_str)?;
        if cfg.world.chunk_height < 4 {
            return Err(format!("world.chunk_height must be at least 4, got {}", cfg.world.chunk_height).into());
        }
        if cfg.world.radius < 0 {
            return Err(format!("world.radius must not be negative, got {}", cfg.world.radius).into());
        }
        Ok(cfg)
    }

    /// Loads `path`; relative asset paths are taken from the config's
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
        let mut cfg = Self::from_toml_str(&s).map_err(|e| format!("{}: {e}", path.display()))?;
        let dir = path.parent().unwrap_or(Path::new("."));
        for p in [&mut cfg.atlas, &mut cfg.palette].into_iter().flatten() {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        }
        Ok(cfg)
    }
}
