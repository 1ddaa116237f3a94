//! Height-noise terrain used by the CLI and benchmarks.
use fastnoise_lite::{FastNoiseLite, NoiseType};
use quarry_blocks::{BlockRef, BlockRegistry, LeverDirection, ShapeKind};
use serde::Deserialize;

use crate::view::MAX_LIGHT;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: i32,
    /// World height in blocks.
    pub height: i32,
    pub sea_level: i32,
    pub min_surface: i32,
    pub max_surface: i32,
    pub frequency: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            height: 128,
            sea_level: 62,
            min_surface: 48,
            max_surface: 84,
            frequency: 0.01,
        }
    }
}

/// One generated world column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    /// Y of the topmost solid block.
    pub surface: i32,
    pub biome: u8,
}

#[derive(Clone, Copy, Debug)]
struct TerrainBlocks {
    stone: BlockRef,
    dirt: BlockRef,
    grass: BlockRef,
    sand: BlockRef,
    water: BlockRef,
    tall_grass: BlockRef,
    log: BlockRef,
    lever: BlockRef,
}

pub struct Terrain {
    params: TerrainParams,
    height_noise: FastNoiseLite,
    climate_noise: FastNoiseLite,
    blocks: TerrainBlocks,
}

impl Terrain {
    pub fn new(params: TerrainParams, reg: &BlockRegistry) -> Self {
        let mut height_noise = FastNoiseLite::with_seed(params.seed);
        height_noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        height_noise.set_frequency(Some(params.frequency));
        let mut climate_noise = FastNoiseLite::with_seed(params.seed ^ 0x1203_5F31);
        climate_noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        climate_noise.set_frequency(Some(params.frequency * 0.25));

        let named = |name: &str| match reg.default_block(name) {
            Some(b) => b.block_ref(),
            None => {
                log::warn!(target: "worldgen", "block '{}' missing from registry, using air", name);
                BlockRef::AIR
            }
        };
        let lever = match reg.shape_by_name("lever") {
            Some(shape) => match shape.kind() {
                ShapeKind::Lever { direction, .. } => reg
                    .instance_for(&shape.default_state().with(*direction, LeverDirection::UpZ))
                    .block_ref(),
                _ => named("lever"),
            },
            None => named("lever"),
        };
        let blocks = TerrainBlocks {
            stone: named("stone"),
            dirt: named("dirt"),
            grass: named("grass"),
            sand: named("sand"),
            water: named("water"),
            tall_grass: named("tall_grass"),
            log: named("log"),
            lever,
        };
        Self {
            params,
            height_noise,
            climate_noise,
            blocks,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn column(&self, wx: i32, wz: i32) -> Column {
        let p = &self.params;
        let n = self.height_noise.get_noise_2d(wx as f32, wz as f32);
        let span = (p.max_surface - p.min_surface).max(0) as f32;
        let surface = (((n + 1.0) * 0.5 * span) as i32 + p.min_surface).clamp(1, p.height - 2);
        let t = ((self.climate_noise.get_noise_2d(wx as f32, wz as f32) + 1.0) * 0.5).clamp(0.0, 1.0);
        let biome = if surface <= p.sea_level + 1 {
            if surface < p.sea_level - 2 { 0 } else { 16 }
        } else if t < 0.3 {
            5
        } else if t < 0.6 {
            1
        } else if t < 0.85 {
            4
        } else {
            2
        };
        Column { surface, biome }
    }

    /// Block at `(wx, y, wz)` in a column already sampled with [`column`](Self::column).
    pub fn block_at(&self, col: Column, wx: i32, y: i32, wz: i32) -> BlockRef {
        let b = &self.blocks;
        let sea = self.params.sea_level;
        let beach = col.surface <= sea + 1;
        let roll = hash2(self.params.seed, wx, wz);
        if y < col.surface - 3 {
            return b.stone;
        }
        if y < col.surface {
            return if beach { b.sand } else { b.dirt };
        }
        if y == col.surface {
            return if beach { b.sand } else { b.grass };
        }
        if y <= sea {
            return b.water;
        }
        if beach {
            return BlockRef::AIR;
        }
        let above = y - col.surface;
        match roll % 97 {
            0 if above <= 4 => b.log,
            1 if above == 1 => b.lever,
            2..=14 if above == 1 => b.tall_grass,
            _ => BlockRef::AIR,
        }
    }

    /// Sky light: full above the surface, fading through water, dark below.
    pub fn sky_light_at(&self, col: Column, y: i32) -> u8 {
        if y <= col.surface {
            return 0;
        }
        let depth = self.params.sea_level - y + 1;
        if depth > 0 {
            MAX_LIGHT.saturating_sub((depth * 2).min(i32::from(MAX_LIGHT)) as u8)
        } else {
            MAX_LIGHT
        }
    }
}

fn hash2(seed: i32, x: i32, z: i32) -> u32 {
    let mut h = (seed as u32) ^ 0x9E37_79B9;
    h = (h ^ x as u32).wrapping_mul(0x85EB_CA6B);
    h = (h ^ z as u32).wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}
