use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use quarry_model::BiomeTint;
use quarry_world::WorldView;
use serde::Deserialize;

/// Colour used for biome colour indices the palette has no entry for.
pub const MISSING_TINT: u32 = 0xFF00FF;

/// Radius of the square of columns averaged for a biome tint.
const TINT_RADIUS: i32 = 2;

/// Grass and foliage colours keyed by biome colour index, as `0xRRGGBB`.
///
/// Built once at startup and shared read-only between mesh workers.
#[derive(Clone, Debug, Default)]
pub struct BiomePalette {
    grass: HashMap<u16, u32>,
    foliage: HashMap<u16, u32>,
}

impl BiomePalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colours for the biomes of `BiomeTable::with_defaults`.
    pub fn with_defaults() -> Self {
        let mut p = Self::new();
        for (index, grass, foliage) in [
            (0, 0x8EB971, 0x71A74D),
            (1, 0x91BD59, 0x77AB2F),
            (2, 0xBFB755, 0xAEA42A),
            (3, 0x8AB689, 0x6DA36B),
            (4, 0x79C05A, 0x59AE30),
            (5, 0x86B783, 0x68A464),
            (6, 0x6A7039, 0x6A7039),
            (7, 0x91BD59, 0x77AB2F),
            (12, 0x80B497, 0x60A17B),
            (16, 0x91BD59, 0x77AB2F),
            (21, 0x59C93C, 0x30BB0B),
        ] {
            p.set(BiomeTint::Grass, index, grass);
            p.set(BiomeTint::Foliage, index, foliage);
        }
        p
    }

    /// Sets the colour of `color_index` in the palette selected by `tint`.
    /// `BiomeTint::None` has no palette and is ignored.
    pub fn set(&mut self, tint: BiomeTint, color_index: u16, rgb: u32) {
        let rgb = rgb & 0xFF_FFFF;
        match tint {
            BiomeTint::Grass => {
                self.grass.insert(color_index, rgb);
            }
            BiomeTint::Foliage => {
                self.foliage.insert(color_index, rgb);
            }
            BiomeTint::None => {}
        }
    }

    /// Palette colour for one biome colour index.
    pub fn colour(&self, tint: BiomeTint, color_index: u16) -> u32 {
        let table = match tint {
            BiomeTint::Grass => &self.grass,
            BiomeTint::Foliage => &self.foliage,
            BiomeTint::None => return 0xFF_FFFF,
        };
        table.get(&color_index).copied().unwrap_or(MISSING_TINT)
    }

    /// Tint for the column at `(x, z)`: the per-channel integer mean of the
    /// palette colours of the 5x5 columns centred on it.
    pub fn tint_at<W: WorldView + ?Sized>(&self, world: &W, x: i32, z: i32, tint: BiomeTint) -> [u8; 3] {
        let mut sum = [0u32; 3];
        let mut count = 0u32;
        for dx in -TINT_RADIUS..=TINT_RADIUS {
            for dz in -TINT_RADIUS..=TINT_RADIUS {
                let c = self.colour(tint, world.biome(x + dx, z + dz).color_index);
                sum[0] += (c >> 16) & 0xFF;
                sum[1] += (c >> 8) & 0xFF;
                sum[2] += c & 0xFF;
                count += 1;
            }
        }
        sum.map(|s| (s / count) as u8)
    }

    pub fn len(&self, tint: BiomeTint) -> usize {
        match tint {
            BiomeTint::Grass => self.grass.len(),
            BiomeTint::Foliage => self.foliage.len(),
            BiomeTint::None => 0,
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: PaletteConfig = toml::from_str(toml_str)?;
        let mut palette = Self::new();
        for (tint, table) in [(BiomeTint::Grass, cfg.grass), (BiomeTint::Foliage, cfg.foliage)] {
            for (key, def) in table {
                let index: u16 = key
                    .trim()
                    .parse()
                    .map_err(|_| format!("biome colour index '{key}' is not a number"))?;
                let rgb = def.rgb().map_err(|e| format!("biome colour index {index}: {e}"))?;
                palette.set(tint, index, rgb);
            }
        }
        log::debug!(
            target: "lighting",
            "loaded biome palette: {} grass, {} foliage colours",
            palette.grass.len(),
            palette.foliage.len()
        );
        Ok(palette)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
struct PaletteConfig {
    #[serde(default)]
    grass: HashMap<String, ColourDef>,
    #[serde(default)]
    foliage: HashMap<String, ColourDef>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColourDef {
    // 1 = 9551193
    Int(u32),
    // 1 = "#91BD59"
    Hex(String),
}

impl ColourDef {
    fn rgb(&self) -> Result<u32, String> {
        let v = match self {
            ColourDef::Int(v) => *v,
            ColourDef::Hex(s) => {
                let t = s.trim();
                let digits = t
                    .strip_prefix('#')
                    .or_else(|| t.strip_prefix("0x"))
                    .or_else(|| t.strip_prefix("0X"))
                    .ok_or_else(|| format!("colour '{s}' must start with '#' or '0x'"))?;
                u32::from_str_radix(digits, 16).map_err(|_| format!("colour '{s}' is not hexadecimal"))?
            }
        };
        if v > 0xFF_FFFF {
            return Err(format!("colour {v:#x} does not fit in 24 bits"));
        }
        Ok(v)
    }
}
