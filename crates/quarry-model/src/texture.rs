use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u16);

/// A named region of the texture atlas, in atlas pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Texture {
    /// Atlas rectangle as `[x, y, w, h]`.
    #[inline]
    pub fn rect(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

#[derive(Clone, Debug)]
struct AtlasEntry {
    name: String,
    texture: Texture,
}

/// Texture name -> atlas rectangle lookup.
///
/// Id 0 is always the `missing` texture; names that were never registered
/// resolve to it so a broken atlas shows up on screen rather than failing.
#[derive(Clone, Debug)]
pub struct TextureAtlas {
    entries: Vec<AtlasEntry>,
    by_name: HashMap<String, TextureId>,
    tile_size: u32,
}

impl TextureAtlas {
    pub const MISSING: &'static str = "missing";

    pub fn new(tile_size: u32) -> Self {
        let mut atlas = Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
            tile_size,
        };
        atlas.insert(Self::MISSING, 0, 0, tile_size, tile_size);
        atlas
    }

    /// Lays `names` out in a grid of `columns` tiles, starting at slot 1.
    pub fn grid(tile_size: u32, columns: u32, names: &[&str]) -> Self {
        let mut atlas = Self::new(tile_size);
        for (i, name) in names.iter().enumerate() {
            let (x, y) = slot_origin(i as u32 + 1, tile_size, columns);
            atlas.insert(name, x, y, tile_size, tile_size);
        }
        atlas
    }

    /// Registers (or moves) a texture and returns its id.
    pub fn insert(&mut self, name: &str, x: u32, y: u32, width: u32, height: u32) -> TextureId {
        let id = match self.by_name.get(name) {
            Some(id) => *id,
            None => {
                let id = TextureId(self.entries.len() as u16);
                self.by_name.insert(name.to_string(), id);
                self.entries.push(AtlasEntry {
                    name: name.to_string(),
                    texture: Texture {
                        id,
                        x: 0.0,
                        y: 0.0,
                        width: 0.0,
                        height: 0.0,
                    },
                });
                id
            }
        };
        self.entries[id.0 as usize].texture = Texture {
            id,
            x: x as f32,
            y: y as f32,
            width: width as f32,
            height: height as f32,
        };
        id
    }

    pub fn lookup(&self, name: &str) -> Option<Texture> {
        self.by_name
            .get(name)
            .map(|id| self.entries[id.0 as usize].texture)
    }

    /// Resolves `name`, falling back to the `missing` texture.
    pub fn get(&self, name: &str) -> Texture {
        match self.lookup(name) {
            Some(t) => t,
            None => {
                log::debug!(target: "atlas", "texture '{}' not in atlas, using '{}'", name, Self::MISSING);
                self.missing()
            }
        }
    }

    pub fn missing(&self) -> Texture {
        self.entries[0].texture
    }

    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AtlasConfig = toml::from_str(toml_str)?;
        if cfg.columns == 0 {
            return Err("atlas columns must be greater than zero".into());
        }
        let mut atlas = Self::new(cfg.tile_size);
        let mut entries: Vec<(String, AtlasDef)> = cfg.textures.into_iter().collect();
        // Sort so ids do not depend on HashMap order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, def) in entries {
            match def {
                AtlasDef::Slot(0) if name != Self::MISSING => {
                    return Err(format!("texture '{name}': slot 0 is reserved for '{}'", Self::MISSING).into());
                }
                AtlasDef::Slot(slot) => {
                    let (x, y) = slot_origin(slot, cfg.tile_size, cfg.columns);
                    atlas.insert(&name, x, y, cfg.tile_size, cfg.tile_size);
                }
                AtlasDef::Rect { x, y, size } => {
                    let size = size.unwrap_or(cfg.tile_size);
                    atlas.insert(&name, x, y, size, size);
                }
            }
        }
        Ok(atlas)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

fn slot_origin(slot: u32, tile_size: u32, columns: u32) -> (u32, u32) {
    ((slot % columns) * tile_size, (slot / columns) * tile_size)
}

// --- Config ---

fn default_tile_size() -> u32 {
    16
}

fn default_columns() -> u32 {
    16
}

#[derive(Deserialize)]
struct AtlasConfig {
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default = "default_columns")]
    columns: u32,
    #[serde(default)]
    textures: HashMap<String, AtlasDef>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AtlasDef {
    // stone = 3
    Slot(u32),
    // stone = { x = 48, y = 0, size = 16 }
    Rect { x: u32, y: u32, size: Option<u32> },
}
