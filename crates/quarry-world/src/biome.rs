/// A biome as seen by the mesher: only its palette colour index matters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Biome {
    pub id: u8,
    /// Key into the grass and foliage colour palettes.
    pub color_index: u16,
}

#[derive(Clone, Debug)]
struct BiomeEntry {
    name: &'static str,
    color_index: u16,
}

/// Biome id -> biome lookup. Ids without an entry use their own id as
/// colour index.
#[derive(Clone, Debug)]
pub struct BiomeTable {
    entries: Vec<Option<BiomeEntry>>,
}

impl Default for BiomeTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BiomeTable {
    pub fn empty() -> Self {
        Self {
            entries: vec![None; 256],
        }
    }

    pub fn with_defaults() -> Self {
        let mut t = Self::empty();
        for (id, name, color_index) in [
            (0, "ocean", 0),
            (1, "plains", 1),
            (2, "desert", 2),
            (3, "extreme_hills", 3),
            (4, "forest", 4),
            (5, "taiga", 5),
            (6, "swampland", 6),
            (7, "river", 7),
            (12, "ice_plains", 12),
            (16, "beach", 16),
            (21, "jungle", 21),
        ] {
            t.insert(id, name, color_index);
        }
        t
    }

    pub fn insert(&mut self, id: u8, name: &'static str, color_index: u16) {
        self.entries[id as usize] = Some(BiomeEntry { name, color_index });
    }

    pub fn get(&self, id: u8) -> Biome {
        let color_index = self.entries[id as usize]
            .as_ref()
            .map_or(u16::from(id), |e| e.color_index);
        Biome { id, color_index }
    }

    pub fn name(&self, id: u8) -> Option<&'static str> {
        self.entries[id as usize].as_ref().map(|e| e.name)
    }
}
