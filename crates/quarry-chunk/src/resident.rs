use hashbrown::HashMap;
use quarry_blocks::{Block, BlockRegistry};
use quarry_world::{Biome, BiomeTable, CHUNK_SIZE, ChunkCoord, MAX_LIGHT, WorldView};

use crate::ChunkBuf;

/// The chunks resident for one mesh build.
///
/// Reads outside them never fail: a missing chunk or `y < 0` is the opaque
/// `unloaded` block in darkness, `y >= height` is sunlit air and a missing
/// biome column is biome 0.
pub struct ResidentWorld<'a> {
    reg: &'a BlockRegistry,
    biomes: &'a BiomeTable,
    height: i32,
    chunks: HashMap<ChunkCoord, ChunkBuf>,
}

impl<'a> ResidentWorld<'a> {
    pub fn new(reg: &'a BlockRegistry, biomes: &'a BiomeTable, height: usize) -> Self {
        Self {
            reg,
            biomes,
            height: height as i32,
            chunks: HashMap::new(),
        }
    }

    /// Makes `buf` resident. Chunks whose size does not match the world
    /// are rejected.
    pub fn insert(&mut self, buf: ChunkBuf) -> bool {
        let size = CHUNK_SIZE as usize;
        if buf.sx != size || buf.sz != size || buf.sy != self.height as usize {
            log::warn!(
                target: "chunk",
                "rejecting chunk ({}, {}) of size {}x{}x{}, expected {}x{}x{}",
                buf.coord.cx,
                buf.coord.cz,
                buf.sx,
                buf.sy,
                buf.sz,
                size,
                self.height,
                size
            );
            return false;
        }
        self.chunks.insert(buf.coord, buf);
        true
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkBuf> {
        self.chunks.get(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn registry(&self) -> &'a BlockRegistry {
        self.reg
    }

    #[inline]
    fn cell(&self, x: i32, y: i32, z: i32) -> Option<(&ChunkBuf, usize)> {
        let buf = self.chunks.get(&ChunkCoord::containing(x, z))?;
        let i = buf.world_idx(x, y, z)?;
        Some((buf, i))
    }
}

impl WorldView for ResidentWorld<'_> {
    fn block(&self, x: i32, y: i32, z: i32) -> &Block {
        if y >= self.height {
            return self.reg.air();
        }
        match self.cell(x, y, z) {
            Some((buf, i)) => self.reg.block(buf.blocks[i]),
            None => self.reg.unloaded(),
        }
    }

    fn emitted_light(&self, x: i32, y: i32, z: i32) -> u8 {
        match self.cell(x, y, z) {
            Some((buf, i)) => buf.emitted[i],
            None => 0,
        }
    }

    fn sky_light(&self, x: i32, y: i32, z: i32) -> u8 {
        if y >= self.height {
            return MAX_LIGHT;
        }
        match self.cell(x, y, z) {
            Some((buf, i)) => buf.sky[i],
            None => 0,
        }
    }

    fn biome(&self, x: i32, z: i32) -> Biome {
        let id = self
            .chunks
            .get(&ChunkCoord::containing(x, z))
            .and_then(|buf| buf.biome_world(x, z))
            .unwrap_or(0);
        self.biomes.get(id)
    }
}
