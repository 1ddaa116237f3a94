//! Resident chunk storage, the raw chunk-data codec and the world view the
//! mesher reads through.
#![forbid(unsafe_code)]

pub mod codec;
pub mod resident;

use quarry_blocks::BlockRef;
use quarry_world::{CHUNK_SIZE, ChunkCoord, Terrain};

pub use codec::{DecodeError, column_height, decode_chunk, decode_column, encode_chunk, encoded_len};
pub use resident::ResidentWorld;

/// One chunk column: blocks, per-cell light and per-column biome ids.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<BlockRef>,
    pub emitted: Vec<u8>,
    pub sky: Vec<u8>,
    /// Indexed `z * sx + x`.
    pub biomes: Vec<u8>,
}

impl ChunkBuf {
    /// An all-air chunk, dark, with biome 0.
    pub fn new(coord: ChunkCoord, sx: usize, sy: usize, sz: usize) -> Self {
        let n = sx * sy * sz;
        Self {
            coord,
            sx,
            sy,
            sz,
            blocks: vec![BlockRef::AIR; n],
            emitted: vec![0; n],
            sky: vec![0; n],
            biomes: vec![0; sx * sz],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sx * self.sy * self.sz
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, block: BlockRef) {
        let i = self.idx(x, y, z);
        self.blocks[i] = block;
    }

    #[inline]
    pub fn base(&self) -> (i32, i32) {
        (self.coord.cx * self.sx as i32, self.coord.cz * self.sz as i32)
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (base_x, base_z) = self.base();
        if wy < 0 || wy >= self.sy as i32 {
            return false;
        }
        wx >= base_x && wx < base_x + self.sx as i32 && wz >= base_z && wz < base_z + self.sz as i32
    }

    /// Local cell index of a world position, if it lies inside this chunk.
    #[inline]
    pub fn world_idx(&self, wx: i32, wy: i32, wz: i32) -> Option<usize> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (base_x, base_z) = self.base();
        Some(self.idx((wx - base_x) as usize, wy as usize, (wz - base_z) as usize))
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockRef> {
        self.world_idx(wx, wy, wz).map(|i| self.blocks[i])
    }

    /// Biome id of a world column, if it lies inside this chunk.
    #[inline]
    pub fn biome_world(&self, wx: i32, wz: i32) -> Option<u8> {
        let (base_x, base_z) = self.base();
        let (lx, lz) = (wx - base_x, wz - base_z);
        if lx < 0 || lz < 0 || lx >= self.sx as i32 || lz >= self.sz as i32 {
            return None;
        }
        Some(self.biomes[lz as usize * self.sx + lx as usize])
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<BlockRef>,
    ) -> Self {
        let mut buf = ChunkBuf::new(coord, sx, sy, sz);
        let mut b = blocks;
        b.resize(buf.len(), BlockRef::AIR);
        buf.blocks = b;
        buf
    }
}

/// Fills a full-height chunk column from `terrain`.
pub fn generate_chunk(terrain: &Terrain, coord: ChunkCoord) -> ChunkBuf {
    let sx = CHUNK_SIZE as usize;
    let sz = CHUNK_SIZE as usize;
    let sy = terrain.params().height.max(1) as usize;
    let mut buf = ChunkBuf::new(coord, sx, sy, sz);
    let (base_x, base_z) = buf.base();
    for z in 0..sz {
        for x in 0..sx {
            let wx = base_x + x as i32;
            let wz = base_z + z as i32;
            let col = terrain.column(wx, wz);
            buf.biomes[z * sx + x] = col.biome;
            for y in 0..sy {
                let i = buf.idx(x, y, z);
                buf.blocks[i] = terrain.block_at(col, wx, y as i32, wz);
                buf.sky[i] = terrain.sky_light_at(col, y as i32);
            }
        }
    }
    buf
}
