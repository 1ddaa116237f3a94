use quarry_world::ChunkCoord;

use crate::buffer::Endian;
use crate::constants::VERTEX_SIZE;
use crate::mesh_build::VertexRecord;

/// Packed geometry of one chunk, ready to hand to a renderer.
///
/// `bytes` is the builder's whole allocation; the first `len` bytes hold
/// `vertex_count` records of [`VERTEX_SIZE`] bytes in `endian` order.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub vertex_count: usize,
    pub endian: Endian,
    pub bytes: Vec<u8>,
    pub len: usize,
}

impl ChunkMesh {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// The written prefix of `bytes`.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn vertex(&self, index: usize) -> Option<VertexRecord> {
        if index >= self.vertex_count {
            return None;
        }
        VertexRecord::read(self.data(), index, self.endian)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexRecord> + '_ {
        self.data()
            .chunks_exact(VERTEX_SIZE)
            .take(self.vertex_count)
            .filter_map(|rec| VertexRecord::read(rec, 0, self.endian))
    }
}
