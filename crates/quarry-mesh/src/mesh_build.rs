use quarry_lighting::LightSample;
use quarry_world::ChunkCoord;

use crate::buffer::{Endian, PackedBuffer, read_f32};
use crate::chunk::ChunkMesh;
use crate::constants::*;

/// One vertex as laid out in a packed mesh buffer.
///
/// | offset | field | type |
/// |---|---|---|
/// | 0 | position (chunk-relative) | 3 x f32 |
/// | 12 | colour rgba | 4 x u8 |
/// | 16 | texture uv | 2 x f32 |
/// | 24 | atlas rect x, y, w, h | 4 x f32 |
/// | 40 | emitted, sky light | 2 x u8 |
/// | 42 | padding | 2 x u8 |
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VertexRecord {
    pub pos: [f32; 3],
    pub rgba: [u8; 4],
    pub uv: [f32; 2],
    pub atlas: [f32; 4],
    pub light: LightSample,
}

impl VertexRecord {
    /// Decodes record `index` from `bytes`, or `None` when it does not fit.
    pub fn read(bytes: &[u8], index: usize, endian: Endian) -> Option<VertexRecord> {
        let start = index.checked_mul(VERTEX_SIZE)?;
        let rec = bytes.get(start..start.checked_add(VERTEX_SIZE)?)?;
        let f = |o: usize| read_f32([rec[o], rec[o + 1], rec[o + 2], rec[o + 3]], endian);
        Some(VertexRecord {
            pos: [f(OFFSET_POSITION), f(OFFSET_POSITION + 4), f(OFFSET_POSITION + 8)],
            rgba: [
                rec[OFFSET_COLOUR],
                rec[OFFSET_COLOUR + 1],
                rec[OFFSET_COLOUR + 2],
                rec[OFFSET_COLOUR + 3],
            ],
            uv: [f(OFFSET_UV), f(OFFSET_UV + 4)],
            atlas: [
                f(OFFSET_ATLAS),
                f(OFFSET_ATLAS + 4),
                f(OFFSET_ATLAS + 8),
                f(OFFSET_ATLAS + 12),
            ],
            light: LightSample::new(rec[OFFSET_LIGHT], rec[OFFSET_LIGHT + 1]),
        })
    }
}

/// Sink for vertex records; owns the packed buffer of one chunk build.
#[derive(Clone, Debug)]
pub struct MeshBuilder {
    buf: PackedBuffer,
    vertices: usize,
}

impl MeshBuilder {
    pub fn new(initial_size: usize) -> Self {
        Self::with_endian(initial_size, Endian::host())
    }

    pub fn with_endian(initial_size: usize, endian: Endian) -> Self {
        Self {
            buf: PackedBuffer::with_endian(initial_size, endian),
            vertices: 0,
        }
    }

    pub fn push(&mut self, v: &VertexRecord) {
        let b = &mut self.buf;
        for p in v.pos {
            b.add_f32(p);
        }
        for c in v.rgba {
            b.add_u8(c);
        }
        for t in v.uv {
            b.add_f32(t);
        }
        for a in v.atlas {
            b.add_f32(a);
        }
        b.add_u8(v.light.emitted);
        b.add_u8(v.light.sky);
        b.add_u16(0);
        self.vertices += 1;
    }

    /// Convenience for an opaque vertex.
    pub fn vertex(&mut self, pos: [f32; 3], rgb: [u8; 3], uv: [f32; 2], atlas: [f32; 4], light: LightSample) {
        self.push(&VertexRecord {
            pos,
            rgba: [rgb[0], rgb[1], rgb[2], OPAQUE_ALPHA],
            uv,
            atlas,
            light,
        });
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices == 0
    }

    pub fn buffer(&self) -> &PackedBuffer {
        &self.buf
    }

    /// Drops all vertices but keeps the allocation for the next build.
    pub fn clear_keep_capacity(&mut self) {
        self.buf.reset();
        self.vertices = 0;
    }

    pub fn finish(self, coord: ChunkCoord) -> ChunkMesh {
        let endian = self.buf.endian();
        let (bytes, len) = self.buf.into_parts();
        ChunkMesh {
            coord,
            vertex_count: self.vertices,
            endian,
            bytes,
            len,
        }
    }
}
