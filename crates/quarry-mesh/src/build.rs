use std::time::Instant;

use quarry_chunk::ChunkBuf;
use quarry_lighting::BiomePalette;
use quarry_world::WorldView;
use serde::Deserialize;

use crate::chunk::ChunkMesh;
use crate::constants::{VERTEX_SIZE, VERTICES_PER_FACE};
use crate::mesh_build::MeshBuilder;
use crate::render::{BlockChecker, RenderCtx};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MeshOptions {
    pub smooth_lighting: bool,
    /// Starting size in bytes of each build's vertex buffer.
    pub initial_buffer_size: usize,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            smooth_lighting: true,
            // one face per cell of a 16x16 layer
            initial_buffer_size: 16 * 16 * VERTICES_PER_FACE * VERTEX_SIZE,
        }
    }
}

#[inline]
pub fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Meshes every cell of `buf`, reading blocks, light and biomes through
/// `world` so faces on the chunk border see their neighbours.
pub fn build_chunk_mesh<W: WorldView + ?Sized>(
    buf: &ChunkBuf,
    world: &W,
    palette: &BiomePalette,
    options: &MeshOptions,
) -> ChunkMesh {
    let mut out = MeshBuilder::new(options.initial_buffer_size);
    build_chunk_mesh_into(&mut out, buf, world, palette, options);
    out.finish(buf.coord)
}

/// Same as [`build_chunk_mesh`] but appends to a caller-owned builder.
/// Returns the number of vertices added.
pub fn build_chunk_mesh_into<W: WorldView + ?Sized>(
    out: &mut MeshBuilder,
    buf: &ChunkBuf,
    world: &W,
    palette: &BiomePalette,
    options: &MeshOptions,
) -> usize {
    let start = Instant::now();
    let before = out.vertex_count();
    let (base_x, base_z) = buf.base();
    let ctx = RenderCtx {
        world,
        palette,
        base_x,
        base_z,
    };
    let mut blocks = 0usize;
    for y in 0..buf.sy {
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let (wx, wy, wz) = (base_x + x as i32, y as i32, base_z + z as i32);
                let block = world.block(wx, wy, wz);
                if !block.is_renderable() {
                    continue;
                }
                let checker = BlockChecker::new(block, options.smooth_lighting);
                ctx.render_model(out, block.model(), wx, wy, wz, &checker);
                blocks += 1;
            }
        }
    }
    let added = out.vertex_count() - before;
    log::debug!(
        target: "mesh",
        "chunk ({}, {}): {} blocks, {} vertices, {} bytes in {}ms",
        buf.coord.cx,
        buf.coord.cz,
        blocks,
        added,
        added * VERTEX_SIZE,
        elapsed_ms(start)
    );
    added
}
