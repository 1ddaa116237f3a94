//! CPU chunk mesher: renders block models into packed vertex buffers.
#![forbid(unsafe_code)]

mod buffer;
mod build;
mod chunk;
pub mod constants;
mod mesh_build;
mod render;

pub use buffer::{Endian, PackedBuffer};
pub use build::{MeshOptions, build_chunk_mesh, build_chunk_mesh_into, elapsed_ms};
pub use chunk::ChunkMesh;
pub use mesh_build::{MeshBuilder, VertexRecord};
pub use render::{AlwaysRender, BlockChecker, RenderChecker, RenderCtx};
