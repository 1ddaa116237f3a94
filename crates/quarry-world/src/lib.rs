//! World-side collaborators of the mesher: chunk coordinates, biomes, the
//! `WorldView` lookup trait and the demo terrain generator.
#![forbid(unsafe_code)]

pub mod biome;
pub mod coord;
pub mod view;
pub mod worldgen;

pub use biome::{Biome, BiomeTable};
pub use coord::{CHUNK_SIZE, ChunkCoord};
pub use view::{MAX_LIGHT, WorldView};
pub use worldgen::{Terrain, TerrainParams};
