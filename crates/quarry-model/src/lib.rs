//! Per-block geometry: faces, quads, textures and the model transforms
//! used to compose block shapes.
#![forbid(unsafe_code)]

pub mod face;
pub mod model;
pub mod texture;

pub use face::{Axis, Face};
pub use model::{BiomeTint, Model, ModelFace, ModelVertex};
pub use texture::{Texture, TextureAtlas, TextureId};
