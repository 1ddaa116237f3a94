//! Block shapes, typed block state, immutable block instances and the registry
//! that memoizes them.
#![forbid(unsafe_code)]

pub mod block;
pub mod defaults;
pub mod kinds;
pub mod registry;
pub mod shape;
pub mod state;

pub use block::{Block, BlockRef};
pub use defaults::DEFAULT_TEXTURES;
pub use kinds::{LeverDirection, LogAxis, LogVariant, SandVariant, ShapeKind};
pub use registry::BlockRegistry;
pub use shape::{Shape, ShapeId};
pub use state::{StateAllocator, StateDomain, StateEnum, StateKey, StateMap, StateValue};
