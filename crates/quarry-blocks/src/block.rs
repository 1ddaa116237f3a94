use std::fmt;
use std::sync::{Arc, OnceLock};

use quarry_geom::Aabb;
use quarry_model::{Face, Model, Texture};

use crate::shape::{Shape, ShapeId};
use crate::state::{StateKey, StateMap, StateValue};

/// Compact handle to a block instance: shape id plus dense state index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub shape: ShapeId,
    pub state: u16,
}

impl BlockRef {
    /// Air is always the first registered shape.
    pub const AIR: BlockRef = BlockRef {
        shape: ShapeId(0),
        state: 0,
    };

    #[inline]
    pub const fn new(shape: ShapeId, state: u16) -> Self {
        Self { shape, state }
    }
}

/// One immutable point in a shape's state space.
///
/// Instances are created once by the registry and shared by reference; the
/// model is built on first use and kept for the instance's lifetime.
pub struct Block {
    shape: Arc<Shape>,
    state: StateMap,
    model: OnceLock<Model>,
}

impl Block {
    pub(crate) fn new(shape: Arc<Shape>, state: StateMap) -> Self {
        Self {
            shape,
            state,
            model: OnceLock::new(),
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn name(&self) -> &str {
        self.shape.name()
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }

    pub fn block_ref(&self) -> BlockRef {
        BlockRef::new(self.shape.id(), self.state.index() as u16)
    }

    /// Reads one state value. Panics if `key` belongs to another shape.
    pub fn get<T: StateValue>(&self, key: StateKey<T>) -> T {
        self.state.get(key)
    }

    pub fn legacy_data(&self) -> u16 {
        self.shape.kind().legacy_data(&self.state)
    }

    /// `block_id << 4 | data`, or `None` for shapes without a legacy id.
    pub fn legacy_id(&self) -> Option<u16> {
        self.shape
            .legacy_id()
            .map(|id| (id << 4) | (self.legacy_data() & 0xF))
    }

    pub fn texture(&self, face: Face) -> Option<Texture> {
        self.shape.kind().texture(&self.state, face)
    }

    pub fn model(&self) -> &Model {
        self.model
            .get_or_init(|| self.shape.kind().build_model(&self.state))
    }

    pub fn collision_box(&self) -> Option<Aabb> {
        self.shape.kind().collision_box()
    }

    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.shape.kind().is_renderable()
    }

    #[inline]
    pub fn occludes(&self) -> bool {
        self.shape.kind().occludes()
    }

    pub fn culls_same(&self) -> bool {
        self.shape.kind().culls_same()
    }

    pub fn flat_shading(&self) -> bool {
        self.shape.kind().flat_shading()
    }

    pub fn is_redstone_connectible(&self) -> bool {
        self.shape.kind().is_redstone_connectible()
    }

    #[inline]
    pub fn same_shape(&self, other: &Block) -> bool {
        self.shape.id() == other.shape.id()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for Block {}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.shape.name(), self.state)
    }
}
