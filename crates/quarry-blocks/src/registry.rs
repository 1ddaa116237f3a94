use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, OnceLock};

use crate::block::{Block, BlockRef};
use crate::kinds::ShapeKind;
use crate::shape::{Shape, ShapeId};
use crate::state::{StateAllocator, StateMap};

/// All registered shapes plus the memoized instance of every state.
///
/// Instances are created lazily on first lookup and live as long as the
/// registry. The registry is read-only once built and can be shared between
/// worker threads behind an `Arc`.
#[derive(Debug)]
pub struct BlockRegistry {
    shapes: Vec<Arc<Shape>>,
    instances: Vec<Box<[OnceLock<Block>]>>,
    by_name: HashMap<String, ShapeId>,
    by_legacy: HashMap<u16, BlockRef>,
    unloaded: ShapeId,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub const AIR: &'static str = "air";
    pub const UNLOADED: &'static str = "unloaded";
    /// Legacy block ids are packed above a 4-bit data nibble into a `u16`.
    pub const LEGACY_ID_LIMIT: u16 = 1 << 12;

    /// A registry holding only `air` (shape 0, legacy id 0) and the hidden
    /// `unloaded` stand-in.
    pub fn new() -> Self {
        let mut reg = Self {
            shapes: Vec::new(),
            instances: Vec::new(),
            by_name: HashMap::new(),
            by_legacy: HashMap::new(),
            unloaded: ShapeId(0),
        };
        reg.register(Self::AIR, Some(0), |_| ShapeKind::Air);
        reg.unloaded = reg.register(Self::UNLOADED, None, |_| ShapeKind::Unloaded);
        reg
    }

    /// Registers a shape. `build` declares the state keys and returns the
    /// shape's behaviour. Panics if `name` is taken, if `legacy_id` is not
    /// below [`LEGACY_ID_LIMIT`](Self::LEGACY_ID_LIMIT), or if one of its
    /// legacy ids already belongs to another shape.
    pub fn register(
        &mut self,
        name: &str,
        legacy_id: Option<u16>,
        build: impl FnOnce(&mut StateAllocator) -> ShapeKind,
    ) -> ShapeId {
        assert!(
            !self.by_name.contains_key(name),
            "shape '{name}' registered twice"
        );
        assert!(self.shapes.len() < usize::from(u16::MAX), "too many shapes");
        let id = ShapeId(self.shapes.len() as u16);
        let mut alloc = StateAllocator::new(id);
        let kind = build(&mut alloc);
        let layout = alloc.finish();
        assert!(
            layout.len() <= usize::from(u16::MAX) + 1,
            "shape '{name}' has {} states",
            layout.len()
        );
        let shape = Arc::new(Shape::new(id, name, legacy_id, layout, kind));

        let mut legacy_added = 0usize;
        let mut legacy_shadowed = 0usize;
        if let Some(block_id) = legacy_id {
            assert!(
                block_id < Self::LEGACY_ID_LIMIT,
                "shape '{name}' legacy id {block_id} does not fit in 12 bits"
            );
            for state in shape.state_space() {
                let legacy = (block_id << 4) | (shape.kind().legacy_data(&state) & 0xF);
                let r = BlockRef::new(id, state.index() as u16);
                match self.by_legacy.entry(legacy) {
                    Entry::Vacant(e) => {
                        e.insert(r);
                        legacy_added += 1;
                    }
                    // states of one shape may share an id; the first keeps it
                    Entry::Occupied(e) if e.get().shape == id => legacy_shadowed += 1,
                    Entry::Occupied(e) => panic!(
                        "shape '{name}' legacy id {legacy} already taken by '{}'",
                        self.shapes[e.get().shape.0 as usize].name()
                    ),
                }
            }
        }
        log::debug!(
            target: "blocks",
            "registered shape '{}' id={} states={} legacy={:?} ({} legacy ids, {} shadowed)",
            name,
            id.0,
            shape.state_count(),
            legacy_id,
            legacy_added,
            legacy_shadowed
        );

        self.instances
            .push((0..shape.state_count()).map(|_| OnceLock::new()).collect());
        self.by_name.insert(name.to_string(), id);
        self.shapes.push(shape);
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().map(|s| s.as_ref())
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0 as usize).map(|s| s.as_ref())
    }

    pub fn shape_by_name(&self, name: &str) -> Option<&Shape> {
        self.by_name.get(name).and_then(|id| self.shape(*id))
    }

    /// The instance behind `r`, created on first request.
    pub fn get(&self, r: BlockRef) -> Option<&Block> {
        let shape = self.shapes.get(r.shape.0 as usize)?;
        let slot = self.instances[r.shape.0 as usize].get(r.state as usize)?;
        Some(slot.get_or_init(|| Block::new(Arc::clone(shape), shape.state_at(r.state as usize))))
    }

    /// Like [`get`](Self::get) but unknown handles read as air.
    pub fn block(&self, r: BlockRef) -> &Block {
        match self.get(r) {
            Some(b) => b,
            None => self.air(),
        }
    }

    /// The unique instance for `state`. Repeated calls with equal states
    /// return the same reference.
    pub fn instance_for(&self, state: &StateMap) -> &Block {
        let r = BlockRef::new(state.shape(), state.index() as u16);
        match self.get(r) {
            Some(b) => b,
            None => panic!("state {state} belongs to no registered shape"),
        }
    }

    /// Default-state instance of the named shape.
    pub fn default_block(&self, name: &str) -> Option<&Block> {
        let id = *self.by_name.get(name)?;
        self.get(BlockRef::new(id, 0))
    }

    pub fn air(&self) -> &Block {
        self.instance_slot(BlockRef::AIR)
    }

    /// Opaque stand-in for blocks of chunks that are not resident.
    pub fn unloaded(&self) -> &Block {
        self.instance_slot(BlockRef::new(self.unloaded, 0))
    }

    fn instance_slot(&self, r: BlockRef) -> &Block {
        let shape = &self.shapes[r.shape.0 as usize];
        self.instances[r.shape.0 as usize][r.state as usize]
            .get_or_init(|| Block::new(Arc::clone(shape), shape.state_at(r.state as usize)))
    }

    /// Exact reverse lookup of a legacy id.
    pub fn by_legacy(&self, legacy: u16) -> Option<BlockRef> {
        self.by_legacy.get(&legacy).copied()
    }

    /// Legacy id to block for decoding: exact match, else the same block id
    /// with data 0, else air. The flag is false when the exact id was unknown.
    pub fn resolve_legacy(&self, legacy: u16) -> (BlockRef, bool) {
        if let Some(r) = self.by_legacy(legacy) {
            return (r, true);
        }
        let fallback = self.by_legacy(legacy & !0xF).unwrap_or(BlockRef::AIR);
        (fallback, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_and_unloaded_are_builtin() {
        let reg = BlockRegistry::new();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.air().name(), "air");
        assert!(!reg.air().is_renderable());
        assert!(reg.unloaded().occludes());
        assert_eq!(reg.unloaded().legacy_id(), None);
        assert_eq!(reg.by_legacy(0), Some(BlockRef::AIR));
    }

    #[test]
    fn unknown_legacy_falls_back() {
        let mut reg = BlockRegistry::new();
        let tex = quarry_model::TextureAtlas::new(16).missing();
        let stone = reg.register("stone", Some(1), |_| ShapeKind::Cube { texture: tex });
        assert_eq!(reg.resolve_legacy(1 << 4), (BlockRef::new(stone, 0), true));
        assert_eq!(reg.resolve_legacy((1 << 4) | 5), (BlockRef::new(stone, 0), false));
        assert_eq!(reg.resolve_legacy(200 << 4), (BlockRef::AIR, false));
    }

    #[test]
    fn states_sharing_a_legacy_id_keep_the_first() {
        let mut reg = BlockRegistry::new();
        let tex = quarry_model::TextureAtlas::new(16).missing();
        let lamp = reg.register("lamp", Some(4095), |alloc| {
            alloc.alloc_bool("lit");
            ShapeKind::Cube { texture: tex }
        });
        assert_eq!(reg.shape(lamp).map(|s| s.state_count()), Some(2));
        assert_eq!(reg.by_legacy(4095 << 4), Some(BlockRef::new(lamp, 0)));
        assert_eq!(reg.get(BlockRef::new(lamp, 1)).and_then(|b| b.legacy_id()), Some(4095 << 4));
    }

    #[test]
    #[should_panic(expected = "does not fit in 12 bits")]
    fn oversized_legacy_id_panics() {
        let mut reg = BlockRegistry::new();
        let tex = quarry_model::TextureAtlas::new(16).missing();
        reg.register("wide", Some(BlockRegistry::LEGACY_ID_LIMIT), |_| ShapeKind::Cube { texture: tex });
    }

    #[test]
    #[should_panic(expected = "already taken by 'stone'")]
    fn legacy_id_shared_across_shapes_panics() {
        let mut reg = BlockRegistry::new();
        let tex = quarry_model::TextureAtlas::new(16).missing();
        reg.register("stone", Some(1), |_| ShapeKind::Cube { texture: tex });
        reg.register("granite", Some(1), |_| ShapeKind::Cube { texture: tex });
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_names_panic() {
        let mut reg = BlockRegistry::new();
        reg.register("air", None, |_| ShapeKind::Air);
    }
}
