use std::sync::Arc;

use crate::kinds::ShapeKind;
use crate::state::{StateKeyInfo, StateLayout, StateMap};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u16);

/// Immutable definition of a block type: its state keys and behaviour.
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    name: String,
    legacy_id: Option<u16>,
    layout: Arc<StateLayout>,
    kind: ShapeKind,
}

impl Shape {
    pub(crate) fn new(
        id: ShapeId,
        name: &str,
        legacy_id: Option<u16>,
        layout: StateLayout,
        kind: ShapeKind,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            legacy_id,
            layout: Arc::new(layout),
            kind,
        }
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Legacy block id (the high bits of the legacy encoding), if any.
    pub fn legacy_id(&self) -> Option<u16> {
        self.legacy_id
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn keys(&self) -> &[StateKeyInfo] {
        self.layout.keys()
    }

    pub fn state_count(&self) -> usize {
        self.layout.len()
    }

    /// State at a dense index. Panics when `index >= state_count()`.
    pub fn state_at(&self, index: usize) -> StateMap {
        assert!(
            index < self.layout.len(),
            "state index {index} out of range for shape '{}'",
            self.name
        );
        StateMap::from_index(Arc::clone(&self.layout), index)
    }

    /// The all-first-values state.
    pub fn default_state(&self) -> StateMap {
        self.state_at(0)
    }

    /// Every state of this shape, in index order.
    pub fn state_space(&self) -> impl Iterator<Item = StateMap> + '_ {
        (0..self.layout.len()).map(|i| StateMap::from_index(Arc::clone(&self.layout), i))
    }
}
