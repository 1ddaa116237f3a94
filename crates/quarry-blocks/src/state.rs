//! Typed block state.
//!
//! A shape declares its state keys once through a [`StateAllocator`]. The
//! cross product of the key domains is the shape's state space; every point
//! in it has a dense index (first declared key varies fastest) which the
//! registry uses to memoize block instances.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::shape::ShapeId;

/// The values a state key may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateDomain {
    Bool,
    /// Inclusive on both ends.
    IntRange { min: i32, max: i32 },
    /// Variant names in ordinal order.
    Enum(&'static [&'static str]),
}

impl StateDomain {
    pub fn cardinality(&self) -> u32 {
        match self {
            StateDomain::Bool => 2,
            StateDomain::IntRange { min, max } => (i64::from(*max) - i64::from(*min) + 1) as u32,
            StateDomain::Enum(names) => names.len() as u32,
        }
    }

    /// Human-readable label for an ordinal.
    pub fn label(&self, ordinal: u32) -> String {
        match self {
            StateDomain::Bool => (ordinal != 0).to_string(),
            StateDomain::IntRange { min, .. } => (i64::from(*min) + i64::from(ordinal)).to_string(),
            StateDomain::Enum(names) => names
                .get(ordinal as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
        }
    }
}

/// A Rust type usable as the value of a state key.
pub trait StateValue: Copy + fmt::Debug + 'static {
    /// Ordinal of `self` in `domain`, or `None` when it lies outside it.
    fn to_ordinal(self, domain: &StateDomain) -> Option<u32>;
    fn from_ordinal(ordinal: u32, domain: &StateDomain) -> Self;
}

/// Enum state values; implemented by [`state_enum!`](crate::state_enum).
pub trait StateEnum: StateValue {
    const NAMES: &'static [&'static str];
}

impl StateValue for bool {
    fn to_ordinal(self, domain: &StateDomain) -> Option<u32> {
        match domain {
            StateDomain::Bool => Some(u32::from(self)),
            _ => None,
        }
    }

    fn from_ordinal(ordinal: u32, _domain: &StateDomain) -> Self {
        ordinal != 0
    }
}

impl StateValue for i32 {
    fn to_ordinal(self, domain: &StateDomain) -> Option<u32> {
        match domain {
            StateDomain::IntRange { min, max } if (*min..=*max).contains(&self) => {
                Some((i64::from(self) - i64::from(*min)) as u32)
            }
            _ => None,
        }
    }

    fn from_ordinal(ordinal: u32, domain: &StateDomain) -> Self {
        match domain {
            StateDomain::IntRange { min, .. } => (i64::from(*min) + i64::from(ordinal)) as i32,
            _ => ordinal as i32,
        }
    }
}

/// Declares a fieldless enum usable as a state value. Ordinals follow
/// declaration order and are part of the legacy encoding.
#[macro_export]
macro_rules! state_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[inline]
            pub fn ordinal(self) -> u32 {
                self as u32
            }
        }

        impl $crate::state::StateEnum for $name {
            const NAMES: &'static [&'static str] = &[$($label),+];
        }

        impl $crate::state::StateValue for $name {
            fn to_ordinal(self, _domain: &$crate::state::StateDomain) -> Option<u32> {
                Some(self as u32)
            }

            fn from_ordinal(ordinal: u32, _domain: &$crate::state::StateDomain) -> Self {
                $name::ALL[ordinal as usize]
            }
        }
    };
}

/// Handle to one declared state key of one shape.
pub struct StateKey<T> {
    shape: ShapeId,
    index: usize,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateKey")
            .field("shape", &self.shape)
            .field("index", &self.index)
            .finish()
    }
}

impl<T> StateKey<T> {
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateKeyInfo {
    pub name: String,
    pub domain: StateDomain,
}

/// Collects the key declarations of a shape being registered.
#[derive(Debug)]
pub struct StateAllocator {
    shape: ShapeId,
    keys: Vec<StateKeyInfo>,
}

impl StateAllocator {
    pub(crate) fn new(shape: ShapeId) -> Self {
        Self {
            shape,
            keys: Vec::new(),
        }
    }

    /// Declares a key. Panics on a duplicate name or an empty domain.
    pub fn alloc<T: StateValue>(&mut self, name: &str, domain: StateDomain) -> StateKey<T> {
        assert!(
            !self.keys.iter().any(|k| k.name == name),
            "state key '{name}' declared twice"
        );
        assert!(domain.cardinality() > 0, "state key '{name}' has an empty domain");
        self.keys.push(StateKeyInfo {
            name: name.to_string(),
            domain,
        });
        StateKey {
            shape: self.shape,
            index: self.keys.len() - 1,
            _value: PhantomData,
        }
    }

    pub fn alloc_bool(&mut self, name: &str) -> StateKey<bool> {
        self.alloc(name, StateDomain::Bool)
    }

    pub fn alloc_range(&mut self, name: &str, min: i32, max: i32) -> StateKey<i32> {
        assert!(min <= max, "state key '{name}': empty range {min}..={max}");
        self.alloc(name, StateDomain::IntRange { min, max })
    }

    pub fn alloc_enum<T: StateEnum>(&mut self, name: &str) -> StateKey<T> {
        self.alloc(name, StateDomain::Enum(T::NAMES))
    }

    pub(crate) fn finish(self) -> StateLayout {
        let mut strides = Vec::with_capacity(self.keys.len());
        let mut len: usize = 1;
        for k in &self.keys {
            strides.push(len);
            len = len
                .checked_mul(k.domain.cardinality() as usize)
                .unwrap_or(usize::MAX);
        }
        StateLayout {
            shape: self.shape,
            keys: self.keys,
            strides,
            len,
        }
    }
}

/// Mixed-radix layout of a shape's state space.
#[derive(Debug)]
pub struct StateLayout {
    shape: ShapeId,
    keys: Vec<StateKeyInfo>,
    strides: Vec<usize>,
    len: usize,
}

impl StateLayout {
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn keys(&self) -> &[StateKeyInfo] {
        &self.keys
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn index_of(&self, ordinals: &[u32]) -> usize {
        ordinals
            .iter()
            .zip(&self.strides)
            .map(|(o, s)| *o as usize * s)
            .sum()
    }

    fn ordinals_at(&self, index: usize) -> Box<[u32]> {
        self.keys
            .iter()
            .zip(&self.strides)
            .map(|(k, s)| ((index / s) % k.domain.cardinality() as usize) as u32)
            .collect()
    }
}

/// One concrete assignment of a shape's state keys.
#[derive(Clone)]
pub struct StateMap {
    layout: Arc<StateLayout>,
    ordinals: Box<[u32]>,
}

impl StateMap {
    pub(crate) fn from_index(layout: Arc<StateLayout>, index: usize) -> Self {
        let ordinals = layout.ordinals_at(index);
        Self { layout, ordinals }
    }

    pub fn shape(&self) -> ShapeId {
        self.layout.shape
    }

    /// Dense index of this assignment in the shape's state space.
    pub fn index(&self) -> usize {
        self.layout.index_of(&self.ordinals)
    }

    fn check<T>(&self, key: StateKey<T>) -> &StateKeyInfo {
        assert!(
            key.shape == self.layout.shape && key.index < self.layout.keys.len(),
            "state key {:?} does not belong to shape {:?}",
            key,
            self.layout.shape
        );
        &self.layout.keys[key.index]
    }

    pub fn get<T: StateValue>(&self, key: StateKey<T>) -> T {
        let info = self.check(key);
        T::from_ordinal(self.ordinals[key.index], &info.domain)
    }

    /// Copy of this assignment with one key changed. Panics when `value`
    /// lies outside the key's domain.
    pub fn with<T: StateValue>(&self, key: StateKey<T>, value: T) -> StateMap {
        let info = self.check(key);
        let ordinal = match value.to_ordinal(&info.domain) {
            Some(o) => o,
            None => panic!(
                "value {:?} is outside the domain of state key '{}'",
                value, info.name
            ),
        };
        let mut ordinals = self.ordinals.clone();
        ordinals[key.index] = ordinal;
        StateMap {
            layout: Arc::clone(&self.layout),
            ordinals,
        }
    }

    /// Label of the named key's current value.
    pub fn value_label(&self, name: &str) -> Option<String> {
        let i = self.layout.keys.iter().position(|k| k.name == name)?;
        Some(self.layout.keys[i].domain.label(self.ordinals[i]))
    }
}

impl PartialEq for StateMap {
    fn eq(&self, other: &Self) -> bool {
        self.layout.shape == other.layout.shape && self.ordinals == other.ordinals
    }
}

impl Eq for StateMap {}

impl Hash for StateMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.layout.shape.hash(state);
        self.ordinals.hash(state);
    }
}

impl fmt::Debug for StateMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for StateMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ordinals.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (k, o)) in self.layout.keys.iter().zip(self.ordinals.iter()).enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k.name, k.domain.label(*o))?;
        }
        f.write_str("]")
    }
}
