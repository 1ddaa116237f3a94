use serde::{Deserialize, Serialize};

/// Horizontal edge length of a chunk column, in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Column coordinate of a chunk; chunks span the full world height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk holding world column `(wx, wz)`.
    #[inline]
    pub fn containing(wx: i32, wz: i32) -> Self {
        Self {
            cx: wx.div_euclid(CHUNK_SIZE),
            cz: wz.div_euclid(CHUNK_SIZE),
        }
    }

    /// World coordinates of the chunk's `(0, 0)` column.
    #[inline]
    pub fn origin(self) -> (i32, i32) {
        (self.cx * CHUNK_SIZE, self.cz * CHUNK_SIZE)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }

    /// The eight surrounding chunks.
    pub fn neighbors(self) -> impl Iterator<Item = ChunkCoord> {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dz| (dx, dz)))
            .filter(|&(dx, dz)| dx != 0 || dz != 0)
            .map(move |(dx, dz)| self.offset(dx, dz))
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negatives() {
        assert_eq!(ChunkCoord::containing(-1, 15), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::containing(16, -16), ChunkCoord::new(1, -1));
        assert_eq!(ChunkCoord::new(-2, 3).origin(), (-32, 48));
    }

    #[test]
    fn eight_neighbors() {
        let c = ChunkCoord::new(4, -7);
        let n: Vec<_> = c.neighbors().collect();
        assert_eq!(n.len(), 8);
        assert!(n.iter().all(|o| o.distance_sq(c) <= 2 && *o != c));
    }
}
