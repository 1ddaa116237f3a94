use quarry_geom::Vec3;

/// The six axis-aligned quad orientations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    /// +Y
    Top = 0,
    /// -Y
    Bottom = 1,
    /// +X
    Left = 2,
    /// -X
    Right = 3,
    /// +Z
    Front = 4,
    /// -Z
    Back = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        Face::ALL.get(i).copied()
    }

    /// Integer grid step `(dx, dy, dz)` out of this face.
    #[inline]
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Left => (1, 0, 0),
            Face::Right => (-1, 0, 0),
            Face::Front => (0, 0, 1),
            Face::Back => (0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (x, y, z) = self.offset();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }

    /// Advances this face `steps` places around `axis`'s side cycle.
    /// Faces lying on the axis itself are returned unchanged.
    pub fn rotated(self, axis: Axis, steps: usize) -> Face {
        let cycle = axis.cycle();
        match cycle.iter().position(|f| *f == self) {
            Some(i) => cycle[(i + steps) % cycle.len()],
            None => self,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Order in which a positive quarter turn carries side faces.
    pub const fn cycle(self) -> [Face; 4] {
        match self {
            Axis::X => [Face::Back, Face::Bottom, Face::Front, Face::Top],
            Axis::Y => [Face::Left, Face::Front, Face::Right, Face::Back],
            Axis::Z => [Face::Left, Face::Top, Face::Right, Face::Bottom],
        }
    }
}

/// Number of quarter turns for an angle, rounded half up and wrapped into `0..4`.
#[inline]
pub fn quarter_turns(degrees: f32) -> usize {
    ((degrees / 90.0 + 0.5).floor() as i64).rem_euclid(4) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_round_and_wrap() {
        assert_eq!(quarter_turns(0.0), 0);
        assert_eq!(quarter_turns(90.0), 1);
        assert_eq!(quarter_turns(45.0), 1);
        assert_eq!(quarter_turns(44.0), 0);
        assert_eq!(quarter_turns(135.0), 2);
        assert_eq!(quarter_turns(360.0), 0);
        assert_eq!(quarter_turns(-90.0), 3);
        assert_eq!(quarter_turns(-180.0), 2);
    }

    #[test]
    fn offsets_are_opposite() {
        for f in Face::ALL {
            let (x, y, z) = f.offset();
            let (ox, oy, oz) = f.opposite().offset();
            assert_eq!((x + ox, y + oy, z + oz), (0, 0, 0));
            assert_eq!(Face::from_index(f.index()), Some(f));
        }
        assert_eq!(Face::from_index(6), None);
    }

    #[test]
    fn y_cycle_leaves_caps_alone() {
        assert_eq!(Face::Left.rotated(Axis::Y, 1), Face::Front);
        assert_eq!(Face::Back.rotated(Axis::Y, 1), Face::Left);
        assert_eq!(Face::Top.rotated(Axis::Y, 3), Face::Top);
        assert_eq!(Face::Back.rotated(Axis::X, 1), Face::Bottom);
        assert_eq!(Face::Left.rotated(Axis::Z, 1), Face::Top);
    }
}
