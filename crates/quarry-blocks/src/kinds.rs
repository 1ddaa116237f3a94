//! Behaviour table for every kind of block shape.
use quarry_geom::Aabb;
use quarry_model::{BiomeTint, Face, Model, ModelFace, Texture};

use crate::state::{StateKey, StateMap};
use crate::state_enum;

state_enum! {
    pub enum SandVariant {
        Default => "default",
        Red => "red",
    }
}

state_enum! {
    pub enum LogVariant {
        Oak => "oak",
        Spruce => "spruce",
        Birch => "birch",
        Jungle => "jungle",
    }
}

state_enum! {
    /// Direction the grain runs; `None` is bark on all six sides.
    pub enum LogAxis {
        Y => "y",
        X => "x",
        Z => "z",
        None => "none",
    }
}

impl LogAxis {
    #[inline]
    pub fn legacy(self) -> u16 {
        self.ordinal() as u16 * 4
    }
}

state_enum! {
    /// Lever placements in legacy data order.
    pub enum LeverDirection {
        DownX => "down_x",
        East => "east",
        West => "west",
        South => "south",
        North => "north",
        UpZ => "up_z",
        UpX => "up_x",
        DownZ => "down_z",
    }
}

impl LeverDirection {
    /// Quarter turns `(y, z, x)` applied, in that order, to the north-facing model.
    pub fn quarter_turns(self) -> (u8, u8, u8) {
        match self {
            LeverDirection::DownX => (1, 3, 0),
            LeverDirection::East => (1, 0, 0),
            LeverDirection::West => (3, 0, 0),
            LeverDirection::South => (2, 0, 0),
            LeverDirection::North => (0, 0, 0),
            LeverDirection::UpZ => (0, 0, 3),
            LeverDirection::UpX => (1, 1, 0),
            LeverDirection::DownZ => (0, 0, 1),
        }
    }
}

/// What a shape is, with its resolved textures and state keys.
#[derive(Clone, Debug)]
pub enum ShapeKind {
    Air,
    /// Stand-in for blocks in chunks that are not resident.
    Unloaded,
    Cube {
        texture: Texture,
    },
    Grass {
        top: Texture,
        side: Texture,
        bottom: Texture,
    },
    Leaves {
        texture: Texture,
    },
    Liquid {
        texture: Texture,
        level: StateKey<i32>,
        falling: StateKey<bool>,
    },
    Sand {
        default: Texture,
        red: Texture,
        variant: StateKey<SandVariant>,
    },
    Log {
        /// Bark, indexed by variant ordinal.
        sides: [Texture; 4],
        /// Cut ends, indexed by variant ordinal.
        ends: [Texture; 4],
        variant: StateKey<LogVariant>,
        axis: StateKey<LogAxis>,
    },
    /// Cross-shaped foliage such as tall grass.
    Plant {
        texture: Texture,
    },
    Lever {
        lever: Texture,
        base: Texture,
        powered: StateKey<bool>,
        direction: StateKey<LeverDirection>,
    },
}

impl ShapeKind {
    /// Shape-specific low nibble of the legacy id.
    pub fn legacy_data(&self, state: &StateMap) -> u16 {
        match self {
            ShapeKind::Liquid { level, falling, .. } => {
                state.get(*level) as u16 | (u16::from(state.get(*falling)) << 3)
            }
            ShapeKind::Sand { variant, .. } => state.get(*variant).ordinal() as u16,
            ShapeKind::Log { variant, axis, .. } => {
                state.get(*variant).ordinal() as u16 + state.get(*axis).legacy()
            }
            ShapeKind::Lever {
                powered, direction, ..
            } => state.get(*direction).ordinal() as u16 | (u16::from(state.get(*powered)) << 3),
            _ => 0,
        }
    }

    pub fn texture(&self, state: &StateMap, face: Face) -> Option<Texture> {
        let t = match self {
            ShapeKind::Air | ShapeKind::Unloaded => return None,
            ShapeKind::Cube { texture }
            | ShapeKind::Leaves { texture }
            | ShapeKind::Liquid { texture, .. }
            | ShapeKind::Plant { texture } => *texture,
            ShapeKind::Grass { top, side, bottom } => match face {
                Face::Top => *top,
                Face::Bottom => *bottom,
                _ => *side,
            },
            ShapeKind::Sand {
                default,
                red,
                variant,
            } => match state.get(*variant) {
                SandVariant::Default => *default,
                SandVariant::Red => *red,
            },
            ShapeKind::Log {
                sides,
                ends,
                variant,
                axis,
            } => {
                let v = state.get(*variant).ordinal() as usize;
                let end = match state.get(*axis) {
                    LogAxis::X => matches!(face, Face::Left | Face::Right),
                    LogAxis::Y => matches!(face, Face::Top | Face::Bottom),
                    LogAxis::Z => matches!(face, Face::Front | Face::Back),
                    LogAxis::None => false,
                };
                if end { ends[v] } else { sides[v] }
            }
            ShapeKind::Lever { lever, .. } => *lever,
        };
        Some(t)
    }

    pub fn build_model(&self, state: &StateMap) -> Model {
        match self {
            ShapeKind::Air | ShapeKind::Unloaded => Model::new(),
            ShapeKind::Cube { .. } | ShapeKind::Sand { .. } | ShapeKind::Log { .. } => {
                Model::cube(|face| self.texture(state, face).unwrap_or(MISSING))
            }
            ShapeKind::Grass { top, side, bottom } => {
                let mut model = Model::cube(|face| match face {
                    Face::Top => *top,
                    Face::Bottom => *bottom,
                    _ => *side,
                });
                for f in model.faces_mut() {
                    if f.face == Face::Top {
                        f.tint = BiomeTint::Grass;
                    }
                }
                model
            }
            ShapeKind::Leaves { texture } => {
                let mut model = Model::cube(|_| *texture);
                for f in model.faces_mut() {
                    f.tint = BiomeTint::Foliage;
                }
                model
            }
            ShapeKind::Liquid {
                texture,
                level,
                falling,
            } => liquid_model(*texture, state.get(*level), state.get(*falling)),
            ShapeKind::Plant { texture } => cross_model(*texture),
            ShapeKind::Lever {
                lever,
                base,
                powered,
                direction,
            } => lever_model(*lever, *base, state.get(*powered), state.get(*direction)),
        }
    }

    pub fn is_renderable(&self) -> bool {
        !matches!(self, ShapeKind::Air | ShapeKind::Unloaded)
    }

    /// Whether this shape hides the faces of its neighbours.
    pub fn occludes(&self) -> bool {
        matches!(
            self,
            ShapeKind::Unloaded
                | ShapeKind::Cube { .. }
                | ShapeKind::Grass { .. }
                | ShapeKind::Sand { .. }
                | ShapeKind::Log { .. }
        )
    }

    /// Whether two neighbours of this same shape hide the face between them.
    pub fn culls_same(&self) -> bool {
        matches!(self, ShapeKind::Liquid { .. })
    }

    pub fn flat_shading(&self) -> bool {
        matches!(self, ShapeKind::Lever { .. })
    }

    pub fn is_redstone_connectible(&self) -> bool {
        matches!(self, ShapeKind::Lever { .. })
    }

    pub fn collision_box(&self) -> Option<Aabb> {
        match self {
            ShapeKind::Unloaded
            | ShapeKind::Cube { .. }
            | ShapeKind::Grass { .. }
            | ShapeKind::Sand { .. }
            | ShapeKind::Log { .. }
            | ShapeKind::Leaves { .. } => Some(Aabb::UNIT),
            ShapeKind::Air | ShapeKind::Liquid { .. } | ShapeKind::Plant { .. } | ShapeKind::Lever { .. } => None,
        }
    }
}

const MISSING: Texture = Texture {
    id: quarry_model::TextureId(0),
    x: 0.0,
    y: 0.0,
    width: 16.0,
    height: 16.0,
};

/// Surface height of a liquid in pixels.
pub fn liquid_height(level: i32, falling: bool) -> f32 {
    if falling {
        16.0
    } else {
        16.0 * (8 - level.clamp(0, 7)) as f32 / 9.0
    }
}

fn liquid_model(texture: Texture, level: i32, falling: bool) -> Model {
    let h = liquid_height(level, falling);
    let mut model = Model::new();
    model
        .add_face(ModelFace::new(Face::Top, texture, 0.0, 0.0, 16.0, 16.0, h).with_cullable(true))
        .add_face(ModelFace::new(Face::Bottom, texture, 0.0, 0.0, 16.0, 16.0, 0.0).with_cullable(true))
        .add_face(ModelFace::new(Face::Left, texture, 0.0, 0.0, 16.0, h, 16.0).with_cullable(true))
        .add_face(ModelFace::new(Face::Right, texture, 0.0, 0.0, 16.0, h, 0.0).with_cullable(true))
        .add_face(ModelFace::new(Face::Front, texture, 0.0, 0.0, 16.0, h, 16.0).with_cullable(true))
        .add_face(ModelFace::new(Face::Back, texture, 0.0, 0.0, 16.0, h, 0.0).with_cullable(true));
    model
}

fn cross_model(texture: Texture) -> Model {
    let mut model = Model::new();
    for face in [Face::Front, Face::Back, Face::Left, Face::Right] {
        model.add_face(
            ModelFace::new(face, texture, 0.0, 0.0, 16.0, 16.0, 8.0).with_tint(BiomeTint::Grass),
        );
    }
    model.rotate_y(45.0).force_shade();
    model
}

fn lever_model(lever: Texture, base: Texture, powered: bool, direction: LeverDirection) -> Model {
    let mut stick = Model::new();
    stick
        .add_face(ModelFace::new(Face::Left, lever, 6.0, 3.0, 4.0, 10.0, 9.0).with_texture_rect(6.0, 6.0, 4.0, 10.0))
        .add_face(ModelFace::new(Face::Right, lever, 6.0, 3.0, 4.0, 10.0, 7.0).with_texture_rect(6.0, 6.0, 4.0, 10.0))
        .add_face(ModelFace::new(Face::Front, lever, 6.0, 3.0, 4.0, 10.0, 9.0).with_texture_rect(6.0, 6.0, 4.0, 10.0))
        .add_face(ModelFace::new(Face::Back, lever, 6.0, 3.0, 4.0, 10.0, 7.0).with_texture_rect(6.0, 6.0, 4.0, 10.0))
        .add_face(ModelFace::new(Face::Top, lever, 7.0, 7.0, 2.0, 2.0, 13.0).with_texture_rect(7.0, 6.0, 2.0, 2.0));

    let (angle, offset) = if powered { (135.0, -3.0) } else { (45.0, 3.0) };
    stick.rotate_x(angle);

    let mut model = Model::new();
    model.join(&stick, 0.0, offset, 3.0);
    model
        .add_face(ModelFace::new(Face::Back, base, 5.0, 4.0, 6.0, 8.0, 13.0))
        .add_face(ModelFace::new(Face::Left, base, 13.0, 4.0, 3.0, 8.0, 11.0))
        .add_face(ModelFace::new(Face::Right, base, 13.0, 4.0, 3.0, 8.0, 5.0))
        .add_face(ModelFace::new(Face::Top, base, 5.0, 13.0, 6.0, 3.0, 12.0))
        .add_face(ModelFace::new(Face::Bottom, base, 5.0, 13.0, 6.0, 3.0, 4.0));

    let (ry, rz, rx) = direction.quarter_turns();
    model
        .rotate_y(f32::from(ry) * 90.0)
        .rotate_z(f32::from(rz) * 90.0)
        .rotate_x(f32::from(rx) * 90.0);
    model
}
