use quarry_geom::{Matrix4, Vec3};

use crate::face::{Axis, Face, quarter_turns};
use crate::texture::Texture;

/// Pixels per block edge; face definitions and join offsets use this unit.
pub const PIXELS_PER_BLOCK: f32 = 16.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModelVertex {
    /// Position inside the block's unit cube.
    pub pos: Vec3,
    pub u: f32,
    pub v: f32,
}

/// Which biome palette, if any, recolours a face at render time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BiomeTint {
    #[default]
    None,
    Grass,
    Foliage,
}

/// One quad of a model.
///
/// Vertices form a 2x2 grid in the face's plane: `v0` and `v3` are opposite
/// corners, `v1` and `v2` the off-diagonal ones. Triangles `[2,1,0]` and
/// `[1,2,3]` wind counter-clockwise seen from outside.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFace {
    pub face: Face,
    pub texture: Texture,
    pub rgb: [u8; 3],
    pub cullable: bool,
    pub tint: BiomeTint,
    pub vertices: [ModelVertex; 4],
}

impl ModelFace {
    /// Builds an axis-aligned quad from pixel units.
    ///
    /// The plane sits at `depth` along the face's axis; `(x, y, w, h)` span
    /// the in-plane axes: X,Z for Top/Bottom, Z,Y for Left/Right and X,Y for
    /// Front/Back.
    pub fn new(face: Face, texture: Texture, x: f32, y: f32, w: f32, h: f32, depth: f32) -> Self {
        let d = depth / PIXELS_PER_BLOCK;
        let p = [x / PIXELS_PER_BLOCK, (x + w) / PIXELS_PER_BLOCK];
        let q = [y / PIXELS_PER_BLOCK, (y + h) / PIXELS_PER_BLOCK];
        // (a, b) grid axes per face; a x b points into the block.
        let corner = |i: usize, j: usize| -> Vec3 {
            match face {
                Face::Top => Vec3::new(p[i], d, q[j]),
                Face::Bottom => Vec3::new(p[j], d, q[i]),
                Face::Left => Vec3::new(d, q[j], p[i]),
                Face::Right => Vec3::new(d, q[i], p[j]),
                Face::Front => Vec3::new(p[j], q[i], d),
                Face::Back => Vec3::new(p[i], q[j], d),
            }
        };
        let mut vertices = [ModelVertex {
            pos: Vec3::ZERO,
            u: 0.0,
            v: 0.0,
        }; 4];
        for (n, vertex) in vertices.iter_mut().enumerate() {
            let pos = corner(n & 1, n >> 1);
            let (u, v) = texture_coords(face, pos);
            *vertex = ModelVertex { pos, u, v };
        }
        Self {
            face,
            texture,
            rgb: [255, 255, 255],
            cullable: false,
            tint: BiomeTint::None,
            vertices,
        }
    }

    /// Remaps this face's UVs onto the pixel rectangle `(tx, ty, tw, th)` of
    /// its texture, keeping the current orientation.
    pub fn with_texture_rect(mut self, tx: f32, ty: f32, tw: f32, th: f32) -> Self {
        let (mut u0, mut u1) = (f32::MAX, f32::MIN);
        let (mut v0, mut v1) = (f32::MAX, f32::MIN);
        for vert in &self.vertices {
            u0 = u0.min(vert.u);
            u1 = u1.max(vert.u);
            v0 = v0.min(vert.v);
            v1 = v1.max(vert.v);
        }
        let remap = |t: f32, lo: f32, hi: f32, start: f32, len: f32| {
            let frac = if hi > lo { (t - lo) / (hi - lo) } else { 0.0 };
            (start + frac * len) / PIXELS_PER_BLOCK
        };
        for vert in &mut self.vertices {
            vert.u = remap(vert.u, u0, u1, tx, tw);
            vert.v = remap(vert.v, v0, v1, ty, th);
        }
        self
    }

    pub fn with_cullable(mut self, cullable: bool) -> Self {
        self.cullable = cullable;
        self
    }

    pub fn with_tint(mut self, tint: BiomeTint) -> Self {
        self.tint = tint;
        self
    }
}

/// UVs derived from a vertex position for a given face orientation.
fn texture_coords(face: Face, pos: Vec3) -> (f32, f32) {
    let u = match face {
        Face::Left => 1.0 - pos.z,
        Face::Right => pos.z,
        Face::Back => 1.0 - pos.x,
        Face::Top | Face::Bottom | Face::Front => pos.x,
    };
    let v = match face {
        Face::Top | Face::Bottom => pos.z,
        _ => 1.0 - pos.y,
    };
    (u, v)
}

/// Geometry of one block instance: an ordered list of quads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    faces: Vec<ModelFace>,
    force_shade: bool,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Six full-size cullable faces, one per orientation.
    pub fn cube(mut texture: impl FnMut(Face) -> Texture) -> Self {
        let mut model = Model::new();
        for face in Face::ALL {
            let depth = match face {
                Face::Top | Face::Left | Face::Front => PIXELS_PER_BLOCK,
                Face::Bottom | Face::Right | Face::Back => 0.0,
            };
            model.add_face(
                ModelFace::new(face, texture(face), 0.0, 0.0, PIXELS_PER_BLOCK, PIXELS_PER_BLOCK, depth)
                    .with_cullable(true),
            );
        }
        model
    }

    pub fn add_face(&mut self, face: ModelFace) -> &mut Self {
        self.faces.push(face);
        self
    }

    pub fn faces(&self) -> &[ModelFace] {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut [ModelFace] {
        &mut self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Marks the model as never self-shadowing: air around it counts as full sky.
    pub fn force_shade(&mut self) -> &mut Self {
        self.force_shade = true;
        self
    }

    pub fn is_force_shaded(&self) -> bool {
        self.force_shade
    }

    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        // Negated so a positive quarter turn carries Back onto Bottom.
        self.rotate(Axis::X, &Matrix4::rotation_x(-degrees.to_radians()), degrees)
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.rotate(Axis::Y, &Matrix4::rotation_y(-degrees.to_radians()), degrees)
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.rotate(Axis::Z, &Matrix4::rotation_z(degrees.to_radians()), degrees)
    }

    fn rotate(&mut self, axis: Axis, m: &Matrix4, degrees: f32) -> &mut Self {
        let steps = quarter_turns(degrees);
        for face in &mut self.faces {
            for vert in &mut face.vertices {
                vert.pos = (vert.pos - Vec3::BLOCK_CENTER).apply(m) + Vec3::BLOCK_CENTER;
            }
            face.face = face.face.rotated(axis, steps);
        }
        self
    }

    /// Recomputes every UV from vertex positions.
    pub fn realign_textures(&mut self) -> &mut Self {
        for face in &mut self.faces {
            let orientation = face.face;
            for vert in &mut face.vertices {
                let (u, v) = texture_coords(orientation, vert.pos);
                vert.u = u;
                vert.v = v;
            }
        }
        self
    }

    /// Mirrors the model vertically.
    pub fn flip(&mut self) -> &mut Self {
        for face in &mut self.faces {
            for vert in &mut face.vertices {
                vert.pos.y = 1.0 - vert.pos.y;
            }
            face.face = match face.face {
                Face::Top => Face::Bottom,
                Face::Bottom => Face::Top,
                other => other,
            };
            face.vertices.swap(1, 2);
        }
        self
    }

    /// Appends copies of `other`'s faces shifted by a pixel offset.
    pub fn join(&mut self, other: &Model, ox: f32, oy: f32, oz: f32) -> &mut Self {
        let shift = Vec3::new(ox, oy, oz) / PIXELS_PER_BLOCK;
        self.faces.reserve(other.faces.len());
        for face in &other.faces {
            let mut copy = face.clone();
            for vert in &mut copy.vertices {
                vert.pos += shift;
            }
            self.faces.push(copy);
        }
        self
    }

    pub fn duplicate(&self) -> Model {
        self.duplicate_with(|t| t)
    }

    /// Deep copy with every face texture passed through `substitute`.
    pub fn duplicate_with(&self, mut substitute: impl FnMut(Texture) -> Texture) -> Model {
        Model {
            faces: self
                .faces
                .iter()
                .map(|f| ModelFace {
                    texture: substitute(f.texture),
                    ..f.clone()
                })
                .collect(),
            force_shade: self.force_shade,
        }
    }
}
