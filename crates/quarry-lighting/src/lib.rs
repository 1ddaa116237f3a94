//! Per-vertex light sampling and biome tint resolution for the mesher.
#![forbid(unsafe_code)]

mod palette;

use quarry_geom::Vec3;
use quarry_model::Face;
use quarry_world::{MAX_LIGHT, WorldView};

pub use palette::{BiomePalette, MISSING_TINT};

/// Light reaching one vertex: block-emitted and sky light, each `0..=15`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightSample {
    pub emitted: u8,
    pub sky: u8,
}

impl LightSample {
    pub const DARK: LightSample = LightSample { emitted: 0, sky: 0 };

    pub const fn new(emitted: u8, sky: u8) -> Self {
        Self { emitted, sky }
    }
}

/// Flat light of `face` of the block at `(x, y, z)`: the light of the cell
/// the face looks into.
pub fn flat_light<W: WorldView + ?Sized>(world: &W, x: i32, y: i32, z: i32, face: Face) -> LightSample {
    let (dx, dy, dz) = face.offset();
    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
    LightSample::new(world.emitted_light(nx, ny, nz), world.sky_light(nx, ny, nz))
}

/// Inclusive per-axis sample offsets around a vertex, as `[lo, hi]` for X, Y
/// and Z. Each range reaches outward from the rendered face.
pub const fn smooth_offsets(face: Face) -> [[i32; 2]; 3] {
    match face {
        Face::Top => [[-1, 0], [0, 1], [-1, 0]],
        Face::Bottom => [[-1, 0], [-2, -1], [-1, 0]],
        Face::Left => [[0, 1], [-1, 0], [-1, 0]],
        Face::Right => [[-2, -1], [-1, 0], [-1, 0]],
        Face::Front => [[-1, 0], [-1, 0], [0, 1]],
        Face::Back => [[-1, 0], [-1, 0], [-2, -1]],
    }
}

/// Smooth light at a vertex given in world coordinates.
///
/// Averages the cells around `vertex` picked by [`smooth_offsets`]. With
/// `force_shade`, cells holding a non-renderable block count as full sky
/// light.
pub fn smooth_light<W: WorldView + ?Sized>(world: &W, vertex: Vec3, face: Face, force_shade: bool) -> LightSample {
    let [xr, yr, zr] = smooth_offsets(face);
    let mut emitted = 0u32;
    let mut sky = 0u32;
    let mut count = 0u32;
    for ox in xr[0]..=xr[1] {
        for oy in yr[0]..=yr[1] {
            for oz in zr[0]..=zr[1] {
                let (bx, by, bz) = (vertex + Vec3::new(ox as f32, oy as f32, oz as f32)).floor_i32();
                count += 1;
                emitted += u32::from(world.emitted_light(bx, by, bz));
                sky += if force_shade && !world.block(bx, by, bz).is_renderable() {
                    u32::from(MAX_LIGHT)
                } else {
                    u32::from(world.sky_light(bx, by, bz))
                };
            }
        }
    }
    if count == 0 {
        return LightSample::new(clamp_light(emitted), clamp_light(sky));
    }
    LightSample::new(clamp_light(emitted / count), clamp_light(sky / count))
}

#[inline]
fn clamp_light(v: u32) -> u8 {
    v.min(u32::from(MAX_LIGHT)) as u8
}
