use quarry_blocks::Block;
use quarry_geom::Vec3;
use quarry_lighting::{BiomePalette, LightSample, flat_light, smooth_light};
use quarry_model::{BiomeTint, Model};
use quarry_world::WorldView;

use crate::mesh_build::MeshBuilder;

/// Per-block culling and lighting policy used while rendering a model.
pub trait RenderChecker {
    /// Whether a cullable face is drawn when `other` occupies the cell it
    /// faces.
    fn should_render_against(&self, other: &Block) -> bool;
    fn use_smooth_lighting(&self) -> bool;
}

/// Draws every face with smooth lighting.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysRender;

impl RenderChecker for AlwaysRender {
    fn should_render_against(&self, _other: &Block) -> bool {
        true
    }

    fn use_smooth_lighting(&self) -> bool {
        true
    }
}

/// The checker chunk builds use for `block`: a face is hidden by an
/// occluding neighbour, or by a neighbour of the same shape when the shape
/// culls its own kind.
#[derive(Copy, Clone, Debug)]
pub struct BlockChecker<'a> {
    block: &'a Block,
    smooth: bool,
}

impl<'a> BlockChecker<'a> {
    pub fn new(block: &'a Block, smooth_lighting: bool) -> Self {
        Self {
            block,
            smooth: smooth_lighting && !block.flat_shading(),
        }
    }
}

impl RenderChecker for BlockChecker<'_> {
    fn should_render_against(&self, other: &Block) -> bool {
        if other.occludes() {
            return false;
        }
        !(self.block.culls_same() && self.block.same_shape(other))
    }

    fn use_smooth_lighting(&self) -> bool {
        self.smooth
    }
}

/// Where a model is drawn from and where its output goes.
pub struct RenderCtx<'a, W: ?Sized> {
    pub world: &'a W,
    pub palette: &'a BiomePalette,
    /// World X/Z of the chunk origin; emitted positions are relative to it.
    pub base_x: i32,
    pub base_z: i32,
}

impl<W: WorldView + ?Sized> RenderCtx<'_, W> {
    /// Renders `model` for the block at world `(wx, wy, wz)` and returns the
    /// number of vertices written.
    ///
    /// Cullable faces are skipped when `checker` rejects the neighbour they
    /// face. Tinted faces take their colour from the biome palette; the model
    /// itself is never modified.
    pub fn render_model(
        &self,
        out: &mut MeshBuilder,
        model: &Model,
        wx: i32,
        wy: i32,
        wz: i32,
        checker: &dyn RenderChecker,
    ) -> usize {
        let world = self.world;
        let smooth = checker.use_smooth_lighting();
        let origin = Vec3::new(wx as f32, wy as f32, wz as f32);
        let local = Vec3::new((wx - self.base_x) as f32, wy as f32, (wz - self.base_z) as f32);
        let before = out.vertex_count();

        for face in model.faces() {
            if face.cullable {
                let (dx, dy, dz) = face.face.offset();
                if !checker.should_render_against(world.block(wx + dx, wy + dy, wz + dz)) {
                    continue;
                }
            }
            let rgb = match face.tint {
                BiomeTint::None => face.rgb,
                tint => self.palette.tint_at(world, wx, wz, tint),
            };
            let light: [LightSample; 4] = std::array::from_fn(|i| {
                if smooth {
                    smooth_light(world, origin + face.vertices[i].pos, face.face, model.is_force_shaded())
                } else {
                    flat_light(world, wx, wy, wz, face.face)
                }
            });
            let atlas = face.texture.rect();
            for i in [2, 1, 0, 1, 2, 3] {
                let v = &face.vertices[i];
                let p = local + v.pos;
                out.vertex([p.x, p.y, p.z], rgb, [v.u, v.v], atlas, light[i]);
            }
        }
        out.vertex_count() - before
    }
}
