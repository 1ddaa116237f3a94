use quarry_blocks::Block;

use crate::biome::Biome;

/// Highest emitted or sky light level.
pub const MAX_LIGHT: u8 = 15;

/// Read access to resident world data, in world block coordinates.
///
/// Implementations must answer for any coordinate; regions that are not
/// loaded follow the implementation's fallback rules rather than failing.
pub trait WorldView {
    fn block(&self, x: i32, y: i32, z: i32) -> &Block;
    fn emitted_light(&self, x: i32, y: i32, z: i32) -> u8;
    fn sky_light(&self, x: i32, y: i32, z: i32) -> u8;
    fn biome(&self, x: i32, z: i32) -> Biome;
}
