//! The block set shipped with the engine.
use quarry_model::TextureAtlas;

use crate::kinds::{LeverDirection, LogAxis, LogVariant, SandVariant, ShapeKind};
use crate::registry::BlockRegistry;

/// Every texture name the default shapes ask the atlas for.
pub const DEFAULT_TEXTURES: &[&str] = &[
    "stone",
    "grass_top",
    "grass_side",
    "dirt",
    "cobblestone",
    "water_still",
    "lava_still",
    "sand",
    "red_sand",
    "log_oak",
    "log_oak_top",
    "log_spruce",
    "log_spruce_top",
    "log_birch",
    "log_birch_top",
    "log_jungle",
    "log_jungle_top",
    "leaves_oak",
    "tallgrass",
    "lever",
];

impl BlockRegistry {
    /// Registry with the default shapes, textures resolved through `atlas`.
    pub fn with_defaults(atlas: &TextureAtlas) -> Self {
        let mut reg = BlockRegistry::new();
        let tex = |name: &str| atlas.get(name);

        reg.register("stone", Some(1), |_| ShapeKind::Cube {
            texture: tex("stone"),
        });
        reg.register("grass", Some(2), |_| ShapeKind::Grass {
            top: tex("grass_top"),
            side: tex("grass_side"),
            bottom: tex("dirt"),
        });
        reg.register("dirt", Some(3), |_| ShapeKind::Cube {
            texture: tex("dirt"),
        });
        reg.register("cobblestone", Some(4), |_| ShapeKind::Cube {
            texture: tex("cobblestone"),
        });
        reg.register("water", Some(9), |a| ShapeKind::Liquid {
            texture: tex("water_still"),
            level: a.alloc_range("level", 0, 7),
            falling: a.alloc_bool("falling"),
        });
        reg.register("lava", Some(11), |a| ShapeKind::Liquid {
            texture: tex("lava_still"),
            level: a.alloc_range("level", 0, 7),
            falling: a.alloc_bool("falling"),
        });
        reg.register("sand", Some(12), |a| ShapeKind::Sand {
            default: tex("sand"),
            red: tex("red_sand"),
            variant: a.alloc_enum::<SandVariant>("variant"),
        });
        reg.register("log", Some(17), |a| {
            let names = ["oak", "spruce", "birch", "jungle"];
            ShapeKind::Log {
                sides: names.map(|n| tex(&format!("log_{n}"))),
                ends: names.map(|n| tex(&format!("log_{n}_top"))),
                variant: a.alloc_enum::<LogVariant>("variant"),
                axis: a.alloc_enum::<LogAxis>("axis"),
            }
        });
        reg.register("leaves", Some(18), |_| ShapeKind::Leaves {
            texture: tex("leaves_oak"),
        });
        reg.register("tall_grass", Some(31), |_| ShapeKind::Plant {
            texture: tex("tallgrass"),
        });
        reg.register("lever", Some(69), |a| ShapeKind::Lever {
            lever: tex("lever"),
            base: tex("cobblestone"),
            powered: a.alloc_bool("powered"),
            direction: a.alloc_enum::<LeverDirection>("direction"),
        });

        log::debug!(target: "blocks", "default registry: {} shapes", reg.len());
        reg
    }
}
