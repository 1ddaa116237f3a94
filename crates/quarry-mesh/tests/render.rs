use quarry_blocks::{BlockRef, BlockRegistry, DEFAULT_TEXTURES};
use quarry_chunk::{ChunkBuf, ResidentWorld};
use quarry_geom::Vec3;
use quarry_lighting::{BiomePalette, LightSample, flat_light};
use quarry_mesh::{
    AlwaysRender, BlockChecker, Endian, MeshBuilder, MeshOptions, RenderCtx, VertexRecord, build_chunk_mesh,
    build_chunk_mesh_into, constants::VERTEX_SIZE,
};
use quarry_model::{BiomeTint, Face, Model, ModelFace, TextureAtlas};
use quarry_world::{BiomeTable, ChunkCoord, WorldView};

const HEIGHT: usize = 8;

fn registry() -> BlockRegistry {
    BlockRegistry::with_defaults(&TextureAtlas::grid(16, 16, DEFAULT_TEXTURES))
}

fn block(reg: &BlockRegistry, name: &str) -> BlockRef {
    reg.default_block(name).unwrap().block_ref()
}

fn chunk(fill: impl Fn(&mut ChunkBuf)) -> ChunkBuf {
    let mut buf = ChunkBuf::new(ChunkCoord::new(0, 0), 16, HEIGHT, 16);
    fill(&mut buf);
    buf
}

fn top_only(reg: &BlockRegistry) -> Model {
    let tex = reg.default_block("stone").unwrap().texture(Face::Top).unwrap();
    let mut m = Model::new();
    m.add_face(ModelFace::new(Face::Top, tex, 0.0, 0.0, 16.0, 16.0, 16.0).with_cullable(true));
    m
}

#[test]
fn cullable_face_against_opaque_neighbour_emits_nothing() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::with_defaults();
    let stone = block(&reg, "stone");
    let model = top_only(&reg);

    for (above, expected) in [(BlockRef::AIR, 6), (stone, 0)] {
        let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
        world.insert(chunk(|b| {
            b.set_local(4, 2, 4, stone);
            b.set_local(4, 3, 4, above);
        }));
        let ctx = RenderCtx {
            world: &world,
            palette: &palette,
            base_x: 0,
            base_z: 0,
        };
        let mut out = MeshBuilder::new(0);
        let checker = BlockChecker::new(world.block(4, 2, 4), true);
        assert_eq!(ctx.render_model(&mut out, &model, 4, 2, 4, &checker), expected);
        assert_eq!(out.vertex_count(), expected);
    }
}

#[test]
fn missing_neighbour_chunk_culls_border_faces() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::new();
    let stone = block(&reg, "stone");
    let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    world.insert(chunk(|b| b.set_local(0, 3, 5, stone)));
    let buf = world.chunk(ChunkCoord::new(0, 0)).unwrap();
    let mesh = build_chunk_mesh(buf, &world, &palette, &MeshOptions::default());
    // the -X face looks into an unloaded chunk
    assert_eq!(mesh.vertex_count, 5 * 6);
    assert!(mesh.vertices().all(|v| v.pos[0] >= 0.0));
}

#[test]
fn uniform_light_reaches_every_vertex() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::new();
    let stone = block(&reg, "stone");
    let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    world.insert(chunk(|b| {
        b.emitted.fill(6);
        b.sky.fill(11);
        b.set_local(8, 3, 8, stone);
    }));
    let ctx = RenderCtx {
        world: &world,
        palette: &palette,
        base_x: 0,
        base_z: 0,
    };
    let mut out = MeshBuilder::new(0);
    let stone_block = world.block(8, 3, 8);
    let n = ctx.render_model(&mut out, stone_block.model(), 8, 3, 8, &BlockChecker::new(stone_block, true));
    assert_eq!(n, 36);
    let mesh = out.finish(ChunkCoord::new(0, 0));
    assert!(mesh.vertices().all(|v| v.light == LightSample::new(6, 11)));
}

#[test]
fn triangles_wind_counter_clockwise_from_outside() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::new();
    let world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    let stone = reg.default_block("stone").unwrap();
    let ctx = RenderCtx {
        world: &world,
        palette: &palette,
        base_x: 0,
        base_z: 0,
    };
    let mut out = MeshBuilder::new(0);
    ctx.render_model(&mut out, stone.model(), 1, 1, 1, &AlwaysRender);
    let mesh = out.finish(ChunkCoord::new(0, 0));
    let verts: Vec<VertexRecord> = mesh.vertices().collect();
    assert_eq!(verts.len(), 36);
    let centre = Vec3::new(1.5, 1.5, 1.5);
    for tri in verts.chunks_exact(3) {
        let p: Vec<Vec3> = tri.iter().map(|v| Vec3::new(v.pos[0], v.pos[1], v.pos[2])).collect();
        let n = (p[1] - p[0]).cross(p[2] - p[0]);
        let outward = (p[0] + p[1] + p[2]) / 3.0 - centre;
        assert!(n.dot(outward) > 0.0, "{p:?}");
    }
}

#[test]
fn emitted_order_follows_face_vertices() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::new();
    let world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    let model = top_only(&reg);
    let ctx = RenderCtx {
        world: &world,
        palette: &palette,
        base_x: 32,
        base_z: -16,
    };
    let mut out = MeshBuilder::new(0);
    ctx.render_model(&mut out, &model, 35, 2, -13, &AlwaysRender);
    let mesh = out.finish(ChunkCoord::new(2, -1));
    let face = &model.faces()[0];
    for (k, i) in [2, 1, 0, 1, 2, 3].into_iter().enumerate() {
        let v = mesh.vertex(k).unwrap();
        let src = face.vertices[i];
        assert_eq!(v.pos, [3.0 + src.pos.x, 2.0 + src.pos.y, 3.0 + src.pos.z]);
        assert_eq!(v.uv, [src.u, src.v]);
        assert_eq!(v.atlas, face.texture.rect());
        assert_eq!(v.rgba, [255, 255, 255, 255]);
    }
    assert!(mesh.vertex(6).is_none());
}

#[test]
fn liquids_cull_their_own_kind_only() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::new();
    let water = block(&reg, "water");
    let lava = block(&reg, "lava");
    for (neighbour, faces) in [(water, 5), (lava, 6), (BlockRef::AIR, 6)] {
        let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
        world.insert(chunk(|b| {
            b.set_local(5, 2, 5, water);
            b.set_local(6, 2, 5, neighbour);
        }));
        let ctx = RenderCtx {
            world: &world,
            palette: &palette,
            base_x: 0,
            base_z: 0,
        };
        let w = world.block(5, 2, 5);
        let mut out = MeshBuilder::new(0);
        let n = ctx.render_model(&mut out, w.model(), 5, 2, 5, &BlockChecker::new(w, true));
        assert_eq!(n, faces * 6);
    }
}

#[test]
fn grass_top_is_tinted_without_touching_the_model() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::with_defaults();
    let grass = block(&reg, "grass");
    let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    world.insert(chunk(|b| {
        b.biomes.fill(4);
        b.set_local(8, 2, 8, grass);
    }));
    let g = world.block(8, 2, 8);
    let expected = palette.tint_at(&world, 8, 8, BiomeTint::Grass);
    assert_eq!(expected, [0x79, 0xC0, 0x5A]);

    let ctx = RenderCtx {
        world: &world,
        palette: &palette,
        base_x: 0,
        base_z: 0,
    };
    let mut out = MeshBuilder::new(0);
    ctx.render_model(&mut out, g.model(), 8, 2, 8, &BlockChecker::new(g, true));
    let mesh = out.finish(ChunkCoord::new(0, 0));
    let tinted = mesh
        .vertices()
        .filter(|v| v.rgba == [expected[0], expected[1], expected[2], 255])
        .count();
    assert_eq!(tinted, 6);
    for f in g.model().faces() {
        assert_eq!(f.rgb, [255, 255, 255]);
    }
}

#[test]
fn flat_shaded_blocks_ignore_smooth_lighting() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::new();
    let lever = block(&reg, "lever");
    let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    world.insert(chunk(|b| {
        for (i, e) in b.emitted.iter_mut().enumerate() {
            *e = (i % 16) as u8;
        }
        b.set_local(7, 2, 7, lever);
    }));
    let l = world.block(7, 2, 7);
    let checker = BlockChecker::new(l, true);
    let ctx = RenderCtx {
        world: &world,
        palette: &palette,
        base_x: 0,
        base_z: 0,
    };
    let mut out = MeshBuilder::new(0);
    ctx.render_model(&mut out, l.model(), 7, 2, 7, &checker);
    let mesh = out.finish(ChunkCoord::new(0, 0));
    assert_eq!(mesh.vertex_count, l.model().len() * 6);
    for (k, v) in mesh.vertices().enumerate() {
        let face = l.model().faces()[k / 6].face;
        assert_eq!(v.light, flat_light(&world, 7, 2, 7, face));
    }
}

#[test]
fn records_read_back_in_either_byte_order() {
    let rec = VertexRecord {
        pos: [1.5, -2.0, 16.0],
        rgba: [10, 20, 30, 255],
        uv: [0.25, 0.75],
        atlas: [32.0, 48.0, 16.0, 16.0],
        light: LightSample::new(9, 14),
    };
    for endian in [Endian::Little, Endian::Big] {
        let mut b = MeshBuilder::with_endian(0, endian);
        b.push(&rec);
        b.push(&VertexRecord::default());
        let mesh = b.finish(ChunkCoord::new(0, 0));
        assert_eq!(mesh.len, 2 * VERTEX_SIZE);
        assert!(mesh.bytes.len() >= mesh.len);
        assert_eq!(mesh.vertex(0), Some(rec));
        assert_eq!(mesh.vertex(1), Some(VertexRecord::default()));
        assert_eq!(mesh.vertex(2), None);
        assert_eq!(&mesh.data()[42..44], &[0, 0]);
    }
}

#[test]
fn generated_terrain_meshes_cleanly() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::with_defaults();
    let params = quarry_world::TerrainParams {
        height: 96,
        ..Default::default()
    };
    let terrain = quarry_world::Terrain::new(params, &reg);
    let mut world = ResidentWorld::new(&reg, &biomes, 96);
    for coord in std::iter::once(ChunkCoord::new(0, 0)).chain(ChunkCoord::new(0, 0).neighbors()) {
        assert!(world.insert(quarry_chunk::generate_chunk(&terrain, coord)));
    }
    let buf = world.chunk(ChunkCoord::new(0, 0)).unwrap();
    let mesh = build_chunk_mesh(buf, &world, &palette, &MeshOptions::default());
    assert!(!mesh.is_empty());
    assert_eq!(mesh.vertex_count % 6, 0);
    assert_eq!(mesh.len, mesh.vertex_count * VERTEX_SIZE);
    for v in mesh.vertices() {
        assert!(v.pos.iter().all(|p| p.is_finite()));
        assert!((-1.0..=17.0).contains(&v.pos[0]) && (-1.0..=17.0).contains(&v.pos[2]));
        assert!(v.light.emitted <= 15 && v.light.sky <= 15);
        assert_eq!(v.rgba[3], 255);
    }
}

#[test]
fn reused_builder_keeps_its_allocation() {
    let reg = registry();
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::with_defaults();
    let stone = block(&reg, "stone");
    let (west, east) = (ChunkCoord::new(0, 0), ChunkCoord::new(1, 0));
    let mut world = ResidentWorld::new(&reg, &biomes, HEIGHT);
    world.insert(chunk(|b| b.set_local(5, 2, 5, stone)));
    let mut second = ChunkBuf::new(east, 16, HEIGHT, 16);
    second.set_local(3, 1, 7, stone);
    second.set_local(3, 2, 7, stone);
    world.insert(second);
    let options = MeshOptions::default();
    let (a, b) = (world.chunk(west).unwrap(), world.chunk(east).unwrap());

    let mut out = MeshBuilder::new(0);
    let first = build_chunk_mesh_into(&mut out, a, &world, &palette, &options);
    assert_eq!(first, 6 * 6);
    assert_eq!(out.buffer().offset(), first * VERTEX_SIZE);
    let appended = build_chunk_mesh_into(&mut out, b, &world, &palette, &options);
    assert_eq!(appended, 10 * 6);
    // each call accounts only for its own share of the buffer
    assert_eq!(out.buffer().offset(), (first + appended) * VERTEX_SIZE);

    let capacity = out.buffer().capacity();
    out.clear_keep_capacity();
    assert!(out.is_empty());
    assert_eq!(out.buffer().offset(), 0);
    assert_eq!(out.buffer().capacity(), capacity);

    assert_eq!(build_chunk_mesh_into(&mut out, b, &world, &palette, &options), appended);
    assert_eq!(out.buffer().capacity(), capacity);
    let reused = out.finish(east);
    let fresh = build_chunk_mesh(b, &world, &palette, &options);
    assert_eq!(reused.vertex_count, fresh.vertex_count);
    assert_eq!(reused.data(), fresh.data());
}
