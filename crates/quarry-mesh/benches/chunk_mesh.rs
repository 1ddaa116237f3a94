use criterion::{Criterion, black_box, criterion_group, criterion_main};

use quarry_blocks::{BlockRegistry, DEFAULT_TEXTURES};
use quarry_chunk::{ResidentWorld, generate_chunk};
use quarry_lighting::BiomePalette;
use quarry_mesh::{MeshBuilder, MeshOptions, build_chunk_mesh, build_chunk_mesh_into};
use quarry_model::TextureAtlas;
use quarry_world::{BiomeTable, ChunkCoord, Terrain, TerrainParams};

fn bench_build_chunk_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh");
    let reg = BlockRegistry::with_defaults(&TextureAtlas::grid(16, 16, DEFAULT_TEXTURES));
    let biomes = BiomeTable::with_defaults();
    let palette = BiomePalette::with_defaults();
    let terrain = Terrain::new(TerrainParams::default(), &reg);
    let height = terrain.params().height as usize;
    let centre = ChunkCoord::new(0, 0);
    let mut world = ResidentWorld::new(&reg, &biomes, height);
    for coord in std::iter::once(centre).chain(centre.neighbors()) {
        world.insert(generate_chunk(&terrain, coord));
    }
    let Some(buf) = world.chunk(centre) else {
        return;
    };

    for (name, smooth) in [("smooth_16x128x16", true), ("flat_16x128x16", false)] {
        let options = MeshOptions {
            smooth_lighting: smooth,
            ..MeshOptions::default()
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mesh = build_chunk_mesh(buf, &world, &palette, &options);
                black_box(mesh);
            })
        });
    }
    let options = MeshOptions::default();
    let mut out = MeshBuilder::new(options.initial_buffer_size);
    group.bench_function("reused_builder_16x128x16", |b| {
        b.iter(|| {
            out.clear_keep_capacity();
            black_box(build_chunk_mesh_into(&mut out, buf, &world, &palette, &options));
        })
    });
    group.finish();
}

fn bench_generate_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chunk");
    let reg = BlockRegistry::with_defaults(&TextureAtlas::grid(16, 16, DEFAULT_TEXTURES));
    let terrain = Terrain::new(TerrainParams::default(), &reg);
    group.bench_function("generate_chunk_16x128x16", |b| {
        b.iter(|| {
            let buf = generate_chunk(&terrain, ChunkCoord::new(3, -2));
            black_box(buf);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build_chunk_mesh, bench_generate_chunk);
criterion_main!(benches);
