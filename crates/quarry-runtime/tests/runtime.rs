use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use quarry_blocks::{BlockRegistry, DEFAULT_TEXTURES};
use quarry_chunk::{ResidentWorld, encode_chunk, generate_chunk};
use quarry_lighting::BiomePalette;
use quarry_mesh::{MeshOptions, build_chunk_mesh};
use quarry_model::TextureAtlas;
use quarry_runtime::{ChunkLoadRequest, ChunkMeshResponse, Runtime};
use quarry_world::{BiomeTable, ChunkCoord, Terrain, TerrainParams};

/// Collects responses until every submitted request is answered or dropped.
fn wait_for(rt: &Runtime, submitted: usize) -> Vec<ChunkMeshResponse> {
    let deadline = Instant::now() + Duration::from_secs(60);
    let mut out = Vec::new();
    while out.len() + rt.dropped() < submitted && Instant::now() < deadline {
        if let Some(res) = rt.recv_timeout(Duration::from_millis(20)) {
            out.push(res);
        }
    }
    out
}

fn wait_idle(rt: &Runtime) -> bool {
    let deadline = Instant::now() + Duration::from_secs(60);
    while !rt.is_idle() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(2));
    }
    true
}

fn params() -> TerrainParams {
    TerrainParams {
        height: 48,
        sea_level: 20,
        min_surface: 12,
        max_surface: 36,
        ..Default::default()
    }
}

#[test]
fn meshes_match_a_local_build() {
    let reg = Arc::new(BlockRegistry::with_defaults(&TextureAtlas::grid(16, 16, DEFAULT_TEXTURES)));
    let palette = Arc::new(BiomePalette::with_defaults());
    let biomes = BiomeTable::with_defaults();
    let terrain = Terrain::new(params(), &reg);
    let centre = ChunkCoord::new(1, -1);

    let mut world = ResidentWorld::new(&reg, &biomes, 48);
    let mut raw = Vec::new();
    for coord in std::iter::once(centre).chain(centre.neighbors()) {
        let buf = generate_chunk(&terrain, coord);
        raw.push((coord, Arc::<[u8]>::from(encode_chunk(&buf, &reg))));
        world.insert(buf);
    }
    let local = build_chunk_mesh(world.chunk(centre).unwrap(), &world, &palette, &MeshOptions::default());

    let rt = Runtime::new(Arc::clone(&reg), Arc::clone(&palette), MeshOptions::default(), 2).unwrap();
    assert_eq!(rt.workers(), 2);
    rt.submit(ChunkLoadRequest {
        coord: centre,
        job_id: 11,
        data: Arc::clone(&raw[0].1),
        neighbors: raw[1..].to_vec(),
    });
    // without neighbours, border faces are culled against unloaded chunks
    rt.submit(ChunkLoadRequest {
        coord: centre,
        job_id: 12,
        data: Arc::clone(&raw[0].1),
        neighbors: Vec::new(),
    });

    let mut out = wait_for(&rt, 2);
    out.sort_by_key(|r| r.job_id);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].job_id, 11);
    assert_eq!(out[0].coord, centre);
    assert_eq!(out[0].mesh.vertex_count, local.vertex_count);
    assert_eq!(out[0].mesh.data(), local.data());
    assert!(out[1].mesh.vertex_count <= out[0].mesh.vertex_count);
    assert_eq!(rt.dropped(), 0);
}

#[test]
fn bad_requests_are_dropped_without_stalling_others() {
    let reg = Arc::new(BlockRegistry::with_defaults(&TextureAtlas::grid(16, 16, DEFAULT_TEXTURES)));
    let palette = Arc::new(BiomePalette::new());
    let terrain = Terrain::new(params(), &reg);
    let rt = Runtime::new(Arc::clone(&reg), palette, MeshOptions::default(), 1).unwrap();

    rt.submit(ChunkLoadRequest {
        coord: ChunkCoord::new(0, 0),
        job_id: 1,
        data: Arc::from(vec![1u8; 77]),
        neighbors: Vec::new(),
    });
    let good = encode_chunk(&generate_chunk(&terrain, ChunkCoord::new(5, 5)), &reg);
    rt.submit(ChunkLoadRequest {
        coord: ChunkCoord::new(5, 5),
        job_id: 2,
        data: Arc::from(good),
        // an unreadable neighbour reads as unloaded
        neighbors: vec![(ChunkCoord::new(6, 5), Arc::from(vec![0u8; 3]))],
    });

    let out = wait_for(&rt, 2);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].job_id, 2);
    assert!(!out[0].mesh.is_empty());
    assert_eq!(rt.dropped(), 1);
    assert!(wait_idle(&rt));
}

#[test]
fn idle_means_every_result_is_drainable() {
    let reg = Arc::new(BlockRegistry::with_defaults(&TextureAtlas::grid(16, 16, DEFAULT_TEXTURES)));
    let terrain = Terrain::new(params(), &reg);
    let data: Arc<[u8]> = Arc::from(encode_chunk(&generate_chunk(&terrain, ChunkCoord::new(0, 0)), &reg));
    let rt = Runtime::new(Arc::clone(&reg), Arc::new(BiomePalette::new()), MeshOptions::default(), 3).unwrap();

    let jobs = 12u64;
    for job_id in 0..jobs {
        rt.submit(ChunkLoadRequest {
            coord: ChunkCoord::new(0, 0),
            job_id,
            data: Arc::clone(&data),
            neighbors: Vec::new(),
        });
    }
    assert!(wait_idle(&rt));
    let mut ids: Vec<u64> = rt.drain_results().into_iter().map(|r| r.job_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..jobs).collect::<Vec<_>>());
    assert_eq!(rt.dropped(), 0);
    assert_eq!(rt.queued() + rt.inflight(), 0);
}
