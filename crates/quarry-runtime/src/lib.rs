//! Mesh worker pool: chunk-load requests in, packed chunk meshes out.
#![forbid(unsafe_code)]

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use quarry_blocks::BlockRegistry;
use quarry_chunk::{ResidentWorld, decode_column};
use quarry_lighting::BiomePalette;
use quarry_mesh::{ChunkMesh, MeshOptions, build_chunk_mesh, elapsed_ms};
use quarry_world::{BiomeTable, ChunkCoord};
use rayon::{ThreadPool, ThreadPoolBuilder};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to build mesh worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Raw chunk data for one mesh build: the chunk to mesh plus whichever
/// neighbours are resident. Neighbours missing here mesh as opaque and
/// unlit.
#[derive(Clone, Debug)]
pub struct ChunkLoadRequest {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub data: Arc<[u8]>,
    pub neighbors: Vec<(ChunkCoord, Arc<[u8]>)>,
}

#[derive(Debug)]
pub struct ChunkMeshResponse {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub mesh: ChunkMesh,
    pub t_decode_ms: u32,
    pub t_mesh_ms: u32,
}

/// Read-only state shared by every worker.
struct Shared {
    reg: Arc<BlockRegistry>,
    biomes: Arc<BiomeTable>,
    palette: Arc<BiomePalette>,
    options: MeshOptions,
}

#[derive(Default)]
struct Counters {
    queued: AtomicUsize,
    inflight: AtomicUsize,
    dropped: AtomicUsize,
}

pub struct Runtime {
    job_tx: Sender<ChunkLoadRequest>,
    res_rx: Receiver<ChunkMeshResponse>,
    _pool: Arc<ThreadPool>,
    counters: Arc<Counters>,
    workers: usize,
}

impl Runtime {
    /// Starts `workers` mesh threads; `0` picks one per available core.
    pub fn new(
        registry: Arc<BlockRegistry>,
        palette: Arc<BiomePalette>,
        options: MeshOptions,
        workers: usize,
    ) -> Result<Self, RuntimeError> {
        Self::with_biomes(registry, Arc::new(BiomeTable::with_defaults()), palette, options, workers)
    }

    pub fn with_biomes(
        registry: Arc<BlockRegistry>,
        biomes: Arc<BiomeTable>,
        palette: Arc<BiomePalette>,
        options: MeshOptions,
        workers: usize,
    ) -> Result<Self, RuntimeError> {
        let workers = if workers == 0 {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        } else {
            workers
        };
        let (job_tx, job_rx) = unbounded::<ChunkLoadRequest>();
        let (res_tx, res_rx) = unbounded::<ChunkMeshResponse>();
        let shared = Arc::new(Shared {
            reg: registry,
            biomes,
            palette,
            options,
        });
        let counters = Arc::new(Counters::default());

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("quarry-mesh-{i}"))
                .build()?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let shared = Arc::clone(&shared);
            let counters = Arc::clone(&counters);
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    // In-flight goes up before queued goes down, and the
                    // result is sent (or the drop counted) before in-flight
                    // goes down, so an Acquire reader never sees a job in
                    // neither state.
                    counters.inflight.fetch_add(1, Ordering::AcqRel);
                    counters.queued.fetch_sub(1, Ordering::Release);
                    let (coord, job_id) = (job.coord, job.job_id);
                    match guarded(coord, job_id, || process_job(job, &shared)) {
                        Some(Some(out)) => {
                            let _ = tx.send(out);
                        }
                        _ => {
                            counters.dropped.fetch_add(1, Ordering::Release);
                        }
                    }
                    counters.inflight.fetch_sub(1, Ordering::Release);
                }
            });
        }
        log::info!(target: "runtime", "started {} mesh workers", workers);

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            counters,
            workers,
        })
    }

    pub fn submit(&self, job: ChunkLoadRequest) {
        self.counters.queued.fetch_add(1, Ordering::Release);
        if self.job_tx.send(job).is_err() {
            self.counters.queued.fetch_sub(1, Ordering::Release);
        }
    }

    /// Finished meshes, without blocking.
    pub fn drain_results(&self) -> Vec<ChunkMeshResponse> {
        self.res_rx.try_iter().collect()
    }

    /// Requests waiting for a worker.
    pub fn queued(&self) -> usize {
        self.counters.queued.load(Ordering::Acquire)
    }

    /// Requests being meshed right now.
    pub fn inflight(&self) -> usize {
        self.counters.inflight.load(Ordering::Acquire)
    }

    /// Requests that ended without a response (bad data or a fault).
    pub fn dropped(&self) -> usize {
        self.counters.dropped.load(Ordering::Acquire)
    }

    /// No request queued or being meshed. Results of every finished request
    /// are drainable once this returns true; `queued` is read first.
    pub fn is_idle(&self) -> bool {
        self.queued() == 0 && self.inflight() == 0
    }

    /// Waits up to `timeout` for the next finished mesh.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChunkMeshResponse> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Runs one build, turning a panic into a logged, dropped result.
fn guarded<T>(coord: ChunkCoord, job_id: u64, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(v) => Some(v),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!(
                target: "runtime",
                "mesh build for chunk ({}, {}) job {} panicked: {}",
                coord.cx,
                coord.cz,
                job_id,
                msg
            );
            None
        }
    }
}

fn process_job(job: ChunkLoadRequest, shared: &Shared) -> Option<ChunkMeshResponse> {
    let ChunkLoadRequest {
        coord,
        job_id,
        data,
        neighbors,
    } = job;

    let t_decode = Instant::now();
    let centre = match decode_column(coord, &data, &shared.reg) {
        Ok(buf) => buf,
        Err(e) => {
            log::warn!(target: "runtime", "dropping chunk ({}, {}) job {}: {}", coord.cx, coord.cz, job_id, e);
            return None;
        }
    };
    let mut world = ResidentWorld::new(&shared.reg, &shared.biomes, centre.sy);
    world.insert(centre);
    for (nc, bytes) in neighbors {
        if nc == coord {
            continue;
        }
        match decode_column(nc, &bytes, &shared.reg) {
            Ok(buf) => {
                world.insert(buf);
            }
            Err(e) => {
                log::warn!(
                    target: "runtime",
                    "neighbour ({}, {}) of chunk ({}, {}) unreadable, treating as unloaded: {}",
                    nc.cx,
                    nc.cz,
                    coord.cx,
                    coord.cz,
                    e
                );
            }
        }
    }
    let t_decode_ms = elapsed_ms(t_decode);

    let t_mesh = Instant::now();
    let buf = world.chunk(coord)?;
    let mesh = build_chunk_mesh(buf, &world, &shared.palette, &shared.options);
    let t_mesh_ms = elapsed_ms(t_mesh);
    log::debug!(
        target: "runtime",
        "job {} chunk ({}, {}): decode {}ms, mesh {}ms, {} vertices",
        job_id,
        coord.cx,
        coord.cz,
        t_decode_ms,
        t_mesh_ms,
        mesh.vertex_count
    );
    Some(ChunkMeshResponse {
        coord,
        job_id,
        mesh,
        t_decode_ms,
        t_mesh_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_passes_values_through() {
        assert_eq!(guarded(ChunkCoord::new(0, 0), 1, || 7), Some(7));
    }

    #[test]
    fn guarded_swallows_panics() {
        let hit: Option<()> = guarded(ChunkCoord::new(3, 4), 2, || panic!("boom"));
        assert!(hit.is_none());
        let hit: Option<()> = guarded(ChunkCoord::new(3, 4), 3, || panic!("{} went wrong", "formatting"));
        assert!(hit.is_none());
    }
}
