//! Demo world: noise terrain encoded to raw chunk data, one mesh request
//! per chunk.
use std::sync::Arc;

use hashbrown::HashMap;
use quarry_blocks::BlockRegistry;
use quarry_chunk::{encode_chunk, generate_chunk};
use quarry_runtime::ChunkLoadRequest;
use quarry_world::{ChunkCoord, Terrain};

/// Chunks within `radius` of the origin in both axes, nearest first.
pub fn chunks_within(radius: i32) -> Vec<ChunkCoord> {
    let origin = ChunkCoord::new(0, 0);
    let mut out: Vec<ChunkCoord> = (-radius..=radius)
        .flat_map(|cz| (-radius..=radius).map(move |cx| ChunkCoord::new(cx, cz)))
        .collect();
    out.sort_by_key(|c| (c.distance_sq(origin), c.cz, c.cx));
    out
}

/// Raw data for every chunk within `radius + 1`, so each meshed chunk has
/// all of its neighbours.
pub fn generate_raw(terrain: &Terrain, reg: &BlockRegistry, radius: i32) -> HashMap<ChunkCoord, Arc<[u8]>> {
    chunks_within(radius + 1)
        .into_iter()
        .map(|coord| {
            let buf = generate_chunk(terrain, coord);
            (coord, Arc::from(encode_chunk(&buf, reg)))
        })
        .collect()
}

/// One request per chunk within `radius`, carrying every neighbour present
/// in `raw`.
pub fn requests(raw: &HashMap<ChunkCoord, Arc<[u8]>>, radius: i32, first_job: u64) -> Vec<ChunkLoadRequest> {
    let mut job_id = first_job;
    let mut out = Vec::new();
    for coord in chunks_within(radius) {
        let Some(data) = raw.get(&coord) else {
            continue;
        };
        let neighbors = coord
            .neighbors()
            .filter_map(|n| raw.get(&n).map(|d| (n, Arc::clone(d))))
            .collect();
        out.push(ChunkLoadRequest {
            coord,
            job_id,
            data: Arc::clone(data),
            neighbors,
        });
        job_id += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_are_ordered_nearest_first() {
        let c = chunks_within(1);
        assert_eq!(c.len(), 9);
        assert_eq!(c[0], ChunkCoord::new(0, 0));
        assert!(c[1..5].iter().all(|c| c.distance_sq(ChunkCoord::new(0, 0)) == 1));
        assert_eq!(chunks_within(0), vec![ChunkCoord::new(0, 0)]);
    }

    #[test]
    fn requests_carry_all_neighbours() {
        let mut raw: HashMap<ChunkCoord, Arc<[u8]>> = HashMap::new();
        for c in chunks_within(2) {
            raw.insert(c, Arc::from(vec![c.cx as u8]));
        }
        let reqs = requests(&raw, 1, 100);
        assert_eq!(reqs.len(), 9);
        assert_eq!(reqs[0].job_id, 100);
        assert_eq!(reqs[8].job_id, 108);
        assert!(reqs.iter().all(|r| r.neighbors.len() == 8));

        // at the edge of the generated area neighbours are missing
        let edge = requests(&raw, 2, 0);
        let corner = edge.iter().find(|r| r.coord == ChunkCoord::new(2, 2)).unwrap();
        assert_eq!(corner.neighbors.len(), 3);
    }
}
