//! Raw chunk data as shipped to mesh workers.
//!
//! Layout for an `sx * sy * sz` chunk, cells in `(y * sz + z) * sx + x` order:
//!
//! | section | type | count |
//! |---|---|---|
//! | legacy block ids | u16 little-endian | `sx * sy * sz` |
//! | emitted light | u8 | `sx * sy * sz` |
//! | sky light | u8 | `sx * sy * sz` |
//! | biome ids | u8 | `sx * sz` |
use quarry_blocks::BlockRegistry;
use quarry_world::{CHUNK_SIZE, ChunkCoord, MAX_LIGHT};

use crate::ChunkBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("chunk dimensions {sx}x{sy}x{sz} are empty")]
    EmptyDimensions { sx: usize, sy: usize, sz: usize },
    #[error("data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("data length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("{len} bytes do not hold a whole chunk column")]
    NotAColumn { len: usize },
}

/// Encoded size in bytes of an `sx * sy * sz` chunk.
pub fn encoded_len(sx: usize, sy: usize, sz: usize) -> usize {
    let n = sx * sy * sz;
    n * 2 + n + n + sx * sz
}

/// Height of the `CHUNK_SIZE`-wide column whose encoding is `len` bytes
/// long, if there is one.
pub fn column_height(len: usize) -> Option<usize> {
    let side = CHUNK_SIZE as usize;
    let layer = encoded_len(side, 1, side) - side * side;
    let cells = len.checked_sub(side * side)?;
    if cells == 0 || cells % layer != 0 {
        return None;
    }
    Some(cells / layer)
}

/// Decodes a `CHUNK_SIZE`-wide column, taking its height from the data
/// length.
pub fn decode_column(coord: ChunkCoord, bytes: &[u8], reg: &BlockRegistry) -> Result<ChunkBuf, DecodeError> {
    let height = column_height(bytes.len()).ok_or(DecodeError::NotAColumn { len: bytes.len() })?;
    let side = CHUNK_SIZE as usize;
    decode_chunk(coord, side, height, side, bytes, reg)
}

/// Serializes `buf`. Blocks without a legacy id are written as air.
pub fn encode_chunk(buf: &ChunkBuf, reg: &BlockRegistry) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(buf.sx, buf.sy, buf.sz));
    for r in &buf.blocks {
        let legacy = reg.block(*r).legacy_id().unwrap_or(0);
        out.extend_from_slice(&legacy.to_le_bytes());
    }
    out.extend_from_slice(&buf.emitted);
    out.extend_from_slice(&buf.sky);
    out.extend_from_slice(&buf.biomes);
    out
}

/// Parses raw chunk data. Unknown legacy ids fall back to the same block id
/// with data 0, then to air; light above 15 is clamped.
pub fn decode_chunk(
    coord: ChunkCoord,
    sx: usize,
    sy: usize,
    sz: usize,
    bytes: &[u8],
    reg: &BlockRegistry,
) -> Result<ChunkBuf, DecodeError> {
    if sx == 0 || sy == 0 || sz == 0 {
        return Err(DecodeError::EmptyDimensions { sx, sy, sz });
    }
    let expected = encoded_len(sx, sy, sz);
    if bytes.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(DecodeError::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let n = sx * sy * sz;
    let (ids, rest) = bytes.split_at(n * 2);
    let (emitted, rest) = rest.split_at(n);
    let (sky, biomes) = rest.split_at(n);

    let mut buf = ChunkBuf::new(coord, sx, sy, sz);
    let mut unmapped = 0usize;
    for (slot, pair) in buf.blocks.iter_mut().zip(ids.chunks_exact(2)) {
        let legacy = u16::from_le_bytes([pair[0], pair[1]]);
        let (r, exact) = reg.resolve_legacy(legacy);
        if !exact {
            unmapped += 1;
        }
        *slot = r;
    }
    if unmapped > 0 {
        log::debug!(
            target: "chunk",
            "chunk ({}, {}): {} cells with unmapped legacy ids",
            coord.cx,
            coord.cz,
            unmapped
        );
    }
    for (dst, src) in buf.emitted.iter_mut().zip(emitted) {
        *dst = (*src).min(MAX_LIGHT);
    }
    for (dst, src) in buf.sky.iter_mut().zip(sky) {
        *dst = (*src).min(MAX_LIGHT);
    }
    buf.biomes.copy_from_slice(biomes);
    Ok(buf)
}
