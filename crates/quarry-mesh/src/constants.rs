//! Vertex record layout and buffer sizing shared by the builder and readers.

/// Bytes per packed vertex record.
pub const VERTEX_SIZE: usize = 44;

pub const OFFSET_POSITION: usize = 0;
pub const OFFSET_COLOUR: usize = 12;
pub const OFFSET_UV: usize = 16;
pub const OFFSET_ATLAS: usize = 24;
pub const OFFSET_LIGHT: usize = 40;

/// Smallest capacity a packed buffer is ever allocated with.
pub const MIN_BUFFER_SIZE: usize = 16;

/// Two triangles per quad.
pub const VERTICES_PER_FACE: usize = 6;

pub(crate) const OPAQUE_ALPHA: u8 = 255;
