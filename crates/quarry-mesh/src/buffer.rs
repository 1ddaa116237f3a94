use crate::constants::MIN_BUFFER_SIZE;

/// Byte order of multi-byte values in a [`PackedBuffer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the running host.
    pub fn host() -> Endian {
        let bytes = 1u16.to_ne_bytes();
        if bytes[0] == 1 { Endian::Little } else { Endian::Big }
    }
}

impl Default for Endian {
    fn default() -> Self {
        Endian::host()
    }
}

/// Append-only byte buffer with a fixed byte order for multi-byte writes.
///
/// Capacity starts at [`MIN_BUFFER_SIZE`] or more and doubles whenever a
/// write would overflow it. [`as_bytes`](Self::as_bytes) exposes the whole
/// allocation; only the first [`offset`](Self::offset) bytes are written.
#[derive(Clone, Debug)]
pub struct PackedBuffer {
    data: Vec<u8>,
    offset: usize,
    endian: Endian,
}

impl PackedBuffer {
    pub fn new(size: usize) -> Self {
        Self::with_endian(size, Endian::host())
    }

    pub fn with_endian(size: usize, endian: Endian) -> Self {
        Self {
            data: vec![0; size.max(MIN_BUFFER_SIZE)],
            offset: 0,
            endian,
        }
    }

    #[inline]
    fn reserve(&mut self, n: usize) {
        let needed = self.offset + n;
        if needed <= self.data.len() {
            return;
        }
        let mut cap = self.data.len().max(MIN_BUFFER_SIZE);
        while cap < needed {
            cap *= 2;
        }
        self.data.resize(cap, 0);
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.data[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    pub fn add_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    pub fn add_u16(&mut self, v: u16) {
        let b = match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        self.write(&b);
    }

    pub fn add_i32(&mut self, v: i32) {
        let b = match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        self.write(&b);
    }

    pub fn add_f32(&mut self, v: f32) {
        let b = match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        self.write(&b);
    }

    /// Rewinds the write cursor, keeping the allocation.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Number of bytes written.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The full allocation, written or not.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The written prefix.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.data[..self.offset]
    }

    /// Hands over the allocation and the number of bytes written.
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.data, self.offset)
    }
}

pub(crate) fn read_f32(b: [u8; 4], endian: Endian) -> f32 {
    match endian {
        Endian::Little => f32::from_le_bytes(b),
        Endian::Big => f32::from_be_bytes(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_requests_get_the_floor() {
        assert_eq!(PackedBuffer::new(0).capacity(), MIN_BUFFER_SIZE);
        assert_eq!(PackedBuffer::new(3).capacity(), MIN_BUFFER_SIZE);
        assert_eq!(PackedBuffer::new(100).capacity(), 100);
    }

    #[test]
    fn byte_order_is_fixed_at_construction() {
        let mut le = PackedBuffer::with_endian(0, Endian::Little);
        let mut be = PackedBuffer::with_endian(0, Endian::Big);
        for b in [&mut le, &mut be] {
            b.add_u16(0x0102);
            b.add_i32(-2);
            b.add_f32(1.0);
            b.add_u8(7);
        }
        assert_eq!(le.written(), &[0x02, 0x01, 0xFE, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F, 7]);
        assert_eq!(be.written(), &[0x01, 0x02, 0xFF, 0xFF, 0xFF, 0xFE, 0x3F, 0x80, 0x00, 0x00, 7]);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut b = PackedBuffer::new(16);
        for i in 0..40 {
            b.add_u8(i);
        }
        assert_eq!(b.capacity(), 64);
        b.reset();
        assert_eq!(b.offset(), 0);
        assert_eq!(b.capacity(), 64);
        b.add_u8(9);
        assert_eq!(b.as_bytes()[0], 9);
        assert_eq!(b.as_bytes()[1], 1);
    }

    #[test]
    fn host_order_matches_native() {
        let mut b = PackedBuffer::new(0);
        b.add_u16(0xABCD);
        assert_eq!(b.written(), &0xABCDu16.to_ne_bytes());
    }
}
