/// Opaque byte source/sink underneath a `BitArchive`
///
/// This is the only place raw bytes enter or leave the codec. Implementations
/// may wrap a socket buffer, a file or plain memory.
pub trait ByteStream {
    /// Pulls the next byte, or `None` once the source is exhausted
    fn read_byte(&mut self) -> Option<u8>;

    /// Pushes a byte onto the sink
    fn write_byte(&mut self, byte: u8);

    /// Skips up to `count` unread bytes, returning how many were skipped
    fn skip_bytes(&mut self, count: usize) -> usize;

    /// Whether no unread bytes remain
    fn is_exhausted(&self) -> bool;
}

/// A growable in-memory `ByteStream`
///
/// Writes append to the end of the buffer, reads consume from a cursor that
/// starts at the front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStream {
    buffer: Vec<u8>,
    cursor: usize,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
            cursor: 0,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buffer: bytes,
            cursor: 0,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Rewinds the read cursor to the first byte
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl ByteStream for MemoryStream {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.buffer.get(self.cursor)?;
        self.cursor += 1;
        Some(byte)
    }

    fn write_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    fn skip_bytes(&mut self, count: usize) -> usize {
        let skipped = count.min(self.remaining());
        self.cursor += skipped;
        skipped
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.buffer.len()
    }
}
