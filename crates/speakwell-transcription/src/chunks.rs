//! Fixed-size chunking of in-memory audio for streamed uploads.

use bytes::Bytes;

/// Upload block size: 5 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 5_242_880;

/// Restartable, finite producer of fixed-size audio blocks.
///
/// Holds the audio as shared [`Bytes`]; every call to [`iter`](Self::iter)
/// starts from the beginning and yields zero-copy slices. All blocks are
/// `chunk_size` long except possibly the last. Empty audio yields nothing.
#[derive(Clone, Debug)]
pub struct AudioChunks {
    data: Bytes,
    chunk_size: usize,
}

impl AudioChunks {
    /// Split `data` into blocks of `chunk_size` bytes (minimum 1).
    pub fn new(data: impl Into<Bytes>, chunk_size: usize) -> Self {
        Self {
            data: data.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Split `data` into [`DEFAULT_CHUNK_SIZE`] blocks.
    pub fn with_default_size(data: impl Into<Bytes>) -> Self {
        Self::new(data, DEFAULT_CHUNK_SIZE)
    }

    /// Block size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Total audio length in bytes.
    pub fn total_bytes(&self) -> usize {
        self.data.len()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.data.len().div_ceil(self.chunk_size)
    }

    /// Whether there is no audio at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate the blocks from the start.
    pub fn iter(&self) -> ChunkIter {
        ChunkIter {
            data: self.data.clone(),
            chunk_size: self.chunk_size,
            offset: 0,
        }
    }
}

impl IntoIterator for &AudioChunks {
    type Item = Bytes;
    type IntoIter = ChunkIter;

    fn into_iter(self) -> ChunkIter {
        self.iter()
    }
}

/// Iterator over [`AudioChunks`] blocks.
#[derive(Clone, Debug)]
pub struct ChunkIter {
    data: Bytes,
    chunk_size: usize,
    offset: usize,
}

impl Iterator for ChunkIter {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        if self.offset >= self.data.len() {
            return None;
        }
        let end = (self.offset + self.chunk_size).min(self.data.len());
        let chunk = self.data.slice(self.offset..end);
        self.offset = end;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.data.len() - self.offset).div_ceil(self.chunk_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkIter {}
