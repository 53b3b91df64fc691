//! Fixed-size chunker for splitting payloads into store-sized blobs.

use tokio::io::AsyncRead;

use crate::error::CasError;

/// A contiguous slice of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in split order.
    pub index: usize,
    /// The raw chunk data.
    pub data: Vec<u8>,
}

/// Fixed-size chunker that splits data into chunks of at most `chunk_size` bytes.
///
/// Every chunk except the last is exactly `chunk_size` bytes; the last holds
/// the non-empty remainder. Empty data produces zero chunks.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
}

impl Chunker {
    /// Create a new chunker. A zero chunk size is a configuration error.
    pub fn new(chunk_size: usize) -> Result<Self, CasError> {
        if chunk_size == 0 {
            return Err(CasError::InvalidChunkSize(chunk_size));
        }
        Ok(Self { chunk_size })
    }

    /// The configured chunk size limit.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks `len` bytes will split into.
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Split data into fixed-size chunks.
    pub fn chunk(&self, data: &[u8]) -> Vec<Chunk> {
        let mut chunks = Vec::with_capacity(self.chunk_count(data.len()));
        for (index, slice) in data.chunks(self.chunk_size).enumerate() {
            chunks.push(Chunk {
                index,
                data: slice.to_vec(),
            });
        }
        chunks
    }

    /// Split data from an async reader into fixed-size chunks.
    ///
    /// Reads the entire stream, producing chunks as it goes.
    pub async fn chunk_stream(
        &self,
        mut reader: impl AsyncRead + Unpin,
    ) -> Result<Vec<Chunk>, CasError> {
        use tokio::io::AsyncReadExt;

        let mut chunks = Vec::new();

        loop {
            let mut buf = vec![0u8; self.chunk_size];
            let mut filled = 0;

            // Read exactly chunk_size bytes, or until EOF.
            while filled < self.chunk_size {
                let n = reader.read(&mut buf[filled..]).await?;
                if n == 0 {
                    break;
                }
                filled += n;
            }

            if filled == 0 {
                break;
            }

            buf.truncate(filled);
            chunks.push(Chunk {
                index: chunks.len(),
                data: buf,
            });

            if filled < self.chunk_size {
                break;
            }
        }

        Ok(chunks)
    }
}
