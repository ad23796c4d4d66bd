/// Default size of the writer's staging buffer: 8 KiB.
pub const DEFAULT_WRITE_BUFFER: usize = 8 * 1024;

/// Default chunk size for bulk reads: 8 KiB.
pub const DEFAULT_READ_CHUNK: usize = 8 * 1024;

/// Largest payload a 4-byte length prefix can describe.
pub const MAX_FRAMED_SIZE: usize = u32::MAX as usize;

/// Configuration for [`Reader`](crate::Reader) and [`Writer`](crate::Writer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Bytes staged by a writer before they are pushed to the sink. Default: 8 KiB.
    pub write_buffer_size: usize,
    /// Upper bound on a single bulk read or allocation step. Default: 8 KiB.
    pub read_chunk_size: usize,
    /// Maximum framed external message size. Default and ceiling: `u32::MAX`.
    pub max_framed_size: usize,
}

impl CodecConfig {
    /// Framed size limit clamped to what the 4-byte prefix can carry.
    pub fn framed_limit(&self) -> usize {
        self.max_framed_size.min(MAX_FRAMED_SIZE)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            write_buffer_size: DEFAULT_WRITE_BUFFER,
            read_chunk_size: DEFAULT_READ_CHUNK,
            max_framed_size: MAX_FRAMED_SIZE,
        }
    }
}
