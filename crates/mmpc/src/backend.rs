/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Lossless byte compressors wrapping the run length stream
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use mmpc_core::log::trace;

use crate::constants::DEFAULT_ZLIB_LEVEL;
use crate::errors::MmpcErrors;

/// A generic lossless byte compressor
///
/// The codec treats the backend as a black box, the only requirement is
/// that `decompress(compress(x), x.len()) == x`.
pub trait EntropyBackend {
    /// A short name, used in logs
    fn name(&self) -> &'static str;
    /// Compress `data`
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, MmpcErrors>;
    /// Decompress `data`, failing if the output would exceed `limit` bytes
    ///
    /// Implementations must reject truncated input and
    /// bytes following the end of the compressed stream.
    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, MmpcErrors>;
}

/// A zlib stream, as produced by `deflate` with a zlib wrapper
#[derive(Copy, Clone, Debug)]
pub struct ZlibBackend {
    level: u32
}

impl Default for ZlibBackend {
    fn default() -> Self {
        ZlibBackend {
            level: DEFAULT_ZLIB_LEVEL
        }
    }
}

impl ZlibBackend {
    /// Create a backend compressing at `level`, clamped to `0..=9`
    pub fn new(level: u32) -> ZlibBackend {
        ZlibBackend {
            level: level.min(9)
        }
    }
    pub const fn level(&self) -> u32 {
        self.level
    }
}

impl EntropyBackend for ZlibBackend {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, MmpcErrors> {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(data.len() / 2),
            Compression::new(self.level)
        );
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;

        trace!("zlib: {} bytes -> {} bytes", data.len(), compressed.len());

        Ok(compressed)
    }

    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, MmpcErrors> {
        let mut stream = Decompress::new(true);
        let mut output = Vec::with_capacity(data.len().saturating_mul(4).clamp(64, limit.max(64)));

        loop {
            let consumed = stream.total_in() as usize;
            let produced = stream.total_out();

            if output.len() == output.capacity() {
                // one extra byte so overlong streams are caught below
                let room = output.capacity().max(1024).min(limit.saturating_add(1) - output.len());
                output.reserve_exact(room);
            }
            let status = stream
                .decompress_vec(&data[consumed..], &mut output, FlushDecompress::Finish)
                .map_err(|e| MmpcErrors::Decompression(e.to_string()))?;

            if output.len() > limit {
                return Err(MmpcErrors::Decompression(format!(
                    "Decompressed payload exceeds limit of {limit} bytes"
                )));
            }
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if stream.total_in() as usize == consumed && stream.total_out() == produced {
                        return Err(MmpcErrors::Decompression(
                            "Compressed payload is truncated".to_string()
                        ));
                    }
                }
            }
        }
        let used = stream.total_in() as usize;

        if used != data.len() {
            return Err(MmpcErrors::Decompression(format!(
                "Found {} bytes after the end of the compressed stream",
                data.len() - used
            )));
        }
        trace!("zlib: {} bytes -> {} bytes", data.len(), output.len());

        Ok(output)
    }
}
