/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Sources and sinks the codec reads from and writes to

use crate::bytestream::reader::ZByteIoError;

/// A byte source for decoders
///
/// [`ZCursor`](crate::bytestream::ZCursor) implements it for in-memory buffers.
pub trait ZByteReaderTrait {
    /// Fill `buf` completely or fail
    ///
    /// ## Errors
    /// On failure the position must not move
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ZByteIoError>;

    /// [`read_exact_bytes`](Self::read_exact_bytes) for a size known at compile time
    fn read_const_bytes<const N: usize>(&mut self, buf: &mut [u8; N]) -> Result<(), ZByteIoError>;

    fn z_position(&mut self) -> Result<u64, ZByteIoError>;

    /// Append everything left in the source to `sink`, returning how many bytes were added
    fn read_remaining(&mut self, sink: &mut alloc::vec::Vec<u8>) -> Result<usize, ZByteIoError>;
}

/// A byte sink for encoders
pub trait ZByteWriterTrait {
    /// Write all of `buf` or fail
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), ZByteIoError>;
    /// [`write_all_bytes`](Self::write_all_bytes) for a size known at compile time
    fn write_const_bytes<const N: usize>(&mut self, buf: &[u8; N]) -> Result<(), ZByteIoError>;
    fn flush_bytes(&mut self) -> Result<(), ZByteIoError>;
    /// Size hint for the bytes about to be written, sinks may ignore it
    fn reserve_capacity(&mut self, size: usize) -> Result<(), ZByteIoError>;
}

impl ZByteWriterTrait for &mut alloc::vec::Vec<u8> {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), ZByteIoError> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn write_const_bytes<const N: usize>(&mut self, buf: &[u8; N]) -> Result<(), ZByteIoError> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn flush_bytes(&mut self) -> Result<(), ZByteIoError> {
        Ok(())
    }

    fn reserve_capacity(&mut self, size: usize) -> Result<(), ZByteIoError> {
        self.reserve(size);
        Ok(())
    }
}
