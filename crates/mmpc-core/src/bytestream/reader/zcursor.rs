/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use crate::bytestream::{ZByteIoError, ZByteReaderTrait};

/// A cursor over an in-memory buffer
///
/// Prefer this over `std::io::Cursor` for in memory buffers,
/// reads are plain slice copies with no `std::io` machinery involved.
pub struct ZCursor<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

impl<T: AsRef<[u8]>> ZCursor<T> {
    pub fn new(buffer: T) -> ZCursor<T> {
        ZCursor {
            stream:   buffer,
            position: 0
        }
    }
    /// Number of bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.stream.as_ref().len().saturating_sub(self.position)
    }
}

impl<T: AsRef<[u8]>> ZByteReaderTrait for ZCursor<T> {
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ZByteIoError> {
        let remaining = self.remaining();
        if remaining < buf.len() {
            return Err(ZByteIoError::NotEnoughBytes(buf.len(), remaining));
        }
        let start = self.position;
        buf.copy_from_slice(&self.stream.as_ref()[start..start + buf.len()]);
        self.position += buf.len();
        Ok(())
    }

    #[inline(always)]
    fn read_const_bytes<const N: usize>(&mut self, buf: &mut [u8; N]) -> Result<(), ZByteIoError> {
        self.read_exact_bytes(buf)
    }

    fn z_position(&mut self) -> Result<u64, ZByteIoError> {
        Ok(self.position as u64)
    }

    fn read_remaining(&mut self, sink: &mut Vec<u8>) -> Result<usize, ZByteIoError> {
        let start = self.position.min(self.stream.as_ref().len());
        let bytes = &self.stream.as_ref()[start..];
        sink.extend_from_slice(bytes);
        self.position = start + bytes.len();
        Ok(bytes.len())
    }
}
