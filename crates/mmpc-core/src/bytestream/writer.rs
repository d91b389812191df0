/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::{ZByteIoError, ZByteWriterTrait};

/// A byte writer that counts what it writes, multi-byte
/// values go out in big endian order
pub struct ZWriter<T: ZByteWriterTrait> {
    buffer:        T,
    bytes_written: usize
}

impl<T: ZByteWriterTrait> ZWriter<T> {
    /// Create a new writer for the stream
    pub fn new(data: T) -> ZWriter<T> {
        ZWriter {
            buffer:        data,
            bytes_written: 0
        }
    }
    /// Return the number of bytes the writer has written
    ///
    /// ```
    /// use mmpc_core::bytestream::ZWriter;
    /// let mut sink: Vec<u8> = vec![];
    /// let mut stream = ZWriter::new(&mut sink);
    /// stream.write_u8_err(3).unwrap();
    /// assert_eq!(stream.bytes_written(),1);
    /// ```
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }
    /// Write all of `buf` into the sink or error out
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), ZByteIoError> {
        self.buffer.write_all_bytes(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }
    /// Write a compile time sized array into the sink or error out
    pub fn write_const_bytes<const N: usize>(&mut self, buf: &[u8; N]) -> Result<(), ZByteIoError> {
        self.buffer.write_const_bytes(buf)?;
        self.bytes_written += N;
        Ok(())
    }
    /// Write a single byte into the bytestream or error out
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), ZByteIoError> {
        self.write_const_bytes(&[byte])
    }
    /// Hint the sink about how many more bytes will follow
    pub fn reserve(&mut self, additional: usize) -> Result<(), ZByteIoError> {
        self.buffer.reserve_capacity(additional)
    }
    /// Flush the underlying sink
    pub fn flush(&mut self) -> Result<(), ZByteIoError> {
        self.buffer.flush_bytes()
    }
}

macro_rules! write_big_endian {
    ($name:ident, $int_type:ty) => {
        #[doc = concat!("Write a ", stringify!($int_type), " in big endian order")]
        #[inline]
        pub fn $name(&mut self, value: $int_type) -> Result<(), ZByteIoError> {
            self.write_const_bytes(&value.to_be_bytes())
        }
    };
}

impl<T: ZByteWriterTrait> ZWriter<T> {
    write_big_endian!(write_u16_be_err, u16);
    write_big_endian!(write_u32_be_err, u32);
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::bytestream::ZWriter;

    #[test]
    fn fields_are_big_endian() {
        let mut sink = Vec::new();
        let mut writer = ZWriter::new(&mut sink);
        writer.write_u16_be_err(0x0102).unwrap();
        writer.write_u8_err(7).unwrap();
        writer.write_u32_be_err(0x0A0B0C0D).unwrap();
        assert_eq!(writer.bytes_written(), 7);
        assert_eq!(sink, [1, 2, 7, 0x0A, 0x0B, 0x0C, 0x0D]);
    }
}
