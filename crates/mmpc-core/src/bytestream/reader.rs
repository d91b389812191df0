/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Display, Formatter};

pub use zcursor::ZCursor;

use crate::bytestream::ZByteReaderTrait;

mod zcursor;

/// Errors from reading or writing a byte stream
pub enum ZByteIoError {
    #[cfg(feature = "std")]
    StdIoError(std::io::Error),
    /// Requested, found
    NotEnoughBytes(usize, usize),
    Generic(&'static str)
}

impl Debug for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            ZByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            ZByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ZByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZByteIoError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for ZByteIoError {
    fn from(value: std::io::Error) -> Self {
        ZByteIoError::StdIoError(value)
    }
}

impl From<&'static str> for ZByteIoError {
    fn from(value: &'static str) -> Self {
        ZByteIoError::Generic(value)
    }
}

/// A big endian reader over any [`ZByteReaderTrait`] source
pub struct ZReader<T: ZByteReaderTrait> {
    inner:       T,
    temp_buffer: Vec<u8>
}

impl<T: ZByteReaderTrait> ZReader<T> {
    pub fn new(source: T) -> ZReader<T> {
        ZReader {
            inner:       source,
            temp_buffer: vec![]
        }
    }
    pub fn get_u8_err(&mut self) -> Result<u8, ZByteIoError> {
        let [byte] = self.read_fixed_bytes_or_error::<1>()?;
        Ok(byte)
    }
    /// Read exactly `N` bytes, leaving the position untouched on failure
    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ZByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        self.inner.read_const_bytes(&mut byte_store)?;
        Ok(byte_store)
    }
    pub fn position(&mut self) -> Result<u64, ZByteIoError> {
        self.inner.z_position()
    }

    /// Read every byte left in the source
    ///
    /// The returned slice borrows an internal buffer and is
    /// invalidated by the next call
    pub fn remaining_bytes(&mut self) -> Result<&[u8], ZByteIoError> {
        self.temp_buffer.clear();
        let bytes_read = self.inner.read_remaining(&mut self.temp_buffer)?;
        Ok(&self.temp_buffer[..bytes_read])
    }
}

macro_rules! read_big_endian {
    ($name:ident, $int_type:ty) => {
        #[doc = concat!("Read a big endian ", stringify!($int_type))]
        ///
        /// Errors if the source ends before the value does.
        #[inline]
        pub fn $name(&mut self) -> Result<$int_type, ZByteIoError> {
            let bytes = self.read_fixed_bytes_or_error::<{ core::mem::size_of::<$int_type>() }>()?;
            Ok(<$int_type>::from_be_bytes(bytes))
        }
    };
}

impl<T: ZByteReaderTrait> ZReader<T> {
    read_big_endian!(get_u16_be_err, u16);
    read_big_endian!(get_u32_be_err, u32);
}
