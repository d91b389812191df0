/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};

use mmpc_core::bytestream::ZByteIoError;

/// Errors occurring while reading or writing PGM files
pub enum PgmErrors {
    /// The file doesn't start with `P5`
    WrongMagic([u8; 2]),
    /// A malformed header field
    InvalidHeader(String),
    /// Image dimensions exceed the configured limits
    ///
    /// # Arguments
    /// - 1st argument is the maximum allowed
    /// - 2nd argument is the dimension found
    LargeDimensions(usize, usize),
    /// The number of sample bytes disagrees with the header
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes expected
    /// - 2nd argument is the number of bytes found
    SizeMismatch(usize, usize),
    Static(&'static str),
    IoErrors(ZByteIoError)
}

impl Debug for PgmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PgmErrors::WrongMagic(magic) => {
                write!(
                    f,
                    "Expected `P5` as PGM magic but found {:?}",
                    String::from_utf8_lossy(magic)
                )
            }
            PgmErrors::InvalidHeader(reason) => {
                write!(f, "Invalid header, reason: {reason}")
            }
            PgmErrors::LargeDimensions(expected, found) => {
                write!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            PgmErrors::SizeMismatch(expected, found) => {
                write!(f, "Expected {expected} sample bytes but found {found}")
            }
            PgmErrors::Static(reason) => {
                write!(f, "{reason}")
            }
            PgmErrors::IoErrors(err) => {
                write!(f, "I/O error {err:?}")
            }
        }
    }
}

impl Display for PgmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for PgmErrors {}

impl From<ZByteIoError> for PgmErrors {
    fn from(value: ZByteIoError) -> Self {
        PgmErrors::IoErrors(value)
    }
}
