/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during encoding and decoding.
use std::fmt::{Debug, Display, Formatter};

use mmpc_core::bytestream::ZByteIoError;

/// Broad classification of an error
///
/// Callers that only need to know what went wrong, not the details,
/// should match on this
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad magic, unsupported version, truncated or inconsistent header/payload
    Format,
    /// Decoded coefficient count disagrees with the header geometry
    SizeMismatch,
    /// Corrupt or incomplete compressed payload
    Decompression,
    /// Unreadable source or unwritable sink
    Io,
    /// Invalid caller supplied parameters
    Parameter
}

/// Possible errors that may occur during encoding or decoding
pub enum MmpcErrors {
    /// The stream does not start with the `MMPC` magic bytes
    ///
    /// Contains the four bytes found instead
    WrongMagicBytes([u8; 4]),
    /// The header carries a version this crate doesn't understand
    UnsupportedVersion(u8),
    /// Fewer than 17 bytes were available for the header
    ///
    /// Contains the number of bytes actually present
    TruncatedHeader(usize),
    /// The payload is shorter than the header claims
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually left
    TruncatedPayload(usize, usize),
    /// A header field holds a value that can't describe a valid image
    InvalidHeader(&'static str),
    /// The header carries a sample depth that isn't supported
    UnsupportedBitDepth(u8),
    /// Bytes found after the payload, only an error in strict mode
    TrailingBytes(usize),
    /// Decoded coefficient count disagrees with the header
    ///
    /// # Arguments
    /// - 1st argument is the count derived from width, height and block size
    /// - 2nd argument is the count actually decoded
    SizeMismatch(usize, usize),
    /// The entropy backend couldn't reconstruct the payload
    Decompression(String),
    /// The decompressed payload isn't a valid run length stream
    CorruptRunLength(&'static str),
    /// Image dimensions exceed what the decoder was configured to accept
    ///
    /// # Arguments
    /// - 1st argument is the maximum allowed
    /// - 2nd argument is the dimension found
    TooLargeDimensions(usize, usize),
    /// A caller supplied parameter is out of range
    InvalidParameter(String),
    IoErrors(ZByteIoError)
}

impl MmpcErrors {
    /// Return the broad category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            MmpcErrors::WrongMagicBytes(_)
            | MmpcErrors::UnsupportedVersion(_)
            | MmpcErrors::TruncatedHeader(_)
            | MmpcErrors::TruncatedPayload(..)
            | MmpcErrors::InvalidHeader(_)
            | MmpcErrors::UnsupportedBitDepth(_)
            | MmpcErrors::TrailingBytes(_) => ErrorKind::Format,
            MmpcErrors::SizeMismatch(..) => ErrorKind::SizeMismatch,
            MmpcErrors::Decompression(_) | MmpcErrors::CorruptRunLength(_) => {
                ErrorKind::Decompression
            }
            MmpcErrors::TooLargeDimensions(..) | MmpcErrors::InvalidParameter(_) => {
                ErrorKind::Parameter
            }
            MmpcErrors::IoErrors(_) => ErrorKind::Io
        }
    }
}

impl Debug for MmpcErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MmpcErrors::WrongMagicBytes(found) => {
                write!(
                    f,
                    "Wrong magic bytes, expected `MMPC` as stream start but found {found:?}"
                )
            }
            MmpcErrors::UnsupportedVersion(version) => {
                write!(f, "Unsupported bitstream version {version}, expected 1")
            }
            MmpcErrors::TruncatedHeader(found) => {
                write!(
                    f,
                    "Truncated header, expected 17 bytes but stream has {found}"
                )
            }
            MmpcErrors::TruncatedPayload(expected, found) => {
                write!(
                    f,
                    "Truncated payload, header declares {expected} bytes but stream has {found}"
                )
            }
            MmpcErrors::InvalidHeader(reason) => {
                write!(f, "Invalid header, reason: {reason}")
            }
            MmpcErrors::UnsupportedBitDepth(depth) => {
                write!(
                    f,
                    "Unsupported bit depth {depth}, expected one of 8, 10, 12 or 16"
                )
            }
            MmpcErrors::TrailingBytes(count) => {
                write!(f, "Found {count} unexpected bytes after the payload")
            }
            MmpcErrors::SizeMismatch(expected, found) => {
                write!(
                    f,
                    "Coefficient count mismatch, header implies {expected} but payload holds {found}"
                )
            }
            MmpcErrors::Decompression(reason) => {
                write!(f, "Could not decompress payload: {reason}")
            }
            MmpcErrors::CorruptRunLength(reason) => {
                write!(f, "Corrupt run length stream: {reason}")
            }
            MmpcErrors::TooLargeDimensions(expected, found) => {
                write!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            MmpcErrors::InvalidParameter(reason) => {
                write!(f, "Invalid parameter: {reason}")
            }
            MmpcErrors::IoErrors(value) => {
                write!(f, "I/O error {:?}", value)
            }
        }
    }
}

impl Display for MmpcErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for MmpcErrors {}

impl From<ZByteIoError> for MmpcErrors {
    fn from(value: ZByteIoError) -> Self {
        MmpcErrors::IoErrors(value)
    }
}

impl From<std::io::Error> for MmpcErrors {
    fn from(value: std::io::Error) -> Self {
        MmpcErrors::IoErrors(ZByteIoError::StdIoError(value))
    }
}

/// A step of the encode or decode pipeline
///
/// Encoding walks `Load` through `Write`, decoding walks
/// `ReadHeader` through `Done`, never going back.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Load,
    Pad,
    TransformAllBlocks,
    QuantizeAllBlocks,
    Flatten,
    RleEncode,
    Compress,
    AssembleHeader,
    Write,
    ReadHeader,
    ValidateMagicAndVersion,
    ReadPayload,
    Decompress,
    RleDecode,
    ReshapeIntoBlocks,
    DequantizeAllBlocks,
    InverseTransformAllBlocks,
    Crop,
    Done
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Pad => "pad",
            Stage::TransformAllBlocks => "forward transform",
            Stage::QuantizeAllBlocks => "quantize",
            Stage::Flatten => "flatten",
            Stage::RleEncode => "run length encode",
            Stage::Compress => "compress",
            Stage::AssembleHeader => "assemble header",
            Stage::Write => "write",
            Stage::ReadHeader => "read header",
            Stage::ValidateMagicAndVersion => "validate magic and version",
            Stage::ReadPayload => "read payload",
            Stage::Decompress => "decompress",
            Stage::RleDecode => "run length decode",
            Stage::ReshapeIntoBlocks => "reshape into blocks",
            Stage::DequantizeAllBlocks => "dequantize",
            Stage::InverseTransformAllBlocks => "inverse transform",
            Stage::Crop => "crop",
            Stage::Done => "done"
        };
        f.write_str(name)
    }
}

/// An error returned by the encoder or decoder pipelines
///
/// Pairs the underlying [`MmpcErrors`] with the [`Stage`] that failed.
pub struct CodecError {
    stage: Stage,
    error: MmpcErrors
}

impl CodecError {
    pub const fn new(stage: Stage, error: MmpcErrors) -> CodecError {
        CodecError { stage, error }
    }
    /// The pipeline stage that failed
    pub const fn stage(&self) -> Stage {
        self.stage
    }
    /// The broad category of the failure
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
    pub const fn error(&self) -> &MmpcErrors {
        &self.error
    }
    pub fn into_inner(self) -> MmpcErrors {
        self.error
    }
}

impl Debug for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} stage failed: {:?}", self.stage, self.error)
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for CodecError {}

/// Attach the failing stage to a component error
pub(crate) trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, CodecError>;
}

impl<T, E: Into<MmpcErrors>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, CodecError> {
        self.map_err(|e| CodecError::new(stage, e.into()))
    }
}
