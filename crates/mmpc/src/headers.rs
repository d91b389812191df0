/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The fixed 17 byte header and bitstream framing
//!
//! ```text
//! +-------+---------+-------+--------+-------+-------+------+----------------+---------+
//! | MMPC  | version | width | height | depth | block | step | payload length | payload |
//! | 4     | 1       | 2     | 2      | 1     | 1     | 2    | 4              | ...     |
//! +-------+---------+-------+--------+-------+-------+------+----------------+---------+
//! ```
//! Multi byte fields are big endian.
use mmpc_core::bit_depth::BitDepth;
use mmpc_core::bytestream::{ZByteWriterTrait, ZCursor, ZReader, ZWriter};

use crate::blocks::padded_dimension;
use crate::constants::{MMPC_HEADER_SIZE, MMPC_MAGIC, MMPC_VERSION};
use crate::errors::MmpcErrors;

/// Decoded contents of a bitstream header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MmpcHeader {
    pub version:        u8,
    pub width:          u16,
    pub height:         u16,
    pub depth:          BitDepth,
    pub block_size:     u8,
    pub step:           u16,
    pub payload_length: u32
}

impl MmpcHeader {
    /// Serialize the header into its 17 byte form
    pub fn to_bytes(&self) -> [u8; MMPC_HEADER_SIZE] {
        let mut bytes = [0; MMPC_HEADER_SIZE];

        bytes[0..4].copy_from_slice(&MMPC_MAGIC);
        bytes[4] = self.version;
        bytes[5..7].copy_from_slice(&self.width.to_be_bytes());
        bytes[7..9].copy_from_slice(&self.height.to_be_bytes());
        bytes[9] = self.depth.bits();
        bytes[10] = self.block_size;
        bytes[11..13].copy_from_slice(&self.step.to_be_bytes());
        bytes[13..17].copy_from_slice(&self.payload_length.to_be_bytes());

        bytes
    }
    /// Write the header to a stream
    pub fn write<T: ZByteWriterTrait>(&self, writer: &mut ZWriter<T>) -> Result<(), MmpcErrors> {
        writer.write_const_bytes(&MMPC_MAGIC)?;
        writer.write_u8_err(self.version)?;
        writer.write_u16_be_err(self.width)?;
        writer.write_u16_be_err(self.height)?;
        writer.write_u8_err(self.depth.bits())?;
        writer.write_u8_err(self.block_size)?;
        writer.write_u16_be_err(self.step)?;
        writer.write_u32_be_err(self.payload_length)?;
        Ok(())
    }

    /// Parse a header from the start of `data`
    ///
    /// Magic is checked first, then version, then the remaining fields.
    ///
    /// # Errors
    /// - [`MmpcErrors::TruncatedHeader`] if fewer than 17 bytes are present
    /// - [`MmpcErrors::WrongMagicBytes`], [`MmpcErrors::UnsupportedVersion`]
    /// - [`MmpcErrors::InvalidHeader`] for zero dimensions, block size or step
    /// - [`MmpcErrors::UnsupportedBitDepth`]
    pub fn parse(data: &[u8]) -> Result<MmpcHeader, MmpcErrors> {
        if data.len() < MMPC_HEADER_SIZE {
            return Err(MmpcErrors::TruncatedHeader(data.len()));
        }
        let mut stream = ZReader::new(ZCursor::new(data));

        let magic = stream.read_fixed_bytes_or_error::<4>()?;

        if magic != MMPC_MAGIC {
            return Err(MmpcErrors::WrongMagicBytes(magic));
        }
        let version = stream.get_u8_err()?;

        if version != MMPC_VERSION {
            return Err(MmpcErrors::UnsupportedVersion(version));
        }
        let width = stream.get_u16_be_err()?;
        let height = stream.get_u16_be_err()?;
        let depth_bits = stream.get_u8_err()?;
        let block_size = stream.get_u8_err()?;
        let step = stream.get_u16_be_err()?;
        let payload_length = stream.get_u32_be_err()?;

        if width == 0 {
            return Err(MmpcErrors::InvalidHeader("zero width"));
        }
        if height == 0 {
            return Err(MmpcErrors::InvalidHeader("zero height"));
        }
        let depth =
            BitDepth::from_bits(depth_bits).ok_or(MmpcErrors::UnsupportedBitDepth(depth_bits))?;

        if block_size == 0 {
            return Err(MmpcErrors::InvalidHeader("zero block size"));
        }
        if step == 0 {
            return Err(MmpcErrors::InvalidHeader("zero quantization step"));
        }
        Ok(MmpcHeader {
            version,
            width,
            height,
            depth,
            block_size,
            step,
            payload_length
        })
    }

    /// Width rounded up to a multiple of the block size
    pub fn padded_width(&self) -> usize {
        // u16 rounded up to a u8 multiple never overflows usize
        padded_dimension(usize::from(self.width), usize::from(self.block_size).max(1))
            .unwrap_or(usize::MAX)
    }
    /// Height rounded up to a multiple of the block size
    pub fn padded_height(&self) -> usize {
        padded_dimension(usize::from(self.height), usize::from(self.block_size).max(1))
            .unwrap_or(usize::MAX)
    }
    /// Number of quantized coefficients the payload must hold
    pub fn coefficient_count(&self) -> Result<usize, MmpcErrors> {
        self.padded_width()
            .checked_mul(self.padded_height())
            .ok_or(MmpcErrors::InvalidHeader("coefficient count overflows"))
    }
}

/// Write a header followed by its payload
///
/// Returns the number of bytes written
///
/// # Errors
/// If `header.payload_length` disagrees with `payload.len()`, or on sink errors
pub fn write_bitstream<T: ZByteWriterTrait>(
    header: &MmpcHeader, payload: &[u8], sink: T
) -> Result<usize, MmpcErrors> {
    if header.payload_length as usize != payload.len() {
        return Err(MmpcErrors::InvalidParameter(format!(
            "Header declares {} payload bytes but payload has {}",
            header.payload_length,
            payload.len()
        )));
    }
    let mut writer = ZWriter::new(sink);
    writer.reserve(MMPC_HEADER_SIZE + payload.len())?;

    header.write(&mut writer)?;
    writer.write_all(payload)?;
    writer.flush()?;

    Ok(writer.bytes_written())
}

/// Split a bitstream into its header and payload
///
/// Bytes after the payload are ignored, use [`trailing_bytes`] to detect them.
///
/// # Errors
/// Any error of [`MmpcHeader::parse`], or [`MmpcErrors::TruncatedPayload`]
/// when fewer bytes than the declared payload length follow the header
pub fn read_bitstream(data: &[u8]) -> Result<(MmpcHeader, &[u8]), MmpcErrors> {
    let header = MmpcHeader::parse(data)?;
    let payload = split_payload(&header, &data[MMPC_HEADER_SIZE..])?;

    Ok((header, payload))
}

/// Take exactly `payload_length` bytes from the data following the header
pub(crate) fn split_payload<'a>(
    header: &MmpcHeader, remaining: &'a [u8]
) -> Result<&'a [u8], MmpcErrors> {
    let length = header.payload_length as usize;

    remaining
        .get(..length)
        .ok_or(MmpcErrors::TruncatedPayload(length, remaining.len()))
}

/// Number of bytes following the payload of a complete bitstream
pub fn trailing_bytes(header: &MmpcHeader, data: &[u8]) -> usize {
    data.len()
        .saturating_sub(MMPC_HEADER_SIZE)
        .saturating_sub(header.payload_length as usize)
}
