/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use mmpc_core::bit_depth::BitDepth;
use mmpc_core::bytestream::{ZByteWriterTrait, ZWriter};
use mmpc_core::options::EncoderOptions;

use crate::errors::PgmErrors;

/// A binary PGM encoder
///
/// The maxval written is the maximum of the options' bit depth, so a twelve
/// bit image is stored with a maxval of 4095 and two bytes per sample.
///
/// # Example
/// ```
/// use mmpc_core::bit_depth::BitDepth;
/// use mmpc_core::options::EncoderOptions;
/// use mmpc_ppm::PgmEncoder;
///
/// let pixels = [0_u16, 1024, 4095, 17];
/// let options = EncoderOptions::new(2, 2, BitDepth::Twelve);
/// let mut sink: Vec<u8> = vec![];
/// PgmEncoder::new(&pixels, options).encode(&mut sink).unwrap();
/// assert!(sink.starts_with(b"P5\n2 2\n4095\n"));
/// ```
pub struct PgmEncoder<'a> {
    pixels:  &'a [u16],
    options: EncoderOptions
}

impl<'a> PgmEncoder<'a> {
    /// Create a new encoder for row major samples
    pub const fn new(pixels: &'a [u16], options: EncoderOptions) -> PgmEncoder<'a> {
        PgmEncoder { pixels, options }
    }

    fn write_headers<T: ZByteWriterTrait>(&self, writer: &mut ZWriter<T>) -> Result<(), PgmErrors> {
        let header = format!(
            "P5\n{} {}\n{}\n",
            self.options.width(),
            self.options.height(),
            self.options.depth().max_value()
        );
        writer.write_all(header.as_bytes())?;
        Ok(())
    }

    /// Encode samples into `sink`, returning bytes written
    pub fn encode<T: ZByteWriterTrait>(&self, sink: T) -> Result<usize, PgmErrors> {
        let expected = self
            .options
            .width()
            .checked_mul(self.options.height())
            .ok_or(PgmErrors::Static("Image dimensions overflow"))?;

        if expected == 0 {
            return Err(PgmErrors::Static("Image dimensions must be positive"));
        }
        if self.pixels.len() != expected {
            return Err(PgmErrors::SizeMismatch(expected, self.pixels.len()));
        }
        let max = self.options.depth().max_value();

        if self.pixels.iter().any(|x| *x > max) {
            return Err(PgmErrors::Static("Sample exceeds the maximum of the bit depth"));
        }
        let mut writer = ZWriter::new(sink);

        self.write_headers(&mut writer)?;

        if self.options.depth() == BitDepth::Eight {
            let bytes: Vec<u8> = self.pixels.iter().map(|x| *x as u8).collect();
            writer.write_all(&bytes)?;
        } else {
            // netpbm uses big endian for 16 bit samples
            let bytes: Vec<u8> = self.pixels.iter().flat_map(|x| x.to_be_bytes()).collect();
            writer.write_all(&bytes)?;
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }
}
