/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use mmpc_core::bit_depth::BitDepth;
use mmpc_core::log::{info, warn};
use mmpc_core::options::DecoderOptions;

use crate::errors::PgmErrors;

/// An instance of a PGM decoder
///
/// The decoder reads binary (`P5`) grayscale files with a maxval up to 65535
pub struct PgmDecoder<'a> {
    data:            &'a [u8],
    position:        usize,
    width:           usize,
    height:          usize,
    max_value:       u16,
    bit_depth:       BitDepth,
    decoded_headers: bool,
    options:         DecoderOptions
}

impl<'a> PgmDecoder<'a> {
    /// Create a new pgm decoder with default options
    ///
    /// # Example
    /// ```
    /// use mmpc_ppm::PgmDecoder;
    /// let mut decoder = PgmDecoder::new(b"NOT VALID PGM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PgmDecoder<'a> {
        PgmDecoder::new_with_options(data, DecoderOptions::default())
    }
    /// Create a new pgm decoder with the specified options
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PgmDecoder<'a> {
        PgmDecoder {
            data,
            position: 0,
            width: 0,
            height: 0,
            max_value: 0,
            bit_depth: BitDepth::Eight,
            decoded_headers: false,
            options
        }
    }

    /// Read PGM headers and store them in internal state
    pub fn decode_headers(&mut self) -> Result<(), PgmErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        if self.data.len() < 2 {
            return Err(PgmErrors::Static("Not enough bytes for a PGM header"));
        }
        let magic = [self.data[0], self.data[1]];

        if &magic != b"P5" {
            return Err(PgmErrors::WrongMagic(magic));
        }
        self.position = 2;

        self.skip_spaces();
        self.width = self.get_integer("width")?;

        if self.width > self.options.max_width() {
            return Err(PgmErrors::LargeDimensions(
                self.options.max_width(),
                self.width
            ));
        }
        self.skip_spaces();
        self.height = self.get_integer("height")?;

        if self.height > self.options.max_height() {
            return Err(PgmErrors::LargeDimensions(
                self.options.max_height(),
                self.height
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PgmErrors::InvalidHeader(format!(
                "Zero dimension {}x{}",
                self.width, self.height
            )));
        }
        self.skip_spaces();
        let max_value = self.get_integer("maxval")?;

        if max_value == 0 || max_value > usize::from(u16::MAX) {
            return Err(PgmErrors::InvalidHeader(format!(
                "maxval {max_value} outside 1..=65535"
            )));
        }
        // exactly one whitespace separates the header from samples
        match self.data.get(self.position) {
            Some(byte) if byte.is_ascii_whitespace() => self.position += 1,
            _ => {
                return Err(PgmErrors::InvalidHeader(
                    "Expected whitespace after maxval".to_string()
                ))
            }
        }
        self.max_value = max_value as u16;
        self.bit_depth = BitDepth::from_max_value(self.max_value);

        info!("Width: {}, height: {}", self.width, self.height);
        info!("Max value: {}", self.max_value);
        info!("Bit depth: {:?}", self.bit_depth);

        self.decoded_headers = true;

        Ok(())
    }

    /// Return the image bit depth or none if headers are not decoded
    pub const fn bit_depth(&self) -> Option<BitDepth> {
        if self.decoded_headers {
            Some(self.bit_depth)
        } else {
            None
        }
    }
    /// Return the maxval stored in the header or none if headers are not decoded
    pub const fn max_value(&self) -> Option<u16> {
        if self.decoded_headers {
            Some(self.max_value)
        } else {
            None
        }
    }
    /// Return image dimensions or none if headers are not decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            Some((self.width, self.height))
        } else {
            None
        }
    }

    /// Decode samples, row major
    ///
    /// Eight bit files are widened to `u16`
    pub fn decode(&mut self) -> Result<Vec<u16>, PgmErrors> {
        self.decode_headers()?;

        let bytes_per_sample = if self.max_value > 255 { 2 } else { 1 };

        let size = self
            .width
            .checked_mul(self.height)
            .and_then(|x| x.checked_mul(bytes_per_sample))
            .ok_or(PgmErrors::Static("Image dimensions overflow"))?;

        let remaining = &self.data[self.position..];

        if remaining.len() < size {
            return Err(PgmErrors::SizeMismatch(size, remaining.len()));
        }
        if remaining.len() > size {
            if self.options.strict_mode() {
                return Err(PgmErrors::SizeMismatch(size, remaining.len()));
            }
            warn!(
                "Ignoring {} bytes after PGM samples",
                remaining.len() - size
            );
        }
        let samples = &remaining[..size];

        let pixels = if bytes_per_sample == 1 {
            samples.iter().map(|x| u16::from(*x)).collect()
        } else {
            // netpbm stores 16 bit samples big endian
            samples
                .chunks_exact(2)
                .map(|x| u16::from_be_bytes([x[0], x[1]]))
                .collect()
        };
        self.position += size;

        Ok(pixels)
    }

    /// Skip all whitespace characters and comments
    fn skip_spaces(&mut self) {
        while let Some(byte) = self.data.get(self.position) {
            if *byte == b'#' {
                // comment runs to the end of the line
                while let Some(byte) = self.data.get(self.position) {
                    self.position += 1;
                    if *byte == b'\n' {
                        break;
                    }
                }
            } else if byte.is_ascii_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn get_integer(&mut self, field: &'static str) -> Result<usize, PgmErrors> {
        let start = self.position;
        let mut value = 0_usize;

        while let Some(byte) = self.data.get(self.position) {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(byte - b'0')))
                .ok_or_else(|| PgmErrors::InvalidHeader(format!("{field} overflows")))?;
            self.position += 1;
        }
        if self.position == start {
            return Err(PgmErrors::InvalidHeader(format!("Expected a number for {field}")));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use mmpc_core::bit_depth::BitDepth;
    use mmpc_core::options::DecoderOptions;

    use crate::{PgmDecoder, PgmErrors};

    #[test]
    fn decode_eight_bit_with_comments() {
        let data = b"P5\n# created by a scanner\n3 # width\n2\n255\n\x00\x01\x02\x03\x04\xFF";
        let mut decoder = PgmDecoder::new(data);

        let pixels = decoder.decode().unwrap();
        assert_eq!(pixels, [0, 1, 2, 3, 4, 255]);
        assert_eq!(decoder.dimensions(), Some((3, 2)));
        assert_eq!(decoder.bit_depth(), Some(BitDepth::Eight));
    }

    #[test]
    fn sample_bytes_that_look_like_whitespace() {
        // first sample is 0x20, a space
        let data = b"P5 2 1 255\n\x20\x0A";
        assert_eq!(PgmDecoder::new(data).decode().unwrap(), [32, 10]);
    }

    #[test]
    fn decode_twelve_bit() {
        let data = b"P5\n2 1\n4095\n\x0F\xFF\x01\x00";
        let mut decoder = PgmDecoder::new(data);

        assert_eq!(decoder.decode().unwrap(), [4095, 256]);
        assert_eq!(decoder.bit_depth(), Some(BitDepth::Twelve));
        assert_eq!(decoder.max_value(), Some(4095));
    }

    #[test]
    fn wrong_magic() {
        let err = PgmDecoder::new(b"P6\n1 1\n255\n\x00\x00\x00").decode().unwrap_err();
        assert!(matches!(err, PgmErrors::WrongMagic(_)));
    }

    #[test]
    fn short_samples() {
        let err = PgmDecoder::new(b"P5\n2 2\n255\n\x00\x00\x00")
            .decode()
            .unwrap_err();
        assert!(matches!(err, PgmErrors::SizeMismatch(4, 3)));
    }

    #[test]
    fn trailing_samples_strict() {
        let data = b"P5\n1 1\n255\n\x00\x00";
        assert!(PgmDecoder::new(data).decode().is_ok());

        let options = DecoderOptions::default().set_strict_mode(true);
        assert!(PgmDecoder::new_with_options(data, options).decode().is_err());
    }

    #[test]
    fn bad_headers() {
        for data in [
            &b"P5\n0 1\n255\n"[..],
            b"P5\nx 1\n255\n",
            b"P5\n1 1\n0\n\x00",
            b"P5\n1 1\n70000\n\x00\x00",
            b"P5\n1 1\n255",
            b"P5\n99999999999999999999999 1\n255\n"
        ] {
            assert!(PgmDecoder::new(data).decode().is_err());
        }
    }

    #[test]
    fn dimension_limits() {
        let options = DecoderOptions::default().set_max_width(2);
        let err = PgmDecoder::new_with_options(b"P5\n3 1\n255\n\x00\x00\x00", options)
            .decode()
            .unwrap_err();
        assert!(matches!(err, PgmErrors::LargeDimensions(2, 3)));
    }
}
