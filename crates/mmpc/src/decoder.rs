/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use mmpc_core::bytestream::{ZByteIoError, ZByteReaderTrait, ZReader};
use mmpc_core::log::{debug, trace, warn};
use mmpc_core::options::DecoderOptions;

use crate::backend::{EntropyBackend, ZlibBackend};
use crate::blocks::{crop_and_clamp, gather_block, scatter_block};
use crate::constants::{MMPC_HEADER_SIZE, RLE_MAX_BYTES_PER_COEFFICIENT};
use crate::dct::BlockTransform;
use crate::errors::{AtStage, CodecError, MmpcErrors, Stage};
use crate::headers::{split_payload, MmpcHeader};
use crate::image::GrayImage;
use crate::quant::dequantize_slice;
use crate::rle;
use crate::scan::{unflatten_block, zigzag_order};

/// A decoder for mmpc bitstreams
///
/// # Example
/// ```no_run
/// use mmpc::MmpcDecoder;
/// use mmpc_core::bytestream::ZCursor;
/// let bitstream = std::fs::read("slice.mmpc").unwrap();
/// let mut decoder = MmpcDecoder::new(ZCursor::new(&bitstream));
///
/// decoder.decode_headers().unwrap();
/// let (width, height) = decoder.dimensions().unwrap();
/// let image = decoder.decode().unwrap();
/// assert_eq!(image.dimensions(), (width, height));
/// ```
pub struct MmpcDecoder<T: ZByteReaderTrait> {
    stream:  ZReader<T>,
    options: DecoderOptions,
    header:  Option<MmpcHeader>,
    stage:   Stage,
    backend: Box<dyn EntropyBackend>
}

impl<T> MmpcDecoder<T>
where
    T: ZByteReaderTrait
{
    /// Create a new decoder with default options
    pub fn new(source: T) -> MmpcDecoder<T> {
        MmpcDecoder::new_with_options(source, DecoderOptions::default())
    }
    /// Create a new decoder with custom options
    pub fn new_with_options(source: T, options: DecoderOptions) -> MmpcDecoder<T> {
        MmpcDecoder {
            stream: ZReader::new(source),
            options,
            header: None,
            stage: Stage::ReadHeader,
            backend: Box::new(ZlibBackend::default())
        }
    }
    /// Replace the lossless backend, zlib by default
    ///
    /// Must match the backend the bitstream was encoded with
    pub fn set_backend(mut self, backend: Box<dyn EntropyBackend>) -> Self {
        self.backend = backend;
        self
    }
    /// The stage the decoder is in, or failed at
    pub const fn stage(&self) -> Stage {
        self.stage
    }
    /// Return the parsed header, or `None` if headers weren't decoded yet
    pub const fn header(&self) -> Option<&MmpcHeader> {
        self.header.as_ref()
    }
    /// Return image dimensions `(width, height)`, or `None` if headers weren't decoded yet
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header
            .map(|h| (usize::from(h.width), usize::from(h.height)))
    }

    /// Read and validate the 17 byte header
    ///
    /// Calling this more than once is a no-op
    pub fn decode_headers(&mut self) -> Result<(), CodecError> {
        if self.header.is_some() {
            return Ok(());
        }
        advance(&mut self.stage, Stage::ReadHeader);

        let bytes = self
            .stream
            .read_fixed_bytes_or_error::<MMPC_HEADER_SIZE>()
            .map_err(|e| match e {
                ZByteIoError::NotEnoughBytes(_, found) => MmpcErrors::TruncatedHeader(found),
                e => MmpcErrors::IoErrors(e)
            })
            .at(Stage::ReadHeader)?;

        advance(&mut self.stage, Stage::ValidateMagicAndVersion);

        let header = MmpcHeader::parse(&bytes).at(Stage::ValidateMagicAndVersion)?;

        if usize::from(header.width) > self.options.max_width() {
            return Err(CodecError::new(
                Stage::ValidateMagicAndVersion,
                MmpcErrors::TooLargeDimensions(self.options.max_width(), usize::from(header.width))
            ));
        }
        if usize::from(header.height) > self.options.max_height() {
            return Err(CodecError::new(
                Stage::ValidateMagicAndVersion,
                MmpcErrors::TooLargeDimensions(
                    self.options.max_height(),
                    usize::from(header.height)
                )
            ));
        }
        debug!("Width: {}", header.width);
        debug!("Height: {}", header.height);
        debug!("Bit depth: {}", header.depth.bits());
        debug!("Block size: {}", header.block_size);
        debug!("Quantization step: {}", header.step);
        debug!("Payload length: {}", header.payload_length);

        self.header = Some(header);
        Ok(())
    }

    /// Decode the bitstream into an image
    ///
    /// Any failure aborts the whole decode, no partial image is returned
    pub fn decode(&mut self) -> Result<GrayImage, CodecError> {
        self.decode_headers()?;

        let header = match self.header {
            Some(header) => header,
            None => {
                return Err(CodecError::new(
                    Stage::ReadHeader,
                    MmpcErrors::InvalidHeader("header missing after decoding headers")
                ))
            }
        };
        let block_size = usize::from(header.block_size);
        let count = header.coefficient_count().at(Stage::ValidateMagicAndVersion)?;

        let runs = {
            advance(&mut self.stage, Stage::ReadPayload);
            let remaining = self.stream.remaining_bytes().at(Stage::ReadPayload)?;
            let payload = split_payload(&header, remaining).at(Stage::ReadPayload)?;

            let trailing = remaining.len() - payload.len();

            if trailing > 0 {
                if self.options.strict_mode() {
                    return Err(CodecError::new(
                        Stage::ReadPayload,
                        MmpcErrors::TrailingBytes(trailing)
                    ));
                }
                warn!("Found {} bytes after the payload, ignoring", trailing);
            }

            advance(&mut self.stage, Stage::Decompress);
            let limit = count
                .checked_mul(RLE_MAX_BYTES_PER_COEFFICIENT)
                .ok_or(MmpcErrors::InvalidHeader("coefficient count overflows"))
                .at(Stage::Decompress)?;

            self.backend
                .decompress(payload, limit)
                .at(Stage::Decompress)?
        };

        advance(&mut self.stage, Stage::RleDecode);
        let scanned = rle::decode_exact(&runs, count).at(Stage::RleDecode)?;
        drop(runs);

        let padded_width = header.padded_width();
        let padded_height = header.padded_height();

        advance(&mut self.stage, Stage::ReshapeIntoBlocks);
        let quantized = reshape_into_blocks(&scanned, padded_width, padded_height, block_size);
        drop(scanned);

        advance(&mut self.stage, Stage::DequantizeAllBlocks);
        let mut coefficients = vec![0.0; quantized.len()];
        dequantize_slice(&quantized, header.step, &mut coefficients);
        drop(quantized);

        advance(&mut self.stage, Stage::InverseTransformAllBlocks);
        let reconstructed =
            inverse_transform_all_blocks(&coefficients, padded_width, padded_height, block_size);

        advance(&mut self.stage, Stage::Crop);
        let width = usize::from(header.width);
        let height = usize::from(header.height);

        let pixels = crop_and_clamp(
            &reconstructed,
            padded_width,
            width,
            height,
            header.depth.max_value()
        );
        let image = GrayImage::new(width, height, header.depth, pixels).at(Stage::Crop)?;

        advance(&mut self.stage, Stage::Done);

        Ok(image)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    trace!("Decoder stage: {}", next);
    *stage = next;
}

/// Place scan ordered blocks into a row major plane, blocks in raster order
fn reshape_into_blocks(
    scanned: &[i16], padded_width: usize, padded_height: usize, block_size: usize
) -> Vec<i16> {
    let order = zigzag_order(block_size);
    let block_len = block_size * block_size;
    let blocks_per_row = padded_width / block_size;

    let mut plane = vec![0; padded_width * padded_height];
    let mut block = vec![0; block_len];

    for (index, chunk) in scanned.chunks_exact(block_len).enumerate() {
        let (by, bx) = (index / blocks_per_row, index % blocks_per_row);

        unflatten_block(chunk, &order, &mut block);
        scatter_block(&block, &mut plane, padded_width, block_size, bx, by);
    }
    plane
}

fn inverse_transform_all_blocks(
    coefficients: &[f64], padded_width: usize, padded_height: usize, block_size: usize
) -> Vec<f64> {
    let mut transform = BlockTransform::new(block_size);
    let mut output = vec![0.0; coefficients.len()];

    let mut block = vec![0.0; block_size * block_size];
    let mut samples = vec![0.0; block_size * block_size];

    for by in 0..padded_height / block_size {
        for bx in 0..padded_width / block_size {
            gather_block(coefficients, padded_width, block_size, bx, by, &mut block);
            transform.inverse(&block, &mut samples);
            scatter_block(&samples, &mut output, padded_width, block_size, bx, by);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use mmpc_core::bit_depth::BitDepth;
    use mmpc_core::bytestream::ZCursor;
    use mmpc_core::options::{DecoderOptions, EncoderOptions};

    use crate::errors::{ErrorKind, MmpcErrors, Stage};
    use crate::{MmpcDecoder, MmpcEncoder};

    fn bitstream(width: usize, height: usize) -> Vec<u8> {
        let pixels: Vec<u16> = (0..width * height).map(|x| (x % 200) as u16).collect();
        let options = EncoderOptions::new(width, height, BitDepth::Eight);
        let mut sink: Vec<u8> = vec![];
        MmpcEncoder::new(&pixels, options)
            .encode(&mut sink)
            .unwrap();
        sink
    }

    #[test]
    fn headers_before_decode() {
        let data = bitstream(33, 17);
        let mut decoder = MmpcDecoder::new(ZCursor::new(&data));

        assert!(decoder.dimensions().is_none());
        decoder.decode_headers().unwrap();
        assert_eq!(decoder.dimensions(), Some((33, 17)));
        assert_eq!(decoder.header().unwrap().block_size, 8);

        let image = decoder.decode().unwrap();
        assert_eq!(image.dimensions(), (33, 17));
        assert_eq!(decoder.stage(), Stage::Done);
    }

    #[test]
    fn empty_input_is_truncated_header() {
        let mut decoder = MmpcDecoder::new(ZCursor::new(&[0_u8; 0]));
        let err = decoder.decode().unwrap_err();

        assert_eq!(err.stage(), Stage::ReadHeader);
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err.error(), MmpcErrors::TruncatedHeader(0)));
    }

    #[test]
    fn dimension_limits() {
        let data = bitstream(40, 20);
        let options = DecoderOptions::default().set_max_width(39);
        let mut decoder = MmpcDecoder::new_with_options(ZCursor::new(&data), options);

        let err = decoder.decode_headers().unwrap_err();
        assert!(matches!(err.error(), MmpcErrors::TooLargeDimensions(39, 40)));
    }

    #[test]
    fn trailing_bytes_only_fatal_in_strict_mode() {
        let mut data = bitstream(16, 16);
        data.push(0);

        assert!(MmpcDecoder::new(ZCursor::new(&data)).decode().is_ok());

        let options = DecoderOptions::default().set_strict_mode(true);
        let err = MmpcDecoder::new_with_options(ZCursor::new(&data), options)
            .decode()
            .unwrap_err();
        assert_eq!(err.stage(), Stage::ReadPayload);
        assert!(matches!(err.error(), MmpcErrors::TrailingBytes(1)));
    }
}
