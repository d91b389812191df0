/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Lossy block-DCT compression of single channel radiological slices
//!
//! Images are padded to a multiple of the block size, each block is transformed
//! with an orthonormal DCT, quantized with a single scalar step, scanned in zigzag
//! order, run length coded and finally compressed with zlib.
//!
//! The resulting bitstream is a 17 byte header followed by the compressed payload,
//! see [`MmpcHeader`] for the layout.
//!
//! # Example
//! ```
//! use mmpc::GrayImage;
//! use mmpc_core::options::EncoderOptions;
//!
//! let image = GrayImage::from_u8(16, 16, &[128; 256]).unwrap();
//! let options = EncoderOptions::default().set_quality(100);
//!
//! let bitstream = mmpc::encode(&image, &options).unwrap();
//! let decoded = mmpc::decode(&bitstream).unwrap();
//!
//! assert_eq!(decoded, image);
//! ```
//!
//! # Features
//! - `log`: Emit debug and trace information through the `log` crate, on by default
#![macro_use]
extern crate core;

pub use backend::{EntropyBackend, ZlibBackend};
pub use blocks::padded_dimension;
pub use dct::BlockTransform;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use headers::{read_bitstream, trailing_bytes, write_bitstream, MmpcHeader};
pub use image::GrayImage;
use mmpc_core::bytestream::ZCursor;
use mmpc_core::options::{DecoderOptions, EncoderOptions};
pub use mmpc_core;
pub use quant::{default_step_policy, dequantize, min_step, quantize, StepPolicy};
pub use scan::zigzag_order;

mod backend;
mod blocks;
pub mod constants;
mod dct;
mod decoder;
mod encoder;
mod errors;
mod headers;
mod image;
mod quant;
pub mod rle;
mod scan;

/// Encode an image into a new bitstream
///
/// Width, height and depth are taken from `image`, rate controls
/// and block size from `options`.
pub fn encode(image: &GrayImage, options: &EncoderOptions) -> Result<Vec<u8>, CodecError> {
    let mut sink: Vec<u8> = Vec::new();
    MmpcEncoder::from_image(image, *options).encode(&mut sink)?;
    Ok(sink)
}

/// Decode a bitstream held in memory
///
/// Accepts any dimensions the header can express, use [`decode_with_options`]
/// to impose limits
pub fn decode(data: &[u8]) -> Result<GrayImage, CodecError> {
    decode_with_options(data, DecoderOptions::new_cmd())
}

/// Decode a bitstream held in memory
pub fn decode_with_options(data: &[u8], options: DecoderOptions) -> Result<GrayImage, CodecError> {
    MmpcDecoder::new_with_options(ZCursor::new(data), options).decode()
}
