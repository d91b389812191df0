/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use mmpc_core::bytestream::ZByteWriterTrait;
use mmpc_core::log::{debug, trace};
use mmpc_core::options::EncoderOptions;

use crate::backend::{EntropyBackend, ZlibBackend};
use crate::blocks::{gather_block, pad_edge_replicate, padded_dimension, scatter_block};
use crate::constants::MMPC_VERSION;
use crate::dct::BlockTransform;
use crate::errors::{AtStage, CodecError, MmpcErrors, Stage};
use crate::headers::{write_bitstream, MmpcHeader};
use crate::image::GrayImage;
use crate::quant::{default_step_policy, min_step, quantize_slice, StepPolicy};
use crate::rle;
use crate::scan::{flatten_block, zigzag_order};

/// Block DCT encoder for single channel images
///
/// # Example
/// - Encode a 100 by 100 twelve bit image
///
/// ```
/// use mmpc::MmpcEncoder;
/// use mmpc::CodecError;
/// use mmpc_core::bit_depth::BitDepth;
/// use mmpc_core::options::EncoderOptions;
///
/// const W: usize = 100;
/// const H: usize = 100;
///
/// fn main() -> Result<(), CodecError> {
///     let pixels: Vec<u16> = (0..W * H).map(|i| (i % 4096) as u16).collect();
///     let options = EncoderOptions::new(W, H, BitDepth::Twelve).set_quality(60);
///     let mut encoder = MmpcEncoder::new(&pixels, options);
///     let mut sink: Vec<u8> = vec![];
///     let size = encoder.encode(&mut sink)?;
///     assert_eq!(size, sink.len());
///     Ok(())
/// }
/// ```
pub struct MmpcEncoder<'a> {
    pixels:      &'a [u16],
    options:     EncoderOptions,
    step_policy: StepPolicy,
    backend:     Box<dyn EntropyBackend>,
    stage:       Stage
}

/// Padded sample plane and its geometry
struct Plane<T> {
    data:   Vec<T>,
    width:  usize,
    height: usize
}

impl<'a> MmpcEncoder<'a> {
    /// Create a new encoder which will encode the pixels
    ///
    /// # Arguments
    /// - pixels: Row major samples, length must be `width*height`
    /// - options: Geometry, depth and rate controls of the image
    pub fn new(pixels: &'a [u16], options: EncoderOptions) -> MmpcEncoder<'a> {
        MmpcEncoder {
            pixels,
            options,
            step_policy: default_step_policy,
            backend: Box::new(ZlibBackend::default()),
            stage: Stage::Load
        }
    }
    /// Create an encoder for `image`
    ///
    /// Width, height and depth of `options` are replaced by the image's own
    pub fn from_image(image: &'a GrayImage, options: EncoderOptions) -> MmpcEncoder<'a> {
        let options = options
            .set_width(image.width())
            .set_height(image.height())
            .set_depth(image.depth());

        MmpcEncoder::new(image.pixels(), options)
    }
    /// Replace the quality to step mapping
    ///
    /// Ignored when the options carry an explicit step
    pub fn set_step_policy(mut self, policy: StepPolicy) -> Self {
        self.step_policy = policy;
        self
    }
    /// Replace the lossless backend, zlib by default
    pub fn set_backend(mut self, backend: Box<dyn EntropyBackend>) -> Self {
        self.backend = backend;
        self
    }
    /// The stage the encoder is in, or failed at
    pub const fn stage(&self) -> Stage {
        self.stage
    }
    /// The quantization step that will be written to the header
    ///
    /// A step derived from quality is raised to [`min_step`] for the
    /// configured depth and block size, an explicit step is used as is.
    pub fn step(&self) -> u16 {
        match self.options.step() {
            Some(step) => step,
            None => (self.step_policy)(self.options.quality())
                .max(min_step(self.options.depth(), self.options.block_size()))
        }
    }

    fn set_stage(&mut self, stage: Stage) {
        trace!("Encoder stage: {}", stage);
        self.stage = stage;
    }

    /// Encode the image into `sink`
    ///
    /// # Returns
    /// - Ok(size): Bytes written, header included
    /// - Err: The error and the stage it happened in
    pub fn encode<T: ZByteWriterTrait>(&mut self, sink: T) -> Result<usize, CodecError> {
        self.set_stage(Stage::Load);
        let step = self.validate().at(Stage::Load)?;

        let block_size = usize::from(self.options.block_size());

        debug!(
            "Encoding {}x{} {} bit image, block size {}, step {}, backend {}",
            self.options.width(),
            self.options.height(),
            self.options.depth().bits(),
            block_size,
            step,
            self.backend.name()
        );

        self.set_stage(Stage::Pad);
        let padded = self.pad(block_size).at(Stage::Pad)?;

        self.set_stage(Stage::TransformAllBlocks);
        let coefficients = transform_all_blocks(&padded, block_size);

        self.set_stage(Stage::QuantizeAllBlocks);
        let quantized = quantize_all_blocks(&coefficients, step);

        self.set_stage(Stage::Flatten);
        let flattened = flatten(&quantized, block_size);

        self.set_stage(Stage::RleEncode);
        let runs = rle::encode(&flattened);
        trace!(
            "Run length stream: {} coefficients -> {} bytes",
            flattened.len(),
            runs.len()
        );

        self.set_stage(Stage::Compress);
        let payload = self.backend.compress(&runs).at(Stage::Compress)?;

        self.set_stage(Stage::AssembleHeader);
        let header = self.assemble_header(step, payload.len()).at(Stage::AssembleHeader)?;

        self.set_stage(Stage::Write);
        let written = write_bitstream(&header, &payload, sink).at(Stage::Write)?;

        debug!("Encoded {} bytes", written);

        self.set_stage(Stage::Done);
        Ok(written)
    }

    /// Check options and pixels, returning the step to use
    fn validate(&self) -> Result<u16, MmpcErrors> {
        let options = &self.options;
        let (width, height) = (options.width(), options.height());

        if width == 0 || height == 0 {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Image dimensions must be positive, found {width}x{height}"
            )));
        }
        if width > usize::from(u16::MAX) {
            return Err(MmpcErrors::TooLargeDimensions(usize::from(u16::MAX), width));
        }
        if height > usize::from(u16::MAX) {
            return Err(MmpcErrors::TooLargeDimensions(usize::from(u16::MAX), height));
        }
        if self.pixels.len() != width * height {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Expected {} samples for a {width}x{height} image but found {}",
                width * height,
                self.pixels.len()
            )));
        }
        if options.block_size() == 0 {
            return Err(MmpcErrors::InvalidParameter(
                "Block size must be at least 1".to_string()
            ));
        }
        if !(1..=100).contains(&options.quality()) {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Quality must be in 1..=100, found {}",
                options.quality()
            )));
        }
        let step = self.step();

        if step == 0 {
            return Err(MmpcErrors::InvalidParameter(
                "Quantization step must be at least 1".to_string()
            ));
        }
        let smallest = min_step(options.depth(), options.block_size());

        if step < smallest {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Step {step} is too small for {} bit samples in {}x{} blocks, the minimum is {smallest}",
                options.depth().bits(),
                options.block_size(),
                options.block_size()
            )));
        }
        let max = options.depth().max_value();

        if let Some(sample) = self.pixels.iter().find(|x| **x > max) {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Sample {sample} exceeds maximum {max} for {} bit images",
                options.depth().bits()
            )));
        }
        Ok(step)
    }

    fn pad(&self, block_size: usize) -> Result<Plane<f64>, MmpcErrors> {
        let (width, height) = (self.options.width(), self.options.height());

        let too_large = || MmpcErrors::InvalidParameter("Padded dimensions overflow".to_string());

        let padded_width = padded_dimension(width, block_size).ok_or_else(too_large)?;
        let padded_height = padded_dimension(height, block_size).ok_or_else(too_large)?;

        padded_width.checked_mul(padded_height).ok_or_else(too_large)?;

        trace!("Padding {width}x{height} to {padded_width}x{padded_height}");

        Ok(Plane {
            data:   pad_edge_replicate(self.pixels, width, height, padded_width, padded_height),
            width:  padded_width,
            height: padded_height
        })
    }

    fn assemble_header(&self, step: u16, payload_length: usize) -> Result<MmpcHeader, MmpcErrors> {
        let payload_length = u32::try_from(payload_length).map_err(|_| {
            MmpcErrors::InvalidParameter(format!(
                "Payload of {payload_length} bytes does not fit the header"
            ))
        })?;
        // validate() bounded width and height to u16
        Ok(MmpcHeader {
            version: MMPC_VERSION,
            width: self.options.width() as u16,
            height: self.options.height() as u16,
            depth: self.options.depth(),
            block_size: self.options.block_size(),
            step,
            payload_length
        })
    }
}

fn transform_all_blocks(plane: &Plane<f64>, block_size: usize) -> Plane<f64> {
    let mut transform = BlockTransform::new(block_size);
    let mut output = vec![0.0; plane.data.len()];

    let mut block = vec![0.0; block_size * block_size];
    let mut coefficients = vec![0.0; block_size * block_size];

    for by in 0..plane.height / block_size {
        for bx in 0..plane.width / block_size {
            gather_block(&plane.data, plane.width, block_size, bx, by, &mut block);
            transform.forward(&block, &mut coefficients);
            scatter_block(&coefficients, &mut output, plane.width, block_size, bx, by);
        }
    }
    Plane {
        data:   output,
        width:  plane.width,
        height: plane.height
    }
}

/// Quantization is per coefficient, so the plane is processed in one pass
fn quantize_all_blocks(plane: &Plane<f64>, step: u16) -> Plane<i16> {
    let mut output = vec![0; plane.data.len()];
    quantize_slice(&plane.data, step, &mut output);

    Plane {
        data:   output,
        width:  plane.width,
        height: plane.height
    }
}

/// Blocks in raster order, coefficients in zigzag order
fn flatten(plane: &Plane<i16>, block_size: usize) -> Vec<i16> {
    let order = zigzag_order(block_size);
    let mut block = vec![0; block_size * block_size];
    let mut output = Vec::with_capacity(plane.data.len());

    for by in 0..plane.height / block_size {
        for bx in 0..plane.width / block_size {
            gather_block(&plane.data, plane.width, block_size, bx, by, &mut block);
            flatten_block(&block, &order, &mut output);
        }
    }
    output
}
