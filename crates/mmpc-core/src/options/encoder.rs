/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bit_depth::BitDepth;

/// Options shared by encoders
///
/// Carries the geometry of the raw samples handed to an encoder
/// together with the rate controls of the codec.
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    width:      usize,
    height:     usize,
    depth:      BitDepth,
    quality:    u8,
    block_size: u8,
    step:       Option<u16>
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            width:      0,
            height:     0,
            depth:      BitDepth::Eight,
            quality:    30,
            block_size: 8,
            step:       None
        }
    }
}

impl EncoderOptions {
    /// Create new encode options
    ///
    /// # Arguments
    ///
    /// * `width`: Image width
    /// * `height`: Image height
    /// * `depth`: Sample depth of the image
    ///
    /// returns: EncoderOptions
    pub fn new(width: usize, height: usize, depth: BitDepth) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            depth,
            ..Default::default()
        }
    }
    /// Get the width for which the image will be encoded in
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Get height for which the image will be encoded in
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Get the depth for which the image will be encoded in
    pub const fn depth(&self) -> BitDepth {
        self.depth
    }
    /// Get the quality for which the image will be encoded with
    ///
    /// Quality ranges from 1 to 100, higher is better.
    /// It is mapped to a quantization step unless an explicit
    /// step was set with [`set_step`](Self::set_step)
    pub const fn quality(&self) -> u8 {
        self.quality
    }
    /// Get the transform block dimension
    pub const fn block_size(&self) -> u8 {
        self.block_size
    }
    /// Get the explicit quantization step, if any
    pub const fn step(&self) -> Option<u16> {
        self.step
    }
    /// Set width for the image to be encoded
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
    /// Set height for the image to be encoded
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    /// Set depth for the image to be encoded
    pub fn set_depth(mut self, depth: BitDepth) -> Self {
        self.depth = depth;
        self
    }
    /// Set quality of the image to be encoded
    ///
    /// Encoders reject values outside `1..=100`
    pub fn set_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }
    /// Set the transform block dimension
    pub fn set_block_size(mut self, block_size: u8) -> Self {
        self.block_size = block_size;
        self
    }
    /// Use `step` directly instead of deriving it from the quality
    pub fn set_step(mut self, step: u16) -> Self {
        self.step = Some(step);
        self
    }
}
