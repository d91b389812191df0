/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A single channel raster
use mmpc_core::bit_depth::BitDepth;

use crate::errors::MmpcErrors;

/// A single channel image with samples stored row major
///
/// Samples are always held as `u16`, regardless of depth,
/// but never exceed [`BitDepth::max_value`] of the image's depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    width:  usize,
    height: usize,
    depth:  BitDepth,
    pixels: Vec<u16>
}

impl GrayImage {
    /// Create a new image from row major samples
    ///
    /// # Errors
    /// - Zero width or height
    /// - `pixels.len() != width * height`
    /// - A sample larger than the maximum value representable in `depth`
    pub fn new(
        width: usize, height: usize, depth: BitDepth, pixels: Vec<u16>
    ) -> Result<GrayImage, MmpcErrors> {
        if width == 0 || height == 0 {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Image dimensions must be positive, found {width}x{height}"
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            MmpcErrors::InvalidParameter(format!("Image dimensions {width}x{height} overflow"))
        })?;

        if pixels.len() != expected {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Expected {expected} samples for a {width}x{height} image but found {}",
                pixels.len()
            )));
        }
        let max = depth.max_value();

        if let Some(pos) = pixels.iter().position(|x| *x > max) {
            return Err(MmpcErrors::InvalidParameter(format!(
                "Sample {} at index {pos} exceeds maximum {max} for {} bit images",
                pixels[pos],
                depth.bits()
            )));
        }
        Ok(GrayImage {
            width,
            height,
            depth,
            pixels
        })
    }
    /// Create an eight bit image from bytes
    pub fn from_u8(width: usize, height: usize, pixels: &[u8]) -> Result<GrayImage, MmpcErrors> {
        let widened = pixels.iter().map(|x| u16::from(*x)).collect();

        GrayImage::new(width, height, BitDepth::Eight, widened)
    }

    pub const fn width(&self) -> usize {
        self.width
    }
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Return `(width, height)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    pub const fn depth(&self) -> BitDepth {
        self.depth
    }
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }
    pub fn into_pixels(self) -> Vec<u16> {
        self.pixels
    }
    /// Return the sample at `(x, y)`, or `None` if out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}
