/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Distortion and rate metrics
//!
//! All distortion metrics compare a reference against a reconstruction of the
//! same size and depth, the peak signal is `2^depth - 1`.
#![allow(clippy::needless_range_loop)]

use mmpc_core::bit_depth::BitDepth;

use crate::errors::EvalErrors;

/// Side of the square SSIM window
pub const SSIM_WINDOW: usize = 8;
/// SSIM luminance stability constant
pub const SSIM_K1: f64 = 0.01;
/// SSIM contrast stability constant
pub const SSIM_K2: f64 = 0.03;

/// A borrowed single channel image
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    pixels: &'a [u16],
    width:  usize,
    height: usize,
    depth:  BitDepth
}

impl<'a> ImageView<'a> {
    /// Wrap row major samples
    ///
    /// # Errors
    /// If the dimensions are zero or don't match the sample count
    pub fn new(
        pixels: &'a [u16], width: usize, height: usize, depth: BitDepth
    ) -> Result<ImageView<'a>, EvalErrors> {
        if width == 0 || height == 0 {
            return Err(EvalErrors::InvalidImage("zero dimension"));
        }
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(EvalErrors::InvalidImage(
                "sample count does not match dimensions"
            ));
        }
        Ok(ImageView {
            pixels,
            width,
            height,
            depth
        })
    }
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    pub const fn depth(&self) -> BitDepth {
        self.depth
    }
    pub const fn pixels(&self) -> &'a [u16] {
        self.pixels
    }
    /// Number of samples
    pub const fn len(&self) -> usize {
        self.pixels.len()
    }
    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

fn check_same_size(reference: &ImageView, reconstructed: &ImageView) -> Result<(), EvalErrors> {
    if reference.dimensions() != reconstructed.dimensions() {
        return Err(EvalErrors::DimensionMismatch(
            reference.dimensions(),
            reconstructed.dimensions()
        ));
    }
    Ok(())
}

/// Mean squared error
pub fn mse(reference: &ImageView, reconstructed: &ImageView) -> Result<f64, EvalErrors> {
    check_same_size(reference, reconstructed)?;

    let sum: f64 = reference
        .pixels
        .iter()
        .zip(reconstructed.pixels)
        .map(|(a, b)| {
            let diff = f64::from(*a) - f64::from(*b);
            diff * diff
        })
        .sum();

    Ok(sum / reference.len() as f64)
}

/// Root mean squared error
pub fn rmse(reference: &ImageView, reconstructed: &ImageView) -> Result<f64, EvalErrors> {
    Ok(mse(reference, reconstructed)?.sqrt())
}

/// Peak signal to noise ratio in dB, infinite for identical images
pub fn psnr(rmse: f64, depth: BitDepth) -> f64 {
    if rmse == 0.0 {
        return f64::INFINITY;
    }
    20.0 * (f64::from(depth.max_value()) / rmse).log10()
}

/// Mean structural similarity over 8x8 uniformly weighted windows, stride 1
///
/// Images smaller than the window in a dimension use the whole
/// dimension as the window.
pub fn ssim(reference: &ImageView, reconstructed: &ImageView) -> Result<f64, EvalErrors> {
    check_same_size(reference, reconstructed)?;

    let (width, height) = reference.dimensions();
    let window_w = SSIM_WINDOW.min(width);
    let window_h = SSIM_WINDOW.min(height);

    let peak = f64::from(reference.depth.max_value());
    let c1 = (SSIM_K1 * peak).powi(2);
    let c2 = (SSIM_K2 * peak).powi(2);

    let count = (window_w * window_h) as f64;
    let mut total = 0.0;
    let mut windows = 0_usize;

    for y in 0..=(height - window_h) {
        for x in 0..=(width - window_w) {
            let (mut sum_a, mut sum_b) = (0.0, 0.0);
            let (mut sum_aa, mut sum_bb, mut sum_ab) = (0.0, 0.0, 0.0);

            for wy in y..y + window_h {
                let row = wy * width;

                for wx in x..x + window_w {
                    let a = f64::from(reference.pixels[row + wx]);
                    let b = f64::from(reconstructed.pixels[row + wx]);

                    sum_a += a;
                    sum_b += b;
                    sum_aa += a * a;
                    sum_bb += b * b;
                    sum_ab += a * b;
                }
            }
            let mean_a = sum_a / count;
            let mean_b = sum_b / count;
            let var_a = (sum_aa / count - mean_a * mean_a).max(0.0);
            let var_b = (sum_bb / count - mean_b * mean_b).max(0.0);
            let covariance = sum_ab / count - mean_a * mean_b;

            let numerator = (2.0 * mean_a * mean_b + c1) * (2.0 * covariance + c2);
            let denominator = (mean_a * mean_a + mean_b * mean_b + c1) * (var_a + var_b + c2);

            total += numerator / denominator;
            windows += 1;
        }
    }
    Ok(total / windows as f64)
}

/// Bits of compressed data per image sample
pub fn bits_per_pixel(compressed_bytes: usize, pixels: usize) -> f64 {
    if pixels == 0 {
        return 0.0;
    }
    (compressed_bytes as f64 * 8.0) / pixels as f64
}

/// Raw size over compressed size, raw samples taking
/// one byte at eight bits and two bytes otherwise
pub fn compression_ratio(pixels: usize, depth: BitDepth, compressed_bytes: usize) -> f64 {
    if compressed_bytes == 0 {
        return f64::INFINITY;
    }
    (pixels * depth.size_of()) as f64 / compressed_bytes as f64
}

/// Absolute error scaled so the largest error maps to 255
///
/// An all zero map is returned for identical images
pub fn error_map(reference: &ImageView, reconstructed: &ImageView) -> Result<Vec<u8>, EvalErrors> {
    check_same_size(reference, reconstructed)?;

    let errors: Vec<u16> = reference
        .pixels
        .iter()
        .zip(reconstructed.pixels)
        .map(|(a, b)| a.abs_diff(*b))
        .collect();

    let max = f64::from(errors.iter().copied().max().unwrap_or(0).max(1));

    Ok(errors
        .iter()
        .map(|e| (255.0 * f64::from(*e) / max) as u8)
        .collect())
}
