/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scalar quantization and the quality to step mapping

use mmpc_core::bit_depth::BitDepth;

/// A function mapping a quality in `1..=100` to a quantization step
///
/// Implementations must be pure, must never return zero
/// and must never return a larger step for a larger quality.
pub type StepPolicy = fn(u8) -> u16;

/// Base step scaled by the quality factor, a quality of 50 uses it unchanged
const BASE_STEP: u32 = 16;

/// Map a quality to a step, JPEG style
///
/// Quality is clamped to `1..=100`, 100 maps to a step of 1,
/// 50 maps to 16 and 1 maps to 800.
pub fn default_step_policy(quality: u8) -> u16 {
    let quality = u32::from(quality.clamp(1, 100));

    let scale = if quality < 50 {
        5000 / quality
    } else {
        200 - 2 * quality
    };
    let step = ((BASE_STEP * scale + 50) / 100).max(1);

    // max is 16 * 5000 + 50 / 100 = 800, fits
    step as u16
}

/// Smallest step for which no coefficient of a `block_size` block
/// of `depth` samples saturates the i16 range
///
/// Coefficients of the orthonormal transform are bounded by
/// `max_value * block_size`, reached by the DC term of a flat block.
pub fn min_step(depth: BitDepth, block_size: u8) -> u16 {
    let peak = u32::from(depth.max_value()) * u32::from(block_size);
    let step = peak.div_ceil(i16::MAX as u32).max(1);

    // at most 65535 * 255 / 32767 + 1 = 511
    step as u16
}

/// Quantize a coefficient, rounding half away from zero and saturating to i16
#[inline]
pub fn quantize(coefficient: f64, step: u16) -> i16 {
    let value = (coefficient / f64::from(step)).round();
    // `as` saturates for floats, and maps NaN to zero
    value.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

#[inline]
pub fn dequantize(value: i16, step: u16) -> f64 {
    f64::from(value) * f64::from(step)
}

pub(crate) fn quantize_slice(coefficients: &[f64], step: u16, output: &mut [i16]) {
    for (out, coeff) in output.iter_mut().zip(coefficients) {
        *out = quantize(*coeff, step);
    }
}

pub(crate) fn dequantize_slice(values: &[i16], step: u16, output: &mut [f64]) {
    for (out, value) in output.iter_mut().zip(values) {
        *out = dequantize(*value, step);
    }
}
