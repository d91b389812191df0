/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Padding, block tiling and cropping of sample planes

/// Round `length` up to the next multiple of `block_size`
///
/// Returns `None` on overflow
pub fn padded_dimension(length: usize, block_size: usize) -> Option<usize> {
    length.div_ceil(block_size).checked_mul(block_size)
}

/// Pad a plane to `padded_width x padded_height` by repeating the last column and row
pub(crate) fn pad_edge_replicate(
    pixels: &[u16], width: usize, height: usize, padded_width: usize, padded_height: usize
) -> Vec<f64> {
    let mut output = Vec::with_capacity(padded_width * padded_height);

    for y in 0..padded_height {
        let row_start = y.min(height - 1) * width;
        let row = &pixels[row_start..row_start + width];

        output.extend(row.iter().map(|x| f64::from(*x)));

        let last = f64::from(row[width - 1]);
        output.extend(core::iter::repeat(last).take(padded_width - width));
    }
    output
}

/// Copy the block at block column `bx`, block row `by` out of a plane
pub(crate) fn gather_block<T: Copy>(
    plane: &[T], plane_width: usize, block_size: usize, bx: usize, by: usize, block: &mut [T]
) {
    let x = bx * block_size;
    let y = by * block_size;

    for (r, out_row) in block.chunks_exact_mut(block_size).enumerate() {
        let start = (y + r) * plane_width + x;
        out_row.copy_from_slice(&plane[start..start + block_size]);
    }
}

/// Copy a block into a plane at block column `bx`, block row `by`
pub(crate) fn scatter_block<T: Copy>(
    block: &[T], plane: &mut [T], plane_width: usize, block_size: usize, bx: usize, by: usize
) {
    let x = bx * block_size;
    let y = by * block_size;

    for (r, in_row) in block.chunks_exact(block_size).enumerate() {
        let start = (y + r) * plane_width + x;
        plane[start..start + block_size].copy_from_slice(in_row);
    }
}

/// Crop the top left `width x height` region of a reconstructed plane,
/// rounding to nearest and clamping to `0..=max_value`
pub(crate) fn crop_and_clamp(
    plane: &[f64], plane_width: usize, width: usize, height: usize, max_value: u16
) -> Vec<u16> {
    let max = f64::from(max_value);
    let mut output = Vec::with_capacity(width * height);

    for row in plane.chunks_exact(plane_width).take(height) {
        output.extend(
            row[..width]
                .iter()
                .map(|x| x.round().clamp(0.0, max) as u16)
        );
    }
    output
}
