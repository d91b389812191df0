/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Orthonormal two dimensional DCT-II and its inverse
//!
//! The transform is separable, so a block is processed as a pass over rows
//! followed by a pass over columns, each pass a small matrix multiply against
//! a basis table computed when the transform is created.
//!
//! Because the basis is orthonormal, `inverse(forward(x)) == x` up to floating
//! point error and the DC term of a flat block of value `v` is `v * B`.
use core::f64::consts::PI;

/// A forward and inverse DCT for one block size
///
/// Holds the basis table and a scratch buffer, so a single instance
/// should be reused for all blocks of an image.
pub struct BlockTransform {
    size:    usize,
    // basis[k * size + n] = alpha(k) * cos(pi * (2n + 1) * k / 2 * size)
    basis:   Vec<f64>,
    scratch: Vec<f64>
}

impl BlockTransform {
    /// Create a transform for `size x size` blocks
    ///
    /// # Panics
    /// If `size` is zero
    pub fn new(size: usize) -> BlockTransform {
        assert!(size > 0, "Block size must be positive");

        let n = size as f64;
        let dc_scale = (1.0 / n).sqrt();
        let ac_scale = (2.0 / n).sqrt();

        let mut basis = vec![0.0; size * size];

        for (k, row) in basis.chunks_exact_mut(size).enumerate() {
            let alpha = if k == 0 { dc_scale } else { ac_scale };

            for (i, value) in row.iter_mut().enumerate() {
                let angle = PI * ((2 * i + 1) * k) as f64 / (2.0 * n);
                *value = alpha * angle.cos();
            }
        }
        BlockTransform {
            size,
            basis,
            scratch: vec![0.0; size * size]
        }
    }
    /// The block dimension this transform was built for
    pub const fn size(&self) -> usize {
        self.size
    }
    /// Number of samples in one block
    pub const fn block_len(&self) -> usize {
        self.size * self.size
    }

    /// Forward transform a row major block into frequency coefficients
    ///
    /// `output[u * size + v]` holds the coefficient for vertical frequency `u`
    /// and horizontal frequency `v`
    pub fn forward(&mut self, input: &[f64], output: &mut [f64]) {
        let size = self.size;
        let len = self.block_len();

        assert_eq!(input.len(), len);
        assert_eq!(output.len(), len);

        // rows, scratch[r][v] = sum_c basis[v][c] * input[r][c]
        for (in_row, tmp_row) in input
            .chunks_exact(size)
            .zip(self.scratch.chunks_exact_mut(size))
        {
            for (v, out) in tmp_row.iter_mut().enumerate() {
                let basis_row = &self.basis[v * size..(v + 1) * size];
                *out = dot(basis_row, in_row);
            }
        }
        // columns, output[u][v] = sum_r basis[u][r] * scratch[r][v]
        for u in 0..size {
            let basis_row = &self.basis[u * size..(u + 1) * size];

            for v in 0..size {
                let mut sum = 0.0;

                for (r, b) in basis_row.iter().enumerate() {
                    sum += b * self.scratch[r * size + v];
                }
                output[u * size + v] = sum;
            }
        }
    }

    /// Inverse transform coefficients back into row major sample values
    ///
    /// The output is not rounded or clamped.
    pub fn inverse(&mut self, input: &[f64], output: &mut [f64]) {
        let size = self.size;
        let len = self.block_len();

        assert_eq!(input.len(), len);
        assert_eq!(output.len(), len);

        // rows, scratch[u][c] = sum_v basis[v][c] * input[u][v]
        for (in_row, tmp_row) in input
            .chunks_exact(size)
            .zip(self.scratch.chunks_exact_mut(size))
        {
            for (c, out) in tmp_row.iter_mut().enumerate() {
                let mut sum = 0.0;

                for (v, coeff) in in_row.iter().enumerate() {
                    sum += self.basis[v * size + c] * coeff;
                }
                *out = sum;
            }
        }
        // columns, output[r][c] = sum_u basis[u][r] * scratch[u][c]
        for r in 0..size {
            for c in 0..size {
                let mut sum = 0.0;

                for u in 0..size {
                    sum += self.basis[u * size + r] * self.scratch[u * size + c];
                }
                output[r * size + c] = sum;
            }
        }
    }
}

#[inline(always)]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use crate::dct::BlockTransform;

    #[test]
    fn flat_block_has_only_dc() {
        let mut transform = BlockTransform::new(8);
        let input = [128.0; 64];
        let mut output = [0.0; 64];

        transform.forward(&input, &mut output);

        assert!((output[0] - 1024.0).abs() < 1e-9);
        for ac in &output[1..] {
            assert!(ac.abs() < 1e-9, "AC coefficient {ac} should be zero");
        }
    }

    #[test]
    fn inverse_undoes_forward() {
        let mut rand = WyRand::new_seed(42);

        for size in [1, 2, 4, 7, 8, 16] {
            let mut transform = BlockTransform::new(size);
            let len = size * size;

            let input: Vec<f64> = (0..len)
                .map(|_| f64::from(rand.generate_range(0_u16..=4095)))
                .collect();
            let mut coeffs = vec![0.0; len];
            let mut output = vec![0.0; len];

            transform.forward(&input, &mut coeffs);
            transform.inverse(&coeffs, &mut output);

            for (a, b) in input.iter().zip(&output) {
                assert!((a - b).abs() < 1e-6, "size {size}: {a} != {b}");
            }
        }
    }

    #[test]
    fn transform_preserves_energy() {
        let mut rand = WyRand::new_seed(7);
        let mut transform = BlockTransform::new(8);

        let input: Vec<f64> = (0..64)
            .map(|_| f64::from(rand.generate_range(0_u8..=255)))
            .collect();
        let mut coeffs = vec![0.0; 64];
        transform.forward(&input, &mut coeffs);

        let energy_in: f64 = input.iter().map(|x| x * x).sum();
        let energy_out: f64 = coeffs.iter().map(|x| x * x).sum();

        assert!((energy_in - energy_out).abs() / energy_in < 1e-12);
    }
}
