/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Coefficient scan order within a block

/// Return the zigzag traversal of a `size x size` block
///
/// `order[i]` is the row major index of the `i`'th coefficient visited.
/// Anti-diagonals `r + c = s` are visited in increasing `s`, odd diagonals
/// walking down (increasing row) and even diagonals walking up, which
/// for a size of 8 is the familiar JPEG zigzag.
pub fn zigzag_order(size: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(size * size);

    if size == 0 {
        return order;
    }
    for s in 0..(2 * size - 1) {
        let start = s.saturating_sub(size - 1);
        let end = s.min(size - 1);

        if s % 2 == 1 {
            for r in start..=end {
                order.push(r * size + (s - r));
            }
        } else {
            for r in (start..=end).rev() {
                order.push(r * size + (s - r));
            }
        }
    }
    order
}

/// Append a row major block to `sink` in scan order
pub(crate) fn flatten_block(block: &[i16], order: &[usize], sink: &mut Vec<i16>) {
    sink.extend(order.iter().map(|pos| block[*pos]));
}

/// Scatter scan ordered coefficients back into a row major block
pub(crate) fn unflatten_block(scanned: &[i16], order: &[usize], block: &mut [i16]) {
    for (value, pos) in scanned.iter().zip(order) {
        block[*pos] = *value;
    }
}

#[cfg(test)]
mod tests {
    use crate::scan::{flatten_block, unflatten_block, zigzag_order};

    #[rustfmt::skip]
    const JPEG_ZIGZAG: [usize; 64] = [
        0,  1,  8, 16,  9,  2,  3, 10,
        17, 24, 32, 25, 18, 11,  4,  5,
        12, 19, 26, 33, 40, 48, 41, 34,
        27, 20, 13,  6,  7, 14, 21, 28,
        35, 42, 49, 56, 57, 50, 43, 36,
        29, 22, 15, 23, 30, 37, 44, 51,
        58, 59, 52, 45, 38, 31, 39, 46,
        53, 60, 61, 54, 47, 55, 62, 63
    ];

    #[test]
    fn size_8_is_jpeg_zigzag() {
        assert_eq!(zigzag_order(8), JPEG_ZIGZAG);
    }

    #[test]
    fn order_is_a_permutation() {
        for size in 1..=16 {
            let mut order = zigzag_order(size);
            order.sort_unstable();
            assert_eq!(order, (0..size * size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn small_sizes() {
        assert_eq!(zigzag_order(1), [0]);
        assert_eq!(zigzag_order(2), [0, 1, 2, 3]);
        assert_eq!(zigzag_order(3), [0, 1, 3, 6, 4, 2, 5, 7, 8]);
    }

    #[test]
    fn flatten_then_unflatten() {
        let order = zigzag_order(4);
        let block: Vec<i16> = (0..16).collect();

        let mut scanned = vec![];
        flatten_block(&block, &order, &mut scanned);
        assert_eq!(&scanned[..6], &[0, 1, 4, 8, 5, 2]);

        let mut restored = vec![0; 16];
        unflatten_block(&scanned, &order, &mut restored);
        assert_eq!(restored, block);
    }
}
