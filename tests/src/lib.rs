/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::fs::read;
use std::path::{Path, PathBuf};

use mmpc::GrayImage;
use mmpc_core::bit_depth::BitDepth;
use nanorand::{Rng, WyRand};
use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_128;

mod determinism;
mod pipeline;

/// One synthetic slice to push through the codec
#[derive(Clone, Deserialize, Debug)]
pub struct TestEntry {
    pub name:       String,
    pub width:      usize,
    pub height:     usize,
    pub bitdepth:   u8,
    pub quality:    u8,
    pub block_size: Option<u8>,
    pub seed:       u64,
    /// Upper bound on reconstruction RMSE
    pub max_rmse:   f64,
    pub comment:    Option<String>
}

impl TestEntry {
    pub fn depth(&self) -> BitDepth {
        BitDepth::from_bits(self.bitdepth).unwrap()
    }

    pub fn image(&self) -> GrayImage {
        synthetic_slice(self.width, self.height, self.depth(), self.seed)
    }
}

pub fn test_entries() -> Vec<TestEntry> {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/codec.json");
    let json_file = read(file).unwrap();

    serde_json::from_slice(&json_file).unwrap()
}

/// A soft disc on a dark background with a little noise
pub fn synthetic_slice(width: usize, height: usize, depth: BitDepth, seed: u64) -> GrayImage {
    let mut rand = WyRand::new_seed(seed);
    let max = depth.max_value();

    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let dx = (x as f64 + 0.5) / width as f64 - 0.5;
            let dy = (y as f64 + 0.5) / height as f64 - 0.5;
            let inside = dx * dx + dy * dy < 0.16;
            let base = if inside { f64::from(max) * 0.6 } else { f64::from(max) * 0.05 };
            (base as u16).saturating_add(rand.generate_range(0_u16..=4)).min(max)
        })
        .collect();

    GrayImage::new(width, height, depth, pixels).unwrap()
}

fn hash(contents: &[u8]) -> u128 {
    xxh3_128(contents)
}
