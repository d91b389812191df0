/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use mmpc::constants::MMPC_HEADER_SIZE;
use mmpc::{
    read_bitstream, rle, zigzag_order, EntropyBackend, GrayImage, MmpcDecoder, MmpcEncoder,
    MmpcErrors, MmpcHeader
};
use mmpc_core::bit_depth::BitDepth;
use mmpc_core::bytestream::ZCursor;
use mmpc_core::options::EncoderOptions;
use nanorand::{Rng, WyRand};

/// A smooth gradient with a little noise, loosely resembling a scan slice
fn synthetic_slice(width: usize, height: usize, depth: BitDepth, seed: u64) -> GrayImage {
    let mut rand = WyRand::new_seed(seed);
    let max = f64::from(depth.max_value());

    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let dx = x as f64 / width as f64 - 0.5;
            let dy = y as f64 / height as f64 - 0.5;
            let base = (1.0 - (dx * dx + dy * dy) * 2.0).max(0.0) * 0.8 * max;
            base as u16
        })
        .map(|v| v.saturating_add(rand.generate_range(0_u16..=8)).min(depth.max_value()))
        .collect();

    GrayImage::new(width, height, depth, pixels).unwrap()
}

fn rmse(a: &GrayImage, b: &GrayImage) -> f64 {
    let sum: f64 = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum();
    (sum / a.pixels().len() as f64).sqrt()
}

fn encode_with_step(image: &GrayImage, step: u16, block_size: u8) -> Vec<u8> {
    let options = EncoderOptions::default()
        .set_step(step)
        .set_block_size(block_size);
    mmpc::encode(image, &options).unwrap()
}

#[test]
fn flat_block_single_dc() {
    let image = GrayImage::from_u8(8, 8, &[128; 64]).unwrap();
    let bitstream = encode_with_step(&image, 1, 8);

    let (header, payload) = read_bitstream(&bitstream).unwrap();
    assert_eq!(header.step, 1);

    let runs = mmpc::ZlibBackend::default().decompress(payload, 192).unwrap();
    let coefficients = rle::decode_exact(&runs, 64).unwrap();

    assert_eq!(coefficients[0], 1024);
    assert!(coefficients[1..].iter().all(|x| *x == 0));

    let decoded = mmpc::decode(&bitstream).unwrap();
    assert!(decoded.pixels().iter().all(|x| *x == 128));
}

#[test]
fn padding_is_invisible() {
    let image = synthetic_slice(500, 500, BitDepth::Eight, 1);
    let bitstream = encode_with_step(&image, 4, 8);

    let decoded = mmpc::decode(&bitstream).unwrap();
    assert_eq!(decoded.dimensions(), (500, 500));
    assert_eq!(decoded.depth(), BitDepth::Eight);
}

#[test]
fn odd_sizes_and_block_sizes() {
    for (width, height, block_size) in [(1, 1, 8), (7, 3, 8), (13, 29, 5), (64, 1, 16), (9, 9, 1)] {
        let image = synthetic_slice(width, height, BitDepth::Twelve, 3);
        let bitstream = encode_with_step(&image, 2, block_size);
        let decoded = mmpc::decode(&bitstream).unwrap();

        assert_eq!(decoded.dimensions(), (width, height));
        assert!(
            rmse(&image, &decoded) <= 1.5,
            "{width}x{height} block {block_size}"
        );
    }
}

#[test]
fn error_grows_with_step() {
    let image = synthetic_slice(96, 80, BitDepth::Eight, 9);
    let mut previous = 0.0;

    for step in [1, 8, 32, 128] {
        let decoded = mmpc::decode(&encode_with_step(&image, step, 8)).unwrap();
        let error = rmse(&image, &decoded);

        assert!(
            error >= previous,
            "step {step} gave rmse {error}, smaller than {previous}"
        );
        previous = error;
    }
}

#[test]
fn error_grows_with_step_for_sixteen_bit() {
    let image = synthetic_slice(64, 48, BitDepth::Sixteen, 12);
    let mut previous = 0.0;

    for step in [17, 64, 256, 1024] {
        let decoded = mmpc::decode(&encode_with_step(&image, step, 8)).unwrap();
        let error = rmse(&image, &decoded);

        assert!(
            error >= previous,
            "step {step} gave rmse {error}, smaller than {previous}"
        );
        previous = error;
    }
}

#[test]
fn best_quality_keeps_bright_sixteen_bit_blocks() {
    let image = GrayImage::new(16, 16, BitDepth::Sixteen, vec![60000; 256]).unwrap();

    for block_size in [4, 8, 16] {
        let options = EncoderOptions::default()
            .set_quality(100)
            .set_block_size(block_size);
        let bitstream = mmpc::encode(&image, &options).unwrap();

        let header = MmpcHeader::parse(&bitstream).unwrap();
        assert_eq!(header.step, mmpc::min_step(BitDepth::Sixteen, block_size));

        let decoded = mmpc::decode(&bitstream).unwrap();
        let error = rmse(&image, &decoded);
        assert!(error < 2.0, "block {block_size} gave rmse {error}");
    }
}

#[test]
fn size_shrinks_with_quality_drop() {
    let image = synthetic_slice(128, 128, BitDepth::Twelve, 4);

    let high = mmpc::encode(&image, &EncoderOptions::default().set_quality(95)).unwrap();
    let low = mmpc::encode(&image, &EncoderOptions::default().set_quality(5)).unwrap();

    assert!(low.len() < high.len());
}

#[test]
fn header_describes_payload() {
    let image = synthetic_slice(100, 60, BitDepth::Sixteen, 5);
    let options = EncoderOptions::default().set_quality(40).set_block_size(4);
    let bitstream = mmpc::encode(&image, &options).unwrap();

    let header = MmpcHeader::parse(&bitstream).unwrap();
    assert_eq!(header.width, 100);
    assert_eq!(header.height, 60);
    assert_eq!(header.depth, BitDepth::Sixteen);
    assert_eq!(header.block_size, 4);
    assert_eq!(header.step, mmpc::default_step_policy(40));
    assert_eq!(
        header.payload_length as usize,
        bitstream.len() - MMPC_HEADER_SIZE
    );
}

#[test]
fn encoding_is_deterministic() {
    let image = synthetic_slice(70, 50, BitDepth::Ten, 6);
    let options = EncoderOptions::default().set_quality(70);

    assert_eq!(
        mmpc::encode(&image, &options).unwrap(),
        mmpc::encode(&image, &options).unwrap()
    );
}

#[test]
fn reconstruction_stays_in_range() {
    // a checkerboard at max contrast rings heavily after quantization
    let pixels: Vec<u16> = (0..32 * 32)
        .map(|i| if (i % 32 + i / 32) % 2 == 0 { 0 } else { 255 })
        .collect();
    let image = GrayImage::new(32, 32, BitDepth::Eight, pixels).unwrap();
    let decoded = mmpc::decode(&encode_with_step(&image, 200, 8)).unwrap();

    assert!(decoded.pixels().iter().all(|x| *x <= 255));
}

#[test]
fn coefficients_follow_zigzag_within_blocks() {
    // a horizontal ramp only excites the first row of frequencies
    let pixels: Vec<u16> = (0..64).map(|i| (i % 8) as u16 * 16).collect();
    let image = GrayImage::new(8, 8, BitDepth::Eight, pixels).unwrap();
    let (_, payload) = {
        let bitstream = encode_with_step(&image, 1, 8);
        let (header, payload) = read_bitstream(&bitstream).unwrap();
        (header, payload.to_vec())
    };
    let runs = mmpc::ZlibBackend::default().decompress(&payload, 192).unwrap();
    let scanned = rle::decode_exact(&runs, 64).unwrap();

    let order = zigzag_order(8);
    for (position, value) in order.iter().zip(&scanned) {
        // row major index below 8 means vertical frequency 0
        if *position >= 8 {
            assert_eq!(*value, 0, "coefficient {position} should be zero");
        }
    }
    assert_ne!(scanned[1], 0);
}

/// Stores bytes as they are, for checking the backend is pluggable
struct StoredBackend;

impl EntropyBackend for StoredBackend {
    fn name(&self) -> &'static str {
        "stored"
    }
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, MmpcErrors> {
        Ok(data.to_vec())
    }
    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, MmpcErrors> {
        if data.len() > limit {
            return Err(MmpcErrors::Decompression("too large".to_string()));
        }
        Ok(data.to_vec())
    }
}

#[test]
fn pluggable_backend() {
    let image = synthetic_slice(40, 40, BitDepth::Eight, 8);
    let options = EncoderOptions::default().set_quality(50);

    let mut stored: Vec<u8> = vec![];
    MmpcEncoder::from_image(&image, options)
        .set_backend(Box::new(StoredBackend))
        .encode(&mut stored)
        .unwrap();

    let (_, payload) = read_bitstream(&stored).unwrap();
    assert!(rle::decode_exact(payload, 40 * 40).is_ok());

    let decoded = MmpcDecoder::new(ZCursor::new(&stored))
        .set_backend(Box::new(StoredBackend))
        .decode()
        .unwrap();

    let reference = mmpc::decode(&mmpc::encode(&image, &options).unwrap()).unwrap();
    assert_eq!(decoded, reference);
}
