/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use mmpc::{GrayImage, ZlibBackend};
use mmpc_core::options::EncoderOptions;

use crate::{hash, synthetic_slice, test_entries};

fn encode(image: &GrayImage, quality: u8) -> Vec<u8> {
    let options = EncoderOptions::new(image.width(), image.height(), image.depth())
        .set_quality(quality);
    mmpc::encode(image, &options).unwrap()
}

fn pixel_bytes(image: &GrayImage) -> Vec<u8> {
    image.pixels().iter().flat_map(|x| x.to_be_bytes()).collect()
}

#[test]
fn same_input_same_bitstream() {
    for entry in test_entries() {
        let first = hash(&encode(&entry.image(), entry.quality));
        let second = hash(&encode(&entry.image(), entry.quality));

        assert_eq!(first, second, "{} is not deterministic", entry.name);
    }
}

#[test]
fn decoding_is_deterministic() {
    let entry = &test_entries()[1];
    let bitstream = encode(&entry.image(), entry.quality);

    let first = hash(&pixel_bytes(&mmpc::decode(&bitstream).unwrap()));
    let second = hash(&pixel_bytes(&mmpc::decode(&bitstream).unwrap()));

    assert_eq!(first, second);
}

#[test]
fn different_inputs_differ() {
    let depth = test_entries()[0].depth();
    let a = synthetic_slice(32, 32, depth, 1);
    let b = synthetic_slice(32, 32, depth, 2);

    assert_ne!(hash(&encode(&a, 60)), hash(&encode(&b, 60)));
    assert_ne!(hash(&encode(&a, 10)), hash(&encode(&a, 90)));
}

#[test]
fn threads_produce_identical_bitstreams() {
    let entries = test_entries();
    let expected: Vec<u128> = entries
        .iter()
        .map(|entry| hash(&encode(&entry.image(), entry.quality)))
        .collect();

    let found: Vec<u128> = std::thread::scope(|scope| {
        let handles: Vec<_> = entries
            .iter()
            .map(|entry| scope.spawn(move || hash(&encode(&entry.image(), entry.quality))))
            .collect();
        handles.into_iter().map(|x| x.join().unwrap()).collect()
    });

    assert_eq!(expected, found);
}

#[test]
fn explicit_zlib_backend_matches_default() {
    let image = test_entries()[0].image();
    let options = EncoderOptions::new(image.width(), image.height(), image.depth());

    let default = mmpc::encode(&image, &options).unwrap();

    let mut sink: Vec<u8> = Vec::new();
    mmpc::MmpcEncoder::from_image(&image, options)
        .set_backend(Box::new(ZlibBackend::default()))
        .encode(&mut sink)
        .unwrap();

    assert_eq!(hash(&default), hash(&sink));
}
