/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;

use mmpc::GrayImage;
use mmpc_core::options::{DecoderOptions, EncoderOptions};
use mmpc_eval::summary::{collect, write_summary, SUMMARY_CSV, SUMMARY_JSON};
use mmpc_eval::{EvalReport, ImageView};
use mmpc_ppm::{PgmDecoder, PgmEncoder};

use crate::{test_entries, TestEntry};

fn view(image: &GrayImage) -> ImageView {
    ImageView::new(image.pixels(), image.width(), image.height(), image.depth()).unwrap()
}

fn encoder_options(entry: &TestEntry) -> EncoderOptions {
    EncoderOptions::new(entry.width, entry.height, entry.depth())
        .set_quality(entry.quality)
        .set_block_size(entry.block_size.unwrap_or(8))
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_pgm_codec_eval_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let mut error = false;

    for entry in test_entries() {
        let image = entry.image();

        // PGM on disk, as a scanner export would produce
        let pgm_path = dir.path().join(format!("{}.pgm", entry.name));
        let mut pgm: Vec<u8> = Vec::new();
        PgmEncoder::new(image.pixels(), encoder_options(&entry))
            .encode(&mut pgm)
            .unwrap();
        fs::write(&pgm_path, &pgm).unwrap();

        let data = fs::read(&pgm_path).unwrap();
        let mut pgm_decoder = PgmDecoder::new_with_options(&data, DecoderOptions::new_cmd());
        let pixels = pgm_decoder.decode().unwrap();
        assert_eq!(pgm_decoder.bit_depth(), Some(entry.depth()));
        let source = GrayImage::new(entry.width, entry.height, entry.depth(), pixels).unwrap();
        assert_eq!(source, image);

        let bitstream = mmpc::encode(&source, &encoder_options(&entry)).unwrap();
        let (header, payload) = mmpc::read_bitstream(&bitstream).unwrap();
        assert_eq!(header.payload_length as usize, payload.len());
        assert_eq!(usize::from(header.width), entry.width);
        assert_eq!(usize::from(header.height), entry.height);

        let reconstructed = mmpc::decode(&bitstream).unwrap();
        assert_eq!(reconstructed.dimensions(), source.dimensions());
        assert_eq!(reconstructed.depth(), source.depth());

        let report =
            EvalReport::evaluate(&view(&source), &view(&reconstructed), bitstream.len()).unwrap();

        if report.rmse > entry.max_rmse {
            error = true;
            eprintln!(
                "{}: RMSE {} above {}\nConfig:{:#?}",
                entry.name, report.rmse, entry.max_rmse, entry
            );
        }
        assert_eq!(report.bitdepth, entry.bitdepth);
        assert_eq!(report.compressed_size, bitstream.len());

        fs::write(
            dir.path().join(format!("{}_q{}_eval.log", entry.name, entry.quality)),
            report.to_log()
        )
        .unwrap();
    }

    let rows = collect(dir.path()).unwrap();
    assert_eq!(rows.len(), test_entries().len());
    write_summary(dir.path(), &rows).unwrap();

    let csv = fs::read_to_string(dir.path().join(SUMMARY_CSV)).unwrap();
    assert_eq!(csv.lines().count(), rows.len() + 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join(SUMMARY_JSON)).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), rows.len());

    if error {
        panic!("Some slices reconstructed worse than allowed");
    }
}

#[test]
fn decoded_slice_survives_pgm_export() {
    let entry = &test_entries()[0];
    let bitstream = mmpc::encode(&entry.image(), &encoder_options(entry)).unwrap();
    let reconstructed = mmpc::decode(&bitstream).unwrap();

    let options = EncoderOptions::new(
        reconstructed.width(),
        reconstructed.height(),
        reconstructed.depth()
    );
    let mut pgm: Vec<u8> = Vec::new();
    PgmEncoder::new(reconstructed.pixels(), options)
        .encode(&mut pgm)
        .unwrap();

    let pixels = PgmDecoder::new(&pgm).decode().unwrap();
    assert_eq!(pixels, reconstructed.pixels());
}
