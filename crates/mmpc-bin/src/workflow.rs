/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Single file commands

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{debug, info, trace};
use mmpc::{GrayImage, MmpcEncoder};
use mmpc_core::options::{DecoderOptions, EncoderOptions};
use mmpc_eval::metrics::error_map;
use mmpc_eval::summary::{collect, to_csv, to_json, SUMMARY_CSV, SUMMARY_JSON};
use mmpc_eval::{EvalReport, ImageView};

use crate::batch::run_batch;
use crate::errors::CliErrors;
use crate::file_io::{read_pgm, write_atomic, write_pgm, write_u8_pgm};

const RECONSTRUCTION_SUFFIX: &str = "_rec.pgm";

fn path_arg(options: &ArgMatches, name: &str) -> Result<PathBuf, CliErrors> {
    options
        .get_one::<String>(name)
        .map(PathBuf::from)
        .ok_or_else(|| CliErrors::Generic(format!("Missing argument `{name}`")))
}

/// Run the subcommand the user asked for
pub fn create_and_exec_workflow_from_cmd(options: &ArgMatches) -> Result<(), CliErrors> {
    match options.subcommand() {
        Some(("encode", args)) => run_encode(args),
        Some(("decode", args)) => run_decode(args),
        Some(("eval", args)) => run_eval(args),
        Some(("batch", args)) => run_batch(args),
        Some(("summary", args)) => run_summary(args),
        Some((name, _)) => Err(CliErrors::Generic(format!("Unknown command {name}"))),
        None => Err(CliErrors::Generic("No command given".to_string()))
    }
}

/// Map encode flags onto encoder options for `image`
pub fn encoder_options(
    image: &GrayImage, quality: u8, step: Option<u16>, block_size: u8
) -> EncoderOptions {
    let mut options = EncoderOptions::new(image.width(), image.height(), image.depth())
        .set_quality(quality)
        .set_block_size(block_size);

    if let Some(step) = step {
        options = options.set_step(step);
    }
    options
}

/// Encode an image into a bitstream held in memory
pub fn encode_image(image: &GrayImage, options: EncoderOptions) -> Result<Vec<u8>, CliErrors> {
    let mut encoder = MmpcEncoder::from_image(image, options);
    let mut sink: Vec<u8> = Vec::new();

    let written = encoder.encode(&mut sink)?;
    debug!(
        "Encoded {}x{} slice with step {} into {} bytes",
        image.width(),
        image.height(),
        encoder.step(),
        written
    );
    Ok(sink)
}

fn run_encode(args: &ArgMatches) -> Result<(), CliErrors> {
    let input = path_arg(args, "in")?;
    let output = path_arg(args, "out")?;

    let quality = args.get_one::<u8>("quality").copied().unwrap_or(30);
    let step = args.get_one::<u16>("step").copied();
    let block_size = args.get_one::<u8>("block-size").copied().unwrap_or(8);

    let image = read_pgm(&input, DecoderOptions::new_cmd())?;
    let options = encoder_options(&image, quality, step, block_size);

    let bitstream = encode_image(&image, options)?;
    write_atomic(&output, &bitstream)?;

    info!("Wrote {} bytes to {:?}", bitstream.len(), output);
    Ok(())
}

fn run_decode(args: &ArgMatches) -> Result<(), CliErrors> {
    let input = path_arg(args, "in")?;
    let output = path_arg(args, "out")?;
    let strict = args.get_flag("strict");

    let data = fs::read(&input)?;
    let options = DecoderOptions::new_cmd().set_strict_mode(strict);
    let image = mmpc::decode_with_options(&data, options)?;

    write_pgm(&output, &image)?;

    info!(
        "Decoded {:?} into a {}x{} slice",
        input,
        image.width(),
        image.height()
    );
    Ok(())
}

/// Default bitstream for a reconstruction, `x_rec.pgm` -> `x.mmpc`
pub fn default_bitstream_path(reconstructed: &Path) -> PathBuf {
    let name = reconstructed
        .file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.strip_suffix(RECONSTRUCTION_SUFFIX) {
        Some(stem) => reconstructed.with_file_name(format!("{stem}.mmpc")),
        None => reconstructed.with_extension("mmpc")
    }
}

/// Default evaluation log for a reconstruction, `x_rec.pgm` -> `x_eval.log`
pub fn default_log_path(reconstructed: &Path) -> PathBuf {
    let stem = reconstructed
        .file_stem()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = stem.strip_suffix("_rec").unwrap_or(&stem);

    let mut name = OsString::from(stem);
    name.push(mmpc_eval::summary::EVAL_LOG_SUFFIX);
    reconstructed.with_file_name(name)
}

/// Compare a reconstruction against its reference
pub fn evaluate_images(
    reference: &GrayImage, reconstructed: &GrayImage, compressed_size: usize
) -> Result<EvalReport, CliErrors> {
    let (ref_view, rec_view) = views(reference, reconstructed)?;
    Ok(EvalReport::evaluate(&ref_view, &rec_view, compressed_size)?)
}

fn views<'a>(
    reference: &'a GrayImage, reconstructed: &'a GrayImage
) -> Result<(ImageView<'a>, ImageView<'a>), CliErrors> {
    let ref_view = ImageView::new(
        reference.pixels(),
        reference.width(),
        reference.height(),
        reference.depth()
    )?;
    let rec_view = ImageView::new(
        reconstructed.pixels(),
        reconstructed.width(),
        reconstructed.height(),
        reference.depth()
    )?;
    Ok((ref_view, rec_view))
}

fn run_eval(args: &ArgMatches) -> Result<(), CliErrors> {
    let reconstructed_path = path_arg(args, "reconstructed")?;
    let reference_path = path_arg(args, "reference")?;

    let bitstream = args
        .get_one::<String>("bitstream")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_bitstream_path(&reconstructed_path));
    let log_path = args
        .get_one::<String>("log")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_log_path(&reconstructed_path));

    let reconstructed = read_pgm(&reconstructed_path, DecoderOptions::new_cmd())?;
    let reference = read_pgm(&reference_path, DecoderOptions::new_cmd())?;

    let compressed_size = fs::metadata(&bitstream)
        .map_err(|e| CliErrors::Generic(format!("Cannot stat bitstream {bitstream:?}: {e}")))?
        .len();
    let compressed_size = usize::try_from(compressed_size)
        .map_err(|_| CliErrors::Generic("Bitstream too large".to_string()))?;

    let report = evaluate_images(&reference, &reconstructed, compressed_size)?;
    let log = report.to_log();

    write_atomic(&log_path, log.as_bytes())?;
    trace!("Evaluation log written to {:?}", log_path);

    if let Some(map_path) = args.get_one::<String>("error-map") {
        let (ref_view, rec_view) = views(&reference, &reconstructed)?;
        let map = error_map(&ref_view, &rec_view)?;
        write_u8_pgm(
            Path::new(map_path),
            &map,
            reference.width(),
            reference.height()
        )?;
    }

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{log}");
    }
    Ok(())
}

fn run_summary(args: &ArgMatches) -> Result<(), CliErrors> {
    let directory = path_arg(args, "results-dir")?;

    let rows = collect(&directory)?;
    if rows.is_empty() {
        return Err(CliErrors::Generic(format!(
            "No evaluation logs found in {directory:?}"
        )));
    }
    write_atomic(&directory.join(SUMMARY_CSV), to_csv(&rows).as_bytes())?;
    write_atomic(&directory.join(SUMMARY_JSON), to_json(&rows)?.as_bytes())?;

    info!(
        "Summarized {} runs into {} and {}",
        rows.len(),
        SUMMARY_CSV,
        SUMMARY_JSON
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::workflow::{default_bitstream_path, default_log_path};

    #[test]
    fn reconstruction_names_map_to_bitstreams() {
        assert_eq!(
            default_bitstream_path(Path::new("results/ct_q30_rec.pgm")),
            PathBuf::from("results/ct_q30.mmpc")
        );
        assert_eq!(
            default_bitstream_path(Path::new("other.pgm")),
            PathBuf::from("other.mmpc")
        );
    }

    #[test]
    fn reconstruction_names_map_to_logs() {
        assert_eq!(
            default_log_path(Path::new("results/ct_q30_rec.pgm")),
            PathBuf::from("results/ct_q30_eval.log")
        );
        assert_eq!(
            default_log_path(Path::new("other.pgm")),
            PathBuf::from("other_eval.log")
        );
    }
}
