/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use mmpc::GrayImage;
use mmpc_core::bit_depth::BitDepth;
use mmpc_core::options::{DecoderOptions, EncoderOptions};
use mmpc_ppm::{PgmDecoder, PgmEncoder};
use tempfile::NamedTempFile;

use crate::errors::CliErrors;

/// Read a binary PGM file into an image
pub fn read_pgm(path: &Path, options: DecoderOptions) -> Result<GrayImage, CliErrors> {
    info!("Reading {:?}", path);

    let data = fs::read(path)?;
    let mut decoder = PgmDecoder::new_with_options(&data, options);
    let pixels = decoder.decode()?;

    let (width, height) = decoder
        .dimensions()
        .ok_or_else(|| CliErrors::Generic("PGM headers not decoded".to_string()))?;
    let depth = decoder.bit_depth().unwrap_or_default();

    Ok(GrayImage::new(width, height, depth, pixels)?)
}

/// Write an image as a binary PGM file, atomically
pub fn write_pgm(path: &Path, image: &GrayImage) -> Result<(), CliErrors> {
    let options = EncoderOptions::new(image.width(), image.height(), image.depth());
    write_gray_pgm(path, image.pixels(), options)
}

pub fn write_gray_pgm(path: &Path, pixels: &[u16], options: EncoderOptions) -> Result<(), CliErrors> {
    let mut sink: Vec<u8> = Vec::new();
    PgmEncoder::new(pixels, options).encode(&mut sink)?;
    write_atomic(path, &sink)
}

/// Write an eight bit map, e.g an error map
pub fn write_u8_pgm(
    path: &Path, pixels: &[u8], width: usize, height: usize
) -> Result<(), CliErrors> {
    let widened: Vec<u16> = pixels.iter().map(|x| u16::from(*x)).collect();
    write_gray_pgm(path, &widened, EncoderOptions::new(width, height, BitDepth::Eight))
}

/// Write `data` to `path` so that either the whole file or nothing appears
///
/// Data goes to a temporary file in the destination directory which is
/// renamed over `path` once fully written.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CliErrors> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new(".")
    };
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;

    file.persist(path).map_err(|e| CliErrors::Io(e.error))?;

    debug!("Wrote {} bytes to {:?}", data.len(), path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use mmpc::GrayImage;
    use mmpc_core::bit_depth::BitDepth;
    use mmpc_core::options::DecoderOptions;

    use crate::file_io::{read_pgm, write_atomic, write_pgm};

    #[test]
    fn atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bin");

        assert!(write_atomic(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn pgm_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slice.pgm");
        let image = GrayImage::new(3, 2, BitDepth::Twelve, vec![0, 1, 4095, 7, 8, 9]).unwrap();

        write_pgm(&path, &image).unwrap();
        let read = read_pgm(&path, DecoderOptions::new_cmd()).unwrap();

        assert_eq!(read, image);
    }
}
