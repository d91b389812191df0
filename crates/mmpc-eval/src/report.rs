/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::errors::EvalErrors;
use crate::metrics::{bits_per_pixel, compression_ratio, psnr, rmse, ssim, ImageView};

/// Results of evaluating one reconstruction against its reference
///
/// A report is persisted as a short line oriented log
///
/// ```text
/// BitDepth 8  RMSE 1.2345  PSNR 46.30 dB
/// SSIM: 0.9876
/// Compressed size: 12345 bytes
/// bpp: 0.3767
/// Compression ratio: 21.24
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub bitdepth:          u8,
    pub rmse:              f64,
    pub psnr:              f64,
    pub ssim:              Option<f64>,
    pub compressed_size:   usize,
    pub bpp:               f64,
    pub compression_ratio: f64
}

impl EvalReport {
    /// Evaluate `reconstructed` against `reference`, given the size of the bitstream
    pub fn evaluate(
        reference: &ImageView, reconstructed: &ImageView, compressed_size: usize
    ) -> Result<EvalReport, EvalErrors> {
        let error = rmse(reference, reconstructed)?;
        let similarity = ssim(reference, reconstructed)?;
        let depth = reference.depth();

        Ok(EvalReport {
            bitdepth: depth.bits(),
            rmse: error,
            psnr: psnr(error, depth),
            ssim: Some(similarity),
            compressed_size,
            bpp: bits_per_pixel(compressed_size, reference.len()),
            compression_ratio: compression_ratio(reference.len(), depth, compressed_size)
        })
    }

    /// Render the report as evaluation log lines
    pub fn to_log(&self) -> String {
        let mut log = String::new();

        // writing to a String can't fail
        let _ = writeln!(
            log,
            "BitDepth {}  RMSE {:.4}  PSNR {:.2} dB",
            self.bitdepth, self.rmse, self.psnr
        );
        if let Some(ssim) = self.ssim {
            let _ = writeln!(log, "SSIM: {ssim:.4}");
        }
        let _ = writeln!(log, "Compressed size: {} bytes", self.compressed_size);
        let _ = writeln!(log, "bpp: {:.4}", self.bpp);
        let _ = writeln!(log, "Compression ratio: {:.2}", self.compression_ratio);

        log
    }

    /// Parse evaluation log lines back into a report
    ///
    /// Unrelated lines are skipped, a missing `SSIM:` line leaves `ssim` empty.
    ///
    /// # Errors
    /// If the distortion line, compressed size, bpp or ratio is missing or malformed
    pub fn from_log(text: &str) -> Result<EvalReport, EvalErrors> {
        let mut distortion = None;
        let mut ssim = None;
        let mut compressed_size = None;
        let mut bpp = None;
        let mut ratio = None;

        for line in text.lines().map(str::trim) {
            if line.starts_with("BitDepth") && line.contains("RMSE") {
                distortion = Some(parse_distortion_line(line)?);
            } else if let Some(rest) = line.strip_prefix("SSIM:") {
                ssim = Some(parse_number(rest, "SSIM")?);
            } else if let Some(rest) = line.strip_prefix("Compressed size:") {
                let value = rest.trim().trim_end_matches("bytes").trim();
                compressed_size = Some(value.parse::<usize>().map_err(|_| {
                    EvalErrors::MalformedLog(format!("bad compressed size `{value}`"))
                })?);
            } else if let Some(rest) = line.strip_prefix("bpp:") {
                bpp = Some(parse_number(rest, "bpp")?);
            } else if let Some(rest) = line.strip_prefix("Compression ratio:") {
                ratio = Some(parse_number(rest, "compression ratio")?);
            }
        }
        let missing = |field: &str| EvalErrors::MalformedLog(format!("missing {field}"));

        let (bitdepth, rmse, psnr) = distortion.ok_or_else(|| missing("BitDepth/RMSE/PSNR line"))?;

        Ok(EvalReport {
            bitdepth,
            rmse,
            psnr,
            ssim,
            compressed_size: compressed_size.ok_or_else(|| missing("compressed size"))?,
            bpp: bpp.ok_or_else(|| missing("bpp"))?,
            compression_ratio: ratio.ok_or_else(|| missing("compression ratio"))?
        })
    }
}

fn parse_number(text: &str, field: &str) -> Result<f64, EvalErrors> {
    let text = text.trim();
    text.parse::<f64>()
        .map_err(|_| EvalErrors::MalformedLog(format!("bad {field} value `{text}`")))
}

/// `BitDepth 8  RMSE 1.2345  PSNR 46.30 dB`
fn parse_distortion_line(line: &str) -> Result<(u8, f64, f64), EvalErrors> {
    let mut tokens = line.split_whitespace();
    let mut bitdepth = None;
    let mut rmse = None;
    let mut psnr = None;

    while let Some(token) = tokens.next() {
        let value = tokens.clone().next();

        match (token, value) {
            ("BitDepth", Some(v)) => {
                bitdepth = Some(v.parse::<u8>().map_err(|_| {
                    EvalErrors::MalformedLog(format!("bad bit depth `{v}`"))
                })?);
            }
            ("RMSE", Some(v)) => rmse = Some(parse_number(v, "RMSE")?),
            ("PSNR", Some(v)) => psnr = Some(parse_number(v, "PSNR")?),
            _ => continue
        }
        tokens.next();
    }
    match (bitdepth, rmse, psnr) {
        (Some(b), Some(r), Some(p)) => Ok((b, r, p)),
        _ => Err(EvalErrors::MalformedLog(format!(
            "incomplete distortion line `{line}`"
        )))
    }
}
