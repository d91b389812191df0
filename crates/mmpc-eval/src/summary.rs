/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Aggregation of evaluation logs
//!
//! A results directory holds one `<name>_eval.log` per evaluation run,
//! [`collect`] gathers them and [`write_summary`] emits `summary.csv`
//! and `summary.json` next to them.
use std::fs;
use std::path::Path;

use mmpc_core::log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::EvalErrors;
use crate::EvalReport;

/// Suffix identifying evaluation logs
pub const EVAL_LOG_SUFFIX: &str = "_eval.log";
pub const SUMMARY_CSV: &str = "summary.csv";
pub const SUMMARY_JSON: &str = "summary.json";

const CSV_HEADER: &str = "name,bitdepth,rmse,psnr,compressed_size,bpp,compression_ratio,ssim";

/// One row of the summary, an evaluation report tagged with its run name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name:              String,
    pub bitdepth:          u8,
    pub rmse:              f64,
    pub psnr:              f64,
    pub compressed_size:   usize,
    pub bpp:               f64,
    pub compression_ratio: f64,
    pub ssim:              Option<f64>
}

impl SummaryRow {
    pub fn new(name: impl Into<String>, report: EvalReport) -> SummaryRow {
        SummaryRow {
            name:              name.into(),
            bitdepth:          report.bitdepth,
            rmse:              report.rmse,
            psnr:              report.psnr,
            compressed_size:   report.compressed_size,
            bpp:               report.bpp,
            compression_ratio: report.compression_ratio,
            ssim:              report.ssim
        }
    }
}

/// Parse every `*_eval.log` in `directory`, sorted by run name
///
/// Logs that fail to parse are skipped with a warning
pub fn collect(directory: &Path) -> Result<Vec<SummaryRow>, EvalErrors> {
    let mut rows = Vec::new();

    for entry in fs::read_dir(directory)? {
        let path = entry?.path();

        let file_name = match path.file_name().and_then(|x| x.to_str()) {
            Some(name) => name,
            None => continue
        };
        let name = match file_name.strip_suffix(EVAL_LOG_SUFFIX) {
            Some(name) => name.to_string(),
            None => continue
        };
        let text = fs::read_to_string(&path)?;

        match EvalReport::from_log(&text) {
            Ok(report) => rows.push(SummaryRow::new(name, report)),
            Err(err) => warn!("Skipping {:?}: {}", path, err)
        }
    }
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    info!("Collected {} evaluation logs", rows.len());

    Ok(rows)
}

/// Render rows as CSV, columns in [`SummaryRow`] order with `ssim` last
pub fn to_csv(rows: &[SummaryRow]) -> String {
    let mut out = format!("{CSV_HEADER}\n");

    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            csv_field(&row.name),
            row.bitdepth,
            row.rmse,
            row.psnr,
            row.compressed_size,
            row.bpp,
            row.compression_ratio,
            row.ssim.map(|v| v.to_string()).unwrap_or_default()
        ));
    }
    out
}

/// Quote a field if it holds a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render rows as pretty printed JSON
///
/// Infinite PSNR values become `null`
pub fn to_json(rows: &[SummaryRow]) -> Result<String, EvalErrors> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Write `summary.csv` and `summary.json` into `directory`
pub fn write_summary(directory: &Path, rows: &[SummaryRow]) -> Result<(), EvalErrors> {
    fs::write(directory.join(SUMMARY_CSV), to_csv(rows))?;
    fs::write(directory.join(SUMMARY_JSON), to_json(rows)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::summary::{csv_field, to_csv, to_json, SummaryRow};

    fn row(name: &str) -> SummaryRow {
        SummaryRow {
            name:              name.to_string(),
            bitdepth:          8,
            rmse:              2.5,
            psnr:              40.17,
            compressed_size:   1234,
            bpp:               0.5,
            compression_ratio: 16.0,
            ssim:              None
        }
    }

    #[test]
    fn csv_rows() {
        let csv = to_csv(&[row("I0_q30")]);
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("name,bitdepth,rmse,psnr,compressed_size,bpp,compression_ratio,ssim")
        );
        assert_eq!(lines.next(), Some("I0_q30,8,2.5,40.17,1234,0.5,16,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn json_has_every_field() {
        let mut infinite = row("exact");
        infinite.psnr = f64::INFINITY;

        let json = to_json(&[row("I0_q30"), infinite]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["name"], "I0_q30");
        assert_eq!(value[0]["compressed_size"], 1234);
        assert!(value[1]["psnr"].is_null());
    }
}
