/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;

use mmpc_eval::summary::{collect, write_summary, SUMMARY_CSV, SUMMARY_JSON};
use mmpc_eval::EvalReport;

fn report(rmse: f64, size: usize) -> EvalReport {
    EvalReport {
        bitdepth:          12,
        rmse,
        psnr:              20.0 * (4095.0 / rmse).log10(),
        ssim:              Some(0.95),
        compressed_size:   size,
        bpp:               1.0,
        compression_ratio: 16.0
    }
}

#[test]
fn collects_logs_and_writes_summaries() {
    let dir = tempfile::tempdir().unwrap();

    fs::write(dir.path().join("slice_q60_eval.log"), report(2.0, 900).to_log()).unwrap();
    fs::write(dir.path().join("slice_q10_eval.log"), report(9.0, 300).to_log()).unwrap();
    // ignored, wrong suffix
    fs::write(dir.path().join("slice_q10_error.log"), "boom").unwrap();
    // skipped, unparsable
    fs::write(dir.path().join("broken_eval.log"), "nothing here").unwrap();

    let rows = collect(dir.path()).unwrap();
    let names: Vec<&str> = rows.iter().map(|x| x.name.as_str()).collect();
    assert_eq!(names, ["slice_q10", "slice_q60"]);
    assert_eq!(rows[0].compressed_size, 300);

    write_summary(dir.path(), &rows).unwrap();

    let csv = fs::read_to_string(dir.path().join(SUMMARY_CSV)).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("slice_q10,12,9,"));

    let json = fs::read_to_string(dir.path().join(SUMMARY_JSON)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[1]["name"], "slice_q60");
}
