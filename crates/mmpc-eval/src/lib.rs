/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Rate and distortion evaluation for reconstructed slices
//!
//! - [`metrics`]: RMSE, PSNR, SSIM, bits per pixel and compression ratio
//! - [`EvalReport`]: one evaluation run, written to and read back from a line oriented log
//! - [`summary`]: aggregation of evaluation logs into CSV and JSON
pub use errors::EvalErrors;
pub use metrics::ImageView;
pub use report::EvalReport;

mod errors;
pub mod metrics;
mod report;
pub mod summary;
