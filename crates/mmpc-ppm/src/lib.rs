/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Binary PGM (`P5`) decoder and encoder
//!
//! Only the single channel binary flavour of the netpbm family is supported,
//! which is what scanner tooling commonly exports slices as.
//!
//! - A maxval below 256 stores one byte per sample
//! - A larger maxval stores two bytes per sample, big endian
//!
//! The bit depth reported is the smallest one able to hold maxval,
//! e.g a maxval of 4095 decodes as a twelve bit image.
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use mmpc_core;

mod decoder;
mod encoder;
mod errors;
