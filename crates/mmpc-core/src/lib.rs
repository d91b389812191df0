/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by all mmpc libraries
//!
//! This crate provides a set of core routines shared
//! by the codec, the raster readers/writers and the evaluation
//! tooling under the `mmpc` umbrella
//!
//! It currently contains
//!
//! - A big endian bytestream reader and writer
//! - Bit depth information shared by single channel images
//! - Encoder and decoder options
//! - A logging facade that compiles away when the `log` feature is off
//!
//! This library is `#[no_std]` with `alloc` needed for `Vec`.
//!
//! # Features
//!  - `std`: Enables `std::io` conversions and `std::error::Error` impls.
//!  - `log`: Routes the logging macros to the [`log`](https://docs.rs/log) crate.
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![macro_use]
extern crate alloc;

pub mod bit_depth;
pub mod bytestream;
#[cfg(not(feature = "log"))]
pub mod log;
pub mod options;

#[cfg(feature = "log")]
pub use log;
