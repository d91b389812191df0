/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Byte level reading and writing for the bitstream and rasters.
//!
//! Every multi-byte field of the mmpc bitstream is big endian,
//! so that is the only byte order offered here.
pub use reader::{ZByteIoError, ZCursor, ZReader};
pub use traits::*;
pub use writer::ZWriter;

mod reader;
mod traits;
mod writer;
