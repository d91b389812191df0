/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// `MMPC` in ASCII, first four bytes of every bitstream
pub const MMPC_MAGIC: [u8; 4] = *b"MMPC";
/// The only bitstream revision this crate reads and writes
pub const MMPC_VERSION: u8 = 1;
/// magic(4) + version(1) + width(2) + height(2) + depth(1) + block(1) + step(2) + payload length(4)
pub const MMPC_HEADER_SIZE: usize = 17;

pub const DEFAULT_BLOCK_SIZE: u8 = 8;
pub const DEFAULT_ZLIB_LEVEL: u32 = 6;

/// `n: u8` zeros
pub const RLE_ZERO_RUN: u8 = 0x00;
/// one `i16` literal
pub const RLE_LITERAL: u8 = 0x01;
/// `n: u8` zeros then one `i16` literal
pub const RLE_RUN_LITERAL: u8 = 0x02;
pub const RLE_MAX_RUN: usize = 255;
/// Largest token per coefficient, a lone literal
pub const RLE_MAX_BYTES_PER_COEFFICIENT: usize = 3;
