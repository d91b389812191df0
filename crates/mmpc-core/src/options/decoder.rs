/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Limits and strictness for decoders

/// Decoder options
///
/// Shared by the bitstream decoder and the raster readers.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Widest image a decoder accepts
    ///
    /// - Default value: 16384
    max_width:   usize,
    /// Tallest image a decoder accepts
    ///
    /// - Default value: 16384
    max_height:  usize,
    /// Reject inputs with recoverable problems
    ///
    /// Trailing bytes after the payload are the usual case, they are
    /// logged as warnings unless this is set.
    ///
    /// - Default value: false
    strict_mode: bool
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:   1 << 14,
            max_height:  1 << 14,
            strict_mode: false
        }
    }
}

impl DecoderOptions {
    /// Options with no practical dimension limits
    ///
    /// The bitstream header stores dimensions as 16 bit integers
    /// so this still bounds memory use.
    pub fn new_cmd() -> DecoderOptions {
        DecoderOptions::default()
            .set_max_width(usize::from(u16::MAX))
            .set_max_height(usize::from(u16::MAX))
    }
    pub const fn max_width(&self) -> usize {
        self.max_width
    }
    pub const fn max_height(&self) -> usize {
        self.max_height
    }
    pub const fn strict_mode(&self) -> bool {
        self.strict_mode
    }
    /// Refuse images wider than `width`
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    /// Refuse images taller than `height`
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }
}
