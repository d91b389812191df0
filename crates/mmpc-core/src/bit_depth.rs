/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image bit depth, information and manipulations

/// The sample depth of a single channel image.
///
/// Every supported depth is stored in a [`u16`], the depth only
/// decides the maximum value a sample may take.
///
/// Scanner slices are commonly 8 bit after windowing, or
/// 12/16 bit straight from the modality.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum BitDepth {
    /// Eight bit depth.
    ///
    /// Samples use the whole range from 0-255.
    #[default]
    Eight,
    /// Ten bit depth, samples range from 0-1023
    Ten,
    /// Twelve bit depth, samples range from 0-4095
    ///
    /// The usual stored depth of CT slices.
    Twelve,
    /// Sixteen bit depth
    ///
    /// Samples use the whole range i.e 0-65535
    Sixteen
}

impl BitDepth {
    /// Get the max value supported by the bit depth
    ///
    /// Reconstructed samples are clamped to this value.
    #[rustfmt::skip]
    #[allow(clippy::zero_prefixed_literal)]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Eight => (1 << 08) - 1,
            Self::Ten => (1 << 10) - 1,
            Self::Twelve => (1 << 12) - 1,
            Self::Sixteen => u16::MAX
        }
    }

    /// Number of bits per sample, as stored in the bitstream header
    ///
    /// ```
    /// use mmpc_core::bit_depth::BitDepth;
    /// assert_eq!(BitDepth::Twelve.bits(), 12);
    /// ```
    pub const fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Ten => 10,
            Self::Twelve => 12,
            Self::Sixteen => 16
        }
    }

    /// Inverse of [`bits`](Self::bits)
    ///
    /// Returns `None` for depths the codec cannot represent
    pub const fn from_bits(bits: u8) -> Option<BitDepth> {
        match bits {
            8 => Some(Self::Eight),
            10 => Some(Self::Ten),
            12 => Some(Self::Twelve),
            16 => Some(Self::Sixteen),
            _ => None
        }
    }

    /// Return the smallest depth whose range covers `max_value`
    ///
    /// Used by raster readers whose headers carry a maximum sample
    /// value instead of a bit count, e.g. PGM's `maxval`
    ///
    /// ```
    /// use mmpc_core::bit_depth::BitDepth;
    /// assert_eq!(BitDepth::from_max_value(255), BitDepth::Eight);
    /// assert_eq!(BitDepth::from_max_value(4000), BitDepth::Twelve);
    /// ```
    pub const fn from_max_value(max_value: u16) -> BitDepth {
        if max_value <= Self::Eight.max_value() {
            Self::Eight
        } else if max_value <= Self::Ten.max_value() {
            Self::Ten
        } else if max_value <= Self::Twelve.max_value() {
            Self::Twelve
        } else {
            Self::Sixteen
        }
    }

    /// Get the number of bytes needed to store one sample of this depth
    ///
    /// ```
    /// use mmpc_core::bit_depth::BitDepth;
    /// assert_eq!(BitDepth::Eight.size_of(), 1);
    /// assert_eq!(BitDepth::Twelve.size_of(), 2);
    /// ```
    pub const fn size_of(self) -> usize {
        match self {
            Self::Eight => 1,
            Self::Ten | Self::Twelve | Self::Sixteen => 2
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bit_depth::BitDepth;

    #[test]
    fn bits_round_trip() {
        for depth in [
            BitDepth::Eight,
            BitDepth::Ten,
            BitDepth::Twelve,
            BitDepth::Sixteen
        ] {
            assert_eq!(BitDepth::from_bits(depth.bits()), Some(depth));
        }
        assert_eq!(BitDepth::from_bits(7), None);
        assert_eq!(BitDepth::from_bits(0), None);
    }

    #[test]
    fn max_value_picks_smallest_depth() {
        assert_eq!(BitDepth::from_max_value(1), BitDepth::Eight);
        assert_eq!(BitDepth::from_max_value(256), BitDepth::Ten);
        assert_eq!(BitDepth::from_max_value(4095), BitDepth::Twelve);
        assert_eq!(BitDepth::from_max_value(4096), BitDepth::Sixteen);
    }
}
