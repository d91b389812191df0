/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Run length coding of quantized coefficients
//!
//! The stream is a sequence of self delimiting tokens
//!
//! | tag    | operands            | meaning                      |
//! |--------|---------------------|------------------------------|
//! | `0x00` | `n: u8`             | `n` zeros                    |
//! | `0x01` | `v: i16`            | the literal `v`              |
//! | `0x02` | `n: u8`, `v: i16`   | `n` zeros followed by `v`    |
//!
//! Counts are in `1..=255`, values are big endian. Longer runs of zeros
//! are split into several `0x00 0xFF` tokens.
use crate::constants::{RLE_LITERAL, RLE_MAX_RUN, RLE_RUN_LITERAL, RLE_ZERO_RUN};
use crate::errors::MmpcErrors;

/// Encode coefficients into a run length stream
pub fn encode(values: &[i16]) -> Vec<u8> {
    let mut output = Vec::with_capacity(values.len() / 2);
    let mut run = 0_usize;

    for value in values {
        if *value == 0 {
            run += 1;
            continue;
        }
        while run > RLE_MAX_RUN {
            output.extend_from_slice(&[RLE_ZERO_RUN, RLE_MAX_RUN as u8]);
            run -= RLE_MAX_RUN;
        }
        let [hi, lo] = value.to_be_bytes();

        if run == 0 {
            output.extend_from_slice(&[RLE_LITERAL, hi, lo]);
        } else {
            output.extend_from_slice(&[RLE_RUN_LITERAL, run as u8, hi, lo]);
        }
        run = 0;
    }
    while run > 0 {
        let chunk = run.min(RLE_MAX_RUN);
        output.extend_from_slice(&[RLE_ZERO_RUN, chunk as u8]);
        run -= chunk;
    }
    output
}

/// Decode a run length stream
///
/// # Errors
/// An unknown tag, a zero count or a truncated token
pub fn decode(data: &[u8]) -> Result<Vec<i16>, MmpcErrors> {
    let mut output = Vec::with_capacity(data.len());
    decode_into(data, &mut output, usize::MAX)?;
    Ok(output)
}

/// Decode a run length stream that must hold exactly `expected` values
///
/// Fails as soon as the stream would produce more than `expected` values.
/// Memory grows with what the tokens actually produce, a header
/// claiming huge dimensions over a short stream reserves little.
///
/// # Errors
/// - Any error of [`decode`]
/// - [`MmpcErrors::SizeMismatch`] if the value count differs from `expected`
pub fn decode_exact(data: &[u8], expected: usize) -> Result<Vec<i16>, MmpcErrors> {
    // a two byte zero run token yields the most values per byte
    let producible = data.len().saturating_mul(RLE_MAX_RUN.div_ceil(2));
    let mut output = Vec::with_capacity(expected.min(producible));
    decode_into(data, &mut output, expected)?;

    if output.len() != expected {
        return Err(MmpcErrors::SizeMismatch(expected, output.len()));
    }
    Ok(output)
}

fn decode_into(data: &[u8], output: &mut Vec<i16>, limit: usize) -> Result<(), MmpcErrors> {
    let mut position = 0;

    while position < data.len() {
        let tag = data[position];
        position += 1;

        let (zeros, literal) = match tag {
            RLE_ZERO_RUN => {
                let count = read_count(data, &mut position)?;
                (count, None)
            }
            RLE_LITERAL => {
                let value = read_value(data, &mut position)?;
                (0, Some(value))
            }
            RLE_RUN_LITERAL => {
                let count = read_count(data, &mut position)?;
                let value = read_value(data, &mut position)?;
                (count, Some(value))
            }
            _ => return Err(MmpcErrors::CorruptRunLength("unknown token tag"))
        };
        let produced = zeros + usize::from(literal.is_some());

        if output.len() + produced > limit {
            return Err(MmpcErrors::SizeMismatch(limit, output.len() + produced));
        }
        output.resize(output.len() + zeros, 0);

        if let Some(value) = literal {
            output.push(value);
        }
    }
    Ok(())
}

fn read_count(data: &[u8], position: &mut usize) -> Result<usize, MmpcErrors> {
    let count = *data
        .get(*position)
        .ok_or(MmpcErrors::CorruptRunLength("truncated run count"))?;

    if count == 0 {
        return Err(MmpcErrors::CorruptRunLength("zero run count"));
    }
    *position += 1;
    Ok(usize::from(count))
}

fn read_value(data: &[u8], position: &mut usize) -> Result<i16, MmpcErrors> {
    match data.get(*position..*position + 2) {
        Some(&[hi, lo]) => {
            *position += 2;
            Ok(i16::from_be_bytes([hi, lo]))
        }
        _ => Err(MmpcErrors::CorruptRunLength("truncated literal"))
    }
}
