/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};

/// Errors possible during evaluation
pub enum EvalErrors {
    /// Reference and reconstruction differ in size
    ///
    /// # Arguments
    /// - 1st argument is the `(width, height)` of the reference
    /// - 2nd argument is the `(width, height)` of the reconstruction
    DimensionMismatch((usize, usize), (usize, usize)),
    /// Sample count disagrees with the dimensions given
    InvalidImage(&'static str),
    /// An evaluation log is missing a field or has a malformed one
    MalformedLog(String),
    JsonError(serde_json::Error),
    IoError(std::io::Error)
}

impl Debug for EvalErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalErrors::DimensionMismatch(reference, reconstructed) => {
                write!(
                    f,
                    "Reference is {}x{} but reconstruction is {}x{}",
                    reference.0, reference.1, reconstructed.0, reconstructed.1
                )
            }
            EvalErrors::InvalidImage(reason) => {
                write!(f, "Invalid image: {reason}")
            }
            EvalErrors::MalformedLog(reason) => {
                write!(f, "Malformed evaluation log: {reason}")
            }
            EvalErrors::JsonError(err) => {
                write!(f, "JSON error: {err}")
            }
            EvalErrors::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl Display for EvalErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for EvalErrors {}

impl From<std::io::Error> for EvalErrors {
    fn from(value: std::io::Error) -> Self {
        EvalErrors::IoError(value)
    }
}

impl From<serde_json::Error> for EvalErrors {
    fn from(value: serde_json::Error) -> Self {
        EvalErrors::JsonError(value)
    }
}
