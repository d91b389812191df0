/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};

use mmpc::{CodecError, MmpcErrors};
use mmpc_eval::EvalErrors;
use mmpc_ppm::PgmErrors;

/// Everything that can stop a command
pub enum CliErrors {
    Codec(CodecError),
    Image(MmpcErrors),
    Pgm(PgmErrors),
    Eval(EvalErrors),
    Io(std::io::Error),
    Json(serde_json::Error),
    Generic(String)
}

impl Debug for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CliErrors::Codec(err) => write!(f, "{err:?}"),
            CliErrors::Image(err) => write!(f, "{err:?}"),
            CliErrors::Pgm(err) => write!(f, "PGM: {err:?}"),
            CliErrors::Eval(err) => write!(f, "{err:?}"),
            CliErrors::Io(err) => write!(f, "I/O error: {err}"),
            CliErrors::Json(err) => write!(f, "JSON error: {err}"),
            CliErrors::Generic(reason) => write!(f, "{reason}")
        }
    }
}

impl Display for CliErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for CliErrors {}

impl From<CodecError> for CliErrors {
    fn from(value: CodecError) -> Self {
        CliErrors::Codec(value)
    }
}

impl From<MmpcErrors> for CliErrors {
    fn from(value: MmpcErrors) -> Self {
        CliErrors::Image(value)
    }
}

impl From<PgmErrors> for CliErrors {
    fn from(value: PgmErrors) -> Self {
        CliErrors::Pgm(value)
    }
}

impl From<EvalErrors> for CliErrors {
    fn from(value: EvalErrors) -> Self {
        CliErrors::Eval(value)
    }
}

impl From<std::io::Error> for CliErrors {
    fn from(value: std::io::Error) -> Self {
        CliErrors::Io(value)
    }
}

impl From<serde_json::Error> for CliErrors {
    fn from(value: serde_json::Error) -> Self {
        CliErrors::Json(value)
    }
}
