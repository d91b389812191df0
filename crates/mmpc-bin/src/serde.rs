/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;

use mmpc_eval::EvalReport;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Outcome of one batch job, as stored in `batch.json`
pub struct BatchRecord {
    file:    OsString,
    quality: u8,
    outcome: Result<EvalReport, String>
}

impl BatchRecord {
    pub fn new(file: OsString, quality: u8, outcome: Result<EvalReport, String>) -> BatchRecord {
        BatchRecord {
            file,
            quality,
            outcome
        }
    }

    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl Serialize for BatchRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("BatchRecord", 4)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("quality", &self.quality)?;

        match &self.outcome {
            Ok(report) => {
                state.serialize_field("status", "ok")?;
                state.serialize_field("report", report)?;
            }
            Err(reason) => {
                state.serialize_field("status", "failed")?;
                state.serialize_field("error", reason)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use crate::serde::BatchRecord;

    #[test]
    fn failed_record_carries_reason() {
        let record = BatchRecord::new(OsString::from("ct.pgm"), 30, Err("bad magic".to_string()));
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(json["file"], "ct.pgm");
        assert_eq!(json["quality"], 30);
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "bad magic");
        assert!(!record.is_ok());
    }
}
