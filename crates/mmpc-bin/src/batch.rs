/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encode, decode and evaluate a directory of slices across a worker pool
//!
//! Every slice is paired with every requested quality, each pair is one job.
//! Workers pull jobs from a shared counter, a failing job writes
//! `<name>_q<q>_error.log` and never stops the others.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use clap::ArgMatches;
use log::{debug, error, info, warn};
use mmpc_core::options::DecoderOptions;

use crate::errors::CliErrors;
use crate::file_io::{read_pgm, write_atomic, write_pgm};
use crate::serde::BatchRecord;
use crate::workflow::{encode_image, encoder_options, evaluate_images};

const BATCH_JSON: &str = "batch.json";

/// One image at one quality
#[derive(Clone, Debug)]
struct Job {
    input:   PathBuf,
    name:    String,
    quality: u8
}

impl Job {
    fn output(&self, directory: &Path, suffix: &str) -> PathBuf {
        directory.join(format!("{}_q{}{}", self.name, self.quality, suffix))
    }
}

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub input_dir:  PathBuf,
    pub output_dir: PathBuf,
    pub qualities:  Vec<u8>,
    pub threads:    usize,
    pub block_size: u8
}

impl BatchOptions {
    fn from_args(args: &ArgMatches) -> Result<BatchOptions, CliErrors> {
        let input_dir = args
            .get_one::<String>("input-dir")
            .map(PathBuf::from)
            .ok_or_else(|| CliErrors::Generic("Missing --input-dir".to_string()))?;
        let output_dir = args
            .get_one::<String>("output-dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("results"));

        let qualities = args
            .get_many::<u8>("qualities")
            .map(|x| unique_qualities(x.copied()))
            .unwrap_or_default();

        let threads = match args.get_one::<usize>("threads") {
            Some(threads) => (*threads).max(1),
            None => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        };
        let block_size = args.get_one::<u8>("block-size").copied().unwrap_or(8);

        Ok(BatchOptions {
            input_dir,
            output_dir,
            qualities,
            threads,
            block_size
        })
    }
}

/// Drop repeated qualities, keeping the order they were first given in
fn unique_qualities(qualities: impl IntoIterator<Item = u8>) -> Vec<u8> {
    let mut seen = [false; 256];

    qualities
        .into_iter()
        .filter(|q| !std::mem::replace(&mut seen[usize::from(*q)], true))
        .collect()
}

/// List `*.pgm` files in `directory`, sorted by name
fn list_slices(directory: &Path) -> Result<Vec<PathBuf>, CliErrors> {
    let mut files = Vec::new();

    for entry in fs::read_dir(directory)? {
        let path = entry?.path();

        let is_pgm = path
            .extension()
            .map(|x| x.eq_ignore_ascii_case("pgm"))
            .unwrap_or(false);

        if path.is_file() && is_pgm {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn create_jobs(files: &[PathBuf], qualities: &[u8]) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(files.len() * qualities.len());

    for file in files {
        let name = file
            .file_stem()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default();

        for quality in qualities {
            jobs.push(Job {
                input: file.clone(),
                name: name.clone(),
                quality: *quality
            });
        }
    }
    jobs
}

fn run_job(job: &Job, options: &BatchOptions) -> Result<mmpc_eval::EvalReport, CliErrors> {
    let image = read_pgm(&job.input, DecoderOptions::new_cmd())?;

    let encoder_options = encoder_options(&image, job.quality, None, options.block_size);
    let bitstream = encode_image(&image, encoder_options)?;
    write_atomic(&job.output(&options.output_dir, ".mmpc"), &bitstream)?;

    let reconstructed = mmpc::decode(&bitstream)?;
    write_pgm(&job.output(&options.output_dir, "_rec.pgm"), &reconstructed)?;

    let report = evaluate_images(&image, &reconstructed, bitstream.len())?;
    write_atomic(
        &job.output(&options.output_dir, mmpc_eval::summary::EVAL_LOG_SUFFIX),
        report.to_log().as_bytes()
    )?;

    Ok(report)
}

/// Run every job, returning one record per job in job order
fn execute(jobs: &[Job], options: &BatchOptions) -> Vec<BatchRecord> {
    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<Option<BatchRecord>>> =
        Mutex::new((0..jobs.len()).map(|_| None).collect());

    let workers = options.threads.min(jobs.len()).max(1);
    debug!("Running {} jobs on {} workers", jobs.len(), workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let position = next.fetch_add(1, Ordering::Relaxed);
                let Some(job) = jobs.get(position) else {
                    break;
                };

                let outcome = run_job(job, options).map_err(|e| {
                    let reason = format!("{e:?}");
                    warn!("{} at quality {} failed: {}", job.name, job.quality, reason);

                    let log_path = job.output(&options.output_dir, "_error.log");
                    if let Err(log_err) = write_atomic(&log_path, format!("{reason}\n").as_bytes()) {
                        error!("Could not write {:?}: {:?}", log_path, log_err);
                    }
                    reason
                });

                let record = BatchRecord::new(job.input.clone().into_os_string(), job.quality, outcome);
                if let Ok(mut results) = results.lock() {
                    results[position] = Some(record);
                }
            });
        }
    });

    results
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .into_iter()
        .flatten()
        .collect()
}

pub fn run_batch(args: &ArgMatches) -> Result<(), CliErrors> {
    let options = BatchOptions::from_args(args)?;

    let files = list_slices(&options.input_dir)?;
    if files.is_empty() {
        return Err(CliErrors::Generic(format!(
            "No PGM files found in {:?}",
            options.input_dir
        )));
    }
    fs::create_dir_all(&options.output_dir)?;

    let jobs = create_jobs(&files, &options.qualities);
    let records = execute(&jobs, &options);

    write_atomic(
        &options.output_dir.join(BATCH_JSON),
        serde_json::to_string_pretty(&records)?.as_bytes()
    )?;

    let failed = records.iter().filter(|x| !x.is_ok()).count() + (jobs.len() - records.len());
    info!(
        "Batch finished, {} of {} jobs succeeded",
        jobs.len() - failed,
        jobs.len()
    );

    if failed > 0 {
        return Err(CliErrors::Generic(format!(
            "{failed} of {} jobs failed",
            jobs.len()
        )));
    }
    Ok(())
}
