/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, Level};

fn flag(options: &ArgMatches, name: &str) -> bool {
    options.get_flag(name)
}

/// Pick the log level from the global flags, warn when none is given
pub fn log_level(options: &ArgMatches) -> Level {
    if flag(options, "trace") {
        Level::Trace
    } else if flag(options, "debug") {
        Level::Debug
    } else if flag(options, "info") {
        Level::Info
    } else {
        Level::Warn
    }
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = log_level(options);

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }
    info!("Initialized logger");
    info!("Log level :{}", log_level);
}
