/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, Command};

fn input_arg() -> Arg {
    Arg::new("in")
        .short('i')
        .long("input")
        .help("Input file to read data from")
        .required(true)
}

fn output_arg() -> Arg {
    Arg::new("out")
        .short('o')
        .long("output")
        .help("Output file to write the data to")
        .required(true)
}

fn block_size_arg() -> Arg {
    Arg::new("block-size")
        .long("block-size")
        .help("Transform block dimension")
        .value_parser(value_parser!(u8).range(1..))
        .default_value("8")
}

#[rustfmt::skip]
fn encode_command() -> Command {
    Command::new("encode")
        .about("Compress a PGM slice into an mmpc bitstream")
        .arg(input_arg())
        .arg(output_arg())
        .arg(Arg::new("quality")
            .short('q')
            .long("quality")
            .help("Quality in 1..=100, higher keeps more detail")
            .value_parser(value_parser!(u8).range(1..=100))
            .default_value("30"))
        .arg(Arg::new("step")
            .long("step")
            .help("Explicit quantization step, overrides quality")
            .value_parser(value_parser!(u16).range(1..)))
        .arg(block_size_arg())
}

#[rustfmt::skip]
fn decode_command() -> Command {
    Command::new("decode")
        .about("Reconstruct a PGM slice from an mmpc bitstream")
        .arg(input_arg())
        .arg(output_arg())
        .arg(Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help("Treat recoverable problems, e.g trailing bytes, as errors"))
}

#[rustfmt::skip]
fn eval_command() -> Command {
    Command::new("eval")
        .about("Measure distortion and rate of a reconstruction")
        .arg(Arg::new("reconstructed")
            .help("Reconstructed PGM")
            .required(true))
        .arg(Arg::new("reference")
            .help("Reference PGM")
            .required(true))
        .arg(Arg::new("bitstream")
            .long("bitstream")
            .help("Bitstream the reconstruction was decoded from")
            .long_help("Bitstream the reconstruction was decoded from.\nDefaults to the reconstruction's path with `_rec.pgm` replaced by `.mmpc`"))
        .arg(Arg::new("log")
            .long("log")
            .help("Where to write the evaluation log")
            .long_help("Where to write the evaluation log.\nDefaults to `<name>_eval.log` next to the reconstruction"))
        .arg(Arg::new("error-map")
            .long("error-map")
            .help("Write the scaled absolute error as an 8 bit PGM"))
        .arg(Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print the report as JSON instead of log lines"))
}

#[rustfmt::skip]
fn batch_command() -> Command {
    Command::new("batch")
        .about("Encode, decode and evaluate every PGM in a directory at several qualities")
        .arg(Arg::new("input-dir")
            .long("input-dir")
            .help("Directory holding the PGM slices")
            .required(true))
        .arg(Arg::new("output-dir")
            .long("output-dir")
            .help("Directory receiving bitstreams, reconstructions and logs")
            .default_value("results"))
        .arg(Arg::new("qualities")
            .long("qualities")
            .help("Comma separated qualities to encode at")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .value_parser(value_parser!(u8).range(1..=100))
            .default_value("10,30,60"))
        .arg(Arg::new("threads")
            .long("threads")
            .help("Number of worker threads, defaults to available parallelism")
            .value_parser(value_parser!(usize)))
        .arg(block_size_arg())
}

#[rustfmt::skip]
fn summary_command() -> Command {
    Command::new("summary")
        .about("Aggregate evaluation logs into summary.csv and summary.json")
        .arg(Arg::new("results-dir")
            .long("results-dir")
            .help("Directory holding the *_eval.log files")
            .default_value("results"))
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("mmpc")
        .about("Block DCT codec for single channel radiological slices")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(encode_command())
        .subcommand(decode_command())
        .subcommand(eval_command())
        .subcommand(batch_command())
        .subcommand(summary_command())
        .arg(Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the codec stages"))
}

#[cfg(test)]
mod tests {
    use crate::cmd_args::create_cmd_args;

    #[test]
    fn command_is_well_formed() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn batch_qualities_split_on_commas() {
        let matches = create_cmd_args()
            .try_get_matches_from(["mmpc", "batch", "--input-dir", "in", "--qualities", "5,50"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let qualities: Vec<u8> = sub.get_many::<u8>("qualities").unwrap().copied().collect();
        assert_eq!(qualities, [5, 50]);
    }

    #[test]
    fn quality_out_of_range_is_rejected() {
        let result = create_cmd_args().try_get_matches_from([
            "mmpc", "encode", "-i", "a.pgm", "-o", "a.mmpc", "-q", "101"
        ]);
        assert!(result.is_err());
    }
}
