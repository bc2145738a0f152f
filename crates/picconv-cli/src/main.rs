//! `picconv` - convert one image between formats from the command line.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use picconv_core::{
    convert_with, decode_file, estimate_with, format_megabytes, size_change_percent, ConvertOptions,
    ImageInfo,
};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    run(&cli)
}

fn run(cli: &Cli) -> ExitCode {
    if !cli.input.exists() {
        eprintln!("Error: file '{}' does not exist", cli.input.display());
        return ExitCode::FAILURE;
    }

    let format = cli.target_format();
    let output = cli.output_path();
    let options = ConvertOptions::default();

    let quality = picconv_core::encode::resolve_quality(format, cli.quality);
    if let Some(warning) = &quality.warning {
        eprintln!("Warning: {warning}");
    }

    let source = match decode_file(&cli.input, options.max_decoded_pixels) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: could not load '{}': {err}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let info = match ImageInfo::inspect(&cli.input, &source) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("Error: could not read '{}': {err}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let request = cli.request(&quality, source.dimensions());
    log::debug!("request: {request:?}");

    println!("Input");
    println!("{info}");
    println!();
    println!("Output");
    println!("File: {}", output.display());
    println!("Format: {}", format.name());
    if let (Some(width), Some(height)) = request.target_dimensions(source.dimensions()) {
        println!("Target resolution: {width}x{height} pixels");
    }
    if let Some(range) = format.quality_range() {
        let value = quality.value.unwrap_or(range.default);
        println!("{}: {value}", range.label);
    }

    let estimated = match estimate_with(&source, &request, &options) {
        Ok(size) => {
            println!("Estimated size: {}", format_megabytes(size));
            if let Some(change) = size_change_percent(info.file_size, size) {
                println!("Size change: {change:+.1}%");
            }
            Some(size)
        }
        Err(err) => {
            log::debug!("estimate failed: {err}");
            println!("Could not estimate size.");
            None
        }
    };

    if cli.estimate {
        println!();
        println!("Estimate only; no file was written.");
        return ExitCode::SUCCESS;
    }

    // The decoded source is no longer needed; convert decodes again from disk
    drop(source);

    println!();
    println!("Converting...");
    let result = convert_with(&cli.input, &output, &request, &options);
    if !result.success {
        eprintln!(
            "Error: conversion failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return ExitCode::FAILURE;
    }

    println!("Saved: {}", output.display());
    if let Some(size) = result.output_size {
        println!("Final size: {}", format_megabytes(size));
        if let Some(estimated) = estimated.filter(|e| *e > 0) {
            let deviation = (size as f64 - estimated as f64).abs() / estimated as f64 * 100.0;
            println!("Deviation from estimate: {deviation:.1}%");
        }
    }

    ExitCode::SUCCESS
}
