//! xrni2wav - Renoise Instrument Sample Exporter

use std::process;
use std::sync::atomic::Ordering;
use anyhow::Context;
use clap::Parser;
use xrni_export::convert::{BarProgress, NoProgress, ProgressReporter};
use xrni_export::{init_logging, Args, BatchRunner, Config};

/// Exit status after Ctrl+C stopped the batch
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let args = Args::parse();

    let config = match Config::from_args_and_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let progress: Box<dyn ProgressReporter> = if config.processing.progress {
        let bar = BarProgress::new();
        init_logging(config.verbose(), Some(bar.bar()));
        Box::new(bar)
    } else {
        init_logging(config.verbose(), None);
        Box::new(NoProgress)
    };

    match run(&config, progress.as_ref()) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(config: &Config, progress: &dyn ProgressReporter) -> anyhow::Result<i32> {
    log::debug!("{}", xrni_export::get_library_info());

    let runner = BatchRunner::new(config.clone())?;

    let stop = runner.stop_flag();
    ctrlc::set_handler(move || {
        if stop.swap(true, Ordering::SeqCst) {
            eprintln!("Interrupted");
            process::exit(EXIT_INTERRUPTED);
        }
        eprintln!("Stopping after the current sample, press Ctrl+C again to quit now...");
    })
    .context("Failed to install Ctrl+C handler")?;

    let report = runner
        .run(&config.input_path, progress)
        .with_context(|| format!("Converting {}", config.input_path.display()))?;

    println!("=== Export Complete ===");
    println!("Output: {}", config.export_root().display());
    println!("Instruments: {} converted, {} empty, {} failed", report.converted, report.empty, report.failed);
    println!("Samples: {} written, {} failed", report.samples_written, report.samples_failed);

    if report.interrupted {
        return Ok(EXIT_INTERRUPTED);
    }
    Ok(0)
}
