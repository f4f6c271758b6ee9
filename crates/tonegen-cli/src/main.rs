//! tonegen CLI - render, inspect and play pure sine tones
//!
//! This binary renders tones to canonical PCM WAV files, inspects WAV
//! headers, and runs play sessions through the playback controller.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use tonegen_audio::tone::{DEFAULT_DURATION, DEFAULT_FREQUENCY, DEFAULT_SAMPLE_RATE};
use tonegen_audio::ToneParameters;
use tonegen_cli::commands;

/// tonegen - Pure tone synthesis and WAV encoding
#[derive(Parser)]
#[command(name = "tonegen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tone to a WAV file
    Generate {
        /// Output WAV path
        #[arg(short, long)]
        out: String,

        /// Tone frequency in Hz
        #[arg(short, long, default_value_t = DEFAULT_FREQUENCY)]
        frequency: f64,

        /// Sample rate in Hz
        #[arg(short = 'r', long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Duration in seconds
        #[arg(short, long, default_value_t = DEFAULT_DURATION)]
        duration: f64,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print and validate the header of a WAV file
    Inspect {
        /// Path to the WAV file
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Run a play session: render, store, load, play, then stop
    Play {
        /// Player config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory the rendered tone is stored in (default: system temp dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Override the tone frequency in Hz
        #[arg(short, long)]
        frequency: Option<f64>,

        /// Override the sample rate in Hz
        #[arg(short = 'r', long)]
        sample_rate: Option<u32>,

        /// Override the tone duration in seconds
        #[arg(short, long)]
        duration: Option<f64>,

        /// Loop playback until Ctrl+C
        #[arg(long = "loop")]
        looping: bool,

        /// Hand the rendered tone to storage as base64 text
        #[arg(long)]
        base64: bool,

        /// Seconds to keep playing before stopping (default: one pass)
        #[arg(long)]
        hold: Option<f64>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            out,
            frequency,
            sample_rate,
            duration,
            json,
        } => commands::generate::run(
            &out,
            ToneParameters::new(frequency, sample_rate, duration),
            json,
        ),
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
        Commands::Play {
            config,
            out_dir,
            frequency,
            sample_rate,
            duration,
            looping,
            base64,
            hold,
        } => commands::play::run(commands::play::PlayOptions {
            config,
            out_dir,
            frequency,
            sample_rate,
            duration,
            looping,
            base64,
            hold,
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
