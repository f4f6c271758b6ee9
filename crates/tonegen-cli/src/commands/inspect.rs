//! Inspect command implementation
//!
//! Reads a WAV file and reports its header fields.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use tonegen_audio::wav::{hash_pcm, WavHeader};

use super::json_output::{error_codes, CommandOutput, InspectResult, JsonError};

/// Run the inspect command
///
/// # Arguments
/// * `input` - Path to the WAV file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 valid header, 1 error
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input)
    } else {
        run_human(input)
    }
}

/// Reads and validates the header of the WAV file at `path`.
pub fn inspect_file(path: &Path) -> Result<InspectResult> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let (header, pcm) = WavHeader::parse_with_data(&bytes)
        .with_context(|| format!("Not a canonical PCM WAV file: {}", path.display()))?;

    Ok(InspectResult {
        path: path.display().to_string(),
        riff_size: header.riff_size,
        audio_format: header.audio_format,
        channels: header.format.channels,
        sample_rate: header.format.sample_rate,
        byte_rate: header.byte_rate,
        block_align: header.block_align,
        bits_per_sample: header.format.bits_per_sample,
        data_size: header.data_size,
        num_samples: header.num_samples(),
        duration_seconds: header.duration_seconds(),
        pcm_hash: hash_pcm(pcm),
    })
}

/// Run inspect with human-readable (colored) output
fn run_human(input: &str) -> Result<ExitCode> {
    println!("{} {}", "Inspecting:".cyan().bold(), input);

    let r = inspect_file(Path::new(input))?;

    println!("  {:<16} {}", "RIFF size".dimmed(), r.riff_size);
    println!("  {:<16} {}", "Audio format".dimmed(), r.audio_format);
    println!("  {:<16} {}", "Channels".dimmed(), r.channels);
    println!("  {:<16} {} Hz", "Sample rate".dimmed(), r.sample_rate);
    println!("  {:<16} {} B/s", "Byte rate".dimmed(), r.byte_rate);
    println!("  {:<16} {}", "Block align".dimmed(), r.block_align);
    println!("  {:<16} {}", "Bits/sample".dimmed(), r.bits_per_sample);
    println!("  {:<16} {} bytes", "Data size".dimmed(), r.data_size);
    println!(
        "  {:<16} {} ({:.3} s)",
        "Samples".dimmed(),
        r.num_samples,
        r.duration_seconds
    );
    println!("  {:<16} {}", "PCM hash".dimmed(), r.pcm_hash);
    println!("{}", "Valid".green().bold());

    Ok(ExitCode::SUCCESS)
}

/// Run inspect with JSON output
fn run_json(input: &str) -> Result<ExitCode> {
    let (output, code) = match inspect_file(Path::new(input)) {
        Ok(result) => (CommandOutput::success(result), ExitCode::SUCCESS),
        Err(e) => {
            let code = e
                .downcast_ref::<tonegen_audio::AudioError>()
                .map(|audio| audio.code())
                .unwrap_or(error_codes::FILE_READ);
            let error = JsonError::new(code, format!("{:#}", e)).with_file(input);
            (CommandOutput::failure(vec![error]), ExitCode::from(1))
        }
    };

    println!("{}", output.to_json());
    Ok(code)
}
