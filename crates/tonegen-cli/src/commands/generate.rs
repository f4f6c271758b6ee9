//! Generate command implementation
//!
//! Renders a tone and writes it as a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use tonegen_audio::{encode, ToneParameters};

use super::json_output::{error_codes, CommandOutput, GenerateResult, JsonError};

/// Run the generate command
///
/// # Arguments
/// * `out` - Output WAV path
/// * `tone` - Tone parameters
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(out: &str, tone: ToneParameters, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(out, tone)
    } else {
        run_human(out, tone)
    }
}

/// Renders `tone` and writes it to `out`.
///
/// Nothing is written unless synthesis and encoding both succeed.
pub fn generate_file(out: &Path, tone: &ToneParameters) -> Result<GenerateResult> {
    let samples = tone.synthesize()?;
    let wav = encode(&samples, tone.sample_rate)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(out, wav.as_bytes())
        .with_context(|| format!("Failed to write WAV file: {}", out.display()))?;

    Ok(GenerateResult {
        path: out.display().to_string(),
        frequency: tone.frequency,
        sample_rate: tone.sample_rate,
        num_samples: wav.num_samples(),
        bytes: wav.len(),
        duration_seconds: wav.duration_seconds(),
        pcm_hash: wav.pcm_hash(),
    })
}

/// Run generate with human-readable (colored) output
fn run_human(out: &str, tone: ToneParameters) -> Result<ExitCode> {
    let start = Instant::now();

    println!(
        "{} {} Hz @ {} Hz for {} s",
        "Rendering tone:".cyan().bold(),
        tone.frequency,
        tone.sample_rate,
        tone.duration
    );

    let result = generate_file(Path::new(out), &tone)?;

    println!("  {} {}", "->".green(), result.path);
    println!(
        "  {} {} samples, {} bytes",
        "Size:".dimmed(),
        result.num_samples,
        result.bytes
    );
    println!("  {} {}", "PCM hash:".dimmed(), result.pcm_hash);
    println!(
        "{} in {:.1?}",
        "Done".green().bold(),
        start.elapsed()
    );

    Ok(ExitCode::SUCCESS)
}

/// Run generate with JSON output
fn run_json(out: &str, tone: ToneParameters) -> Result<ExitCode> {
    let (output, code) = match generate_file(Path::new(out), &tone) {
        Ok(result) => (CommandOutput::success(result), ExitCode::SUCCESS),
        Err(e) => {
            let code = e
                .downcast_ref::<tonegen_audio::AudioError>()
                .map(|audio| audio.code())
                .unwrap_or(error_codes::FILE_WRITE);
            let error = JsonError::new(code, format!("{:#}", e)).with_file(out);
            (CommandOutput::failure(vec![error]), ExitCode::from(1))
        }
    };

    println!("{}", output.to_json());
    Ok(code)
}
