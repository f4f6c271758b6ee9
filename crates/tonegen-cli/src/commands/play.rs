//! Play command implementation
//!
//! Runs one play session through the controller, persisting the rendered
//! tone to disk and loading it through the dry-run audio service.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tonegen_audio::WavHeader;
use tonegen_player::{
    DryRunAudioService, FsStorage, PlaybackController, PlayerConfig, ServiceEvent,
    StorageEncoding, ToneSource,
};

/// Options for the play command.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// JSON config file.
    pub config: Option<PathBuf>,
    /// Directory the rendered tone is stored in.
    pub out_dir: Option<PathBuf>,
    /// Overrides the tone frequency.
    pub frequency: Option<f64>,
    /// Overrides the tone sample rate.
    pub sample_rate: Option<u32>,
    /// Overrides the tone duration.
    pub duration: Option<f64>,
    /// Loop until interrupted.
    pub looping: bool,
    /// Hand the tone to storage as base64 text.
    pub base64: bool,
    /// Seconds to keep playing before stopping.
    pub hold: Option<f64>,
}

/// Outcome of a play session.
#[derive(Debug, Clone)]
pub struct PlaySummary {
    /// Source that was played.
    pub source: String,
    /// Audio service calls in order.
    pub events: Vec<ServiceEvent>,
}

/// Run the play command
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(options: PlayOptions) -> Result<ExitCode> {
    let config = build_config(&options)?;
    let out_dir = options
        .out_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("tonegen"));
    let hold = match options.hold {
        Some(seconds) => Some(
            Duration::try_from_secs_f64(seconds)
                .with_context(|| format!("Invalid hold time: {}", seconds))?,
        ),
        None if config.looping => None,
        None => Some(playback_length(&config)),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let summary = rt.block_on(run_session(config, &out_dir, hold))?;

    println!("{}", "Service calls:".cyan().bold());
    for event in &summary.events {
        println!("  {} {:?}", "-".dimmed(), event);
    }
    println!("{}", "Done".green().bold());

    Ok(ExitCode::SUCCESS)
}

/// Loads the config file (if any) and applies command-line overrides.
pub fn build_config(options: &PlayOptions) -> Result<PlayerConfig> {
    let mut config = match &options.config {
        Some(path) => PlayerConfig::from_path(path)?,
        None => PlayerConfig::default(),
    };

    if let ToneSource::Synthesized(tone) = &mut config.source {
        if let Some(frequency) = options.frequency {
            tone.frequency = frequency;
        }
        if let Some(sample_rate) = options.sample_rate {
            tone.sample_rate = sample_rate;
        }
        if let Some(duration) = options.duration {
            tone.duration = duration;
        }
    }
    if options.looping {
        config.looping = true;
    }
    if options.base64 {
        config.encoding = StorageEncoding::Base64;
    }

    config.validate()?;
    Ok(config)
}

/// How long one pass of the configured audio lasts.
fn playback_length(config: &PlayerConfig) -> Duration {
    let seconds = match &config.source {
        ToneSource::Synthesized(tone) => tone.duration,
        ToneSource::Bundled { path } => std::fs::read(path)
            .ok()
            .and_then(|bytes| WavHeader::parse(&bytes).ok())
            .map(|header| header.duration_seconds())
            .unwrap_or(0.0),
    };
    Duration::try_from_secs_f64(seconds).unwrap_or_default()
}

/// Plays, holds for `hold` (or until Ctrl+C when `None`), then stops.
pub async fn run_session(
    config: PlayerConfig,
    out_dir: &Path,
    hold: Option<Duration>,
) -> Result<PlaySummary> {
    let storage = Arc::new(FsStorage::new(out_dir));
    let service = DryRunAudioService::with_storage(storage.clone());
    let controller = PlaybackController::new(config, storage, service);

    controller.play().await?;
    let source = controller
        .now_playing()
        .await
        .map(|source| source.to_string())
        .unwrap_or_default();
    println!("{} {}", "Playing:".cyan().bold(), source);

    if hold.is_none() {
        eprintln!("Press Ctrl+C to stop");
    }
    let held = async {
        match hold {
            Some(hold) => tokio::time::sleep(hold).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        _ = held => {}
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => eprintln!("\nStopping..."),
            Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl+C"),
        },
    }

    controller.shutdown().await?;
    println!("{} {}", "Stopped:".cyan().bold(), source);

    Ok(PlaySummary {
        source,
        events: controller.service().events(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tonegen_audio::ToneParameters;

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&PlayOptions::default()).unwrap();
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn test_build_config_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("player.json");
        std::fs::write(
            &path,
            r#"{"source": {"kind": "synthesized", "frequency": 220.0, "sample_rate": 8000}}"#,
        )
        .unwrap();

        let config = build_config(&PlayOptions {
            config: Some(path),
            duration: Some(0.5),
            looping: true,
            base64: true,
            ..PlayOptions::default()
        })
        .unwrap();

        assert_eq!(config.tone(), Some(&ToneParameters::new(220.0, 8000, 0.5)));
        assert!(config.looping);
        assert_eq!(config.encoding, StorageEncoding::Base64);
    }

    #[test]
    fn test_build_config_sample_rate_override() {
        let config = build_config(&PlayOptions {
            sample_rate: Some(22050),
            ..PlayOptions::default()
        })
        .unwrap();
        assert_eq!(config.tone(), Some(&ToneParameters::new(440.0, 22050, 5.0)));

        let zero = PlayOptions {
            sample_rate: Some(0),
            ..PlayOptions::default()
        };
        assert!(build_config(&zero).is_err());
    }

    #[test]
    fn test_build_config_rejects_bad_override() {
        let options = PlayOptions {
            frequency: Some(-1.0),
            ..PlayOptions::default()
        };
        assert!(build_config(&options).is_err());
    }

    #[test]
    fn test_playback_length() {
        let mut config = PlayerConfig::default();
        assert_eq!(playback_length(&config), Duration::from_secs(5));

        config.source = ToneSource::Bundled {
            path: PathBuf::from("/nonexistent.wav"),
        };
        assert_eq!(playback_length(&config), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_run_session_writes_and_releases() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PlayerConfig {
            source: ToneSource::Synthesized(ToneParameters::new(440.0, 8000, 0.05)),
            ..PlayerConfig::default()
        };

        let summary = run_session(config, tmp.path(), Some(Duration::ZERO))
            .await
            .unwrap();

        assert!(summary.source.ends_with("sine440.wav"));
        assert_eq!(
            std::fs::read(tmp.path().join("sine440.wav")).unwrap().len(),
            44 + 400 * 2
        );
        assert_eq!(summary.events.len(), 4);
        assert_eq!(summary.events[3], ServiceEvent::Unloaded);
    }
}
