//! tonegen player
//!
//! Drives a single tone through its play session: render with
//! [`tonegen_audio`], persist through a [`Storage`], then load and control it
//! through an [`AudioService`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tonegen_player::{DryRunAudioService, FsStorage, PlaybackController, PlayerConfig};
//!
//! # async fn run() -> tonegen_player::PlayerResult<()> {
//! let storage = Arc::new(FsStorage::new("/tmp/tonegen"));
//! let service = DryRunAudioService::with_storage(storage.clone());
//! let controller = PlaybackController::new(PlayerConfig::default(), storage, service);
//!
//! controller.play().await?;
//! assert!(controller.is_playing());
//! controller.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Structure
//!
//! - [`controller`] - Play/stop orchestration
//! - [`session`] - Session state machine
//! - [`storage`] - Storage trait, filesystem and in-memory backends
//! - [`service`] - Audio service and sound handle traits
//! - [`dry_run`] - Validating audio service that produces no sound
//! - [`config`] - Player configuration

pub mod config;
pub mod controller;
pub mod dry_run;
pub mod error;
pub mod service;
pub mod session;
pub mod storage;

pub use config::{PlayerConfig, ToneSource};
pub use controller::PlaybackController;
pub use dry_run::{DryRunAudioService, DryRunHandle, FaultPoint, ServiceEvent};
pub use error::{PlaybackError, PlayerError, PlayerResult, StorageError};
pub use service::{AudioService, AudioSource, LoadOptions, SoundHandle};
pub use session::{PlaybackSession, SessionState};
pub use storage::{FsStorage, MemoryStorage, Storage, StorageEncoding, StoredAudio, WriteOptions};
