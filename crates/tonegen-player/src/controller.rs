//! Play/stop orchestration over the storage and audio service collaborators.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tonegen_audio::encode;

use crate::config::{PlayerConfig, ToneSource};
use crate::error::{PlayerError, PlayerResult};
use crate::service::{AudioService, AudioSource, LoadOptions, SoundHandle};
use crate::session::{PlaybackSession, SessionState};
use crate::storage::{Storage, WriteOptions};

/// Plays and stops a single tone.
///
/// Play and stop sequences are serialized on the session lock: a `stop()`
/// issued while `play()` is loading waits for the load to finish and then
/// releases the handle. A `play()` issued while a session is loading or
/// playing is rejected with [`PlayerError::AlreadyActive`].
pub struct PlaybackController<A: AudioService> {
    config: PlayerConfig,
    storage: Arc<dyn Storage>,
    service: A,
    session: Mutex<PlaybackSession<A::Handle>>,
    state_tx: watch::Sender<SessionState>,
}

impl<A: AudioService> PlaybackController<A> {
    /// Creates an idle controller.
    pub fn new(config: PlayerConfig, storage: Arc<dyn Storage>, service: A) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            config,
            storage,
            service,
            session: Mutex::new(PlaybackSession::new()),
            state_tx,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The audio service.
    pub fn service(&self) -> &A {
        &self.service
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    /// Whether a sound is playing.
    pub fn is_playing(&self) -> bool {
        self.state() == SessionState::Playing
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Source of the sound currently playing.
    pub async fn now_playing(&self) -> Option<AudioSource> {
        self.session.lock().await.source().cloned()
    }

    /// Renders, stores, loads and starts the tone.
    ///
    /// On any failure the session returns to idle and the error is returned
    /// unchanged. Dropping the future before it completes also returns the
    /// session to idle.
    pub async fn play(&self) -> PlayerResult<()> {
        let mut session = self.session.lock().await;
        self.play_locked(&mut session).await
    }

    /// Stops and releases the playing sound. A no-op when idle.
    pub async fn stop(&self) -> PlayerResult<()> {
        let mut session = self.session.lock().await;
        self.stop_locked(&mut session).await
    }

    /// Plays when idle, stops otherwise. Returns the resulting state.
    pub async fn toggle(&self) -> PlayerResult<SessionState> {
        let mut session = self.session.lock().await;
        if session.is_idle() {
            self.play_locked(&mut session).await?;
        } else {
            self.stop_locked(&mut session).await?;
        }
        Ok(session.state())
    }

    /// Releases any session. Call on teardown.
    pub async fn shutdown(&self) -> PlayerResult<()> {
        self.stop().await
    }

    async fn play_locked(&self, session: &mut PlaybackSession<A::Handle>) -> PlayerResult<()> {
        if let Err(state) = session.begin_loading() {
            tracing::warn!(%state, "play rejected: session already active");
            return Err(PlayerError::AlreadyActive { state });
        }
        self.publish(SessionState::Loading);

        let mut load = LoadGuard {
            session,
            state_tx: &self.state_tx,
            settled: false,
        };
        match self.start(&mut *load.session).await {
            Ok(()) => {
                load.session.mark_playing();
                self.publish(SessionState::Playing);
                load.settled = true;
                if let Some(source) = load.session.source() {
                    tracing::info!(source = %source, "playing");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "play failed, returning to idle");
                let handle = load.session.reset();
                self.publish(SessionState::Idle);
                load.settled = true;

                if let Some(mut handle) = handle {
                    if let Err(unload_err) = handle.unload().await {
                        tracing::warn!(error = %unload_err, "failed to unload after play error");
                    }
                }
                Err(e)
            }
        }
    }

    async fn stop_locked(&self, session: &mut PlaybackSession<A::Handle>) -> PlayerResult<()> {
        let was_idle = session.is_idle();
        let handle = session.reset();
        self.publish(SessionState::Idle);

        let Some(mut handle) = handle else {
            if was_idle {
                tracing::debug!("stop requested while idle");
            }
            return Ok(());
        };

        // Unload even when stop fails so the handle is never leaked.
        let stopped = handle.stop().await;
        let unloaded = handle.unload().await;
        tracing::info!("stopped");

        stopped?;
        unloaded?;
        Ok(())
    }

    /// Resolves the source, loads it into the session and starts playback.
    async fn start(&self, session: &mut PlaybackSession<A::Handle>) -> PlayerResult<()> {
        let source = match &self.config.source {
            ToneSource::Synthesized(tone) => {
                // Render before touching storage so bad input never writes a file.
                let samples = tone.synthesize()?;
                let wav = encode(&samples, tone.sample_rate)?;

                let encoding = self.config.encoding;
                let stored = self
                    .storage
                    .write(
                        &encoding.encode(&wav),
                        &self.config.file_name,
                        WriteOptions { encoding },
                    )
                    .await?;
                AudioSource::Stored(stored)
            }
            ToneSource::Bundled { path } => AudioSource::File(path.clone()),
        };

        let options = LoadOptions {
            should_play: false,
            is_looping: self.config.looping,
        };
        let handle = self.service.load(source.clone(), options).await?;
        session.attach(handle, source);

        if let Some(handle) = session.handle_mut() {
            handle.play().await?;
        }
        Ok(())
    }

    fn publish(&self, state: SessionState) {
        publish_state(&self.state_tx, state);
    }
}

/// Notifies subscribers only when the state actually changes.
fn publish_state(state_tx: &watch::Sender<SessionState>, state: SessionState) {
    state_tx.send_if_modified(|current| {
        let changed = *current != state;
        *current = state;
        changed
    });
}

/// Returns the session to idle if a `play()` future is dropped before it
/// settles. A handle that was already loaded is unloaded on the runtime.
struct LoadGuard<'a, H: SoundHandle> {
    session: &'a mut PlaybackSession<H>,
    state_tx: &'a watch::Sender<SessionState>,
    settled: bool,
}

impl<H: SoundHandle> Drop for LoadGuard<'_, H> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("play cancelled before it settled, returning to idle");

        if let Some(mut handle) = self.session.reset() {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        if let Err(e) = handle.unload().await {
                            tracing::warn!(error = %e, "failed to unload cancelled sound");
                        }
                    });
                }
                Err(_) => tracing::warn!("no runtime available to unload cancelled sound"),
            }
        }
        publish_state(self.state_tx, SessionState::Idle);
    }
}
