//! Play session state.

use std::fmt;

use serde::Serialize;

use crate::service::AudioSource;

/// Lifecycle of a play session: `Idle -> Loading -> Playing -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No sound is loaded.
    Idle,
    /// A play request is synthesizing, persisting or loading.
    Loading,
    /// A sound is loaded and playing.
    Playing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Playing => "playing",
        };
        f.write_str(name)
    }
}

/// The controller's single play session and the handle it owns.
#[derive(Debug)]
pub struct PlaybackSession<H> {
    state: SessionState,
    handle: Option<H>,
    source: Option<AudioSource>,
}

impl<H> Default for PlaybackSession<H> {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            handle: None,
            source: None,
        }
    }
}

impl<H> PlaybackSession<H> {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether no sound is loaded or loading.
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Source of the sound currently playing.
    pub fn source(&self) -> Option<&AudioSource> {
        self.source.as_ref()
    }

    /// Moves `Idle -> Loading`. Returns the current state if not idle.
    pub fn begin_loading(&mut self) -> Result<(), SessionState> {
        if self.state != SessionState::Idle {
            return Err(self.state);
        }
        self.state = SessionState::Loading;
        Ok(())
    }

    /// Takes ownership of a loaded handle while still `Loading`.
    pub fn attach(&mut self, handle: H, source: AudioSource) {
        debug_assert_eq!(self.state, SessionState::Loading);
        self.handle = Some(handle);
        self.source = Some(source);
    }

    /// The owned handle, if one has been attached.
    pub fn handle_mut(&mut self) -> Option<&mut H> {
        self.handle.as_mut()
    }

    /// Moves `Loading -> Playing`.
    pub fn mark_playing(&mut self) {
        debug_assert_eq!(self.state, SessionState::Loading);
        self.state = SessionState::Playing;
    }

    /// Returns to `Idle`, releasing ownership of any handle to the caller.
    pub fn reset(&mut self) -> Option<H> {
        self.state = SessionState::Idle;
        self.source = None;
        self.handle.take()
    }
}
