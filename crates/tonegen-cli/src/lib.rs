//! tonegen CLI library.
//!
//! Command implementations for the `tonegen` binary: rendering a tone to a
//! WAV file, inspecting WAV headers, and running a play session.

pub mod commands;
