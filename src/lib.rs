//! Asylum horror simulation core
//!
//! Deterministic, frame-driven simulation of a single-player survival horror
//! session: one player, roaming entities, case files to collect. Rendering and
//! audio sit behind the [`frontend::Renderer`] and [`audio::AudioSink`] traits.

pub mod audio;
pub mod autopilot;
pub mod config;
pub mod frontend;
pub mod game;
pub mod metrics;
pub mod util;
