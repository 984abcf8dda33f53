//! Audio engine contract
//!
//! The simulation fires cues and never looks at a result. Engines rate-limit
//! repeats on their own side, and a missing engine must never affect play, so
//! [`SilentAudio`] is always a valid choice.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::game::state::EntityKind;

/// A fire-and-forget sound trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AudioCue {
    Footstep { running: bool },
    /// Ambient sound for an entity at `distance` from the player
    EntityAmbient { kind: EntityKind, distance: f32 },
    Scream,
    Heartbeat { rate: f32 },
    JumpScare,
    /// Per-tick intensity update for drones and noise layers
    Intensity { sanity: f32, heart_rate: f32 },
}

impl AudioCue {
    /// Whether this is a per-tick housekeeping cue rather than a discrete sound
    pub fn is_continuous(&self) -> bool {
        matches!(self, AudioCue::Intensity { .. })
    }
}

/// Anything that can play audio cues
pub trait AudioSink: Send {
    fn play(&mut self, cue: AudioCue);
}

/// Audio disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Logs discrete cues at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudio;

impl AudioSink for TracingAudio {
    fn play(&mut self, cue: AudioCue) {
        if !cue.is_continuous() {
            tracing::trace!(?cue, "audio cue");
        }
    }
}

/// Records cues into a shared buffer
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    cues: Arc<Mutex<Vec<AudioCue>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded discrete cues
    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues
            .lock()
            .iter()
            .copied()
            .filter(|c| !c.is_continuous())
            .collect()
    }

    /// Count recorded cues matching `pred`
    pub fn count(&self, pred: impl Fn(&AudioCue) -> bool) -> usize {
        self.cues.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.cues.lock().clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.cues.lock().push(cue);
    }
}
