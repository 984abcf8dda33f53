//! Delay queue for effects that fire after a wall-clock delay
//!
//! Respawns, light reactivation and staggered whisper cues are queued here
//! with an absolute due time in simulation milliseconds and drained at the
//! start of every tick. Clearing the queue on restart guarantees nothing from
//! a previous session fires into the next one.

use serde::Serialize;

/// A deferred effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeferredEffect {
    /// Spawn a replacement for a touched entity
    RespawnEntity,
    /// Turn the light at this index back on
    ReactivateLight(usize),
    /// One cue of a whisper burst
    Whisper,
    /// Final sting after a game over
    Sting,
}

#[derive(Debug, Clone, Serialize)]
struct Entry {
    fire_at_ms: f64,
    seq: u64,
    effect: DeferredEffect,
}

/// Pending deferred effects, drained in (due time, insertion) order
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeferredQueue {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `effect` to fire once the clock reaches `fire_at_ms`
    pub fn schedule(&mut self, fire_at_ms: f64, effect: DeferredEffect) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            fire_at_ms,
            seq,
            effect,
        });
    }

    /// Remove and return every effect due at `now_ms`, oldest first
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<DeferredEffect> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|entry| {
            if entry.fire_at_ms <= now_ms {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.fire_at_ms
                .partial_cmp(&b.fire_at_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|entry| entry.effect).collect()
    }

    /// Drop every pending effect
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count pending effects matching `effect`
    pub fn pending(&self, effect: DeferredEffect) -> usize {
        self.entries.iter().filter(|e| e.effect == effect).count()
    }
}
