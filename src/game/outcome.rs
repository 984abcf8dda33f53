//! Game-over / win evaluation and session summaries
//!
//! `Running` moves to exactly one terminal phase and stays there until the
//! session is restarted.

use std::fmt;

use serde::Serialize;

use crate::config::SimConfig;
use crate::game::game_loop::GameEvent;
use crate::game::state::{EndReason, GameState, Phase};

/// Move a running session into `phase`.
///
/// Returns the matching tick event, or `None` if the session had already
/// ended (terminal phases never change).
pub fn finish(state: &mut GameState, phase: Phase) -> Option<GameEvent> {
    if !state.is_running() || !phase.is_terminal() {
        return None;
    }

    state.phase = phase;
    state.clock.stop();

    let seconds = state.clock.survival_ms() / 1000.0;
    match phase {
        Phase::GameOver(reason) => {
            tracing::info!(
                "Game over: {} after {:.1}s ({}/{} files)",
                reason.message(),
                seconds,
                state.files_collected,
                state.total_files
            );
            Some(GameEvent::GameOver(reason))
        }
        Phase::Won => {
            tracing::info!("Escaped with all {} files after {:.1}s", state.total_files, seconds);
            Some(GameEvent::Won)
        }
        Phase::Running => None,
    }
}

/// Check the terminal conditions
pub fn check_end(state: &GameState, config: &SimConfig) -> Option<Phase> {
    if !state.is_running() {
        return None;
    }
    if state.player.sanity <= 0.0 {
        return Some(Phase::GameOver(EndReason::SanityBroken));
    }
    if config.health_enabled && state.player.health <= 0.0 {
        return Some(Phase::GameOver(EndReason::HealthDepleted));
    }
    if state.files_collected >= state.total_files {
        return Some(Phase::Won);
    }
    None
}

/// Evaluate and apply the terminal conditions for this tick
pub fn evaluate(state: &mut GameState, config: &SimConfig) -> Option<GameEvent> {
    let phase = check_end(state, config)?;
    finish(state, phase)
}

/// End-of-session report
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub phase: Phase,
    pub survival_ms: f64,
    pub ticks: u64,
    pub entities_present: usize,
    pub files_collected: u32,
    pub total_files: u32,
    pub final_sanity: f32,
    pub final_heart_rate: f32,
}

impl SessionSummary {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            survival_ms: state.clock.survival_ms(),
            ticks: state.clock.tick,
            entities_present: state.live_entity_count(),
            files_collected: state.files_collected,
            total_files: state.total_files,
            final_sanity: state.player.sanity,
            final_heart_rate: state.player.heart_rate,
        }
    }

    pub fn won(&self) -> bool {
        self.phase == Phase::Won
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.phase {
            Phase::Running => "In progress",
            Phase::Won => "Escaped",
            Phase::GameOver(reason) => reason.message(),
        };
        write!(
            f,
            "{} | survived {:.1}s | files {}/{} | entities {} | sanity {:.0} | heart {:.0} bpm",
            outcome,
            self.survival_ms / 1000.0,
            self.files_collected,
            self.total_files,
            self.entities_present,
            self.final_sanity,
            self.final_heart_rate
        )
    }
}
