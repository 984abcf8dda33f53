//! Simulation context and tick orchestration
//!
//! [`Simulation`] owns the whole session: state, config, RNG, the deferred
//! queue, the input channel and the audio sink. One call to
//! [`Simulation::tick`] runs every system once, in this order:
//!
//! 1. deferred effects that came due
//! 2. overlay/event countdowns
//! 3. player input (movement, flashlight, look)
//! 4. entity behaviors
//! 5. player resources
//! 6. contacts, then file pickup on interact
//! 7. periodic spawning
//! 8. horror event roll
//! 9. game-over / win evaluation

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audio::{AudioCue, AudioSink, SilentAudio};
use crate::config::{ConfigError, SimConfig};
use crate::game::constants::horror::{GAME_OVER_STING_DELAY_MS, WHISPER_CUE_DISTANCE, WHISPER_SANITY_GATE};
use crate::game::deferred::{DeferredEffect, DeferredQueue};
use crate::game::input::{InputBuffer, InputEvent, InputSender, InputState};
use crate::game::layout;
use crate::game::outcome::{self, SessionSummary};
use crate::game::snapshot::{HudView, RenderSnapshot};
use crate::game::state::{EndReason, EntityId, EntityKind, GameState, HorrorEventKind};
use crate::game::systems::{behavior, collision, horror, player, resources, spawn};
use crate::util::vec2::Vec2;

/// Events produced by a single tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// An entity touched the player and was removed
    Contact {
        entity_id: EntityId,
        kind: EntityKind,
        /// Player sanity after the penalty
        sanity: f32,
    },
    ItemCollected {
        index: usize,
        files_collected: u32,
    },
    EntitySpawned {
        entity_id: EntityId,
        kind: EntityKind,
    },
    HorrorTriggered(HorrorEventKind),
    GameOver(EndReason),
    Won,
    /// A terminal session was reset by the restart key
    Restarted,
}

/// One horror session
pub struct Simulation {
    state: GameState,
    config: SimConfig,
    seed: u64,
    rng: StdRng,
    deferred: DeferredQueue,
    input_buffer: InputBuffer,
    input: InputState,
    audio: Box<dyn AudioSink>,
}

impl Simulation {
    /// Create a session with silent audio. Fails only on invalid config.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);

        let mut sim = Self {
            state: GameState::new(&config),
            rng: StdRng::seed_from_u64(seed),
            seed,
            config,
            deferred: DeferredQueue::new(),
            input_buffer: InputBuffer::default(),
            input: InputState::new(),
            audio: Box::new(SilentAudio),
        };
        sim.setup();
        info!(
            "Session started (seed {}, {} entities, {} files)",
            seed,
            sim.state.live_entity_count(),
            sim.state.total_files
        );
        Ok(sim)
    }

    /// Replace the audio sink
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    fn setup(&mut self) {
        self.state = GameState::new(&self.config);
        layout::populate(&mut self.state, &self.config, &mut self.rng);
        spawn::spawn_initial(&mut self.state, &self.config, &mut self.rng);
    }

    /// Reset everything to a fresh session, cancelling pending effects
    pub fn restart(&mut self) {
        let previous = SessionSummary::from_state(&self.state);
        self.deferred.clear();
        self.input.clear();
        self.input_buffer.discard();
        self.setup();
        info!("Session restarted (previous: {})", previous);
    }

    /// Handle for submitting input from another task or thread
    pub fn input_sender(&self) -> InputSender {
        self.input_buffer.sender()
    }

    /// Submit an input event directly. Returns false if the buffer is full.
    pub fn submit(&self, event: InputEvent) -> bool {
        self.input_buffer.try_submit(event)
    }

    /// Advance the session by `dt_ms` milliseconds of simulated time
    pub fn tick(&mut self, dt_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.input_buffer.drain_into(&mut self.input);

        if self.input.take_restart() && self.state.phase.is_terminal() {
            self.restart();
            events.push(GameEvent::Restarted);
            return events;
        }

        self.state.clock.advance(dt_ms);

        self.run_deferred(&mut events);

        if !self.state.is_running() {
            // Presses made after the end must not leak into the next session
            self.input.take_flashlight_toggle();
            self.input.take_interact();
            return events;
        }

        horror::advance_timers(&mut self.state);
        player::apply_input(&mut self.state, &mut self.input, self.audio.as_mut());
        behavior::update(&mut self.state, &mut self.rng, self.audio.as_mut());
        resources::update(&mut self.state, &self.config, self.audio.as_mut());

        events.extend(collision::resolve_contacts(&mut self.state, &self.config, &mut self.deferred));
        if self.input.take_interact() && self.state.is_running() {
            events.extend(collision::collect_items(&mut self.state, &self.config, &mut self.rng));
        }

        if self.state.is_running() {
            events.extend(spawn::update_periodic(&mut self.state, &self.config, &mut self.rng));
            events.extend(horror::update(
                &mut self.state,
                &self.config,
                &mut self.rng,
                &mut self.deferred,
                self.audio.as_mut(),
            ));
        }

        events.extend(outcome::evaluate(&mut self.state, &self.config));
        self.sanitize();

        self.audio.play(AudioCue::Intensity {
            sanity: self.state.player.sanity,
            heart_rate: self.state.player.heart_rate,
        });

        if events.iter().any(|e| matches!(e, GameEvent::GameOver(_))) {
            self.deferred
                .schedule(self.state.clock.now_ms + GAME_OVER_STING_DELAY_MS, DeferredEffect::Sting);
        }

        events
    }

    fn run_deferred(&mut self, events: &mut Vec<GameEvent>) {
        for effect in self.deferred.drain_due(self.state.clock.now_ms) {
            debug!("Deferred effect {:?} fired", effect);
            match effect {
                DeferredEffect::RespawnEntity => {
                    if self.state.is_running() {
                        events.extend(spawn::spawn_reported(&mut self.state, &self.config, &mut self.rng));
                    }
                }
                DeferredEffect::ReactivateLight(index) => {
                    if let Some(light) = self.state.lights.get_mut(index) {
                        light.active = true;
                    }
                }
                DeferredEffect::Whisper => {
                    if self.state.is_running() && self.state.player.sanity < WHISPER_SANITY_GATE {
                        self.audio.play(AudioCue::EntityAmbient {
                            kind: EntityKind::Whisperer,
                            distance: WHISPER_CUE_DISTANCE,
                        });
                    }
                }
                DeferredEffect::Sting => self.audio.play(AudioCue::JumpScare),
            }
        }
    }

    /// Repair non-finite values before they can spread
    fn sanitize(&mut self) {
        self.state.player.clamp_resources(self.config.max_heart_rate);

        let center = Vec2::new(self.state.width / 2.0, self.state.height / 2.0);
        if !self.state.player.position.is_finite() {
            warn!("Fixed non-finite player position");
            self.state.player.position = center;
        }
        let (player_min, player_max) = self.state.player_bounds();
        self.state.player.position = self.state.player.position.clamp_to(player_min, player_max);

        for entity in &mut self.state.entities {
            if !entity.position.is_finite() {
                warn!("Fixed non-finite position for entity {}", entity.id);
                entity.position = center;
                entity.trail.clear();
            }
        }
    }

    /// Fire a specific horror event immediately, bypassing the cooldown gates
    pub fn trigger_horror(&mut self, kind: HorrorEventKind) -> bool {
        horror::apply(
            kind,
            &mut self.state,
            &self.config,
            &mut self.rng,
            &mut self.deferred,
            self.audio.as_mut(),
        )
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::from_game_state(&self.state)
    }

    pub fn hud(&self) -> HudView {
        HudView::from_game_state(&self.state)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_state(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Get mutable state reference
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of deferred effects still waiting to fire
    pub fn pending_effects(&self) -> usize {
        self.deferred.len()
    }
}
