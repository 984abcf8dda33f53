//! Entity behavior engine
//!
//! Each tick every entity advances its own behavior variant against the
//! player's position and is then clamped back inside the playfield. The
//! interior is open, so only the border constrains movement and an entity
//! can never get stuck.

use rand::Rng;

use crate::audio::{AudioCue, AudioSink};
use crate::game::constants::entity::*;
use crate::game::state::{Behavior, Entity, GameState};
use crate::util::vec2::Vec2;

/// What happened to one entity during its step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Distance to the player before moving
    pub distance: f32,
    pub charge_started: bool,
    pub teleported: bool,
    pub screamed: bool,
}

/// Advance one entity by one tick.
///
/// `min`/`max` bound the entity's center; `now_ms` is simulation time.
pub fn step(
    entity: &mut Entity,
    player: Vec2,
    min: Vec2,
    max: Vec2,
    now_ms: f64,
    rng: &mut impl Rng,
) -> StepOutcome {
    entity.pulse += PULSE_STEP;
    entity.push_trail();

    let distance = entity.position.distance_to(player);
    let mut outcome = StepOutcome {
        distance,
        ..Default::default()
    };

    let Entity {
        position,
        speed,
        behavior,
        ..
    } = entity;

    match behavior {
        Behavior::Stalk => stalk(position, *speed, player, distance),
        Behavior::Charge { cooldown, heading } => {
            outcome.charge_started = charge(position, *speed, cooldown, heading, player, distance, rng);
        }
        Behavior::Scream => {
            outcome.screamed = distance < SCREAM_RADIUS && rng.gen_bool(SCREAM_PROBABILITY);
        }
        Behavior::Distort {
            heading,
            last_change_ms,
        } => {
            outcome.teleported = distort(
                position,
                *speed,
                heading,
                last_change_ms,
                player,
                distance,
                now_ms,
                rng,
            );
        }
    }

    *position = position.clamp_to(min, max);
    outcome
}

fn stalk(position: &mut Vec2, speed: f32, player: Vec2, distance: f32) {
    if distance > STALK_HOLD_DISTANCE {
        *position += Vec2::from_angle(position.angle_to(player)) * (speed * STALK_SPEED_FACTOR);
    }
}

/// Returns true when a new charge starts this tick
fn charge(
    position: &mut Vec2,
    speed: f32,
    cooldown: &mut u32,
    heading: &mut f32,
    player: Vec2,
    distance: f32,
    rng: &mut impl Rng,
) -> bool {
    let mut started = false;
    if *cooldown == 0 && distance < CHARGE_TRIGGER_RADIUS && rng.gen_bool(CHARGE_PROBABILITY) {
        *cooldown = CHARGE_TICKS;
        *heading = position.angle_to(player);
        started = true;
    }

    if *cooldown > 0 {
        *position += Vec2::from_angle(*heading) * (speed * CHARGE_SPEED_FACTOR);
        *cooldown -= 1;
    } else if distance > CHARGE_APPROACH_DISTANCE {
        *position += Vec2::from_angle(position.angle_to(player)) * speed;
    }
    started
}

/// Returns true when the entity teleported this tick
#[allow(clippy::too_many_arguments)]
fn distort(
    position: &mut Vec2,
    speed: f32,
    heading: &mut f32,
    last_change_ms: &mut f64,
    player: Vec2,
    distance: f32,
    now_ms: f64,
    rng: &mut impl Rng,
) -> bool {
    if now_ms - *last_change_ms > DISTORT_HEADING_INTERVAL_MS {
        *heading = rng.gen_range(0.0..std::f32::consts::TAU);
        *last_change_ms = now_ms;
    }

    if distance > TELEPORT_MIN_DISTANCE && rng.gen_bool(TELEPORT_PROBABILITY) {
        let offset = Vec2::new(
            (rng.gen::<f32>() - 0.5) * TELEPORT_SPAN,
            (rng.gen::<f32>() - 0.5) * TELEPORT_SPAN,
        );
        *position = player + offset;
        return true;
    }

    *position += Vec2::from_angle(*heading) * (speed * DISTORT_SPEED_FACTOR);
    false
}

/// Step every entity and fire their audio cues
pub fn update(state: &mut GameState, rng: &mut impl Rng, audio: &mut dyn AudioSink) {
    let player = state.player.position;
    let now_ms = state.clock.now_ms;

    for index in 0..state.entities.len() {
        let (min, max) = state.entity_bounds(state.entities[index].radius);
        let entity = &mut state.entities[index];
        let outcome = step(entity, player, min, max, now_ms, rng);

        if outcome.screamed {
            audio.play(AudioCue::Scream);
        }
        if outcome.teleported {
            tracing::debug!("Entity {} teleported next to the player", entity.id);
        }

        if outcome.distance < SOUND_RADIUS
            && now_ms - entity.last_sound_ms > SOUND_INTERVAL_MS + rng.gen::<f64>() * SOUND_JITTER_MS
        {
            audio.play(AudioCue::EntityAmbient {
                kind: entity.kind,
                distance: outcome.distance,
            });
            entity.last_sound_ms = now_ms;
        }
    }
}
