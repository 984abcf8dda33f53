//! Player resource model
//!
//! Sanity, health/fear, heart rate and flashlight battery all decay or drift
//! every tick. Nothing here decides the outcome of a session; the evaluator
//! reads the clamped values afterwards.

use crate::audio::{AudioCue, AudioSink};
use crate::config::SimConfig;
use crate::game::constants::{flashlight, health, heart, player, sanity};
use crate::game::spatial;
use crate::game::state::{Entity, GameState, Player};

/// Update all player resources for one tick
pub fn update(state: &mut GameState, config: &SimConfig, audio: &mut dyn AudioSink) {
    update_flashlight(&mut state.player, config);
    update_sanity(state, config);
    if config.health_enabled {
        update_health(state);
    }
    update_heart_rate(state, config, audio);
    update_breathing(state);

    state.player.clamp_resources(config.max_heart_rate);
}

/// Drain the battery while lit, recharge it while dark.
///
/// An empty battery forces the light off.
pub fn update_flashlight(player: &mut Player, config: &SimConfig) {
    if player.flashlight_on {
        player.battery -= config.flashlight_drain_rate;
        if player.battery <= 0.0 {
            player.battery = 0.0;
            player.flashlight_on = false;
            tracing::debug!("Flashlight battery depleted");
        }
    } else if config.battery_recharge_rate > 0.0 {
        player.battery = (player.battery + config.battery_recharge_rate).min(flashlight::MAX_BATTERY);
    }
}

/// Sanity lost this tick
pub fn sanity_drain(player: &Player, entities: &[Entity], config: &SimConfig) -> f32 {
    let nearby = spatial::count_within(player.position, entities, sanity::NEARBY_RADIUS);
    let mut drain = config.sanity_drain_rate + nearby as f32 * config.sanity_drain_near_entity;
    if !player.flashlight_on && player.battery <= 0.0 {
        drain += sanity::DARKNESS_DRAIN;
    }
    drain
}

fn update_sanity(state: &mut GameState, config: &SimConfig) {
    let drain = sanity_drain(&state.player, &state.entities, config);
    state.player.sanity = (state.player.sanity - drain).clamp(0.0, sanity::MAX);
}

fn update_health(state: &mut GameState) {
    let in_contact = spatial::count_within(state.player.position, &state.entities, health::CONTACT_RADIUS);
    let drain = health::DRAIN + in_contact as f32 * health::CONTACT_DRAIN;
    state.player.health = (state.player.health - drain).clamp(0.0, health::MAX);
}

/// Heart rate the player is drifting toward, capped at `max_heart_rate`
pub fn target_heart_rate(player: &Player, entities: &[Entity], max_heart_rate: f32) -> f32 {
    let fear = (sanity::MAX - player.sanity) * heart::SANITY_FACTOR;
    let proximity =
        spatial::proximity_pressure(player.position, entities, heart::PROXIMITY_RADIUS) * heart::PROXIMITY_FACTOR;
    let exertion = if player.running { heart::RUNNING_BONUS } else { 0.0 };
    (heart::RESTING + fear + proximity + exertion).min(max_heart_rate)
}

/// One step of exponential smoothing toward `target`
#[inline]
pub fn ease_heart_rate(current: f32, target: f32) -> f32 {
    current + (target - current) * heart::EASING
}

fn update_heart_rate(state: &mut GameState, config: &SimConfig, audio: &mut dyn AudioSink) {
    let target = target_heart_rate(&state.player, &state.entities, config.max_heart_rate);
    let rate = ease_heart_rate(state.player.heart_rate, target);
    state.player.heart_rate = rate;

    let now_ms = state.clock.now_ms;
    if rate > heart::AUDIBLE_THRESHOLD && now_ms - state.timers.last_heartbeat_ms > 60_000.0 / rate as f64 {
        audio.play(AudioCue::Heartbeat { rate });
        state.timers.last_heartbeat_ms = now_ms;
    }
}

fn update_breathing(state: &mut GameState) {
    let now_ms = state.clock.now_ms;
    if now_ms - state.timers.last_breath_ms > player::BREATH_INTERVAL_MS {
        state.overlays.breathing = player::BREATH_OVERLAY;
        state.timers.last_breath_ms = now_ms;
    }
}
