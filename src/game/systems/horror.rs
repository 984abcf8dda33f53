//! Horror event scheduler
//!
//! Below a sanity threshold the scheduler occasionally fires one of six
//! events, gated by a global minimum interval and a separate jump-scare
//! lockout. Timed events live in `GameState::events` and count down once per
//! tick; delayed side effects go through the deferred queue.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::audio::{AudioCue, AudioSink};
use crate::config::SimConfig;
use crate::game::constants::horror::*;
use crate::game::constants::{items, lights, sanity};
use crate::game::deferred::{DeferredEffect, DeferredQueue};
use crate::game::game_loop::GameEvent;
use crate::game::state::{Apparition, GameState, HorrorEvent, HorrorEventKind};
use crate::util::vec2::Vec2;

/// Per-tick countdowns: overlays, active events, the jump-scare lockout and
/// the cosmetic light/file phases. All of them count ticks, not milliseconds.
pub fn advance_timers(state: &mut GameState) {
    state.overlays.decay();

    for event in &mut state.events {
        event.remaining = event.remaining.saturating_sub(1);
        if let Some(apparition) = &mut event.apparition {
            apparition.lifetime = apparition.lifetime.saturating_sub(1);
            apparition.alpha = apparition.lifetime as f32 / APPARITION_LIFETIME as f32;
        }
        if matches!(&event.apparition, Some(a) if a.lifetime == 0) {
            event.apparition = None;
        }
    }
    state.events.retain(|e| e.remaining > 0);

    let cooldown = &mut state.timers.jump_scare_cooldown_ticks;
    *cooldown = cooldown.saturating_sub(1);

    for light in &mut state.lights {
        light.flicker += lights::FLICKER_STEP;
    }
    for item in state.items.iter_mut().filter(|i| !i.collected) {
        item.glow += items::GLOW_STEP;
    }
}

/// Whether the cooldown gates allow an event right now
pub fn can_trigger(state: &GameState, config: &SimConfig) -> bool {
    state.clock.now_ms - state.timers.last_horror_ms >= config.horror_event_interval_ms
        && state.timers.jump_scare_cooldown_ticks == 0
}

/// Roll for a horror event this tick
pub fn update(
    state: &mut GameState,
    config: &SimConfig,
    rng: &mut impl Rng,
    deferred: &mut DeferredQueue,
    audio: &mut dyn AudioSink,
) -> Option<GameEvent> {
    if state.player.sanity >= config.horror_sanity_gate || !rng.gen_bool(config.horror_trigger_probability) {
        return None;
    }
    if !can_trigger(state, config) {
        return None;
    }

    state.timers.last_horror_ms = state.clock.now_ms;
    let kind = *HorrorEventKind::ALL.choose(rng)?;
    if apply(kind, state, config, rng, deferred, audio) {
        tracing::debug!("Horror event {:?} at sanity {:.1}", kind, state.player.sanity);
        Some(GameEvent::HorrorTriggered(kind))
    } else {
        None
    }
}

/// Apply one event's effects. Returns false if the event declined to fire.
pub fn apply(
    kind: HorrorEventKind,
    state: &mut GameState,
    config: &SimConfig,
    rng: &mut impl Rng,
    deferred: &mut DeferredQueue,
    audio: &mut dyn AudioSink,
) -> bool {
    let now_ms = state.clock.now_ms;
    match kind {
        HorrorEventKind::JumpScare => {
            if state.player.sanity >= config.jump_scare_sanity_gate || !rng.gen_bool(JUMP_SCARE_PROBABILITY) {
                return false;
            }
            state.timers.jump_scare_cooldown_ticks = config.jump_scare_cooldown_ticks;
            state.overlays.screen_shake = JUMP_SCARE_SHAKE;
            state.overlays.blood = JUMP_SCARE_BLOOD;
            drain_sanity(state, JUMP_SCARE_SANITY);

            let player = &state.player;
            let apparition = Apparition {
                position: player.position + Vec2::from_angle(player.angle) * APPARITION_DISTANCE,
                radius: APPARITION_RADIUS,
                alpha: 1.0,
                lifetime: APPARITION_LIFETIME,
            };
            state.events.push(HorrorEvent {
                kind,
                remaining: JUMP_SCARE_DURATION,
                intensity: 1.0,
                apparition: Some(apparition),
            });
            audio.play(AudioCue::JumpScare);
        }
        HorrorEventKind::WhisperBurst => {
            for i in 0..WHISPER_COUNT {
                deferred.schedule(now_ms + i as f64 * WHISPER_SPACING_MS, DeferredEffect::Whisper);
            }
            drain_sanity(state, WHISPER_SANITY);
        }
        HorrorEventKind::LightFlicker => {
            for (index, light) in state.lights.iter_mut().enumerate() {
                light.active = false;
                let delay = lights::REACTIVATE_BASE_MS + rng.gen::<f64>() * lights::REACTIVATE_JITTER_MS;
                deferred.schedule(now_ms + delay, DeferredEffect::ReactivateLight(index));
            }
        }
        HorrorEventKind::DistortionWave => {
            state.overlays.screen_shake = DISTORTION_SHAKE;
            state.overlays.static_noise = DISTORTION_STATIC;
            state.events.push(HorrorEvent {
                kind,
                remaining: DISTORTION_DURATION,
                intensity: DISTORTION_INTENSITY,
                apparition: None,
            });
        }
        HorrorEventKind::BloodVision => {
            state.overlays.blood = BLOOD_VISION_BLOOD;
            drain_sanity(state, BLOOD_VISION_SANITY);
        }
        HorrorEventKind::StaticBurst => {
            state.overlays.static_noise = STATIC_BURST_STATIC;
            state.events.push(HorrorEvent {
                kind,
                remaining: STATIC_BURST_DURATION,
                intensity: 1.0,
                apparition: None,
            });
        }
    }
    true
}

fn drain_sanity(state: &mut GameState, amount: f32) {
    state.player.sanity = (state.player.sanity - amount).clamp(0.0, sanity::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingAudio, SilentAudio};
    use crate::game::state::Light;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn create_state(config: &SimConfig) -> GameState {
        let mut state = GameState::new(config);
        state.clock.now_ms = 10_000.0;
        state
    }

    fn apply_silent(kind: HorrorEventKind, state: &mut GameState, config: &SimConfig, deferred: &mut DeferredQueue) -> bool {
        apply(kind, state, config, &mut always(), deferred, &mut SilentAudio)
    }

    #[test]
    fn test_no_trigger_while_sane() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        let mut deferred = DeferredQueue::new();
        let event = update(&mut state, &config, &mut always(), &mut deferred, &mut SilentAudio);
        assert!(event.is_none());
        assert_eq!(state.timers.last_horror_ms, 0.0);
    }

    #[test]
    fn test_trigger_sets_last_event_time() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 50.0;
        let mut deferred = DeferredQueue::new();
        let recorder = RecordingAudio::new();
        let mut sink = recorder.clone();

        // A zero draw selects the first kind and passes every roll
        let event = update(&mut state, &config, &mut always(), &mut deferred, &mut sink);

        assert_eq!(event, Some(GameEvent::HorrorTriggered(HorrorEventKind::JumpScare)));
        assert_eq!(state.timers.last_horror_ms, 10_000.0);
        assert_eq!(recorder.cues(), vec![AudioCue::JumpScare]);
    }

    #[test]
    fn test_interval_gate() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 50.0;
        state.timers.last_horror_ms = 8000.0;
        let mut deferred = DeferredQueue::new();

        assert!(!can_trigger(&state, &config));
        assert!(update(&mut state, &config, &mut always(), &mut deferred, &mut SilentAudio).is_none());

        state.clock.now_ms = 11_000.0;
        assert!(can_trigger(&state, &config));
    }

    #[test]
    fn test_jump_scare_cooldown_blocks_everything() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 50.0;
        let mut deferred = DeferredQueue::new();

        assert!(apply_silent(HorrorEventKind::JumpScare, &mut state, &config, &mut deferred));
        assert_eq!(state.timers.jump_scare_cooldown_ticks, config.jump_scare_cooldown_ticks);
        state.clock.now_ms += config.horror_event_interval_ms + 1.0;
        assert!(!can_trigger(&state, &config));

        for _ in 0..config.jump_scare_cooldown_ticks {
            advance_timers(&mut state);
        }
        assert!(can_trigger(&state, &config));
    }

    #[test]
    fn test_jump_scare_effects() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 60.0;
        state.player.angle = 0.0;
        let start = state.player.position;
        let mut deferred = DeferredQueue::new();

        assert!(apply_silent(HorrorEventKind::JumpScare, &mut state, &config, &mut deferred));

        assert_eq!(state.player.sanity, 45.0);
        assert_eq!(state.overlays.screen_shake, JUMP_SCARE_SHAKE);
        assert_eq!(state.overlays.blood, JUMP_SCARE_BLOOD);
        let event = &state.events[0];
        assert_eq!(event.remaining, JUMP_SCARE_DURATION);
        let apparition = event.apparition.as_ref().unwrap();
        assert!((apparition.position.x - (start.x + APPARITION_DISTANCE)).abs() < 1e-3);
    }

    #[test]
    fn test_jump_scare_declines_above_gate() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 75.0;
        let mut deferred = DeferredQueue::new();
        assert!(!apply_silent(HorrorEventKind::JumpScare, &mut state, &config, &mut deferred));
        assert!(state.events.is_empty());

        state.player.sanity = 50.0;
        let declined = apply(
            HorrorEventKind::JumpScare,
            &mut state,
            &config,
            &mut never(),
            &mut deferred,
            &mut SilentAudio,
        );
        assert!(!declined);
        assert_eq!(state.timers.jump_scare_cooldown_ticks, 0);
    }

    #[test]
    fn test_whisper_burst_is_staggered() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        let mut deferred = DeferredQueue::new();

        apply_silent(HorrorEventKind::WhisperBurst, &mut state, &config, &mut deferred);

        assert_eq!(state.player.sanity, 95.0);
        assert_eq!(deferred.pending(DeferredEffect::Whisper), 3);
        assert_eq!(deferred.drain_due(10_000.0).len(), 1);
        assert_eq!(deferred.drain_due(10_300.0).len(), 1);
        assert_eq!(deferred.drain_due(10_599.0).len(), 0);
        assert_eq!(deferred.drain_due(10_600.0).len(), 1);
    }

    #[test]
    fn test_light_flicker_reactivation_is_scheduled() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        for i in 0..3 {
            state.lights.push(Light {
                position: Vec2::new(100.0 * i as f32, 100.0),
                radius: 100.0,
                intensity: 0.5,
                flicker: 0.0,
                active: true,
            });
        }
        let mut deferred = DeferredQueue::new();
        let mut rng = StdRng::seed_from_u64(3);

        apply(HorrorEventKind::LightFlicker, &mut state, &config, &mut rng, &mut deferred, &mut SilentAudio);

        assert!(state.lights.iter().all(|l| !l.active));
        assert_eq!(deferred.len(), 3);
        assert!(deferred.drain_due(10_499.0).is_empty());
        let fired = deferred.drain_due(11_500.0);
        assert_eq!(fired.len(), 3);
        assert!(fired.contains(&DeferredEffect::ReactivateLight(2)));
    }

    #[test]
    fn test_timed_events_expire() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        let mut deferred = DeferredQueue::new();
        apply_silent(HorrorEventKind::StaticBurst, &mut state, &config, &mut deferred);
        apply_silent(HorrorEventKind::DistortionWave, &mut state, &config, &mut deferred);
        assert_eq!(state.events.len(), 2);

        for _ in 0..STATIC_BURST_DURATION {
            advance_timers(&mut state);
        }
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.events[0].kind, HorrorEventKind::DistortionWave);

        for _ in STATIC_BURST_DURATION..DISTORTION_DURATION {
            advance_timers(&mut state);
        }
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_apparition_fades() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 10.0;
        let mut deferred = DeferredQueue::new();
        apply_silent(HorrorEventKind::JumpScare, &mut state, &config, &mut deferred);

        advance_timers(&mut state);
        let alpha = state.events[0].apparition.as_ref().unwrap().alpha;
        assert!(alpha < 1.0 && alpha > 0.9);

        for _ in 1..APPARITION_LIFETIME {
            advance_timers(&mut state);
        }
        assert!(state.events[0].apparition.is_none());
        assert_eq!(state.events[0].remaining, JUMP_SCARE_DURATION - APPARITION_LIFETIME);
    }

    #[test]
    fn test_blood_vision() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        let mut deferred = DeferredQueue::new();
        apply_silent(HorrorEventKind::BloodVision, &mut state, &config, &mut deferred);
        assert_eq!(state.overlays.blood, BLOOD_VISION_BLOOD);
        assert_eq!(state.player.sanity, 90.0);
        assert!(state.events.is_empty());
    }
}
