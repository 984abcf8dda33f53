//! Player movement, facing and flashlight control

use std::f32::consts::{PI, TAU};

use crate::audio::{AudioCue, AudioSink};
use crate::game::constants::player::*;
use crate::game::input::InputState;
use crate::game::state::{GameState, Player};
use crate::util::vec2::Vec2;

/// Apply one tick of input to the player
pub fn apply_input(state: &mut GameState, input: &mut InputState, audio: &mut dyn AudioSink) {
    if input.take_flashlight_toggle() {
        toggle_flashlight(&mut state.player);
    }

    state.player.running = input.is_running();

    let direction = input.movement();
    if direction != Vec2::ZERO {
        let now_ms = state.clock.now_ms;
        let player = &mut state.player;
        let direction = direction.normalize();
        player.position += direction * player.current_speed();
        player.angle = direction.angle();

        let interval = if player.running {
            FOOTSTEP_INTERVAL_RUN_MS
        } else {
            FOOTSTEP_INTERVAL_WALK_MS
        };
        if now_ms - state.timers.last_footstep_ms > interval {
            audio.play(AudioCue::Footstep {
                running: player.running,
            });
            state.timers.last_footstep_ms = now_ms;
        }
    }

    let (min, max) = state.player_bounds();
    state.player.position = state.player.position.clamp_to(min, max);

    if let Some(pointer) = input.take_pointer() {
        look_at(&mut state.player, pointer);
    }
}

/// Flip the flashlight. Refuses to turn on with an empty battery.
///
/// Returns the new on/off state.
pub fn toggle_flashlight(player: &mut Player) -> bool {
    if player.flashlight_on {
        player.flashlight_on = false;
    } else if player.battery > 0.0 {
        player.flashlight_on = true;
    }
    player.flashlight_on
}

/// Ease the facing angle toward `target`
pub fn look_at(player: &mut Player, target: Vec2) {
    if target == player.position {
        return;
    }
    let desired = player.position.angle_to(target);
    let diff = wrap_angle(desired - player.angle);
    player.angle = wrap_angle(player.angle + diff * LOOK_EASING);
}

/// Wrap an angle into (-PI, PI]
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
