//! One-time session setup: case files and ambient lights

use rand::Rng;

use crate::config::SimConfig;
use crate::game::constants::layout::{FILE_TILES, TILE_SIZE};
use crate::game::constants::lights;
use crate::game::state::{GameState, Item, Light};
use crate::util::vec2::Vec2;

/// Center of a grid cell
pub fn tile_center(gx: u32, gy: u32) -> Vec2 {
    Vec2::new(gx as f32 * TILE_SIZE + TILE_SIZE / 2.0, gy as f32 * TILE_SIZE + TILE_SIZE / 2.0)
}

/// Place files and lights for a fresh session
pub fn populate(state: &mut GameState, config: &SimConfig, rng: &mut impl Rng) {
    state.items = place_files(state, config.total_files as usize, rng);
    state.lights = place_lights(state, lights::COUNT, rng);
}

/// File positions: the fixed tiles first, then random spots for any extras.
/// Everything is clamped inside the playfield.
pub fn place_files(state: &GameState, count: usize, rng: &mut impl Rng) -> Vec<Item> {
    let margin = TILE_SIZE / 2.0;
    let (min, max) = state.entity_bounds(margin);

    (0..count)
        .map(|i| {
            let position = match FILE_TILES.get(i) {
                Some(&(gx, gy)) => tile_center(gx, gy),
                None => Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y)),
            };
            Item {
                position: position.clamp_to(min, max),
                collected: false,
                glow: 0.0,
            }
        })
        .collect()
}

pub fn place_lights(state: &GameState, count: usize, rng: &mut impl Rng) -> Vec<Light> {
    (0..count)
        .map(|_| Light {
            position: Vec2::new(rng.gen_range(0.0..=state.width), rng.gen_range(0.0..=state.height)),
            radius: rng.gen_range(lights::RADIUS_MIN..lights::RADIUS_MAX),
            intensity: rng.gen_range(lights::INTENSITY_MIN..lights::INTENSITY_MAX),
            flicker: rng.gen_range(0.0..std::f32::consts::TAU),
            active: rng.gen_bool(lights::ACTIVE_PROBABILITY),
        })
        .collect()
}
