//! Entity spawning
//!
//! New entities always appear at least [`MIN_PLAYER_DISTANCE`] away from the
//! player. Positions are found by rejection sampling with a hard attempt cap;
//! when the playfield is too small to satisfy the constraint the spawn is
//! skipped instead of looping forever.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SimConfig;
use crate::game::constants::spawn::{MAX_ATTEMPTS, MIN_PLAYER_DISTANCE};
use crate::game::game_loop::GameEvent;
use crate::game::state::{Entity, EntityId, EntityKind, GameState};
use crate::util::vec2::Vec2;

/// Sample a position inside `[min, max]` at least `min_distance` from `avoid`.
///
/// Returns `None` after [`MAX_ATTEMPTS`] rejected draws.
pub fn sample_position(
    min: Vec2,
    max: Vec2,
    avoid: Vec2,
    min_distance: f32,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
        if candidate.distance_to(avoid) >= min_distance {
            return Some(candidate);
        }
    }
    None
}

/// Spawn one entity of a random kind.
///
/// Returns `None` at the entity cap or when no valid position was found.
pub fn spawn_entity(state: &mut GameState, config: &SimConfig, rng: &mut impl Rng) -> Option<EntityId> {
    if state.live_entity_count() >= config.max_entities {
        return None;
    }

    let kind = *EntityKind::ALL.choose(rng)?;
    let (min, max) = state.entity_bounds(kind.radius());
    let Some(position) = sample_position(min, max, state.player.position, MIN_PLAYER_DISTANCE, rng) else {
        tracing::warn!(
            "No spawn position {} units from the player after {} attempts, skipping spawn",
            MIN_PLAYER_DISTANCE,
            MAX_ATTEMPTS
        );
        return None;
    };

    let speed = rng.gen_range(kind.speed_range());
    let heading = rng.gen_range(0.0..std::f32::consts::TAU);
    let id = state.next_entity_id();
    let behavior = kind.initial_behavior(heading, state.clock.now_ms);
    state.entities.push(Entity::new(id, kind, position, speed, behavior));

    tracing::debug!("Spawned {:?} {} at ({:.0}, {:.0})", kind, id, position.x, position.y);
    Some(id)
}

/// Spawn one entity and describe it as a tick event
pub fn spawn_reported(state: &mut GameState, config: &SimConfig, rng: &mut impl Rng) -> Option<GameEvent> {
    let id = spawn_entity(state, config, rng)?;
    let kind = state.get_entity(id)?.kind;
    Some(GameEvent::EntitySpawned { entity_id: id, kind })
}

/// Spawn the opening batch of entities
pub fn spawn_initial(state: &mut GameState, config: &SimConfig, rng: &mut impl Rng) -> Vec<EntityId> {
    (0..config.initial_entities)
        .filter_map(|_| spawn_entity(state, config, rng))
        .collect()
}

/// Occasionally add an entity while below the cap
pub fn update_periodic(state: &mut GameState, config: &SimConfig, rng: &mut impl Rng) -> Option<GameEvent> {
    let now_ms = state.clock.now_ms;
    if now_ms - state.timers.last_spawn_ms <= config.entity_spawn_interval_ms {
        return None;
    }
    if state.live_entity_count() >= config.max_entities || !rng.gen_bool(config.entity_spawn_rate) {
        return None;
    }

    state.timers.last_spawn_ms = now_ms;
    spawn_reported(state, config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_respects_min_distance_and_bounds() {
        let config = SimConfig::default();
        let mut state = GameState::new(&config);
        let mut rng = StdRng::seed_from_u64(7);

        let ids = spawn_initial(&mut state, &config, &mut rng);
        assert_eq!(ids.len(), config.initial_entities);

        for e in &state.entities {
            assert!(e.position.distance_to(state.player.position) >= MIN_PLAYER_DISTANCE);
            assert!(e.position.x >= e.radius && e.position.x <= config.width - e.radius);
            assert!(e.position.y >= e.radius && e.position.y <= config.height - e.radius);
            let range = e.kind.speed_range();
            assert!(e.speed >= range.start && e.speed < range.end);
        }
    }

    #[test]
    fn test_spawn_stops_at_cap() {
        let config = SimConfig {
            max_entities: 3,
            initial_entities: 3,
            ..SimConfig::default()
        };
        let mut state = GameState::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        spawn_initial(&mut state, &config, &mut rng);

        assert_eq!(state.live_entity_count(), 3);
        assert!(spawn_entity(&mut state, &config, &mut rng).is_none());
        assert_eq!(state.live_entity_count(), 3);
    }

    #[test]
    fn test_spawn_gives_up_on_tiny_field() {
        let config = SimConfig {
            width: 200.0,
            height: 200.0,
            ..SimConfig::default()
        };
        let mut state = GameState::new(&config);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(spawn_entity(&mut state, &config, &mut rng).is_none());
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_sample_position_attempt_cap() {
        let mut rng = StdRng::seed_from_u64(9);
        let found = sample_position(Vec2::ZERO, Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0), 1000.0, &mut rng);
        assert!(found.is_none());
    }

    #[test]
    fn test_periodic_spawn_interval() {
        let config = SimConfig {
            entity_spawn_rate: 1.0,
            ..SimConfig::default()
        };
        let mut state = GameState::new(&config);
        let mut rng = StdRng::seed_from_u64(5);

        state.clock.now_ms = 900.0;
        assert!(update_periodic(&mut state, &config, &mut rng).is_none());

        state.clock.now_ms = 1001.0;
        let event = update_periodic(&mut state, &config, &mut rng);
        assert!(matches!(event, Some(GameEvent::EntitySpawned { .. })));
        assert_eq!(state.timers.last_spawn_ms, 1001.0);

        state.clock.now_ms = 1500.0;
        assert!(update_periodic(&mut state, &config, &mut rng).is_none());
    }

    #[test]
    fn test_periodic_spawn_roll_fails() {
        let config = SimConfig::default();
        let mut state = GameState::new(&config);
        state.clock.now_ms = 5000.0;
        let mut never = StepRng::new(u64::MAX, 0);
        assert!(update_periodic(&mut state, &config, &mut never).is_none());
        assert_eq!(state.timers.last_spawn_ms, 0.0);
    }
}
