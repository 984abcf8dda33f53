//! Collision and interaction resolver
//!
//! Entity contact punishes the player and removes the entity, queuing a
//! replacement. File pickup rewards the player and escalates the hunt.

use rand::Rng;

use crate::config::SimConfig;
use crate::game::constants::{contact, items, sanity, spawn};
use crate::game::deferred::{DeferredEffect, DeferredQueue};
use crate::game::game_loop::GameEvent;
use crate::game::outcome;
use crate::game::state::{EndReason, EntityId, GameState, Phase};
use crate::game::systems::spawn::spawn_reported;

/// Resolve every entity touching the player this tick
pub fn resolve_contacts(state: &mut GameState, config: &SimConfig, deferred: &mut DeferredQueue) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let player_pos = state.player.position;
    let player_radius = state.player.radius;

    let touching: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|e| e.position.distance_to(player_pos) < player_radius + e.radius)
        .map(|e| e.id)
        .collect();

    for id in touching {
        let Some(entity) = state.remove_entity(id) else {
            continue;
        };

        let player = &mut state.player;
        player.sanity = (player.sanity - contact::SANITY_PENALTY).max(0.0);
        if config.health_enabled {
            player.health = (player.health - contact::HEALTH_PENALTY).max(0.0);
        }
        state.overlays.screen_shake = contact::SCREEN_SHAKE;
        state.overlays.blood = contact::BLOOD_OVERLAY;

        let now_ms = state.clock.now_ms;
        deferred.schedule(now_ms + spawn::RESPAWN_DELAY_MS, DeferredEffect::RespawnEntity);

        tracing::debug!(
            "{:?} {} touched the player, sanity now {:.1}",
            entity.kind,
            entity.id,
            state.player.sanity
        );
        events.push(GameEvent::Contact {
            entity_id: entity.id,
            kind: entity.kind,
            sanity: state.player.sanity,
        });

        let fatal = state.player.sanity <= 0.0 || (config.health_enabled && state.player.health <= 0.0);
        if fatal {
            events.extend(outcome::finish(state, Phase::GameOver(EndReason::TouchedByEntity)));
            break;
        }
    }

    events
}

/// Collect every file within reach of the player
pub fn collect_items(state: &mut GameState, config: &SimConfig, rng: &mut impl Rng) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let player_pos = state.player.position;

    for index in 0..state.items.len() {
        let item = &mut state.items[index];
        if item.collected || item.position.distance_to(player_pos) >= items::PICKUP_RADIUS {
            continue;
        }

        item.collected = true;
        state.files_collected += 1;
        state.player.sanity = (state.player.sanity + items::SANITY_BONUS).min(sanity::MAX);
        tracing::debug!("Collected file {} ({}/{})", index, state.files_collected, state.total_files);
        events.push(GameEvent::ItemCollected {
            index,
            files_collected: state.files_collected,
        });

        for _ in 0..spawn::PER_FILE_COLLECTED {
            events.extend(spawn_reported(state, config, rng));
        }
    }

    if state.files_collected >= state.total_files {
        events.extend(outcome::finish(state, Phase::Won));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Entity, EntityKind, Item};
    use crate::util::vec2::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_state(config: &SimConfig) -> GameState {
        let mut state = GameState::new(config);
        state.player.position = Vec2::new(500.0, 400.0);
        state
    }

    fn push_entity(state: &mut GameState, position: Vec2) -> EntityId {
        let id = state.next_entity_id();
        let kind = EntityKind::Whisperer;
        state
            .entities
            .push(Entity::new(id, kind, position, 0.8, kind.initial_behavior(0.0, 0.0)));
        id
    }

    fn push_item(state: &mut GameState, position: Vec2) {
        state.items.push(Item {
            position,
            collected: false,
            glow: 0.0,
        });
    }

    #[test]
    fn test_contact_penalty_and_respawn_scheduled() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        let touching = push_entity(&mut state, Vec2::new(520.0, 400.0));
        push_entity(&mut state, Vec2::new(800.0, 400.0));
        state.clock.now_ms = 2000.0;
        let mut deferred = DeferredQueue::new();

        let events = resolve_contacts(&mut state, &config, &mut deferred);

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::Contact { entity_id, .. } if entity_id == touching));
        assert_eq!(state.player.sanity, 80.0);
        assert_eq!(state.player.health, 100.0);
        assert_eq!(state.live_entity_count(), 1);
        assert_eq!(state.overlays.screen_shake, contact::SCREEN_SHAKE);
        assert_eq!(state.overlays.blood, contact::BLOOD_OVERLAY);
        assert!(deferred.drain_due(2999.0).is_empty());
        assert_eq!(deferred.drain_due(3000.0), vec![DeferredEffect::RespawnEntity]);
    }

    #[test]
    fn test_near_miss_is_not_contact() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        // Exactly touching radii (8 + 15) does not count
        push_entity(&mut state, Vec2::new(523.0, 400.0));
        let mut deferred = DeferredQueue::new();

        assert!(resolve_contacts(&mut state, &config, &mut deferred).is_empty());
        assert!(deferred.is_empty());
    }

    #[test]
    fn test_fatal_contact_ends_session() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 15.0;
        push_entity(&mut state, Vec2::new(505.0, 400.0));
        push_entity(&mut state, Vec2::new(495.0, 400.0));
        let mut deferred = DeferredQueue::new();

        let events = resolve_contacts(&mut state, &config, &mut deferred);

        assert_eq!(state.phase, Phase::GameOver(EndReason::TouchedByEntity));
        assert!(events.contains(&GameEvent::GameOver(EndReason::TouchedByEntity)));
        // Processing stops at the fatal contact
        assert_eq!(state.live_entity_count(), 1);
    }

    #[test]
    fn test_contact_health_penalty_when_enabled() {
        let config = SimConfig {
            health_enabled: true,
            ..SimConfig::default()
        };
        let mut state = create_state(&config);
        push_entity(&mut state, Vec2::new(500.0, 410.0));
        resolve_contacts(&mut state, &config, &mut DeferredQueue::new());
        assert_eq!(state.player.health, 85.0);
    }

    #[test]
    fn test_pickup_rewards_and_escalates() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        state.player.sanity = 95.0;
        push_item(&mut state, Vec2::new(530.0, 400.0));
        push_item(&mut state, Vec2::new(600.0, 400.0));
        let mut rng = StdRng::seed_from_u64(11);

        let events = collect_items(&mut state, &config, &mut rng);

        assert_eq!(state.files_collected, 1);
        assert!(state.items[0].collected);
        assert!(!state.items[1].collected);
        assert_eq!(state.player.sanity, 100.0);
        assert_eq!(state.live_entity_count(), spawn::PER_FILE_COLLECTED);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EntitySpawned { .. }))
            .count();
        assert_eq!(spawned, spawn::PER_FILE_COLLECTED);
        assert!(state.is_running());
    }

    #[test]
    fn test_collected_items_are_not_recounted() {
        let config = SimConfig::default();
        let mut state = create_state(&config);
        push_item(&mut state, Vec2::new(500.0, 400.0));
        let mut rng = StdRng::seed_from_u64(2);

        collect_items(&mut state, &config, &mut rng);
        collect_items(&mut state, &config, &mut rng);
        assert_eq!(state.files_collected, 1);
    }

    #[test]
    fn test_collecting_all_files_wins() {
        let config = SimConfig {
            total_files: 2,
            ..SimConfig::default()
        };
        let mut state = create_state(&config);
        push_item(&mut state, Vec2::new(510.0, 400.0));
        push_item(&mut state, Vec2::new(490.0, 400.0));
        let mut rng = StdRng::seed_from_u64(4);

        let events = collect_items(&mut state, &config, &mut rng);

        assert_eq!(state.phase, Phase::Won);
        assert_eq!(state.files_collected, config.total_files);
        assert_eq!(events.last(), Some(&GameEvent::Won));
    }
}
