//! Read-only views handed to the renderer and the HUD

use serde::Serialize;

use crate::game::constants::hud;
use crate::game::state::{
    Entity, EntityId, EntityKind, GameState, HorrorEvent, Item, Light, Overlays, Phase, Player,
};
use crate::util::vec2::Vec2;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub time_ms: f64,
    pub phase: Phase,
    pub width: f32,
    pub height: f32,
    pub player: PlayerSnapshot,
    pub entities: Vec<EntitySnapshot>,
    pub items: Vec<Item>,
    pub lights: Vec<Light>,
    pub events: Vec<HorrorEvent>,
    pub overlays: Overlays,
}

impl RenderSnapshot {
    pub fn from_game_state(state: &GameState) -> Self {
        Self {
            tick: state.clock.tick,
            time_ms: state.clock.now_ms,
            phase: state.phase,
            width: state.width,
            height: state.height,
            player: PlayerSnapshot::from_player(&state.player),
            entities: state
                .entities
                .iter()
                .map(EntitySnapshot::from_entity)
                .collect(),
            items: state.items.clone(),
            lights: state.lights.clone(),
            events: state.events.clone(),
            overlays: state.overlays,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub radius: f32,
    pub angle: f32,
    pub flashlight_on: bool,
    pub battery: f32,
}

impl PlayerSnapshot {
    pub fn from_player(player: &Player) -> Self {
        Self {
            position: player.position,
            radius: player.radius,
            angle: player.angle,
            flashlight_on: player.flashlight_on,
            battery: player.battery,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub radius: f32,
    pub pulse: f32,
    pub charging: bool,
    pub trail: Vec<Vec2>,
}

impl EntitySnapshot {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            position: entity.position,
            radius: entity.radius,
            pulse: entity.pulse,
            charging: entity.is_charging(),
            trail: entity.trail.to_vec(),
        }
    }
}

/// HUD notification, pushed one way after every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudView {
    pub sanity: f32,
    pub health: f32,
    pub heart_rate: f32,
    pub battery: f32,
    pub entity_count: usize,
    pub files_collected: u32,
    pub total_files: u32,
    pub files_remaining: u32,
    /// Overlay opacities in [0, 1]
    pub blood_opacity: f32,
    pub static_opacity: f32,
    pub breathing_opacity: f32,
}

impl HudView {
    pub fn from_game_state(state: &GameState) -> Self {
        let overlays = &state.overlays;
        Self {
            sanity: state.player.sanity,
            health: state.player.health,
            heart_rate: state.player.heart_rate,
            battery: state.player.battery,
            entity_count: state.live_entity_count(),
            files_collected: state.files_collected,
            total_files: state.total_files,
            files_remaining: state.files_remaining(),
            blood_opacity: opacity(overlays.blood, hud::BLOOD_SCALE),
            static_opacity: opacity(overlays.static_noise, hud::STATIC_SCALE),
            breathing_opacity: opacity(overlays.breathing, hud::BREATHING_SCALE),
        }
    }
}

fn opacity(magnitude: f32, scale: f32) -> f32 {
    (magnitude / scale).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_hud_opacities() {
        let mut state = GameState::new(&SimConfig::default());
        state.overlays.blood = 15.0;
        state.overlays.static_noise = 20.0;
        state.overlays.breathing = 5.0;

        let hud = HudView::from_game_state(&state);
        assert_eq!(hud.blood_opacity, 0.5);
        assert_eq!(hud.static_opacity, 1.0);
        assert_eq!(hud.breathing_opacity, 0.5);
        assert_eq!(hud.entity_count, 0);
        assert_eq!(hud.total_files, 5);
        assert_eq!(hud.files_remaining, 5);
    }

    #[test]
    fn test_snapshot_lists_every_entity() {
        let mut state = GameState::new(&SimConfig::default());
        for kind in [EntityKind::Crawler, EntityKind::Screamer] {
            let id = state.next_entity_id();
            let e = Entity::new(id, kind, Vec2::new(10.0, 10.0), 1.0, kind.initial_behavior(0.0, 0.0));
            state.entities.push(e);
        }

        let snapshot = RenderSnapshot::from_game_state(&state);
        let ids: Vec<_> = snapshot.entities.iter().map(|e| e.id).collect();
        let expected: Vec<_> = state.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(snapshot.phase, Phase::Running);
        assert!(serde_json::to_string(&snapshot).is_ok());
    }
}
