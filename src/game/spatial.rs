//! Proximity queries between the player and entities
//!
//! Entity counts stay in the tens, so every query is a linear scan.

use crate::game::state::{Entity, EntityId};
use crate::util::vec2::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance_to(b)
}

/// Number of entities strictly closer than `radius` to `origin`
pub fn count_within(origin: Vec2, entities: &[Entity], radius: f32) -> usize {
    entities
        .iter()
        .filter(|e| distance(origin, e.position) < radius)
        .count()
}

/// Sum of `radius - distance` over entities inside `radius`.
///
/// Zero when nothing is near; grows as entities close in.
pub fn proximity_pressure(origin: Vec2, entities: &[Entity], radius: f32) -> f32 {
    entities
        .iter()
        .map(|e| distance(origin, e.position))
        .filter(|&d| d < radius)
        .map(|d| radius - d)
        .sum()
}

/// Closest entity to `origin` and its distance
pub fn nearest(origin: Vec2, entities: &[Entity]) -> Option<(EntityId, f32)> {
    entities
        .iter()
        .map(|e| (e.id, distance(origin, e.position)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}
