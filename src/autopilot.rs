//! Scripted input source for headless runs
//!
//! Plays the game through the same input channel a keyboard would use:
//! walks to the nearest uncollected file, backs away from entities that get
//! too close, presses interact in reach and restarts finished sessions.

use crate::game::constants::{items, player};
use crate::game::input::{InputEvent, InputSender, Key};
use crate::game::spatial;
use crate::game::state::{EntityId, GameState};
use crate::util::vec2::Vec2;

/// Entities closer than this are fled from
const AVOID_RADIUS: f32 = 120.0;

/// A direction key is held once its axis carries this share of the heading
const AXIS_THRESHOLD: f32 = 0.38;

/// Interact is pressed this far inside the pickup radius
const REACH_MARGIN: f32 = player::SPEED * player::RUN_MULTIPLIER;

/// Current goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Walk to the file at this index
    Collect(usize),
    /// Move away from this entity
    Flee(EntityId),
    /// Session is over, ask for a new one
    Restart,
    Idle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    run: bool,
}

impl HeldKeys {
    fn toward(direction: Vec2, run: bool) -> Self {
        let dir = direction.normalize();
        Self {
            up: dir.y < -AXIS_THRESHOLD,
            down: dir.y > AXIS_THRESHOLD,
            left: dir.x < -AXIS_THRESHOLD,
            right: dir.x > AXIS_THRESHOLD,
            run,
        }
    }

    fn keys(&self) -> [(Key, bool); 5] {
        [
            (Key::Up, self.up),
            (Key::Down, self.down),
            (Key::Left, self.left),
            (Key::Right, self.right),
            (Key::Run, self.run),
        ]
    }
}

/// Keyboard-equivalent bot for one session
#[derive(Debug, Default)]
pub struct Autopilot {
    held: HeldKeys,
    intent: Option<Intent>,
    restart_sent: bool,
    /// Run everywhere, not just when fleeing
    pub hurry: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> Option<Intent> {
        self.intent
    }

    /// Input events for the next tick, given the state after the last one.
    ///
    /// Only key transitions are emitted; interact is pressed on every tick
    /// the player is in reach of the target file.
    pub fn decide(&mut self, state: &GameState) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if state.phase.is_terminal() {
            self.intent = Some(Intent::Restart);
            // The restart clears the simulation's key state as well
            self.held = HeldKeys::default();
            if !self.restart_sent {
                self.restart_sent = true;
                events.push(InputEvent::KeyDown(Key::Restart));
            }
            return events;
        }
        self.restart_sent = false;

        let position = state.player.position;
        let (intent, target) = self.choose(state, position);
        self.intent = Some(intent);

        let wanted = match (intent, target) {
            (Intent::Flee(_), Some(threat)) => HeldKeys::toward(position - threat, true),
            (Intent::Collect(_), Some(file)) => HeldKeys::toward(file - position, self.hurry),
            _ => HeldKeys::default(),
        };

        for ((key, now), (_, before)) in wanted.keys().into_iter().zip(self.held.keys()) {
            if now != before {
                events.push(if now { InputEvent::KeyDown(key) } else { InputEvent::KeyUp(key) });
            }
        }
        self.held = wanted;

        if let (Intent::Collect(_), Some(file)) = (intent, target) {
            if position.distance_to(file) < items::PICKUP_RADIUS - REACH_MARGIN {
                events.push(InputEvent::KeyDown(Key::Interact));
            }
        }

        events
    }

    fn choose(&self, state: &GameState, position: Vec2) -> (Intent, Option<Vec2>) {
        if let Some((id, distance)) = spatial::nearest(position, &state.entities) {
            if distance < AVOID_RADIUS {
                let threat = state.get_entity(id).map(|e| e.position);
                return (Intent::Flee(id), threat);
            }
        }

        let file = state
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.collected)
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_to(position)
                    .partial_cmp(&b.position.distance_to(position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        match file {
            Some((index, item)) => (Intent::Collect(index), Some(item.position)),
            None => (Intent::Idle, None),
        }
    }

    /// Decide and push the events into a simulation's input channel.
    /// Returns how many were accepted.
    pub fn drive(&mut self, state: &GameState, sender: &InputSender) -> usize {
        self.decide(state)
            .into_iter()
            .filter(|&event| sender.try_send(event).is_ok())
            .count()
    }
}
