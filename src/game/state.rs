//! Game state definitions and structures
//!
//! Holds the player, the hostile entities, collectible files, ambient lights,
//! overlay magnitudes and active horror events for one session.

use serde::Serialize;
use smallvec::SmallVec;

use crate::config::SimConfig;
use crate::game::clock::Clock;
use crate::game::constants::{entity, field, flashlight, health, heart, player, sanity};
use crate::util::vec2::Vec2;

/// Entity identifier, unique within a session
pub type EntityId = u64;

/// The player
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub position: Vec2,
    pub radius: f32,
    /// Walking speed in units per tick
    pub speed: f32,
    /// Multiplier applied to `speed` while running
    pub run_multiplier: f32,
    /// Facing angle (radians)
    pub angle: f32,
    /// Whether the run key is held this tick
    pub running: bool,

    /// Primary resource, 0-100
    pub sanity: f32,
    /// Secondary resource, 0-100 (only drained when enabled in config)
    pub health: f32,
    /// Beats per minute, eased toward a target every tick
    pub heart_rate: f32,

    /// Flashlight battery, 0-100
    pub battery: f32,
    pub flashlight_on: bool,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            radius: player::RADIUS,
            speed: player::SPEED,
            run_multiplier: player::RUN_MULTIPLIER,
            angle: 0.0,
            running: false,
            sanity: sanity::MAX,
            health: health::MAX,
            heart_rate: heart::RESTING,
            battery: flashlight::MAX_BATTERY,
            flashlight_on: true,
        }
    }

    /// Current movement speed, accounting for running
    pub fn current_speed(&self) -> f32 {
        if self.running {
            self.speed * self.run_multiplier
        } else {
            self.speed
        }
    }

    /// Clamp every resource into its valid range, repairing non-finite values.
    pub fn clamp_resources(&mut self, max_heart_rate: f32) {
        self.sanity = clamp_finite(self.sanity, 0.0, sanity::MAX, 0.0);
        self.health = clamp_finite(self.health, 0.0, health::MAX, 0.0);
        self.battery = clamp_finite(self.battery, 0.0, flashlight::MAX_BATTERY, 0.0);
        self.heart_rate = clamp_finite(self.heart_rate, heart::MIN, max_heart_rate, heart::RESTING);
        if !self.angle.is_finite() {
            self.angle = 0.0;
        }
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Entity archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    /// Slow, deliberate stalker
    Whisperer,
    /// Closes in, then lunges in straight lines
    Crawler,
    /// Stationary, screams when the player is near
    Screamer,
    /// Drifts erratically and teleports
    Distortion,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Whisperer,
        EntityKind::Crawler,
        EntityKind::Screamer,
        EntityKind::Distortion,
    ];

    pub fn radius(&self) -> f32 {
        match self {
            EntityKind::Whisperer => 15.0,
            EntityKind::Crawler => 12.0,
            EntityKind::Screamer => 20.0,
            EntityKind::Distortion => 25.0,
        }
    }

    /// Base speed range (units per tick) a spawned entity draws from
    pub fn speed_range(&self) -> std::ops::Range<f32> {
        match self {
            EntityKind::Whisperer => 0.6..1.0,
            EntityKind::Crawler => 0.8..1.4,
            EntityKind::Screamer => 0.4..0.7,
            EntityKind::Distortion => 0.3..0.5,
        }
    }

    /// Fresh behavior state for this archetype
    pub fn initial_behavior(&self, heading: f32, now_ms: f64) -> Behavior {
        match self {
            EntityKind::Whisperer => Behavior::Stalk,
            EntityKind::Crawler => Behavior::Charge {
                cooldown: 0,
                heading,
            },
            EntityKind::Screamer => Behavior::Scream,
            EntityKind::Distortion => Behavior::Distort {
                heading,
                last_change_ms: now_ms,
            },
        }
    }
}

/// Per-archetype behavior state. Timers live inside the variant that uses them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Behavior {
    Stalk,
    Charge {
        /// Remaining charge ticks; 0 when not charging
        cooldown: u32,
        /// Heading frozen at charge start
        heading: f32,
    },
    Scream,
    Distort {
        heading: f32,
        last_change_ms: f64,
    },
}

/// A hostile entity
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub behavior: Behavior,
    /// Render pulse phase
    pub pulse: f32,
    /// Time of the last ambient cue (ms)
    pub last_sound_ms: f64,
    /// Recent positions, newest first (renderer only)
    pub trail: SmallVec<[Vec2; entity::TRAIL_LEN]>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2, speed: f32, behavior: Behavior) -> Self {
        Self {
            id,
            kind,
            position,
            radius: kind.radius(),
            speed,
            behavior,
            pulse: 0.0,
            last_sound_ms: 0.0,
            trail: SmallVec::new(),
        }
    }

    /// Record the current position at the head of the trail
    pub fn push_trail(&mut self) {
        self.trail.insert(0, self.position);
        self.trail.truncate(entity::TRAIL_LEN);
    }

    /// Whether a charge is in progress
    pub fn is_charging(&self) -> bool {
        matches!(self.behavior, Behavior::Charge { cooldown, .. } if cooldown > 0)
    }
}

/// A collectible case file
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub position: Vec2,
    pub collected: bool,
    /// Render glow phase
    pub glow: f32,
}

/// An ambient light source
#[derive(Debug, Clone, Serialize)]
pub struct Light {
    pub position: Vec2,
    pub radius: f32,
    pub intensity: f32,
    /// Render flicker phase
    pub flicker: f32,
    pub active: bool,
}

/// Full-screen effect magnitudes. Each decays by one per tick.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Overlays {
    pub screen_shake: f32,
    pub blood: f32,
    pub static_noise: f32,
    pub breathing: f32,
}

impl Overlays {
    pub fn decay(&mut self) {
        for value in [
            &mut self.screen_shake,
            &mut self.blood,
            &mut self.static_noise,
            &mut self.breathing,
        ] {
            if *value > 0.0 {
                *value = (*value - 1.0).max(0.0);
            }
        }
    }
}

/// Horror event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HorrorEventKind {
    JumpScare,
    WhisperBurst,
    LightFlicker,
    DistortionWave,
    BloodVision,
    StaticBurst,
}

impl HorrorEventKind {
    pub const ALL: [HorrorEventKind; 6] = [
        HorrorEventKind::JumpScare,
        HorrorEventKind::WhisperBurst,
        HorrorEventKind::LightFlicker,
        HorrorEventKind::DistortionWave,
        HorrorEventKind::BloodVision,
        HorrorEventKind::StaticBurst,
    ];
}

/// Short-lived figure placed in front of the player by a jump scare
#[derive(Debug, Clone, Serialize)]
pub struct Apparition {
    pub position: Vec2,
    pub radius: f32,
    pub alpha: f32,
    /// Remaining ticks
    pub lifetime: u32,
}

/// An active timed horror event
#[derive(Debug, Clone, Serialize)]
pub struct HorrorEvent {
    pub kind: HorrorEventKind,
    /// Remaining ticks
    pub remaining: u32,
    pub intensity: f32,
    pub apparition: Option<Apparition>,
}

/// Why a session ended badly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// Sanity drained to zero
    SanityBroken,
    /// An entity contact drained the last of the player's sanity
    TouchedByEntity,
    /// Health/fear resource reached zero
    HealthDepleted,
}

impl EndReason {
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::SanityBroken => "Sanity broken",
            EndReason::TouchedByEntity => "Touched by the entity",
            EndReason::HealthDepleted => "Frightened to death",
        }
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Running,
    GameOver(EndReason),
    Won,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Running)
    }
}

/// Wall-clock-free throttles shared by the systems (all in simulation ms)
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Timers {
    pub last_footstep_ms: f64,
    pub last_breath_ms: f64,
    pub last_heartbeat_ms: f64,
    pub last_spawn_ms: f64,
    pub last_horror_ms: f64,
    /// Remaining jump-scare lockout in ticks
    pub jump_scare_cooldown_ticks: u32,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub clock: Clock,
    pub phase: Phase,
    /// Playfield extent
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub entities: Vec<Entity>,
    pub items: Vec<Item>,
    pub lights: Vec<Light>,
    pub overlays: Overlays,
    pub events: Vec<HorrorEvent>,
    pub files_collected: u32,
    pub total_files: u32,
    pub timers: Timers,
    next_entity_id: EntityId,
}

impl GameState {
    /// Empty state: player centered, no entities, items or lights.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            clock: Clock::new(),
            phase: Phase::Running,
            width: config.width,
            height: config.height,
            player: Player::new(Vec2::new(config.width / 2.0, config.height / 2.0)),
            entities: Vec::with_capacity(config.max_entities),
            items: Vec::new(),
            lights: Vec::new(),
            overlays: Overlays::default(),
            events: Vec::new(),
            files_collected: 0,
            total_files: config.total_files,
            timers: Timers::default(),
            next_entity_id: 1,
        }
    }

    /// Generate a new unique entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn live_entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Remove an entity by ID, returning it if present
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Box the center of an entity of `radius` must stay inside
    pub fn entity_bounds(&self, radius: f32) -> (Vec2, Vec2) {
        let min = Vec2::new(radius, radius);
        let max = Vec2::new(
            (self.width - radius).max(radius),
            (self.height - radius).max(radius),
        );
        (min, max)
    }

    /// Box the player must stay inside
    pub fn player_bounds(&self) -> (Vec2, Vec2) {
        self.entity_bounds(self.player.radius + field::PLAYER_BORDER_BUFFER)
    }

    pub fn files_remaining(&self) -> u32 {
        self.total_files.saturating_sub(self.files_collected)
    }
}
