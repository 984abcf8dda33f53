use serde::{Deserialize, Serialize};

use crate::game::constants::{field, spawn};

/// Per-session simulation configuration.
///
/// Fixed once the session starts; systems only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Playfield width in world units
    pub width: f32,
    /// Playfield height in world units
    pub height: f32,
    /// Upper bound on live entities
    pub max_entities: usize,
    /// Entities spawned when a session starts
    pub initial_entities: usize,
    /// Files required to escape
    pub total_files: u32,
    /// Per-tick probability of a periodic entity spawn
    pub entity_spawn_rate: f64,
    /// Minimum time between periodic spawns (ms)
    pub entity_spawn_interval_ms: f64,
    /// Ambient sanity drain per tick
    pub sanity_drain_rate: f32,
    /// Additional sanity drain per tick for each nearby entity
    pub sanity_drain_near_entity: f32,
    /// Heart rate ceiling (bpm)
    pub max_heart_rate: f32,
    /// Battery drain per tick while the flashlight is on
    pub flashlight_drain_rate: f32,
    /// Battery recharge per tick while the flashlight is off (0 = never recharges)
    pub battery_recharge_rate: f32,
    /// Minimum time between horror events (ms)
    pub horror_event_interval_ms: f64,
    /// Lockout after a jump scare, in ticks
    pub jump_scare_cooldown_ticks: u32,
    /// Per-tick probability of attempting a horror event
    pub horror_trigger_probability: f64,
    /// Horror events are only attempted below this sanity
    pub horror_sanity_gate: f32,
    /// Jump scares are only possible below this sanity
    pub jump_scare_sanity_gate: f32,
    /// Enable the health/fear resource as a second failure condition
    pub health_enabled: bool,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: field::WIDTH,
            height: field::HEIGHT,
            max_entities: 20,
            initial_entities: 10,
            total_files: 5,
            entity_spawn_rate: 0.03,
            entity_spawn_interval_ms: spawn::PERIODIC_INTERVAL_MS,
            sanity_drain_rate: 0.05,
            sanity_drain_near_entity: 0.3,
            max_heart_rate: 180.0,
            flashlight_drain_rate: 0.1,
            battery_recharge_rate: 0.0,
            horror_event_interval_ms: 3000.0,
            jump_scare_cooldown_ticks: 10_000,
            horror_trigger_probability: 0.01,
            horror_sanity_gate: 80.0,
            jump_scare_sanity_gate: 70.0,
            health_enabled: false,
            seed: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Playfield must be positive, got {width}x{height}")]
    EmptyField { width: f32, height: f32 },
    #[error("initial_entities ({initial}) cannot exceed max_entities ({max})")]
    TooManyInitialEntities { initial: usize, max: usize },
    #[error("total_files must be at least 1")]
    NoFiles,
    #[error("{0} must be non-negative")]
    NegativeRate(&'static str),
    #[error("{0} must be a probability in [0, 1]")]
    InvalidProbability(&'static str),
    #[error("max_heart_rate ({0}) is below the resting minimum")]
    HeartRateTooLow(f32),
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("ASYLUM_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid ASYLUM_SEED '{}', using random seed", seed),
            }
        }

        override_from_env("ASYLUM_MAX_ENTITIES", &mut config.max_entities);
        override_from_env("ASYLUM_INITIAL_ENTITIES", &mut config.initial_entities);
        override_from_env("ASYLUM_TOTAL_FILES", &mut config.total_files);
        override_from_env("ASYLUM_SPAWN_RATE", &mut config.entity_spawn_rate);
        override_from_env("ASYLUM_SPAWN_INTERVAL_MS", &mut config.entity_spawn_interval_ms);
        override_from_env("ASYLUM_SANITY_DRAIN", &mut config.sanity_drain_rate);
        override_from_env("ASYLUM_SANITY_DRAIN_NEAR", &mut config.sanity_drain_near_entity);
        override_from_env("ASYLUM_MAX_HEART_RATE", &mut config.max_heart_rate);
        override_from_env("ASYLUM_FLASHLIGHT_DRAIN", &mut config.flashlight_drain_rate);
        override_from_env("ASYLUM_BATTERY_RECHARGE", &mut config.battery_recharge_rate);
        override_from_env("ASYLUM_HORROR_INTERVAL_MS", &mut config.horror_event_interval_ms);
        override_from_env("ASYLUM_JUMP_SCARE_COOLDOWN_TICKS", &mut config.jump_scare_cooldown_ticks);
        override_from_env("ASYLUM_HEALTH", &mut config.health_enabled);

        if let Err(e) = config.validate() {
            tracing::warn!("Invalid configuration ({}), using defaults", e);
            return Self {
                seed: config.seed,
                ..Self::default()
            };
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::EmptyField {
                width: self.width,
                height: self.height,
            });
        }
        if self.initial_entities > self.max_entities {
            return Err(ConfigError::TooManyInitialEntities {
                initial: self.initial_entities,
                max: self.max_entities,
            });
        }
        if self.total_files == 0 {
            return Err(ConfigError::NoFiles);
        }

        let rates = [
            ("sanity_drain_rate", self.sanity_drain_rate),
            ("sanity_drain_near_entity", self.sanity_drain_near_entity),
            ("flashlight_drain_rate", self.flashlight_drain_rate),
            ("battery_recharge_rate", self.battery_recharge_rate),
        ];
        for (name, rate) in rates {
            if !(rate >= 0.0) {
                return Err(ConfigError::NegativeRate(name));
            }
        }
        if !(self.entity_spawn_interval_ms >= 0.0) {
            return Err(ConfigError::NegativeRate("entity_spawn_interval_ms"));
        }
        if !(self.horror_event_interval_ms >= 0.0) {
            return Err(ConfigError::NegativeRate("horror_event_interval_ms"));
        }

        let probabilities = [
            ("entity_spawn_rate", self.entity_spawn_rate),
            ("horror_trigger_probability", self.horror_trigger_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability(name));
            }
        }

        if !(self.max_heart_rate >= crate::game::constants::heart::RESTING) {
            return Err(ConfigError::HeartRateTooLow(self.max_heart_rate));
        }
        Ok(())
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse::<T>() {
            Ok(parsed) => *slot = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", key, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.max_entities, 20);
        assert_eq!(config.total_files, 5);
        assert!((config.sanity_drain_rate - 0.05).abs() < f32::EPSILON);
        assert!(!config.health_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default() {
        let config = SimConfig::load_or_default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_field() {
        let config = SimConfig {
            width: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyField { .. })));
    }

    #[test]
    fn test_rejects_initial_over_max() {
        let config = SimConfig {
            initial_entities: 30,
            max_entities: 20,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyInitialEntities { initial: 30, max: 20 })
        );
    }

    #[test]
    fn test_rejects_negative_rate() {
        let config = SimConfig {
            sanity_drain_rate: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeRate("sanity_drain_rate"))
        );
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = SimConfig {
            entity_spawn_rate: 1.5,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProbability("entity_spawn_rate"))
        );
    }

    #[test]
    fn test_rejects_low_heart_ceiling() {
        let config = SimConfig {
            max_heart_rate: 50.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::HeartRateTooLow(_))));
    }
}
