/// Frame timing
pub mod timing {
    /// Nominal display refresh rate the simulation is tuned for
    pub const TICK_RATE: u32 = 60;
    /// Milliseconds of simulation time per nominal tick
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;
}

/// Playfield constants
pub mod field {
    pub const WIDTH: f32 = 1024.0;
    pub const HEIGHT: f32 = 768.0;
    /// Extra margin kept between the player and the border
    pub const PLAYER_BORDER_BUFFER: f32 = 10.0;
}

/// Player constants
pub mod player {
    pub const RADIUS: f32 = 8.0;
    /// Walking speed in units per tick
    pub const SPEED: f32 = 2.0;
    /// Speed multiplier while running
    pub const RUN_MULTIPLIER: f32 = 2.0;
    /// Fraction of the angular difference closed per pointer update
    pub const LOOK_EASING: f32 = 0.3;
    /// Footstep interval while walking (ms)
    pub const FOOTSTEP_INTERVAL_WALK_MS: f64 = 400.0;
    /// Footstep interval while running (ms)
    pub const FOOTSTEP_INTERVAL_RUN_MS: f64 = 200.0;
    /// Interval between breaths (ms)
    pub const BREATH_INTERVAL_MS: f64 = 3000.0;
    /// Breathing overlay magnitude set on each breath
    pub const BREATH_OVERLAY: f32 = 5.0;
}

/// Entity constants
pub mod entity {
    /// Trail capacity (renderer only)
    pub const TRAIL_LEN: usize = 10;
    /// Pulse phase advance per tick (renderer only)
    pub const PULSE_STEP: f32 = 0.05;

    /// Stalk: hold position inside this distance
    pub const STALK_HOLD_DISTANCE: f32 = 100.0;
    pub const STALK_SPEED_FACTOR: f32 = 0.7;

    /// Charge: player must be inside this radius to start a charge
    pub const CHARGE_TRIGGER_RADIUS: f32 = 200.0;
    /// Charge: per-tick probability to start when eligible
    pub const CHARGE_PROBABILITY: f64 = 0.01;
    /// Charge duration in ticks
    pub const CHARGE_TICKS: u32 = 120;
    pub const CHARGE_SPEED_FACTOR: f32 = 2.0;
    /// Charge: approach at base speed only beyond this distance
    pub const CHARGE_APPROACH_DISTANCE: f32 = 80.0;

    /// Scream: player must be inside this radius
    pub const SCREAM_RADIUS: f32 = 150.0;
    pub const SCREAM_PROBABILITY: f64 = 0.001;

    /// Distort: heading re-roll interval (ms)
    pub const DISTORT_HEADING_INTERVAL_MS: f64 = 2000.0;
    pub const DISTORT_SPEED_FACTOR: f32 = 0.5;
    /// Distort: teleport only when farther than this
    pub const TELEPORT_MIN_DISTANCE: f32 = 300.0;
    pub const TELEPORT_PROBABILITY: f64 = 0.002;
    /// Distort: teleport lands within +/- half of this span around the player
    pub const TELEPORT_SPAN: f32 = 100.0;

    /// Ambient cue audible range
    pub const SOUND_RADIUS: f32 = 250.0;
    /// Ambient cue base interval (ms)
    pub const SOUND_INTERVAL_MS: f64 = 3000.0;
    /// Ambient cue random extra interval (ms)
    pub const SOUND_JITTER_MS: f64 = 4000.0;
}

/// Spawn constants
pub mod spawn {
    /// Minimum distance from the player for any spawn
    pub const MIN_PLAYER_DISTANCE: f32 = 300.0;
    /// Maximum rejection-sampling attempts before a spawn is skipped
    pub const MAX_ATTEMPTS: u32 = 64;
    /// Delay before a touched entity is replaced (ms)
    pub const RESPAWN_DELAY_MS: f64 = 1000.0;
    /// Minimum interval between periodic spawns (ms)
    pub const PERIODIC_INTERVAL_MS: f64 = 1000.0;
    /// Entities spawned for each collected file
    pub const PER_FILE_COLLECTED: usize = 2;
}

/// Sanity constants
pub mod sanity {
    pub const MAX: f32 = 100.0;
    /// Radius inside which entities accelerate sanity drain
    pub const NEARBY_RADIUS: f32 = 200.0;
    /// Drain per tick while in total darkness
    pub const DARKNESS_DRAIN: f32 = 0.1;
}

/// Heart rate constants
pub mod heart {
    pub const RESTING: f32 = 72.0;
    pub const MIN: f32 = 60.0;
    /// Beats per minute added per point of missing sanity
    pub const SANITY_FACTOR: f32 = 0.8;
    /// Radius inside which entities raise the target rate
    pub const PROXIMITY_RADIUS: f32 = 150.0;
    pub const PROXIMITY_FACTOR: f32 = 0.2;
    pub const RUNNING_BONUS: f32 = 20.0;
    /// Exponential smoothing factor toward the target rate
    pub const EASING: f32 = 0.1;
    /// Heartbeat cue only above this rate
    pub const AUDIBLE_THRESHOLD: f32 = 100.0;
}

/// Flashlight constants
pub mod flashlight {
    pub const MAX_BATTERY: f32 = 100.0;
}

/// Health/fear constants (second failure resource)
pub mod health {
    pub const MAX: f32 = 100.0;
    /// Continuous drain per tick
    pub const DRAIN: f32 = 0.01;
    /// Radius inside which an entity is considered in contact range
    pub const CONTACT_RADIUS: f32 = 50.0;
    /// Drain per tick per entity in contact range
    pub const CONTACT_DRAIN: f32 = 0.5;
}

/// Entity-player contact constants
pub mod contact {
    pub const SANITY_PENALTY: f32 = 20.0;
    pub const HEALTH_PENALTY: f32 = 15.0;
    pub const SCREEN_SHAKE: f32 = 10.0;
    pub const BLOOD_OVERLAY: f32 = 5.0;
}

/// File pickup constants
pub mod items {
    pub const PICKUP_RADIUS: f32 = 40.0;
    pub const SANITY_BONUS: f32 = 10.0;
    /// Glow phase advance per tick (renderer only)
    pub const GLOW_STEP: f32 = 0.05;
}

/// Ambient light constants
pub mod lights {
    pub const COUNT: usize = 6;
    pub const RADIUS_MIN: f32 = 80.0;
    pub const RADIUS_MAX: f32 = 200.0;
    pub const INTENSITY_MIN: f32 = 0.4;
    pub const INTENSITY_MAX: f32 = 0.7;
    /// Probability a light starts switched on
    pub const ACTIVE_PROBABILITY: f64 = 0.7;
    pub const FLICKER_STEP: f32 = 0.1;
    /// Reactivation delay after a flicker event: base + U(0, jitter) ms
    pub const REACTIVATE_BASE_MS: f64 = 500.0;
    pub const REACTIVATE_JITTER_MS: f64 = 1000.0;
}

/// Session layout constants
pub mod layout {
    /// Map grid cell size
    pub const TILE_SIZE: f32 = 64.0;
    /// Grid cells holding the case files, in placement order
    pub const FILE_TILES: [(u32, u32); 5] = [(2, 2), (13, 2), (2, 9), (13, 9), (8, 6)];
}

/// Horror event constants
pub mod horror {
    pub const JUMP_SCARE_SHAKE: f32 = 15.0;
    pub const JUMP_SCARE_BLOOD: f32 = 10.0;
    pub const JUMP_SCARE_SANITY: f32 = 15.0;
    pub const JUMP_SCARE_DURATION: u32 = 60;
    /// Distance ahead of the player where the apparition appears
    pub const APPARITION_DISTANCE: f32 = 50.0;
    pub const APPARITION_RADIUS: f32 = 25.0;
    pub const APPARITION_LIFETIME: u32 = 30;
    /// Probability the jump-scare roll succeeds once selected
    pub const JUMP_SCARE_PROBABILITY: f64 = 0.5;

    pub const WHISPER_COUNT: u32 = 3;
    pub const WHISPER_SPACING_MS: f64 = 300.0;
    pub const WHISPER_SANITY_GATE: f32 = 80.0;
    pub const WHISPER_SANITY: f32 = 5.0;
    /// Distance reported to the audio engine for whisper cues
    pub const WHISPER_CUE_DISTANCE: f32 = 100.0;

    pub const DISTORTION_SHAKE: f32 = 8.0;
    pub const DISTORTION_STATIC: f32 = 5.0;
    pub const DISTORTION_DURATION: u32 = 30;
    pub const DISTORTION_INTENSITY: f32 = 0.3;

    pub const BLOOD_VISION_BLOOD: f32 = 20.0;
    pub const BLOOD_VISION_SANITY: f32 = 10.0;

    pub const STATIC_BURST_STATIC: f32 = 10.0;
    pub const STATIC_BURST_DURATION: u32 = 15;

    /// Delay of the final sting after a game over (ms)
    pub const GAME_OVER_STING_DELAY_MS: f64 = 500.0;
}

/// HUD overlay normalization
pub mod hud {
    pub const BLOOD_SCALE: f32 = 30.0;
    pub const STATIC_SCALE: f32 = 10.0;
    pub const BREATHING_SCALE: f32 = 10.0;
}
