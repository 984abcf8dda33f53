//! Session metrics
//!
//! Counters are updated from the tick loop and can be read from any task.
//! Output is Prometheus text or JSON, written by the runner on demand.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

use crate::game::game_loop::GameEvent;
use crate::game::snapshot::HudView;
use crate::game::state::EndReason;

/// Samples kept for tick-time percentiles
const TICK_HISTORY: usize = 1000;

#[derive(Debug)]
pub struct SessionMetrics {
    pub tick_count: AtomicU64,
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_p99_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,

    pub sessions_started: AtomicU64,
    pub wins: AtomicU64,
    pub deaths_sanity: AtomicU64,
    pub deaths_contact: AtomicU64,
    pub deaths_health: AtomicU64,

    pub contacts: AtomicU64,
    pub files_collected: AtomicU64,
    pub entities_spawned: AtomicU64,
    pub horror_events: AtomicU64,

    // Gauges from the latest HUD view
    pub live_entities: AtomicU64,
    /// Stored as sanity * 100
    pub sanity_centi: AtomicU64,
    pub heart_rate_bpm: AtomicU64,

    start_time: Instant,
    tick_history: RwLock<VecDeque<u64>>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_p99_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            sessions_started: AtomicU64::new(1),
            wins: AtomicU64::new(0),
            deaths_sanity: AtomicU64::new(0),
            deaths_contact: AtomicU64::new(0),
            deaths_health: AtomicU64::new(0),
            contacts: AtomicU64::new(0),
            files_collected: AtomicU64::new(0),
            entities_spawned: AtomicU64::new(0),
            horror_events: AtomicU64::new(0),
            live_entities: AtomicU64::new(0),
            sanity_centi: AtomicU64::new(10_000),
            heart_rate_bpm: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(TICK_HISTORY)),
        }
    }

    /// Record a tick time and update percentiles
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);
        self.tick_count.fetch_add(1, Ordering::Relaxed);

        let mut history = self.tick_history.write();
        history.push_back(us);
        while history.len() > TICK_HISTORY {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();

            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            let p99_idx = (sorted.len() as f32 * 0.99) as usize;

            self.tick_time_p95_us.store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_p99_us.store(sorted[p99_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_max_us.store(sorted.last().copied().unwrap_or(0), Ordering::Relaxed);
        }
    }

    /// Fold one tick's events into the counters
    pub fn record_events(&self, events: &[GameEvent]) {
        for event in events {
            let counter = match event {
                GameEvent::Contact { .. } => &self.contacts,
                GameEvent::ItemCollected { .. } => &self.files_collected,
                GameEvent::EntitySpawned { .. } => &self.entities_spawned,
                GameEvent::HorrorTriggered(_) => &self.horror_events,
                GameEvent::GameOver(EndReason::SanityBroken) => &self.deaths_sanity,
                GameEvent::GameOver(EndReason::TouchedByEntity) => &self.deaths_contact,
                GameEvent::GameOver(EndReason::HealthDepleted) => &self.deaths_health,
                GameEvent::Won => &self.wins,
                GameEvent::Restarted => &self.sessions_started,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Update gauges from the latest HUD view
    pub fn observe(&self, hud: &HudView) {
        self.live_entities.store(hud.entity_count as u64, Ordering::Relaxed);
        self.sanity_centi
            .store((hud.sanity.max(0.0) * 100.0).round() as u64, Ordering::Relaxed);
        self.heart_rate_bpm
            .store(hud.heart_rate.max(0.0).round() as u64, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |v: &AtomicU64| v.load(Ordering::Relaxed);
        MetricsSnapshot {
            ticks: load(&self.tick_count),
            tick_time_us: load(&self.tick_time_us),
            tick_time_p95_us: load(&self.tick_time_p95_us),
            tick_time_p99_us: load(&self.tick_time_p99_us),
            tick_time_max_us: load(&self.tick_time_max_us),
            sessions: load(&self.sessions_started),
            wins: load(&self.wins),
            deaths_sanity: load(&self.deaths_sanity),
            deaths_contact: load(&self.deaths_contact),
            deaths_health: load(&self.deaths_health),
            contacts: load(&self.contacts),
            files_collected: load(&self.files_collected),
            entities_spawned: load(&self.entities_spawned),
            horror_events: load(&self.horror_events),
            live_entities: load(&self.live_entities),
            sanity: load(&self.sanity_centi) as f32 / 100.0,
            heart_rate: load(&self.heart_rate_bpm),
            uptime_seconds: self.uptime_seconds(),
        }
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let s = self.snapshot();
        let mut output = String::with_capacity(2048);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("asylum_ticks_total", "Total ticks simulated", "counter", s.ticks);
        metric!("asylum_tick_time_microseconds", "Last tick time in microseconds", "gauge", s.tick_time_us);
        metric!("asylum_tick_time_p95_microseconds", "95th percentile tick time", "gauge", s.tick_time_p95_us);
        metric!("asylum_tick_time_p99_microseconds", "99th percentile tick time", "gauge", s.tick_time_p99_us);
        metric!("asylum_tick_time_max_microseconds", "Maximum tick time", "gauge", s.tick_time_max_us);

        metric!("asylum_sessions_total", "Sessions started", "counter", s.sessions);
        metric!("asylum_wins_total", "Sessions escaped", "counter", s.wins);
        output.push_str("# HELP asylum_deaths_total Sessions lost, by reason\n# TYPE asylum_deaths_total counter\n");
        for (reason, value) in [
            ("sanity", s.deaths_sanity),
            ("contact", s.deaths_contact),
            ("health", s.deaths_health),
        ] {
            output.push_str(&format!("asylum_deaths_total{{reason=\"{}\"}} {}\n", reason, value));
        }

        metric!("asylum_contacts_total", "Entity contacts", "counter", s.contacts);
        metric!("asylum_files_collected_total", "Files collected", "counter", s.files_collected);
        metric!("asylum_entities_spawned_total", "Entities spawned after session start", "counter", s.entities_spawned);
        metric!("asylum_horror_events_total", "Horror events fired", "counter", s.horror_events);

        metric!("asylum_live_entities", "Entities currently alive", "gauge", s.live_entities);
        metric!("asylum_sanity", "Current player sanity", "gauge", s.sanity);
        metric!("asylum_heart_rate_bpm", "Current player heart rate", "gauge", s.heart_rate);
        metric!("asylum_uptime_seconds", "Runner uptime in seconds", "counter", s.uptime_seconds);

        output
    }

    /// JSON format metrics
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain copy of the counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub tick_time_us: u64,
    pub tick_time_p95_us: u64,
    pub tick_time_p99_us: u64,
    pub tick_time_max_us: u64,
    pub sessions: u64,
    pub wins: u64,
    pub deaths_sanity: u64,
    pub deaths_contact: u64,
    pub deaths_health: u64,
    pub contacts: u64,
    pub files_collected: u64,
    pub entities_spawned: u64,
    pub horror_events: u64,
    pub live_entities: u64,
    pub sanity: f32,
    pub heart_rate: u64,
    pub uptime_seconds: u64,
}
