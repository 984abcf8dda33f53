use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use asylum_sim::audio::TracingAudio;
use asylum_sim::autopilot::Autopilot;
use asylum_sim::config::SimConfig;
use asylum_sim::frontend::{JsonLinesRenderer, NullRenderer, Renderer};
use asylum_sim::game::constants::timing;
use asylum_sim::game::game_loop::{GameEvent, Simulation};
use asylum_sim::metrics::SessionMetrics;

/// Headless runner settings
#[derive(Debug, Clone)]
struct RunnerConfig {
    tick_rate: u32,
    /// Pace ticks to wall-clock time instead of running flat out
    realtime: bool,
    max_ticks: u64,
    rounds: u32,
    /// Optional JSON-lines frame trace
    trace_file: Option<PathBuf>,
    trace_every: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_rate: timing::TICK_RATE,
            realtime: false,
            max_ticks: timing::TICK_RATE as u64 * 60 * 10,
            rounds: 1,
            trace_file: None,
            trace_every: 1,
        }
    }
}

impl RunnerConfig {
    fn load_or_default() -> Self {
        let mut config = Self::default();

        env_override("ASYLUM_TICK_RATE", &mut config.tick_rate);
        env_override("ASYLUM_REALTIME", &mut config.realtime);
        env_override("ASYLUM_MAX_TICKS", &mut config.max_ticks);
        env_override("ASYLUM_ROUNDS", &mut config.rounds);
        env_override("ASYLUM_TRACE_EVERY", &mut config.trace_every);
        config.trace_file = std::env::var("ASYLUM_TRACE_FILE").ok().map(PathBuf::from);

        config.tick_rate = config.tick_rate.max(1);
        config.rounds = config.rounds.max(1);
        config
    }

    fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_rate as f64
    }
}

fn env_override<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.parse::<T>() {
            Ok(parsed) => *slot = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", key, raw),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Asylum simulation v{}", env!("CARGO_PKG_VERSION"));

    let sim_config = SimConfig::load_or_default();
    let runner = RunnerConfig::load_or_default();
    info!(
        "Configuration loaded: {} Hz, realtime={}, rounds={}, max_ticks={}",
        runner.tick_rate, runner.realtime, runner.rounds, runner.max_ticks
    );

    let renderer: Box<dyn Renderer> = match &runner.trace_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating trace file {}", path.display()))?;
            info!("Writing frame trace to {}", path.display());
            Box::new(JsonLinesRenderer::new(BufWriter::new(file), runner.trace_every))
        }
        None => Box::new(NullRenderer),
    };

    let sim = Simulation::new(sim_config).context("invalid simulation config")?.with_audio(TracingAudio);
    let metrics = Arc::new(SessionMetrics::new());

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        result = run(sim, renderer, runner, metrics.clone()) => result?,
        _ = shutdown => info!("Stopping early"),
    }

    let s = metrics.snapshot();
    info!(
        "Done: {} ticks, {} sessions, {} escaped, {} lost | tick p95 {}us, p99 {}us, max {}us",
        s.ticks,
        s.sessions,
        s.wins,
        s.deaths_sanity + s.deaths_contact + s.deaths_health,
        s.tick_time_p95_us,
        s.tick_time_p99_us,
        s.tick_time_max_us
    );
    debug!("Final metrics:\n{}", metrics.to_prometheus());

    Ok(())
}

/// Drive sessions with the autopilot until the round count or tick budget runs out
async fn run(
    mut sim: Simulation,
    mut renderer: Box<dyn Renderer>,
    runner: RunnerConfig,
    metrics: Arc<SessionMetrics>,
) -> anyhow::Result<()> {
    let tick_ms = runner.tick_ms();
    let mut ticker = interval(Duration::from_secs_f64(tick_ms / 1000.0));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let sender = sim.input_sender();
    let mut pilot = Autopilot::new();
    let stats_every = runner.tick_rate as u64 * 30;
    let start = Instant::now();
    let mut rounds_done = 0;

    info!("Game loop started at {} Hz (seed {})", runner.tick_rate, sim.seed());

    for tick in 1..=runner.max_ticks {
        if runner.realtime {
            ticker.tick().await;
        } else if tick % 256 == 0 {
            tokio::task::yield_now().await;
        }

        pilot.drive(sim.state(), &sender);

        let tick_start = Instant::now();
        let events = sim.tick(tick_ms);
        metrics.record_tick_time(tick_start.elapsed());
        metrics.record_events(&events);

        let hud = sim.hud();
        metrics.observe(&hud);
        renderer
            .render(&sim.snapshot(), &hud)
            .context("writing trace frame")?;

        for event in &events {
            debug!("Event: {:?}", event);
            if matches!(event, GameEvent::GameOver(_) | GameEvent::Won) {
                rounds_done += 1;
                info!("Round {}/{}: {}", rounds_done, runner.rounds, sim.summary());
            }
        }

        if rounds_done >= runner.rounds {
            break;
        }

        if tick % stats_every == 0 {
            let summary = sim.summary();
            info!(
                "Run: {}s, tick {}, {} entities, sanity {:.0}, files {}/{} | last tick {}us",
                start.elapsed().as_secs(),
                summary.ticks,
                summary.entities_present,
                summary.final_sanity,
                summary.files_collected,
                summary.total_files,
                metrics.snapshot().tick_time_us
            );
        }
    }

    if rounds_done < runner.rounds {
        info!("Tick budget exhausted mid-round: {}", sim.summary());
    }

    renderer.flush().context("flushing trace file")?;
    Ok(())
}
