//! Tick benchmarks
//!
//! Run with: cargo bench --bench tick

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use asylum_sim::audio::SilentAudio;
use asylum_sim::config::SimConfig;
use asylum_sim::game::constants::{sanity, timing};
use asylum_sim::game::game_loop::Simulation;
use asylum_sim::game::spatial;
use asylum_sim::game::state::GameState;
use asylum_sim::game::systems::{behavior, spawn};

fn config_with_entities(count: usize) -> SimConfig {
    SimConfig {
        max_entities: count,
        initial_entities: count,
        seed: Some(7),
        ..SimConfig::default()
    }
}

/// State populated with `count` entities
fn create_state(count: usize) -> (GameState, StdRng) {
    let config = config_with_entities(count);
    let mut state = GameState::new(&config);
    let mut rng = StdRng::seed_from_u64(7);
    spawn::spawn_initial(&mut state, &config, &mut rng);
    (state, rng)
}

/// Benchmark entity behaviors at various entity counts
fn bench_behavior(c: &mut Criterion) {
    let mut group = c.benchmark_group("behavior");
    group.sample_size(50);

    for count in [10, 20, 50, 100] {
        let (mut state, mut rng) = create_state(count);
        let mut audio = SilentAudio;

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("update", count), &count, |b, _| {
            b.iter(|| behavior::update(&mut state, &mut rng, &mut audio))
        });
    }
    group.finish();
}

/// Benchmark the proximity scan used by sanity drain
fn bench_proximity(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity");

    for count in [20, 100] {
        let (state, _) = create_state(count);
        let origin = state.player.position;

        group.bench_with_input(BenchmarkId::new("count_within", count), &count, |b, _| {
            b.iter(|| spatial::count_within(black_box(origin), &state.entities, sanity::NEARBY_RADIUS))
        });
    }
    group.finish();
}

/// Benchmark a full tick (all systems) at the entity cap
fn bench_full_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tick");
    group.sample_size(30);

    for count in [20, 100] {
        let mut sim = match Simulation::new(config_with_entities(count)) {
            Ok(sim) => sim,
            Err(e) => panic!("bench config rejected: {}", e),
        };

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("complete", count), &count, |b, _| {
            b.iter(|| {
                // Keep the session alive so every iteration runs all systems
                if sim.state().phase.is_terminal() {
                    sim.restart();
                }
                sim.state_mut().player.sanity = 100.0;
                black_box(sim.tick(timing::TICK_MS))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_behavior, bench_proximity, bench_full_tick);
criterion_main!(benches);
