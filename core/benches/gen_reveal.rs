use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minegym_core::{BoardEngine, Environment, GameConfig, MinesweeperEnv, Observation};

const TIERS: [(usize, usize); 3] = [(9, 10), (16, 40), (30, 180)];

fn first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for (size, mines) in TIERS {
        let config = GameConfig::new(size, mines).expect("valid tier");
        let center = size * size / 2;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}x{size}/{mines}")),
            &config,
            |b, &config| {
                let mut seed = 0;
                b.iter(|| {
                    seed += 1;
                    let mut engine = BoardEngine::new(config, seed);
                    black_box(engine.reveal(black_box(center)).expect("in range"));
                });
            },
        );
    }
    group.finish();
}

fn episode_steps(c: &mut Criterion) {
    c.bench_function("episode_16x16_scan", |b| {
        let mut env = MinesweeperEnv::with_size(16, 40).expect("valid config");
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            env.reset(Some(seed));
            for action in 0..env.action_space_size() {
                match env.step(action) {
                    Ok(step) if step.terminated => break,
                    Ok(step) => {
                        black_box(step.reward);
                    }
                    Err(_) => break,
                }
            }
        });
    });

    c.bench_function("observation_30x30", |b| {
        let mut engine = BoardEngine::new(GameConfig::new(30, 180).expect("valid config"), 3);
        engine.reveal(465).expect("in range");
        b.iter(|| black_box(Observation::from_engine(black_box(&engine))));
    });
}

criterion_group!(benches, first_reveal, episode_steps);
criterion_main!(benches);
