use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use mcts::{run_search, HeuristicEvaluator, RolloutEvaluator, SearchConfig, SimAdapter};
use scrimmage::{fixtures, Scrimmage};

const LONG: Duration = Duration::from_secs(60);

fn bench_search_heuristic(c: &mut Criterion) {
    let engine = Scrimmage::new();
    let sim = SimAdapter::new(&engine);
    let evaluator = HeuristicEvaluator::new();
    let state = fixtures::open_field();

    c.bench_function("search_256_iters_heuristic", |b| {
        b.iter(|| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            let config = SearchConfig::default().with_max_iterations(256);
            let result =
                run_search(&sim, &evaluator, config, black_box(&state), LONG, &mut rng).unwrap();
            black_box(result.action)
        })
    });
}

fn bench_search_rollout(c: &mut Criterion) {
    let engine = Scrimmage::new();
    let sim = SimAdapter::new(&engine);
    let evaluator = RolloutEvaluator::new(20);
    let state = fixtures::open_field();

    c.bench_function("search_64_iters_rollout", |b| {
        b.iter(|| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            let config = SearchConfig::default().with_max_iterations(64);
            let result =
                run_search(&sim, &evaluator, config, black_box(&state), LONG, &mut rng).unwrap();
            black_box(result.action)
        })
    });
}

fn bench_rollout_evaluation(c: &mut Criterion) {
    use mcts::LeafEvaluator;

    let engine = Scrimmage::new();
    let sim = SimAdapter::new(&engine);
    let evaluator = RolloutEvaluator::new(30);
    let state = fixtures::carrier_near_endzone(6);

    c.bench_function("rollout_30_steps", |b| {
        b.iter(|| {
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            black_box(evaluator.evaluate(&sim, black_box(&state), &mut rng).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_search_heuristic,
    bench_search_rollout,
    bench_rollout_evaluation
);
criterion_main!(benches);
