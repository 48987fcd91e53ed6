use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pixel_crawler::dungeon::{DungeonRng, FovConfig, GenConfig, compute_fov, generate};
use pixel_crawler::hero::Class;
use pixel_crawler::{GameConfig, WorldState, advance_tick};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn bench_floor_generation(c: &mut Criterion) {
    let cfg = GenConfig::default();
    c.bench_function("generate_rooms_floor", |b| {
        b.iter(|| generate(black_box(1), &mut DungeonRng::for_floor(42, 1), &cfg))
    });

    let caves = GenConfig {
        cave_chance: 1.0,
        ..GenConfig::default()
    };
    c.bench_function("generate_cave_floor", |b| {
        b.iter(|| generate(black_box(2), &mut DungeonRng::for_floor(42, 2), &caves))
    });

    c.bench_function("generate_boss_floor", |b| {
        b.iter(|| generate(black_box(5), &mut DungeonRng::for_floor(42, 5), &cfg))
    });
}

fn bench_fov(c: &mut Criterion) {
    let floor = generate(1, &mut DungeonRng::for_floor(7, 1), &GenConfig::default());
    let fov = FovConfig::default();
    c.bench_function("compute_fov", |b| {
        b.iter(|| compute_fov(&floor.grid, black_box(floor.spawn), &fov))
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut rng = Pcg32::seed_from_u64(3);
    let world = WorldState::new(Class::Warrior, GameConfig::default(), 4, &mut rng);
    c.bench_function("advance_tick_x100", |b| {
        b.iter(|| {
            let mut state = world.clone();
            for _ in 0..100 {
                advance_tick(&mut state, black_box(16.0), &mut rng);
            }
            state.ticks
        })
    });
}

criterion_group!(benches, bench_floor_generation, bench_fov, bench_tick);
criterion_main!(benches);
