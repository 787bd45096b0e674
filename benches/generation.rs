use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use treasure_mine::combat::use_tool;
use treasure_mine::items::ToolType;
use treasure_mine::{GameConfig, LevelModel};

fn bench_generate(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = GameConfig::default();
    let mut model = LevelModel::new(config.tile_grid(), config.level_rules());
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("generate_depth_10", |b| {
        b.iter(|| model.generate(&mut rng, black_box(10)))
    });
}

fn bench_tool_swing(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut model = LevelModel::new(config.tile_grid(), config.level_rules());
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("pickaxe_swing", |b| {
        b.iter(|| {
            if model.generate(&mut rng, 1).is_ok() {
                if let Some(pos) = model.player_position() {
                    black_box(use_tool(&mut model, &mut rng, ToolType::BasicPickaxe.tool(), pos));
                }
            }
        })
    });
}

criterion_group!(benches, bench_generate, bench_tool_swing);
criterion_main!(benches);
