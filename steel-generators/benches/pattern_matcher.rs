#![allow(missing_docs)]
//! Benchmarks for neighbour-pattern matching.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rustc_hash::FxHashMap;
use steel_generators::matcher::is_match;
use steel_registry::{GenerationRule, Material};
use steel_utils::{Direction, GlobalPos, WorldId};

const CELL: GlobalPos = GlobalPos::new(WorldId(0), 0, 64, 0);

fn neighbourhood(faces: [Material; 6]) -> FxHashMap<GlobalPos, Material> {
    Direction::ALL
        .into_iter()
        .zip(faces)
        .map(|(direction, material)| (CELL.relative(direction), material))
        .collect()
}

fn bench_is_match(c: &mut Criterion) {
    let cobblestone = GenerationRule::new("cobblestone")
        .with_trigger(Material::Lava)
        .with_floating(Material::Water)
        .with_fallback(Material::Cobblestone);
    let basalt = GenerationRule::new("basalt")
        .with_trigger(Material::Lava)
        .with_fixed(Direction::Down, Material::SoulSoil)
        .with_floating(Material::BlueIce)
        .with_fallback(Material::Basalt);
    // Six floating slots, the worst case for the greedy bag.
    let ring = GenerationRule::new("ring")
        .with_trigger(Material::Lava)
        .with_floating(Material::Stone)
        .with_floating(Material::Stone)
        .with_floating(Material::Dirt)
        .with_floating(Material::Dirt)
        .with_floating(Material::Glass)
        .with_floating(Material::Water)
        .with_fallback(Material::Obsidian);

    // Down, Up, North, South, West, East.
    let layouts = [
        (
            "cobblestone",
            &cobblestone,
            [
                Material::Stone,
                Material::Air,
                Material::Air,
                Material::Air,
                Material::Air,
                Material::Water,
            ],
        ),
        (
            "basalt",
            &basalt,
            [
                Material::SoulSoil,
                Material::Air,
                Material::BlueIce,
                Material::Air,
                Material::Lava,
                Material::Air,
            ],
        ),
        (
            "ring",
            &ring,
            [
                Material::Water,
                Material::Glass,
                Material::Dirt,
                Material::Dirt,
                Material::Stone,
                Material::Stone,
            ],
        ),
    ];

    let mut group = c.benchmark_group("is_match");
    for (name, rule, faces) in layouts {
        let world = neighbourhood(faces);
        group.bench_with_input(BenchmarkId::new("full_neighbourhood", name), rule, |b, rule| {
            b.iter(|| {
                black_box(is_match(
                    rule,
                    black_box(Material::Lava),
                    black_box(CELL),
                    |pos| world.get(&pos).copied(),
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_is_match);
criterion_main!(benches);
