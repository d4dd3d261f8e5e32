use std::hint::black_box;
use std::time::Instant;

use ember_ecs::{ComponentStore, Material, RigidBody, Tag, Transform};
use glam::Vec3;

fn make_store(entity_count: usize) -> ComponentStore {
    let mut store = ComponentStore::new();
    for i in 0..entity_count {
        let e = store.create_entity();
        let _ = store.add_component(e, Tag(format!("entity-{i}")));
        let _ = store.add_component(e, Transform::from_position(Vec3::new(i as f32, 0.0, 0.0)));
        if i % 2 == 0 {
            let _ = store.add_component(e, Material::basic());
        }
        if i % 4 == 0 {
            let _ = store.add_component(e, RigidBody::dynamic());
        }
    }
    store
}

fn bench_two_kind_view(entity_count: usize, iterations: usize) {
    let store = make_store(entity_count);

    let start = Instant::now();
    for _ in 0..iterations {
        let hits = black_box(&store).view::<(Transform, Material)>().count();
        black_box(hits);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  view (Transform, Material) ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_three_kind_view(entity_count: usize, iterations: usize) {
    let store = make_store(entity_count);

    let start = Instant::now();
    for _ in 0..iterations {
        let hits = black_box(&store)
            .view::<(Tag, Transform, RigidBody)>()
            .count();
        black_box(hits);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  view (Tag, Transform, RigidBody) ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_insert(entity_count: usize, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(make_store(black_box(entity_count)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  populate ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("ember-ecs view benchmarks");
    for &count in &[1_000, 10_000, 100_000] {
        bench_two_kind_view(count, 100);
        bench_three_kind_view(count, 100);
    }
    for &count in &[1_000, 10_000] {
        bench_insert(count, 20);
    }
}
