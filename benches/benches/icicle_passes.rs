// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Size, Vec2};
use understory_icicle::{Chart, Headless, PointerEvent, Record, cull};
use understory_partition::{Orientation, Partition, PartitionOptions, SortFn};
use understory_zoom::ZoomTransform;

struct Item {
    w: f64,
    kids: Vec<Self>,
}

impl Record for Item {
    fn number(&self, key: &str) -> Option<f64> {
        (key == "value").then_some(self.w)
    }

    fn list(&self, key: &str) -> &[Self] {
        if key == "children" { &self.kids } else { &[] }
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// A full tree of the given fan-out and depth with random leaf weights.
fn gen_tree(rng: &mut Rng, fanout: usize, depth: usize) -> Item {
    if depth == 0 {
        return Item {
            w: 1.0 + rng.next_f64() * 99.0,
            kids: Vec::new(),
        };
    }
    Item {
        w: 0.0,
        kids: (0..fanout).map(|_| gen_tree(rng, fanout, depth - 1)).collect(),
    }
}

fn count(item: &Item) -> usize {
    1 + item.kids.iter().map(count).sum::<usize>()
}

fn layout(root: &Item, exclude_root: bool) -> Partition {
    Partition::compute(
        root,
        |d| d.kids.as_slice(),
        |d| d.w,
        None,
        PartitionOptions {
            size: Size::new(1000.0, 800.0),
            exclude_root,
        },
    )
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let by_weight: &SortFn<Item> = &|a, b| b.weight.total_cmp(&a.weight);
    for &(fanout, depth) in &[(4_usize, 5_usize), (8, 4), (16, 3)] {
        let root = gen_tree(&mut Rng(0xCAFE_F00D_DEAD_BEEF), fanout, depth);
        group.throughput(Throughput::Elements(count(&root) as u64));
        group.bench_function(format!("compute_f{fanout}_d{depth}"), |b| {
            b.iter(|| black_box(layout(&root, false)));
        });
        group.bench_function(format!("compute_excluded_f{fanout}_d{depth}"), |b| {
            b.iter(|| black_box(layout(&root, true)));
        });
        group.bench_function(format!("compute_sorted_f{fanout}_d{depth}"), |b| {
            b.iter(|| {
                black_box(Partition::compute(
                    &root,
                    |d| d.kids.as_slice(),
                    |d| d.w,
                    Some(by_weight),
                    PartitionOptions::default(),
                ))
            });
        });
    }
    group.finish();
}

fn bench_cull(c: &mut Criterion) {
    let mut group = c.benchmark_group("cull");
    let root = gen_tree(&mut Rng(0xBADC_F00D_1234_5678), 8, 4);
    let partition = layout(&root, false);
    let canvas = Size::new(1000.0, 800.0);
    group.throughput(Throughput::Elements(partition.len() as u64));
    for &k in &[1.0_f64, 8.0, 64.0] {
        let t = ZoomTransform::new(-500.0 * (k - 1.0), 0.0, k);
        group.bench_function(format!("k{k}"), |b| {
            b.iter(|| black_box(cull(&partition, t, Orientation::TopDown, canvas, 0.8)));
        });
    }
    group.finish();
}

fn bench_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");
    group.bench_function("drag_reconcile_f8_d4", |b| {
        b.iter_batched(
            || {
                let mut chart = Chart::new(Headless::default());
                chart
                    .set_width(1000.0)
                    .set_height(800.0)
                    .set_orientation(Orientation::TopDown)
                    .set_disable_animations(true)
                    .set_data(gen_tree(&mut Rng(0xC1A5_7E55_9999_ABCD), 8, 4));
                chart.update();
                chart.zoom_by(16.0);
                chart
            },
            |mut chart| {
                for _ in 0..32 {
                    black_box(chart.handle_event(PointerEvent::Drag(Vec2::new(25.0, 0.0))));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_layout, bench_cull, bench_pan);
criterion_main!(benches);
