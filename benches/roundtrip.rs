#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use polycode::{register_types, Codec, MemoryOutputArchive, Polymorphic, ViewInputArchive};

// --- SETUP ---

#[derive(Codec, Clone, Debug, Default, PartialEq)]
struct BenchItem {
    id: u64,
    payload: Vec<u64>,
}

impl Polymorphic for BenchItem {}

register_types! {
    BenchItem => "bench::BenchItem",
}

fn sample_items(count: usize) -> Vec<BenchItem> {
    (0..count as u64)
        .map(|id| BenchItem {
            id,
            payload: (0..128).map(|n| id ^ n).collect(),
        })
        .collect()
}

fn encoded(items: &mut Vec<BenchItem>) -> Vec<u8> {
    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data)
        .apply(items)
        .expect("save failed");
    data
}

// --- BENCHES ---

fn bench_save(c: &mut Criterion) {
    let mut items = sample_items(256);
    let bytes = encoded(&mut items.clone()).len() as u64;

    let mut group = c.benchmark_group("save");
    group.throughput(Throughput::Bytes(bytes));
    group.bench_function("vec_of_structs", |b| {
        b.iter(|| {
            let mut data = Vec::new();
            MemoryOutputArchive::new(&mut data)
                .apply(black_box(&mut items))
                .expect("save failed");
            black_box(data)
        });
    });
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut items = sample_items(256);
    let data = encoded(&mut items);

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("vec_of_structs", |b| {
        b.iter(|| {
            let mut loaded: Vec<BenchItem> = Vec::new();
            ViewInputArchive::new(black_box(&data))
                .apply(&mut loaded)
                .expect("load failed");
            black_box(loaded)
        });
    });
    group.finish();
}

fn bench_scalar_block(c: &mut Criterion) {
    let mut samples: Vec<u64> = (0..65_536).collect();
    let mut group = c.benchmark_group("scalar_block");
    group.throughput(Throughput::Bytes((samples.len() * 8) as u64));
    group.bench_function("save_64k_u64", |b| {
        b.iter(|| {
            let mut data = Vec::new();
            MemoryOutputArchive::new(&mut data)
                .apply(black_box(&mut samples))
                .expect("save failed");
            black_box(data)
        });
    });
    group.finish();
}

fn bench_polymorphic(c: &mut Criterion) {
    let mut slot: Option<Box<dyn Polymorphic>> = Some(Box::new(BenchItem {
        id: 1,
        payload: vec![0; 128],
    }));
    let mut data = Vec::new();
    MemoryOutputArchive::new(&mut data)
        .apply(&mut slot)
        .expect("save failed");

    c.bench_function("polymorphic_load", |b| {
        b.iter(|| {
            let mut loaded: Option<Box<dyn Polymorphic>> = None;
            ViewInputArchive::new(black_box(&data))
                .apply(&mut loaded)
                .expect("load failed");
            black_box(loaded)
        });
    });
}

criterion_group!(
    benches,
    bench_save,
    bench_load,
    bench_scalar_block,
    bench_polymorphic
);
criterion_main!(benches);
