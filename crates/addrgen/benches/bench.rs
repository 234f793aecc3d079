use addrgen::{AddressGenerator, CacheRegistry, HashChainDigest, MemoryAddressCache, Seed};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

// Number of addresses requested per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_ADDRESSES: usize = 16;

fn generator(seed: &str) -> AddressGenerator {
    AddressGenerator::with_digest(Seed::from(seed), HashChainDigest::default())
        .with_registry(Arc::new(CacheRegistry::new()))
}

/// Every lookup derives: no cache anywhere.
fn bench_uncached(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncached");
    group.throughput(Throughput::Elements(TOTAL_ADDRESSES as u64));

    let generator = generator("BENCH-UNCACHED");
    group.bench_function(format!("elems/{TOTAL_ADDRESSES}"), |b| {
        b.iter(|| black_box(generator.get_addresses(0, TOTAL_ADDRESSES, 1).unwrap()));
    });
    group.finish();
}

/// Every lookup is a cache hit.
fn bench_warm_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("warm_cache");
    group.throughput(Throughput::Elements(TOTAL_ADDRESSES as u64));

    for shards in [1, 16, 64] {
        let generator = generator("BENCH-WARM")
            .with_cache(Arc::new(MemoryAddressCache::with_shards(shards)));
        generator.get_addresses(0, TOTAL_ADDRESSES, 1).unwrap();

        group.bench_function(format!("shards/{shards}/elems/{TOTAL_ADDRESSES}"), |b| {
            b.iter(|| black_box(generator.get_addresses(0, TOTAL_ADDRESSES, 1).unwrap()));
        });
    }
    group.finish();
}

/// All threads race for the same cold keys; only one derivation per key runs.
fn bench_contended_single_flight(c: &mut Criterion) {
    let threads = num_cpus::get();
    let mut group = c.benchmark_group("contended");
    group.throughput(Throughput::Elements((TOTAL_ADDRESSES * threads) as u64));

    group.bench_function(
        format!("threads/{threads}/elems/{TOTAL_ADDRESSES}"),
        |b| {
            b.iter_custom(|iters| {
                let mut elapsed = core::time::Duration::ZERO;
                for _ in 0..iters {
                    let registry = Arc::new(CacheRegistry::new());
                    registry
                        .install(Arc::new(MemoryAddressCache::new()))
                        .unwrap();
                    let barrier = Barrier::new(threads);

                    let start = Instant::now();
                    scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                let generator = generator("BENCH-CONTENDED")
                                    .with_registry(Arc::clone(&registry));
                                barrier.wait();
                                black_box(generator.get_addresses(0, TOTAL_ADDRESSES, 1).unwrap());
                            });
                        }
                    });
                    elapsed += start.elapsed();
                }
                elapsed
            });
        },
    );
    group.finish();
}

criterion_group!(
    benches,
    bench_uncached,
    bench_warm_cache,
    bench_contended_single_flight
);
criterion_main!(benches);
