
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use cotizador::quote::{MemoryQuoteStore, NewQuote, QuoteStore};
use cotizador::rating::RatingEngine;
use cotizador::reference::ReferenceData;
use cotizador::types::{Category, Year};

use fixtures::{LARGE, MEDIUM, SMALL, build_requests};

// ── Group 1: rate_single: one request per category ─────────────────────────

fn bench_rate_single(c: &mut Criterion) {
    let reference = ReferenceData::canonical();
    let engine = RatingEngine::for_year(&reference, Year(2026));
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let requests = build_requests(&MEDIUM, &mut rng, &reference);

    let mut group = c.benchmark_group("rate_single");
    for category in Category::ALL {
        let Some(request) = requests.iter().find(|r| r.category() == category) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(category), request, |b, req| {
            b.iter(|| engine.rate(std::hint::black_box(req)))
        });
    }
    group.finish();
}

// ── Group 2: rate_batch: sequential vs rayon ───────────────────────────────

fn bench_rate_batch(c: &mut Criterion) {
    let reference = ReferenceData::canonical();
    let engine = RatingEngine::for_year(&reference, Year(2026));

    let mut group = c.benchmark_group("rate_batch");
    for (name, batch) in [("small", &SMALL), ("medium", &MEDIUM), ("large", &LARGE)] {
        if name == "large" {
            group.sample_size(10);
        }
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let requests = build_requests(batch, &mut rng, &reference);
        group.throughput(Throughput::Elements(batch.requests as u64));

        group.bench_with_input(BenchmarkId::new("sequential", name), &requests, |b, reqs| {
            b.iter(|| reqs.iter().map(|r| engine.rate(r)).collect::<Vec<_>>())
        });
        group.bench_with_input(BenchmarkId::new("parallel", name), &requests, |b, reqs| {
            b.iter(|| reqs.par_iter().map(|r| engine.rate(r)).collect::<Vec<_>>())
        });
    }
    group.finish();
}

// ── Group 3: location_lookup: name scan over the catalog ───────────────────

fn bench_location_lookup(c: &mut Criterion) {
    let reference = ReferenceData::canonical();
    let mut group = c.benchmark_group("location_lookup");
    for name in ["CABA", "San Martín de los Andes", "Atlántida"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, n| {
            b.iter(|| reference.risk_index_of(std::hint::black_box(n)))
        });
    }
    group.finish();
}

// ── Group 4: store_save: id assignment and append ──────────────────────────

fn bench_store_save(c: &mut Criterion) {
    let reference = ReferenceData::canonical();
    let engine = RatingEngine::for_year(&reference, Year(2026));
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let requests = build_requests(&SMALL, &mut rng, &reference);
    let now = chrono::Utc::now();
    let quotes: Vec<NewQuote> = requests
        .into_iter()
        .map(|r| {
            let result = engine.rate(&r);
            NewQuote::new(r, result, now)
        })
        .collect();

    let mut group = c.benchmark_group("store_save");
    group.throughput(Throughput::Elements(quotes.len() as u64));
    group.bench_function("memory", |b| {
        b.iter_batched(
            || (MemoryQuoteStore::new(), quotes.clone()),
            |(mut store, qs)| {
                for q in qs {
                    let _ = store.save(q);
                }
                store
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("memory_batch", |b| {
        b.iter_batched(
            || (MemoryQuoteStore::new(), quotes.clone()),
            |(mut store, qs)| store.save_all(qs).map(|saved| saved.len()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rate_single,
    bench_rate_batch,
    bench_location_lookup,
    bench_store_save,
);
criterion_main!(benches);
