use cellkit::Dict;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(1).take(100_000).map(key).collect();
    let mut group = c.benchmark_group("insert_fresh_100k");
    group.bench_function("dict", |b| {
        b.iter_batched(
            || Dict::<u64>::new().unwrap(),
            |mut d| {
                for (i, k) in keys.iter().enumerate() {
                    d.set(k, i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("hashbrown", |b| {
        b.iter_batched(
            hashbrown::HashMap::<String, u64>::new,
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.insert(k.clone(), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(20_000).map(key).collect();
    let mut d = Dict::new().unwrap();
    let mut m = hashbrown::HashMap::new();
    for (i, k) in keys.iter().enumerate() {
        d.set(k, i as u64).unwrap();
        m.insert(k.clone(), i as u64);
    }
    let mut group = c.benchmark_group("get_hit_20k");
    group.bench_function("dict", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in &keys {
                sum = sum.wrapping_add(*d.get(k).unwrap());
            }
            black_box(sum)
        })
    });
    group.bench_function("hashbrown", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in &keys {
                sum = sum.wrapping_add(*m.get(k.as_str()).unwrap());
            }
            black_box(sum)
        })
    });
    group.finish();
}

fn bench_remove_random_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(5).take(50_000).map(key).collect();
    let victims: Vec<String> = keys.iter().step_by(5).cloned().collect();
    c.bench_function("dict::remove_10k_of_50k", |b| {
        b.iter_batched(
            || {
                let mut d = Dict::new().unwrap();
                for (i, k) in keys.iter().enumerate() {
                    d.set(k, i as u64).unwrap();
                }
                d
            },
            |mut d| {
                for k in &victims {
                    let _ = d.remove(k);
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = config();
    targets = bench_insert_fresh_100k, bench_get_hit, bench_remove_random_10k
}
criterion_main!(benches);
