use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dynarr::{DynamicArray, Duplicate, Relocate, TransferPolicy};
use rand::{Rng as _, SeedableRng, rngs::StdRng};

const COUNT: usize = 1 << 12;

struct Rng(StdRng);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    fn positions(&mut self, count: usize) -> Vec<usize> {
        (1..=count).map(|len| self.0.random_range(0..len)).collect()
    }

    fn words(&mut self, count: usize) -> Vec<String> {
        std::iter::repeat_with(|| format!("{:016x}", self.0.random::<u64>()))
            .take(count)
            .collect()
    }
}

fn push_strings<P>(policy: P, words: &[String]) -> DynamicArray<String, P>
where
    P: TransferPolicy<String> + Copy,
{
    let mut array = DynamicArray::new_in(policy);
    for word in words {
        array.push(word.clone());
    }
    array
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = Rng::new(42);
    let words = rng.words(COUNT);
    let positions = rng.positions(COUNT);

    c.bench_function("push vec", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..COUNT {
                vec.push(black_box(i));
            }
            vec
        })
    });

    c.bench_function("push dynarr", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for i in 0..COUNT {
                array.push(black_box(i));
            }
            array
        })
    });

    c.bench_function("push strings relocate", |b| {
        b.iter(|| push_strings(Relocate, black_box(&words)))
    });

    c.bench_function("push strings duplicate", |b| {
        b.iter(|| push_strings(Duplicate, black_box(&words)))
    });

    c.bench_function("insert vec", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for (i, &position) in positions.iter().enumerate() {
                vec.insert(position, i);
            }
            vec
        })
    });

    c.bench_function("insert dynarr", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for (i, &position) in positions.iter().enumerate() {
                array.insert(position, i);
            }
            array
        })
    });

    c.bench_function("erase strings relocate", |b| {
        b.iter_batched(
            || push_strings(Relocate, &words),
            |mut array| {
                while !array.is_empty() {
                    array.erase(array.len() / 2);
                }
                array
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("erase strings duplicate", |b| {
        b.iter_batched(
            || push_strings(Duplicate, &words),
            |mut array| {
                while !array.is_empty() {
                    array.erase(array.len() / 2);
                }
                array
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
