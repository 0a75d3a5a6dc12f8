use ap_engine::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random integer with roughly `limbs` 32-bit limbs.
fn random_bigint(limbs: usize, rng: &mut ChaCha8Rng) -> BigInt {
    let mut s = String::from("1");
    for _ in 0..(limbs * 9) {
        s.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    s.parse().unwrap()
}

fn bench_multiplication(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(0xBEEF);

    let mut group = c.benchmark_group("bigint_mul");
    for limbs in [16usize, 64, 256, 1024] {
        let a = random_bigint(limbs, &mut rng);
        let b = random_bigint(limbs, &mut rng);

        group.bench_function(format!("auto_{}_limbs", limbs), |bench| {
            bench.iter(|| black_box(&a) * black_box(&b))
        });
        group.bench_function(format!("fft_{}_limbs", limbs), |bench| {
            bench.iter(|| fft_multiply(black_box(&a), black_box(&b)))
        });
        group.bench_function(format!("ntt_{}_limbs", limbs), |bench| {
            bench.iter(|| ntt_multiply(black_box(&a), black_box(&b)).unwrap())
        });
    }
    group.finish();
}

fn bench_modular(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(0xCAFE);
    let base = random_bigint(8, &mut rng);
    let exp = random_bigint(8, &mut rng);
    let modulus = random_bigint(8, &mut rng);

    c.bench_function("mod_exp_256_bits", |bench| {
        bench.iter(|| {
            black_box(&base)
                .mod_exp(black_box(&exp), black_box(&modulus))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_multiplication, bench_modular);
criterion_main!(benches);
