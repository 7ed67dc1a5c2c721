use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use ndarray::Array1;
use optimal_diagonal_qn::{DiagonalUpdate, ModifiedSr1Update, SpectralUpdate};
use optimal_linear_operator::{Dimension, LinearOperator};

pub fn bench_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("updates");

    let len = 100000;
    let initial: Array1<f64> = Array1::ones(len);
    let s = Array1::from_iter((1..(len + 1)).map(|x| 1.0 / x as f64));
    let y = s.mapv(|x| 2.0 * x);

    group.bench_function(format!("diagonal update {len}"), |b| {
        b.iter_batched(
            || DiagonalUpdate::new(initial.clone()).unwrap(),
            |mut op| {
                op.update(black_box(&s), black_box(&y)).unwrap();
                op
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function(format!("spectral update {len}"), |b| {
        let mut op = SpectralUpdate::new(1.0, Dimension::new(len).unwrap());
        b.iter(|| op.update(black_box(&s), black_box(&y)).unwrap())
    });

    group.bench_function(format!("modified sr1 update {len}"), |b| {
        b.iter_batched(
            || ModifiedSr1Update::new(initial.clone()).unwrap(),
            |mut op| {
                op.update(
                    black_box(&s),
                    black_box(&y),
                    black_box(&y),
                    black_box(1.0),
                    black_box(&s),
                )
                .unwrap();
                op
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

pub fn bench_apply(c: &mut Criterion) {
    let len = 100000;
    let op = DiagonalUpdate::new(Array1::from_iter((1..(len + 1)).map(|x| x as f64))).unwrap();
    let v: Array1<f64> = Array1::ones(len);
    let mut out: Array1<f64> = Array1::zeros(len);

    c.bench_function(&format!("diagonal apply {len}"), |b| {
        b.iter(|| {
            op.apply_into(black_box(v.view()), 1.0, 0.5, out.view_mut())
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_updates, bench_apply);
criterion_main!(benches);
