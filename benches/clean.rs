use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use bold_denoise::filter::{design_bandpass, SeriesFilter};
use bold_denoise::{clean, ConfoundProjector, NiftiHeader, NiftiImage};
use ndarray::{Array2, Array4};

const N_T: usize = 200;
const TR: f64 = 2.0;

fn confounds(n_k: usize) -> Array2<f64> {
    Array2::from_shape_fn((N_T, n_k), |(t, k)| ((t as f64) * 0.07 * (k + 1) as f64).sin())
}

fn image(shape: (usize, usize, usize)) -> NiftiImage {
    let (nx, ny, nz) = shape;
    let data = Array4::from_shape_fn((nx, ny, nz, N_T), |(x, y, z, t)| {
        1000.0 + ((t as f32) * 0.3 + (x + y + z) as f32).sin()
    });
    NiftiImage::from_array(NiftiHeader::default(), data.into_dyn()).unwrap()
}

fn bench_projector(c: &mut Criterion) {
    let x = confounds(12);
    c.bench_function("ConfoundProjector::new [200×12]", |b| {
        b.iter(|| black_box(ConfoundProjector::new(black_box(&x)).rank()))
    });
}

fn bench_series_filter(c: &mut Criterion) {
    let band = design_bandpass(TR, Some(0.1), Some(0.01), 5).unwrap();
    let f = SeriesFilter::new(&band, N_T);
    let mut buf = Vec::new();
    let x: Vec<f64> = (0..N_T).map(|t| (t as f64 * 0.2).sin()).collect();
    c.bench_function("SeriesFilter::apply 200 samples", |b| {
        b.iter(|| {
            let mut y = x.clone();
            f.apply(black_box(&mut y), &mut buf);
            black_box(y[0])
        })
    });
}

fn bench_clean(c: &mut Criterion) {
    let img = image((16, 16, 8));
    let x = confounds(12);
    c.bench_function("clean [16×16×8×200], 12 regressors", |b| {
        b.iter(|| {
            let out = clean(black_box(&img), &x, TR, Some(0.1), Some(0.01)).unwrap();
            black_box(out.data.len())
        })
    });
}

criterion_group!(benches, bench_projector, bench_series_filter, bench_clean);
criterion_main!(benches);
