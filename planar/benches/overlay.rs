use criterion::{criterion_group, criterion_main, Criterion};
use planar::buffer::buffer;
use planar::{intersection, union};
use planar_types::{Coord, Geometry, LineString, Polygon};

/// A jagged star polygon with `points` spikes around the origin.
fn star(points: usize, radius: f64, offset: f64) -> Geometry {
    let mut coords = Vec::with_capacity(2 * points + 1);
    for i in 0..2 * points {
        let angle = i as f64 * std::f64::consts::PI / points as f64;
        let r = if i % 2 == 0 { radius } else { radius / 2. };
        coords.push(Coord::new(
            offset + r * angle.cos(),
            offset + r * angle.sin(),
        ));
    }
    coords.push(coords[0]);
    Polygon::new(LineString::from(coords), vec![]).into()
}

fn criterion_benchmark(c: &mut Criterion) {
    let a = star(64, 100., 0.);
    let b = star(64, 100., 40.);

    c.bench_function("intersection of stars", |bencher| {
        bencher.iter(|| intersection(&a, &b).unwrap());
    });

    c.bench_function("union of stars", |bencher| {
        bencher.iter(|| union(&a, &b).unwrap());
    });

    c.bench_function("buffer star", |bencher| {
        bencher.iter(|| buffer(&a, 5.).unwrap());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
