mod common;

use std::fmt::Write;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use runoff_overlay::prelude::{transform, OverlayDocument, SettingsModel};

fn make_template(placemarks: usize) -> OverlayDocument {
    let mut kml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n<Document>\n",
    );
    for i in 0..placemarks {
        let class = i % 7 + 1;
        let _ = write!(
            kml,
            "  <Placemark class=\"c{class}\">\n    <name>region {i}</name>\n    <Style><PolyStyle><color>7f00ff00</color></PolyStyle></Style>\n    <Polygon><outerBoundaryIs><LinearRing><coordinates>0,0,0 1,0,0 1,1,0 0,0,0</coordinates></LinearRing></outerBoundaryIs></Polygon>\n  </Placemark>\n"
        );
    }
    kml.push_str("</Document>\n</kml>\n");
    OverlayDocument::from(kml.as_str())
}

fn transform_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay/transform");
    let settings = SettingsModel::defaults();

    for &n in &[6usize, 64, 512, 4096] {
        let template = make_template(n);
        group.throughput(common::bytes_throughput(template.len()));

        group.bench_with_input(BenchmarkId::from_parameter(n), &template, |b, template| {
            b.iter(|| black_box(transform(black_box(template), &settings)));
        });
    }

    let template = make_template(512);
    group.bench_function("no_matching_classes", |b| {
        let empty = SettingsModel::empty();
        b.iter(|| black_box(transform(black_box(&template), &empty)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = transform_benches
}
criterion_main!(benches);
