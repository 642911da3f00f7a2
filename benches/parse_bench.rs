//! Parser throughput benchmark over a synthetic multi-class schedule blob.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use classport::extract::parser::parse_schedule;

fn schedule_blob(classes: usize) -> String {
    let mut blob = String::new();
    for i in 0..classes {
        blob.push_str(&format!(
            "DEPT {code} - Course Number {i}\nMWF {h}:30AM - {h}:45AM\nHAL {room}\nProf. Smith\n\n",
            code = 100 + i % 400,
            h = 1 + i % 9,
            room = 100 + i % 300,
        ));
    }
    blob
}

fn bench_parse(c: &mut Criterion) {
    let small = schedule_blob(5);
    let large = schedule_blob(200);

    c.bench_function("parse_schedule_5_classes", |b| {
        b.iter(|| parse_schedule(black_box(&small)));
    });

    c.bench_function("parse_schedule_200_classes", |b| {
        b.iter(|| parse_schedule(black_box(&large)));
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
