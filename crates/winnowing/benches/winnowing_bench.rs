use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use winnowing::{hpsm, Winnowing, WinnowingConfig};

fn source_of(lines: usize) -> Vec<u8> {
    (0..lines)
        .map(|i| format!("static int handler_{i}(struct ctx *c) {{ return c->value[{i}] ^ 0x{i:04x}; }}\n"))
        .collect::<String>()
        .into_bytes()
}

fn bench_winnowing(c: &mut Criterion) {
    let engine = Winnowing::new(WinnowingConfig::default()).expect("engine");
    let mut group = c.benchmark_group("winnowing");

    for lines in [100, 1_000, 10_000].iter() {
        let contents = source_of(*lines);
        group.throughput(Throughput::Bytes(contents.len() as u64));
        group.bench_function(format!("lines_{lines}"), |b| {
            b.iter(|| engine.fingerprint(black_box("bench.c"), false, black_box(&contents)))
        });
    }

    group.finish();
}

fn bench_hpsm(c: &mut Criterion) {
    let contents = source_of(1_000);
    let mut group = c.benchmark_group("hpsm");
    group.throughput(Throughput::Bytes(contents.len() as u64));
    group.bench_function("lines_1000", |b| b.iter(|| hpsm(black_box(&contents))));
    group.finish();
}

criterion_group!(benches, bench_winnowing, bench_hpsm);
criterion_main!(benches);
