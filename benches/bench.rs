use criterion::*;
use tagbin::*;

fn bench(c: &mut Criterion) {
    const N: i64 = 10_000;

    c.bench_function("homogeneous seq", |b| {
        b.iter(|| {
            let mut w = ObjectWriter::new();
            w.write_enumerable(0..N).unwrap();
            let buf = w.into_bytes();

            let mut r = ObjectReader::new(&buf);
            r.read_enumerable::<i64>().unwrap();
        })
    });

    c.bench_function("dynamic seq", |b| {
        b.iter(|| {
            let mut w = ObjectWriter::new();
            w.write_enumerable((0..N).map(Value::I64)).unwrap();
            let buf = w.into_bytes();

            let mut r = ObjectReader::new(&buf);
            r.read_enumerable::<i64>().unwrap();
        })
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
