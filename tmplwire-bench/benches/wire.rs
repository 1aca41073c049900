//! Wire primitive benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tmplwire_core::{Frequency, Quaternion, WireReader, WireWriter, decode_command};

fn benchmark_command_framing(c: &mut Criterion) {
    let mut buffer = Vec::with_capacity(64);

    c.bench_function("command_encode_low", |b| {
        b.iter(|| {
            buffer.clear();
            WireWriter::new(&mut buffer).write_command(Frequency::Low, black_box(0xFFFB));
        })
    });

    let low = [0xFF, 0xFF, 0x00, 0x04];
    let high = [0x04];
    c.bench_function("command_decode_low", |b| {
        b.iter(|| decode_command(black_box(&low[..]), 0))
    });
    c.bench_function("command_decode_high", |b| {
        b.iter(|| decode_command(black_box(&high[..]), 0))
    });
}

fn benchmark_primitive_writes(c: &mut Criterion) {
    let mut buffer = Vec::with_capacity(256);
    let text = vec![b'x'; 200];

    c.bench_function("write_u64", |b| {
        b.iter(|| {
            buffer.clear();
            WireWriter::new(&mut buffer).write(&black_box(0x1234_5678_9ABC_DEF0u64));
        })
    });

    c.bench_function("write_quaternion", |b| {
        b.iter(|| {
            buffer.clear();
            WireWriter::new(&mut buffer).write(black_box(&Quaternion::IDENTITY));
        })
    });

    c.bench_function("write_variable_200", |b| {
        b.iter(|| {
            buffer.clear();
            WireWriter::new(&mut buffer).write_variable(black_box(&text), 1)
        })
    });
}

fn benchmark_primitive_reads(c: &mut Criterion) {
    let mut buffer = Vec::new();
    let mut writer = WireWriter::new(&mut buffer);
    writer.write(&0x1234_5678_9ABC_DEF0u64);
    writer.write_u16_be(13000);
    writer
        .write_variable(&[b'x'; 200], 1)
        .expect("Failed to encode");

    c.bench_function("read_u64", |b| {
        b.iter(|| WireReader::new(black_box(&buffer)).read::<u64>())
    });

    c.bench_function("read_variable_200", |b| {
        b.iter(|| WireReader::at(black_box(&buffer), 10).read_variable(1))
    });
}

criterion_group!(
    benches,
    benchmark_command_framing,
    benchmark_primitive_writes,
    benchmark_primitive_reads,
);
criterion_main!(benches);
