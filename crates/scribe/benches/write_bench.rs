//! Benchmarks for Scribe write path components.
//!
//! Run with: cargo bench --package alopex-scribe
//!
//! ## Benchmark Categories
//!
//! - **Formatter**: Record encoding into the reused scratch buffer
//! - **Writer**: Full locked write path, unbuffered and buffered
//! - **Rotation**: Write path with frequent rotations
//! - **Gate**: Cost of a call below the runtime threshold

use alopex_scribe::{
    BrokenDownTime, Level, LevelFilter, LogWriter, LogWriterConfig, Record, RecordFormatter,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tempfile::TempDir;

const MESSAGE: &str =
    "compaction finished: 12 segments merged into 3, 48211 points kept, 1022 dropped";

fn bench_format_record(c: &mut Criterion) {
    let mut formatter = RecordFormatter::with_capacity(256);
    let time = BrokenDownTime::new(2021, 6, 28, 11, 41, 52);
    let record = Record::new(Level::Debug, 20, "main", "write_bench.rs", MESSAGE);

    let mut group = c.benchmark_group("formatter");
    group.throughput(Throughput::Bytes(record.estimated_size() as u64));
    group.bench_function("format_record", |b| {
        b.iter(|| {
            let bytes = formatter.format(black_box(&record), &time, 0x1234);
            black_box(bytes.len())
        })
    });
    group.finish();
}

fn bench_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("writer");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().unwrap();
    let unbuffered = LogWriter::init(temp_dir.path().join("unbuffered.log"), 0, 0).unwrap();
    group.bench_function("write_unbuffered", |b| {
        b.iter(|| unbuffered.write(Level::Debug, 20, "main", "write_bench.rs", black_box(MESSAGE)))
    });

    let buffered = LogWriter::open(
        LogWriterConfig::new(temp_dir.path().join("buffered.log")).with_buffer_size_kb(64),
    )
    .unwrap();
    group.bench_function("write_buffered", |b| {
        b.iter(|| buffered.write(Level::Debug, 20, "main", "write_bench.rs", black_box(MESSAGE)))
    });

    group.finish();
}

fn bench_rotation(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let writer = LogWriter::open(
        LogWriterConfig::new(temp_dir.path().join("rotating.log"))
            .with_max_file_size_kb(64)
            .with_max_files(4)
            .with_buffer_size_kb(16)
            .with_pre_extend(true),
    )
    .unwrap();

    c.bench_function("write_with_rotation", |b| {
        b.iter(|| writer.write(Level::Info, 20, "main", "write_bench.rs", black_box(MESSAGE)))
    });
}

fn bench_disabled_level(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let writer = LogWriter::open(
        LogWriterConfig::new(temp_dir.path().join("gated.log")).with_min_level(LevelFilter::Error),
    )
    .unwrap();

    c.bench_function("log_below_threshold", |b| {
        b.iter(|| writer.log(black_box(Level::Debug), 20, "main", "write_bench.rs", MESSAGE))
    });
}

criterion_group!(
    benches,
    bench_format_record,
    bench_writer,
    bench_rotation,
    bench_disabled_level
);
criterion_main!(benches);
