//! Integration tests for concurrent writers sharing one log file set.

use alopex_scribe::record::current_thread_id;
use alopex_scribe::{Level, LogWriter, LogWriterConfig};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 500;

/// Runs the writer threads and returns each thread's id, indexed by `t`.
fn spawn_writers(writer: &Arc<LogWriter>) -> Vec<u64> {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(writer);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for r in 0..RECORDS_PER_THREAD {
                    let message =
                        format!("thread={t} record={r} payload={}", "p".repeat(r % 40));
                    writer.write(
                        Level::Info,
                        r as u32,
                        "worker",
                        "concurrency_test.rs",
                        &message,
                    );
                }
                current_thread_id()
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

/// Collects every line of the file set, oldest file first.
fn collect_lines(writer: &LogWriter, max_files: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for index in (0..max_files).rev() {
        if let Ok(content) = fs::read_to_string(writer.file_path(index)) {
            assert!(content.is_empty() || content.ends_with('\n'));
            lines.extend(content.lines().map(str::to_string));
        }
    }
    lines
}

fn assert_line_intact(line: &str) {
    assert_eq!(line.as_bytes()[0], b'[', "bad line: {line}");
    assert!(line.contains("][info ][worker]@(concurrency_test.rs,"), "bad line: {line}");
    let message = line.split_once(") ").map(|(_, m)| m).unwrap();
    let mut fields = message.split(' ');
    assert!(fields.next().unwrap().starts_with("thread="));
    assert!(fields.next().unwrap().starts_with("record="));
    assert!(fields.next().unwrap().starts_with("payload="));
    assert!(fields.next().is_none(), "interleaved line: {line}");
}

#[test]
fn test_concurrent_writes_produce_intact_lines() {
    let temp_dir = TempDir::new().unwrap();
    let writer = Arc::new(LogWriter::init(temp_dir.path().join("app.log"), 0, 0).unwrap());

    spawn_writers(&writer);

    let lines = collect_lines(&writer, 1);
    assert_eq!(lines.len(), THREADS * RECORDS_PER_THREAD);
    lines.iter().for_each(|line| assert_line_intact(line));
}

#[test]
fn test_concurrent_writes_keep_per_thread_order() {
    let temp_dir = TempDir::new().unwrap();
    let writer = Arc::new(
        LogWriter::open(
            LogWriterConfig::new(temp_dir.path().join("app.log")).with_buffer_size_kb(16),
        )
        .unwrap(),
    );

    spawn_writers(&writer);
    writer.flush().unwrap();

    let mut next_record: HashMap<String, usize> = HashMap::new();
    for line in collect_lines(&writer, 1) {
        assert_line_intact(&line);
        let message = line.split_once(") ").map(|(_, m)| m).unwrap();
        let mut fields = message.split(' ');
        let thread = fields.next().unwrap().to_string();
        let record: usize = fields.next().unwrap()["record=".len()..].parse().unwrap();

        let expected = next_record.entry(thread).or_insert(0);
        assert_eq!(record, *expected);
        *expected += 1;
    }
    assert_eq!(next_record.len(), THREADS);
    assert!(next_record.values().all(|&n| n == RECORDS_PER_THREAD));
}

#[test]
fn test_concurrent_writes_across_rotations() {
    let temp_dir = TempDir::new().unwrap();
    // Large enough to retain every record, small enough to rotate often.
    let max_files = 64;
    let writer = Arc::new(
        LogWriter::init(temp_dir.path().join("app.log"), 20, max_files).unwrap(),
    );

    spawn_writers(&writer);

    let stats = writer.stats();
    assert!(stats.rotations > 10);
    assert!(stats.rotations < max_files as u64);
    assert_eq!(stats.failed_writes, 0);

    let lines = collect_lines(&writer, max_files as u32);
    assert_eq!(lines.len(), THREADS * RECORDS_PER_THREAD);
    lines.iter().for_each(|line| assert_line_intact(line));
}

#[test]
fn test_thread_field_matches_writing_thread() {
    let temp_dir = TempDir::new().unwrap();
    let writer = Arc::new(LogWriter::init(temp_dir.path().join("app.log"), 0, 0).unwrap());

    let thread_ids = spawn_writers(&writer);
    let distinct: HashSet<u64> = thread_ids.iter().copied().collect();
    assert_eq!(distinct.len(), THREADS);

    for line in collect_lines(&writer, 1) {
        let message = line.split_once(") ").map(|(_, m)| m).unwrap();
        let t: usize = message["thread=".len()..message.find(' ').unwrap()]
            .parse()
            .unwrap();
        let expected = format!("{:012x}", thread_ids[t] & 0xffff_ffff_ffff);
        assert_eq!(&line[22..34], expected, "bad line: {line}");
    }
}
