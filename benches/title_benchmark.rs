//! Benchmarks for title extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks cover single-line extraction, sanitization and the batch API.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use firstline::{extract_title, extract_titles, sanitize_filename, title_from_content, Settings};

/// Representative first lines, from plain text to heavily marked-up.
const LINES: &[(&str, &str)] = &[
    ("plain", "Meeting notes for the quarterly review"),
    ("heading", "## Project kickoff"),
    ("emphasis", "# **Bold** and *italic* with ~~strike~~ and ==mark=="),
    ("links", "See [[Roadmap|the roadmap]] and [docs](https://example.com/docs)"),
    ("escaped", r"\*\*Literal\*\* stars and \_underscores\_ \[x\]"),
    (
        "mixed",
        r"> [!note] <b>Q3</b> `plan`: **_review_** [[a|b]] %%todo%% $x^2$ [^1]",
    ),
];

/// Creates a synthetic line with the given number of emphasized words.
fn create_long_line(word_count: usize) -> String {
    (0..word_count)
        .map(|i| match i % 4 {
            0 => format!("**w{}**", i),
            1 => format!("_w{}_", i),
            2 => format!("[[n{}|w{}]]", i, i),
            _ => format!("w{}", i),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Benchmark extraction on typical first lines.
fn bench_extract_title(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_title");
    let settings = Settings::default();

    for (name, line) in LINES {
        group.bench_with_input(BenchmarkId::new("line", name), line, |b, line| {
            b.iter(|| extract_title(black_box(line), &settings));
        });
    }

    group.finish();
}

/// Benchmark extraction at various line lengths.
fn bench_long_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_lines");
    let settings = Settings::default();

    for word_count in [10, 100, 1000].iter() {
        let line = create_long_line(*word_count);
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::new("words", word_count), &line, |b, line| {
            b.iter(|| extract_title(black_box(line), &settings));
        });
    }

    group.finish();
}

/// Benchmark filename sanitization.
fn bench_sanitize(c: &mut Criterion) {
    let default = Settings::default();
    let strict = Settings::strict();
    let title = "Q3: plans/ideas | draft #2 [wip] ^ref";

    c.bench_function("sanitize_default", |b| {
        b.iter(|| sanitize_filename(black_box(title), &default));
    });

    c.bench_function("sanitize_strict", |b| {
        b.iter(|| sanitize_filename(black_box(title), &strict));
    });
}

/// Benchmark the batch API.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_titles");
    let settings = Settings::default();

    for note_count in [100, 1000].iter() {
        let lines: Vec<&str> = LINES.iter().map(|(_, l)| *l).cycle().take(*note_count).collect();
        group.throughput(Throughput::Elements(*note_count as u64));
        group.bench_with_input(BenchmarkId::new("notes", note_count), &lines, |b, lines| {
            b.iter(|| extract_titles(black_box(lines), &settings));
        });
    }

    group.finish();
}

/// Benchmark whole-note processing with frontmatter.
fn bench_note_content(c: &mut Criterion) {
    let settings = Settings::default();
    let note = format!(
        "---\ntags: [a, b]\naliases: [x]\n---\n\n# **Weekly** review\n{}",
        "Body text.\n".repeat(200)
    );

    c.bench_function("title_from_content", |b| {
        b.iter(|| title_from_content(black_box(&note), &settings));
    });
}

criterion_group!(
    benches,
    bench_extract_title,
    bench_long_lines,
    bench_sanitize,
    bench_batch,
    bench_note_content,
);
criterion_main!(benches);
