//! Profiling performance benchmarks.
//!
//! Measures parsing and profiling across table sizes and column counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dataward::{DataTable, Parser, Profiler, PromptBuilder, Value};

/// Generate synthetic CSV data with the specified number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    let header: Vec<String> = (0..cols).map(|i| format!("column_{}", i + 1)).collect();
    data.push_str(&header.join(","));
    data.push('\n');

    for row in 0..rows {
        let cells: Vec<String> = (0..cols)
            .map(|col| match col % 5 {
                0 => format!("ID_{:06}", row),
                1 => format!("{:.2}", row as f64 * 1.5),
                2 => format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
                3 => if row % 7 == 0 { String::new() } else { (row % 2 == 0).to_string() },
                _ => format!("Category_{}", row % 10),
            })
            .collect();
        data.push_str(&cells.join(","));
        data.push('\n');
    }

    data
}

/// Build an in-memory table with repeated rows so duplicate detection has work to do.
fn generate_table(rows: usize, cols: usize) -> DataTable {
    let headers = (0..cols).map(|i| format!("column_{}", i + 1)).collect();
    let rows = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| match (row + col) % 4 {
                    0 => Value::Null,
                    1 => Value::Integer((row % 100) as i64),
                    2 => Value::Float((row % 50) as f64 * 0.5),
                    _ => Value::from(format!("v{}", row % 25)),
                })
                .collect()
        })
        .collect();
    DataTable::new(headers, rows)
}

/// Benchmark profiling tables of various sizes.
fn bench_profile_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_rows");
    let profiler = Profiler::new();

    for rows in [100, 1_000, 10_000].iter() {
        let table = generate_table(*rows, 10);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(profiler.profile(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark profiling with varying column counts.
fn bench_profile_column_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_column_scaling");
    let profiler = Profiler::new();

    for cols in [5, 20, 50].iter() {
        let table = generate_table(1_000, *cols);

        group.bench_with_input(BenchmarkId::new("cols", cols), &table, |b, table| {
            b.iter(|| black_box(profiler.profile(table).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark parsing plus profiling plus prompt rendering.
fn bench_parse_and_prompt(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_prompt");
    let parser = Parser::new();
    let profiler = Profiler::new();
    let prompts = PromptBuilder::new();

    for rows in [1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| {
                let table = parser.parse_bytes(data.as_bytes(), b',').unwrap();
                let profile = profiler.profile(&table).unwrap();
                black_box(prompts.build(&profile))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_profile_rows,
    bench_profile_column_scaling,
    bench_parse_and_prompt,
);
criterion_main!(benches);
