use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqltidy::dialect::dialect_from_name;
use sqltidy::lexer::tokenize;
use sqltidy::pipeline::Pipeline;
use sqltidy::queue::WorkQueue;
use sqltidy::{format_string, Mode};

fn load_input(dialect: &str, name: &str) -> String {
    let path = format!("tests/data/input/{}/{}", dialect, name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
}

fn mode_for(dialect: &str) -> Mode {
    Mode {
        dialect_name: dialect.to_string(),
        ..Mode::default()
    }
}

/// The schema fixture repeated to a few thousand lines.
fn large_script() -> String {
    load_input("standard", "schema.sql").repeat(50)
}

fn bench_format_small(c: &mut Criterion) {
    let sql = "SELECT a, b, c FROM my_table WHERE x = 1 AND y > 2 ORDER BY a;\n";
    let mode = Mode::default();
    c.bench_function("format_small", |b| {
        b.iter(|| format_string(black_box(sql), black_box(&mode)).unwrap())
    });
}

fn bench_format_oracle_package(c: &mut Criterion) {
    let sql = load_input("oracle", "package.sql");
    let mode = mode_for("oracle");
    c.bench_function("format_oracle_package", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&mode)).unwrap())
    });
}

fn bench_format_large(c: &mut Criterion) {
    let sql = large_script();
    let mode = Mode::default();
    c.bench_function("format_large", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&mode)).unwrap())
    });
}

fn bench_lex_only(c: &mut Criterion) {
    let sql = large_script();
    let dialect = dialect_from_name("standard").unwrap();
    c.bench_function("lex_only", |b| {
        b.iter(|| tokenize(black_box(&sql), dialect.as_ref()).unwrap())
    });
}

fn bench_classify_only(c: &mut Criterion) {
    let sql = large_script();
    let mode = Mode::default();
    let dialect = mode.dialect().unwrap();
    let pipeline = Pipeline::for_dialect(dialect.as_ref(), mode.format_options()).unwrap();
    let tokens = tokenize(&sql, dialect.as_ref()).unwrap();
    c.bench_function("classify_only", |b| {
        b.iter(|| {
            let mut queue = WorkQueue::from_tokens(black_box(tokens.clone()));
            pipeline.classify(&mut queue);
            queue
        })
    });
}

/// Formatting with and without the re-lex equivalence check.
fn bench_safety_check_overhead(c: &mut Criterion) {
    let sql = large_script();
    let mut group = c.benchmark_group("safety_check_overhead");

    let mode_with = Mode::default();
    group.bench_function("with_safety", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&mode_with)).unwrap())
    });

    let mode_without = Mode {
        fast: true,
        ..Mode::default()
    };
    group.bench_function("without_safety", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&mode_without)).unwrap())
    });

    group.finish();
}

fn bench_format_idempotent(c: &mut Criterion) {
    let mode = Mode::default();
    let formatted = format_string(&large_script(), &mode).unwrap();
    c.bench_function("format_idempotent", |b| {
        b.iter(|| format_string(black_box(&formatted), black_box(&mode)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_format_small,
    bench_format_oracle_package,
    bench_format_large,
    bench_lex_only,
    bench_classify_only,
    bench_safety_check_overhead,
    bench_format_idempotent
);
criterion_main!(benches);
