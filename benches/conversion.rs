//! Benchmarks for converting Vim patterns.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use vim_regex::{ConversionOptions, VimRegexConverter, convert_quantifier};

/// Patterns of the kind found in syntax files and search histories.
const CORPUS: &[&str] = &[
    r"\<fu\%[nction]\>",
    r"^\s*\(if\|while\|for\)\>",
    r"\v^(\w+)\s*\=\s*(.{-})$",
    r"\d\{1,3}\(\.\d\{1,3}\)\{3}",
    r"[^[:space:]\]]\+",
    r".*bar\&.*foo",
    r"\z(['\x22]\).\{-}\z1",
    r"\c\Vhello.world",
    r"\(foo\)\@<=bar\zs\w\+\ze;",
    r"\%^\_.\{-}\n\_^#\+",
];

fn generate_long_pattern(pieces: usize) -> String {
    let mut pattern = String::new();
    for i in 0..pieces {
        if i > 0 {
            pattern.push_str(r"\|");
        }
        pattern.push_str(CORPUS[i % CORPUS.len()]);
    }
    pattern
}

fn benchmark_corpus(c: &mut Criterion) {
    let options = ConversionOptions::default();

    c.bench_function("convert corpus", |b| {
        b.iter(|| {
            for pattern in CORPUS {
                let _ = VimRegexConverter::convert(black_box(pattern), &options);
            }
        });
    });
}

fn benchmark_multiline_corpus(c: &mut Criterion) {
    let options = ConversionOptions::default_multiline();

    c.bench_function("convert corpus (multiline)", |b| {
        b.iter(|| {
            for pattern in CORPUS {
                let _ = VimRegexConverter::convert(black_box(pattern), options);
            }
        });
    });
}

fn benchmark_long_pattern(c: &mut Criterion) {
    let options = ConversionOptions::default();
    let pattern = generate_long_pattern(200);

    c.bench_function("convert long alternation", |b| {
        b.iter(|| VimRegexConverter::convert(black_box(&pattern), &options));
    });
}

fn benchmark_quantifiers(c: &mut Criterion) {
    c.bench_function("convert quantifiers", |b| {
        b.iter(|| {
            for q in [r"\{}", r"\{3}", r"\{3,}", r"\{,5}", r"\{-2,5}"] {
                let _ = convert_quantifier(black_box(q));
            }
        });
    });
}

fn benchmark_convert_and_compile(c: &mut Criterion) {
    let options = ConversionOptions::default();

    c.bench_function("convert and compile corpus", |b| {
        b.iter(|| {
            for pattern in CORPUS {
                if let Ok(converter) = VimRegexConverter::new(black_box(pattern), &options) {
                    let _ = converter.to_regex();
                }
            }
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = benchmark_corpus,
              benchmark_multiline_corpus,
              benchmark_long_pattern,
              benchmark_quantifiers,
              benchmark_convert_and_compile
}
criterion_main!(benches);
