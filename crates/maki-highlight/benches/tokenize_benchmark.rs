//! Benchmarks for FSH tokenization
//!
//! Covers long documents, deep element paths and dense cardinality lists,
//! plus the cost of building the grammar itself.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use maki_highlight::{FSH, build_fsh_grammar, highlight_fsh};
use maki_tokenizer::{Tokenizer, TokenizerConfig};
use std::hint::black_box;

const PROFILE: &str = r#"Alias: $sct = http://snomed.info/sct
Alias: $loinc = http://loinc.org

Profile: ComplexObservation
Parent: Observation
Id: complex-observation
Title: "Complex Observation"
Description: """
An observation profile with a bit of everything.
"""
* ^status = #active
* ^experimental = false
* status 1..1 MS
* code from $loinc (extensible)
* code.coding[loinc] 1..1 MS
* value[x] only Quantity or CodeableConcept
* component contains systolic 1..1 MS and diastolic 1..1 MS
* component[systolic].code = $loinc#8480-6 "Systolic blood pressure"
* effectiveDateTime = "2024-01-15T10:30:00Z" // measured at rest
"#;

/// Benchmark a realistic profile
fn bench_profile(c: &mut Criterion) {
    c.bench_function("tokenize_profile", |b| {
        b.iter(|| highlight_fsh(black_box(PROFILE)));
    });
}

/// Benchmark documents of increasing size
fn bench_large_documents(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_lines");

    for lines in [100, 1000, 5000] {
        let source = vec!["* identifier 1..* MS"; lines].join("\n");
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &source, |b, source| {
            b.iter(|| highlight_fsh(black_box(source)));
        });
    }

    group.finish();
}

/// Benchmark one long dotted path
fn bench_deep_path(c: &mut Criterion) {
    let source = format!("* {}valueString", "extension.".repeat(50));

    c.bench_function("tokenize_deep_path", |b| {
        b.iter(|| highlight_fsh(black_box(&source)));
    });
}

/// Benchmark many cardinalities on one line
fn bench_many_cardinalities(c: &mut Criterion) {
    let source = vec!["1..*"; 100].join(" ");

    c.bench_function("tokenize_many_cardinalities", |b| {
        b.iter(|| highlight_fsh(black_box(&source)));
    });
}

/// Benchmark with a step budget in place
fn bench_step_budget(c: &mut Criterion) {
    let source = PROFILE.repeat(20);
    let tokenizer = Tokenizer::new(TokenizerConfig::default().with_max_steps(1_000_000));

    c.bench_function("tokenize_with_step_budget", |b| {
        b.iter(|| tokenizer.tokenize(black_box(&source), &FSH));
    });
}

/// Benchmark grammar construction
fn bench_build_grammar(c: &mut Criterion) {
    c.bench_function("build_fsh_grammar", |b| {
        b.iter(|| build_fsh_grammar().unwrap());
    });
}

criterion_group!(
    benches,
    bench_profile,
    bench_large_documents,
    bench_deep_path,
    bench_many_cardinalities,
    bench_step_budget,
    bench_build_grammar
);
criterion_main!(benches);
