//! Benchmarks for roster normalization and table building
//!
//! Run with: cargo bench

use aula::grading::{build_grade_table, build_summary, Term, TermData};
use aula::normalize::{split_references, RosterEntry};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::{json, Value};

const NAMES: [&str; 6] = ["Ana", "Álvaro", "beto", "Carla", "Ñusta", "Nora"];

fn create_roster(count: usize) -> Vec<RosterEntry> {
    (0..count)
        .map(|i| RosterEntry::new(format!("s{}", i), format!("{} {}", NAMES[i % NAMES.len()], i)))
        .collect()
}

/// Grade records in the three shapes the backend sends, for half the roster
fn create_grade_records(count: usize) -> Vec<Value> {
    (0..count)
        .step_by(2)
        .map(|i| match i % 3 {
            0 => json!({"estudianteId": format!("s{}", i), "promedioTrimestral": (i % 11) as f64}),
            1 => json!({"estudiante": {"_id": format!("s{}", i)}, "promedio": "7,5"}),
            _ => json!({"alumno": {"estudiante": format!("s{}", i)}, "nota": 12}),
        })
        .collect()
}

fn create_mixed_references(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let id = format!("s{}", i % (count / 2).max(1));
            if i % 2 == 0 {
                Value::String(id)
            } else {
                json!({"_id": id, "nombre": format!("Alumno {}", i)})
            }
        })
        .collect()
}

fn bench_grade_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade_table");

    for size in [30, 300, 3000] {
        let roster = create_roster(size);
        let records = create_grade_records(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("build_{}", size), |b| {
            b.iter(|| build_grade_table(black_box(&roster), black_box(&records)))
        });
    }

    group.finish();
}

fn bench_split_references(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_references");

    for size in [30, 300, 3000] {
        let values = create_mixed_references(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("split_{}", size), |b| {
            b.iter(|| split_references(black_box(&values)))
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let roster = create_roster(300);
    let terms: Vec<(Term, TermData)> = Term::all()
        .into_iter()
        .map(|term| {
            (
                term,
                TermData {
                    grades: create_grade_records(300),
                    attendance: Vec::new(),
                    working_days: Some(50),
                },
            )
        })
        .collect();

    c.bench_function("summary_300", |b| {
        b.iter(|| build_summary(black_box(&roster), black_box(&terms)))
    });
}

criterion_group!(benches, bench_grade_table, bench_split_references, bench_summary);
criterion_main!(benches);
