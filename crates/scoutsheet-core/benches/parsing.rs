use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scoutsheet_core::config::parse_config_str;
use scoutsheet_core::field::FieldDescriptor;

fn bench_field_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_line");

    let switch = "SWITCH ;; Climbed,Parked,Defended ;; climbed,parked,defended";
    let segmented = "SEGMENTED_CONTROL<Low Goal, High Goal, Missed> ;; Shot ;; shot_type";

    group.bench_function("switch", |b| {
        b.iter(|| FieldDescriptor::parse(black_box(switch)))
    });

    group.bench_function("segmented_with_columns", |b| {
        b.iter(|| {
            let field = FieldDescriptor::parse(black_box(segmented)).unwrap();
            field.columns().len()
        })
    });

    group.finish();
}

fn bench_config(c: &mut Criterion) {
    let config = {
        let mut s = String::new();
        for i in 0..100 {
            s.push_str(&format!("STEPPER ;; Cycle {i} ;; cycle_{i}\n"));
            s.push_str(&format!("SWITCH ;; Done {i} ;; done_{i}\n"));
        }
        for i in 0..20 {
            s.push_str(&format!("Score {i} = cycle_{i} * 2 + done_{i}_yes * 5\n"));
        }
        s
    };

    c.bench_function("parse_config_220_lines", |b| {
        b.iter(|| parse_config_str(black_box(&config)))
    });
}

criterion_group!(benches, bench_field_lines, bench_config);
criterion_main!(benches);
