use std::hint::black_box;

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use schedule_engine::{CalendarSchedule, IntervalTree};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for count in [16, 256, 4096].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let mut tree = IntervalTree::new();
                for i in 0..count {
                    tree.add(i, i + (i % 7), i).unwrap();
                }
                tree.rebuild();
                black_box(tree);
            });
        });
    }

    group.finish();
}

fn bench_tree_queries(c: &mut Criterion) {
    let mut tree = IntervalTree::new();
    for i in 0..1024 {
        tree.add(i * 3, i * 3 + 10, i).unwrap();
    }
    tree.rebuild();

    c.bench_function("tree_point_query", |b| {
        b.iter(|| black_box(tree.query(black_box(&1500))));
    });
    c.bench_function("tree_forward_query", |b| {
        b.iter(|| black_box(tree.query_forward(black_box(&1000), black_box(&1100))));
    });
}

fn bench_nearest(c: &mut Criterion) {
    let cases = [
        ("every_second", "*:*:*"),
        ("weekday_morning", "*.*.* 1-5 09:30:00"),
        ("odd_days_september", "*.9.*/2 1-5 10:00:00"),
        ("last_day_of_month", "*.*.32 12:00:00"),
        ("leap_day", "*.2.29 00:00:00"),
    ];
    let start = at(2025, 3, 1, 12, 0);

    let mut group = c.benchmark_group("nearest_event");
    for (name, expr) in cases {
        let schedule: CalendarSchedule = expr.parse().unwrap();
        group.bench_function(BenchmarkId::new("forward", name), |b| {
            b.iter(|| black_box(schedule.nearest_event(black_box(start)).unwrap()));
        });
        group.bench_function(BenchmarkId::new("backward", name), |b| {
            b.iter(|| black_box(schedule.nearest_prev_event(black_box(start)).unwrap()));
        });
    }
    group.finish();
}

fn bench_upcoming(c: &mut Criterion) {
    let schedule: CalendarSchedule = "*.*.* 1-5 9,13:00:00".parse().unwrap();
    let start = at(2025, 1, 1, 0, 0);

    c.bench_function("upcoming_100", |b| {
        b.iter(|| black_box(schedule.upcoming(start).take(100).count()));
    });
}

criterion_group!(
    benches,
    bench_tree_build,
    bench_tree_queries,
    bench_nearest,
    bench_upcoming
);
criterion_main!(benches);
