use chrono::NaiveDate;
use condo_projection::{
    project, Bill, CacheStore, DateRange, GroupBy, InMemoryFinancialSource, ProjectionService,
    Recurrence, Residence,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::time::Duration;

fn records() -> (Vec<Bill>, Vec<Residence>) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let recurrences = [
        Recurrence::Monthly,
        Recurrence::Quarterly,
        Recurrence::Yearly,
        Recurrence::Weekly,
    ];
    let bills = (0..40)
        .map(|i| {
            Bill::new(
                format!("bill-{}", i),
                "bench",
                format!("category-{}", i % 8),
                format!("{}.50", 100 + i),
                recurrences[i % recurrences.len()].clone(),
                start,
            )
        })
        .collect();
    let residences = (0..120)
        .map(|i| Residence::new(format!("r-{}", i), "bench", Some("1450.00"), i % 10 != 0))
        .collect();
    (bills, residences)
}

fn projection_compute_benchmark(c: &mut Criterion) {
    let (bills, residences) = records();
    let range = DateRange::years(2024, 2033).unwrap();

    c.bench_function("project 10 years monthly", |b| {
        b.iter(|| project(black_box(&bills), black_box(&residences), range, GroupBy::Monthly));
    });
}

fn projection_cached_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (bills, residences) = records();

    let source = Arc::new(InMemoryFinancialSource::new());
    source.add_building("bench", "Bench");
    bills.into_iter().for_each(|bill| source.add_bill(bill));
    residences.into_iter().for_each(|r| source.add_residence(r));
    let store = Arc::new(CacheStore::in_memory(Duration::from_secs(3600)));
    let service = ProjectionService::new(source, store);
    let range = DateRange::years(2024, 2033).unwrap();

    c.bench_function("projection cache hit", |b| {
        b.to_async(&runtime).iter(|| async {
            service
                .projection(black_box("bench"), range, GroupBy::Monthly, false)
                .await
                .unwrap();
        });
    });
}

criterion_group!(benches, projection_compute_benchmark, projection_cached_benchmark);
criterion_main!(benches);
