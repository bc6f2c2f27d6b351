//! Benchmarks for the search pipeline.

use clinicfinder_geo::Coordinate;
use clinicfinder_records::ClinicRecord;
use clinicfinder_search::{search, SearchParams};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_clinics(count: usize) -> Vec<ClinicRecord> {
    (0..count)
        .map(|i| {
            let lat = 30.0 + (i as f64 * 0.013) % 18.0;
            let lng = -120.0 + (i as f64 * 0.029) % 50.0;
            ClinicRecord {
                id: format!("clinic-{i}"),
                slug: None,
                legacy_id: None,
                name: format!("Clinic {i}"),
                address: String::new(),
                coordinates: Coordinate::new(lat, lng),
                services: if i % 3 == 0 {
                    vec!["Dental".into()]
                } else {
                    vec!["Primary Care".into(), "Pharmacy".into()]
                },
                languages: Vec::new(),
                eligibility: Vec::new(),
                hours: None,
                verified: i % 2 == 0,
                summary: None,
                summary_es: None,
                url: None,
                phone: None,
                photo_url: None,
            }
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let params = SearchParams::new()
        .service("dent")
        .reference(Some(Coordinate::new(42.33, -83.05)))
        .radius_miles(500.0);

    for size in [100, 1000, 10000] {
        let clinics = generate_clinics(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &clinics, |b, clinics| {
            b.iter(|| search(black_box(clinics), black_box(&params)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
