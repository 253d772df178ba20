use criterion::{black_box, criterion_group, criterion_main, Criterion};
use signal_plan_checker::models::{ChangeRequest, InitConfig, Project};
use signal_plan_checker::{compute_realised_cycle, compute_scaled_plan, run_validation};

/// Five junctions with six stages each, the largest chain the tool allows
fn large_project() -> Project {
    let mut config = InitConfig::default();
    config.junction_count.default = 5;
    let mut project = Project::from_config(&config);
    project.main_cycle = 120;
    for junction in &mut project.junctions {
        junction.resize_stages(6, &config);
        junction.utc_plan = (0..6)
            .map(|k| ChangeRequest::new(format!("S{}", k + 1), k * 20))
            .collect();
    }
    project
}

fn benchmark_realisation(c: &mut Criterion) {
    let project = large_project();

    c.bench_function("realise_all_junctions", |b| {
        b.iter(|| {
            for junction in &project.junctions {
                let _ = compute_realised_cycle(black_box(junction), black_box(project.main_cycle));
            }
        });
    });

    c.bench_function("scale_all_junctions", |b| {
        b.iter(|| {
            for junction in &project.junctions {
                let _ = compute_scaled_plan(black_box(junction), project.context(), black_box(90));
            }
        });
    });

    // What runs on every edit in the UI
    c.bench_function("validate_project", |b| {
        b.iter(|| run_validation(black_box(&project)));
    });
}

criterion_group!(benches, benchmark_realisation);
criterion_main!(benches);
