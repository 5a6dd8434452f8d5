//! Benchmarks for status aggregation and store listing.

use certflow::core::{
    derive_status, CertStage, Domain, GitInfo, StageStatus, Workflow, WorkflowCreateRequest,
};
use certflow::store::{InMemoryWorkflowStore, Page, WorkflowFilter, WorkflowRepository};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_workflow(id: &str) -> Workflow {
    let git = GitInfo::new("git@gitlab.com:acme/repo.git", "main", "abc123").with_author("alice");
    Workflow::from_request(id, WorkflowCreateRequest::new(git, Domain::Banking), Utc::now())
}

fn derive_status_benchmark(c: &mut Criterion) {
    let mut workflow = sample_workflow("wf-bench");
    for result in workflow.stage_results.values_mut() {
        result.status = StageStatus::Succeeded;
    }
    let results = workflow.stage_results;

    c.bench_function("derive_status", |b| {
        b.iter(|| black_box(derive_status(black_box(&results))))
    });
}

fn list_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let store = InMemoryWorkflowStore::new();
    runtime.block_on(async {
        for i in 0..1000 {
            store.create(sample_workflow(&format!("wf-{i}"))).await;
        }
    });
    let filter = WorkflowFilter::new()
        .with_author("ALICE")
        .with_stage(CertStage::Compliance);

    c.bench_function("list_filtered_1000", |b| {
        b.iter(|| runtime.block_on(store.list(black_box(&filter), Page::default())))
    });
}

criterion_group!(benches, derive_status_benchmark, list_benchmark);
criterion_main!(benches);
