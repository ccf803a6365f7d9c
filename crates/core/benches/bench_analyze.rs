//! Benchmark for the full per-contract analysis path.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hugin_core::{
    hugin_classify::{classify, HeuristicHints, NoText},
    hugin_disassemble::analyze,
};

fn synthetic_token(bodies: usize) -> String {
    let mut hex = String::from(
        "63a9059cbb14610040576370a0823114610080576318160ddd146100c057",
    );
    for _ in 0..bodies {
        hex.push_str("5b335414610100575403550155");
    }
    hex
}

fn test_analyze_and_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("hugin_core");

    for bodies in [10usize, 100] {
        let bytecode = synthetic_token(bodies);
        group.bench_function(BenchmarkId::new("analyze_classify", bodies), |b| {
            b.iter(|| {
                let analysis = analyze(&bytecode);
                classify("0xaa", Some(&analysis), &NoText, &HeuristicHints::default())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, test_analyze_and_classify);
criterion_main!(benches);
