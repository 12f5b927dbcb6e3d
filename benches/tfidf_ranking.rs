use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use teaching_assistant::services::tfidf::{best_match, similarity_scores};

const WORDS: &[&str] = &[
    "gradient", "descent", "neural", "network", "layer", "weight", "bias", "activation",
    "convolution", "recurrent", "attention", "transformer", "embedding", "loss", "optimizer",
    "regularization", "dropout", "batch", "epoch", "learning",
];

fn corpus(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| {
            (0..8)
                .map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("tfidf_best_match");
    for lines in [10, 100, 1000] {
        let docs = corpus(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &docs, |b, docs| {
            b.iter(|| best_match(black_box("how does attention work in a transformer layer"), docs, 0.0));
        });
    }
    group.finish();
}

fn bench_similarity_scores(c: &mut Criterion) {
    let docs = corpus(1000);
    c.bench_function("tfidf_similarity_scores_1000", |b| {
        b.iter(|| similarity_scores(black_box("gradient descent with dropout"), black_box(&docs)));
    });
}

criterion_group!(benches, bench_best_match, bench_similarity_scores);
criterion_main!(benches);
