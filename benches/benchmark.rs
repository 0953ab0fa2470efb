// Training, classification and formatting throughput
use codebuff::prelude::*;
use codebuff::FeatureVector;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::sync::Arc;

const NAMES: &[&str] = &["a", "b", "count", "total", "x", "y", "step", "value"];
const OPS: &[&str] = &["+", "-", "*", "/"];

/// A class with `methods` methods of `stmts` random statements, in one style
fn generate_class(rng: &mut impl Rng, methods: usize, stmts: usize) -> String {
    let mut src = String::from("class Gen {\n");
    for m in 0..methods {
        src.push_str(&format!("    int m{}(int a, int b) {{\n", m));
        for _ in 0..stmts {
            let lhs = NAMES.choose(rng).unwrap();
            let x = NAMES.choose(rng).unwrap();
            let y = NAMES.choose(rng).unwrap();
            let op = OPS.choose(rng).unwrap();
            src.push_str(&format!("        {} = {} {} {};\n", lhs, x, op, y));
        }
        src.push_str("        return a;\n    }\n");
    }
    src.push('}');
    src
}

fn squash(src: &str) -> String {
    src.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn train(lang: &Language, docs: &[String]) -> Arc<Corpus> {
    let mut trainer = Trainer::new(lang);
    for (i, doc) in docs.iter().enumerate() {
        trainer.add_source(&format!("Gen{}.java", i), doc).unwrap();
    }
    Arc::new(trainer.finish().unwrap())
}

fn benchmark_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    let lang = Language::by_name("java").unwrap();
    let mut rng = rand::rng();

    for size in [1, 10, 50].iter() {
        let docs: Vec<String> = (0..*size).map(|_| generate_class(&mut rng, 4, 8)).collect();
        group.bench_with_input(BenchmarkId::new("java", size), &docs, |b, docs| {
            b.iter(|| black_box(train(&lang, docs)));
        });
    }

    group.finish();
}

fn benchmark_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let lang = Language::by_name("java").unwrap();
    let mut rng = rand::rng();
    let docs: Vec<String> = (0..20).map(|_| generate_class(&mut rng, 4, 8)).collect();
    let corpus = train(&lang, &docs);

    let queries: Vec<FeatureVector> = corpus.iter().take(256).map(|e| e.features.clone()).collect();

    for k in [1, 11].iter() {
        group.bench_with_input(BenchmarkId::new("uncached", k), k, |b, &k| {
            b.iter(|| {
                let mut knn = KnnClassifier::new(corpus.clone(), ClassifierConfig::with_k(k)).unwrap();
                for q in &queries {
                    black_box(knn.classify(q).unwrap());
                }
            });
        });
    }

    let mut warm = KnnClassifier::new(corpus.clone(), ClassifierConfig::default()).unwrap();
    for q in &queries {
        warm.classify(q).unwrap();
    }
    group.bench_function("cached", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(warm.classify(black_box(q)).unwrap());
            }
        });
    });

    group.finish();
}

fn benchmark_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    group.sample_size(20);
    let lang = Language::by_name("java").unwrap();
    let mut rng = rand::rng();
    let docs: Vec<String> = (0..20).map(|_| generate_class(&mut rng, 4, 8)).collect();
    let corpus = train(&lang, &docs);

    for methods in [1, 8].iter() {
        let input = squash(&generate_class(&mut rng, *methods, 8));
        let doc = InputDocument::from_source("In.java", &input, &lang).unwrap();
        group.bench_with_input(BenchmarkId::new("java", methods), &doc, |b, doc| {
            b.iter(|| {
                let knn = KnnClassifier::new(corpus.clone(), ClassifierConfig::default()).unwrap();
                let mut formatter = Formatter::new(knn, &lang, FormatConfig::default()).unwrap();
                black_box(formatter.format(doc).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_train, benchmark_classify, benchmark_format);
criterion_main!(benches);
