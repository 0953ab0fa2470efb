// Integration tests for codebuff
use codebuff::metrics::{doc_diff, hidden_text, levenshtein_distance};
use codebuff::prelude::*;
use codebuff::{AccuracyReport, Error, FeatureVector};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const POINT: &str = "class Point {
    int x;
    int y;
    int sum(int a, int b) {
        int c = a + b;
        return c * x;
    }
}";

const POINT_SQUASHED: &str = "class Point{int x;int y;int sum(int a,int b){int c=a+b;return c*x;}}";

fn write_corpus(dir: &Path) {
    fs::write(dir.join("Point.java"), POINT).unwrap();
    fs::write(dir.join("Broken.java"), "class Broken { void f( }").unwrap();
    fs::write(dir.join("notes.md"), "# not java").unwrap();
}

fn train(dir: &Path, lang: &Language) -> Arc<Corpus> {
    Arc::new(Trainer::train_dir(dir, lang).unwrap())
}

#[test]
fn test_train_format_roundtrip() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let lang = Language::by_name("java").unwrap();
    let corpus = train(dir.path(), &lang);
    assert_eq!(corpus.len(), 32);

    let knn = KnnClassifier::new(corpus, ClassifierConfig::with_k(1)).unwrap();
    let mut formatter = Formatter::new(knn, &lang, FormatConfig::default()).unwrap();
    let doc = InputDocument::from_source("In.java", POINT_SQUASHED, &lang).unwrap();
    let out = formatter.format(&doc).unwrap();
    assert_eq!(out.text, POINT);
}

#[test]
fn test_metrics_on_formatted_output() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let lang = Language::by_name("java").unwrap();
    let knn = KnnClassifier::new(train(dir.path(), &lang), ClassifierConfig::with_k(1)).unwrap();
    let mut formatter = Formatter::new(knn, &lang, FormatConfig::with_diagnostics()).unwrap();

    let doc = InputDocument::from_source("Point.java", POINT, &lang).unwrap();
    let out = formatter.format(&doc).unwrap();

    let report = AccuracyReport::from_analysis(&out.analysis);
    assert_eq!(report.overall.total, doc.real_count() - 1);
    assert_eq!(report.overall.percent(), 100.0);
    assert_eq!(report.alignment.percent(), 100.0);

    let formatted_tokens = lang.front_end().tokenize(&out.text).unwrap();
    assert_eq!(levenshtein_distance(&hidden_text(&doc.parsed.tokens), &hidden_text(&formatted_tokens)), 0.0);
    assert_eq!(levenshtein_distance(&doc.content, &out.text), 0.0);
    assert_eq!(doc_diff(&doc.content, &out.text, lang.front_end()).unwrap(), 0.0);

    let squashed = InputDocument::from_source("In.java", POINT_SQUASHED, &lang).unwrap();
    // 56 hidden chars in POINT; the 8 single spaces it shares with the squashed input cost nothing
    assert_eq!(doc_diff(&squashed.content, POINT, lang.front_end()).unwrap(), 48.0 / 56.0);
}

#[test]
fn test_cache_hits_rise_on_second_pass() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let lang = Language::by_name("java").unwrap();
    let knn = KnnClassifier::new(train(dir.path(), &lang), ClassifierConfig::default()).unwrap();
    let mut formatter = Formatter::new(knn, &lang, FormatConfig::default()).unwrap();
    let doc = InputDocument::from_source("In.java", POINT_SQUASHED, &lang).unwrap();

    formatter.format(&doc).unwrap();
    let first = formatter.stats();
    formatter.format(&doc).unwrap();
    let second = formatter.stats();

    assert!(second.classify_hits() > first.classify_hits());
    assert_eq!(second.classify_calls(), 2 * first.classify_calls());
    assert_eq!(second.classify_hits() - first.classify_hits(), first.classify_calls());
    assert!(second.classify_hit_rate() > first.classify_hit_rate());
}

#[test]
fn test_snapshot_roundtrip_formats_identically() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let lang = Language::by_name("java").unwrap();
    let corpus = train(dir.path(), &lang);

    let store = CorpusStore::new(dir.path().join("snapshots")).unwrap();
    let desc = store.save(&corpus).unwrap();
    assert!(desc.checksum.is_some());
    let loaded = store.load(&desc.name, "java").unwrap();
    assert_eq!(&loaded, corpus.as_ref());

    let doc = InputDocument::from_source("In.java", POINT_SQUASHED, &lang).unwrap();
    let format_with = |corpus: Arc<Corpus>| {
        let knn = KnnClassifier::new(corpus, ClassifierConfig::with_k(3)).unwrap();
        Formatter::new(knn, &lang, FormatConfig::default()).unwrap().format(&doc).unwrap().text
    };
    assert_eq!(format_with(corpus.clone()), format_with(Arc::new(loaded)));
}

#[test]
fn test_configuration_errors() {
    assert!(matches!(Language::by_name("cobol"), Err(Error::UnsupportedLanguage(_))));

    let dir = TempDir::new().unwrap();
    let lang = Language::by_name("java").unwrap();
    let empty = train(dir.path(), &lang);
    assert!(matches!(
        KnnClassifier::new(empty, ClassifierConfig::default()),
        Err(Error::EmptyCorpus)
    ));

    write_corpus(dir.path());
    let corpus = train(dir.path(), &lang);
    let too_many = ClassifierConfig::with_k(corpus.len() + 1);
    assert!(matches!(KnnClassifier::new(corpus.clone(), too_many), Err(Error::InvalidK { .. })));
    assert!(matches!(
        KnnClassifier::new(corpus, ClassifierConfig::with_k(0)),
        Err(Error::InvalidK { k: 0, .. })
    ));
}

#[test]
fn test_classifier_rejects_wrong_dimension() {
    let dir = TempDir::new().unwrap();
    write_corpus(dir.path());
    let lang = Language::by_name("java").unwrap();
    let mut knn = KnnClassifier::new(train(dir.path(), &lang), ClassifierConfig::default()).unwrap();
    let err = knn.classify(&FeatureVector::new(vec![1, 2, 3])).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 10, actual: 3 }));
    assert_eq!(knn.stats().classify_calls(), 0);
}

#[test]
fn test_c_language_pipeline() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sum.c"),
        "int sum(int a, int b) {\n    int c = a + b;\n    return c;\n}",
    )
    .unwrap();
    let lang = Language::by_name("c").unwrap();
    let corpus = train(dir.path(), &lang);
    assert_eq!(corpus.language(), "c");
    assert_eq!(corpus.len(), 20);

    let knn = KnnClassifier::new(corpus, ClassifierConfig::with_k(3)).unwrap();
    let mut formatter = Formatter::new(knn, &lang, FormatConfig::default()).unwrap();
    let input = "int twice(int a){return a+a;}";
    let doc = InputDocument::from_source("in.c", input, &lang).unwrap();
    let out = formatter.format(&doc).unwrap();

    let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(squash(&out.text), squash(input));
    assert!(!out.text.ends_with(char::is_whitespace));
}
