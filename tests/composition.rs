// Composition tests — the pipeline stages chained together.
//
// A canned CommentSource and a keyword-based SentimentClassifier stand in
// for Reddit and the model, so these run without network access. Report
// rendering writes into the system temp directory.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use commentmood::pipeline::{self, CommentTable, PipelineOutcome, Stage};
use commentmood::reddit::source::{CommentSource, SearchQuery};
use commentmood::report;
use commentmood::sentiment::{Label, SentimentClassifier, SentimentResult};

// ============================================================
// Test doubles
// ============================================================

struct CannedSource(Result<Vec<String>, String>);

#[async_trait]
impl CommentSource for CannedSource {
    async fn fetch_comments(&self, _query: &SearchQuery) -> Result<Vec<String>> {
        match &self.0 {
            Ok(comments) => Ok(comments.clone()),
            Err(msg) => anyhow::bail!("{msg}"),
        }
    }
}

fn source(comments: &[&str]) -> CannedSource {
    CannedSource(Ok(comments.iter().map(|s| s.to_string()).collect()))
}

/// "Negative" when the text mentions "kötü", positive otherwise. Records
/// every text it sees and can be told to fail on a given call.
struct KeywordClassifier {
    seen: Arc<std::sync::Mutex<Vec<String>>>,
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

impl KeywordClassifier {
    fn new() -> Self {
        Self {
            seen: Arc::new(std::sync::Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            fail_on_call: None,
        }
    }

    fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            anyhow::bail!("inference exploded");
        }
        self.seen.lock().unwrap().push(text.to_string());
        let label = if text.contains("kötü") {
            Label::Negative
        } else {
            Label::Positive
        };
        Ok(SentimentResult { label, score: 0.9 })
    }
}

fn boxed(classifier: KeywordClassifier) -> Result<Box<dyn SentimentClassifier>> {
    Ok(Box::new(classifier))
}

// ============================================================
// Empty-data short circuits
// ============================================================

#[tokio::test]
async fn zero_fetched_comments_never_loads_the_classifier() {
    let loaded = AtomicBool::new(false);
    let outcome = pipeline::run(&source(&[]), &SearchQuery::default(), || {
        loaded.store(true, Ordering::SeqCst);
        boxed(KeywordClassifier::new())
    })
    .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::NothingToReport {
            stage: Stage::Fetched,
            ..
        }
    ));
    assert!(!loaded.load(Ordering::SeqCst), "classifier must not be loaded");
}

#[tokio::test]
async fn fetch_failure_degrades_to_no_data() {
    let failing = CannedSource(Err("search returned 503".to_string()));
    let loaded = AtomicBool::new(false);
    let outcome = pipeline::run(&failing, &SearchQuery::default(), || {
        loaded.store(true, Ordering::SeqCst);
        boxed(KeywordClassifier::new())
    })
    .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::NothingToReport {
            stage: Stage::Fetched,
            ..
        }
    ));
    assert!(!loaded.load(Ordering::SeqCst));
}

#[tokio::test]
async fn all_empty_after_cleaning_stops_before_classification() {
    let loaded = AtomicBool::new(false);
    let outcome = pipeline::run(
        &source(&["https://example.com", "12345", "u/birisi"]),
        &SearchQuery::default(),
        || {
            loaded.store(true, Ordering::SeqCst);
            boxed(KeywordClassifier::new())
        },
    )
    .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::NothingToReport {
            stage: Stage::Cleaned,
            ..
        }
    ));
    assert!(!loaded.load(Ordering::SeqCst));
}

// ============================================================
// Classification
// ============================================================

#[tokio::test]
async fn empty_cleaned_rows_never_reach_the_classifier() {
    let classifier = KeywordClassifier::new();
    let seen = Arc::clone(&classifier.seen);

    let outcome = pipeline::run(
        &source(&[
            "Yapay zeka harika!",
            "https://only-a-link.example",
            "Bence kötü bir fikir.",
            "🤖🤖🤖",
        ]),
        &SearchQuery::default(),
        move || boxed(classifier),
    )
    .await;

    let table = match outcome {
        PipelineOutcome::Ready(table) => table,
        other => panic!("expected Ready, got {other:?}"),
    };

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec!["yapay zeka harika", "bence kötü bir fikir"]);
    assert_eq!(table.len(), 2);
    assert!(table.rows().iter().all(|r| r.label.is_some()));
    assert_eq!(
        table.label_counts(),
        vec![(Label::Positive, 1), (Label::Negative, 1)]
    );
}

#[tokio::test]
async fn classifier_load_failure_skips_reporting() {
    let outcome = pipeline::run(&source(&["güzel"]), &SearchQuery::default(), || {
        anyhow::bail!("model files missing")
    })
    .await;

    match outcome {
        PipelineOutcome::NothingToReport { stage, reason } => {
            assert_eq!(stage, Stage::Cleaned);
            assert!(reason.contains("could not be loaded"));
        }
        other => panic!("expected NothingToReport, got {other:?}"),
    }
}

#[tokio::test]
async fn mid_loop_failure_aborts_the_whole_stage() {
    let mut table = CommentTable::from_raw(vec![
        "bir".to_string(),
        "iki".to_string(),
        "üç".to_string(),
    ]);
    table.clean();

    let result = table.classify(&KeywordClassifier::failing_on(1)).await;

    assert!(result.is_err());
    assert!(
        table.rows().iter().all(|r| r.label.is_none()),
        "no row may keep a label after an aborted stage"
    );
    assert!(!table.is_classified());
}

#[tokio::test]
async fn mid_loop_failure_in_pipeline_is_nothing_to_report() {
    let outcome = pipeline::run(
        &source(&["güzel", "kötü", "harika"]),
        &SearchQuery::default(),
        || boxed(KeywordClassifier::failing_on(2)),
    )
    .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::NothingToReport {
            stage: Stage::Cleaned,
            ..
        }
    ));
}

// ============================================================
// Full chain into the report
// ============================================================

#[tokio::test]
async fn classified_table_renders_both_charts() {
    let outcome = pipeline::run(
        &source(&[
            "Yapay zeka çok güzel gelişiyor",
            "Yapay zeka işleri kolaylaştırıyor",
            "Bu gidişat kötü, yapay zeka tehlikeli",
        ]),
        &SearchQuery::default(),
        || boxed(KeywordClassifier::new()),
    )
    .await;

    let table = match outcome {
        PipelineOutcome::Ready(table) => table,
        other => panic!("expected Ready, got {other:?}"),
    };
    assert_eq!(
        table.label_counts(),
        vec![(Label::Positive, 2), (Label::Negative, 1)]
    );

    let dir = std::env::temp_dir().join("commentmood-composition-report");
    let _ = std::fs::remove_dir_all(&dir);
    let files = report::render(&table, "yapay zeka", &dir).unwrap();

    let cloud = std::fs::read_to_string(&files.word_cloud).unwrap();
    assert!(cloud.contains(r#"width="1200" height="600""#));
    assert!(cloud.contains(">zeka<"));
    assert!(cloud.contains(">yapay<"));
    // "çok" and "bu" are stopwords
    assert!(!cloud.contains(">çok<"));
    assert!(!cloud.contains(">bu<"));

    let chart = std::fs::read_to_string(&files.bar_chart).unwrap();
    let pos = chart.find(">positive<").unwrap();
    let neg = chart.find(">negative<").unwrap();
    assert!(pos < neg, "most frequent label comes first");

    std::fs::remove_dir_all(&dir).unwrap();
}
