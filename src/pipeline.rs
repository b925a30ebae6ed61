// The fetch → clean → classify pipeline and the comment table it carries.
//
// Each stage only runs when the previous one produced rows. Running out of
// data at any point ends the run in a "nothing to report" outcome instead of
// an error; only the caller decides whether to render.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::reddit::source::{CommentSource, SearchQuery};
use crate::sentiment::{Label, SentimentClassifier};
use crate::text::clean_text;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    CredentialsLoaded,
    Fetched,
    Cleaned,
    Classified,
    Reported,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::CredentialsLoaded => "credentials loaded",
            Stage::Fetched => "fetched",
            Stage::Cleaned => "cleaned",
            Stage::Classified => "classified",
            Stage::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// One collected comment. Later fields fill in as stages run.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub raw: String,
    pub cleaned: Option<String>,
    pub label: Option<Label>,
}

impl CommentRecord {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            cleaned: None,
            label: None,
        }
    }
}

/// Rows in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentTable {
    rows: Vec<CommentRecord>,
}

impl CommentTable {
    pub fn from_raw(raw: Vec<String>) -> Self {
        Self {
            rows: raw.into_iter().map(CommentRecord::new).collect(),
        }
    }

    pub fn from_records(rows: Vec<CommentRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[CommentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Clean every row and drop the ones that come out empty.
    pub fn clean(&mut self) {
        for row in &mut self.rows {
            row.cleaned = Some(clean_text(&row.raw));
        }
        self.rows
            .retain(|row| row.cleaned.as_deref().is_some_and(|c| !c.is_empty()));
    }

    /// Cleaned texts in row order. Rows not yet cleaned are skipped.
    pub fn cleaned_texts(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| row.cleaned.as_deref())
    }

    /// Label every cleaned row, one model call per row.
    ///
    /// All-or-nothing: the first failing row aborts the stage and no labels
    /// are written, so the table never ends up half-labeled.
    pub async fn classify(&mut self, classifier: &dyn SentimentClassifier) -> Result<()> {
        let pb = ProgressBar::new(self.rows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Classifying [{bar:30}] {pos}/{len} ({eta})")
                .expect("valid template"),
        );

        let mut labels = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let text = row.cleaned.as_deref().unwrap_or_default();
            match classifier.classify(text).await {
                Ok(result) => labels.push(result.label),
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        for (row, label) in self.rows.iter_mut().zip(labels) {
            row.label = Some(label);
        }
        Ok(())
    }

    /// True once every row carries a label.
    pub fn is_classified(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|row| row.label.is_some())
    }

    /// Rows per label, most frequent first. Ties keep first-seen order.
    pub fn label_counts(&self) -> Vec<(Label, usize)> {
        let mut order: Vec<Label> = Vec::new();
        let mut counts: HashMap<Label, usize> = HashMap::new();
        for label in self.rows.iter().filter_map(|row| row.label) {
            let count = counts.entry(label).or_insert(0);
            if *count == 0 {
                order.push(label);
            }
            *count += 1;
        }

        let mut ranked: Vec<(Label, usize)> = order
            .into_iter()
            .map(|label| (label, counts[&label]))
            .collect();
        // sort_by is stable, which is what keeps ties in first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Every row is cleaned and labeled; ready to render.
    Ready(CommentTable),
    /// Some stage produced no usable data. `stage` is the last one that ran.
    NothingToReport { stage: Stage, reason: String },
}

/// Run fetch → clean → classify.
///
/// `load_classifier` is only called once there is cleaned text to label, so
/// an empty fetch never loads a model. Fetch and classification failures are
/// reported and turned into `NothingToReport`.
pub async fn run<F>(
    source: &dyn CommentSource,
    query: &SearchQuery,
    load_classifier: F,
) -> PipelineOutcome
where
    F: FnOnce() -> Result<Box<dyn SentimentClassifier>>,
{
    // --- Fetch ---
    println!(
        "\n{}",
        format!(
            "Fetching comments for \"{}\" in r/{}...",
            query.keyword, query.subreddit
        )
        .bold()
    );

    let raw = match source.fetch_comments(query).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Fetch failed, continuing with no data");
            println!("  {} Fetching failed: {:#}", "Error:".red(), e);
            Vec::new()
        }
    };

    let mut table = CommentTable::from_raw(raw);
    if table.is_empty() {
        return PipelineOutcome::NothingToReport {
            stage: Stage::Fetched,
            reason: "no comments were fetched".to_string(),
        };
    }
    println!("  {} {} comments fetched", "✓".green(), table.len());

    // --- Clean ---
    println!("\n{}", "Cleaning comment text...".bold());
    let fetched = table.len();
    table.clean();
    info!(fetched = fetched, kept = table.len(), "Cleaned comments");

    if table.is_empty() {
        return PipelineOutcome::NothingToReport {
            stage: Stage::Cleaned,
            reason: "every comment was empty after cleaning".to_string(),
        };
    }
    println!(
        "  {} {} comments kept ({} empty after cleaning)",
        "✓".green(),
        table.len(),
        fetched - table.len()
    );

    // --- Classify ---
    println!(
        "\n{}",
        "Classifying sentiment... (this can take a while)".bold()
    );

    let classifier = match load_classifier() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load sentiment classifier");
            println!("  {} Could not load the sentiment model: {:#}", "Error:".red(), e);
            return PipelineOutcome::NothingToReport {
                stage: Stage::Cleaned,
                reason: "the sentiment model could not be loaded".to_string(),
            };
        }
    };

    if let Err(e) = table.classify(classifier.as_ref()).await {
        warn!(error = %e, "Sentiment classification failed");
        println!("  {} Sentiment analysis failed: {:#}", "Error:".red(), e);
        return PipelineOutcome::NothingToReport {
            stage: Stage::Cleaned,
            reason: "sentiment classification failed".to_string(),
        };
    }

    println!("  {} Sentiment analysis complete", "✓".green());
    PipelineOutcome::Ready(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(labels: &[Label]) -> CommentTable {
        CommentTable::from_records(
            labels
                .iter()
                .map(|&label| CommentRecord {
                    raw: "x".to_string(),
                    cleaned: Some("x".to_string()),
                    label: Some(label),
                })
                .collect(),
        )
    }

    #[test]
    fn test_label_counts_descending() {
        let table = labeled(&[Label::Positive, Label::Positive, Label::Negative]);
        assert_eq!(
            table.label_counts(),
            vec![(Label::Positive, 2), (Label::Negative, 1)]
        );
    }

    #[test]
    fn test_label_counts_majority_first_even_when_seen_second() {
        let table = labeled(&[Label::Positive, Label::Negative, Label::Negative]);
        assert_eq!(
            table.label_counts(),
            vec![(Label::Negative, 2), (Label::Positive, 1)]
        );
    }

    #[test]
    fn test_label_counts_tie_keeps_first_seen() {
        let table = labeled(&[Label::Negative, Label::Positive]);
        assert_eq!(
            table.label_counts(),
            vec![(Label::Negative, 1), (Label::Positive, 1)]
        );
    }

    #[test]
    fn test_clean_drops_empty_rows_and_keeps_order() {
        let mut table = CommentTable::from_raw(vec![
            "Birinci yorum!".to_string(),
            "https://only.a.link".to_string(),
            "İkinci yorum".to_string(),
        ]);
        table.clean();
        let cleaned: Vec<&str> = table.cleaned_texts().collect();
        assert_eq!(cleaned, vec!["birinci yorum", "ikinci yorum"]);
        assert_eq!(table.rows()[1].raw, "İkinci yorum");
    }

    #[test]
    fn test_unlabeled_table_is_not_classified() {
        let mut table = CommentTable::from_raw(vec!["iyi".to_string()]);
        table.clean();
        assert!(!table.is_classified());
        assert!(table.label_counts().is_empty());
        assert!(!CommentTable::default().is_classified());
    }
}
