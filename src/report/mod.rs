// Report rendering — word cloud, sentiment bar chart, terminal summary.

pub mod barchart;
pub mod svg;
pub mod terminal;
pub mod wordcloud;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::CommentTable;
use crate::text::stopwords::turkish_stopwords;

/// Words listed in the terminal summary.
const TOP_WORDS_SHOWN: usize = 15;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like ğ or ş.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Files written by one report.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub word_cloud: PathBuf,
    pub bar_chart: PathBuf,
}

/// Render both charts for a classified table into `dir` and print the
/// terminal summary.
///
/// `keyword` only appears in chart titles.
pub fn render(table: &CommentTable, keyword: &str, dir: &Path) -> Result<ReportFiles> {
    if !table.is_classified() {
        anyhow::bail!("Cannot render a report for a table without sentiment labels");
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    // a) Word cloud
    let stopwords = turkish_stopwords();
    let frequencies = wordcloud::word_frequencies(table.cleaned_texts(), &stopwords);
    let placed = wordcloud::layout(
        &frequencies,
        wordcloud::CANVAS_WIDTH as f64,
        wordcloud::CANVAS_HEIGHT as f64,
    );
    let cloud_svg = wordcloud::render_svg(
        &placed,
        wordcloud::CANVAS_WIDTH,
        wordcloud::CANVAS_HEIGHT,
        &format!("Most frequent words about '{keyword}'"),
    );
    let word_cloud = dir.join("wordcloud.svg");
    std::fs::write(&word_cloud, cloud_svg)
        .with_context(|| format!("Failed to write {}", word_cloud.display()))?;

    info!(
        distinct_words = frequencies.len(),
        placed = placed.len(),
        "Rendered word cloud"
    );

    // b) Sentiment distribution
    let counts = table.label_counts();
    let chart_svg = barchart::render_svg(
        &counts,
        &format!("Sentiment of comments about '{keyword}'"),
        "Sentiment",
        "Comment count",
    );
    let bar_chart = dir.join("sentiment.svg");
    std::fs::write(&bar_chart, chart_svg)
        .with_context(|| format!("Failed to write {}", bar_chart.display()))?;

    terminal::display_label_distribution(&counts);
    terminal::display_top_words(&frequencies, TOP_WORDS_SHOWN);

    Ok(ReportFiles {
        word_cloud,
        bar_chart,
    })
}
