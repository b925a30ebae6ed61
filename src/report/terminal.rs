// Colored terminal output for the sentiment distribution and top words.

use colored::Colorize;

use crate::sentiment::Label;

/// Width of the longest bar in characters.
const BAR_WIDTH: usize = 40;

/// Display label counts as horizontal bars, in the order given.
pub fn display_label_distribution(counts: &[(Label, usize)]) {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        println!("No labeled comments.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Sentiment Distribution ({total} comments) ===").bold()
    );

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1);
    for (label, count) in counts {
        let bar = "█".repeat(bar_len(*count, max));
        let pct = *count as f64 / total as f64 * 100.0;
        println!(
            "  {:<9} {:>5}  {:>5.1}%  {}",
            colorize_label(*label),
            count,
            pct,
            colorize_bar(*label, &bar),
        );
    }
}

/// Display the most frequent word-cloud words.
pub fn display_top_words(frequencies: &[(String, usize)], limit: usize) {
    if frequencies.is_empty() {
        return;
    }

    println!("\n{}", "=== Most Frequent Words ===".bold());
    for (i, (word, count)) in frequencies.iter().take(limit).enumerate() {
        println!("  {:>3}. {:<24} {}", i + 1, word, count.to_string().dimmed());
    }
}

/// Bar length scaled so `max` fills BAR_WIDTH; non-zero counts get at least one block.
fn bar_len(count: usize, max: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    ((count * BAR_WIDTH) / max).max(1)
}

fn colorize_label(label: Label) -> colored::ColoredString {
    match label {
        Label::Positive => label.as_str().green(),
        Label::Negative => label.as_str().red(),
    }
}

fn colorize_bar(label: Label, bar: &str) -> colored::ColoredString {
    match label {
        Label::Positive => bar.green(),
        Label::Negative => bar.red(),
    }
}
