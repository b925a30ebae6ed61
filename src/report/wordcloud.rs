// Frequency-weighted word cloud.
//
// Words are counted over all cleaned comments and placed largest-first
// along an Archimedean spiral from the canvas center. Each font size is
// derived from the previous word's size and frequency ratio, so sizes keep
// shrinking down the ranking. A word that finds no free spot is shrunk one
// pixel at a time; once a word fails at the minimum size the canvas counts
// as full and the rest are dropped.

use std::collections::{HashMap, HashSet};

use super::svg::{viridis, SvgDocument};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 600;
pub const MIN_FONT_SIZE: f64 = 10.0;
/// Cap on distinct words drawn.
pub const MAX_WORDS: usize = 200;

/// Font size of the most frequent word.
const MAX_FONT_SIZE: f64 = CANVAS_HEIGHT as f64 / 5.0;
/// How much frequency (vs. rank) drives size: 0 = all equal, 1 = linear.
const RELATIVE_SCALING: f64 = 0.5;
/// Average glyph advance as a fraction of font size.
const CHAR_WIDTH_RATIO: f64 = 0.6;
/// Pixels removed per retry when a word doesn't fit anywhere.
const FONT_STEP: f64 = 1.0;
/// Side of one occupancy cell in pixels. A power of two keeps the cell
/// arithmetic exact.
const CELL: f64 = 4.0;
/// Radial distance between spiral turns, and distance walked along the
/// spiral between two candidate spots.
const SPIRAL_GAP: f64 = CELL;
const ARC_STEP: f64 = CELL;
/// Gap kept around each word's box.
const PADDING: f64 = 2.0;

/// A word drawn on the canvas. `x`/`y` are the box center.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub count: usize,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }
    fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }
    fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }
    fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether two boxes overlap, including padding.
    pub fn overlaps(&self, other: &PlacedWord) -> bool {
        self.left() - PADDING < other.right()
            && other.left() - PADDING < self.right()
            && self.top() - PADDING < other.bottom()
            && other.top() - PADDING < self.bottom()
    }

    /// Whether the box lies fully inside a `width`×`height` canvas.
    pub fn inside(&self, width: f64, height: f64) -> bool {
        self.left() >= 0.0 && self.top() >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

/// Count words across all texts, most frequent first.
///
/// Texts are joined with single spaces and split on whitespace. One-letter
/// tokens and stopwords are skipped. Ties are broken alphabetically; at most
/// `MAX_WORDS` words are returned.
pub fn word_frequencies<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    stopwords: &HashSet<String>,
) -> Vec<(String, usize)> {
    let joined = texts.into_iter().collect::<Vec<_>>().join(" ");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in joined.split_whitespace() {
        if word.chars().count() < 2 || stopwords.contains(word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(w, c)| (w.to_string(), c))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(MAX_WORDS);
    ranked
}

/// Size of the next word given the size actually used for the previous one.
///
/// `freq` and `prev_freq` are counts relative to the top count, so the
/// first word (ratio 1 against a start of 1) keeps `prev_size`.
fn next_font_size(prev_size: f64, freq: f64, prev_freq: f64) -> f64 {
    let ratio = freq / prev_freq;
    ((RELATIVE_SCALING * ratio + (1.0 - RELATIVE_SCALING)) * prev_size).round()
}

/// Estimated box for `text` at `font_size`.
fn box_size(text: &str, font_size: f64) -> (f64, f64) {
    let width = text.chars().count() as f64 * font_size * CHAR_WIDTH_RATIO;
    (width, font_size)
}

/// Largest whole font size at which `text` fits the canvas width.
fn widest_fit(text: &str, width: f64) -> f64 {
    let chars = text.chars().count().max(1) as f64;
    ((width - 2.0 * (PADDING + CELL)) / (chars * CHAR_WIDTH_RATIO)).floor()
}

/// Coarse occupancy grid over the canvas with a summed-area table, so
/// checking whether a box is free costs four lookups.
struct Occupancy {
    cols: usize,
    rows: usize,
    cells: Vec<u32>,
    sums: Vec<u32>,
}

/// Cell rectangle `[col0, col1) × [row0, row1)`.
type CellRect = (usize, usize, usize, usize);

impl Occupancy {
    fn new(width: f64, height: f64) -> Self {
        let cols = (width / CELL).floor() as usize;
        let rows = (height / CELL).floor() as usize;
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
            sums: vec![0; (cols + 1) * (rows + 1)],
        }
    }

    /// Cells covered by `[lo, hi)` in pixels, or None when that leaves the grid.
    fn span(lo: f64, hi: f64, limit: usize) -> Option<(usize, usize)> {
        let start = (lo / CELL).floor();
        let end = (hi / CELL).ceil();
        if start < 0.0 || end > limit as f64 {
            return None;
        }
        Some((start as usize, end as usize))
    }

    /// Cells covered by the padded box of `word`. Two words whose cell
    /// rectangles are disjoint are at least `2 * PADDING` apart.
    fn cells_for(&self, word: &PlacedWord) -> Option<CellRect> {
        let (c0, c1) = Self::span(word.left() - PADDING, word.right() + PADDING, self.cols)?;
        let (r0, r1) = Self::span(word.top() - PADDING, word.bottom() + PADDING, self.rows)?;
        Some((c0, c1, r0, r1))
    }

    fn sum_at(&self, col: usize, row: usize) -> u32 {
        self.sums[row * (self.cols + 1) + col]
    }

    fn is_free(&self, (c0, c1, r0, r1): CellRect) -> bool {
        self.sum_at(c1, r1) + self.sum_at(c0, r0) == self.sum_at(c0, r1) + self.sum_at(c1, r0)
    }

    fn occupy(&mut self, (c0, c1, r0, r1): CellRect) {
        for row in r0..r1 {
            for col in c0..c1 {
                self.cells[row * self.cols + col] = 1;
            }
        }

        let stride = self.cols + 1;
        for row in 0..self.rows {
            let mut run = 0;
            for col in 0..self.cols {
                run += self.cells[row * self.cols + col];
                self.sums[(row + 1) * stride + col + 1] = self.sums[row * stride + col + 1] + run;
            }
        }
    }
}

/// Place words on a `width`×`height` canvas.
///
/// `frequencies` must be sorted most-frequent first, as returned by
/// `word_frequencies`. Placement is deterministic.
pub fn layout(frequencies: &[(String, usize)], width: f64, height: f64) -> Vec<PlacedWord> {
    let max_count = frequencies.first().map(|(_, c)| *c).unwrap_or(1).max(1) as f64;
    let mut grid = Occupancy::new(width, height);
    let mut placed: Vec<PlacedWord> = Vec::new();

    let mut font_size = MAX_FONT_SIZE;
    let mut prev_freq = 1.0;

    for (text, count) in frequencies {
        let freq = *count as f64 / max_count;
        font_size = next_font_size(font_size, freq, prev_freq).min(widest_fit(text, width));

        let mut spot = None;
        while font_size >= MIN_FONT_SIZE {
            spot = find_spot(text, *count, font_size, &grid, width, height);
            if spot.is_some() {
                break;
            }
            font_size -= FONT_STEP;
        }

        let Some((word, cells)) = spot else {
            // Canvas full
            break;
        };
        grid.occupy(cells);
        placed.push(word);
        prev_freq = freq;
    }

    placed
}

/// Walk the spiral outward in steps of equal arc length until the padded
/// box lands on free cells.
fn find_spot(
    text: &str,
    count: usize,
    font_size: f64,
    grid: &Occupancy,
    width: f64,
    height: f64,
) -> Option<(PlacedWord, CellRect)> {
    let (w, h) = box_size(text, font_size);
    let (cx, cy) = (width / 2.0, height / 2.0);
    // Flatten the spiral to the canvas aspect ratio
    let aspect = height / width;
    let max_radius = cx.hypot(cy / aspect);
    let growth = SPIRAL_GAP / std::f64::consts::TAU;

    let mut t: f64 = 0.0;
    loop {
        let r = growth * t;
        if r > max_radius {
            return None;
        }

        let candidate = PlacedWord {
            text: text.to_string(),
            count,
            font_size,
            x: cx + r * t.cos(),
            y: cy + r * t.sin() * aspect,
            width: w,
            height: h,
        };

        if let Some(cells) = grid.cells_for(&candidate) {
            if grid.is_free(cells) {
                return Some((candidate, cells));
            }
        }

        t += ARC_STEP / r.hypot(growth);
    }
}

/// Render placed words as an SVG document.
pub fn render_svg(words: &[PlacedWord], width: u32, height: u32, title: &str) -> String {
    let mut doc = SvgDocument::new(width, height, title);
    let palette = viridis(8);
    for (i, word) in words.iter().enumerate() {
        doc.text(word.x, word.y, word.font_size, palette[i % palette.len()], &word.text);
    }
    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_stopwords() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_frequencies_sorted_and_filtered() {
        let stop: HashSet<String> = ["bu".to_string()].into_iter().collect();
        let freqs = word_frequencies(
            ["bu zeka harika", "zeka o güzel", "harika zeka"],
            &stop,
        );
        assert_eq!(freqs[0], ("zeka".to_string(), 3));
        assert_eq!(freqs[1], ("harika".to_string(), 2));
        assert_eq!(freqs[2], ("güzel".to_string(), 1));
        // "bu" is a stopword, "o" is one letter
        assert_eq!(freqs.len(), 3);
    }

    #[test]
    fn test_frequencies_capped() {
        let texts: Vec<String> = (0..300).map(|i| format!("kelime{i}")).collect();
        let freqs = word_frequencies(texts.iter().map(|s| s.as_str()), &no_stopwords());
        assert_eq!(freqs.len(), MAX_WORDS);
    }

    #[test]
    fn test_font_size_compounds_down_the_ranking() {
        // First word keeps the start size
        assert_eq!(next_font_size(MAX_FONT_SIZE, 1.0, 1.0), MAX_FONT_SIZE);
        // Half as frequent: 0.5 * 0.5 + 0.5 = 0.75 of the previous size
        assert_eq!(next_font_size(120.0, 0.5, 1.0), 90.0);
        // Equal frequency keeps whatever size the previous word ended at
        assert_eq!(next_font_size(37.0, 0.1, 0.1), 37.0);
    }

    #[test]
    fn test_layout_first_word_centered() {
        let freqs = vec![("zeka".to_string(), 5)];
        let words = layout(&freqs, 1200.0, 600.0);
        assert_eq!(words.len(), 1);
        assert!((words[0].x - 600.0).abs() < 1e-9);
        assert!((words[0].y - 300.0).abs() < 1e-9);
        assert_eq!(words[0].font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn test_layout_very_long_word_shrinks_to_fit() {
        let freqs = vec![("a".repeat(80), 1)];
        let words = layout(&freqs, 1200.0, 600.0);
        assert_eq!(words.len(), 1);
        assert!(words[0].inside(1200.0, 600.0));
    }

    fn zipf_corpus(words: usize, top: usize) -> Vec<(String, usize)> {
        (1..=words)
            .map(|rank| (format!("kelime{rank:03}"), (top / rank).max(1)))
            .collect()
    }

    #[test]
    fn test_layout_many_words_fill_canvas_without_overlap() {
        let freqs = zipf_corpus(150, 30);
        let words = layout(&freqs, 1200.0, 600.0);

        assert!(
            words.len() >= 100,
            "only {} of {} words placed",
            words.len(),
            freqs.len()
        );
        for (i, a) in words.iter().enumerate() {
            assert!(a.inside(1200.0, 600.0), "{} leaves the canvas", a.text);
            for b in &words[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn test_layout_sizes_follow_frequency() {
        let freqs = zipf_corpus(60, 12);
        let words = layout(&freqs, 1200.0, 600.0);
        assert_eq!(words.len(), freqs.len());

        // Placement order is ranking order and sizes never grow
        for pair in words.windows(2) {
            assert!(pair[1].font_size <= pair[0].font_size);
        }
        // The rarest words end up far below the top word
        let last = words.last().unwrap();
        assert!(last.font_size < MAX_FONT_SIZE * 0.25, "got {}", last.font_size);
    }
}
