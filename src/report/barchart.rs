// Bar chart of comment counts per sentiment label.

use crate::sentiment::Label;

use super::svg::{viridis, SvgDocument};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 600;

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 80.0;
/// Fraction of each category slot taken by its bar.
const BAR_FILL: f64 = 0.8;

/// Pick a tick step of 1, 2 or 5 × 10^k giving at most ~8 ticks.
pub fn tick_step(max_value: usize) -> usize {
    let mut magnitude = 1;
    loop {
        for factor in [1, 2, 5] {
            let step = factor * magnitude;
            if max_value / step <= 8 {
                return step;
            }
        }
        magnitude *= 10;
    }
}

/// Render ordered `(label, count)` pairs as an SVG bar chart.
///
/// Bars are drawn in the order given; callers pass counts sorted most
/// frequent first.
pub fn render_svg(counts: &[(Label, usize)], title: &str, x_label: &str, y_label: &str) -> String {
    let width = CHART_WIDTH as f64;
    let height = CHART_HEIGHT as f64;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;

    let mut doc = SvgDocument::new(CHART_WIDTH, CHART_HEIGHT, title);
    doc.text(width / 2.0, MARGIN_TOP / 2.0, 20.0, "black", title);

    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let step = tick_step(max_count.max(1));
    // Round the axis up to a whole tick
    let axis_max = (max_count.max(1)).div_ceil(step) * step;
    let scale = plot_h / axis_max as f64;

    // Y axis with gridlines
    let mut tick = 0;
    while tick <= axis_max {
        let y = baseline - tick as f64 * scale;
        doc.line(MARGIN_LEFT, y, MARGIN_LEFT + plot_w, y, "#e0e0e0");
        doc.text_anchored(MARGIN_LEFT - 8.0, y, 12.0, "black", "end", &tick.to_string());
        tick += step;
    }
    doc.line(MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline, "black");
    doc.line(MARGIN_LEFT, baseline, MARGIN_LEFT + plot_w, baseline, "black");

    // Bars
    let palette = viridis(counts.len());
    let slot = plot_w / counts.len().max(1) as f64;
    for (i, (label, count)) in counts.iter().enumerate() {
        let bar_w = slot * BAR_FILL;
        let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
        let bar_h = *count as f64 * scale;
        doc.rect(x, baseline - bar_h, bar_w, bar_h, palette[i]);
        doc.text(x + bar_w / 2.0, baseline - bar_h - 12.0, 13.0, "black", &count.to_string());
        doc.text(x + bar_w / 2.0, baseline + 18.0, 14.0, "black", label.as_str());
    }

    // Axis titles
    doc.text(MARGIN_LEFT + plot_w / 2.0, height - MARGIN_BOTTOM / 3.0, 14.0, "black", x_label);
    doc.vertical_text(MARGIN_LEFT / 3.0, MARGIN_TOP + plot_h / 2.0, 14.0, "black", y_label);

    doc.finish()
}
