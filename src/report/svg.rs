// Minimal SVG building blocks shared by the two charts.

use std::fmt::Write;

/// Font stack with full Turkish glyph coverage on common systems.
pub const FONT_FAMILY: &str = "DejaVu Sans, Verdana, sans-serif";

/// Ten evenly spaced stops of the viridis colormap, dark to light.
const VIRIDIS: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// `n` colors sampled evenly from viridis, skipping the near-white top end.
pub fn viridis(n: usize) -> Vec<&'static str> {
    match n {
        0 => Vec::new(),
        1 => vec![VIRIDIS[4]],
        _ => {
            let last = VIRIDIS.len() - 2;
            (0..n).map(|i| VIRIDIS[i * last / (n - 1)]).collect()
        }
    }
}

/// Escape text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// An SVG document under construction.
pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDocument {
    /// Start a document with a white background and an accessible title.
    pub fn new(width: u32, height: u32, title: &str) -> Self {
        let mut body = String::new();
        let _ = writeln!(body, "  <title>{}</title>", escape(title));
        let _ = writeln!(
            body,
            r#"  <rect x="0" y="0" width="{width}" height="{height}" fill="white"/>"#
        );
        Self {
            width,
            height,
            body,
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        let _ = writeln!(
            self.body,
            r#"  <rect x="{x:.1}" y="{y:.1}" width="{width:.1}" height="{height:.1}" fill="{fill}"/>"#
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        let _ = writeln!(
            self.body,
            r#"  <line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{stroke}" stroke-width="1"/>"#
        );
    }

    /// Text centered on (x, y).
    pub fn text(&mut self, x: f64, y: f64, font_size: f64, fill: &str, content: &str) {
        self.text_anchored(x, y, font_size, fill, "middle", content);
    }

    /// Text with an explicit horizontal anchor ("start", "middle", "end"),
    /// vertically centered on y.
    pub fn text_anchored(
        &mut self,
        x: f64,
        y: f64,
        font_size: f64,
        fill: &str,
        anchor: &str,
        content: &str,
    ) {
        let _ = writeln!(
            self.body,
            r#"  <text x="{x:.1}" y="{y:.1}" font-size="{font_size:.1}" fill="{fill}" text-anchor="{anchor}" dominant-baseline="central">{}</text>"#,
            escape(content)
        );
    }

    /// Text rotated 90° counter-clockwise around its anchor point.
    pub fn vertical_text(&mut self, x: f64, y: f64, font_size: f64, fill: &str, content: &str) {
        let _ = writeln!(
            self.body,
            r#"  <text x="{x:.1}" y="{y:.1}" font-size="{font_size:.1}" fill="{fill}" text-anchor="middle" dominant-baseline="central" transform="rotate(-90 {x:.1} {y:.1})">{}</text>"#,
            escape(content)
        );
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{font}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            font = FONT_FAMILY,
            body = self.body,
        )
    }
}
