//! Diagnostic confusion-matrix artifact rendering.
//!
//! The harness emits one SVG per evaluation run. The rendering is
//! deliberately self-contained: the artifact is written for humans and is
//! never machine-read back by this core.

use std::path::Path;

use crate::error::Result;
use crate::metrics::ConfusionMatrix;

const CELL: usize = 48;
const MARGIN_LEFT: usize = 130;
const MARGIN_TOP: usize = 60;
const MARGIN_BOTTOM: usize = 130;
const MARGIN_RIGHT: usize = 20;

/// Render `matrix` as an SVG heat map and write it to `path`.
///
/// Cells are shaded by row-normalized count, so each truth row shows where
/// its stars went regardless of class frequency.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn render_confusion_matrix(matrix: &ConfusionMatrix, title: &str, path: &Path) -> Result<()> {
    let n = matrix.size();
    let width = MARGIN_LEFT + n * CELL + MARGIN_RIGHT;
    let height = MARGIN_TOP + n * CELL + MARGIN_BOTTOM;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         font-family=\"sans-serif\">\n"
    ));
    svg.push_str(&format!(
        "  <rect width=\"{width}\" height=\"{height}\" fill=\"white\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"30\" font-size=\"16\" text-anchor=\"middle\">{}</text>\n",
        width / 2,
        escape(title)
    ));

    for i in 0..n {
        let row_total = matrix.row_total(i);
        for j in 0..n {
            let count = matrix.get(i, j);
            let fraction = if row_total > 0 {
                count as f64 / row_total as f64
            } else {
                0.0
            };
            let (r, g, b) = shade(fraction);
            let x = MARGIN_LEFT + j * CELL;
            let y = MARGIN_TOP + i * CELL;
            svg.push_str(&format!(
                "  <rect x=\"{x}\" y=\"{y}\" width=\"{CELL}\" height=\"{CELL}\" \
                 fill=\"rgb({r},{g},{b})\" stroke=\"#cccccc\"/>\n"
            ));
            if count > 0 {
                let text_fill = if fraction > 0.5 { "white" } else { "black" };
                svg.push_str(&format!(
                    "  <text x=\"{}\" y=\"{}\" font-size=\"13\" text-anchor=\"middle\" \
                     fill=\"{text_fill}\">{count}</text>\n",
                    x + CELL / 2,
                    y + CELL / 2 + 5
                ));
            }
        }
    }

    for (i, label) in matrix.labels().iter().enumerate() {
        // Truth rows on the left, predictions along the bottom.
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" text-anchor=\"end\">{}</text>\n",
            MARGIN_LEFT - 8,
            MARGIN_TOP + i * CELL + CELL / 2 + 4,
            escape(label)
        ));
        let x = MARGIN_LEFT + i * CELL + CELL / 2;
        let y = MARGIN_TOP + n * CELL + 14;
        svg.push_str(&format!(
            "  <text x=\"{x}\" y=\"{y}\" font-size=\"12\" text-anchor=\"end\" \
             transform=\"rotate(-45 {x} {y})\">{}</text>\n",
            escape(label)
        ));
    }

    svg.push_str("</svg>\n");
    std::fs::write(path, svg)?;
    Ok(())
}

/// White-to-blue ramp over [0, 1].
fn shade(fraction: f64) -> (u8, u8, u8) {
    let f = fraction.clamp(0.0, 1.0);
    let lerp = |from: f64, to: f64| (from + (to - from) * f).round() as u8;
    (lerp(255.0, 31.0), lerp(255.0, 119.0), lerp(255.0, 180.0))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
