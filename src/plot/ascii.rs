//! ASCII bar charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two shapes are provided:
//! - horizontal bars with the value printed after each bar
//! - vertical columns with the value printed above each column

use crate::report::fmt_count;

/// Space between columns of the vertical chart.
const COLUMN_GAP: &str = "  ";

/// Horizontal bar chart: one line per row, bars scaled to `width` columns.
pub fn render_hbar_chart(rows: &[(&str, u64)], width: usize) -> String {
    if rows.is_empty() {
        return "(no data)\n".to_string();
    }

    let width = width.max(1);
    let label_w = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|&(_, v)| v).max().unwrap_or(0);

    let mut out = String::new();
    for &(label, value) in rows {
        let len = scale(value, max, width);
        out.push_str(&format!(
            "{label:>label_w$} |{} {}\n",
            "#".repeat(len),
            fmt_count(value)
        ));
    }
    out
}

/// Vertical column chart, `height` rows tall, labels under each column.
pub fn render_vbar_chart(bars: &[(&str, u64)], height: usize) -> String {
    if bars.is_empty() {
        return "(no data)\n".to_string();
    }

    let height = height.max(1);
    let max = bars.iter().map(|&(_, v)| v).max().unwrap_or(0);
    let values: Vec<String> = bars.iter().map(|&(_, v)| fmt_count(v)).collect();
    let col_w = bars
        .iter()
        .zip(&values)
        .map(|((label, _), value)| label.chars().count().max(value.len()))
        .max()
        .unwrap_or(0)
        .max(3);
    let heights: Vec<usize> = bars.iter().map(|&(_, v)| scale(v, max, height)).collect();

    let mut out = String::new();

    // One extra row on top so the tallest column still has room for its value.
    for level in (1..=height + 1).rev() {
        let cells: Vec<String> = heights
            .iter()
            .zip(&values)
            .map(|(&h, value)| {
                if level <= h {
                    "#".repeat(col_w)
                } else if level == h + 1 {
                    center(value, col_w)
                } else {
                    " ".repeat(col_w)
                }
            })
            .collect();
        push_trimmed(&mut out, &cells.join(COLUMN_GAP));
    }

    let total_w = col_w * bars.len() + COLUMN_GAP.len() * (bars.len() - 1);
    out.push_str(&"-".repeat(total_w));
    out.push('\n');

    let labels: Vec<String> = bars.iter().map(|(label, _)| center(label, col_w)).collect();
    push_trimmed(&mut out, &labels.join(COLUMN_GAP));

    out
}

/// Scale `value` into `0..=cells`; non-zero values always get at least one cell.
fn scale(value: u64, max: u64, cells: usize) -> usize {
    if max == 0 || value == 0 {
        return 0;
    }
    let len = (value as f64 / max as f64 * cells as f64).round() as usize;
    len.clamp(1, cells)
}

fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{s}{}", " ".repeat(left), " ".repeat(right))
}

fn push_trimmed(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}
