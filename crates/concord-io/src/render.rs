//! Plain-text rendering of comparison results.

use std::io::Write;

use concord_align::Axis;
use concord_eval::{CandidateResult, ComparisonTable, ReportSink};

use crate::IoError;

const HEADERS: [&str; 4] = ["System ID", "X-axis", "Y-axis", "Z-axis"];

/// Render `table` as a boxed text table with values rounded to four places.
///
/// ```text
/// +------------+--------+--------+--------+
/// | System ID  | X-axis | Y-axis | Z-axis |
/// +------------+--------+--------+--------+
/// | System 1   | 0.1000 | 0.2000 | 0.3000 |
/// ...
/// ```
#[must_use]
pub fn render_table(table: &ComparisonTable) -> String {
    let body: Vec<[String; 4]> = table
        .rows()
        .iter()
        .map(|row| {
            let v = row.display_values();
            [
                row.label.clone(),
                format!("{:.4}", v.x),
                format!("{:.4}", v.y),
                format!("{:.4}", v.z),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule: String = widths.iter().fold(String::from("+"), |mut acc, w| {
        acc.push_str(&"-".repeat(w + 2));
        acc.push('+');
        acc
    });
    let line = |cells: [&str; 4]| {
        let mut out = String::from("|");
        for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
            // Label column left-aligned, numbers right-aligned.
            if i == 0 {
                out.push_str(&format!(" {cell:<w$} |"));
            } else {
                out.push_str(&format!(" {cell:>w$} |"));
            }
        }
        out
    };

    let mut out = Vec::with_capacity(body.len() + 4);
    out.push(rule.clone());
    out.push(line(HEADERS));
    out.push(rule.clone());
    for cells in &body {
        out.push(line([&cells[0], &cells[1], &cells[2], &cells[3]]));
    }
    out.push(rule);
    out.join("\n")
}

/// A [`ReportSink`] that prints human-readable results to a writer.
///
/// Each candidate gets a short summary block (pair count, time offsets,
/// Bland-Altman limits); the table follows, titled by metric.
pub struct TableSink<W: Write> {
    out: W,
}

impl<W: Write> TableSink<W> {
    /// Create a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TableSink<W> {
    type Error = IoError;

    fn candidate(&mut self, result: &CandidateResult) -> Result<(), Self::Error> {
        let render = |out: &mut W| -> std::io::Result<()> {
            writeln!(
                out,
                "{}: {} pairs, time offset mean {:.6} s, max {:.6} s, exact {}",
                result.report.source_id,
                result.aligned.len(),
                result.offsets.mean_abs_secs,
                result.offsets.max_abs_secs,
                result.offsets.n_exact,
            )?;
            for axis in Axis::ALL {
                let stats = result.agreement.get(axis);
                writeln!(
                    out,
                    "  {axis}: bias {:.4}, limits of agreement [{:.4}, {:.4}]",
                    stats.mean_difference, stats.lower_limit, stats.upper_limit,
                )?;
            }
            Ok(())
        };
        render(&mut self.out).map_err(|source| IoError::Render { source })
    }

    fn table(&mut self, table: &ComparisonTable) -> Result<(), Self::Error> {
        let title = table.metric().to_string();
        let mut title_chars = title.chars();
        let title: String = title_chars
            .next()
            .map(|c| c.to_uppercase().chain(title_chars).collect())
            .unwrap_or_default();
        writeln!(self.out, "\n{title} per axis\n{}", render_table(table))
            .and_then(|()| self.out.flush())
            .map_err(|source| IoError::Render { source })
    }
}
