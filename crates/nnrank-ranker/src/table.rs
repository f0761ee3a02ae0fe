//! Rendering of result rows as plain text, CSV or JSON.

use std::fs;
use std::path::Path;

use nnrank_common::{OutputFormat, Result, ScoreRecord};
use tracing::info;

/// Column headers of the plain table, in fixed column order.
pub const HEADERS: [&str; 5] = ["Filename of ligand", "NNScore", "\u{00B1}Deviation", "Energy", "Unit"];

/// Numeric columns are right-aligned, text columns left-aligned.
const RIGHT_ALIGNED: [bool; 5] = [false, true, true, true, false];

const COLUMN_GAP: &str = "  ";

/// Render `rows` in the requested format. Column order is always
/// ligand id, score, deviation, affinity value, unit.
pub fn render_table(rows: &[ScoreRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(render_plain(rows)),
        OutputFormat::Csv => render_csv(rows),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)? + "\n"),
    }
}

/// Render and write `rows` to `path`, replacing any previous file.
pub fn write_table(path: &Path, rows: &[ScoreRecord], format: OutputFormat) -> Result<()> {
    let content = render_table(rows, format)?;
    fs::write(path, content)?;
    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

fn render_plain(rows: &[ScoreRecord]) -> String {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.ligand_id.clone(),
                r.score.to_string(),
                r.deviation.to_string(),
                r.affinity_value.to_string(),
                r.affinity_unit.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        let cell = cell.as_ref();
        let pad = widths[i].saturating_sub(cell.chars().count());
        if RIGHT_ALIGNED[i] {
            line.extend(std::iter::repeat(' ').take(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.extend(std::iter::repeat(' ').take(pad));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn render_csv(rows: &[ScoreRecord]) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        if rows.is_empty() {
            writer.write_record(["ligand_id", "score", "deviation", "affinity_value", "affinity_unit"])?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
