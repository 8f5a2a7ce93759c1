// File: src/report.rs
use crate::core::snapshot::{TrainingMetadata, Translation};
use crate::errors::Result;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, Write};

const CELL_GAP: usize = 3;

fn cell_text(row: &Translation) -> String {
    format!("{} → {} ({:.3})", row.target, row.source, row.probability)
}

/// Lays the translations out in a grid, `columns` cells per line.
pub fn render_table<W: Write>(out: &mut W, rows: &[Translation], columns: usize) -> io::Result<()> {
    let columns = columns.max(1);
    if rows.is_empty() {
        queue!(out, Print("No translations to show.\n"))?;
        return out.flush();
    }

    let width = rows.iter().map(|r| cell_text(r).chars().count()).max().unwrap_or(0) + CELL_GAP;
    for line in rows.chunks(columns) {
        for row in line {
            let text = cell_text(row);
            let pad = width - text.chars().count();
            queue!(
                out,
                SetAttribute(Attribute::Bold),
                Print(&row.target),
                SetAttribute(Attribute::Reset),
                Print(" → "),
                SetForegroundColor(Color::Green),
                Print(&row.source),
                ResetColor,
                Print(format!(" ({:.3}){}", row.probability, " ".repeat(pad))),
            )?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

pub fn render_json<W: Write>(out: &mut W, rows: &[Translation]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)?;
    Ok(())
}

pub fn render_metadata<W: Write>(out: &mut W, metadata: &TrainingMetadata) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(format!(
            "trained {} iterations on {} sentence pairs in {:.2?}\n",
            metadata.iterations, metadata.sentence_pairs, metadata.train_time
        )),
        ResetColor,
    )?;
    out.flush()
}
