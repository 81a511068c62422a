//! services/intake/src/adapters/report_pdf.rs
//!
//! Renders the local query history as a paginated PDF report via `printpdf`.

use chrono::{Local, TimeZone};
use printpdf::*;
use std::io::BufWriter;
use std::path::Path;
use symptom_guide_core::{HistoryRecord, MEDICAL_DISCLAIMER};
use tracing::debug;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP: f32 = 280.0;
const BOTTOM: f32 = 25.0;
const LEFT: f32 = 15.0;
const WRAP_CHARS: usize = 95;

pub const REPORT_TITLE: &str = "Symptom Guide - Personal Health History Report";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("No history found to export.")]
    EmptyHistory,
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Tracks the current layer and vertical position, opening new pages as needed.
struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor<'_> {
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
            self.pages += 1;
        }
    }

    fn line(&mut self, text: &str, size: f32, indent: f32, font: &IndirectFontRef, advance: f32) {
        self.ensure_room(advance);
        self.layer.use_text(text, size, Mm(LEFT + indent), Mm(self.y), font);
        self.y -= advance;
    }

    fn paragraph(&mut self, text: &str, size: f32, indent: f32, font: &IndirectFontRef) {
        for line in wrap_text(text, WRAP_CHARS) {
            self.line(&line, size, indent, font, 4.5);
        }
    }

    fn gap(&mut self, amount: f32) {
        self.y -= amount;
    }
}

/// Generates the history report. Records are listed newest first and numbered so
/// the oldest is #1. Returns PDF bytes.
pub fn render_history_report(history: &[HistoryRecord]) -> Result<Vec<u8>, ReportError> {
    if history.is_empty() {
        return Err(ReportError::EmptyHistory);
    }

    let (doc, page1, layer1) = PdfDocument::new(REPORT_TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut cursor = Cursor {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: TOP,
        pages: 1,
    };

    cursor.line(REPORT_TITLE, 16.0, 0.0, &bold, 7.0);
    cursor.line(
        &format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M")),
        9.0,
        0.0,
        &font,
        10.0,
    );

    for (index, record) in history.iter().enumerate() {
        // Keep a record header together with at least a few lines of body.
        cursor.ensure_room(30.0);

        let number = history.len() - index;
        cursor.line(
            &format!("Record #{} - {}", number, format_timestamp(record.timestamp)),
            12.0,
            0.0,
            &bold,
            7.0,
        );

        cursor.line("Symptom Description:", 10.0, 0.0, &bold, 5.0);
        let description = match record.intake.description.trim() {
            "" => "No description provided",
            d => d,
        };
        cursor.paragraph(description, 9.0, 3.0, &font);
        cursor.gap(2.0);

        if !record.result.possible_causes.is_empty() {
            cursor.line("Possible Causes:", 10.0, 0.0, &bold, 5.0);
            for cause in &record.result.possible_causes {
                cursor.paragraph(&format!("- {}", cause), 9.0, 3.0, &font);
            }
            cursor.gap(2.0);
        }

        if !record.result.medicines.is_empty() {
            cursor.line("OTC Suggestions:", 10.0, 0.0, &bold, 5.0);
            for med in &record.result.medicines {
                cursor.paragraph(&format!("- {}: {}", med.name, med.dosage), 9.0, 3.0, &font);
                cursor.paragraph(&format!("Warning: {}", med.warnings), 8.0, 7.0, &font);
            }
        }

        cursor.gap(6.0);
    }

    cursor.gap(4.0);
    for line in wrap_text(MEDICAL_DISCLAIMER, 110) {
        cursor.line(&line, 7.0, 0.0, &font, 3.5);
    }

    debug!(
        "Rendered history report: {} records on {} pages.",
        history.len(),
        cursor.pages
    );
    drop(cursor);
    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

/// Writes report bytes to `path`, creating parent directories.
pub fn export_report(pdf_bytes: &[u8], path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, pdf_bytes)?;
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
