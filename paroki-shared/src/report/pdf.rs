/// PDF rendering of report documents
///
/// A4 portrait with the built-in Helvetica faces, so no font files ship with
/// the binary. Cells wrap on word boundaries; a row that does not fit on the
/// current page moves to a new page and the table header is repeated.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{ReportDocument, ReportError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const LAYER: &str = "Layer 1";

const TITLE_SIZE: f32 = 15.0;
const HEADING_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 1.5;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

pub fn render_pdf(doc: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let (pdf, page, layer) =
        PdfDocument::new(doc.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);

    let regular = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let layer = pdf.get_page(page).get_layer(layer);
    let mut cursor = Cursor {
        pdf,
        layer,
        regular,
        bold,
        y: PAGE_HEIGHT - MARGIN,
        page_number: 1,
        footer: doc.footer.clone(),
    };

    cursor.text(&doc.organisation, HEADING_SIZE, MARGIN, false);
    cursor.advance(line_height(HEADING_SIZE));
    cursor.text(&doc.title, TITLE_SIZE, MARGIN, true);
    cursor.advance(line_height(TITLE_SIZE));
    for line in &doc.subtitle {
        cursor.text(line, BODY_SIZE + 1.0, MARGIN, false);
        cursor.advance(line_height(BODY_SIZE + 1.0));
    }
    cursor.advance(4.0);

    if doc.is_empty() {
        cursor.text(&doc.empty_message, HEADING_SIZE, MARGIN, true);
        cursor.advance(line_height(HEADING_SIZE) + 4.0);
    } else {
        let widths: Vec<f32> = doc
            .column_fractions()
            .into_iter()
            .map(|f| f * CONTENT_WIDTH)
            .collect();
        let headers: Vec<String> = doc.columns.iter().map(|c| c.header.clone()).collect();

        cursor.row(&headers, &widths, true);
        for row in &doc.rows {
            let height = row_height(row, &widths);
            if cursor.remaining() < height {
                cursor.new_page();
                cursor.row(&headers, &widths, true);
            }
            cursor.row(row, &widths, false);
        }
        cursor.advance(4.0);
    }

    for line in &doc.summary {
        if cursor.remaining() < line_height(BODY_SIZE + 1.0) {
            cursor.new_page();
        }
        cursor.text(&format!("{}:", line.label), BODY_SIZE + 1.0, MARGIN, true);
        cursor.text(&line.value, BODY_SIZE + 1.0, MARGIN + 60.0, false);
        cursor.advance(line_height(BODY_SIZE + 1.0));
    }

    cursor.finish_page();
    cursor
        .pdf
        .save_to_bytes()
        .map_err(|e| ReportError::Pdf(e.to_string()))
}

struct Cursor {
    pdf: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,

    /// Baseline of the next line, in mm from the bottom edge
    y: f32,
    page_number: u32,
    footer: Option<String>,
}

impl Cursor {
    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(pdf_safe(text), size, Mm(x), Mm(self.y - size * PT_TO_MM), font);
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Space left above the footer area
    fn remaining(&self) -> f32 {
        self.y - (MARGIN + line_height(BODY_SIZE))
    }

    fn row(&mut self, cells: &[String], widths: &[f32], header: bool) {
        let mut x = MARGIN;
        let mut tallest = 1;

        for (cell, width) in cells.iter().zip(widths) {
            let lines = wrap_text(cell, max_chars(*width - 2.0 * CELL_PADDING, BODY_SIZE));
            tallest = tallest.max(lines.len());

            let top = self.y;
            for line in &lines {
                self.text(line, BODY_SIZE, x + CELL_PADDING, header);
                self.y -= line_height(BODY_SIZE);
            }
            self.y = top;
            x += width;
        }

        self.advance(tallest as f32 * line_height(BODY_SIZE) + CELL_PADDING);
    }

    fn finish_page(&self) {
        let footer = match &self.footer {
            Some(text) => format!("{}    Halaman {}", text, self.page_number),
            None => format!("Halaman {}", self.page_number),
        };
        self.layer.use_text(
            pdf_safe(&footer),
            BODY_SIZE - 1.0,
            Mm(MARGIN),
            Mm(MARGIN / 2.0),
            &self.regular,
        );
    }

    fn new_page(&mut self) {
        self.finish_page();
        let (page, layer) = self.pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        self.layer = self.pdf.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.page_number += 1;
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.35
}

/// Characters that fit a width at a font size, never below 1
fn max_chars(width_mm: f32, size: f32) -> usize {
    let per_char = size * PT_TO_MM * AVG_GLYPH_EM;
    ((width_mm / per_char).floor() as usize).max(1)
}

fn row_height(cells: &[String], widths: &[f32]) -> f32 {
    let lines = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap_text(cell, max_chars(*width - 2.0 * CELL_PADDING, BODY_SIZE)).len())
        .max()
        .unwrap_or(1);

    lines as f32 * line_height(BODY_SIZE) + CELL_PADDING
}

/// Word-wraps text to at most `width` characters per line
///
/// Words longer than a line are split. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Built-in fonts only cover Latin-1; anything else becomes `?`
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 && !c.is_control() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Column;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("Misa Minggu Pagi", 11), vec!["Misa Minggu", "Pagi"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("satu\ndua", 20), vec!["satu", "dua"]);
    }

    #[test]
    fn test_pdf_safe() {
        assert_eq!(pdf_safe("Café"), "Café");
        assert_eq!(pdf_safe("神父\t"), "???");
    }

    #[test]
    fn test_max_chars_never_zero() {
        assert_eq!(max_chars(0.1, BODY_SIZE), 1);
        assert!(max_chars(CONTENT_WIDTH, BODY_SIZE) > 50);
    }

    #[test]
    fn test_render_empty_document() {
        let doc = ReportDocument::new("Paroki", "Laporan Kegiatan")
            .with_empty_message("Tidak ada data kegiatan");
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_multi_page_document() {
        let mut doc = ReportDocument::new("Paroki", "Daftar Umat")
            .with_columns(vec![Column::new("No", 0.5), Column::new("Nama", 3.0)])
            .with_footer("Dicetak 1 Maret 2025");
        for i in 0..200 {
            doc.push_row(vec![(i + 1).to_string(), format!("Umat nomor {}", i + 1)]);
        }
        doc.push_summary("Total", 200);

        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
