/// Printable reports
///
/// A report is built in two steps: a template in [`templates`] turns domain
/// rows into a [`ReportDocument`] (title, period lines, a table, summary
/// lines), and a renderer turns that document into HTML ([`html`]) or PDF
/// ([`pdf`]). Templates never know about the output format.
///
/// # Example
///
/// ```
/// use paroki_shared::report::{render, Column, ReportDocument, ReportFormat};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let doc = ReportDocument::new("Paroki", "Laporan Kegiatan")
///     .with_columns(vec![Column::new("Nama", 2.0), Column::new("Tanggal", 1.0)])
///     .with_empty_message("Tidak ada data kegiatan");
///
/// let pdf = render(&doc, ReportFormat::Pdf)?;
/// assert!(pdf.starts_with(b"%PDF"));
/// # Ok(())
/// # }
/// ```

pub mod html;
pub mod pdf;
pub mod templates;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Output format selected by the `format` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Html,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Html => "html",
        }
    }
}

/// Table column with a relative width
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub header: String,
    pub weight: f32,
}

impl Column {
    pub fn new(header: impl Into<String>, weight: f32) -> Self {
        Self {
            header: header.into(),
            weight,
        }
    }
}

/// Label/value line printed under the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

/// Format-independent report content
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    /// Organisation name printed above the title
    pub organisation: String,
    pub title: String,

    /// Lines under the title, e.g. the period
    pub subtitle: Vec<String>,

    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub summary: Vec<SummaryLine>,

    /// Printed instead of the table when there are no rows
    pub empty_message: String,

    /// Footer text, e.g. the print date
    pub footer: Option<String>,
}

impl ReportDocument {
    pub fn new(organisation: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            organisation: organisation.into(),
            title: title.into(),
            subtitle: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            summary: Vec::new(),
            empty_message: "Tidak ada data".to_string(),
            footer: None,
        }
    }

    pub fn with_subtitle(mut self, line: impl Into<String>) -> Self {
        self.subtitle.push(line.into());
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn push_summary(&mut self, label: impl Into<String>, value: impl ToString) {
        self.summary.push(SummaryLine {
            label: label.into(),
            value: value.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column weights normalised to fractions summing to 1
    pub fn column_fractions(&self) -> Vec<f32> {
        let total: f32 = self.columns.iter().map(|c| c.weight.max(0.0)).sum();
        if total <= f32::EPSILON {
            let n = self.columns.len().max(1) as f32;
            return vec![1.0 / n; self.columns.len()];
        }

        self.columns
            .iter()
            .map(|c| c.weight.max(0.0) / total)
            .collect()
    }
}

/// Renders a document to bytes in the requested format
pub fn render(doc: &ReportDocument, format: ReportFormat) -> Result<Vec<u8>, ReportError> {
    match format {
        ReportFormat::Pdf => pdf::render_pdf(doc),
        ReportFormat::Html => Ok(html::render_html(doc).into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_fractions() {
        let doc = ReportDocument::new("Paroki", "Uji")
            .with_columns(vec![Column::new("A", 1.0), Column::new("B", 3.0)]);
        assert_eq!(doc.column_fractions(), vec![0.25, 0.75]);

        let doc = ReportDocument::new("Paroki", "Uji")
            .with_columns(vec![Column::new("A", 0.0), Column::new("B", 0.0)]);
        assert_eq!(doc.column_fractions(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ReportFormat::default(), ReportFormat::Pdf);
        assert_eq!(ReportFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(ReportFormat::Html.extension(), "html");
        let f: ReportFormat = serde_json::from_str("\"html\"").unwrap();
        assert_eq!(f, ReportFormat::Html);
    }

    #[test]
    fn test_render_dispatch() {
        let doc = ReportDocument::new("Paroki", "Kosong");
        let html = render(&doc, ReportFormat::Html).unwrap();
        assert!(String::from_utf8(html).unwrap().contains("Tidak ada data"));
    }
}
