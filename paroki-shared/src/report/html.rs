/// HTML rendering of report documents, used for the browser preview
///
/// Every piece of document text is escaped; the output is a standalone page
/// with inline print styles.

use super::ReportDocument;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;font-size:12px;margin:24px;color:#222}\
h1{font-size:18px;margin:0 0 4px}h2{font-size:13px;font-weight:normal;margin:0 0 16px;color:#555}\
p.sub{margin:0 0 4px}table{width:100%;border-collapse:collapse;margin-top:12px}\
th,td{border:1px solid #999;padding:4px 6px;text-align:left;vertical-align:top}\
th{background:#eee}p.empty{margin-top:24px;font-style:italic}\
dl.summary{margin-top:16px}dl.summary dt{font-weight:bold;float:left;clear:left;width:200px}\
dl.summary dd{margin:0 0 4px 210px}footer{margin-top:24px;font-size:10px;color:#777}";

pub fn render_html(doc: &ReportDocument) -> String {
    let mut out = String::with_capacity(2048 + doc.rows.len() * 128);

    out.push_str("<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&doc.title)));
    out.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    out.push_str(&format!("<h2>{}</h2>\n", escape(&doc.organisation)));
    out.push_str(&format!("<h1>{}</h1>\n", escape(&doc.title)));
    for line in &doc.subtitle {
        out.push_str(&format!("<p class=\"sub\">{}</p>\n", escape(line)));
    }

    if doc.is_empty() {
        out.push_str(&format!("<p class=\"empty\">{}</p>\n", escape(&doc.empty_message)));
    } else {
        let fractions = doc.column_fractions();
        out.push_str("<table>\n<thead><tr>");
        for (column, fraction) in doc.columns.iter().zip(fractions) {
            out.push_str(&format!(
                "<th style=\"width:{:.1}%\">{}</th>",
                fraction * 100.0,
                escape(&column.header)
            ));
        }
        out.push_str("</tr></thead>\n<tbody>\n");

        for row in &doc.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
    }

    if !doc.summary.is_empty() {
        out.push_str("<dl class=\"summary\">\n");
        for line in &doc.summary {
            out.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                escape(&line.label),
                escape(&line.value)
            ));
        }
        out.push_str("</dl>\n");
    }

    if let Some(footer) = &doc.footer {
        out.push_str(&format!("<footer>{}</footer>\n", escape(footer)));
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Escapes text for element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Column;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_table_rendering() {
        let mut doc = ReportDocument::new("Paroki St. Yosef", "Laporan")
            .with_subtitle("Periode: Maret 2025")
            .with_columns(vec![Column::new("Nama", 1.0), Column::new("Lokasi", 1.0)])
            .with_footer("Dicetak 1 April 2025");
        doc.push_row(vec!["Rekoleksi <OMK>".to_string(), "Aula".to_string()]);
        doc.push_summary("Total Kegiatan", 1);

        let html = render_html(&doc);
        assert!(html.contains("<th style=\"width:50.0%\">Nama</th>"));
        assert!(html.contains("<td>Rekoleksi &lt;OMK&gt;</td>"));
        assert!(html.contains("<dt>Total Kegiatan</dt><dd>1</dd>"));
        assert!(html.contains("Periode: Maret 2025"));
        assert!(!html.contains("class=\"empty\""));
    }

    #[test]
    fn test_empty_document() {
        let doc = ReportDocument::new("Paroki", "Laporan").with_empty_message("Tidak ada data kegiatan");
        let html = render_html(&doc);
        assert!(html.contains("<p class=\"empty\">Tidak ada data kegiatan</p>"));
        assert!(!html.contains("<table>"));
    }
}
