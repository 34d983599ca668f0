/// Report export
///
/// # Endpoint
///
/// ```text
/// GET /admin/reports/activities?range=week|month|year|custom&start=&end=&format=pdf|html
/// ```
///
/// Ranges are resolved against the parish "today": week is Monday to Sunday,
/// month and year are calendar bounds, custom needs both dates in order.
/// PDF is returned as a download, HTML inline as a preview.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{ensure_valid, push_error},
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use paroki_shared::{
    calendar::{DateRange, RangePreset},
    models::activity::Activity,
    report::{self, templates, ReportDocument, ReportFormat},
};
use serde::Deserialize;

/// `?range=&start=&end=&format=`
///
/// Dates stay strings here so a malformed value is a field error, not a
/// rejected query.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub range: RangePreset,

    pub start: Option<String>,
    pub end: Option<String>,

    #[serde(default)]
    pub format: ReportFormat,
}

impl ReportQuery {
    /// Resolves the requested period relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> ApiResult<DateRange> {
        let mut errors = Vec::new();
        let start = parse_date(self.start.as_deref(), "start", &mut errors);
        let end = parse_date(self.end.as_deref(), "end", &mut errors);
        ensure_valid(errors)?;

        Ok(self.range.resolve(today, start, end)?)
    }
}

fn parse_date(
    value: Option<&str>,
    field: &str,
    errors: &mut Vec<crate::error::ValidationErrorDetail>,
) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            push_error(errors, field, "Format tanggal tidak valid");
            None
        }
    }
}

/// Renders `doc` and wraps it as a download (PDF) or inline preview (HTML)
pub fn report_response(doc: &ReportDocument, format: ReportFormat, file_stem: &str) -> ApiResult<Response> {
    let bytes = report::render(doc, format)?;

    let disposition = match format {
        ReportFormat::Pdf => format!("attachment; filename=\"{}.{}\"", file_stem, format.extension()),
        ReportFormat::Html => "inline".to_string(),
    };
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::InternalError(format!("Invalid header value: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// `{prefix}-{start}-{end}`
pub fn period_file_stem(prefix: &str, range: DateRange) -> String {
    format!("{}-{}-{}", prefix, range.start, range.end)
}

pub async fn activities(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Response> {
    let today = state.today();
    let range = query.resolve(today)?;

    let rows = Activity::list_in_range(&state.db, range).await?;
    let doc = templates::activity_report(state.organisation(), query.range, range, &rows, today);

    tracing::info!(
        start = %range.start,
        end = %range.end,
        total = rows.len(),
        format = query.format.extension(),
        "Activity report exported"
    );

    report_response(&doc, query.format, &period_file_stem("laporan-kegiatan", range))
}
