/// Multipart form parsing
///
/// Admin content forms (announcements, activities, officials) and the member
/// document form are submitted as `multipart/form-data`. [`MultipartForm`]
/// buffers the text fields and file parts of one request; the helpers below
/// turn them into typed values and collect field-level validation errors.
///
/// # Document slots
///
/// The document form carries `pdf_0`..`pdf_3` file parts and
/// `remove_0`..`remove_3` flags. [`plan_document_slots`] validates the whole
/// form before anything on disk changes.

use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use axum::extract::Multipart;
use bytes::Bytes;
use chrono::{NaiveDate, NaiveTime};
use paroki_shared::models::user_pdf::MAX_SLOTS;
use paroki_shared::storage::allowed_extension;
use std::collections::HashMap;

pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

const PDF_MAGIC: &[u8] = b"%PDF-";
const MAX_FILE_NAME_CHARS: usize = 255;

/// One uploaded file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name, kept for downloads
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Buffered multipart body
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Reads every part of the request
    ///
    /// File inputs left empty by the browser (no name, no bytes) are dropped.
    /// A field name sent more than once fails validation.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = MultipartForm::default();
        let mut errors = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let name = match field.name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => continue,
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;

                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    if form.accepts(&name, &mut errors) {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name,
                                content_type,
                                bytes,
                            },
                        );
                    }
                }
                None => {
                    let value = field.text().await?;
                    if form.accepts(&name, &mut errors) {
                        form.fields.insert(name, value);
                    }
                }
            }
        }

        ensure_valid(errors)?;
        Ok(form)
    }

    /// Whether `name` is still free; records one error per repeated name
    fn accepts(&self, name: &str, errors: &mut Vec<ValidationErrorDetail>) -> bool {
        if !self.fields.contains_key(name) && !self.files.contains_key(name) {
            return true;
        }
        if !errors.iter().any(|e| e.field == name) {
            push_error(errors, name, "Field dikirim lebih dari sekali");
        }
        false
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.insert(name.to_string(), file);
        self
    }

    /// Trimmed text value, empty when absent
    pub fn string(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Trimmed text value, `None` when absent or blank
    pub fn optional(&self, name: &str) -> Option<String> {
        Some(self.string(name)).filter(|v| !v.is_empty())
    }

    /// Checkbox-style flag: `1`, `true` or `on`
    pub fn flag(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .map(|v| parse_flag(v) == Some(true))
            .unwrap_or(false)
    }

    /// `YYYY-MM-DD`; records an error when present but malformed, or when
    /// missing and `required`
    pub fn date(
        &self,
        name: &str,
        required: bool,
        errors: &mut Vec<ValidationErrorDetail>,
    ) -> Option<NaiveDate> {
        match self.optional(name) {
            Some(value) => match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    push_error(errors, name, "Format tanggal tidak valid");
                    None
                }
            },
            None => {
                if required {
                    push_error(errors, name, "Tanggal wajib diisi");
                }
                None
            }
        }
    }

    /// `HH:MM` or `HH:MM:SS`; required
    pub fn time(&self, name: &str, errors: &mut Vec<ValidationErrorDetail>) -> Option<NaiveTime> {
        match self.optional(name) {
            Some(value) => match parse_time(&value) {
                Some(time) => Some(time),
                None => {
                    push_error(errors, name, "Format jam tidak valid");
                    None
                }
            },
            None => {
                push_error(errors, name, "Jam wajib diisi");
                None
            }
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

pub fn push_error(errors: &mut Vec<ValidationErrorDetail>, field: &str, message: impl Into<String>) {
    errors.push(ValidationErrorDetail {
        field: field.to_string(),
        message: message.into(),
    });
}

/// Fails with every collected detail, sorted by field
pub fn ensure_valid(mut errors: Vec<ValidationErrorDetail>) -> ApiResult<()> {
    if errors.is_empty() {
        return Ok(());
    }
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    Err(ApiError::ValidationError(errors))
}

/// Merges validator output into a collected list
pub fn extend_with(errors: &mut Vec<ValidationErrorDetail>, result: Result<(), validator::ValidationErrors>) {
    if let Err(e) = result {
        if let ApiError::ValidationError(details) = ApiError::from(e) {
            errors.extend(details);
        }
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "" | "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Trims an optional JSON string, `None` when blank
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn megabytes(bytes: usize) -> usize {
    (bytes / (1024 * 1024)).max(1)
}

/// Checks an image upload and returns its lowercase extension
pub fn validate_image(
    file: &UploadedFile,
    field: &str,
    max_bytes: usize,
) -> Result<String, ValidationErrorDetail> {
    let fail = |message: String| ValidationErrorDetail {
        field: field.to_string(),
        message,
    };

    let extension = allowed_extension(&file.file_name, &IMAGE_EXTENSIONS)
        .ok_or_else(|| fail("Gambar harus berformat jpg, jpeg, png atau webp".to_string()))?;

    if let Some(content_type) = &file.content_type {
        if !content_type.starts_with("image/") {
            return Err(fail("Berkas harus berupa gambar".to_string()));
        }
    }

    if file.is_empty() {
        return Err(fail("Berkas kosong".to_string()));
    }

    if file.len() > max_bytes {
        return Err(fail(format!("Ukuran gambar maksimal {} MB", megabytes(max_bytes))));
    }

    Ok(extension)
}

/// Checks a document upload
pub fn validate_pdf(file: &UploadedFile, field: &str, max_bytes: usize) -> Result<(), ValidationErrorDetail> {
    let fail = |message: String| ValidationErrorDetail {
        field: field.to_string(),
        message,
    };

    if file.content_type.as_deref() != Some("application/pdf") {
        return Err(fail("Berkas harus berupa PDF".to_string()));
    }

    if file.is_empty() {
        return Err(fail("Berkas kosong".to_string()));
    }

    if file.len() > max_bytes {
        return Err(fail(format!("Ukuran berkas maksimal {} MB", megabytes(max_bytes))));
    }

    if !file.bytes.starts_with(PDF_MAGIC) {
        return Err(fail("Berkas bukan dokumen PDF yang valid".to_string()));
    }

    Ok(())
}

/// Last path component of a client file name, with a fallback
pub fn display_file_name(raw: &str, fallback: &str) -> String {
    let name = raw
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() {
        return fallback.to_string();
    }

    name.chars().take(MAX_FILE_NAME_CHARS).collect()
}

/// Requested change to one document slot
#[derive(Debug)]
pub struct SlotChange {
    pub slot: i16,
    pub remove: bool,
    pub upload: Option<UploadedFile>,
}

enum SlotField {
    Slot(i16),
    OutOfRange,
    Unknown,
}

fn slot_of(name: &str, prefix: &str) -> Option<SlotField> {
    let index = name.strip_prefix(prefix)?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Some(SlotField::Unknown);
    }

    match index.parse::<i16>() {
        Ok(slot) if (slot as usize) < MAX_SLOTS => Some(SlotField::Slot(slot)),
        _ => Some(SlotField::OutOfRange),
    }
}

fn classify(name: &str, prefix: &str) -> SlotField {
    slot_of(name, prefix).unwrap_or(SlotField::Unknown)
}

/// Validates the document form and returns per-slot changes in slot order
///
/// Any slot index of 4 or more, any unknown field, or any invalid file fails
/// the whole form.
pub fn plan_document_slots(form: MultipartForm, max_bytes: usize) -> ApiResult<Vec<SlotChange>> {
    let mut errors = Vec::new();
    let mut changes: Vec<SlotChange> = (0..MAX_SLOTS as i16)
        .map(|slot| SlotChange {
            slot,
            remove: false,
            upload: None,
        })
        .collect();

    for (name, value) in &form.fields {
        match classify(name, "remove_") {
            SlotField::Slot(slot) => match parse_flag(value) {
                Some(remove) => changes[slot as usize].remove = remove,
                None => push_error(&mut errors, name, "Nilai penghapusan tidak valid"),
            },
            SlotField::OutOfRange => {
                push_error(&mut errors, name, format!("Maksimal {} dokumen", MAX_SLOTS))
            }
            SlotField::Unknown => match classify(name, "pdf_") {
                SlotField::OutOfRange => {
                    push_error(&mut errors, name, format!("Maksimal {} dokumen", MAX_SLOTS))
                }
                SlotField::Slot(_) if value.trim().is_empty() => {}
                SlotField::Slot(_) => push_error(&mut errors, name, "Berkas harus berupa PDF"),
                SlotField::Unknown => push_error(&mut errors, name, "Field tidak dikenal"),
            },
        }
    }

    for (name, file) in form.files {
        match classify(&name, "pdf_") {
            SlotField::Slot(slot) => match validate_pdf(&file, &name, max_bytes) {
                Ok(()) => changes[slot as usize].upload = Some(file),
                Err(detail) => errors.push(detail),
            },
            SlotField::OutOfRange => {
                push_error(&mut errors, &name, format!("Maksimal {} dokumen", MAX_SLOTS))
            }
            SlotField::Unknown => push_error(&mut errors, &name, "Field tidak dikenal"),
        }
    }

    ensure_valid(errors)?;

    Ok(changes
        .into_iter()
        .filter(|c| c.remove || c.upload.is_some())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};

    const MAX: usize = 5 * 1024 * 1024;

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.4\n%test\n"),
        }
    }

    fn fields_of(err: ApiError) -> Vec<String> {
        match err {
            ApiError::ValidationError(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_plan_uploads_and_removals_in_slot_order() {
        let form = MultipartForm::default()
            .with_file("pdf_2", pdf("baptis.pdf"))
            .with_file("pdf_0", pdf("ktp.pdf"))
            .with_text("remove_1", "1")
            .with_text("remove_3", "0");

        let changes = plan_document_slots(form, MAX).unwrap();
        let slots: Vec<i16> = changes.iter().map(|c| c.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);

        assert!(changes[0].upload.is_some());
        assert!(!changes[0].remove);
        assert!(changes[1].remove);
        assert!(changes[1].upload.is_none());
        assert_eq!(changes[2].upload.as_ref().unwrap().file_name, "baptis.pdf");
    }

    #[test]
    fn test_slot_index_four_is_rejected() {
        let form = MultipartForm::default()
            .with_file("pdf_0", pdf("a.pdf"))
            .with_file("pdf_4", pdf("b.pdf"));

        assert_eq!(fields_of(plan_document_slots(form, MAX).unwrap_err()), vec!["pdf_4"]);

        let form = MultipartForm::default().with_text("remove_12", "1");
        assert_eq!(fields_of(plan_document_slots(form, MAX).unwrap_err()), vec!["remove_12"]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let form = MultipartForm::default()
            .with_text("note", "hi")
            .with_file("pdf_x", pdf("a.pdf"));

        assert_eq!(
            fields_of(plan_document_slots(form, MAX).unwrap_err()),
            vec!["note", "pdf_x"]
        );
    }

    #[test]
    fn test_pdf_validation() {
        let mut not_pdf = pdf("a.pdf");
        not_pdf.bytes = Bytes::from_static(b"GIF89a");
        assert!(validate_pdf(&not_pdf, "pdf_0", MAX).is_err());

        let mut wrong_type = pdf("a.pdf");
        wrong_type.content_type = Some("image/png".to_string());
        assert!(validate_pdf(&wrong_type, "pdf_0", MAX).is_err());

        let oversized = UploadedFile {
            bytes: Bytes::from(vec![b'%'; 16]),
            ..pdf("a.pdf")
        };
        assert!(validate_pdf(&oversized, "pdf_0", 8).is_err());

        assert!(validate_pdf(&pdf("a.pdf"), "pdf_0", MAX).is_ok());
    }

    #[test]
    fn test_empty_form_plans_nothing() {
        let form = MultipartForm::default().with_text("pdf_1", "");
        assert!(plan_document_slots(form, MAX).unwrap().is_empty());
    }

    #[test]
    fn test_validate_image() {
        let image = UploadedFile {
            file_name: "Misa.JPG".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"\xff\xd8\xff"),
        };
        assert_eq!(validate_image(&image, "image", MAX).unwrap(), "jpg");

        let svg = UploadedFile {
            file_name: "logo.svg".to_string(),
            ..image.clone()
        };
        assert!(validate_image(&svg, "image", MAX).is_err());
        assert!(validate_image(&image, "image", 2).is_err());
    }

    #[test]
    fn test_typed_text_fields() {
        let form = MultipartForm::default()
            .with_text("date", "2025-03-09")
            .with_text("start_time", "07:30")
            .with_text("bad_date", "09/03/2025")
            .with_text("is_published", "on")
            .with_text("location", "   ");

        let mut errors = Vec::new();
        assert_eq!(
            form.date("date", true, &mut errors),
            NaiveDate::from_ymd_opt(2025, 3, 9)
        );
        assert_eq!(
            form.time("start_time", &mut errors),
            NaiveTime::from_hms_opt(7, 30, 0)
        );
        assert!(errors.is_empty());

        assert_eq!(form.date("bad_date", true, &mut errors), None);
        assert_eq!(form.date("missing", false, &mut errors), None);
        assert_eq!(errors.len(), 1);

        assert!(form.flag("is_published"));
        assert!(!form.flag("missing"));
        assert_eq!(form.optional("location"), None);
    }

    #[test]
    fn test_display_file_name() {
        assert_eq!(display_file_name("C:\\Users\\a\\KTP.pdf", "x.pdf"), "KTP.pdf");
        assert_eq!(display_file_name("  ", "dokumen.pdf"), "dokumen.pdf");
    }

    async fn read_raw(parts: &[(&str, Option<&str>, &str)]) -> ApiResult<MultipartForm> {
        let mut body = String::new();
        for (name, file_name, value) in parts {
            body.push_str("--X\r\n");
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                    name, file_name
                )),
                None => body.push_str(&format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str("--X--\r\n");

        let request = Request::builder()
            .method("POST")
            .header("content-type", "multipart/form-data; boundary=X")
            .body(Body::from(body))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        MultipartForm::read(multipart).await
    }

    #[tokio::test]
    async fn test_read_collects_fields_and_files() {
        let mut form = read_raw(&[
            ("title", None, " Misa "),
            ("pdf_0", Some("a.pdf"), "%PDF-1.4"),
            ("pdf_1", Some(""), ""),
        ])
        .await
        .unwrap();

        assert_eq!(form.string("title"), "Misa");
        assert_eq!(form.take_file("pdf_0").unwrap().file_name, "a.pdf");
        assert!(form.take_file("pdf_1").is_none());
    }

    #[tokio::test]
    async fn test_read_rejects_repeated_names() {
        let err = read_raw(&[
            ("remove_1", None, "0"),
            ("remove_1", None, "1"),
            ("pdf_0", Some("a.pdf"), "%PDF-1.4"),
            ("pdf_0", Some("b.pdf"), "%PDF-1.4"),
            ("pdf_0", Some("c.pdf"), "%PDF-1.4"),
        ])
        .await
        .unwrap_err();

        assert_eq!(fields_of(err), vec!["pdf_0", "remove_1"]);
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(None), None);
        assert_eq!(blank_to_none(Some("   ".to_string())), None);
        assert_eq!(blank_to_none(Some(" Lingkungan ".to_string())).as_deref(), Some("Lingkungan"));
    }
}
