use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tubely_core::AppError;

/// A file part read fully into memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Body-limit hits become 413; anything else is a malformed form.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Unable to parse form: {}", err.body_text()))
    }
}

pub fn missing_field(name: &str) -> AppError {
    AppError::InvalidInput(format!("Unable to get file from form field '{}'", name))
}

/// Read the first part named `name`, skipping any others.
pub async fn extract_named_file(
    multipart: &mut Multipart,
    name: &str,
    max_size: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(name) {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await.map_err(multipart_error)?;

        if data.len() > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "{} bytes exceeds max {} bytes",
                data.len(),
                max_size
            )));
        }

        return Ok(UploadedFile {
            data,
            file_name,
            content_type,
        });
    }

    Err(missing_field(name))
}
