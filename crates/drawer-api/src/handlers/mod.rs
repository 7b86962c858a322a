//! HTTP handlers, grouped by resource.

pub mod calendar;
pub mod chat;
pub mod documents;
pub mod notes;
pub mod stats;

use axum::extract::Multipart;

use crate::ApiError;

/// A file received through a multipart form.
pub struct UploadedFile {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Read a multipart form carrying an optional `message` text field and an
/// optional `file` field. Unknown fields are ignored.
pub async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<UploadedFile>), ApiError> {
    let mut message = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Upload error: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("message") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Upload error: {}", e)))?;
                message = Some(text);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Upload error: {}", e)))?
                    .to_vec();
                file = Some(UploadedFile {
                    filename,
                    mime_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok((message, file))
}
