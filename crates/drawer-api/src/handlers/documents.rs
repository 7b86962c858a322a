//! Document HTTP handlers: listing, retrieval, deletion, and the upload
//! endpoint that runs the extraction pipeline.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};

use drawer_core::{
    generate_insight, validate_upload, Document, DocumentRepository, NewDocument,
};
use drawer_inference::extract_document;

use super::read_multipart;
use crate::{ApiError, AppState};

/// List all documents, most recent first.
///
/// # Returns
/// - 200 OK with the document array
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = state.db.documents.list().await?;
    Ok(Json(docs))
}

/// Get a single document by id.
///
/// # Returns
/// - 200 OK with the document
/// - 404 Not Found if it doesn't exist
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Document>, ApiError> {
    let doc = state
        .db
        .documents
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;
    Ok(Json(doc))
}

/// Delete a document and the stored file it references.
///
/// # Returns
/// - 200 OK `{ "success": true }`
/// - 404 Not Found if it doesn't exist
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let doc = state
        .db
        .documents
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    state.db.documents.delete(id).await?;
    state.uploads.delete_by_url(&doc.file_url).await?;

    info!(
        subsystem = "api",
        document_id = id,
        merchant = %doc.merchant,
        "document deleted"
    );
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Upload a document: store the file, extract its facts, derive the
/// insight against merchant history, and persist the record.
///
/// Multipart form with one `file` field (PDF/PNG/JPEG/WEBP, max 10 MB).
///
/// # Returns
/// - 200 OK with the created document
/// - 400 Bad Request for a missing file or disallowed type/size
/// - 500 Internal Server Error when extraction fails
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Document>, ApiError> {
    let (_, file) = read_multipart(multipart).await?;
    let file = file.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let verdict = validate_upload(&file.mime_type, file.data.len() as u64);
    if !verdict.allowed {
        return Err(ApiError::BadRequest(
            verdict.block_reason.unwrap_or_else(|| "Upload rejected".to_string()),
        ));
    }

    let stored = state.uploads.store(&file.filename, &file.data).await?;
    let today = Utc::now().date_naive();

    let extracted = extract_document(state.ai.as_ref(), &file.data, &file.mime_type, today)
        .await
        .map_err(|e| {
            warn!(
                subsystem = "api",
                op = "upload",
                error = %e,
                "document processing failed"
            );
            e
        })?;

    let previous = state.db.documents.last_by_merchant(&extracted.merchant).await?;
    let insight = generate_insight(
        extracted.amount,
        previous.map(|d| d.amount),
        extracted.due_date,
        extracted.category,
        extracted.transaction_type,
        today,
    );

    let document = state
        .db
        .documents
        .insert(NewDocument {
            file_url: stored.file_url,
            merchant: extracted.merchant,
            amount: extracted.amount,
            category: extracted.category,
            transaction_type: extracted.transaction_type,
            date: extracted.date,
            due_date: extracted.due_date,
            summary: extracted.summary,
            insight,
            raw_text: Some(extracted.raw_text).filter(|t| !t.is_empty()),
            file_size: stored.size as i32,
            file_path: Some(stored.path.to_string_lossy().into_owned()),
        })
        .await?;

    Ok(Json(document))
}
