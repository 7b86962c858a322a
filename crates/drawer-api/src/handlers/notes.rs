//! Note HTTP handlers.

use axum::extract::{Path, State};
use axum::Json;

use drawer_core::{NewNote, Note, NoteRepository, NoteUpdate};

use crate::{ApiError, AppState};

/// List all notes, most recent first.
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.db.notes.list().await?;
    Ok(Json(notes))
}

/// Create a note.
///
/// # Returns
/// - 200 OK with the created note
/// - 400 Bad Request when content is empty
pub async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<NewNote>,
) -> Result<Json<Note>, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Note content is required".to_string()));
    }
    let note = state.db.notes.insert(req).await?;
    Ok(Json(note))
}

/// Partially update a note (content, reminder, completion).
///
/// # Returns
/// - 200 OK with the updated note
/// - 400 Bad Request when content is provided but empty
/// - 404 Not Found if the note doesn't exist
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(updates): Json<NoteUpdate>,
) -> Result<Json<Note>, ApiError> {
    if updates
        .content
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(ApiError::BadRequest("Note content is required".to_string()));
    }
    let note = state.db.notes.update(id, updates).await?;
    Ok(Json(note))
}

/// Delete a note.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notes.delete(id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
