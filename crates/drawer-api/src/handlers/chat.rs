//! Chat HTTP handlers: the conversational action router.
//!
//! Two paths through `POST /api/chat/send`:
//!
//! - **File attached** — the conversational model is not consulted for
//!   the factual reply. The file runs through extraction → history
//!   lookup → insight → document persistence, and the reply is a
//!   templated confirmation. Extraction/model failure degrades to a
//!   user-facing error string, never a thrown error.
//! - **Text only** — the full RAG context plus instruction block goes to
//!   the model; its output is classified as either a note-creation
//!   action (persist a note, confirm) or a plain answer returned
//!   verbatim (markdown download links included, untouched).

use axum::extract::{Multipart, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use drawer_core::{
    build_rag_context, defaults, generate_insight, parse_assistant_action, validate_upload,
    AssistantAction, ChatMessage, ChatMessageRepository, Document, DocumentRepository,
    ExtractedDocument, NewChatMessage, NewDocument, NewNote, Note, NoteRepository, Role,
    TransactionType,
};
use drawer_inference::{build_chat_prompt, extract_document};

use super::{read_multipart, UploadedFile};
use crate::{ApiError, AppState};

/// Friendly openers for upload confirmations.
const UPLOAD_RESPONSES: [&str; 10] = [
    "\u{1F4E5} Got it! I've filed that away safely.",
    "\u{2705} All stored! Your data warehouse just got richer.",
    "\u{1F4BE} Saved and indexed. Ask me anything about it anytime!",
    "\u{1F389} Done! Another document safely in your vault.",
    "\u{1F4C2} Filed and ready! I've extracted all the details.",
    "\u{1F680} Boom, processed! Everything's stored and searchable.",
    "\u{1F9E0} Smart filing complete! I've got all the key details.",
    "\u{1F4CB} Logged and loaded! Your personal warehouse grows.",
    "\u{1F31F} Perfect! That's been scanned, extracted, and stored.",
    "\u{1F50D} All captured! Every detail is now searchable.",
];

/// Friendly openers for note confirmations.
const NOTE_RESPONSES: [&str; 8] = [
    "\u{1F4DD} Note saved! I'll keep track of it for you.",
    "\u{2705} Got it! Your note is safely stored.",
    "\u{1F4CC} Pinned! That's in your notes now.",
    "\u{1F9E0} Noted! I'll remember that for you.",
    "\u{1F4CB} Written down and ready whenever you need it.",
    "\u{1F31F} Done! Your note is tucked away safely.",
    "\u{270D}\u{FE0F} Jotted down! You can find it in your files.",
    "\u{1F389} Saved! One less thing to remember on your own.",
];

fn pick_random(choices: &[&'static str]) -> &'static str {
    choices
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

/// List the full conversation, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = state.db.chat.list().await?;
    Ok(Json(messages))
}

/// Clear the conversation.
pub async fn clear_messages(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.chat.clear().await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Response to a chat send: the assistant message plus anything that was
/// persisted along the way.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub assistant_message: ChatMessage,
    pub document: Option<Document>,
    pub note: Option<Note>,
}

/// Handle a chat send carrying a message and/or an attached file.
///
/// # Returns
/// - 200 OK with the assistant reply and any created document/note
/// - 400 Bad Request when both message and file are missing, or the
///   file's type/size is rejected
pub async fn send_message(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let (message, file) = read_multipart(multipart).await?;
    let message = message.unwrap_or_default();

    if message.is_empty() && file.is_none() {
        return Err(ApiError::BadRequest(
            "Please provide a message or file".to_string(),
        ));
    }

    // Store the attachment up front so the user message can reference it.
    let stored = match &file {
        Some(file) => {
            let verdict = validate_upload(&file.mime_type, file.data.len() as u64);
            if !verdict.allowed {
                return Err(ApiError::BadRequest(
                    verdict.block_reason.unwrap_or_else(|| "Upload rejected".to_string()),
                ));
            }
            Some(state.uploads.store(&file.filename, &file.data).await?)
        }
        None => None,
    };

    let user_content = if message.is_empty() {
        file.as_ref()
            .map(|f| format!("Uploaded: {}", f.filename))
            .unwrap_or_default()
    } else {
        message.clone()
    };
    state
        .db
        .chat
        .insert(NewChatMessage {
            role: Role::User,
            content: user_content,
            attachment_url: stored.as_ref().map(|s| s.file_url.clone()),
        })
        .await?;

    let outcome = match (&file, &stored) {
        (Some(file), Some(stored)) => {
            handle_file_message(&state, file, &stored.file_url, &stored.path, stored.size).await?
        }
        _ => handle_text_message(&state, &message).await?,
    };

    let assistant_message = state
        .db
        .chat
        .insert(NewChatMessage {
            role: Role::Assistant,
            content: outcome.response,
            attachment_url: None,
        })
        .await?;

    Ok(Json(SendMessageResponse {
        assistant_message,
        document: outcome.document,
        note: outcome.note,
    }))
}

/// What a chat turn produced.
struct ChatOutcome {
    response: String,
    document: Option<Document>,
    note: Option<Note>,
}

/// File path: extract, compare against history, persist, confirm.
/// Failures degrade to a user-facing error string.
async fn handle_file_message(
    state: &AppState,
    file: &UploadedFile,
    file_url: &str,
    file_path: &std::path::Path,
    file_size: i64,
) -> Result<ChatOutcome, ApiError> {
    let today = Utc::now().date_naive();

    let extracted =
        match extract_document(state.ai.as_ref(), &file.data, &file.mime_type, today).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "chat",
                    error = %e,
                    "file processing failed; degrading to error reply"
                );
                return Ok(ChatOutcome {
                    response: format!(
                        "I had trouble processing that file: {}. You can try uploading a clearer image or PDF.",
                        e
                    ),
                    document: None,
                    note: None,
                });
            }
        };

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
            file_url: file_url.to_string(),
            merchant: extracted.merchant.clone(),
            amount: extracted.amount,
            category: extracted.category,
            transaction_type: extracted.transaction_type,
            date: extracted.date,
            due_date: extracted.due_date,
            summary: extracted.summary.clone(),
            insight: insight.clone(),
            raw_text: Some(extracted.raw_text.clone()).filter(|t| !t.is_empty()),
            file_size: file_size as i32,
            file_path: Some(file_path.to_string_lossy().into_owned()),
        })
        .await?;

    info!(
        subsystem = "api",
        component = "chat",
        document_id = document.id,
        merchant = %document.merchant,
        "document created from chat upload"
    );

    Ok(ChatOutcome {
        response: upload_confirmation(pick_random(&UPLOAD_RESPONSES), &extracted, &insight),
        document: Some(document),
        note: None,
    })
}

/// Text path: RAG context → model → action classification.
async fn handle_text_message(state: &AppState, message: &str) -> Result<ChatOutcome, ApiError> {
    let docs = state.db.documents.list().await?;
    let notes = state.db.notes.list().await?;
    let today = Utc::now().date_naive();

    let rag_context = build_rag_context(&docs, &notes, today);
    let prompt = build_chat_prompt(&rag_context, message);

    let response = state
        .ai
        .generate(&prompt, None, defaults::CHAT_MAX_TOKENS)
        .await?;
    let response = if response.is_empty() {
        "I couldn't process that request. Please try again.".to_string()
    } else {
        response
    };

    match parse_assistant_action(&response) {
        AssistantAction::CreateNote(intent) => {
            let content = intent
                .content
                .unwrap_or_else(|| message.to_string());
            let note = state
                .db
                .notes
                .insert(NewNote {
                    content: content.clone(),
                    reminder_date: intent.reminder_date,
                    reminder_time: intent.reminder_time.clone(),
                    is_completed: false,
                })
                .await?;

            info!(
                subsystem = "api",
                component = "chat",
                note_id = note.id,
                "note created from conversational intent"
            );

            Ok(ChatOutcome {
                response: note_confirmation(
                    pick_random(&NOTE_RESPONSES),
                    &content,
                    intent.reminder_date,
                    intent.reminder_time.as_deref(),
                ),
                document: None,
                note: Some(note),
            })
        }
        AssistantAction::Reply(text) => Ok(ChatOutcome {
            response: text,
            document: None,
            note: None,
        }),
    }
}

/// Templated confirmation for a processed upload: friendly opener,
/// structured fact summary, then the derived insight.
fn upload_confirmation(intro: &str, extracted: &ExtractedDocument, insight: &str) -> String {
    let mut response = format!("{}\n\n", intro);
    response.push_str(&format!(
        "**{}** | {} | {}\n",
        extracted.merchant,
        extracted.category,
        extracted.transaction_type.as_str().to_uppercase()
    ));
    if extracted.transaction_type != TransactionType::Record {
        response.push_str(&format!(
            "Amount: **${}**\n",
            drawer_core::fmt::money(extracted.amount)
        ));
    }
    response.push_str(&format!("\n{}\n\n{}", extracted.summary, insight));
    if !extracted.raw_text.is_empty() {
        response.push_str(
            "\n\nAll details stored and searchable. Ask me anything about this document!",
        );
    }
    response
}

/// Confirmation for a note created through conversation.
fn note_confirmation(
    intro: &str,
    content: &str,
    reminder_date: Option<NaiveDate>,
    reminder_time: Option<&str>,
) -> String {
    let mut response = format!("{}\n\n\"{}\"", intro, content);
    if let Some(date) = reminder_date {
        response.push_str(&format!("\n\n\u{23F0} Reminder set for {}", date));
        if let Some(time) = reminder_time {
            response.push_str(&format!(" at {}", time));
        }
        response.push('.');
    }
    response
}

// =============================================================================
// GHOST FEED
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GhostQuery {
    pub name: Option<String>,
}

/// Append a simulated proactive assistant message to the conversation.
pub async fn ghost_message(
    State(state): State<AppState>,
    Query(query): Query<GhostQuery>,
) -> Result<Json<ChatMessage>, ApiError> {
    let name = query.name.unwrap_or_else(|| "User".to_string());
    let content = {
        let mut feed = state.ghost.lock().expect("ghost feed lock");
        feed.pick(&name)
    };

    let message = state
        .db
        .chat
        .insert(NewChatMessage {
            role: Role::Assistant,
            content,
            attachment_url: None,
        })
        .await?;
    Ok(Json(message))
}
