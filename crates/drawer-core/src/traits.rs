//! Core traits for Drawer abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability: PostgreSQL
//! repositories in `drawer-db`, generation backends in `drawer-inference`,
//! and deterministic mocks in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// DOCUMENT REPOSITORY
// =============================================================================

/// Repository for document CRUD and history lookups.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// List all documents, most recently created first.
    async fn list(&self) -> Result<Vec<Document>>;

    /// Fetch a document by id.
    async fn get(&self, id: i32) -> Result<Option<Document>>;

    /// Insert a new document, returning the stored row.
    async fn insert(&self, doc: NewDocument) -> Result<Document>;

    /// Delete a document by id.
    async fn delete(&self, id: i32) -> Result<()>;

    /// Most recently created document with an exact merchant match, if any.
    ///
    /// Exact-string match is intentional; no fuzzy matching. Used to source
    /// the previous amount for insight generation.
    async fn last_by_merchant(&self, merchant: &str) -> Result<Option<Document>>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List all notes, most recently created first.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Fetch a note by id.
    async fn get(&self, id: i32) -> Result<Option<Note>>;

    /// Insert a new note, returning the stored row.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Apply a partial update, returning the updated row.
    async fn update(&self, id: i32, updates: NoteUpdate) -> Result<Note>;

    /// Delete a note by id.
    async fn delete(&self, id: i32) -> Result<()>;
}

// =============================================================================
// CHAT MESSAGE REPOSITORY
// =============================================================================

/// Repository for the append-only chat log.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// List all messages in chronological order.
    async fn list(&self) -> Result<Vec<ChatMessage>>;

    /// Append a message, returning the stored row.
    async fn insert(&self, msg: NewChatMessage) -> Result<ChatMessage>;

    /// Delete every message.
    async fn clear(&self) -> Result<()>;
}

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// An inline file part sent alongside a prompt (document bytes + MIME).
#[derive(Debug, Clone)]
pub struct FilePart {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl FilePart {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }
}

/// Backend for free-text generation, optionally grounded on an inline
/// document.
///
/// The backend is an opaque capability: given a prompt (and possibly
/// document bytes), it returns free text. Callers own all parsing and
/// validation of that text; a hang or failure here fails only the
/// current request — no retries.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate free text from a prompt with an optional inline file.
    async fn generate(
        &self,
        prompt: &str,
        file: Option<&FilePart>,
        max_output_tokens: u32,
    ) -> Result<String>;

    /// Check if the backend is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// The model name in use.
    fn model_name(&self) -> &str;
}
