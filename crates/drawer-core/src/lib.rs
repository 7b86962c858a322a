//! # drawer-core
//!
//! Core types, traits, and document-intelligence engines for Drawer.
//!
//! This crate provides the foundational data structures, the error
//! taxonomy, and the pure engines (extraction normalization, insight
//! generation, RAG context building, aggregation) that the other Drawer
//! crates depend on. Everything here is side-effect free; persistence
//! and model calls live behind the traits in [`traits`].

pub mod aggregate;
pub mod chat_action;
pub mod defaults;
pub mod error;
pub mod extract;
pub mod file_safety;
pub mod fmt;
pub mod insight;
pub mod logging;
pub mod models;
pub mod rag;
pub mod traits;

// Re-export commonly used types at crate root
pub use chat_action::{parse_assistant_action, AssistantAction, NoteIntent};
pub use error::{Error, Result};
pub use extract::normalize;
pub use file_safety::{safe_extension, validate_upload, ValidationResult};
pub use insight::generate_insight;
pub use models::*;
pub use rag::build_rag_context;
pub use traits::{
    ChatMessageRepository, DocumentRepository, FilePart, GenerationBackend, NoteRepository,
};
