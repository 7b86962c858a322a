//! # drawer-inference
//!
//! Generative-AI backend abstraction for Drawer.
//!
//! This crate owns the boundary to the external model: the Gemini
//! `generateContent` backend, the prompt texts, the extraction pipeline
//! that ties backend output to the normalizer, and a deterministic mock
//! for tests. The [`drawer_core::GenerationBackend`] trait is the seam;
//! everything above it treats the model as an opaque
//! bytes-plus-prompt-to-text capability.

pub mod extraction;
pub mod gemini;
pub mod mock;
pub mod prompts;

pub use extraction::extract_document;
pub use gemini::GeminiBackend;
pub use mock::MockGenerationBackend;
pub use prompts::{build_chat_prompt, EXTRACTION_PROMPT};
