//! Document extraction pipeline: generation backend → normalizer.
//!
//! One synchronous (per-request) step: send the document inline with the
//! extraction prompt, then normalize whatever text comes back. Either
//! stage's failure is terminal for the operation — there is no retry.

use chrono::NaiveDate;
use std::time::Instant;
use tracing::{info, warn};

use drawer_core::{
    defaults::EXTRACTION_MAX_TOKENS, extract, ExtractedDocument, FilePart, GenerationBackend,
    Result,
};

use crate::prompts::EXTRACTION_PROMPT;

/// Run a document through the extraction model and normalize the output.
pub async fn extract_document(
    backend: &dyn GenerationBackend,
    data: &[u8],
    mime_type: &str,
    today: NaiveDate,
) -> Result<ExtractedDocument> {
    let start = Instant::now();
    let file = FilePart::new(data.to_vec(), mime_type);

    let response = backend
        .generate(EXTRACTION_PROMPT, Some(&file), EXTRACTION_MAX_TOKENS)
        .await?;

    let extracted = extract::normalize(&response, today).map_err(|e| {
        warn!(
            subsystem = "inference",
            component = "extraction",
            error = %e,
            response_len = response.len(),
            "extraction output failed to normalize"
        );
        e
    })?;

    info!(
        subsystem = "inference",
        component = "extraction",
        merchant = %extracted.merchant,
        category = %extracted.category,
        transaction_type = %extracted.transaction_type,
        duration_ms = start.elapsed().as_millis() as u64,
        "document extracted"
    );
    Ok(extracted)
}
