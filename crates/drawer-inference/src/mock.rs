//! Mock generation backend for deterministic testing.
//!
//! Returns canned responses without network access. Supports substring
//! routing (prompts containing a needle get a mapped response), forced
//! failures for error-path tests, and a call log for assertions.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use drawer_core::{Error, FilePart, GenerationBackend, Result};

/// Mock generation backend for tests.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    /// `(needle, response)` pairs checked in order; first needle found in
    /// the prompt wins.
    mapped_responses: Vec<(String, String)>,
    fail_with: Option<String>,
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub has_file: bool,
    pub max_output_tokens: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "Mock response".to_string(),
            mapped_responses: Vec::new(),
            fail_with: None,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for unmapped prompts.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Map prompts containing `needle` to a specific response.
    pub fn with_response_mapping(
        mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped_responses
            .push((needle.into(), response.into()));
        self
    }

    /// Make every call fail with an inference error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).fail_with = Some(message.into());
        self
    }

    /// All logged calls, for assertions.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().expect("call log lock").clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().expect("call log lock").len()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(
        &self,
        prompt: &str,
        file: Option<&FilePart>,
        max_output_tokens: u32,
    ) -> Result<String> {
        self.call_log.lock().expect("call log lock").push(MockCall {
            prompt: prompt.to_string(),
            has_file: file.is_some(),
            max_output_tokens,
        });

        if let Some(message) = &self.config.fail_with {
            return Err(Error::Inference(message.clone()));
        }

        for (needle, response) in &self.config.mapped_responses {
            if prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.config.default_response.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response() {
        let backend = MockGenerationBackend::new();
        let text = backend.generate("anything", None, 100).await.unwrap();
        assert_eq!(text, "Mock response");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mapped_response_wins_over_default() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("default")
            .with_response_mapping("Walmart", "{\"merchant\":\"Walmart\"}");
        let text = backend
            .generate("tell me about Walmart", None, 100)
            .await
            .unwrap();
        assert_eq!(text, "{\"merchant\":\"Walmart\"}");
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let backend = MockGenerationBackend::new().with_failure("boom");
        match backend.generate("x", None, 100).await {
            Err(Error::Inference(msg)) => assert_eq!(msg, "boom"),
            other => panic!("expected Inference error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_log_records_file_and_budget() {
        let backend = MockGenerationBackend::new();
        let file = FilePart::new(vec![1, 2, 3], "application/pdf");
        backend.generate("with file", Some(&file), 16384).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].has_file);
        assert_eq!(calls[0].max_output_tokens, 16384);
        assert_eq!(calls[0].prompt, "with file");
    }
}
